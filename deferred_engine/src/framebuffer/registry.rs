/// Attachment registry of a framebuffer
///
/// Owns the framebuffer's attachments, allocates their images, assigns
/// slots and keeps the active draw targets.
///
/// Slots depend on creation order: the k-th color attachment created gets
/// `Color(COLOR_BASE + k)`. The name-keyed map does not preserve that
/// order, so a separate creation-order ledger is kept alongside it and
/// every ordered walk (read layout, destruction, iteration) goes through
/// the ledger, never through the map.

use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use crate::{engine_bail, engine_err, engine_trace};
use crate::graphics_device::{
    AttachmentSlot, FramebufferHandle, GraphicsDevice, ImageDesc, PixelFormat, SamplerState,
};
use crate::framebuffer::attachment::{Attachment, OwnedImage};
use crate::framebuffer::format;
use crate::framebuffer::release_queue::ReleaseQueue;

const SOURCE: &str = "deferred::AttachmentRegistry";

/// Name-keyed attachment storage with a creation-order ledger
#[derive(Debug)]
pub struct AttachmentRegistry {
    /// Where dropped attachment images are queued
    releases: ReleaseQueue,
    /// Sampler state of every attachment image
    sampler: SamplerState,
    attachments: FxHashMap<String, Attachment>,
    /// Attachment names in creation order
    creation_order: Vec<String>,
    color_attachment_count: u32,
    depth_attachment: Option<String>,
    /// Active draw targets (names and slots, same order)
    draw_target_names: Vec<String>,
    draw_targets: Vec<AttachmentSlot>,
}

impl AttachmentRegistry {
    /// Create an empty registry
    ///
    /// Images of attachments dropped without `release_all` are queued on
    /// `releases`.
    pub fn new(releases: ReleaseQueue, sampler: SamplerState) -> Self {
        Self {
            releases,
            sampler,
            attachments: FxHashMap::default(),
            creation_order: Vec::new(),
            color_attachment_count: 0,
            depth_attachment: None,
            draw_target_names: Vec::new(),
            draw_targets: Vec::new(),
        }
    }

    /// Sampler state applied to attachment images
    pub fn sampler(&self) -> SamplerState {
        self.sampler
    }

    /// Allocate and attach a new `width` x `height` image named `name`
    ///
    /// Returns the assigned slot: `Depth` for the depth family, otherwise
    /// `Color(COLOR_BASE + color_attachment_count)`.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if `name` is empty
    /// - `DuplicateAttachment` if `name` is already attached
    /// - `UnsupportedFormat` if `format` cannot be resolved
    /// - `DuplicateDepthAttachment` if a depth attachment already exists
    /// - `ResourceAllocation` if the image could not be created
    ///
    /// On error nothing is allocated and the registry is unchanged.
    pub fn attach<D: GraphicsDevice + ?Sized>(
        &mut self,
        device: &mut D,
        framebuffer: FramebufferHandle,
        width: u32,
        height: u32,
        name: &str,
        pixel_format: PixelFormat,
    ) -> Result<AttachmentSlot> {
        if name.is_empty() {
            engine_bail!(SOURCE, Error::InvalidState("attachment name is empty".to_string()));
        }
        if self.attachments.contains_key(name) {
            engine_bail!(SOURCE, Error::DuplicateAttachment(name.to_string()));
        }

        let resolved = format::resolve(pixel_format)
            .map_err(|err| engine_err!(SOURCE, err))?;

        if resolved.is_depth() {
            if let Some(existing) = &self.depth_attachment {
                engine_bail!(SOURCE, Error::DuplicateDepthAttachment(existing.clone()));
            }
        }

        let slot = if resolved.is_depth() {
            AttachmentSlot::Depth
        } else {
            AttachmentSlot::color(self.color_attachment_count)
        };

        let image = device
            .create_image(&ImageDesc {
                label: name.to_string(),
                width,
                height,
                format: pixel_format,
                layout: resolved.layout,
                datatype: resolved.datatype,
                filter: self.sampler.filter,
                wrap: self.sampler.wrap,
            })
            .map_err(|err| engine_err!(SOURCE, Error::ResourceAllocation(
                format!("attachment '{}': {}", name, err)
            )))?;
        let image = OwnedImage::new(image, self.releases.clone());

        if let Err(err) = device.attach_image(framebuffer, slot, image.handle()) {
            image.release(device);
            return Err(engine_err!(SOURCE, err));
        }

        self.attachments.insert(
            name.to_string(),
            Attachment::new(name.to_string(), image, pixel_format, resolved, slot),
        );
        self.creation_order.push(name.to_string());
        if resolved.is_depth() {
            self.depth_attachment = Some(name.to_string());
        } else {
            self.color_attachment_count += 1;
        }

        engine_trace!(SOURCE, "attached '{}' ({:?}) at {}", name, pixel_format, slot);
        Ok(slot)
    }

    /// Declare `names`, in order, as the active draw targets
    ///
    /// # Errors
    ///
    /// - `UnknownAttachment` if a name was never attached
    /// - `InvalidState` if a name is the depth attachment or listed twice
    ///
    /// Every name is checked before the device is touched, so on error the
    /// previous draw-target configuration is left unchanged.
    pub fn set_draw_targets<D: GraphicsDevice + ?Sized, S: AsRef<str>>(
        &mut self,
        device: &mut D,
        framebuffer: FramebufferHandle,
        names: &[S],
    ) -> Result<()> {
        let mut slots = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let slot = self.slot_of(name).map_err(|err| engine_err!(SOURCE, err))?;
            if slot.is_depth() {
                engine_bail!(SOURCE, Error::InvalidState(format!(
                    "depth attachment '{}' cannot be a draw target", name
                )));
            }
            if slots.contains(&slot) {
                engine_bail!(SOURCE, Error::InvalidState(format!(
                    "draw target '{}' listed twice", name
                )));
            }
            slots.push(slot);
        }

        device.set_draw_buffers(framebuffer, &slots)?;

        self.draw_target_names = names.iter().map(|n| n.as_ref().to_string()).collect();
        self.draw_targets = slots;
        Ok(())
    }

    // ===== LOOKUP =====

    /// Attachment by name
    pub fn get(&self, name: &str) -> Option<&Attachment> {
        self.attachments.get(name)
    }

    /// Slot of attachment `name`
    ///
    /// # Errors
    ///
    /// `UnknownAttachment` if `name` was never attached.
    pub fn slot_of(&self, name: &str) -> Result<AttachmentSlot> {
        self.attachments
            .get(name)
            .map(|attachment| attachment.slot())
            .ok_or_else(|| Error::UnknownAttachment(name.to_string()))
    }

    /// Texture unit attachment `name` is sampled from in read mode
    pub fn unit_index_of(&self, name: &str) -> Result<u32> {
        Ok(self.slot_of(name)?.texture_unit(self.color_attachment_count))
    }

    /// Attachments in creation order
    pub fn iter(&self) -> impl Iterator<Item = &Attachment> + '_ {
        self.creation_order
            .iter()
            .filter_map(move |name| self.attachments.get(name))
    }

    /// Attachment names in creation order
    pub fn names(&self) -> &[String] {
        &self.creation_order
    }

    /// Read-mode unit layout: `[color0 .. colorN-1, depth]`
    ///
    /// Returns `(unit, attachment)` pairs in increasing unit order.
    pub fn read_layout(&self) -> Vec<(u32, &Attachment)> {
        let mut ordered: Vec<&Attachment> = self.iter().collect();
        ordered.sort_by_key(|attachment| attachment.slot());
        ordered
            .into_iter()
            .map(|attachment| (attachment.slot().texture_unit(self.color_attachment_count), attachment))
            .collect()
    }

    // ===== COUNTS =====

    /// Number of non-depth attachments
    pub fn color_attachment_count(&self) -> u32 {
        self.color_attachment_count
    }

    /// Number of attachments (color + depth)
    pub fn len(&self) -> usize {
        self.creation_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creation_order.is_empty()
    }

    /// Name of the depth attachment, if any
    pub fn depth_attachment(&self) -> Option<&str> {
        self.depth_attachment.as_deref()
    }

    /// Active draw target slots
    pub fn draw_targets(&self) -> &[AttachmentSlot] {
        &self.draw_targets
    }

    /// Active draw target names
    pub fn draw_target_names(&self) -> &[String] {
        &self.draw_target_names
    }

    // ===== TEARDOWN =====

    /// Release every image now, in creation order
    pub fn release_all<D: GraphicsDevice + ?Sized>(&mut self, device: &mut D) {
        for name in self.creation_order.drain(..) {
            if let Some(attachment) = self.attachments.remove(&name) {
                attachment.release(device);
            }
        }
        self.reset_counts();
    }

    /// Drop every attachment, in creation order
    ///
    /// Their images land on the release queue in that order.
    pub fn discard_all(&mut self) {
        for name in self.creation_order.drain(..) {
            drop(self.attachments.remove(&name));
        }
        self.reset_counts();
    }

    fn reset_counts(&mut self) {
        self.color_attachment_count = 0;
        self.depth_attachment = None;
        self.draw_target_names.clear();
        self.draw_targets.clear();
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
