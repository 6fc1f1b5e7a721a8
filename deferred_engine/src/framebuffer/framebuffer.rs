/// Framebuffer (G-buffer) - a set of named image attachments
///
/// Lifecycle:
///
/// ```text
/// CREATED --attach + set_draw_targets--> CONFIGURED --bind--> ACTIVE (WRITE <-> READ)
///                                                        \--destroy--> DESTROYED
/// ```
///
/// `destroy` consumes the framebuffer, so no transition out of DESTROYED
/// can be expressed. Dropping a framebuffer without `destroy` queues its
/// images and the framebuffer object on the context's release queue; they
/// are released on the context's next device access.

use crate::error::{Error, Result};
use crate::{engine_bail, engine_debug, engine_err, engine_info};
use crate::graphics_device::{AttachmentSlot, FramebufferHandle, GraphicsDevice, PixelFormat};
use crate::framebuffer::{Attachment, AttachmentRegistry, BindMode, RenderContext};
use crate::framebuffer::release_queue::{PendingRelease, ReleaseQueue};

const SOURCE: &str = "deferred::Framebuffer";

/// Configuration state of a framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramebufferState {
    /// Framebuffer object exists, draw targets not declared yet
    Created,
    /// Draw targets declared; can be bound for write
    Configured,
}

/// Offscreen render target owning its attachment images
#[derive(Debug)]
pub struct Framebuffer {
    handle: FramebufferHandle,
    width: u32,
    height: u32,
    registry: AttachmentRegistry,
    state: FramebufferState,
    releases: ReleaseQueue,
    released: bool,
}

impl Framebuffer {
    /// Create an empty `width` x `height` framebuffer
    ///
    /// # Errors
    ///
    /// - `InvalidState` if either dimension is zero
    /// - `ResourceAllocation` if the framebuffer object could not be created
    pub fn new<D: GraphicsDevice>(ctx: &mut RenderContext<D>, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            engine_bail!(SOURCE, Error::InvalidState(format!(
                "framebuffer size must be non-zero ({}x{})", width, height
            )));
        }

        let handle = ctx
            .device_mut()
            .create_framebuffer(width, height)
            .map_err(|err| engine_err!(SOURCE, Error::ResourceAllocation(
                format!("framebuffer {}x{}: {}", width, height, err)
            )))?;

        engine_info!(SOURCE, "Created framebuffer {:?} ({}x{})", handle, width, height);

        let releases = ctx.release_queue().clone();
        Ok(Self {
            handle,
            width,
            height,
            registry: AttachmentRegistry::new(releases.clone(), ctx.config().attachment_sampler),
            state: FramebufferState::Created,
            releases,
            released: false,
        })
    }

    /// Allocate an image named `name` with `format` and attach it
    ///
    /// The image matches the framebuffer size. Returns the assigned slot.
    /// Failures are local: the framebuffer is left unchanged and nothing is
    /// allocated (see `AttachmentRegistry::attach`).
    ///
    /// # Errors
    ///
    /// Additionally `InvalidState` if the framebuffer is currently bound.
    pub fn attach<D: GraphicsDevice>(
        &mut self,
        ctx: &mut RenderContext<D>,
        name: &str,
        format: PixelFormat,
    ) -> Result<AttachmentSlot> {
        if ctx.binding_state().framebuffer() == Some(self.handle) {
            engine_bail!(SOURCE, Error::InvalidState(format!(
                "cannot attach '{}' while the framebuffer is bound", name
            )));
        }

        self.registry.attach(
            ctx.device_mut(),
            self.handle,
            self.width,
            self.height,
            name,
            format,
        )
    }

    /// Declare `names`, in order, as the write destinations of draw calls
    ///
    /// Attachments not listed stay allocated but are not written.
    ///
    /// # Errors
    ///
    /// `UnknownAttachment` if any name was never attached; the previous
    /// draw-target configuration is then unchanged.
    pub fn set_draw_targets<D: GraphicsDevice, S: AsRef<str>>(
        &mut self,
        ctx: &mut RenderContext<D>,
        names: &[S],
    ) -> Result<()> {
        self.registry.set_draw_targets(ctx.device_mut(), self.handle, names)?;
        self.state = FramebufferState::Configured;
        Ok(())
    }

    /// Clear every attachment to the configured clear color / depth
    ///
    /// # Errors
    ///
    /// `InvalidState` unless the framebuffer is bound for write.
    pub fn clear<D: GraphicsDevice>(&self, ctx: &mut RenderContext<D>) -> Result<()> {
        if !ctx.binding_state().is_bound(self.handle, BindMode::WRITE) {
            engine_bail!(SOURCE, Error::InvalidState(
                "clear requires the framebuffer to be bound for write".to_string()
            ));
        }

        let color = ctx.config().clear_color.to_array();
        let depth = ctx.config().clear_depth;
        ctx.device_mut().clear_framebuffer(self.handle, color, depth)
    }

    /// Release every attachment image (creation order), then the framebuffer object
    ///
    /// If the framebuffer is bound, the context first returns to the screen.
    pub fn destroy<D: GraphicsDevice>(mut self, ctx: &mut RenderContext<D>) {
        if ctx.binding_state().framebuffer() == Some(self.handle) {
            ctx.unbind();
        }

        let attachment_count = self.registry.len();
        self.registry.release_all(ctx.device_mut());
        ctx.device_mut().destroy_framebuffer(self.handle);
        self.released = true;

        engine_info!(SOURCE, "Destroyed framebuffer {:?} ({} attachments)",
            self.handle, attachment_count);
    }

    // ===== ACCESSORS =====

    pub fn handle(&self) -> FramebufferHandle {
        self.handle
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn state(&self) -> FramebufferState {
        self.state
    }

    /// Number of non-depth attachments
    pub fn color_attachment_count(&self) -> u32 {
        self.registry.color_attachment_count()
    }

    /// Number of attachments (color + depth)
    pub fn attachment_count(&self) -> usize {
        self.registry.len()
    }

    pub fn has_depth_attachment(&self) -> bool {
        self.registry.depth_attachment().is_some()
    }

    pub fn attachment(&self, name: &str) -> Option<&Attachment> {
        self.registry.get(name)
    }

    /// Attachments in creation order
    pub fn attachments(&self) -> impl Iterator<Item = &Attachment> + '_ {
        self.registry.iter()
    }

    /// Active draw target slots
    pub fn draw_targets(&self) -> &[AttachmentSlot] {
        self.registry.draw_targets()
    }

    /// Slot of attachment `name` (`UnknownAttachment` if never attached)
    pub fn slot_of(&self, name: &str) -> Result<AttachmentSlot> {
        self.registry.slot_of(name)
    }

    /// Texture unit of attachment `name` in read mode
    pub fn unit_index_of(&self, name: &str) -> Result<u32> {
        self.registry.unit_index_of(name)
    }

    pub fn registry(&self) -> &AttachmentRegistry {
        &self.registry
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        let attachment_count = self.registry.len();
        self.registry.discard_all();
        self.releases.push(PendingRelease::Framebuffer(self.handle));

        engine_debug!(SOURCE, "Framebuffer {:?} dropped without destroy, {} attachments queued for release",
            self.handle, attachment_count);
    }
}

#[cfg(test)]
#[path = "framebuffer_tests.rs"]
mod tests;
