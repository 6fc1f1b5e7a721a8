/// Framebuffer attachment: one named GPU image plus its format and slot

use crate::graphics_device::{
    AttachmentSlot, ChannelLayout, GraphicsDevice, ImageHandle, PixelFormat, StorageDatatype,
};
use crate::framebuffer::format::ResolvedFormat;
use crate::framebuffer::release_queue::{PendingRelease, ReleaseQueue};

// ===== OWNED IMAGE =====

/// Exclusively owned GPU image
///
/// Not `Clone`/`Copy`. `release()` frees the image immediately; dropping an
/// unreleased image queues it on the render context's release queue.
#[derive(Debug)]
pub struct OwnedImage {
    handle: ImageHandle,
    releases: ReleaseQueue,
    released: bool,
}

impl OwnedImage {
    pub(crate) fn new(handle: ImageHandle, releases: ReleaseQueue) -> Self {
        Self { handle, releases, released: false }
    }

    /// Underlying device handle
    pub fn handle(&self) -> ImageHandle {
        self.handle
    }

    /// Release the image on `device` now
    pub fn release<D: GraphicsDevice + ?Sized>(mut self, device: &mut D) {
        device.destroy_image(self.handle);
        self.released = true;
    }
}

impl Drop for OwnedImage {
    fn drop(&mut self) {
        if !self.released {
            self.releases.push(PendingRelease::Image(self.handle));
        }
    }
}

// ===== ATTACHMENT =====

/// One named image of a framebuffer
///
/// Immutable once created; released when the owning framebuffer is
/// destroyed or dropped.
#[derive(Debug)]
pub struct Attachment {
    name: String,
    image: OwnedImage,
    pixel_format: PixelFormat,
    resolved: ResolvedFormat,
    slot: AttachmentSlot,
}

impl Attachment {
    pub(crate) fn new(
        name: String,
        image: OwnedImage,
        pixel_format: PixelFormat,
        resolved: ResolvedFormat,
        slot: AttachmentSlot,
    ) -> Self {
        Self { name, image, pixel_format, resolved, slot }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image(&self) -> ImageHandle {
        self.image.handle()
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    pub fn channel_layout(&self) -> ChannelLayout {
        self.resolved.layout
    }

    pub fn storage_datatype(&self) -> StorageDatatype {
        self.resolved.datatype
    }

    pub fn slot(&self) -> AttachmentSlot {
        self.slot
    }

    pub fn is_depth(&self) -> bool {
        self.slot.is_depth()
    }

    pub(crate) fn release<D: GraphicsDevice + ?Sized>(self, device: &mut D) {
        self.image.release(device);
    }
}
