/// Framebuffer object handle and attachment slots
///
/// A framebuffer object groups images attached at fixed slots. Color
/// slots are numbered from the color base (slot 0) upward; there is a
/// single depth slot.

use std::fmt;
use slotmap::new_key_type;

new_key_type! {
    /// Handle to a framebuffer object owned by the device
    pub struct FramebufferHandle;
}

/// Output/input slot an image is attached at
///
/// Ordering: all color slots (by index) sort before the depth slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AttachmentSlot {
    /// Color slot `COLOR_BASE + index`
    Color(u32),
    /// The reserved depth slot
    Depth,
}

impl AttachmentSlot {
    /// Index of the first color slot
    pub const COLOR_BASE: u32 = 0;

    /// Color slot for the k-th color attachment
    pub fn color(k: u32) -> Self {
        AttachmentSlot::Color(Self::COLOR_BASE + k)
    }

    pub fn is_depth(&self) -> bool {
        matches!(self, AttachmentSlot::Depth)
    }

    /// Position among color attachments, `None` for depth
    pub fn color_index(&self) -> Option<u32> {
        match self {
            AttachmentSlot::Color(slot) => Some(slot - Self::COLOR_BASE),
            AttachmentSlot::Depth => None,
        }
    }

    /// Texture unit this slot is sampled from in read mode
    ///
    /// Layout is `[color0 .. colorN-1, depth]`: color slots map to their
    /// index, depth goes right after the last color attachment.
    pub fn texture_unit(&self, color_attachment_count: u32) -> u32 {
        match self.color_index() {
            Some(index) => index,
            None => color_attachment_count,
        }
    }
}

impl fmt::Display for AttachmentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachmentSlot::Color(slot) => write!(f, "COLOR{}", slot),
            AttachmentSlot::Depth => write!(f, "DEPTH"),
        }
    }
}
