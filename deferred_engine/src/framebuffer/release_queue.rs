/// Deferred release of dropped GPU objects
///
/// Releasing a GPU object needs the device, which the render context owns.
/// Framebuffers and attachment images therefore keep a clone of their
/// context's queue; when they are dropped without an explicit release their
/// handles are queued here, and the context releases them on its next
/// device access (or `RenderContext::release_pending`).

use std::cell::RefCell;
use std::rc::Rc;
use crate::graphics_device::{FramebufferHandle, ImageHandle};

/// One GPU object waiting to be released
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingRelease {
    Image(ImageHandle),
    Framebuffer(FramebufferHandle),
}

/// Shared, single-threaded queue of pending releases
///
/// Clones share the same queue. Releases are kept in push order.
#[derive(Debug, Clone, Default)]
pub struct ReleaseQueue {
    pending: Rc<RefCell<Vec<PendingRelease>>>,
}

impl ReleaseQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, release: PendingRelease) {
        self.pending.borrow_mut().push(release);
    }

    /// Remove and return every pending release, oldest first
    pub(crate) fn take(&self) -> Vec<PendingRelease> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }

    /// Number of queued releases
    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }
}
