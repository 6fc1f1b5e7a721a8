/// Render context - explicit owner of the device and the current binding
///
/// There is exactly one "current" framebuffer binding per graphics context.
/// Instead of a process-wide flag, that state lives here and every
/// transition takes `&mut RenderContext`.
///
/// The context also owns the release queue of the framebuffers created
/// through it. Objects dropped without `destroy` are released the next time
/// the device is accessed mutably (`device_mut`, and every binding or
/// framebuffer operation), or explicitly with `release_pending`.
///
/// # Threading
///
/// A render context must only be used from the thread that owns the
/// graphics context. Binding is not reentrant: do not rebind while a pass
/// is being recorded through `device_mut()`. Holding `&mut self` for the
/// duration of a transition is what enforces this.

use crate::config::Config;
use crate::{engine_debug, engine_info};
use crate::graphics_device::GraphicsDevice;
use crate::framebuffer::binding::BindingState;
use crate::framebuffer::release_queue::{PendingRelease, ReleaseQueue};

const SOURCE: &str = "deferred::RenderContext";

pub struct RenderContext<D: GraphicsDevice> {
    device: D,
    config: Config,
    releases: ReleaseQueue,
    pub(crate) binding: BindingState,
}

impl<D: GraphicsDevice> RenderContext<D> {
    /// Wrap `device`; starts bound to the screen
    pub fn new(device: D, config: Config) -> Self {
        engine_info!(SOURCE, "Render context created for '{}'", config.app_name);
        Self {
            device,
            config,
            releases: ReleaseQueue::new(),
            binding: BindingState::Unbound,
        }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Raw device access for the caller's own draw calls
    ///
    /// Pending releases are flushed first.
    pub fn device_mut(&mut self) -> &mut D {
        self.release_pending();
        &mut self.device
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current framebuffer binding
    pub fn binding_state(&self) -> &BindingState {
        &self.binding
    }

    /// Queue shared with the framebuffers created through this context
    pub fn release_queue(&self) -> &ReleaseQueue {
        &self.releases
    }

    /// Number of dropped objects waiting to be released
    pub fn pending_releases(&self) -> usize {
        self.releases.len()
    }

    /// Release every object dropped since the last flush, oldest first
    ///
    /// Releasing the bound framebuffer returns the context to the screen.
    /// Returns the number of objects released.
    pub fn release_pending(&mut self) -> usize {
        let pending = self.releases.take();
        for release in &pending {
            match *release {
                PendingRelease::Image(image) => self.device.destroy_image(image),
                PendingRelease::Framebuffer(framebuffer) => {
                    if self.binding.framebuffer() == Some(framebuffer) {
                        self.device.bind_draw_framebuffer(None);
                        self.binding = BindingState::Unbound;
                    }
                    self.device.destroy_framebuffer(framebuffer);
                }
            }
        }

        if !pending.is_empty() {
            engine_debug!(SOURCE, "Released {} dropped GPU objects", pending.len());
        }
        pending.len()
    }

    /// Flush pending releases, then return the device
    pub fn into_device(mut self) -> D {
        self.release_pending();
        self.device
    }
}
