/// Framebuffer binding: write mode, read mode, or both
///
/// - `WRITE` directs subsequent draw output to the framebuffer's draw
///   targets.
/// - `READ` exposes every attachment as a sampleable input with the fixed
///   unit layout `[color0 .. colorN-1, depth]` that lighting shaders rely on.
///
/// The write pass must end before the read pass begins, because both use
/// the same images: binding `READ` alone while a framebuffer is bound for
/// write first returns the draw target to the screen. `BOTH` is the
/// explicit opt-in for keeping both bindings. Symmetrically, binding `WRITE`
/// alone unbinds the units of the previous read layout, so nothing drawn
/// can be sampled in the same pass.

use bitflags::bitflags;
use crate::error::{Error, Result};
use crate::{engine_bail, engine_err, engine_trace};
use crate::graphics_device::{FramebufferHandle, GraphicsDevice, ImageHandle};
use crate::framebuffer::{Framebuffer, FramebufferState, RenderContext};

const SOURCE: &str = "deferred::RenderContext";

bitflags! {
    /// Which side of a framebuffer to bind
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BindMode: u32 {
        /// Draw into the declared draw targets
        const WRITE = 1 << 0;
        /// Sample the attachments
        const READ = 1 << 1;
        /// Write and read at the same time
        const BOTH = Self::WRITE.bits() | Self::READ.bits();
    }
}

// ===== UNIT LAYOUT =====

/// One sampleable input bound in read mode
#[derive(Debug, Clone, PartialEq)]
pub struct UnitBinding {
    pub unit: u32,
    pub name: String,
    pub image: ImageHandle,
}

/// Texture units bound by a read-mode bind, in increasing unit order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitLayout {
    bindings: Vec<UnitBinding>,
}

impl UnitLayout {
    pub fn bindings(&self) -> &[UnitBinding] {
        &self.bindings
    }

    /// Unit attachment `name` is bound at
    pub fn unit_of(&self, name: &str) -> Option<u32> {
        self.bindings
            .iter()
            .find(|binding| binding.name == name)
            .map(|binding| binding.unit)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

// ===== BINDING STATE =====

/// Current framebuffer binding of a render context
#[derive(Debug, Clone, Default, PartialEq)]
pub enum BindingState {
    /// Drawing to the screen, nothing sampled
    #[default]
    Unbound,
    BoundForWrite {
        framebuffer: FramebufferHandle,
    },
    BoundForRead {
        framebuffer: FramebufferHandle,
        layout: UnitLayout,
    },
    BoundForBoth {
        framebuffer: FramebufferHandle,
        layout: UnitLayout,
    },
}

impl BindingState {
    /// Bound framebuffer, `None` when unbound
    pub fn framebuffer(&self) -> Option<FramebufferHandle> {
        match self {
            BindingState::Unbound => None,
            BindingState::BoundForWrite { framebuffer }
            | BindingState::BoundForRead { framebuffer, .. }
            | BindingState::BoundForBoth { framebuffer, .. } => Some(*framebuffer),
        }
    }

    /// Mode of the current binding (empty when unbound)
    pub fn mode(&self) -> BindMode {
        match self {
            BindingState::Unbound => BindMode::empty(),
            BindingState::BoundForWrite { .. } => BindMode::WRITE,
            BindingState::BoundForRead { .. } => BindMode::READ,
            BindingState::BoundForBoth { .. } => BindMode::BOTH,
        }
    }

    /// Read layout, if bound for read
    pub fn read_layout(&self) -> Option<&UnitLayout> {
        match self {
            BindingState::BoundForRead { layout, .. }
            | BindingState::BoundForBoth { layout, .. } => Some(layout),
            _ => None,
        }
    }

    /// Returns true if `framebuffer` is bound with every flag of `mode`
    pub fn is_bound(&self, framebuffer: FramebufferHandle, mode: BindMode) -> bool {
        self.framebuffer() == Some(framebuffer) && self.mode().contains(mode)
    }
}

// ===== TRANSITIONS =====

impl<D: GraphicsDevice> RenderContext<D> {
    /// Bind `framebuffer` for `mode`
    ///
    /// # Errors
    ///
    /// - `InvalidState` if `mode` is empty, if `WRITE` is requested before
    ///   draw targets are declared, or if `READ` is requested on a
    ///   framebuffer without attachments
    /// - any device error; the context is then back at the screen target
    pub fn bind(&mut self, framebuffer: &Framebuffer, mode: BindMode) -> Result<()> {
        if mode.is_empty() {
            engine_bail!(SOURCE, Error::InvalidState("bind with an empty mode".to_string()));
        }
        if mode.contains(BindMode::WRITE) && framebuffer.state() != FramebufferState::Configured {
            engine_bail!(SOURCE, Error::InvalidState(
                "cannot bind for write: no draw targets declared".to_string()
            ));
        }
        if mode.contains(BindMode::READ) && framebuffer.attachment_count() == 0 {
            engine_bail!(SOURCE, Error::InvalidState(
                "cannot bind for read: framebuffer has no attachments".to_string()
            ));
        }

        engine_trace!(SOURCE, "bind {:?} -> {:?} ({:?})",
            self.binding.mode(), mode, framebuffer.handle());

        match self.apply_bind(framebuffer, mode) {
            Ok(state) => {
                self.binding = state;
                Ok(())
            }
            Err(err) => {
                self.device_mut().bind_draw_framebuffer(None);
                self.binding = BindingState::Unbound;
                Err(engine_err!(SOURCE, err))
            }
        }
    }

    fn apply_bind(&mut self, framebuffer: &Framebuffer, mode: BindMode) -> Result<BindingState> {
        let handle = framebuffer.handle();
        let previous_units: Vec<u32> = self
            .binding
            .read_layout()
            .map(|layout| layout.bindings().iter().map(|binding| binding.unit).collect())
            .unwrap_or_default();

        let layout = if mode.contains(BindMode::READ) {
            if !mode.contains(BindMode::WRITE) && self.binding.mode().contains(BindMode::WRITE) {
                // End the write pass before sampling
                self.device_mut().bind_draw_framebuffer(None);
            }

            let mut bindings = Vec::with_capacity(framebuffer.attachment_count());
            for (unit, attachment) in framebuffer.registry().read_layout() {
                self.device_mut().bind_sample_input(unit, attachment.image())?;
                bindings.push(UnitBinding {
                    unit,
                    name: attachment.name().to_string(),
                    image: attachment.image(),
                });
            }
            Some(UnitLayout { bindings })
        } else {
            None
        };

        // Units of the previous read layout that the new binding does not cover
        let kept = layout.as_ref().map_or(0, UnitLayout::len) as u32;
        for unit in previous_units.into_iter().filter(|unit| *unit >= kept) {
            self.device_mut().unbind_sample_input(unit);
        }

        if mode.contains(BindMode::WRITE) {
            self.device_mut().bind_draw_framebuffer(Some(handle));
        }

        Ok(match layout {
            Some(layout) if mode.contains(BindMode::WRITE) => {
                BindingState::BoundForBoth { framebuffer: handle, layout }
            }
            Some(layout) => BindingState::BoundForRead { framebuffer: handle, layout },
            None => BindingState::BoundForWrite { framebuffer: handle },
        })
    }

    /// Return to the screen target and drop the read layout
    pub fn unbind(&mut self) {
        if self.binding == BindingState::Unbound {
            return;
        }
        engine_trace!(SOURCE, "unbind {:?}", self.binding.framebuffer());
        self.device_mut().bind_draw_framebuffer(None);
        self.binding = BindingState::Unbound;
    }

    /// Alias of `unbind()`
    pub fn bind_default(&mut self) {
        self.unbind();
    }
}

#[cfg(test)]
#[path = "binding_tests.rs"]
mod tests;
