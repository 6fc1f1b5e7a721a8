/*!
# Deferred Engine

Offscreen multi-target framebuffers for deferred rendering.

A geometry pass writes per-pixel surface data into the attachments of a
`Framebuffer`; a lighting pass then samples those attachments at fixed
texture units. This crate owns the attachments, derives their formats,
assigns their slots and switches a framebuffer between write and read
binding. A diagnostic blit previews any attachment on screen.

## Architecture

- **GraphicsDevice**: GPU primitives (images, framebuffer objects, shaders,
  viewport, full-screen quad) implemented by backends
- **Framebuffer**: owns named attachments through an `AttachmentRegistry`
- **RenderContext**: owns the device and the current binding (`bind` / `unbind`)
- **AttachmentPreview**: blits one attachment into a screen rectangle

## Frame

```no_run
use deferred_engine::deferred::{Config, RenderContext};
use deferred_engine::deferred::device::{MockGraphicsDevice, PixelFormat, Viewport};
use deferred_engine::deferred::framebuffer::{AttachmentPreview, BindMode, Framebuffer};

let mut ctx = RenderContext::new(MockGraphicsDevice::new(800, 600), Config::default());
let mut gbuffer = Framebuffer::new(&mut ctx, 800, 600)?;
gbuffer.attach(&mut ctx, "depth", PixelFormat::D32_SFLOAT)?;
gbuffer.attach(&mut ctx, "diffuse", PixelFormat::R32G32B32_SFLOAT)?;
gbuffer.set_draw_targets(&mut ctx, &["diffuse"])?;
let preview = AttachmentPreview::new(&mut ctx)?;

ctx.bind(&gbuffer, BindMode::WRITE)?;
gbuffer.clear(&mut ctx)?;
// ... geometry pass ...
ctx.unbind();

ctx.bind(&gbuffer, BindMode::READ)?;
// ... lighting pass samples diffuse at unit 0, depth at unit 1 ...
preview.show(&mut ctx, &gbuffer, "diffuse", Viewport::new(0, 0, 400, 300))?;
ctx.unbind();

preview.destroy(&mut ctx);
gbuffer.destroy(&mut ctx);
# Ok::<(), deferred_engine::deferred::Error>(())
```
*/

// Internal modules
mod error;
mod engine;
mod config;
pub mod log;
pub mod graphics_device;
pub mod framebuffer;

// Main deferred namespace module
pub mod deferred {
    // Error types
    pub use crate::error::{Error, Result};

    // Logger host
    pub use crate::engine::Engine;

    // Configuration
    pub use crate::config::Config;

    // Render context (device + current binding)
    pub use crate::framebuffer::RenderContext;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Device primitives
    pub mod device {
        pub use crate::graphics_device::*;
        pub use crate::graphics_device::mock_graphics_device::{
            DeviceCommand, MockGraphicsDevice,
        };
    }

    // Framebuffer, binding and preview
    pub mod framebuffer {
        pub use crate::framebuffer::*;
        pub use crate::framebuffer::format::{resolve, channel_layout, storage_datatype};
    }
}

// Re-export math library at crate root
pub use glam;
