/// Graphics device module - GPU primitives consumed by the framebuffer core

// Module declarations
pub mod graphics_device;
pub mod image;
pub mod shader;
pub mod frame_buffer;

// Headless device recording every call (tests and tooling, no GPU required)
pub mod mock_graphics_device;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use image::*;
pub use shader::*;
pub use frame_buffer::*;
