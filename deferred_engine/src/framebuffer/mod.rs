/// Framebuffer module - G-buffer attachments, binding and preview

// Module declarations
pub mod format;
pub mod attachment;
pub mod registry;
pub mod framebuffer;
pub mod render_context;
pub mod binding;
pub mod preview;
pub mod release_queue;

// Re-exports
pub use format::ResolvedFormat;
pub use attachment::*;
pub use registry::*;
pub use framebuffer::*;
pub use render_context::*;
pub use binding::*;
pub use preview::*;
pub use release_queue::*;
