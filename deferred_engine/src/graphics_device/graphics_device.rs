/// GraphicsDevice trait - the GPU primitives the framebuffer core is built on

use crate::error::Result;
use crate::graphics_device::{
    AttachmentSlot, FramebufferHandle, ImageDesc, ImageHandle, ImageInfo,
    ShaderHandle, ShaderProgramDesc,
};

/// Pixel rectangle on the current draw target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Left edge in pixels
    pub x: u32,
    /// Bottom edge in pixels
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Viewport {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }
}

/// Immediate-mode graphics device
///
/// Implemented by backends. All calls are synchronous state transitions on
/// the graphics context owned by the calling thread, so the trait carries no
/// `Send`/`Sync` bound.
pub trait GraphicsDevice {
    // ===== IMAGES =====

    /// Allocate a 2D image
    ///
    /// # Errors
    ///
    /// `Error::ResourceAllocation` if the image could not be created.
    fn create_image(&mut self, desc: &ImageDesc) -> Result<ImageHandle>;

    /// Release an image. Unknown handles are ignored.
    fn destroy_image(&mut self, image: ImageHandle);

    /// Properties of a live image
    fn image_info(&self, image: ImageHandle) -> Option<ImageInfo>;

    // ===== FRAMEBUFFER OBJECTS =====

    /// Allocate an empty framebuffer object
    fn create_framebuffer(&mut self, width: u32, height: u32) -> Result<FramebufferHandle>;

    /// Release a framebuffer object (attached images are not released)
    fn destroy_framebuffer(&mut self, framebuffer: FramebufferHandle);

    /// Attach `image` as render target at `slot`
    fn attach_image(
        &mut self,
        framebuffer: FramebufferHandle,
        slot: AttachmentSlot,
        image: ImageHandle,
    ) -> Result<()>;

    /// Declare the ordered list of color slots written by subsequent draws
    fn set_draw_buffers(
        &mut self,
        framebuffer: FramebufferHandle,
        slots: &[AttachmentSlot],
    ) -> Result<()>;

    /// Direct draw output to `framebuffer`, or to the screen with `None`
    fn bind_draw_framebuffer(&mut self, framebuffer: Option<FramebufferHandle>);

    /// Clear every attachment of `framebuffer`
    fn clear_framebuffer(
        &mut self,
        framebuffer: FramebufferHandle,
        color: [f32; 4],
        depth: f32,
    ) -> Result<()>;

    // ===== SAMPLING =====

    /// Expose `image` as a sampleable input at texture `unit`
    fn bind_sample_input(&mut self, unit: u32, image: ImageHandle) -> Result<()>;

    /// Stop exposing anything at texture `unit`
    fn unbind_sample_input(&mut self, unit: u32);

    // ===== SHADERS =====

    /// Compile and link a shader program
    fn create_shader_program(&mut self, desc: &ShaderProgramDesc) -> Result<ShaderHandle>;

    /// Release a shader program
    fn destroy_shader_program(&mut self, program: ShaderHandle);

    /// Make `program` the active program
    fn activate_shader(&mut self, program: ShaderHandle) -> Result<()>;

    /// Set an integer uniform of `program`
    fn set_int_uniform(&mut self, program: ShaderHandle, name: &str, value: i32) -> Result<()>;

    // ===== VIEWPORT =====

    /// Save the current viewport
    fn push_viewport(&mut self);

    /// Set the current viewport
    fn set_viewport(&mut self, viewport: Viewport);

    /// Restore the last saved viewport
    fn pop_viewport(&mut self);

    // ===== DRAWING =====

    /// Draw a unit quad covering the current viewport, UV-mapped 0..1
    fn render_fullscreen_quad(&mut self) -> Result<()>;
}
