/// Attachment preview - draws one attachment into a screen rectangle
///
/// Diagnostic blit: the attachment's texture unit is handed to a
/// pass-through program, which samples it over a full-screen quad drawn
/// into the requested viewport. Attachments and draw targets are never
/// modified.

use crate::error::{Error, Result};
use crate::{engine_bail, engine_err};
use crate::graphics_device::{GraphicsDevice, ShaderHandle, Viewport};
use crate::framebuffer::{BindMode, Framebuffer, RenderContext};

const SOURCE: &str = "deferred::AttachmentPreview";

/// Integer uniform naming the texture unit the blit program samples
pub const TEXTURE_UNIT_UNIFORM: &str = "uTextureUnit";

/// Maximum number of tiles `show_grid` lays out (screen quadrants)
pub const GRID_TILES: usize = 4;

pub struct AttachmentPreview {
    program: ShaderHandle,
}

impl AttachmentPreview {
    /// Create the pass-through program described by `Config::blit_shader`
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the program does not register `uTextureUnit`
    /// - `ResourceAllocation` if the program could not be created
    pub fn new<D: GraphicsDevice>(ctx: &mut RenderContext<D>) -> Result<Self> {
        let desc = ctx.config().blit_shader.clone();
        if !desc.has_uniform(TEXTURE_UNIT_UNIFORM) {
            engine_bail!(SOURCE, Error::InvalidState(format!(
                "blit program must register the '{}' uniform", TEXTURE_UNIT_UNIFORM
            )));
        }

        let program = ctx
            .device_mut()
            .create_shader_program(&desc)
            .map_err(|err| engine_err!(SOURCE, Error::ResourceAllocation(
                format!("blit program: {}", err)
            )))?;

        Ok(Self { program })
    }

    pub fn program(&self) -> ShaderHandle {
        self.program
    }

    /// Draw attachment `name` of `framebuffer` into `viewport`
    ///
    /// Binds `framebuffer` for read if it is not already. The previous
    /// viewport is restored before returning, on success and on error.
    /// Returns the texture unit that was sampled.
    ///
    /// # Errors
    ///
    /// - `UnknownAttachment` if `name` was never attached (no GPU call made)
    /// - `InvalidState` if a framebuffer is bound for write only, or another
    ///   one is bound for write (a geometry pass is in progress)
    pub fn show<D: GraphicsDevice>(
        &self,
        ctx: &mut RenderContext<D>,
        framebuffer: &Framebuffer,
        name: &str,
        viewport: Viewport,
    ) -> Result<u32> {
        let unit = framebuffer
            .unit_index_of(name)
            .map_err(|err| engine_err!(SOURCE, err))?;

        let binding = ctx.binding_state();
        if !binding.is_bound(framebuffer.handle(), BindMode::READ) {
            if binding.mode().contains(BindMode::WRITE) {
                engine_bail!(SOURCE, Error::InvalidState(format!(
                    "cannot preview '{}' while a framebuffer is bound for write", name
                )));
            }
            ctx.bind(framebuffer, BindMode::READ)?;
        }

        let device = ctx.device_mut();
        device.push_viewport();
        device.set_viewport(viewport);
        let drawn = self.draw_tile(device, unit);
        device.pop_viewport();
        drawn.map_err(|err| engine_err!(SOURCE, err))?;

        Ok(unit)
    }

    fn draw_tile<D: GraphicsDevice>(&self, device: &mut D, unit: u32) -> Result<()> {
        let unit_value = i32::try_from(unit).map_err(|_| {
            Error::InvalidState(format!("texture unit {} out of range", unit))
        })?;
        device.activate_shader(self.program)?;
        device.set_int_uniform(self.program, TEXTURE_UNIT_UNIFORM, unit_value)?;
        device.render_fullscreen_quad()
    }

    /// Tile up to four attachments into the screen quadrants
    ///
    /// Order: top-left, top-right, bottom-left, bottom-right. Returns the
    /// sampled unit of each tile.
    ///
    /// # Errors
    ///
    /// `InvalidState` if more than four names are given; otherwise as `show`.
    pub fn show_grid<D: GraphicsDevice, S: AsRef<str>>(
        &self,
        ctx: &mut RenderContext<D>,
        framebuffer: &Framebuffer,
        names: &[S],
        screen_width: u32,
        screen_height: u32,
    ) -> Result<Vec<u32>> {
        if names.len() > GRID_TILES {
            engine_bail!(SOURCE, Error::InvalidState(format!(
                "show_grid takes at most {} attachments, got {}", GRID_TILES, names.len()
            )));
        }

        let tile_width = screen_width / 2;
        let tile_height = screen_height / 2;

        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let column = (i % 2) as u32;
                let row = (i / 2) as u32;
                // Viewport origin is bottom-left: row 0 is the upper half
                let viewport = Viewport::new(
                    tile_width * column,
                    tile_height * (1 - row),
                    tile_width,
                    tile_height,
                );
                self.show(ctx, framebuffer, name.as_ref(), viewport)
            })
            .collect()
    }

    /// Release the blit program
    pub fn destroy<D: GraphicsDevice>(self, ctx: &mut RenderContext<D>) {
        ctx.device_mut().destroy_shader_program(self.program);
    }
}

#[cfg(test)]
#[path = "preview_tests.rs"]
mod tests;
