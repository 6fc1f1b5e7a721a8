/// Mock GraphicsDevice (no GPU required)
///
/// Tracks every object it creates in slot maps and records every call as a
/// `DeviceCommand`, so framebuffer and binding behavior can be asserted
/// without a graphics context. Allocation failures can be injected to
/// exercise the resource-allocation error paths.

use slotmap::SlotMap;
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use crate::engine_bail;
use crate::graphics_device::{
    AttachmentSlot, FramebufferHandle, GraphicsDevice, ImageDesc, ImageHandle,
    ImageInfo, ShaderHandle, ShaderProgramDesc, Viewport,
};

// ============================================================================
// Recorded commands
// ============================================================================

/// One recorded device call
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCommand {
    CreateImage { image: ImageHandle, info: ImageInfo },
    DestroyImage(ImageHandle),
    CreateFramebuffer(FramebufferHandle),
    DestroyFramebuffer(FramebufferHandle),
    AttachImage { framebuffer: FramebufferHandle, slot: AttachmentSlot, image: ImageHandle },
    SetDrawBuffers { framebuffer: FramebufferHandle, slots: Vec<AttachmentSlot> },
    BindDrawFramebuffer(Option<FramebufferHandle>),
    ClearFramebuffer { framebuffer: FramebufferHandle, color: [f32; 4], depth: f32 },
    BindSampleInput { unit: u32, image: ImageHandle },
    UnbindSampleInput { unit: u32 },
    CreateShaderProgram(ShaderHandle),
    DestroyShaderProgram(ShaderHandle),
    ActivateShader(ShaderHandle),
    SetIntUniform { program: ShaderHandle, name: String, value: i32 },
    PushViewport,
    SetViewport(Viewport),
    PopViewport,
    RenderFullscreenQuad { viewport: Viewport, program: Option<ShaderHandle> },
}

// ============================================================================
// Mock objects
// ============================================================================

#[derive(Debug)]
pub struct MockFramebufferObject {
    pub width: u32,
    pub height: u32,
    pub attachments: FxHashMap<AttachmentSlot, ImageHandle>,
    pub draw_buffers: Vec<AttachmentSlot>,
}

#[derive(Debug)]
pub struct MockShaderProgram {
    pub desc: ShaderProgramDesc,
    pub int_uniforms: FxHashMap<String, i32>,
}

// ============================================================================
// Mock GraphicsDevice
// ============================================================================

/// Mock GraphicsDevice that tracks created objects and binding state
#[derive(Debug)]
pub struct MockGraphicsDevice {
    images: SlotMap<ImageHandle, ImageInfo>,
    framebuffers: SlotMap<FramebufferHandle, MockFramebufferObject>,
    programs: SlotMap<ShaderHandle, MockShaderProgram>,

    bound_draw_framebuffer: Option<FramebufferHandle>,
    texture_units: FxHashMap<u32, ImageHandle>,
    active_program: Option<ShaderHandle>,
    viewport: Viewport,
    viewport_stack: Vec<Viewport>,

    commands: Vec<DeviceCommand>,

    /// Remaining successful image allocations (`None` = unlimited)
    image_budget: Option<usize>,
    fail_framebuffer: bool,
    fail_shader: bool,
    fail_quad: bool,
}

impl MockGraphicsDevice {
    /// Create a mock device whose screen is `width` x `height`
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            images: SlotMap::with_key(),
            framebuffers: SlotMap::with_key(),
            programs: SlotMap::with_key(),
            bound_draw_framebuffer: None,
            texture_units: FxHashMap::default(),
            active_program: None,
            viewport: Viewport::new(0, 0, width, height),
            viewport_stack: Vec::new(),
            commands: Vec::new(),
            image_budget: None,
            fail_framebuffer: false,
            fail_shader: false,
            fail_quad: false,
        }
    }

    // ===== FAILURE INJECTION =====

    /// Let `count` more image allocations succeed, fail every one after
    pub fn fail_image_allocations_after(&mut self, count: usize) {
        self.image_budget = Some(count);
    }

    /// Fail every subsequent framebuffer object allocation
    pub fn fail_framebuffer_allocation(&mut self) {
        self.fail_framebuffer = true;
    }

    /// Fail every subsequent shader program creation
    pub fn fail_shader_compilation(&mut self) {
        self.fail_shader = true;
    }

    /// Fail every subsequent full-screen quad draw
    pub fn fail_quad_draws(&mut self) {
        self.fail_quad = true;
    }

    // ===== INSPECTION =====

    /// Every call recorded so far
    pub fn commands(&self) -> &[DeviceCommand] {
        &self.commands
    }

    /// Forget recorded calls (state is kept)
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    pub fn live_image_count(&self) -> usize {
        self.images.len()
    }

    pub fn live_framebuffer_count(&self) -> usize {
        self.framebuffers.len()
    }

    pub fn live_shader_count(&self) -> usize {
        self.programs.len()
    }

    pub fn is_image_alive(&self, image: ImageHandle) -> bool {
        self.images.contains_key(image)
    }

    pub fn framebuffer(&self, framebuffer: FramebufferHandle) -> Option<&MockFramebufferObject> {
        self.framebuffers.get(framebuffer)
    }

    pub fn bound_draw_framebuffer(&self) -> Option<FramebufferHandle> {
        self.bound_draw_framebuffer
    }

    /// Image bound at texture `unit`
    pub fn texture_unit(&self, unit: u32) -> Option<ImageHandle> {
        self.texture_units.get(&unit).copied()
    }

    /// All texture unit bindings, sorted by unit
    pub fn texture_units(&self) -> Vec<(u32, ImageHandle)> {
        let mut units: Vec<(u32, ImageHandle)> =
            self.texture_units.iter().map(|(unit, image)| (*unit, *image)).collect();
        units.sort_by_key(|(unit, _)| *unit);
        units
    }

    pub fn active_program(&self) -> Option<ShaderHandle> {
        self.active_program
    }

    pub fn int_uniform(&self, program: ShaderHandle, name: &str) -> Option<i32> {
        self.programs.get(program)?.int_uniforms.get(name).copied()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Number of saved viewports
    pub fn viewport_depth(&self) -> usize {
        self.viewport_stack.len()
    }

    /// Viewports of every full-screen quad drawn so far
    pub fn quad_draws(&self) -> Vec<Viewport> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DeviceCommand::RenderFullscreenQuad { viewport, .. } => Some(*viewport),
                _ => None,
            })
            .collect()
    }
}

impl Default for MockGraphicsDevice {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_image(&mut self, desc: &ImageDesc) -> Result<ImageHandle> {
        if let Some(budget) = self.image_budget.as_mut() {
            if *budget == 0 {
                engine_bail!("deferred::mock", Error::ResourceAllocation(format!(
                    "image '{}' ({}x{})", desc.label, desc.width, desc.height
                )));
            }
            *budget -= 1;
        }
        if desc.width == 0 || desc.height == 0 {
            engine_bail!("deferred::mock", Error::ResourceAllocation(format!(
                "image '{}' has zero extent ({}x{})", desc.label, desc.width, desc.height
            )));
        }

        let info = ImageInfo::from(desc);
        let image = self.images.insert(info.clone());
        self.commands.push(DeviceCommand::CreateImage { image, info });
        Ok(image)
    }

    fn destroy_image(&mut self, image: ImageHandle) {
        if self.images.remove(image).is_some() {
            self.texture_units.retain(|_, bound| *bound != image);
            for framebuffer in self.framebuffers.values_mut() {
                framebuffer.attachments.retain(|_, attached| *attached != image);
            }
            self.commands.push(DeviceCommand::DestroyImage(image));
        }
    }

    fn image_info(&self, image: ImageHandle) -> Option<ImageInfo> {
        self.images.get(image).cloned()
    }

    fn create_framebuffer(&mut self, width: u32, height: u32) -> Result<FramebufferHandle> {
        if self.fail_framebuffer {
            engine_bail!("deferred::mock", Error::ResourceAllocation(
                "framebuffer object".to_string()
            ));
        }

        let framebuffer = self.framebuffers.insert(MockFramebufferObject {
            width,
            height,
            attachments: FxHashMap::default(),
            draw_buffers: Vec::new(),
        });
        self.commands.push(DeviceCommand::CreateFramebuffer(framebuffer));
        Ok(framebuffer)
    }

    fn destroy_framebuffer(&mut self, framebuffer: FramebufferHandle) {
        if self.framebuffers.remove(framebuffer).is_some() {
            if self.bound_draw_framebuffer == Some(framebuffer) {
                self.bound_draw_framebuffer = None;
            }
            self.commands.push(DeviceCommand::DestroyFramebuffer(framebuffer));
        }
    }

    fn attach_image(
        &mut self,
        framebuffer: FramebufferHandle,
        slot: AttachmentSlot,
        image: ImageHandle,
    ) -> Result<()> {
        if !self.images.contains_key(image) {
            engine_bail!("deferred::mock", "attach_image: unknown image {:?}", image);
        }
        let Some(object) = self.framebuffers.get_mut(framebuffer) else {
            engine_bail!("deferred::mock", "attach_image: unknown framebuffer {:?}", framebuffer);
        };

        object.attachments.insert(slot, image);
        self.commands.push(DeviceCommand::AttachImage { framebuffer, slot, image });
        Ok(())
    }

    fn set_draw_buffers(
        &mut self,
        framebuffer: FramebufferHandle,
        slots: &[AttachmentSlot],
    ) -> Result<()> {
        let Some(object) = self.framebuffers.get_mut(framebuffer) else {
            engine_bail!("deferred::mock", "set_draw_buffers: unknown framebuffer {:?}", framebuffer);
        };
        if let Some(missing) = slots.iter().find(|slot| !object.attachments.contains_key(*slot)) {
            engine_bail!("deferred::mock", "set_draw_buffers: nothing attached at {}", missing);
        }

        object.draw_buffers = slots.to_vec();
        self.commands.push(DeviceCommand::SetDrawBuffers {
            framebuffer,
            slots: slots.to_vec(),
        });
        Ok(())
    }

    fn bind_draw_framebuffer(&mut self, framebuffer: Option<FramebufferHandle>) {
        self.bound_draw_framebuffer = framebuffer;
        self.commands.push(DeviceCommand::BindDrawFramebuffer(framebuffer));
    }

    fn clear_framebuffer(
        &mut self,
        framebuffer: FramebufferHandle,
        color: [f32; 4],
        depth: f32,
    ) -> Result<()> {
        if !self.framebuffers.contains_key(framebuffer) {
            engine_bail!("deferred::mock", "clear_framebuffer: unknown framebuffer {:?}", framebuffer);
        }
        self.commands.push(DeviceCommand::ClearFramebuffer { framebuffer, color, depth });
        Ok(())
    }

    fn bind_sample_input(&mut self, unit: u32, image: ImageHandle) -> Result<()> {
        if !self.images.contains_key(image) {
            engine_bail!("deferred::mock", "bind_sample_input: unknown image {:?}", image);
        }
        self.texture_units.insert(unit, image);
        self.commands.push(DeviceCommand::BindSampleInput { unit, image });
        Ok(())
    }

    fn unbind_sample_input(&mut self, unit: u32) {
        self.texture_units.remove(&unit);
        self.commands.push(DeviceCommand::UnbindSampleInput { unit });
    }

    fn create_shader_program(&mut self, desc: &ShaderProgramDesc) -> Result<ShaderHandle> {
        if self.fail_shader {
            engine_bail!("deferred::mock", Error::ResourceAllocation(
                format!("shader program ({}, {})", desc.vertex, desc.fragment)
            ));
        }

        let program = self.programs.insert(MockShaderProgram {
            desc: desc.clone(),
            int_uniforms: FxHashMap::default(),
        });
        self.commands.push(DeviceCommand::CreateShaderProgram(program));
        Ok(program)
    }

    fn destroy_shader_program(&mut self, program: ShaderHandle) {
        if self.programs.remove(program).is_some() {
            if self.active_program == Some(program) {
                self.active_program = None;
            }
            self.commands.push(DeviceCommand::DestroyShaderProgram(program));
        }
    }

    fn activate_shader(&mut self, program: ShaderHandle) -> Result<()> {
        if !self.programs.contains_key(program) {
            engine_bail!("deferred::mock", "activate_shader: unknown program {:?}", program);
        }
        self.active_program = Some(program);
        self.commands.push(DeviceCommand::ActivateShader(program));
        Ok(())
    }

    fn set_int_uniform(&mut self, program: ShaderHandle, name: &str, value: i32) -> Result<()> {
        let Some(object) = self.programs.get_mut(program) else {
            engine_bail!("deferred::mock", "set_int_uniform: unknown program {:?}", program);
        };
        if !object.desc.has_uniform(name) {
            engine_bail!("deferred::mock", "set_int_uniform: uniform '{}' was not registered", name);
        }

        object.int_uniforms.insert(name.to_string(), value);
        self.commands.push(DeviceCommand::SetIntUniform {
            program,
            name: name.to_string(),
            value,
        });
        Ok(())
    }

    fn push_viewport(&mut self) {
        self.viewport_stack.push(self.viewport);
        self.commands.push(DeviceCommand::PushViewport);
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.commands.push(DeviceCommand::SetViewport(viewport));
    }

    fn pop_viewport(&mut self) {
        match self.viewport_stack.pop() {
            Some(viewport) => self.viewport = viewport,
            None => crate::engine_warn!("deferred::mock", "pop_viewport with an empty stack"),
        }
        self.commands.push(DeviceCommand::PopViewport);
    }

    fn render_fullscreen_quad(&mut self) -> Result<()> {
        if self.fail_quad {
            engine_bail!("deferred::mock", "render_fullscreen_quad: draw failed");
        }
        self.commands.push(DeviceCommand::RenderFullscreenQuad {
            viewport: self.viewport,
            program: self.active_program,
        });
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
