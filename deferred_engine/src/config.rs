/// Engine configuration

use glam::Vec4;
use crate::graphics_device::{SamplerState, ShaderProgramDesc};
use crate::log::LogSeverity;

/// Render context configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Application name (used in log messages)
    pub app_name: String,
    /// Color every color attachment is cleared to
    pub clear_color: Vec4,
    /// Value the depth attachment is cleared to
    pub clear_depth: f32,
    /// Pass-through program used by the attachment preview
    pub blit_shader: ShaderProgramDesc,
    /// Filter and wrap mode of every attachment image
    pub attachment_sampler: SamplerState,
    /// Minimum severity forwarded to the logger
    pub log_severity: LogSeverity,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "Deferred Application".to_string(),
            clear_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            clear_depth: 1.0,
            blit_shader: ShaderProgramDesc::blit(),
            attachment_sampler: SamplerState::default(),
            log_severity: LogSeverity::Info,
        }
    }
}
