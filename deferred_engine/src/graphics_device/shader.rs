/// Shader program handle and descriptor

use slotmap::new_key_type;

new_key_type! {
    /// Handle to a linked shader program owned by the device
    pub struct ShaderHandle;
}

/// Descriptor for creating a linked shader program
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderProgramDesc {
    /// Vertex stage source path
    pub vertex: String,
    /// Fragment stage source path
    pub fragment: String,
    /// Vertex attribute locations (location, attribute name)
    pub attributes: Vec<(u32, String)>,
    /// Uniforms to register after linking
    pub uniforms: Vec<String>,
}

impl ShaderProgramDesc {
    /// Pass-through program sampling one texture unit over a full-screen quad
    pub fn blit() -> Self {
        Self {
            vertex: "res/glsl/fullscreen.vert".to_string(),
            fragment: "res/glsl/blit.frag".to_string(),
            attributes: vec![
                (0, "vPosition".to_string()),
                (1, "vTexCoord".to_string()),
            ],
            uniforms: vec!["uTextureUnit".to_string()],
        }
    }

    /// Returns true if `name` was registered as a uniform
    pub fn has_uniform(&self, name: &str) -> bool {
        self.uniforms.iter().any(|u| u == name)
    }
}
