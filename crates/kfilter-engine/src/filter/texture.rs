use crate::gl::program::check_gl_error;
use crate::gl::{
    Gl, ProgramId, SetupError, TexParam, TexValue, TextureId, TextureTarget, UniformLocation,
};

/// Sampler uniform every filter shader reads its input from.
pub const EXTERNAL_TEXTURE_UNIFORM: &str = "externalTexture";

/// External (`GL_TEXTURE_EXTERNAL_OES`) input texture.
///
/// Either allocated lazily on first [`bind`](Self::bind) and deleted on
/// [`release`](Self::release), or adopted from a caller that keeps ownership.
#[derive(Debug, Default)]
pub struct ExternalTexture {
    id: Option<TextureId>,
    owned: bool,
    sampler: Option<UniformLocation>,
}

impl ExternalTexture {
    /// Texture allocated and owned by the filter.
    pub fn new() -> Self {
        Self { id: None, owned: true, sampler: None }
    }

    /// Wraps a texture created elsewhere; it is never deleted here.
    pub fn adopt(id: TextureId) -> Self {
        Self { id: Some(id), owned: false, sampler: None }
    }

    pub fn id(&self) -> Option<TextureId> {
        self.id
    }

    pub fn is_owned(&self) -> bool {
        self.owned
    }

    /// Allocates the texture if it does not exist yet.
    pub fn initialise(&mut self, gl: &dyn Gl) -> Result<TextureId, SetupError> {
        if let Some(id) = self.id {
            return Ok(id);
        }
        let id = gl
            .create_texture()
            .map_err(|reason| SetupError::Allocation { what: "external texture", reason })?;
        self.id = Some(id);
        self.owned = true;
        Ok(id)
    }

    /// Resolves the sampler in `program` and configures the texture for
    /// sampling: nearest minification, linear magnification, clamped edges.
    pub fn bind(&mut self, gl: &dyn Gl, program: ProgramId) -> Result<(), SetupError> {
        let id = self.initialise(gl)?;

        let sampler = gl.uniform_location(program, EXTERNAL_TEXTURE_UNIFORM);
        check_gl_error(gl, "glGetUniformLocation externalTexture");
        let Some(sampler) = sampler else {
            return Err(SetupError::MissingUniform(EXTERNAL_TEXTURE_UNIFORM));
        };
        self.sampler = Some(sampler);

        let target = TextureTarget::ExternalOes;
        gl.bind_texture(target, Some(id));
        check_gl_error(gl, "glBindTexture id");
        gl.tex_parameter(target, TexParam::MinFilter, TexValue::Nearest);
        gl.tex_parameter(target, TexParam::MagFilter, TexValue::Linear);
        gl.tex_parameter(target, TexParam::WrapS, TexValue::ClampToEdge);
        gl.tex_parameter(target, TexParam::WrapT, TexValue::ClampToEdge);
        check_gl_error(gl, "glTexParameter");
        Ok(())
    }

    /// Makes the texture current on `unit` and points the sampler at it.
    ///
    /// Does nothing until [`bind`](Self::bind) succeeded.
    pub fn activate(&self, gl: &dyn Gl, unit: u32) {
        let (Some(id), Some(sampler)) = (self.id, self.sampler) else {
            return;
        };
        gl.active_texture(unit);
        gl.bind_texture(TextureTarget::ExternalOes, Some(id));
        gl.uniform_1i(sampler, unit as i32);
    }

    /// Deletes an owned texture; forgets an adopted one's sampler binding.
    pub fn release(&mut self, gl: &dyn Gl) {
        self.sampler = None;
        if !self.owned {
            return;
        }
        if let Some(id) = self.id.take() {
            gl.delete_texture(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::{GlCall, RecordingGl, ShaderStage};

    fn program_with_sampler(gl: &RecordingGl) -> ProgramId {
        let fs = gl.create_shader(ShaderStage::Fragment).unwrap();
        gl.shader_source(fs, "uniform samplerExternalOES externalTexture;\n");
        let p = gl.create_program().unwrap();
        gl.attach_shader(p, fs);
        gl.link_program(p);
        p
    }

    #[test]
    fn bind_allocates_and_configures() {
        let gl = RecordingGl::new();
        let p = program_with_sampler(&gl);
        let mut tex = ExternalTexture::new();
        tex.bind(&gl, p).unwrap();

        let id = tex.id().unwrap();
        let calls = gl.calls();
        assert!(calls.contains(&GlCall::BindTexture(TextureTarget::ExternalOes, Some(id))));
        assert!(calls.contains(&GlCall::TexParameter(
            TextureTarget::ExternalOes,
            TexParam::MinFilter,
            TexValue::Nearest
        )));
        assert_eq!(gl.live_textures(), 1);
    }

    #[test]
    fn bind_without_sampler_is_fatal() {
        let gl = RecordingGl::new();
        let p = gl.create_program().unwrap();
        gl.link_program(p);
        let err = ExternalTexture::new().bind(&gl, p).unwrap_err();
        assert!(matches!(err, SetupError::MissingUniform(EXTERNAL_TEXTURE_UNIFORM)));
    }

    #[test]
    fn release_keeps_adopted_texture() {
        let gl = RecordingGl::new();
        let id = gl.create_texture().unwrap();
        let mut tex = ExternalTexture::adopt(id);
        tex.release(&gl);
        assert_eq!(tex.id(), Some(id));
        assert_eq!(gl.live_textures(), 1);
    }

    #[test]
    fn release_deletes_owned_texture() {
        let gl = RecordingGl::new();
        let mut tex = ExternalTexture::new();
        tex.initialise(&gl).unwrap();
        tex.release(&gl);
        assert_eq!(tex.id(), None);
        assert_eq!(gl.live_textures(), 0);
    }

    #[test]
    fn activate_before_bind_is_noop() {
        let gl = RecordingGl::new();
        ExternalTexture::new().activate(&gl, 0);
        assert!(gl.calls().is_empty());
    }
}
