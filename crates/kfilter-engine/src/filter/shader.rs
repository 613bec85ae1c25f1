use crate::coords::Viewport;
use crate::gl::{Gl, ProgramId, SetupError, TextureId};

use super::{ExternalTexture, Filter, MetadataProvider};

/// Filter defined entirely by a fragment shader plus metadata uniforms.
///
/// Initialisation is idempotent per program: a second `initialise` with the
/// same program is ignored, a different program re-resolves everything.
#[derive(Debug)]
pub struct ShaderFilter {
    name: String,
    shader: String,
    metadata: MetadataProvider,
    texture: ExternalTexture,
    program: Option<ProgramId>,
    input_size: Option<Viewport>,
    output_size: Option<Viewport>,
}

impl ShaderFilter {
    /// Filter owning its input texture and exposing `kfilterTime`.
    pub fn new(name: impl Into<String>, shader: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shader: shader.into(),
            metadata: MetadataProvider::with_frame_time(),
            texture: ExternalTexture::new(),
            program: None,
            input_size: None,
            output_size: None,
        }
    }

    pub fn with_metadata(mut self, metadata: MetadataProvider) -> Self {
        self.metadata = metadata;
        self
    }

    /// Uses a texture created by the caller instead of allocating one.
    pub fn with_texture(mut self, texture: ExternalTexture) -> Self {
        self.texture = texture;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_initialised(&self) -> bool {
        self.program.is_some()
    }

    pub fn texture(&self) -> &ExternalTexture {
        &self.texture
    }

    pub fn input_size(&self) -> Option<Viewport> {
        self.input_size
    }

    /// Copy of the configuration with no GL objects attached, for use in
    /// another context.
    pub fn fresh_copy(&self) -> Self {
        let mut metadata = self.metadata.clone();
        metadata.reset();
        Self {
            name: self.name.clone(),
            shader: self.shader.clone(),
            metadata,
            texture: ExternalTexture::new(),
            program: None,
            input_size: self.input_size,
            output_size: self.output_size,
        }
    }
}

impl Filter for ShaderFilter {
    fn fragment_shader(&self) -> String {
        self.shader.clone()
    }

    fn input_texture(&self) -> Option<TextureId> {
        self.texture.id()
    }

    fn initialise(&mut self, gl: &dyn Gl, program: ProgramId) -> Result<(), SetupError> {
        if self.program == Some(program) {
            return Ok(());
        }
        if self.program.is_some() {
            self.metadata.reset();
            self.program = None;
        }

        self.metadata.initialise(gl, program);
        self.texture.bind(gl, program)?;
        self.program = Some(program);
        log::debug!("filter {} initialised", self.name);
        Ok(())
    }

    fn apply(&mut self, gl: &dyn Gl, frame_time_ms: u64) {
        if self.program.is_none() {
            return;
        }
        self.metadata.apply(gl, frame_time_ms);
        self.texture.activate(gl, 0);
    }

    fn release(&mut self, gl: &dyn Gl) {
        self.texture.release(gl);
        self.metadata.reset();
        self.program = None;
    }

    /// Repeating the current input size is a no-op.
    fn resize(&mut self, input: Viewport, output: Viewport) {
        if self.input_size == Some(input) {
            return;
        }
        self.input_size = Some(input);
        self.output_size = Some(output);
        log::debug!(
            "filter {} resized: input {}x{}, output {}x{}",
            self.name,
            input.width,
            input.height,
            output.width,
            output.height
        );
    }

    fn output_size(&self) -> Option<Viewport> {
        self.output_size
    }
}
