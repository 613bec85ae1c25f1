//! Filters: pluggable fragment-shader effects.
//!
//! A [`Filter`] supplies the fragment shader the renderer links against its
//! fixed vertex shader, owns (or borrows) the external input texture, and
//! binds its own uniforms around each draw.
//!
//! Fragment shaders consume `varying vec2 textureCoord` and sample the
//! `externalTexture` sampler.

mod builtin;
mod metadata;
mod shader;
mod simple;
mod texture;

use crate::coords::Viewport;
use crate::gl::{Gl, ProgramId, SetupError, TextureId};

pub use builtin::{grayscale, passthrough, posterize, sepia, warm, wobble};
pub use metadata::{FRAME_TIME_UNIFORM, Metadata, MetadataProvider};
pub use shader::ShaderFilter;
pub use simple::{SimpleFilterBuilder, SimpleStep};
pub use texture::{EXTERNAL_TEXTURE_UNIFORM, ExternalTexture};

/// Effect applied while drawing the input texture.
pub trait Filter {
    /// GLSL ES 1.00 fragment shader source.
    fn fragment_shader(&self) -> String;

    /// Texture the producer writes frames into, once allocated.
    fn input_texture(&self) -> Option<TextureId>;

    /// One-time hook, invoked with the freshly linked program.
    fn initialise(&mut self, gl: &dyn Gl, program: ProgramId) -> Result<(), SetupError>;

    /// Per-frame hook, invoked after the program is in use and before the
    /// draw call. `frame_time_ms` is the surface timestamp in milliseconds.
    fn apply(&mut self, gl: &dyn Gl, frame_time_ms: u64);

    /// Frees GL objects owned by the filter.
    fn release(&mut self, _gl: &dyn Gl) {}

    /// Size of the media being filtered and of the render target. Called
    /// before `initialise` and again whenever the renderer's sizes change.
    fn resize(&mut self, _input: Viewport, _output: Viewport) {}

    /// Output size the filter was configured for, if any.
    fn output_size(&self) -> Option<Viewport> {
        None
    }
}

impl<F: Filter + ?Sized> Filter for Box<F> {
    fn fragment_shader(&self) -> String {
        (**self).fragment_shader()
    }

    fn input_texture(&self) -> Option<TextureId> {
        (**self).input_texture()
    }

    fn initialise(&mut self, gl: &dyn Gl, program: ProgramId) -> Result<(), SetupError> {
        (**self).initialise(gl, program)
    }

    fn apply(&mut self, gl: &dyn Gl, frame_time_ms: u64) {
        (**self).apply(gl, frame_time_ms)
    }

    fn release(&mut self, gl: &dyn Gl) {
        (**self).release(gl)
    }

    fn resize(&mut self, input: Viewport, output: Viewport) {
        (**self).resize(input, output)
    }

    fn output_size(&self) -> Option<Viewport> {
        (**self).output_size()
    }
}
