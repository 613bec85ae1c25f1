//! OpenGL ES 2.0 capability.
//!
//! Every GL call the engine makes goes through the [`Gl`] trait, which is
//! passed explicitly into each operation instead of relying on an implicitly
//! current context. Two implementations ship with the crate:
//! - [`GlowContext`]: a real context backed by `glow`
//! - [`RecordingGl`]: a headless fake that records calls, used by tests
//!
//! Handles are non-zero `u32` newtypes mirroring GL object names. Lookups that
//! can fail in GL (`-1` locations) return `Option` instead.

mod error;
mod glow_backend;
pub mod program;
mod recording;

use std::num::NonZeroU32;

use crate::coords::{Mat4, ScissorRect};

pub use error::{DrawError, SetupError};
pub use glow_backend::GlowContext;
pub use recording::{GlCall, RecordingGl};

/// `GL_NO_ERROR`.
pub const NO_ERROR: u32 = 0;
/// `GL_INVALID_ENUM`.
pub const INVALID_ENUM: u32 = 0x0500;
/// `GL_INVALID_VALUE`.
pub const INVALID_VALUE: u32 = 0x0501;
/// `GL_INVALID_OPERATION`.
pub const INVALID_OPERATION: u32 = 0x0502;

macro_rules! gl_name {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
        pub struct $name(NonZeroU32);

        impl $name {
            /// Wraps a raw GL object name. Zero is never a valid name.
            #[inline]
            pub const fn new(raw: u32) -> Option<Self> {
                match NonZeroU32::new(raw) {
                    Some(v) => Some(Self(v)),
                    None => None,
                }
            }

            #[inline]
            pub const fn get(self) -> u32 {
                self.0.get()
            }
        }
    };
}

gl_name!(
    /// Linked (or linkable) program object.
    ProgramId
);
gl_name!(
    /// Shader object.
    ShaderId
);
gl_name!(
    /// Texture object.
    TextureId
);
gl_name!(
    /// Buffer object.
    BufferId
);

/// Resolved uniform location. Unresolved uniforms are represented as `None`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UniformLocation(pub u32);

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Primitive {
    Triangles,
    TriangleStrip,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TextureTarget {
    Texture2d,
    /// `GL_TEXTURE_EXTERNAL_OES` (camera / decoder output).
    ExternalOes,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TexParam {
    MinFilter,
    MagFilter,
    WrapS,
    WrapT,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TexValue {
    Nearest,
    Linear,
    ClampToEdge,
}

/// Buffers cleared by [`Gl::clear`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ClearMask {
    pub color: bool,
    pub depth: bool,
}

impl ClearMask {
    pub const COLOR_AND_DEPTH: Self = Self { color: true, depth: true };
}

/// The subset of OpenGL ES 2.0 used by the engine.
///
/// All methods take `&self`: GL state lives in the driver, not in the
/// implementor. Callers must ensure the underlying context is current on the
/// calling thread for the whole lifetime of the value.
pub trait Gl {
    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId, String>;
    fn shader_source(&self, shader: ShaderId, source: &str);
    fn compile_shader(&self, shader: ShaderId);
    fn shader_compile_status(&self, shader: ShaderId) -> bool;
    fn shader_info_log(&self, shader: ShaderId) -> String;
    fn delete_shader(&self, shader: ShaderId);

    fn create_program(&self) -> Result<ProgramId, String>;
    fn attach_shader(&self, program: ProgramId, shader: ShaderId);
    fn link_program(&self, program: ProgramId);
    fn program_link_status(&self, program: ProgramId) -> bool;
    fn program_info_log(&self, program: ProgramId) -> String;
    fn delete_program(&self, program: ProgramId);
    fn use_program(&self, program: Option<ProgramId>);

    fn attrib_location(&self, program: ProgramId, name: &str) -> Option<u32>;
    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation>;
    fn uniform_1i(&self, location: UniformLocation, value: i32);
    fn uniform_1f(&self, location: UniformLocation, value: f32);
    /// Uploads a column-major matrix (`transpose = false`).
    fn uniform_matrix_4fv(&self, location: UniformLocation, matrix: &Mat4);

    fn create_buffer(&self) -> Result<BufferId, String>;
    fn bind_array_buffer(&self, buffer: Option<BufferId>);
    /// `glBufferData(GL_ARRAY_BUFFER, .., GL_STATIC_DRAW)`.
    fn array_buffer_data(&self, data: &[u8]);
    fn delete_buffer(&self, buffer: BufferId);
    /// Float, non-normalized attribute sourced from the bound array buffer.
    fn vertex_attrib_pointer(&self, index: u32, components: i32, stride: i32, offset: i32);
    fn enable_vertex_attrib_array(&self, index: u32);

    fn create_texture(&self) -> Result<TextureId, String>;
    /// `unit` is relative to `GL_TEXTURE0`.
    fn active_texture(&self, unit: u32);
    fn bind_texture(&self, target: TextureTarget, texture: Option<TextureId>);
    fn tex_parameter(&self, target: TextureTarget, param: TexParam, value: TexValue);
    fn delete_texture(&self, texture: TextureId);

    fn clear_color(&self, rgba: [f32; 4]);
    fn clear(&self, mask: ClearMask);
    fn set_scissor_test(&self, enabled: bool);
    fn scissor(&self, rect: ScissorRect);
    fn draw_arrays(&self, mode: Primitive, first: i32, count: i32);
    /// Blocks until all previously issued commands have completed.
    fn finish(&self);
    /// Returns and clears one pending error flag (`NO_ERROR` when none).
    fn get_error(&self) -> u32;
}
