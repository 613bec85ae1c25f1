//! Frame rendering.
//!
//! [`TextureRenderer`] draws the filter's input texture as a full-screen quad
//! through the filter's fragment shader, one frame per call.
//!
//! Convention:
//! - the quad spans NDC `[-1, 1]` with texture coordinates `[0, 1]`
//! - texture coordinates are corrected by the surface transform in the vertex shader

mod quad;
mod split;
mod texture_renderer;

pub use quad::{
    ATTR_POSITION, ATTR_TEXTURE_COORD, QUAD_VERTICES, QuadVertex, UNIFORM_MVP_MATRIX,
    UNIFORM_ST_MATRIX, VERTEX_SHADER,
};
pub use split::Split;
pub use texture_renderer::{RendererConfig, TextureRenderer};
