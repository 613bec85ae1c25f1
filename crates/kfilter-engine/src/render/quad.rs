//! Full-screen quad shared by every frame.

use bytemuck::{Pod, Zeroable};

pub const ATTR_POSITION: &str = "aPosition";
pub const ATTR_TEXTURE_COORD: &str = "aTextureCoord";
pub const UNIFORM_MVP_MATRIX: &str = "uMVPMatrix";
pub const UNIFORM_ST_MATRIX: &str = "uSTMatrix";

/// Fixed vertex stage. Filters provide the fragment stage.
pub const VERTEX_SHADER: &str = "uniform mat4 uMVPMatrix;
uniform mat4 uSTMatrix;
attribute vec4 aPosition;
attribute vec4 aTextureCoord;
varying vec2 textureCoord;
void main() {
  gl_Position = uMVPMatrix * aPosition;
  textureCoord = (uSTMatrix * aTextureCoord).xy;
}
";

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub pos: [f32; 3],
    pub uv: [f32; 2],
}

/// Triangle-strip order: bottom-left, bottom-right, top-left, top-right.
pub const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [-1.0, -1.0, 0.0], uv: [0.0, 0.0] },
    QuadVertex { pos: [1.0, -1.0, 0.0], uv: [1.0, 0.0] },
    QuadVertex { pos: [-1.0, 1.0, 0.0], uv: [0.0, 1.0] },
    QuadVertex { pos: [1.0, 1.0, 0.0], uv: [1.0, 1.0] },
];

pub(super) const STRIDE_BYTES: i32 = std::mem::size_of::<QuadVertex>() as i32;
pub(super) const POSITION_OFFSET_BYTES: i32 = 0;
pub(super) const UV_OFFSET_BYTES: i32 = std::mem::offset_of!(QuadVertex, uv) as i32;
pub(super) const POSITION_COMPONENTS: i32 = 3;
pub(super) const UV_COMPONENTS: i32 = 2;
pub(super) const VERTEX_COUNT: i32 = QUAD_VERTICES.len() as i32;
