//! Matrix and size types shared by the renderer and the GL capability.
//!
//! Matrices are column-major. Sizes are physical pixels; scissor boxes use
//! GL window coordinates (origin bottom-left).

mod mat4;
mod viewport;

pub use mat4::Mat4;
pub use viewport::{ScissorRect, Viewport};
