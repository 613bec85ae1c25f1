//! Kfilter engine crate.
//!
//! Renders an external camera/video texture through a pluggable fragment
//! shader filter using OpenGL ES 2.0. The GL context is an explicit [`gl::Gl`]
//! capability handed to every GPU-touching call.

pub mod coords;
pub mod filter;
pub mod gl;
pub mod logging;
pub mod render;
pub mod surface;
