//! Texture-producing surfaces.
//!
//! A surface is whatever writes frames into the filter's input texture (a
//! camera preview, a video decoder) and reports, per frame, how texture
//! coordinates must be transformed to undo sensor rotation or cropping.

use crate::coords::Mat4;

/// Upstream producer of frames.
pub trait TextureSurface {
    /// Transform for the most recently latched frame.
    fn transform_matrix(&self) -> Mat4;

    /// Presentation timestamp of the most recently latched frame, in
    /// nanoseconds. Surfaces without timing report `0`.
    fn timestamp_ns(&self) -> i64 {
        0
    }
}

/// Surface with an explicitly set transform and timestamp.
///
/// Useful for still images and for driving the renderer without a producer.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct StaticSurface {
    pub transform: Mat4,
    pub timestamp_ns: i64,
}

impl StaticSurface {
    pub fn new(transform: Mat4) -> Self {
        Self { transform, timestamp_ns: 0 }
    }

    pub fn with_timestamp_ns(mut self, timestamp_ns: i64) -> Self {
        self.timestamp_ns = timestamp_ns;
        self
    }
}

impl TextureSurface for StaticSurface {
    fn transform_matrix(&self) -> Mat4 {
        self.transform
    }

    fn timestamp_ns(&self) -> i64 {
        self.timestamp_ns
    }
}
