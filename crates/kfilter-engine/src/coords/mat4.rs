use bytemuck::{Pod, Zeroable};

/// 4×4 `f32` matrix stored column-major, as GL expects with `transpose = false`.
///
/// Surface transforms are copied in verbatim; the engine never interprets
/// them beyond uploading.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Mat4(pub [f32; 16]);

impl Mat4 {
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);

    #[inline]
    pub const fn from_cols_array(values: [f32; 16]) -> Self {
        Self(values)
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Resets `self` to identity in place.
    #[inline]
    pub fn set_identity(&mut self) {
        *self = Self::IDENTITY;
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_identity() {
        assert!(Mat4::default().is_identity());
    }

    #[test]
    fn set_identity_overwrites() {
        let mut m = Mat4::from_cols_array([2.0; 16]);
        assert!(!m.is_identity());
        m.set_identity();
        assert!(m.is_identity());
    }

    #[test]
    fn bytes_are_column_major_floats() {
        let bytes = bytemuck::bytes_of(&Mat4::IDENTITY);
        assert_eq!(bytes.len(), 64);
        assert_eq!(&bytes[0..4], &1.0f32.to_ne_bytes());
        assert_eq!(&bytes[4..8], &0.0f32.to_ne_bytes());
    }
}
