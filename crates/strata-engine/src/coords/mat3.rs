use core::ops::Mul;

use super::Vec2;

/// Column-major 3x3 matrix for homogeneous 2D transforms.
///
/// Memory order matches WGSL `mat3x3<f32>` columns; [`Mat3::to_std140`] adds the
/// per-column padding the uniform address space requires.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat3 {
    pub cols: [[f32; 3]; 3],
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat3 {
    pub const IDENTITY: Mat3 = Mat3 {
        cols: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    #[inline]
    pub const fn from_cols(c0: [f32; 3], c1: [f32; 3], c2: [f32; 3]) -> Self {
        Self { cols: [c0, c1, c2] }
    }

    #[inline]
    pub const fn translation(t: Vec2) -> Self {
        Self::from_cols([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [t.x, t.y, 1.0])
    }

    #[inline]
    pub const fn scale(s: Vec2) -> Self {
        Self::from_cols([s.x, 0.0, 0.0], [0.0, s.y, 0.0], [0.0, 0.0, 1.0])
    }

    /// Counter-clockwise rotation by `radians`.
    #[inline]
    pub fn rotation(radians: f32) -> Self {
        let (s, c) = radians.sin_cos();
        Self::from_cols([c, s, 0.0], [-s, c, 0.0], [0.0, 0.0, 1.0])
    }

    /// Maps the world rectangle `[left, right] x [bottom, top]` onto clip XY `[-1, 1]`.
    ///
    /// Degenerate extents produce non-finite entries; callers own the viewport size.
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32) -> Self {
        let w = right - left;
        let h = top - bottom;
        Self::from_cols(
            [2.0 / w, 0.0, 0.0],
            [0.0, 2.0 / h, 0.0],
            [-(right + left) / w, -(top + bottom) / h, 1.0],
        )
    }

    /// Scale, then rotation, then translation, composed into one matrix.
    pub fn from_scale_rotation_translation(scale: Vec2, radians: f32, translation: Vec2) -> Self {
        Self::translation(translation) * Self::rotation(radians) * Self::scale(scale)
    }

    /// Full homogeneous product `self * v`.
    #[inline]
    pub fn mul_vec3(&self, v: [f32; 3]) -> [f32; 3] {
        let [c0, c1, c2] = self.cols;
        [
            c0[0] * v[0] + c1[0] * v[1] + c2[0] * v[2],
            c0[1] * v[0] + c1[1] * v[1] + c2[1] * v[2],
            c0[2] * v[0] + c1[2] * v[1] + c2[2] * v[2],
        ]
    }

    /// `self * (p.x, p.y, 1)`, keeping X and Y. No perspective divide.
    #[inline]
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        let [x, y, _] = self.mul_vec3([p.x, p.y, 1.0]);
        Vec2::new(x, y)
    }

    /// Columns padded to 16 bytes each, as `mat3x3<f32>` is laid out in a uniform buffer.
    #[inline]
    pub fn to_std140(&self) -> [[f32; 4]; 3] {
        let [c0, c1, c2] = self.cols;
        [
            [c0[0], c0[1], c0[2], 0.0],
            [c1[0], c1[1], c1[2], 0.0],
            [c2[0], c2[1], c2[2], 0.0],
        ]
    }
}

impl Mul for Mat3 {
    type Output = Mat3;

    fn mul(self, rhs: Mat3) -> Mat3 {
        let [c0, c1, c2] = rhs.cols;
        Mat3::from_cols(self.mul_vec3(c0), self.mul_vec3(c1), self.mul_vec3(c2))
    }
}
