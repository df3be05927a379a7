use bytemuck::{Pod, Zeroable};
use game_math_simd::{LaneMatrix, SimdBackend};
use serde::{Deserialize, Serialize};

use super::{impl_matrix_common, store_rows, Float3x3, Float3x4, Float4x4, LaneMatrix4};
use crate::quaternion::Quaternion;
use crate::vector::Vector3;
use crate::Backend;

/// 4x3仿射矩阵
///
/// 与 `Float4x4` 相同的行向量布局，省略恒为 `(0, 0, 0, 1)` 的第4列。
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[serde(from = "[[f32; 3]; 4]", into = "[[f32; 3]; 4]")]
pub struct Float4x3 {
    pub(crate) rows: [[f32; 4]; 4],
}

impl_matrix_common!(Float4x3, 4, 3);

impl Float4x3 {
    pub const IDENTITY: Self = Self {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 0.0],
        ],
    };

    #[allow(clippy::too_many_arguments)]
    #[rustfmt::skip]
    pub const fn new(
        m11: f32, m12: f32, m13: f32,
        m21: f32, m22: f32, m23: f32,
        m31: f32, m32: f32, m33: f32,
        m41: f32, m42: f32, m43: f32,
    ) -> Self {
        Self {
            rows: [
                [m11, m12, m13, 0.0],
                [m21, m22, m23, 0.0],
                [m31, m32, m33, 0.0],
                [m41, m42, m43, 0.0],
            ],
        }
    }

    #[inline]
    pub(crate) fn lanes(&self) -> LaneMatrix4 {
        LaneMatrix::from_rows(
            Backend::load_float4(&self.rows[0]),
            Backend::load_float4(&self.rows[1]),
            Backend::load_float4(&self.rows[2]),
            Backend::set_w(Backend::load_float4(&self.rows[3]), 1.0),
        )
    }

    #[inline]
    pub(crate) fn from_lanes(m: &LaneMatrix4) -> Self {
        Self {
            rows: store_rows::<4>(m, 3),
        }
    }

    /// 转置为列向量约定的3x4形式
    #[inline]
    pub fn transpose(&self) -> Float3x4 {
        Float3x4::from_lanes(&Backend::matrix_transpose(&self.lanes()))
    }

    #[inline]
    pub fn translation(&self) -> Vector3 {
        Vector3::from(self.row(3))
    }

    #[inline]
    pub fn set_translation(&mut self, translation: Vector3) {
        self.set_row(3, translation.to_array());
    }

    #[inline]
    pub fn scale_factor(&self) -> Vector3 {
        Float3x3::from(*self).scale_factor()
    }

    #[inline]
    pub fn euler_angles(&self) -> Vector3 {
        Float3x3::from(*self).euler_angles()
    }

    #[inline]
    pub fn quaternion(&self) -> Quaternion {
        Float3x3::from(*self).quaternion()
    }

    #[inline]
    pub fn decompose(&self) -> Option<(Vector3, Quaternion, Vector3)> {
        Float4x4::from(*self).decompose()
    }

    /// `(p, 1) * self`
    #[inline]
    pub fn transform_point(&self, p: Vector3) -> Vector3 {
        p.transform(&Float4x4::from(*self)).truncate()
    }

    /// 只应用线性部分
    #[inline]
    pub fn transform_normal(&self, n: Vector3) -> Vector3 {
        Float3x3::from(*self).transform(n)
    }
}

impl From<Float4x4> for Float4x3 {
    /// 丢弃第4列
    fn from(m: Float4x4) -> Self {
        Self::from_lanes(&m.lanes())
    }
}

impl From<Float4x3> for Float4x4 {
    fn from(m: Float4x3) -> Self {
        Float4x4::from_lanes(&m.lanes())
    }
}

impl From<Float4x3> for Float3x3 {
    fn from(m: Float4x3) -> Self {
        Float3x3::from_lanes(&m.lanes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Float4x3 {
        Float4x3::from(
            Float4x4::make_rotation_x(0.5)
                * Float4x4::make_scale(2.0, 1.0, 0.5)
                * Float4x4::make_translation(4.0, -1.0, 2.0),
        )
    }

    #[test]
    fn test_affine_inverse() {
        let m = sample();
        let p = Vector3::new(1.0, 2.0, 3.0);
        let back = m.inverse().transform_point(m.transform_point(p));
        assert!(back.near_equal(p, 1e-5));
        assert!((m * m.inverse()).near_equal(&Float4x3::IDENTITY, 1e-5));
    }

    #[test]
    fn test_multiply_matches_float4x4() {
        let a = sample();
        let b = Float4x3::from(Float4x4::make_rotation_y(1.2) * Float4x4::make_translation(0.0, 3.0, 0.0));
        let expected = Float4x4::from(a) * Float4x4::from(b);
        assert!(Float4x4::from(a * b).near_equal(&expected, 1e-6));
        assert_eq!(Float4x4::from(a * b).row(3)[3], 1.0);
    }

    #[test]
    fn test_translation_and_normals() {
        let m = sample();
        let (s, c) = 0.5f32.sin_cos();
        assert_eq!(m.translation(), Vector3::new(4.0, -1.0, 2.0));

        let n = m.transform_normal(Vector3::UNIT_Y);
        assert!(n.near_equal(Vector3::new(0.0, c, 0.5 * s), 1e-6));

        let expected = Vector3::new(
            2.0,
            (c * c + 0.25 * s * s).sqrt(),
            (s * s + 0.25 * c * c).sqrt(),
        );
        assert!(m.scale_factor().near_equal(expected, 1e-5));
    }

    #[test]
    fn test_index_uses_logical_shape() {
        let mut m = Float4x3::IDENTITY;
        m[(3, 2)] = 9.0;
        assert_eq!(m.translation(), Vector3::new(0.0, 0.0, 9.0));
        assert_eq!(m.to_rows()[3], [0.0, 0.0, 9.0]);
    }

    #[test]
    #[should_panic]
    fn test_padding_column_is_not_addressable() {
        let m = Float4x3::IDENTITY;
        let _ = m[(0, 3)];
    }
}
