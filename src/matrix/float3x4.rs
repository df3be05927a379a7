use bytemuck::{Pod, Zeroable};
use game_math_simd::{LaneMatrix, SimdBackend};
use serde::{Deserialize, Serialize};

use super::{impl_matrix_common, store_rows, Float4x3, Float4x4, LaneMatrix4};
use crate::vector::Vector3;
use crate::Backend;

/// 3x4矩阵：[`Float4x3`] 的转置，列向量约定的仿射变换
///
/// 平移位于第4列，省略恒为 `(0, 0, 0, 1)` 的第4行。常用于向GPU上传骨骼矩阵。
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[serde(from = "[[f32; 4]; 3]", into = "[[f32; 4]; 3]")]
pub struct Float3x4 {
    pub(crate) rows: [[f32; 4]; 3],
}

impl_matrix_common!(Float3x4, 3, 4);

impl Float3x4 {
    pub const IDENTITY: Self = Self {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ],
    };

    #[allow(clippy::too_many_arguments)]
    #[rustfmt::skip]
    pub const fn new(
        m11: f32, m12: f32, m13: f32, m14: f32,
        m21: f32, m22: f32, m23: f32, m24: f32,
        m31: f32, m32: f32, m33: f32, m34: f32,
    ) -> Self {
        Self {
            rows: [
                [m11, m12, m13, m14],
                [m21, m22, m23, m24],
                [m31, m32, m33, m34],
            ],
        }
    }

    #[inline]
    pub(crate) fn lanes(&self) -> LaneMatrix4 {
        LaneMatrix::from_rows(
            Backend::load_float4(&self.rows[0]),
            Backend::load_float4(&self.rows[1]),
            Backend::load_float4(&self.rows[2]),
            Backend::set(0.0, 0.0, 0.0, 1.0),
        )
    }

    #[inline]
    pub(crate) fn from_lanes(m: &LaneMatrix4) -> Self {
        Self {
            rows: store_rows::<3>(m, 4),
        }
    }

    /// 转置回行向量约定的4x3形式
    #[inline]
    pub fn transpose(&self) -> Float4x3 {
        Float4x3::from_lanes(&Backend::matrix_transpose(&self.lanes()))
    }

    /// 平移分量（第4列）
    #[inline]
    pub fn translation(&self) -> Vector3 {
        Vector3::new(self.rows[0][3], self.rows[1][3], self.rows[2][3])
    }

    /// 列向量 `self * (p, 1)`
    #[inline]
    pub fn transform_point(&self, p: Vector3) -> Vector3 {
        let v = p.extend(1.0).lanes();
        let x = Backend::get_x(Backend::dot4(Backend::load_float4(&self.rows[0]), v));
        let y = Backend::get_x(Backend::dot4(Backend::load_float4(&self.rows[1]), v));
        let z = Backend::get_x(Backend::dot4(Backend::load_float4(&self.rows[2]), v));
        Vector3::new(x, y, z)
    }
}

impl From<Float3x4> for Float4x4 {
    /// 第4行补 `(0, 0, 0, 1)`
    fn from(m: Float3x4) -> Self {
        Float4x4::from_lanes(&m.lanes())
    }
}

impl From<Float4x3> for Float3x4 {
    fn from(m: Float4x3) -> Self {
        m.transpose()
    }
}

impl From<Float3x4> for Float4x3 {
    fn from(m: Float3x4) -> Self {
        m.transpose()
    }
}
