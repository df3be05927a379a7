use bytemuck::{Pod, Zeroable};
use game_math_simd::SimdBackend;
use serde::{Deserialize, Serialize};

use super::{impl_matrix_common, store_rows, Float3x3, LaneMatrix4};
use crate::quaternion::Quaternion;
use crate::vector::Vector3;
use crate::Backend;

/// `decompose` 中视为零的缩放
const DECOMPOSE_EPSILON: f32 = 1.0e-4;

/// 4x4矩阵（行主序，行向量约定）
///
/// 仿射变换的平移位于第4行：`(x, y, z, 1) * M`。
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[serde(from = "[[f32; 4]; 4]", into = "[[f32; 4]; 4]")]
pub struct Float4x4 {
    pub(crate) rows: [[f32; 4]; 4],
}

impl_matrix_common!(Float4x4, 4, 4);

impl Float4x4 {
    pub const IDENTITY: Self = Self {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    #[allow(clippy::too_many_arguments)]
    #[rustfmt::skip]
    pub const fn new(
        m11: f32, m12: f32, m13: f32, m14: f32,
        m21: f32, m22: f32, m23: f32, m24: f32,
        m31: f32, m32: f32, m33: f32, m34: f32,
        m41: f32, m42: f32, m43: f32, m44: f32,
    ) -> Self {
        Self {
            rows: [
                [m11, m12, m13, m14],
                [m21, m22, m23, m24],
                [m31, m32, m33, m34],
                [m41, m42, m43, m44],
            ],
        }
    }

    #[inline]
    pub(crate) fn lanes(&self) -> LaneMatrix4 {
        Backend::load_float4x4(&self.rows)
    }

    #[inline]
    pub(crate) fn from_lanes(m: &LaneMatrix4) -> Self {
        Self {
            rows: store_rows::<4>(m, 4),
        }
    }

    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_lanes(&Backend::matrix_transpose(&self.lanes()))
    }

    /// 平移分量（第4行）
    #[inline]
    pub fn translation(&self) -> Vector3 {
        let r = self.rows[3];
        Vector3::new(r[0], r[1], r[2])
    }

    #[inline]
    pub fn set_translation(&mut self, translation: Vector3) {
        self.rows[3][..3].copy_from_slice(&translation.to_array());
    }

    /// 前3行的长度
    #[inline]
    pub fn scale_factor(&self) -> Vector3 {
        Float3x3::from(*self).scale_factor()
    }

    /// 前3行各自除以自身长度，平移清零
    ///
    /// 含切变的矩阵结果未定义。
    #[inline]
    pub fn rotation_matrix(&self) -> Self {
        Self::from(Float3x3::from(*self).rotation_matrix())
    }

    /// 提取欧拉角 `(pitch, yaw, roll)`，见 [`Float3x3::euler_angles`]
    #[inline]
    pub fn euler_angles(&self) -> Vector3 {
        Float3x3::from(*self).euler_angles()
    }

    /// 提取旋转四元数（缩放先被移除）
    #[inline]
    pub fn quaternion(&self) -> Quaternion {
        Float3x3::from(*self).quaternion()
    }

    /// 分解为 `(缩放, 旋转, 平移)`
    ///
    /// 任一轴的缩放接近0时返回 `None`。镜像（行列式为负）记在x轴缩放的符号上。
    pub fn decompose(&self) -> Option<(Vector3, Quaternion, Vector3)> {
        let basis = Float3x3::from(*self);
        let mut scale = basis.scale_factor();
        if scale.x < DECOMPOSE_EPSILON || scale.y < DECOMPOSE_EPSILON || scale.z < DECOMPOSE_EPSILON
        {
            return None;
        }

        let mut rotation = basis.rotation_matrix();
        if rotation.determinant() < 0.0 {
            scale.x = -scale.x;
            let r0 = rotation.row(0);
            rotation.set_row(0, r0.map(|v| -v));
        }

        Some((
            scale,
            Quaternion::from_rotation_matrix(&rotation),
            self.translation(),
        ))
    }
}
