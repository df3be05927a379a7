use bytemuck::{Pod, Zeroable};
use game_math_simd::{LaneMatrix, SimdBackend};
use serde::{Deserialize, Serialize};

use super::{impl_matrix_common, store_rows, Float4x4, LaneMatrix4};
use crate::quaternion::Quaternion;
use crate::vector::Vector3;
use crate::{scalar_asin, scalar_atan2, scalar_sin_cos, Backend};

/// `|_32|` 达到该值时视为万向节锁
const GIMBAL_THRESHOLD: f32 = 0.999;

/// 3x3矩阵：旋转与缩放
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[serde(from = "[[f32; 3]; 3]", into = "[[f32; 3]; 3]")]
pub struct Float3x3 {
    pub(crate) rows: [[f32; 4]; 3],
}

impl_matrix_common!(Float3x3, 3, 3);

impl Float3x3 {
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
        m11: f32, m12: f32, m13: f32,
        m21: f32, m22: f32, m23: f32,
        m31: f32, m32: f32, m33: f32,
    ) -> Self {
        Self {
            rows: [
                [m11, m12, m13, 0.0],
                [m21, m22, m23, 0.0],
                [m31, m32, m33, 0.0],
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
            rows: store_rows::<3>(m, 3),
        }
    }

    #[inline]
    fn row_vector(&self, index: usize) -> Vector3 {
        Vector3::from(self.row(index))
    }

    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_lanes(&Backend::matrix_transpose(&self.lanes()))
    }

    /// 行向量 `v * self`
    #[inline]
    pub fn transform(&self, v: Vector3) -> Vector3 {
        let m = self.lanes();
        let v = v.lanes();
        let r = Backend::mul(Backend::splat_z(v), m.r[2]);
        let r = Backend::multiply_add(Backend::splat_y(v), m.r[1], r);
        Vector3::from_lanes(Backend::multiply_add(Backend::splat_x(v), m.r[0], r))
    }

    /// 各行的长度
    pub fn scale_factor(&self) -> Vector3 {
        Vector3::new(
            self.row_vector(0).length(),
            self.row_vector(1).length(),
            self.row_vector(2).length(),
        )
    }

    /// 各行除以自身长度（零行保持为零）
    pub fn rotation_matrix(&self) -> Self {
        let mut m = Self::ZERO;
        for i in 0..3 {
            m.set_row(i, self.row_vector(i).normalize().to_array());
        }
        m
    }

    /// 提取Z-X-Y顺序（先roll，再pitch，再yaw）的欧拉角
    ///
    /// 返回 `Vector3 { x: pitch, y: yaw, z: roll }`。缩放先被移除。
    /// `|_32| >= 0.999` 时进入万向节锁分支：roll固定为0，全部绕竖直轴的旋转记入yaw。
    pub fn euler_angles(&self) -> Vector3 {
        let r = self.rotation_matrix();
        let m32 = r[(2, 1)];
        let pitch = scalar_asin((-m32).clamp(-1.0, 1.0));

        if m32.abs() < GIMBAL_THRESHOLD {
            let yaw = scalar_atan2(r[(2, 0)], r[(2, 2)]);
            let roll = scalar_atan2(r[(0, 1)], r[(1, 1)]);
            Vector3::new(pitch, yaw, roll)
        } else {
            let yaw = scalar_atan2(-r[(0, 2)], r[(0, 0)]);
            Vector3::new(pitch, yaw, 0.0)
        }
    }

    /// 提取旋转四元数（基于迹的直接提取，缩放先被移除）
    #[inline]
    pub fn quaternion(&self) -> Quaternion {
        Quaternion::from_rotation_matrix(&self.rotation_matrix())
    }

    pub fn make_scale(x: f32, y: f32, z: f32) -> Self {
        Self::new(x, 0.0, 0.0, 0.0, y, 0.0, 0.0, 0.0, z)
    }

    /// 绕X轴旋转（左手系，从轴正方向看顺时针）
    pub fn make_rotation_x(angle: f32) -> Self {
        let (s, c) = scalar_sin_cos(angle);
        Self::new(1.0, 0.0, 0.0, 0.0, c, s, 0.0, -s, c)
    }

    pub fn make_rotation_y(angle: f32) -> Self {
        let (s, c) = scalar_sin_cos(angle);
        Self::new(c, 0.0, -s, 0.0, 1.0, 0.0, s, 0.0, c)
    }

    pub fn make_rotation_z(angle: f32) -> Self {
        let (s, c) = scalar_sin_cos(angle);
        Self::new(c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0)
    }

    /// 绕单位轴旋转
    pub fn make_rotation_normal(normal: Vector3, angle: f32) -> Self {
        let (s, c) = scalar_sin_cos(angle);
        let t = 1.0 - c;
        let Vector3 { x, y, z } = normal;
        Self::new(
            t * x * x + c,
            t * x * y + s * z,
            t * x * z - s * y,
            t * x * y - s * z,
            t * y * y + c,
            t * y * z + s * x,
            t * x * z + s * y,
            t * y * z - s * x,
            t * z * z + c,
        )
    }

    /// 绕任意轴旋转（轴先归一化）
    pub fn make_rotation_axis(axis: Vector3, angle: f32) -> Self {
        debug_assert!(axis.length_squared() > 0.0, "rotation axis must be non-zero");
        debug_assert!(!axis.is_infinite(), "rotation axis must be finite");
        Self::make_rotation_normal(axis.normalize(), angle)
    }

    /// 从四元数构造（假定四元数已归一化）
    pub fn make_from_quaternion(q: Quaternion) -> Self {
        let Quaternion { x, y, z, w } = q;
        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, xz, yz) = (x * y, x * z, y * z);
        let (wx, wy, wz) = (w * x, w * y, w * z);
        Self::new(
            1.0 - 2.0 * (yy + zz),
            2.0 * (xy + wz),
            2.0 * (xz - wy),
            2.0 * (xy - wz),
            1.0 - 2.0 * (xx + zz),
            2.0 * (yz + wx),
            2.0 * (xz + wy),
            2.0 * (yz - wx),
            1.0 - 2.0 * (xx + yy),
        )
    }

    /// 依次应用roll（Z）、pitch（X）、yaw（Y）
    #[inline]
    pub fn make_from_yaw_pitch_roll(yaw: f32, pitch: f32, roll: f32) -> Self {
        Self::make_from_quaternion(Quaternion::from_yaw_pitch_roll(yaw, pitch, roll))
    }
}

impl From<Float4x4> for Float3x3 {
    /// 取左上3x3块
    fn from(m: Float4x4) -> Self {
        Self::from_lanes(&m.lanes())
    }
}

impl From<Float3x3> for Float4x4 {
    fn from(m: Float3x3) -> Self {
        Float4x4::from_lanes(&m.lanes())
    }
}
