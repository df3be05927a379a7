use bytemuck::{Pod, Zeroable};
use game_math_simd::SimdBackend;
use serde::{Deserialize, Serialize};

use super::{Vector2, Vector4};
use crate::macros::impl_vector_ops;
use crate::matrix::Float4x4;
use crate::quaternion::Quaternion;
use crate::{Backend, Lanes};

/// 3维向量
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl_vector_ops!(Vector3, 3, x, y, z);

impl Vector3 {
    pub const ZERO: Self = Self::splat(0.0);
    pub const ONE: Self = Self::splat(1.0);
    pub const UNIT_X: Self = Self::new(1.0, 0.0, 0.0);
    pub const UNIT_Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const UNIT_Z: Self = Self::new(0.0, 0.0, 1.0);

    /// 左手坐标系的前方
    pub const FORWARD: Self = Self::UNIT_Z;
    pub const UP: Self = Self::UNIT_Y;
    pub const RIGHT: Self = Self::UNIT_X;

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v, z: v }
    }

    #[inline]
    pub const fn from_array(a: [f32; 3]) -> Self {
        Self {
            x: a[0],
            y: a[1],
            z: a[2],
        }
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// 装入通道寄存器，w为0
    #[inline]
    pub(crate) fn lanes(self) -> Lanes {
        Backend::load_float3(&[self.x, self.y, self.z])
    }

    #[inline]
    pub(crate) fn from_lanes(v: Lanes) -> Self {
        let mut a = [0.0; 3];
        Backend::store_float3(&mut a, v);
        Self::from_array(a)
    }

    #[inline]
    pub fn extend(self, w: f32) -> Vector4 {
        Vector4::new(self.x, self.y, self.z, w)
    }

    #[inline]
    pub fn truncate(self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }

    #[inline]
    pub fn dot(self, rhs: Self) -> f32 {
        Backend::get_x(Backend::dot3(self.lanes(), rhs.lanes()))
    }

    #[inline]
    pub fn cross(self, rhs: Self) -> Self {
        Self::from_lanes(Backend::cross3(self.lanes(), rhs.lanes()))
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f32 {
        let v = self.lanes();
        Backend::get_x(Backend::sqrt(Backend::dot3(v, v)))
    }

    #[inline]
    pub fn length_est(self) -> f32 {
        let v = self.lanes();
        Backend::get_x(Backend::sqrt_est(Backend::dot3(v, v)))
    }

    #[inline]
    pub fn reciprocal_length(self) -> f32 {
        let v = self.lanes();
        Backend::get_x(Backend::reciprocal_sqrt(Backend::dot3(v, v)))
    }

    #[inline]
    pub fn distance(self, rhs: Self) -> f32 {
        (rhs - self).length()
    }

    #[inline]
    pub fn distance_squared(self, rhs: Self) -> f32 {
        (rhs - self).length_squared()
    }

    /// 归一化；零向量返回零向量，无穷长度返回NaN
    #[inline]
    pub fn normalize(self) -> Self {
        let v = self.lanes();
        Self::from_lanes(super::normalize_lanes(v, Backend::dot3(v, v)))
    }

    #[inline]
    pub fn normalize_est(self) -> Self {
        let v = self.lanes();
        Self::from_lanes(super::normalize_est_lanes(v, Backend::dot3(v, v)))
    }

    #[inline]
    pub fn clamp(self, min: Self, max: Self) -> Self {
        Self::from_lanes(Backend::clamp(self.lanes(), min.lanes(), max.lanes()))
    }

    /// 把长度钳制到 `[min, max]`，已在范围内时原样返回
    #[inline]
    pub fn clamp_length(self, min: f32, max: f32) -> Self {
        let v = self.lanes();
        Self::from_lanes(super::clamp_length_lanes(v, Backend::dot3(v, v), min, max))
    }

    #[inline]
    pub fn min(self, rhs: Self) -> Self {
        Self::from_lanes(Backend::min(self.lanes(), rhs.lanes()))
    }

    #[inline]
    pub fn max(self, rhs: Self) -> Self {
        Self::from_lanes(Backend::max(self.lanes(), rhs.lanes()))
    }

    #[inline]
    pub fn abs(self) -> Self {
        Self::from_lanes(Backend::abs(self.lanes()))
    }

    #[inline]
    pub fn lerp(self, rhs: Self, t: f32) -> Self {
        Self::from_lanes(Backend::lerp(self.lanes(), rhs.lanes(), Backend::splat(t)))
    }

    #[inline]
    pub fn smooth_step(self, rhs: Self, t: f32) -> Self {
        Self::from_lanes(super::smooth_step_lanes(self.lanes(), rhs.lanes(), t))
    }

    #[inline]
    pub fn barycentric(v1: Self, v2: Self, v3: Self, f: f32, g: f32) -> Self {
        Self::from_lanes(super::barycentric_lanes(v1.lanes(), v2.lanes(), v3.lanes(), f, g))
    }

    #[inline]
    pub fn catmull_rom(v0: Self, v1: Self, v2: Self, v3: Self, t: f32) -> Self {
        Self::from_lanes(super::catmull_rom_lanes(
            v0.lanes(),
            v1.lanes(),
            v2.lanes(),
            v3.lanes(),
            t,
        ))
    }

    #[inline]
    pub fn hermite(v1: Self, t1: Self, v2: Self, t2: Self, t: f32) -> Self {
        Self::from_lanes(super::hermite_lanes(
            v1.lanes(),
            t1.lanes(),
            v2.lanes(),
            t2.lanes(),
            t,
        ))
    }

    /// 关于法线 `normal`（应为单位向量）的反射
    #[inline]
    pub fn reflect(self, normal: Self) -> Self {
        let (i, n) = (self.lanes(), normal.lanes());
        Self::from_lanes(super::reflect_lanes(i, n, Backend::dot3(i, n)))
    }

    /// 折射；全内反射时返回零向量
    ///
    /// # 参数
    ///
    /// * `normal` - 单位法线，指向入射侧
    /// * `eta` - 入射介质与折射介质的折射率之比
    #[inline]
    pub fn refract(self, normal: Self, eta: f32) -> Self {
        let (i, n) = (self.lanes(), normal.lanes());
        Self::from_lanes(super::refract_lanes(i, n, Backend::dot3(i, n), eta))
    }

    /// 两个单位向量的夹角；点积先钳制到 `[-1, 1]`，反向时为π
    #[inline]
    pub fn angle_between_normals(self, rhs: Self) -> f32 {
        super::angle_from_cosine(Backend::dot3(self.lanes(), rhs.lanes()), false)
    }

    #[inline]
    pub fn angle_between_normals_est(self, rhs: Self) -> f32 {
        super::angle_from_cosine(Backend::dot3(self.lanes(), rhs.lanes()), true)
    }

    #[inline]
    pub fn angle_between_vectors(self, rhs: Self) -> f32 {
        let (a, b) = (self.lanes(), rhs.lanes());
        super::angle_between_lanes(Backend::dot3(a, b), Backend::dot3(a, a), Backend::dot3(b, b))
    }

    #[inline]
    pub fn near_equal(self, rhs: Self, epsilon: f32) -> bool {
        let m = Backend::near_equal(self.lanes(), rhs.lanes(), Backend::splat(epsilon));
        super::all_lanes(m, 3)
    }

    #[inline]
    pub fn is_nan(self) -> bool {
        super::any_lane(Backend::is_nan(self.lanes()), 3)
    }

    #[inline]
    pub fn is_infinite(self) -> bool {
        super::any_lane(Backend::is_infinite(self.lanes()), 3)
    }

    /// `-bounds <= self <= bounds`
    #[inline]
    pub fn in_bounds(self, bounds: Self) -> bool {
        super::all_lanes(Backend::in_bounds(self.lanes(), bounds.lanes()), 3)
    }

    /// `(x, y, z, 1) * m`，不做透视除法
    #[inline]
    pub fn transform(self, m: &Float4x4) -> Vector4 {
        Vector4::from_lanes(transform_lanes(self.lanes(), m))
    }

    /// 变换后除以w
    #[inline]
    pub fn transform_coord(self, m: &Float4x4) -> Self {
        let r = transform_lanes(self.lanes(), m);
        Self::from_lanes(Backend::div(r, Backend::splat_w(r)))
    }

    /// 只应用线性部分（忽略平移）
    #[inline]
    pub fn transform_normal(self, m: &Float4x4) -> Self {
        let m = m.lanes();
        let v = self.lanes();
        let r = Backend::mul(Backend::splat_z(v), m.r[2]);
        let r = Backend::multiply_add(Backend::splat_y(v), m.r[1], r);
        Self::from_lanes(Backend::multiply_add(Backend::splat_x(v), m.r[0], r))
    }

    /// 用四元数旋转：`q * v * conj(q)`
    #[inline]
    pub fn rotate(self, q: Quaternion) -> Self {
        let v = Quaternion::new(self.x, self.y, self.z, 0.0);
        let r = q * v * q.conjugate();
        Self::new(r.x, r.y, r.z)
    }

    /// 用四元数的逆旋转：`conj(q) * v * q`
    #[inline]
    pub fn inverse_rotate(self, q: Quaternion) -> Self {
        let v = Quaternion::new(self.x, self.y, self.z, 0.0);
        let r = q.conjugate() * v * q;
        Self::new(r.x, r.y, r.z)
    }
}

#[inline]
fn transform_lanes(v: Lanes, m: &Float4x4) -> Lanes {
    let m = m.lanes();
    let r = Backend::multiply_add(Backend::splat_z(v), m.r[2], m.r[3]);
    let r = Backend::multiply_add(Backend::splat_y(v), m.r[1], r);
    Backend::multiply_add(Backend::splat_x(v), m.r[0], r)
}
