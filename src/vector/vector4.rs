use bytemuck::{Pod, Zeroable};
use game_math_simd::SimdBackend;
use serde::{Deserialize, Serialize};

use super::Vector3;
use crate::macros::impl_vector_ops;
use crate::matrix::Float4x4;
use crate::{Backend, Lanes};

/// 4维向量（齐次坐标）
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vector4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl_vector_ops!(Vector4, 4, x, y, z, w);

impl Vector4 {
    pub const ZERO: Self = Self::splat(0.0);
    pub const ONE: Self = Self::splat(1.0);
    pub const UNIT_X: Self = Self::new(1.0, 0.0, 0.0, 0.0);
    pub const UNIT_Y: Self = Self::new(0.0, 1.0, 0.0, 0.0);
    pub const UNIT_Z: Self = Self::new(0.0, 0.0, 1.0, 0.0);
    pub const UNIT_W: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self {
            x: v,
            y: v,
            z: v,
            w: v,
        }
    }

    #[inline]
    pub const fn from_array(a: [f32; 4]) -> Self {
        Self {
            x: a[0],
            y: a[1],
            z: a[2],
            w: a[3],
        }
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    #[inline]
    pub(crate) fn lanes(self) -> Lanes {
        Backend::load_float4(&self.to_array())
    }

    #[inline]
    pub(crate) fn from_lanes(v: Lanes) -> Self {
        let mut a = [0.0; 4];
        Backend::store_float4(&mut a, v);
        Self::from_array(a)
    }

    #[inline]
    pub fn truncate(self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn dot(self, rhs: Self) -> f32 {
        Backend::get_x(Backend::dot4(self.lanes(), rhs.lanes()))
    }

    /// 4维叉积：与 `a`、`b`、`c` 三者都正交的向量
    pub fn cross(a: Self, b: Self, c: Self) -> Self {
        let (v1, v2, v3) = (a.lanes(), b.lanes(), c.lanes());

        // (v2.zwyz * v3.wzwy - v2.wzwy * v3.zwyz) * v1.yxxx
        let t3 = Backend::swizzle::<3, 2, 3, 1>(v3);
        let r = Backend::mul(Backend::swizzle::<2, 3, 1, 2>(v2), t3);
        let r = Backend::negative_multiply_subtract(
            Backend::swizzle::<3, 2, 3, 1>(v2),
            Backend::swizzle::<2, 3, 1, 2>(v3),
            r,
        );
        let r = Backend::mul(r, Backend::swizzle::<1, 0, 0, 0>(v1));

        // - (v2.ywxz * v3.wxwx - v2.wxwx * v3.ywxz) * v1.zzyy
        let t = Backend::mul(
            Backend::swizzle::<3, 0, 3, 0>(v3),
            Backend::swizzle::<1, 3, 0, 2>(v2),
        );
        let t = Backend::negative_multiply_subtract(
            Backend::swizzle::<3, 0, 3, 0>(v2),
            Backend::swizzle::<1, 3, 0, 2>(v3),
            t,
        );
        let r = Backend::negative_multiply_subtract(Backend::swizzle::<2, 2, 1, 1>(v1), t, r);

        // + (v2.yzxy * v3.zxyx - v2.zxyx * v3.yzxy) * v1.wwwz
        let t = Backend::mul(
            Backend::swizzle::<2, 0, 1, 0>(v3),
            Backend::swizzle::<1, 2, 0, 1>(v2),
        );
        let t = Backend::negative_multiply_subtract(
            Backend::swizzle::<1, 2, 0, 1>(v3),
            Backend::swizzle::<2, 0, 1, 0>(v2),
            t,
        );
        Self::from_lanes(Backend::multiply_add(t, Backend::swizzle::<3, 3, 3, 2>(v1), r))
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f32 {
        let v = self.lanes();
        Backend::get_x(Backend::sqrt(Backend::dot4(v, v)))
    }

    #[inline]
    pub fn length_est(self) -> f32 {
        let v = self.lanes();
        Backend::get_x(Backend::sqrt_est(Backend::dot4(v, v)))
    }

    #[inline]
    pub fn reciprocal_length(self) -> f32 {
        let v = self.lanes();
        Backend::get_x(Backend::reciprocal_sqrt(Backend::dot4(v, v)))
    }

    #[inline]
    pub fn distance(self, rhs: Self) -> f32 {
        (rhs - self).length()
    }

    #[inline]
    pub fn distance_squared(self, rhs: Self) -> f32 {
        (rhs - self).length_squared()
    }

    #[inline]
    pub fn normalize(self) -> Self {
        let v = self.lanes();
        Self::from_lanes(super::normalize_lanes(v, Backend::dot4(v, v)))
    }

    #[inline]
    pub fn normalize_est(self) -> Self {
        let v = self.lanes();
        Self::from_lanes(super::normalize_est_lanes(v, Backend::dot4(v, v)))
    }

    #[inline]
    pub fn clamp(self, min: Self, max: Self) -> Self {
        Self::from_lanes(Backend::clamp(self.lanes(), min.lanes(), max.lanes()))
    }

    #[inline]
    pub fn clamp_length(self, min: f32, max: f32) -> Self {
        let v = self.lanes();
        Self::from_lanes(super::clamp_length_lanes(v, Backend::dot4(v, v), min, max))
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

    #[inline]
    pub fn reflect(self, normal: Self) -> Self {
        let (i, n) = (self.lanes(), normal.lanes());
        Self::from_lanes(super::reflect_lanes(i, n, Backend::dot4(i, n)))
    }

    #[inline]
    pub fn refract(self, normal: Self, eta: f32) -> Self {
        let (i, n) = (self.lanes(), normal.lanes());
        Self::from_lanes(super::refract_lanes(i, n, Backend::dot4(i, n), eta))
    }

    #[inline]
    pub fn angle_between_normals(self, rhs: Self) -> f32 {
        super::angle_from_cosine(Backend::dot4(self.lanes(), rhs.lanes()), false)
    }

    #[inline]
    pub fn angle_between_normals_est(self, rhs: Self) -> f32 {
        super::angle_from_cosine(Backend::dot4(self.lanes(), rhs.lanes()), true)
    }

    #[inline]
    pub fn angle_between_vectors(self, rhs: Self) -> f32 {
        let (a, b) = (self.lanes(), rhs.lanes());
        super::angle_between_lanes(Backend::dot4(a, b), Backend::dot4(a, a), Backend::dot4(b, b))
    }

    #[inline]
    pub fn near_equal(self, rhs: Self, epsilon: f32) -> bool {
        let m = Backend::near_equal(self.lanes(), rhs.lanes(), Backend::splat(epsilon));
        super::all_lanes(m, 4)
    }

    #[inline]
    pub fn is_nan(self) -> bool {
        super::any_lane(Backend::is_nan(self.lanes()), 4)
    }

    #[inline]
    pub fn is_infinite(self) -> bool {
        super::any_lane(Backend::is_infinite(self.lanes()), 4)
    }

    #[inline]
    pub fn in_bounds(self, bounds: Self) -> bool {
        super::all_lanes(Backend::in_bounds(self.lanes(), bounds.lanes()), 4)
    }

    /// 行向量 `self * m`
    #[inline]
    pub fn transform(self, m: &Float4x4) -> Self {
        Self::from_lanes(Backend::vector4_transform(self.lanes(), &m.lanes()))
    }
}
