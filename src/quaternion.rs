//! 四元数
//!
//! 乘法是标准Hamilton积：`a * b` 先应用 `b` 再应用 `a`，
//! 与行向量矩阵的顺序相反。需要"先q1后q2"时使用 [`Quaternion::concatenate`]。

use bytemuck::{Pod, Zeroable};
use game_math_simd::SimdBackend;
use serde::{Deserialize, Serialize};

use crate::matrix::{Float3x3, Float4x4};
use crate::vector::{self, Vector3, Vector4};
use crate::{scalar_sin_cos, Backend, Lanes};

/// slerp退化为线性插值的阈值
const SLERP_THRESHOLD: f32 = 1.0 - 1.0e-5;

/// `from_to_rotation` 判定两向量共线的阈值
const PARALLEL_EPSILON: f32 = 1.0e-6;

/// 旋转四元数 `(x, y, z) * sin(θ/2), w = cos(θ/2)`
///
/// 构造时不自动归一化。
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    #[inline]
    pub(crate) fn lanes(self) -> Lanes {
        Backend::set(self.x, self.y, self.z, self.w)
    }

    #[inline]
    pub(crate) fn from_lanes(v: Lanes) -> Self {
        let [x, y, z, w] = Backend::to_array(v);
        Self::new(x, y, z, w)
    }

    /// 绕单位轴 `normal` 旋转 `angle` 弧度
    #[inline]
    pub fn from_normal_angle(normal: Vector3, angle: f32) -> Self {
        let (s, c) = scalar_sin_cos(0.5 * angle);
        let n = Backend::set_w(normal.lanes(), 1.0);
        Self::from_lanes(Backend::mul(n, Backend::set(s, s, s, c)))
    }

    /// 绕任意轴旋转（轴先归一化）
    ///
    /// # Panics
    ///
    /// debug构建下轴为零向量或含无穷分量时panic
    #[inline]
    pub fn from_axis_angle(axis: Vector3, angle: f32) -> Self {
        debug_assert!(axis != Vector3::ZERO, "rotation axis must be non-zero");
        debug_assert!(!axis.is_infinite(), "rotation axis must be finite");
        Self::from_normal_angle(axis.normalize(), angle)
    }

    /// 依次应用roll（绕Z）、pitch（绕X）、yaw（绕Y）
    pub fn from_yaw_pitch_roll(yaw: f32, pitch: f32, roll: f32) -> Self {
        let (sp, cp) = scalar_sin_cos(0.5 * pitch);
        let (sy, cy) = scalar_sin_cos(0.5 * yaw);
        let (sr, cr) = scalar_sin_cos(0.5 * roll);

        Self::new(
            cr * sp * cy + sr * cp * sy,
            cr * cp * sy - sr * sp * cy,
            sr * cp * cy - cr * sp * sy,
            cr * cp * cy + sr * sp * sy,
        )
    }

    /// 从 `(pitch, yaw, roll)` 构造，与 [`Float4x4::euler_angles`] 互逆
    #[inline]
    pub fn from_euler_angles(angles: Vector3) -> Self {
        Self::from_yaw_pitch_roll(angles.y, angles.x, angles.z)
    }

    /// 从纯旋转矩阵直接提取（基于迹，按最大对角分量选择分支）
    ///
    /// 矩阵含缩放时先调用 [`Float3x3::rotation_matrix`]。
    pub fn from_rotation_matrix(m: &Float3x3) -> Self {
        let r = m.to_rows();
        let (r00, r01, r02) = (r[0][0], r[0][1], r[0][2]);
        let (r10, r11, r12) = (r[1][0], r[1][1], r[1][2]);
        let (r20, r21, r22) = (r[2][0], r[2][1], r[2][2]);

        let (q, four_sq) = if r22 <= 0.0 {
            let dif10 = r11 - r00;
            let omr22 = 1.0 - r22;
            if dif10 <= 0.0 {
                // |x| 最大
                let four_x_sq = omr22 - dif10;
                ([four_x_sq, r01 + r10, r02 + r20, r12 - r21], four_x_sq)
            } else {
                // |y| 最大
                let four_y_sq = omr22 + dif10;
                ([r01 + r10, four_y_sq, r12 + r21, r20 - r02], four_y_sq)
            }
        } else {
            let sum10 = r11 + r00;
            let opr22 = 1.0 + r22;
            if sum10 <= 0.0 {
                // |z| 最大
                let four_z_sq = opr22 - sum10;
                ([r02 + r20, r12 + r21, four_z_sq, r01 - r10], four_z_sq)
            } else {
                // |w| 最大
                let four_w_sq = opr22 + sum10;
                ([r12 - r21, r20 - r02, r01 - r10, four_w_sq], four_w_sq)
            }
        };

        let scale = Backend::div(
            Backend::splat(0.5),
            Backend::sqrt(Backend::splat(four_sq)),
        );
        Self::from_lanes(Backend::mul(Backend::from_array(q), scale))
    }

    /// 把 `from` 方向转到 `to` 方向的最短弧旋转
    ///
    /// 两方向相反时绕任一垂直轴转180°。
    pub fn from_to_rotation(from: Vector3, to: Vector3) -> Self {
        let from = from.normalize();
        let to = to.normalize();
        let d = from.dot(to);

        if d >= 1.0 - PARALLEL_EPSILON {
            return Self::IDENTITY;
        }
        if d <= -1.0 + PARALLEL_EPSILON {
            let mut axis = Vector3::UNIT_X.cross(from);
            if axis.length_squared() < PARALLEL_EPSILON {
                axis = Vector3::UNIT_Y.cross(from);
            }
            return Self::from_normal_angle(axis.normalize(), std::f32::consts::PI);
        }

        let c = from.cross(to);
        Self::new(c.x, c.y, c.z, 1.0 + d).normalize()
    }

    #[inline]
    pub fn dot(self, rhs: Self) -> f32 {
        Backend::get_x(Backend::dot4(self.lanes(), rhs.lanes()))
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f32 {
        let q = self.lanes();
        Backend::get_x(Backend::sqrt(Backend::dot4(q, q)))
    }

    /// 归一化；零四元数保持为零
    #[inline]
    pub fn normalize(self) -> Self {
        let q = self.lanes();
        Self::from_lanes(vector::normalize_lanes(q, Backend::dot4(q, q)))
    }

    #[inline]
    pub fn normalize_est(self) -> Self {
        let q = self.lanes();
        Self::from_lanes(vector::normalize_est_lanes(q, Backend::dot4(q, q)))
    }

    #[inline]
    pub fn conjugate(self) -> Self {
        Self::from_lanes(Backend::mul(self.lanes(), Backend::set(-1.0, -1.0, -1.0, 1.0)))
    }

    /// 逆：`conjugate / length²`
    ///
    /// 长度平方小于 `FLT_EPSILON` 时返回零四元数。
    #[inline]
    pub fn inverse(self) -> Self {
        let q = self.lanes();
        let length_sq = Backend::dot4(q, q);
        let degenerate = Backend::less_or_equal(length_sq, Backend::splat_epsilon());
        let result = Backend::div(self.conjugate().lanes(), length_sq);
        Self::from_lanes(Backend::select(result, Backend::zero(), degenerate))
    }

    /// 先应用 `q1` 再应用 `q2`：`q2 * q1`
    #[inline]
    pub fn concatenate(q1: Self, q2: Self) -> Self {
        q2 * q1
    }

    /// 归一化线性插值，`b` 与 `a` 反向时先取反
    pub fn lerp(self, rhs: Self, t: f32) -> Self {
        let rhs = if self.dot(rhs) < 0.0 { -rhs } else { rhs };
        Self::from_lanes(Backend::lerp(self.lanes(), rhs.lanes(), Backend::splat(t))).normalize()
    }

    /// 球面线性插值，沿最短弧
    ///
    /// 两端几乎重合时退化为线性插值（结果不再归一化）。
    pub fn slerp(self, rhs: Self, t: f32) -> Self {
        let mut cos_omega = self.dot(rhs);
        let sign = if cos_omega < 0.0 { -1.0 } else { 1.0 };
        cos_omega *= sign;

        let (s0, s1) = if cos_omega < SLERP_THRESHOLD {
            let sin_omega = (1.0 - cos_omega * cos_omega).sqrt();
            let omega = crate::scalar_atan2(sin_omega, cos_omega);
            let inv_sin = 1.0 / sin_omega;
            let s = Backend::sin(Backend::set((1.0 - t) * omega, t * omega, 0.0, 0.0));
            (Backend::get_x(s) * inv_sin, Backend::get_y(s) * inv_sin)
        } else {
            (1.0 - t, t)
        };

        let r = Backend::mul(self.lanes(), Backend::splat(s0));
        Self::from_lanes(Backend::multiply_add(
            rhs.lanes(),
            Backend::splat(s1 * sign),
            r,
        ))
    }

    /// 转为 `(单位轴, 角度)`
    ///
    /// 单位四元数（无旋转）返回 `(UNIT_X, 0)`。
    pub fn to_axis_angle(self) -> (Vector3, f32) {
        let q = self.normalize();
        let axis = Vector3::new(q.x, q.y, q.z);
        if axis.length_squared() < game_math_simd::FLT_EPSILON * game_math_simd::FLT_EPSILON {
            return (Vector3::UNIT_X, 0.0);
        }
        let angle = 2.0 * vector::angle_from_cosine(Backend::splat(q.w), false);
        (axis.normalize(), angle)
    }

    /// 转为 `(pitch, yaw, roll)`，见 [`Float3x3::euler_angles`]
    #[inline]
    pub fn to_euler_angles(self) -> Vector3 {
        self.to_rotation_matrix3().euler_angles()
    }

    #[inline]
    pub fn to_rotation_matrix(self) -> Float4x4 {
        Float4x4::make_from_quaternion(self)
    }

    #[inline]
    pub fn to_rotation_matrix3(self) -> Float3x3 {
        Float3x3::make_from_quaternion(self)
    }

    #[inline]
    pub fn rotate_vector(self, v: Vector3) -> Vector3 {
        v.rotate(self)
    }

    /// 两个旋转之间的最小夹角（弧度，`[0, π]`）
    pub fn angle_between(self, rhs: Self) -> f32 {
        let d = self.normalize().dot(rhs.normalize()).abs();
        2.0 * vector::angle_from_cosine(Backend::splat(d), false)
    }

    #[inline]
    pub fn near_equal(self, rhs: Self, epsilon: f32) -> bool {
        let m = Backend::near_equal(self.lanes(), rhs.lanes(), Backend::splat(epsilon));
        vector::all_lanes(m, 4)
    }

    /// 精确等于 `(0, 0, 0, 1)`
    #[inline]
    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }
}

impl From<Vector4> for Quaternion {
    fn from(v: Vector4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

impl From<Quaternion> for Vector4 {
    fn from(q: Quaternion) -> Self {
        Vector4::new(q.x, q.y, q.z, q.w)
    }
}

impl From<[f32; 4]> for Quaternion {
    fn from(a: [f32; 4]) -> Self {
        Self::new(a[0], a[1], a[2], a[3])
    }
}

impl From<Quaternion> for [f32; 4] {
    fn from(q: Quaternion) -> Self {
        [q.x, q.y, q.z, q.w]
    }
}

/// Hamilton积
impl std::ops::Mul for Quaternion {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let a = self.lanes();
        let b = rhs.lanes();

        let r = Backend::mul(Backend::splat_w(a), b);

        let t = Backend::mul(
            Backend::swizzle::<3, 2, 1, 0>(b),
            Backend::set(1.0, -1.0, 1.0, -1.0),
        );
        let r = Backend::multiply_add(Backend::splat_x(a), t, r);

        let t = Backend::mul(
            Backend::swizzle::<2, 3, 0, 1>(b),
            Backend::set(1.0, 1.0, -1.0, -1.0),
        );
        let r = Backend::multiply_add(Backend::splat_y(a), t, r);

        let t = Backend::mul(
            Backend::swizzle::<1, 0, 3, 2>(b),
            Backend::set(-1.0, 1.0, 1.0, -1.0),
        );
        Self::from_lanes(Backend::multiply_add(Backend::splat_z(a), t, r))
    }
}

impl std::ops::Div for Quaternion {
    type Output = Self;

    /// `self * rhs.inverse()`
    #[inline]
    fn div(self, rhs: Self) -> Self {
        self * rhs.inverse()
    }
}

impl std::ops::Add for Quaternion {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::from_lanes(Backend::add(self.lanes(), rhs.lanes()))
    }
}

impl std::ops::Sub for Quaternion {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::from_lanes(Backend::sub(self.lanes(), rhs.lanes()))
    }
}

impl std::ops::Mul<f32> for Quaternion {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::from_lanes(Backend::scale(self.lanes(), rhs))
    }
}

impl std::ops::Mul<Quaternion> for f32 {
    type Output = Quaternion;

    #[inline]
    fn mul(self, rhs: Quaternion) -> Quaternion {
        rhs * self
    }
}

impl std::ops::Div<f32> for Quaternion {
    type Output = Self;

    #[inline]
    fn div(self, rhs: f32) -> Self {
        Self::from_lanes(Backend::div(self.lanes(), Backend::splat(rhs)))
    }
}

impl std::ops::Neg for Quaternion {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::from_lanes(Backend::negate(self.lanes()))
    }
}

impl std::ops::MulAssign for Quaternion {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl std::ops::DivAssign for Quaternion {
    #[inline]
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl std::ops::AddAssign for Quaternion {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::ops::SubAssign for Quaternion {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl std::ops::MulAssign<f32> for Quaternion {
    #[inline]
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

impl std::ops::DivAssign<f32> for Quaternion {
    #[inline]
    fn div_assign(&mut self, rhs: f32) {
        *self = *self / rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn same_rotation(a: Quaternion, b: Quaternion, eps: f32) -> bool {
        a.near_equal(b, eps) || a.near_equal(-b, eps)
    }

    #[test]
    fn test_hamilton_product_basis() {
        let i = Quaternion::new(1.0, 0.0, 0.0, 0.0);
        let j = Quaternion::new(0.0, 1.0, 0.0, 0.0);
        let k = Quaternion::new(0.0, 0.0, 1.0, 0.0);
        assert_eq!(i * j, k);
        assert_eq!(j * k, i);
        assert_eq!(k * i, j);
        assert_eq!(j * i, -k);
        assert_eq!(i * i, Quaternion::new(0.0, 0.0, 0.0, -1.0));
        assert_eq!(Quaternion::IDENTITY * k, k);
    }

    #[test]
    fn test_concatenate_order() {
        let q1 = Quaternion::from_axis_angle(Vector3::UNIT_X, FRAC_PI_2);
        let q2 = Quaternion::from_axis_angle(Vector3::UNIT_Y, FRAC_PI_2);
        let v = Vector3::new(0.3, -1.0, 2.0);

        let both = Quaternion::concatenate(q1, q2);
        assert!(v.rotate(both).near_equal(v.rotate(q1).rotate(q2), 1e-5));

        // 与行向量矩阵乘法顺序一致
        let m = q1.to_rotation_matrix() * q2.to_rotation_matrix();
        assert!(v.transform_normal(&m).near_equal(v.rotate(both), 1e-5));
    }

    #[test]
    fn test_axis_angle_round_trip() {
        let axis = Vector3::new(1.0, -2.0, 0.5).normalize();
        let q = Quaternion::from_axis_angle(axis * 3.0, 1.1);
        assert!((q.length() - 1.0).abs() < 1e-6);

        let (a, angle) = q.to_axis_angle();
        assert!(a.near_equal(axis, 1e-5));
        assert!((angle - 1.1).abs() < 1e-5);

        let (a, angle) = Quaternion::IDENTITY.to_axis_angle();
        assert_eq!(a, Vector3::UNIT_X);
        assert_eq!(angle, 0.0);
    }

    #[test]
    fn test_matrix_round_trip_all_branches() {
        let rotations = [
            Quaternion::from_axis_angle(Vector3::new(1.0, 0.2, 0.1), 2.9),
            Quaternion::from_axis_angle(Vector3::new(0.1, 1.0, 0.2), 2.9),
            Quaternion::from_axis_angle(Vector3::new(0.2, 0.1, 1.0), 2.9),
            Quaternion::from_axis_angle(Vector3::new(0.3, 0.4, 0.5), 0.4),
            Quaternion::IDENTITY,
        ];
        for q in rotations {
            let back = Quaternion::from_rotation_matrix(&q.to_rotation_matrix3());
            assert!(same_rotation(q, back, 1e-5), "{:?} vs {:?}", q, back);
        }
    }

    #[test]
    fn test_yaw_pitch_roll_matches_matrices() {
        let (yaw, pitch, roll) = (0.6, -0.4, 1.3);
        let q = Quaternion::from_yaw_pitch_roll(yaw, pitch, roll);
        let expected = Float4x4::make_rotation_z(roll)
            * Float4x4::make_rotation_x(pitch)
            * Float4x4::make_rotation_y(yaw);
        assert!(q.to_rotation_matrix().near_equal(&expected, 1e-5));

        let angles = q.to_euler_angles();
        assert!(angles.near_equal(Vector3::new(pitch, yaw, roll), 1e-4));
        assert!(same_rotation(Quaternion::from_euler_angles(angles), q, 1e-5));
    }

    #[test]
    fn test_inverse_and_division() {
        let q = Quaternion::from_axis_angle(Vector3::UNIT_Z, 0.7) * 2.0;
        assert!((q * q.inverse()).near_equal(Quaternion::IDENTITY, 1e-6));
        assert!((q / q).near_equal(Quaternion::IDENTITY, 1e-6));
        assert_eq!(Quaternion::new(0.0, 0.0, 0.0, 1e-5).inverse(), Quaternion::new(0.0, 0.0, 0.0, 0.0));

        let unit = q.normalize();
        assert!(unit.inverse().near_equal(unit.conjugate(), 1e-6));
    }

    #[test]
    fn test_slerp_endpoints_and_shortest_arc() {
        let a = Quaternion::from_axis_angle(Vector3::UNIT_Y, 0.2);
        let b = Quaternion::from_axis_angle(Vector3::UNIT_Y, 1.4);
        assert!(a.slerp(b, 0.0).near_equal(a, 1e-6));
        assert!(a.slerp(b, 1.0).near_equal(b, 1e-6));
        assert!(a
            .slerp(b, 0.5)
            .near_equal(Quaternion::from_axis_angle(Vector3::UNIT_Y, 0.8), 1e-5));

        // -b 表示同一旋转，插值仍走最短弧
        let mid = a.slerp(-b, 0.5);
        assert!(same_rotation(mid, Quaternion::from_axis_angle(Vector3::UNIT_Y, 0.8), 1e-5));

        let lerped = a.lerp(-b, 0.5);
        assert!((lerped.length() - 1.0).abs() < 1e-6);
        assert!(same_rotation(lerped, mid, 1e-5));

        // 几乎重合时退化为线性插值
        assert!(a.slerp(a, 0.3).near_equal(a, 1e-6));
    }

    #[test]
    fn test_from_to_rotation() {
        let q = Quaternion::from_to_rotation(Vector3::UNIT_X, Vector3::new(0.0, 2.0, 0.0));
        assert!(q.rotate_vector(Vector3::UNIT_X).near_equal(Vector3::UNIT_Y, 1e-6));

        let flip = Quaternion::from_to_rotation(Vector3::UNIT_X, -Vector3::UNIT_X);
        assert!(flip.rotate_vector(Vector3::UNIT_X).near_equal(-Vector3::UNIT_X, 1e-5));

        assert!(Quaternion::from_to_rotation(Vector3::UNIT_Z, Vector3::UNIT_Z).is_identity());
    }

    #[test]
    fn test_angle_between() {
        let a = Quaternion::from_axis_angle(Vector3::UNIT_X, 0.3);
        let b = Quaternion::from_axis_angle(Vector3::UNIT_X, 0.3 + FRAC_PI_4);
        assert!((a.angle_between(b) - FRAC_PI_4).abs() < 1e-4);
        assert!(a.angle_between(-a).abs() < 1e-3);
        let half_turn = Quaternion::from_axis_angle(Vector3::UNIT_Z, PI);
        assert!((Quaternion::IDENTITY.angle_between(half_turn) - PI).abs() < 1e-3);
    }

    #[test]
    fn test_arithmetic_and_conversions() {
        let q = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(q + q, q * 2.0);
        assert_eq!(2.0 * q, q * 2.0);
        assert_eq!(q - q, Quaternion::new(0.0, 0.0, 0.0, 0.0));
        assert_eq!((q * 2.0) / 2.0, q);
        assert_eq!(q.conjugate(), Quaternion::new(-1.0, -2.0, -3.0, 4.0));
        assert_eq!(q.length_squared(), 30.0);
        assert_eq!(Quaternion::from(Vector4::from(q)), q);
        assert_eq!(<[f32; 4]>::from(q), [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(Quaternion::default(), Quaternion::IDENTITY);

        let mut r = q;
        r *= Quaternion::IDENTITY;
        r += q;
        r -= q;
        r /= 1.0;
        assert_eq!(r, q);
        assert!((q.normalize_est().length() - 1.0).abs() < 1.0 / 1024.0);
    }
}
