//! 位置、旋转、缩放组合变换

use serde::{Deserialize, Serialize};

use crate::matrix::Float4x4;
use crate::quaternion::Quaternion;
use crate::vector::Vector3;

/// 3D变换
///
/// 作用顺序为 缩放 → 旋转 → 平移，与 [`Transform3D::to_matrix`] 的
/// `Scale * Rotation * Translation` 一致。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform3D {
    pub position: Vector3,
    pub rotation: Quaternion,
    pub scale: Vector3,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform3D {
    pub const IDENTITY: Self = Self {
        position: Vector3::ZERO,
        rotation: Quaternion::IDENTITY,
        scale: Vector3::ONE,
    };

    #[inline]
    pub const fn new(position: Vector3, rotation: Quaternion, scale: Vector3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    #[inline]
    pub const fn from_position(position: Vector3) -> Self {
        Self {
            position,
            rotation: Quaternion::IDENTITY,
            scale: Vector3::ONE,
        }
    }

    #[inline]
    pub fn to_matrix(&self) -> Float4x4 {
        Float4x4::make_affine_position_rotation_scale(self.position, self.rotation, self.scale)
    }

    /// 从仿射矩阵还原
    ///
    /// 矩阵含切变时结果只是近似；任一轴缩放接近0时返回 `None`。
    pub fn from_matrix(m: &Float4x4) -> Option<Self> {
        let (scale, rotation, position) = m.decompose()?;
        Some(Self::new(position, rotation, scale))
    }

    /// 变换一个点（含平移）
    #[inline]
    pub fn transform_point(&self, point: Vector3) -> Vector3 {
        (point * self.scale).rotate(self.rotation) + self.position
    }

    /// 变换一个方向（不含平移与缩放）
    #[inline]
    pub fn transform_direction(&self, direction: Vector3) -> Vector3 {
        direction.rotate(self.rotation)
    }

    /// 位置与缩放线性插值，旋转球面插值
    pub fn lerp(&self, rhs: &Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(rhs.position, t),
            rotation: self.rotation.slerp(rhs.rotation, t),
            scale: self.scale.lerp(rhs.scale, t),
        }
    }
}

impl From<Transform3D> for Float4x4 {
    fn from(t: Transform3D) -> Self {
        t.to_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn sample() -> Transform3D {
        Transform3D::new(
            Vector3::new(1.0, -2.0, 3.0),
            Quaternion::from_axis_angle(Vector3::new(0.0, 1.0, 1.0), 0.9),
            Vector3::new(2.0, 0.5, 1.5),
        )
    }

    #[test]
    fn test_default_is_identity() {
        let t = Transform3D::default();
        assert_eq!(t.to_matrix(), Float4x4::IDENTITY);
        assert_eq!(t.transform_point(Vector3::ONE), Vector3::ONE);
    }

    #[test]
    fn test_point_matches_matrix() {
        let t = sample();
        let m = t.to_matrix();
        for p in [Vector3::ZERO, Vector3::ONE, Vector3::new(-3.0, 0.25, 7.0)] {
            assert!(t.transform_point(p).near_equal(p.transform_coord(&m), 1e-5));
        }
    }

    #[test]
    fn test_matrix_round_trip() {
        let t = sample();
        let back = Transform3D::from_matrix(&t.to_matrix()).unwrap();
        assert!(back.position.near_equal(t.position, 1e-6));
        assert!(back.scale.near_equal(t.scale, 1e-5));
        assert!(
            back.rotation.near_equal(t.rotation, 1e-5) || back.rotation.near_equal(-t.rotation, 1e-5)
        );

        let flat = Float4x4::make_scale(1.0, 0.0, 1.0);
        assert!(Transform3D::from_matrix(&flat).is_none());
    }

    #[test]
    fn test_direction_ignores_translation_and_scale() {
        let mut t = Transform3D::from_position(Vector3::new(10.0, 0.0, 0.0));
        t.rotation = Quaternion::from_axis_angle(Vector3::UNIT_Y, FRAC_PI_2);
        t.scale = Vector3::splat(4.0);
        assert!(t
            .transform_direction(Vector3::UNIT_X)
            .near_equal(-Vector3::UNIT_Z, 1e-6));
    }

    #[test]
    fn test_lerp() {
        let a = Transform3D::IDENTITY;
        let b = Transform3D::new(
            Vector3::new(4.0, 0.0, 0.0),
            Quaternion::from_axis_angle(Vector3::UNIT_Z, 1.0),
            Vector3::splat(3.0),
        );
        let mid = a.lerp(&b, 0.5);
        assert_eq!(mid.position, Vector3::new(2.0, 0.0, 0.0));
        assert_eq!(mid.scale, Vector3::splat(2.0));
        assert!(mid
            .rotation
            .near_equal(Quaternion::from_axis_angle(Vector3::UNIT_Z, 0.5), 1e-5));
        assert_eq!(a.lerp(&b, 1.0).position, b.position);
    }

    #[test]
    fn test_serde_round_trip() {
        let t = sample();
        let json = serde_json::to_string(&t).unwrap();
        let back: Transform3D = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);

        let partial: Transform3D = serde_json::from_str(r#"{"position":{"x":1.0,"y":2.0,"z":3.0}}"#).unwrap();
        assert_eq!(partial.scale, Vector3::ONE);
        assert_eq!(partial.rotation, Quaternion::IDENTITY);
    }
}
