//! 与 `glam` 的互相转换
//!
//! glam使用列向量约定（`M * v`），本库使用行向量约定（`v * M`）。
//! 同一变换在两边互为转置，而glam按列存储，所以本库的第i行正好是glam的第i列，
//! 转换只是重新解释存储，变换语义保持不变。

use crate::matrix::{Float3x3, Float4x4};
use crate::quaternion::Quaternion;
use crate::vector::{Vector2, Vector3, Vector4};

impl From<glam::Vec2> for Vector2 {
    fn from(v: glam::Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vector2> for glam::Vec2 {
    fn from(v: Vector2) -> Self {
        glam::Vec2::new(v.x, v.y)
    }
}

impl From<glam::Vec3> for Vector3 {
    fn from(v: glam::Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector3> for glam::Vec3 {
    fn from(v: Vector3) -> Self {
        glam::Vec3::new(v.x, v.y, v.z)
    }
}

impl From<glam::Vec4> for Vector4 {
    fn from(v: glam::Vec4) -> Self {
        Self::from_array(v.to_array())
    }
}

impl From<Vector4> for glam::Vec4 {
    fn from(v: Vector4) -> Self {
        glam::Vec4::from_array(v.to_array())
    }
}

impl From<glam::Quat> for Quaternion {
    fn from(q: glam::Quat) -> Self {
        Self::new(q.x, q.y, q.z, q.w)
    }
}

impl From<Quaternion> for glam::Quat {
    fn from(q: Quaternion) -> Self {
        glam::Quat::from_xyzw(q.x, q.y, q.z, q.w)
    }
}

impl From<glam::Mat3> for Float3x3 {
    fn from(m: glam::Mat3) -> Self {
        Self::from_rows(m.to_cols_array_2d())
    }
}

impl From<Float3x3> for glam::Mat3 {
    fn from(m: Float3x3) -> Self {
        glam::Mat3::from_cols_array_2d(&m.to_rows())
    }
}

impl From<glam::Mat4> for Float4x4 {
    fn from(m: glam::Mat4) -> Self {
        Self::from_rows(m.to_cols_array_2d())
    }
}

impl From<Float4x4> for glam::Mat4 {
    fn from(m: Float4x4) -> Self {
        glam::Mat4::from_cols_array_2d(&m.to_rows())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{EulerRot, Mat4, Quat, Vec3};

    fn assert_mat4(ours: Float4x4, theirs: Mat4) {
        assert!(
            ours.near_equal(&Float4x4::from(theirs), 1e-5),
            "{:?} vs {:?}",
            ours,
            theirs
        );
    }

    #[test]
    fn test_point_transform_semantics() {
        let ours = Float4x4::make_rotation_x(0.4) * Float4x4::make_translation(1.0, 2.0, 3.0);
        let theirs = Mat4::from(ours);
        let p = Vector3::new(0.5, -1.5, 2.0);
        let expected = Vector3::from(theirs.transform_point3(Vec3::from(p)));
        assert!(p.transform_coord(&ours).near_equal(expected, 1e-5));
    }

    #[test]
    fn test_composition_order() {
        let a = Float4x4::make_rotation_z(0.3);
        let b = Float4x4::make_translation(4.0, 0.0, -1.0);
        // 行向量 A*B 对应列向量 B*A
        assert_mat4(a * b, Mat4::from(b) * Mat4::from(a));
        assert_mat4(a.inverse(), Mat4::from(a).inverse());
        assert!(((a * b).determinant() - (Mat4::from(b) * Mat4::from(a)).determinant()).abs() < 1e-5);
    }

    #[test]
    fn test_factories_match_glam() {
        assert_mat4(Float4x4::make_rotation_y(1.1), Mat4::from_rotation_y(1.1));
        assert_mat4(
            Float4x4::make_rotation_axis(Vector3::new(1.0, 2.0, -0.5), 0.8),
            Mat4::from_axis_angle(Vec3::new(1.0, 2.0, -0.5).normalize(), 0.8),
        );
        assert_mat4(
            Float4x4::make_perspective_field_of_view(1.2, 1.6, 0.5, 200.0),
            Mat4::perspective_lh(1.2, 1.6, 0.5, 200.0),
        );
        assert_mat4(
            Float4x4::make_orthographic_off_center(-3.0, 5.0, -1.0, 2.0, 0.1, 20.0),
            Mat4::orthographic_lh(-3.0, 5.0, -1.0, 2.0, 0.1, 20.0),
        );
        let eye = Vector3::new(3.0, 4.0, -5.0);
        assert_mat4(
            Float4x4::make_look_at(eye, Vector3::ZERO, Vector3::UP),
            Mat4::look_at_lh(Vec3::from(eye), Vec3::ZERO, Vec3::Y),
        );
    }

    #[test]
    fn test_quaternion_matches_glam() {
        let (yaw, pitch, roll) = (0.9, -0.3, 0.6);
        let ours = Quaternion::from_yaw_pitch_roll(yaw, pitch, roll);
        let theirs = Quat::from_euler(EulerRot::YXZ, yaw, pitch, roll);
        assert!(ours.near_equal(Quaternion::from(theirs), 1e-6));

        let a = Quaternion::from_axis_angle(Vector3::UNIT_X, 0.5);
        let b = Quaternion::from_axis_angle(Vector3::new(0.0, 1.0, 1.0), 1.3);
        let product = Quaternion::from(Quat::from(a) * Quat::from(b));
        assert!((a * b).near_equal(product, 1e-6));

        let v = Vector3::new(1.0, -2.0, 0.5);
        let rotated = Vector3::from(Quat::from(b) * Vec3::from(v));
        assert!(v.rotate(b).near_equal(rotated, 1e-5));

        assert_mat4(b.to_rotation_matrix(), Mat4::from_quat(Quat::from(b)));
    }

    #[test]
    fn test_round_trips() {
        let m = Float3x3::make_rotation_z(0.25) * Float3x3::make_scale(1.0, 2.0, 3.0);
        assert_eq!(Float3x3::from(glam::Mat3::from(m)), m);
        let v = Vector4::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(Vector4::from(glam::Vec4::from(v)), v);
        assert_eq!(Vector2::from(glam::Vec2::from(Vector2::new(5.0, 6.0))), Vector2::new(5.0, 6.0));
    }
}
