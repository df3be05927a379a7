//! `Float4x4` 工厂函数：平移、缩放、旋转、相机与投影
//!
//! 全部采用左手坐标系与行向量布局（平移位于第4行，观察方向为+Z，
//! 投影后深度范围为 `[0, 1]`）。

use super::{Float3x3, Float4x4};
use crate::quaternion::Quaternion;
use crate::vector::Vector3;
use crate::scalar_sin_cos;

/// 约束公告板：视线与旋转轴夹角小于0.1°时改用备用前向
const BILLBOARD_MIN_ANGLE: f32 = 0.998_254_67;

/// 投影参数：近/远平面必须可区分
const PROJECTION_EPSILON: f32 = 1.0e-5;

impl Float4x4 {
    pub const fn make_translation(x: f32, y: f32, z: f32) -> Self {
        Self::new(
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            x, y, z, 1.0,
        )
    }

    #[inline]
    pub const fn make_translation_from_vector(v: Vector3) -> Self {
        Self::make_translation(v.x, v.y, v.z)
    }

    pub const fn make_scale(x: f32, y: f32, z: f32) -> Self {
        Self::new(
            x, 0.0, 0.0, 0.0, //
            0.0, y, 0.0, 0.0, //
            0.0, 0.0, z, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        )
    }

    #[inline]
    pub const fn make_uniform_scale(s: f32) -> Self {
        Self::make_scale(s, s, s)
    }

    #[inline]
    pub fn make_rotation_x(angle: f32) -> Self {
        Self::from(Float3x3::make_rotation_x(angle))
    }

    #[inline]
    pub fn make_rotation_y(angle: f32) -> Self {
        Self::from(Float3x3::make_rotation_y(angle))
    }

    #[inline]
    pub fn make_rotation_z(angle: f32) -> Self {
        Self::from(Float3x3::make_rotation_z(angle))
    }

    /// 绕任意轴旋转（轴先归一化）
    #[inline]
    pub fn make_rotation_axis(axis: Vector3, angle: f32) -> Self {
        Self::from(Float3x3::make_rotation_axis(axis, angle))
    }

    /// 绕单位轴旋转
    #[inline]
    pub fn make_rotation_normal(normal: Vector3, angle: f32) -> Self {
        Self::from(Float3x3::make_rotation_normal(normal, angle))
    }

    #[inline]
    pub fn make_from_quaternion(q: Quaternion) -> Self {
        Self::from(Float3x3::make_from_quaternion(q))
    }

    /// 依次应用roll（Z）、pitch（X）、yaw（Y）
    #[inline]
    pub fn make_from_yaw_pitch_roll(yaw: f32, pitch: f32, roll: f32) -> Self {
        Self::from(Float3x3::make_from_yaw_pitch_roll(yaw, pitch, roll))
    }

    /// 缩放、旋转、平移依次应用的仿射矩阵
    pub fn make_affine_position_rotation_scale(
        position: Vector3,
        rotation: Quaternion,
        scale: Vector3,
    ) -> Self {
        let r = Float3x3::make_from_quaternion(rotation);
        let mut m = Self::IDENTITY;
        for (i, s) in scale.to_array().into_iter().enumerate() {
            let row = Vector3::from(r.row(i)) * s;
            m.rows[i] = row.extend(0.0).to_array();
        }
        m.set_translation(position);
        m
    }

    /// 世界矩阵：基向量由 `forward` 与 `up` 正交化得到，平移为 `position`
    pub fn make_world(position: Vector3, forward: Vector3, up: Vector3) -> Self {
        let z = forward.normalize();
        let x = up.cross(z).normalize();
        let y = z.cross(x);
        Self::from_basis(x, y, z, position)
    }

    /// 观察矩阵：从 `eye` 沿 `direction` 观察
    pub fn make_look_to(eye: Vector3, direction: Vector3, up: Vector3) -> Self {
        debug_assert!(direction != Vector3::ZERO, "look direction must be non-zero");
        debug_assert!(up != Vector3::ZERO, "up vector must be non-zero");

        let r2 = direction.normalize();
        let r0 = up.cross(r2).normalize();
        let r1 = r2.cross(r0);
        let neg_eye = -eye;

        Self::new(
            r0.x, r1.x, r2.x, 0.0, //
            r0.y, r1.y, r2.y, 0.0, //
            r0.z, r1.z, r2.z, 0.0, //
            r0.dot(neg_eye), r1.dot(neg_eye), r2.dot(neg_eye), 1.0,
        )
    }

    /// 观察矩阵：从 `eye` 看向 `target`
    #[inline]
    pub fn make_look_at(eye: Vector3, target: Vector3, up: Vector3) -> Self {
        Self::make_look_to(eye, target - eye, up)
    }

    /// 透视投影，近平面视口尺寸为 `width x height`
    pub fn make_perspective(width: f32, height: f32, near: f32, far: f32) -> Self {
        debug_assert!(near > 0.0 && far > 0.0, "clip planes must be positive");
        debug_assert!((far - near).abs() > PROJECTION_EPSILON, "near and far must differ");
        debug_assert!(width != 0.0 && height != 0.0, "viewport must be non-empty");

        let two_near = near + near;
        let range = far / (far - near);
        Self::new(
            two_near / width, 0.0, 0.0, 0.0, //
            0.0, two_near / height, 0.0, 0.0, //
            0.0, 0.0, range, 1.0, //
            0.0, 0.0, -range * near, 0.0,
        )
    }

    /// 透视投影
    ///
    /// # 参数
    ///
    /// * `fov_y` - 垂直视场角（弧度）
    /// * `aspect` - 宽高比
    /// * `near` / `far` - 近远裁剪面距离
    pub fn make_perspective_field_of_view(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        debug_assert!(near > 0.0 && far > 0.0, "clip planes must be positive");
        debug_assert!((far - near).abs() > PROJECTION_EPSILON, "near and far must differ");
        debug_assert!(fov_y > 0.0 && aspect > 0.0, "fov and aspect must be positive");

        let (s, c) = scalar_sin_cos(0.5 * fov_y);
        let height = c / s;
        let width = height / aspect;
        let range = far / (far - near);
        Self::new(
            width, 0.0, 0.0, 0.0, //
            0.0, height, 0.0, 0.0, //
            0.0, 0.0, range, 1.0, //
            0.0, 0.0, -range * near, 0.0,
        )
    }

    /// 非对称透视投影（近平面上的视口边界）
    pub fn make_perspective_off_center(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Self {
        debug_assert!(near > 0.0 && far > 0.0, "clip planes must be positive");
        debug_assert!((far - near).abs() > PROJECTION_EPSILON, "near and far must differ");
        debug_assert!(right != left && top != bottom, "viewport must be non-empty");

        let two_near = near + near;
        let rw = 1.0 / (right - left);
        let rh = 1.0 / (top - bottom);
        let range = far / (far - near);
        Self::new(
            two_near * rw, 0.0, 0.0, 0.0, //
            0.0, two_near * rh, 0.0, 0.0, //
            -(left + right) * rw, -(top + bottom) * rh, range, 1.0, //
            0.0, 0.0, -range * near, 0.0,
        )
    }

    /// 正交投影
    pub fn make_orthographic(width: f32, height: f32, near: f32, far: f32) -> Self {
        debug_assert!((far - near).abs() > PROJECTION_EPSILON, "near and far must differ");
        debug_assert!(width != 0.0 && height != 0.0, "viewport must be non-empty");

        let range = 1.0 / (far - near);
        Self::new(
            2.0 / width, 0.0, 0.0, 0.0, //
            0.0, 2.0 / height, 0.0, 0.0, //
            0.0, 0.0, range, 0.0, //
            0.0, 0.0, -range * near, 1.0,
        )
    }

    /// 非对称正交投影
    pub fn make_orthographic_off_center(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Self {
        debug_assert!((far - near).abs() > PROJECTION_EPSILON, "near and far must differ");
        debug_assert!(right != left && top != bottom, "viewport must be non-empty");

        let rw = 1.0 / (right - left);
        let rh = 1.0 / (top - bottom);
        let range = 1.0 / (far - near);
        Self::new(
            rw + rw, 0.0, 0.0, 0.0, //
            0.0, rh + rh, 0.0, 0.0, //
            0.0, 0.0, range, 0.0, //
            -(left + right) * rw, -(top + bottom) * rh, -range * near, 1.0,
        )
    }

    /// 面向相机的公告板
    ///
    /// 物体与相机重合时使用 `camera_forward` 的反方向（未提供时为 -Z）。
    pub fn make_billboard(
        object: Vector3,
        camera: Vector3,
        camera_up: Vector3,
        camera_forward: Option<Vector3>,
    ) -> Self {
        let z = Self::billboard_face(object, camera, camera_forward);
        let x = camera_up.cross(z).normalize();
        let y = z.cross(x);
        Self::from_basis(x, y, z, object)
    }

    /// 只能绕 `rotate_axis` 旋转的公告板
    ///
    /// 视线几乎与旋转轴平行时改用 `object_forward`；它也与轴平行（或未提供）时，
    /// 使用 -Z，再退化到 +X。
    pub fn make_constrained_billboard(
        object: Vector3,
        camera: Vector3,
        rotate_axis: Vector3,
        camera_forward: Option<Vector3>,
        object_forward: Option<Vector3>,
    ) -> Self {
        let face = Self::billboard_face(object, camera, camera_forward);
        let y = rotate_axis;
        let parallel = |v: Vector3| y.dot(v).abs() > BILLBOARD_MIN_ANGLE;
        let fallback = || {
            if parallel(-Vector3::UNIT_Z) {
                Vector3::UNIT_X
            } else {
                -Vector3::UNIT_Z
            }
        };

        let z = if parallel(face) {
            match object_forward {
                Some(forward) if !parallel(forward) => forward,
                _ => fallback(),
            }
        } else {
            face
        };

        let x = y.cross(z).normalize();
        let z = x.cross(y).normalize();
        Self::from_basis(x, y, z, object)
    }

    fn billboard_face(object: Vector3, camera: Vector3, camera_forward: Option<Vector3>) -> Vector3 {
        let face = object - camera;
        if face.length_squared() < game_math_simd::FLT_EPSILON {
            camera_forward.map_or(-Vector3::UNIT_Z, |f| -f)
        } else {
            face.normalize()
        }
    }

    fn from_basis(x: Vector3, y: Vector3, z: Vector3, origin: Vector3) -> Self {
        Self::new(
            x.x, x.y, x.z, 0.0, //
            y.x, y.y, y.z, 0.0, //
            z.x, z.y, z.z, 0.0, //
            origin.x, origin.y, origin.z, 1.0,
        )
    }
}
