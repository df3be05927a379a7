//! # Game Math
//!
//! 面向实时3D引擎的跨平台SIMD线性代数库。
//!
//! ## Features
//!
//! - **双层结构**: 后端相关的内建函数层（[`simd`]，即 `game_math_simd`）与后端无关的值类型层
//! - **编译期后端**: SSE2 / NEON / 标量回退三选一，由目标平台决定，数值结果在容差内一致
//! - **值类型**: [`Vector2`]、[`Vector3`]、[`Vector4`]、[`Float3x3`]、[`Float4x3`]、
//!   [`Float3x4`]、[`Float4x4`]、[`Quaternion`]、[`Transform3D`]
//! - **流变换**: 按字节步长处理交错顶点缓冲区（[`batch`]）
//! - **诊断**: 后端报告与后端等价性检查（[`diagnostics`]）
//!
//! ## 约定
//!
//! 左手坐标系、行向量：`v' = v * M`，`A * B` 先应用A再应用B，平移位于矩阵第4行。
//! 四元数乘法是Hamilton积，`a * b` 先应用b再应用a。
//!
//! ### Example
//!
//! ```rust
//! use game_math::{Float4x4, Quaternion, Transform3D, Vector3};
//!
//! let transform = Transform3D::new(
//!     Vector3::new(0.0, 1.0, 0.0),
//!     Quaternion::from_axis_angle(Vector3::UP, std::f32::consts::FRAC_PI_2),
//!     Vector3::ONE,
//! );
//! let world = transform.to_matrix();
//! let view = Float4x4::make_look_at(Vector3::new(0.0, 2.0, -10.0), Vector3::ZERO, Vector3::UP);
//!
//! let p = Vector3::UNIT_X.transform_coord(&(world * view));
//! assert!(p.z > 8.0);
//! ```
//!
//! ## Modules
//!
//! - [`vector`]: 2/3/4维向量
//! - [`matrix`]: 3x3、4x3、3x4、4x4矩阵与工厂函数
//! - [`quaternion`]: 四元数
//! - [`transform`]: 位置/旋转/缩放组合
//! - [`batch`]: 批量流变换
//! - [`config`]: 配置系统
//! - [`logging`]: 日志初始化

mod macros;

/// Backend-independent vector value types
pub mod vector;
/// Row-major matrices and their factories
pub mod matrix;
/// Rotation quaternions
pub mod quaternion;
/// Position/rotation/scale composite
pub mod transform;
/// Byte-strided stream transforms
pub mod batch;
/// Configuration system
pub mod config;
/// Error types
pub mod error;
/// Logging setup
pub mod logging;
/// Backend diagnostics
pub mod diagnostics;
/// Conversions to and from glam
pub mod interop;


pub use game_math_simd as simd;
pub use game_math_simd::BackendKind;

pub use config::MathConfig;
pub use error::{MathError, MathResult};
pub use matrix::{Float3x3, Float3x4, Float4x3, Float4x4};
pub use quaternion::Quaternion;
pub use transform::Transform3D;
pub use vector::{Vector2, Vector3, Vector4};

use game_math_simd::SimdBackend;

/// 编译进来的后端
pub(crate) type Backend = game_math_simd::ActiveBackend;

/// 后端的通道寄存器类型
pub(crate) type Lanes = <Backend as SimdBackend>::Lanes;

/// 经由后端多项式计算的 `(sin, cos)`，保证各后端结果一致
#[inline]
pub(crate) fn scalar_sin_cos(angle: f32) -> (f32, f32) {
    let (s, c) = Backend::sin_cos(Backend::splat(angle));
    (Backend::get_x(s), Backend::get_x(c))
}

#[inline]
pub(crate) fn scalar_asin(x: f32) -> f32 {
    Backend::get_x(Backend::asin(Backend::splat(x)))
}

#[inline]
pub(crate) fn scalar_atan2(y: f32, x: f32) -> f32 {
    Backend::get_x(Backend::atan2(Backend::splat(y), Backend::splat(x)))
}
