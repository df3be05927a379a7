//! # game_math_simd
//!
//! 数学库的内建函数层：把SSE2、NEON与标量回退统一到同一个 [`SimdBackend`] trait 之后。
//!
//! ## 特性
//!
//! - **统一契约**: 所有后端提供相同签名的加载/存储、算术、比较、选择、重排、
//!   开方/倒数、超越函数与4x4矩阵运算
//! - **编译期选择**: [`ActiveBackend`] 由目标平台与 `scalar` feature 决定，运行时不做分派
//! - **数值一致**: 超越函数与矩阵内核以泛型实现，各后端共享同一套系数与运算顺序
//! - **CPU检测**: 仅用于诊断，不影响后端选择
//!
//! ## 快速开始
//!
//! ```rust
//! use game_math_simd::{ActiveBackend as B, SimdBackend};
//!
//! let a = B::set(1.0, 2.0, 3.0, 4.0);
//! let b = B::set(5.0, 6.0, 7.0, 8.0);
//! let dot = B::get_x(B::dot4(a, b));
//! assert_eq!(dot, 70.0);
//! ```
//!
//! ## 模块
//!
//! - [`backend`]: `SimdBackend` trait、`LaneMatrix`、`Align16`
//! - [`scalar`]: 标量回退后端
//! - `x86`: SSE2后端（x86/x86_64）
//! - `arm`: NEON后端（aarch64）
//! - [`transcendental`]: 超越函数多项式逼近
//! - [`matrix`]: 4x4矩阵通用内核
//! - [`cpu_detect`]: CPU特性检测

pub mod backend;
pub mod cpu_detect;
pub mod matrix;
pub mod scalar;
pub mod transcendental;

#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), target_feature = "sse2"))]
pub mod x86;

#[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
pub mod arm;

#[cfg(test)]
mod tests;

// 重新导出主要类型
pub use backend::{
    Align16, LaneMatrix, SimdBackend, ABS_MASK, ALL_BITS, FLT_EPSILON, INFINITY_BITS, QNAN_BITS,
    SIGN_MASK,
};
pub use cpu_detect::{describe_cpu, detect_cpu_features, CpuFeatures, CpuVendor};
pub use scalar::ScalarBackend;

#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), target_feature = "sse2"))]
pub use x86::Sse2Backend;

#[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
pub use arm::NeonBackend;

/// 当前编译目标使用的后端
#[cfg(all(
    not(feature = "scalar"),
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse2"
))]
pub type ActiveBackend = Sse2Backend;

/// 当前编译目标使用的后端
#[cfg(all(not(feature = "scalar"), target_arch = "aarch64", target_feature = "neon"))]
pub type ActiveBackend = NeonBackend;

/// 当前编译目标使用的后端
#[cfg(any(
    feature = "scalar",
    not(any(
        all(any(target_arch = "x86", target_arch = "x86_64"), target_feature = "sse2"),
        all(target_arch = "aarch64", target_feature = "neon")
    ))
))]
pub type ActiveBackend = ScalarBackend;

/// 后端种类
///
/// 表示编译进来的SIMD指令集后端。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// 标量回退实现（无SIMD）
    Scalar,
    /// SSE2 (Intel/AMD)
    Sse2,
    /// ARM NEON (Apple M系列, 高通等)
    Neon,
}

impl BackendKind {
    /// 获取当前编译进来的后端
    ///
    /// # 示例
    ///
    /// ```rust
    /// use game_math_simd::{ActiveBackend, BackendKind, SimdBackend};
    ///
    /// assert_eq!(BackendKind::active(), ActiveBackend::KIND);
    /// ```
    pub const fn active() -> Self {
        <ActiveBackend as SimdBackend>::KIND
    }

    /// 后端名称
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Sse2 => "sse2",
            Self::Neon => "neon",
        }
    }

    /// 是否为硬件SIMD后端
    pub const fn is_hardware(&self) -> bool {
        !matches!(self, Self::Scalar)
    }

    /// 可以并行处理的f32数量（所有后端均为128位寄存器）
    pub const fn f32_lanes(&self) -> usize {
        4
    }

    /// `multiply_add` 是否为单次舍入
    pub const fn fused_multiply_add(&self) -> bool {
        match self {
            Self::Scalar => false,
            Self::Sse2 => cfg!(target_feature = "fma"),
            Self::Neon => true,
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
