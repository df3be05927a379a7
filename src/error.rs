//! 统一错误处理模块
//!
//! 数学运算本身不返回错误：退化输入（奇异矩阵、零长度向量）按文档回退到确定的数值。
//! 只有 `checked_*` / `try_*` 接口、配置加载与后端诊断才会产生 [`MathError`]。

use thiserror::Error;

use crate::config::ConfigError;

/// 数学库错误类型
#[derive(Error, Debug)]
pub enum MathError {
    /// 步长小于元素大小
    #[error("Stride too small: {stride} bytes (minimum {minimum})")]
    StrideTooSmall { stride: usize, minimum: usize },

    /// 缓冲区不足以容纳 `count` 个元素
    #[error("Buffer too small: {actual} bytes (required {required})")]
    BufferTooSmall { required: usize, actual: usize },

    /// 行列式绝对值小于 `FLT_EPSILON`
    #[error("Singular matrix: determinant {determinant}")]
    SingularMatrix { determinant: f32 },

    /// 硬件后端与标量回退结果不一致
    #[error("Backend mismatch in {operation}: error {error} exceeds tolerance {tolerance}")]
    BackendMismatch {
        operation: &'static str,
        error: f32,
        tolerance: f32,
    },

    /// 配置错误
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

pub type MathResult<T> = Result<T, MathError>;
