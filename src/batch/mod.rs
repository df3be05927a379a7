//! 批量流变换
//!
//! 面向交错顶点布局：输入、输出都是按字节步长排列的原始缓冲区，
//! 每条记录只读写前 `size_of::<T>()` 个字节，步长中的其余字节保持不变。
//!
//! 每个元素都调用对应的单向量方法，结果与逐个变换逐位相同。
//! 前置条件不满足时普通版本panic，`try_*` 版本返回 [`MathError`]。

mod stream;

use bytemuck::Pod;

use crate::error::{MathError, MathResult};

/// 校验一侧缓冲区的步长与长度
///
/// # 参数
///
/// * `len` - 缓冲区字节数
/// * `stride` - 相邻记录的字节间距
/// * `size` - 单条记录字节数
/// * `count` - 记录条数
pub(crate) fn check_layout(len: usize, stride: usize, size: usize, count: usize) -> MathResult<()> {
    if stride < size {
        return Err(MathError::StrideTooSmall {
            stride,
            minimum: size,
        });
    }
    if count == 0 {
        return Ok(());
    }

    let required = (count - 1)
        .checked_mul(stride)
        .and_then(|n| n.checked_add(size))
        .unwrap_or(usize::MAX);
    if len < required {
        return Err(MathError::BufferTooSmall {
            required,
            actual: len,
        });
    }
    Ok(())
}

/// 按步长逐条读取 `I`、写入 `O`
pub(crate) fn stream_map<I: Pod, O: Pod>(
    output: &mut [u8],
    output_stride: usize,
    input: &[u8],
    input_stride: usize,
    count: usize,
    f: impl Fn(I) -> O,
) -> MathResult<()> {
    let in_size = std::mem::size_of::<I>();
    let out_size = std::mem::size_of::<O>();
    check_layout(input.len(), input_stride, in_size, count)?;
    check_layout(output.len(), output_stride, out_size, count)?;

    for i in 0..count {
        let src = i * input_stride;
        let dst = i * output_stride;
        let value: I = bytemuck::pod_read_unaligned(&input[src..src + in_size]);
        output[dst..dst + out_size].copy_from_slice(bytemuck::bytes_of(&f(value)));
    }
    Ok(())
}
