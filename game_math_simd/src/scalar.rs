//! 标量回退后端
//!
//! 在没有SSE2/NEON的平台上使用，或通过 `scalar` feature 强制启用。
//! 每个通道独立计算；掩码以位模式保存在f32中，只通过位运算读取。

use crate::backend::{SimdBackend, ALL_BITS};
use crate::BackendKind;

/// 标量回退后端
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScalarBackend;

#[inline(always)]
fn map(v: [f32; 4], f: impl Fn(f32) -> f32) -> [f32; 4] {
    [f(v[0]), f(v[1]), f(v[2]), f(v[3])]
}

#[inline(always)]
fn zip(a: [f32; 4], b: [f32; 4], f: impl Fn(f32, f32) -> f32) -> [f32; 4] {
    [f(a[0], b[0]), f(a[1], b[1]), f(a[2], b[2]), f(a[3], b[3])]
}

#[inline(always)]
fn zip_bits(a: [f32; 4], b: [f32; 4], f: impl Fn(u32, u32) -> u32) -> [f32; 4] {
    zip(a, b, |x, y| f32::from_bits(f(x.to_bits(), y.to_bits())))
}

#[inline(always)]
fn mask(condition: bool) -> f32 {
    f32::from_bits(if condition { ALL_BITS } else { 0 })
}

impl SimdBackend for ScalarBackend {
    type Lanes = [f32; 4];

    const KIND: BackendKind = BackendKind::Scalar;

    #[inline]
    fn zero() -> [f32; 4] {
        [0.0; 4]
    }

    #[inline]
    fn set(x: f32, y: f32, z: f32, w: f32) -> [f32; 4] {
        [x, y, z, w]
    }

    #[inline]
    fn splat(value: f32) -> [f32; 4] {
        [value; 4]
    }

    #[inline]
    fn to_array(v: [f32; 4]) -> [f32; 4] {
        v
    }

    #[inline]
    fn add(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
        zip(a, b, |x, y| x + y)
    }

    #[inline]
    fn sub(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
        zip(a, b, |x, y| x - y)
    }

    #[inline]
    fn mul(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
        zip(a, b, |x, y| x * y)
    }

    #[inline]
    fn div(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
        zip(a, b, |x, y| x / y)
    }

    // 与 `minps`/`maxps` 相同的NaN行为：比较失败时返回第二个操作数
    #[inline]
    fn min(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
        zip(a, b, |x, y| if x < y { x } else { y })
    }

    #[inline]
    fn max(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
        zip(a, b, |x, y| if x > y { x } else { y })
    }

    #[inline]
    fn floor(v: [f32; 4]) -> [f32; 4] {
        map(v, f32::floor)
    }

    #[inline]
    fn ceil(v: [f32; 4]) -> [f32; 4] {
        map(v, f32::ceil)
    }

    #[inline]
    fn round(v: [f32; 4]) -> [f32; 4] {
        map(v, f32::round_ties_even)
    }

    #[inline]
    fn truncate(v: [f32; 4]) -> [f32; 4] {
        map(v, f32::trunc)
    }

    #[inline]
    fn sqrt(v: [f32; 4]) -> [f32; 4] {
        map(v, f32::sqrt)
    }

    #[inline]
    fn sqrt_est(v: [f32; 4]) -> [f32; 4] {
        map(v, f32::sqrt)
    }

    #[inline]
    fn reciprocal(v: [f32; 4]) -> [f32; 4] {
        map(v, |x| 1.0 / x)
    }

    #[inline]
    fn reciprocal_est(v: [f32; 4]) -> [f32; 4] {
        map(v, |x| 1.0 / x)
    }

    #[inline]
    fn reciprocal_sqrt(v: [f32; 4]) -> [f32; 4] {
        map(v, |x| 1.0 / x.sqrt())
    }

    #[inline]
    fn reciprocal_sqrt_est(v: [f32; 4]) -> [f32; 4] {
        map(v, |x| 1.0 / x.sqrt())
    }

    #[inline]
    fn equal(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
        zip(a, b, |x, y| mask(x == y))
    }

    #[inline]
    fn greater(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
        zip(a, b, |x, y| mask(x > y))
    }

    #[inline]
    fn greater_or_equal(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
        zip(a, b, |x, y| mask(x >= y))
    }

    #[inline]
    fn less(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
        zip(a, b, |x, y| mask(x < y))
    }

    #[inline]
    fn less_or_equal(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
        zip(a, b, |x, y| mask(x <= y))
    }

    #[inline]
    fn equal_int(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
        zip(a, b, |x, y| mask(x.to_bits() == y.to_bits()))
    }

    #[inline]
    fn move_mask(v: [f32; 4]) -> u32 {
        v.iter()
            .enumerate()
            .fold(0, |acc, (i, x)| acc | ((x.to_bits() >> 31) << i))
    }

    #[inline]
    fn and(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
        zip_bits(a, b, |x, y| x & y)
    }

    #[inline]
    fn or(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
        zip_bits(a, b, |x, y| x | y)
    }

    #[inline]
    fn xor(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
        zip_bits(a, b, |x, y| x ^ y)
    }

    #[inline]
    fn and_not(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
        zip_bits(a, b, |x, y| x & !y)
    }

    #[inline]
    fn add_i32(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
        zip_bits(a, b, |x, y| x.wrapping_add(y))
    }

    #[inline]
    fn sub_i32(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
        zip_bits(a, b, |x, y| x.wrapping_sub(y))
    }

    #[inline]
    fn shift_left_i32(v: [f32; 4], count: u32) -> [f32; 4] {
        map(v, |x| {
            f32::from_bits(if count > 31 { 0 } else { x.to_bits() << count })
        })
    }

    #[inline]
    fn shift_right_u32(v: [f32; 4], count: u32) -> [f32; 4] {
        map(v, |x| {
            f32::from_bits(if count > 31 { 0 } else { x.to_bits() >> count })
        })
    }

    #[inline]
    fn convert_f32_to_i32(v: [f32; 4]) -> [f32; 4] {
        map(v, |x| f32::from_bits(x as i32 as u32))
    }

    #[inline]
    fn convert_i32_to_f32(v: [f32; 4]) -> [f32; 4] {
        map(v, |x| x.to_bits() as i32 as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks_are_all_bits() {
        let m = ScalarBackend::less(
            ScalarBackend::set(1.0, 5.0, -1.0, f32::NAN),
            ScalarBackend::splat(2.0),
        );
        assert_eq!(ScalarBackend::to_bits(m), [ALL_BITS, 0, ALL_BITS, 0]);
        assert_eq!(ScalarBackend::move_mask(m), 0b0101);
    }

    #[test]
    fn test_round_ties_to_even() {
        let r = ScalarBackend::round(ScalarBackend::set(0.5, 1.5, 2.5, -0.5));
        assert_eq!(ScalarBackend::to_array(r), [0.0, 2.0, 2.0, -0.0]);
    }

    #[test]
    fn test_integer_lanes() {
        let v = ScalarBackend::convert_f32_to_i32(ScalarBackend::set(1.9, -2.9, 3.0, 0.0));
        let v = ScalarBackend::add_i32(v, ScalarBackend::splat_bits(1));
        let f = ScalarBackend::convert_i32_to_f32(v);
        assert_eq!(ScalarBackend::to_array(f), [2.0, -1.0, 4.0, 1.0]);
    }
}
