//! x86/x64 SSE2后端
//!
//! 只在编译目标启用 `sse2` 时编译（x86_64默认启用）。目标同时启用 `fma` 时，
//! `multiply_add` 使用单次舍入的 `_mm_fmadd_ps`。

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::backend::{Align16, LaneMatrix, SimdBackend, ABS_MASK};
use crate::BackendKind;

/// SSE2后端
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sse2Backend;

/// 2^23：大于等于此值的f32没有小数部分
const NO_FRACTION: f32 = 8_388_608.0;

// 本模块中的intrinsics只在 `target_feature = "sse2"` 下编译，调用总是安全的。
impl SimdBackend for Sse2Backend {
    type Lanes = __m128;

    const KIND: BackendKind = BackendKind::Sse2;

    #[inline]
    fn zero() -> __m128 {
        unsafe { _mm_setzero_ps() }
    }

    #[inline]
    fn set(x: f32, y: f32, z: f32, w: f32) -> __m128 {
        unsafe { _mm_set_ps(w, z, y, x) }
    }

    #[inline]
    fn splat(value: f32) -> __m128 {
        unsafe { _mm_set1_ps(value) }
    }

    #[inline]
    fn to_array(v: __m128) -> [f32; 4] {
        let mut out = [0.0f32; 4];
        unsafe { _mm_storeu_ps(out.as_mut_ptr(), v) };
        out
    }

    #[inline]
    fn from_array(a: [f32; 4]) -> __m128 {
        unsafe { _mm_loadu_ps(a.as_ptr()) }
    }

    #[inline]
    fn set_bits(x: u32, y: u32, z: u32, w: u32) -> __m128 {
        unsafe { _mm_castsi128_ps(_mm_set_epi32(w as i32, z as i32, y as i32, x as i32)) }
    }

    #[inline]
    fn splat_bits(bits: u32) -> __m128 {
        unsafe { _mm_castsi128_ps(_mm_set1_epi32(bits as i32)) }
    }

    #[inline]
    fn get_x(v: __m128) -> f32 {
        unsafe { _mm_cvtss_f32(v) }
    }

    #[inline]
    fn splat_x(v: __m128) -> __m128 {
        unsafe { _mm_shuffle_ps(v, v, 0b00_00_00_00) }
    }

    #[inline]
    fn splat_y(v: __m128) -> __m128 {
        unsafe { _mm_shuffle_ps(v, v, 0b01_01_01_01) }
    }

    #[inline]
    fn splat_z(v: __m128) -> __m128 {
        unsafe { _mm_shuffle_ps(v, v, 0b10_10_10_10) }
    }

    #[inline]
    fn splat_w(v: __m128) -> __m128 {
        unsafe { _mm_shuffle_ps(v, v, 0b11_11_11_11) }
    }

    #[inline]
    fn load_float2(src: &[f32; 2]) -> __m128 {
        unsafe { _mm_castpd_ps(_mm_load_sd(src.as_ptr() as *const f64)) }
    }

    #[inline]
    fn load_float3(src: &[f32; 3]) -> __m128 {
        unsafe {
            let xy = _mm_castpd_ps(_mm_load_sd(src.as_ptr() as *const f64));
            let z = _mm_load_ss(src.as_ptr().add(2));
            _mm_movelh_ps(xy, z)
        }
    }

    #[inline]
    fn load_float4(src: &[f32; 4]) -> __m128 {
        unsafe { _mm_loadu_ps(src.as_ptr()) }
    }

    #[inline]
    fn load_float4a(src: &Align16<[f32; 4]>) -> __m128 {
        unsafe { _mm_load_ps(src.0.as_ptr()) }
    }

    #[inline]
    unsafe fn load_float4a_ptr(src: *const f32) -> __m128 {
        debug_assert_eq!(src as usize % 16, 0, "aligned load requires 16-byte alignment");
        _mm_load_ps(src)
    }

    #[inline]
    fn store_float2(dst: &mut [f32; 2], v: __m128) {
        unsafe { _mm_store_sd(dst.as_mut_ptr() as *mut f64, _mm_castps_pd(v)) }
    }

    #[inline]
    fn store_float3(dst: &mut [f32; 3], v: __m128) {
        unsafe {
            _mm_store_sd(dst.as_mut_ptr() as *mut f64, _mm_castps_pd(v));
            let z = _mm_movehl_ps(v, v);
            _mm_store_ss(dst.as_mut_ptr().add(2), z);
        }
    }

    #[inline]
    fn store_float4(dst: &mut [f32; 4], v: __m128) {
        unsafe { _mm_storeu_ps(dst.as_mut_ptr(), v) }
    }

    #[inline]
    fn store_float4a(dst: &mut Align16<[f32; 4]>, v: __m128) {
        unsafe { _mm_store_ps(dst.0.as_mut_ptr(), v) }
    }

    #[inline]
    unsafe fn store_float4a_ptr(dst: *mut f32, v: __m128) {
        debug_assert_eq!(dst as usize % 16, 0, "aligned store requires 16-byte alignment");
        _mm_store_ps(dst, v)
    }

    #[inline]
    fn load_float4x4a(src: &Align16<[[f32; 4]; 4]>) -> LaneMatrix<Self> {
        unsafe {
            let p = src.0.as_ptr() as *const f32;
            LaneMatrix::from_rows(
                _mm_load_ps(p),
                _mm_load_ps(p.add(4)),
                _mm_load_ps(p.add(8)),
                _mm_load_ps(p.add(12)),
            )
        }
    }

    #[inline]
    fn add(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_add_ps(a, b) }
    }

    #[inline]
    fn sub(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_sub_ps(a, b) }
    }

    #[inline]
    fn mul(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_mul_ps(a, b) }
    }

    #[inline]
    fn div(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_div_ps(a, b) }
    }

    #[inline]
    fn min(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_min_ps(a, b) }
    }

    #[inline]
    fn max(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_max_ps(a, b) }
    }

    #[cfg(target_feature = "fma")]
    #[inline]
    fn multiply_add(a: __m128, b: __m128, c: __m128) -> __m128 {
        unsafe { _mm_fmadd_ps(a, b, c) }
    }

    #[cfg(target_feature = "fma")]
    #[inline]
    fn negative_multiply_subtract(a: __m128, b: __m128, c: __m128) -> __m128 {
        unsafe { _mm_fnmadd_ps(a, b, c) }
    }

    #[inline]
    fn floor(v: __m128) -> __m128 {
        unsafe {
            // NaN、Inf以及 |v| >= 2^23 的值保持原样
            let test = _mm_and_si128(_mm_castps_si128(v), _mm_set1_epi32(ABS_MASK as i32));
            let test = _mm_cmplt_epi32(test, _mm_castps_si128(_mm_set1_ps(NO_FRACTION)));
            let truncated = _mm_cvtepi32_ps(_mm_cvttps_epi32(v));
            // 截断值大于原值时需要减1（掩码转整数即为 -1）
            let larger = _mm_cmpgt_ps(truncated, v);
            let larger = _mm_cvtepi32_ps(_mm_castps_si128(larger));
            let result = _mm_add_ps(truncated, larger);
            let result = _mm_and_ps(result, _mm_castsi128_ps(test));
            let keep = _mm_andnot_si128(test, _mm_castps_si128(v));
            _mm_or_ps(result, _mm_castsi128_ps(keep))
        }
    }

    #[inline]
    fn ceil(v: __m128) -> __m128 {
        unsafe {
            let test = _mm_and_si128(_mm_castps_si128(v), _mm_set1_epi32(ABS_MASK as i32));
            let test = _mm_cmplt_epi32(test, _mm_castps_si128(_mm_set1_ps(NO_FRACTION)));
            let truncated = _mm_cvtepi32_ps(_mm_cvttps_epi32(v));
            let smaller = _mm_cmplt_ps(truncated, v);
            let smaller = _mm_cvtepi32_ps(_mm_castps_si128(smaller));
            let result = _mm_sub_ps(truncated, smaller);
            let result = _mm_and_ps(result, _mm_castsi128_ps(test));
            let keep = _mm_andnot_si128(test, _mm_castps_si128(v));
            _mm_or_ps(result, _mm_castsi128_ps(keep))
        }
    }

    #[inline]
    fn round(v: __m128) -> __m128 {
        unsafe {
            let sign = _mm_and_ps(v, _mm_set1_ps(-0.0));
            let magic = _mm_or_ps(_mm_set1_ps(NO_FRACTION), sign);
            let r1 = _mm_sub_ps(_mm_add_ps(v, magic), magic);
            let abs = _mm_and_ps(v, _mm_castsi128_ps(_mm_set1_epi32(ABS_MASK as i32)));
            let mask = _mm_cmple_ps(abs, _mm_set1_ps(NO_FRACTION));
            let r2 = _mm_andnot_ps(mask, v);
            let r1 = _mm_and_ps(r1, mask);
            _mm_xor_ps(r1, r2)
        }
    }

    #[inline]
    fn truncate(v: __m128) -> __m128 {
        unsafe {
            let test = _mm_and_si128(_mm_castps_si128(v), _mm_set1_epi32(ABS_MASK as i32));
            let test = _mm_cmplt_epi32(test, _mm_castps_si128(_mm_set1_ps(NO_FRACTION)));
            let truncated = _mm_cvtepi32_ps(_mm_cvttps_epi32(v));
            let result = _mm_and_ps(truncated, _mm_castsi128_ps(test));
            let keep = _mm_andnot_si128(test, _mm_castps_si128(v));
            _mm_or_ps(result, _mm_castsi128_ps(keep))
        }
    }

    #[inline]
    fn sqrt(v: __m128) -> __m128 {
        unsafe { _mm_sqrt_ps(v) }
    }

    #[inline]
    fn sqrt_est(v: __m128) -> __m128 {
        unsafe { _mm_sqrt_ps(v) }
    }

    #[inline]
    fn reciprocal(v: __m128) -> __m128 {
        unsafe { _mm_div_ps(_mm_set1_ps(1.0), v) }
    }

    #[inline]
    fn reciprocal_est(v: __m128) -> __m128 {
        unsafe { _mm_rcp_ps(v) }
    }

    #[inline]
    fn reciprocal_sqrt(v: __m128) -> __m128 {
        unsafe { _mm_div_ps(_mm_set1_ps(1.0), _mm_sqrt_ps(v)) }
    }

    #[inline]
    fn reciprocal_sqrt_est(v: __m128) -> __m128 {
        unsafe { _mm_rsqrt_ps(v) }
    }

    #[inline]
    fn equal(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_cmpeq_ps(a, b) }
    }

    #[inline]
    fn not_equal(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_cmpneq_ps(a, b) }
    }

    #[inline]
    fn greater(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_cmpgt_ps(a, b) }
    }

    #[inline]
    fn greater_or_equal(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_cmpge_ps(a, b) }
    }

    #[inline]
    fn less(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_cmplt_ps(a, b) }
    }

    #[inline]
    fn less_or_equal(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_cmple_ps(a, b) }
    }

    #[inline]
    fn equal_int(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_castsi128_ps(_mm_cmpeq_epi32(_mm_castps_si128(a), _mm_castps_si128(b))) }
    }

    #[inline]
    fn move_mask(v: __m128) -> u32 {
        unsafe { _mm_movemask_ps(v) as u32 }
    }

    #[inline]
    fn and(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_and_ps(a, b) }
    }

    #[inline]
    fn or(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_or_ps(a, b) }
    }

    #[inline]
    fn xor(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_xor_ps(a, b) }
    }

    #[inline]
    fn and_not(a: __m128, b: __m128) -> __m128 {
        // _mm_andnot_ps 计算 !first & second
        unsafe { _mm_andnot_ps(b, a) }
    }

    #[inline]
    fn add_i32(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_castsi128_ps(_mm_add_epi32(_mm_castps_si128(a), _mm_castps_si128(b))) }
    }

    #[inline]
    fn sub_i32(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_castsi128_ps(_mm_sub_epi32(_mm_castps_si128(a), _mm_castps_si128(b))) }
    }

    #[inline]
    fn shift_left_i32(v: __m128, count: u32) -> __m128 {
        unsafe {
            let count = _mm_cvtsi32_si128(count as i32);
            _mm_castsi128_ps(_mm_sll_epi32(_mm_castps_si128(v), count))
        }
    }

    #[inline]
    fn shift_right_u32(v: __m128, count: u32) -> __m128 {
        unsafe {
            let count = _mm_cvtsi32_si128(count as i32);
            _mm_castsi128_ps(_mm_srl_epi32(_mm_castps_si128(v), count))
        }
    }

    #[inline]
    fn convert_f32_to_i32(v: __m128) -> __m128 {
        unsafe { _mm_castsi128_ps(_mm_cvttps_epi32(v)) }
    }

    #[inline]
    fn convert_i32_to_f32(v: __m128) -> __m128 {
        unsafe { _mm_cvtepi32_ps(_mm_castps_si128(v)) }
    }

    /// 广播a的每个元素乘以b的对应行并累加
    #[inline]
    fn matrix_multiply(a: &LaneMatrix<Self>, b: &LaneMatrix<Self>) -> LaneMatrix<Self> {
        let row = |v: __m128| {
            let r = Self::mul(Self::splat_x(v), b.r[0]);
            let r = Self::multiply_add(Self::splat_y(v), b.r[1], r);
            let r = Self::multiply_add(Self::splat_z(v), b.r[2], r);
            Self::multiply_add(Self::splat_w(v), b.r[3], r)
        };
        LaneMatrix::from_rows(row(a.r[0]), row(a.r[1]), row(a.r[2]), row(a.r[3]))
    }

    #[inline]
    fn matrix_transpose(m: &LaneMatrix<Self>) -> LaneMatrix<Self> {
        unsafe {
            let t0 = _mm_unpacklo_ps(m.r[0], m.r[1]);
            let t1 = _mm_unpacklo_ps(m.r[2], m.r[3]);
            let t2 = _mm_unpackhi_ps(m.r[0], m.r[1]);
            let t3 = _mm_unpackhi_ps(m.r[2], m.r[3]);
            LaneMatrix::from_rows(
                _mm_movelh_ps(t0, t1),
                _mm_movehl_ps(t1, t0),
                _mm_movelh_ps(t2, t3),
                _mm_movehl_ps(t3, t2),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_ceil_large_and_negative() {
        let v = Sse2Backend::set(-1.5, 2.5, 1.0e9, -0.25);
        assert_eq!(Sse2Backend::to_array(Sse2Backend::floor(v)), [-2.0, 2.0, 1.0e9, -1.0]);
        assert_eq!(Sse2Backend::to_array(Sse2Backend::ceil(v)), [-1.0, 3.0, 1.0e9, -0.0]);
    }

    #[test]
    fn test_round_matches_ties_even() {
        let v = Sse2Backend::set(0.5, 1.5, 2.5, -3.5);
        assert_eq!(Sse2Backend::to_array(Sse2Backend::round(v)), [0.0, 2.0, 2.0, -4.0]);
    }

    #[test]
    fn test_partial_loads_zero_tail() {
        let v = Sse2Backend::load_float3(&[1.0, 2.0, 3.0]);
        assert_eq!(Sse2Backend::to_array(v), [1.0, 2.0, 3.0, 0.0]);
        let v = Sse2Backend::load_float2(&[4.0, 5.0]);
        assert_eq!(Sse2Backend::to_array(v), [4.0, 5.0, 0.0, 0.0]);

        let mut out = [0.0f32; 3];
        Sse2Backend::store_float3(&mut out, Sse2Backend::set(7.0, 8.0, 9.0, 10.0));
        assert_eq!(out, [7.0, 8.0, 9.0]);
    }
}
