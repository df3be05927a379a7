//! ARM NEON后端
//!
//! 只在 aarch64 且启用 `neon` 时编译。估计版倒数/倒数平方根在硬件估计值上做一步
//! Newton-Raphson迭代，精确版做两步；`multiply_add` 使用单次舍入的 `vfmaq_f32`。

use std::arch::aarch64::*;

use crate::backend::{Align16, SimdBackend};
use crate::BackendKind;

/// NEON后端
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeonBackend;

#[inline(always)]
fn as_u32(v: float32x4_t) -> uint32x4_t {
    unsafe { vreinterpretq_u32_f32(v) }
}

#[inline(always)]
fn as_f32(v: uint32x4_t) -> float32x4_t {
    unsafe { vreinterpretq_f32_u32(v) }
}

// 本模块中的intrinsics只在 `target_feature = "neon"` 下编译，调用总是安全的。
impl SimdBackend for NeonBackend {
    type Lanes = float32x4_t;

    const KIND: BackendKind = BackendKind::Neon;

    #[inline]
    fn zero() -> float32x4_t {
        unsafe { vdupq_n_f32(0.0) }
    }

    #[inline]
    fn set(x: f32, y: f32, z: f32, w: f32) -> float32x4_t {
        let a = [x, y, z, w];
        unsafe { vld1q_f32(a.as_ptr()) }
    }

    #[inline]
    fn splat(value: f32) -> float32x4_t {
        unsafe { vdupq_n_f32(value) }
    }

    #[inline]
    fn to_array(v: float32x4_t) -> [f32; 4] {
        let mut out = [0.0f32; 4];
        unsafe { vst1q_f32(out.as_mut_ptr(), v) };
        out
    }

    #[inline]
    fn set_bits(x: u32, y: u32, z: u32, w: u32) -> float32x4_t {
        let a = [x, y, z, w];
        unsafe { as_f32(vld1q_u32(a.as_ptr())) }
    }

    #[inline]
    fn splat_bits(bits: u32) -> float32x4_t {
        unsafe { as_f32(vdupq_n_u32(bits)) }
    }

    #[inline]
    fn get_x(v: float32x4_t) -> f32 {
        unsafe { vgetq_lane_f32::<0>(v) }
    }

    #[inline]
    fn get_y(v: float32x4_t) -> f32 {
        unsafe { vgetq_lane_f32::<1>(v) }
    }

    #[inline]
    fn get_z(v: float32x4_t) -> f32 {
        unsafe { vgetq_lane_f32::<2>(v) }
    }

    #[inline]
    fn get_w(v: float32x4_t) -> f32 {
        unsafe { vgetq_lane_f32::<3>(v) }
    }

    #[inline]
    fn splat_x(v: float32x4_t) -> float32x4_t {
        unsafe { vdupq_laneq_f32::<0>(v) }
    }

    #[inline]
    fn splat_y(v: float32x4_t) -> float32x4_t {
        unsafe { vdupq_laneq_f32::<1>(v) }
    }

    #[inline]
    fn splat_z(v: float32x4_t) -> float32x4_t {
        unsafe { vdupq_laneq_f32::<2>(v) }
    }

    #[inline]
    fn splat_w(v: float32x4_t) -> float32x4_t {
        unsafe { vdupq_laneq_f32::<3>(v) }
    }

    #[inline]
    fn load_float2(src: &[f32; 2]) -> float32x4_t {
        unsafe { vcombine_f32(vld1_f32(src.as_ptr()), vdup_n_f32(0.0)) }
    }

    #[inline]
    fn load_float4(src: &[f32; 4]) -> float32x4_t {
        unsafe { vld1q_f32(src.as_ptr()) }
    }

    #[inline]
    fn load_float4a(src: &Align16<[f32; 4]>) -> float32x4_t {
        unsafe { vld1q_f32(src.0.as_ptr()) }
    }

    #[inline]
    fn store_float2(dst: &mut [f32; 2], v: float32x4_t) {
        unsafe { vst1_f32(dst.as_mut_ptr(), vget_low_f32(v)) }
    }

    #[inline]
    fn store_float4(dst: &mut [f32; 4], v: float32x4_t) {
        unsafe { vst1q_f32(dst.as_mut_ptr(), v) }
    }

    #[inline]
    fn store_float4a(dst: &mut Align16<[f32; 4]>, v: float32x4_t) {
        unsafe { vst1q_f32(dst.0.as_mut_ptr(), v) }
    }

    #[inline]
    fn add(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vaddq_f32(a, b) }
    }

    #[inline]
    fn sub(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vsubq_f32(a, b) }
    }

    #[inline]
    fn mul(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vmulq_f32(a, b) }
    }

    #[inline]
    fn div(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vdivq_f32(a, b) }
    }

    #[inline]
    fn min(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vminq_f32(a, b) }
    }

    #[inline]
    fn max(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vmaxq_f32(a, b) }
    }

    #[inline]
    fn multiply_add(a: float32x4_t, b: float32x4_t, c: float32x4_t) -> float32x4_t {
        unsafe { vfmaq_f32(c, a, b) }
    }

    #[inline]
    fn negative_multiply_subtract(a: float32x4_t, b: float32x4_t, c: float32x4_t) -> float32x4_t {
        unsafe { vfmsq_f32(c, a, b) }
    }

    #[inline]
    fn negate(v: float32x4_t) -> float32x4_t {
        unsafe { vnegq_f32(v) }
    }

    #[inline]
    fn abs(v: float32x4_t) -> float32x4_t {
        unsafe { vabsq_f32(v) }
    }

    #[inline]
    fn floor(v: float32x4_t) -> float32x4_t {
        unsafe { vrndmq_f32(v) }
    }

    #[inline]
    fn ceil(v: float32x4_t) -> float32x4_t {
        unsafe { vrndpq_f32(v) }
    }

    #[inline]
    fn round(v: float32x4_t) -> float32x4_t {
        unsafe { vrndnq_f32(v) }
    }

    #[inline]
    fn truncate(v: float32x4_t) -> float32x4_t {
        unsafe { vrndq_f32(v) }
    }

    #[inline]
    fn sqrt(v: float32x4_t) -> float32x4_t {
        unsafe { vsqrtq_f32(v) }
    }

    #[inline]
    fn sqrt_est(v: float32x4_t) -> float32x4_t {
        unsafe { vsqrtq_f32(v) }
    }

    #[inline]
    fn reciprocal(v: float32x4_t) -> float32x4_t {
        unsafe {
            let e = vrecpeq_f32(v);
            let e = vmulq_f32(vrecpsq_f32(v, e), e);
            vmulq_f32(vrecpsq_f32(v, e), e)
        }
    }

    #[inline]
    fn reciprocal_est(v: float32x4_t) -> float32x4_t {
        // 硬件估计只有约8位精度，一步迭代后达到约1/4096
        unsafe {
            let e = vrecpeq_f32(v);
            vmulq_f32(vrecpsq_f32(v, e), e)
        }
    }

    #[inline]
    fn reciprocal_sqrt(v: float32x4_t) -> float32x4_t {
        unsafe {
            let e = vrsqrteq_f32(v);
            let e = vmulq_f32(vrsqrtsq_f32(vmulq_f32(v, e), e), e);
            vmulq_f32(vrsqrtsq_f32(vmulq_f32(v, e), e), e)
        }
    }

    #[inline]
    fn reciprocal_sqrt_est(v: float32x4_t) -> float32x4_t {
        unsafe {
            let e = vrsqrteq_f32(v);
            vmulq_f32(vrsqrtsq_f32(vmulq_f32(v, e), e), e)
        }
    }

    #[inline]
    fn equal(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { as_f32(vceqq_f32(a, b)) }
    }

    #[inline]
    fn greater(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { as_f32(vcgtq_f32(a, b)) }
    }

    #[inline]
    fn greater_or_equal(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { as_f32(vcgeq_f32(a, b)) }
    }

    #[inline]
    fn less(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { as_f32(vcltq_f32(a, b)) }
    }

    #[inline]
    fn less_or_equal(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { as_f32(vcleq_f32(a, b)) }
    }

    #[inline]
    fn equal_int(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { as_f32(vceqq_u32(as_u32(a), as_u32(b))) }
    }

    #[inline]
    fn move_mask(v: float32x4_t) -> u32 {
        let shifts = [0i32, 1, 2, 3];
        unsafe {
            let signs = vshrq_n_u32::<31>(as_u32(v));
            vaddvq_u32(vshlq_u32(signs, vld1q_s32(shifts.as_ptr())))
        }
    }

    #[inline]
    fn and(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { as_f32(vandq_u32(as_u32(a), as_u32(b))) }
    }

    #[inline]
    fn or(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { as_f32(vorrq_u32(as_u32(a), as_u32(b))) }
    }

    #[inline]
    fn xor(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { as_f32(veorq_u32(as_u32(a), as_u32(b))) }
    }

    #[inline]
    fn and_not(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { as_f32(vbicq_u32(as_u32(a), as_u32(b))) }
    }

    #[inline]
    fn select(a: float32x4_t, b: float32x4_t, control: float32x4_t) -> float32x4_t {
        unsafe { vbslq_f32(as_u32(control), b, a) }
    }

    #[inline]
    fn add_i32(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { as_f32(vaddq_u32(as_u32(a), as_u32(b))) }
    }

    #[inline]
    fn sub_i32(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { as_f32(vsubq_u32(as_u32(a), as_u32(b))) }
    }

    #[inline]
    fn shift_left_i32(v: float32x4_t, count: u32) -> float32x4_t {
        if count > 31 {
            return Self::zero();
        }
        unsafe { as_f32(vshlq_u32(as_u32(v), vdupq_n_s32(count as i32))) }
    }

    #[inline]
    fn shift_right_u32(v: float32x4_t, count: u32) -> float32x4_t {
        if count > 31 {
            return Self::zero();
        }
        unsafe { as_f32(vshlq_u32(as_u32(v), vdupq_n_s32(-(count as i32)))) }
    }

    #[inline]
    fn convert_f32_to_i32(v: float32x4_t) -> float32x4_t {
        unsafe { vreinterpretq_f32_s32(vcvtq_s32_f32(v)) }
    }

    #[inline]
    fn convert_i32_to_f32(v: float32x4_t) -> float32x4_t {
        unsafe { vcvtq_f32_s32(vreinterpretq_s32_f32(v)) }
    }
}
