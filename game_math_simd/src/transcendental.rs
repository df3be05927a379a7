//! 超越函数多项式逼近
//!
//! 所有后端共用同一套系数与选择逻辑，只通过 [`SimdBackend`] 原语实现，
//! 因此各后端的差异仅来自原语本身（例如FMA的单次舍入）。
//!
//! 精确族：相对误差约 1e-7 量级（exp 在大参数时按 |x|·ulp 放大，tan 在极点附近放大）。
//! Est族：多项式阶数更低，误差约 1e-6 量级，tan/asin 不超过 1e-4。
//! Est族同样只用精确的除法与倒数，结果不随后端的硬件估计指令变化。

use crate::backend::{SimdBackend, INFINITY_BITS, SIGN_MASK};

const PI: f32 = std::f32::consts::PI;
const HALF_PI: f32 = std::f32::consts::FRAC_PI_2;
const QUARTER_PI: f32 = std::f32::consts::FRAC_PI_4;
const TWO_PI: f32 = std::f32::consts::TAU;
const RECIPROCAL_TWO_PI: f32 = 1.0 / std::f32::consts::TAU;
const TWO_OVER_PI: f32 = std::f32::consts::FRAC_2_PI;
const LOG2_E: f32 = std::f32::consts::LOG2_E;

const SIN_COEFFICIENTS: [f32; 5] = [
    -0.166_666_67,
    0.008_333_331,
    -0.000_198_408_74,
    2.752_556_2e-6,
    -2.388_985_9e-8,
];
const SIN_EST_COEFFICIENTS: [f32; 3] = [-0.166_658_52, 0.008_313_950_2, -0.000_185_246_7];

const COS_COEFFICIENTS: [f32; 5] = [
    -0.5,
    0.041_666_638,
    -0.001_388_837_8,
    2.476_049_5e-5,
    -2.605_161_5e-7,
];
const COS_EST_COEFFICIENTS: [f32; 4] = [-0.499_999_9, 0.041_665_67, -0.001_386_861_1, 2.347_608_6e-5];

const ARC_COEFFICIENTS: [f32; 8] = [
    1.570_796_3,
    -0.214_598_8,
    0.088_978_99,
    -0.050_174_303,
    0.030_891_88,
    -0.017_088_126,
    0.006_670_09,
    -0.001_262_491_1,
];
const ARC_EST_COEFFICIENTS: [f32; 6] = [
    1.570_794_8,
    -0.214_496_25,
    0.087_749_95,
    -0.044_609_822,
    0.018_954_95,
    -0.004_180_968_7,
];

// asin(x) = x + x³ · P(x²), |x| < 0.5
const ASIN_COEFFICIENTS: [f32; 5] = [
    0.166_667_52,
    0.074_953_003,
    0.045_470_026,
    0.024_181_311,
    0.042_163_2,
];
const ASIN_EST_COEFFICIENTS: [f32; 3] = [0.166_686_71, 0.073_571_09, 0.058_975_64];
const ASIN_SMALL: f32 = 0.5;

const ATAN_COEFFICIENTS: [f32; 8] = [
    -0.333_331_45,
    0.199_935_51,
    -0.142_088_99,
    0.106_562_64,
    -0.075_289_64,
    0.042_909_614,
    -0.016_165_737,
    0.002_866_225_7,
];
const ATAN_EST_COEFFICIENTS: [f32; 6] = [
    0.999_994_8,
    -0.332_957_12,
    0.195_346_6,
    -0.120_448_58,
    0.056_589_983,
    -0.013_130_382,
];

const TAN_NUMERATOR: [f32; 3] = [-0.133_383_5, 0.003_424_887_8, -1.786_170_7e-5];
const TAN_DENOMINATOR: [f32; 5] = [
    1.0,
    -0.466_716_83,
    0.025_663_832,
    -3.118_153_2e-4,
    4.981_943_4e-7,
];
const TAN_REDUCTION_HI: f32 = 1.570_796_4;
const TAN_REDUCTION_LO: f32 = 6.077_100_6e-11;
const TAN_NEAR_ZERO: f32 = 0.000_244_140_63;

// 2^y, y ∈ [-0.5, 0.5]
const EXP2_COEFFICIENTS: [f32; 7] = [
    1.0,
    0.693_147_2,
    0.240_226_48,
    0.055_503_326,
    0.009_618_437,
    0.001_339_887_4,
    0.000_153_533_62,
];
const EXP2_EST_COEFFICIENTS: [f32; 6] = [
    1.0,
    0.693_147_2,
    0.240_226_48,
    0.055_503_326,
    0.009_618_437,
    0.001_339_887_4,
];

// ln(1 + x) - x + x²/2 = x³ · P(x)
const LOG_COEFFICIENTS: [f32; 9] = [
    0.333_333_3,
    -0.249_999_94,
    0.200_007_15,
    -0.166_680_58,
    0.142_493_23,
    -0.124_201_41,
    0.116_769_99,
    -0.115_146_1,
    0.070_376_836,
];
const LOG_EST_COEFFICIENTS: [f32; 6] = [
    0.333_336_23,
    -0.249_918_4,
    0.199_474_45,
    -0.170_016_59,
    0.158_193_89,
    -0.104_905_26,
];
const SQRT_HALF: f32 = std::f32::consts::FRAC_1_SQRT_2;
const LN2_HI: f32 = 0.693_359_4;
const LN2_LO: f32 = -2.121_944_4e-4;

/// Horner求值：`c[0] + x*(c[1] + x*(c[2] + ...))`
#[inline(always)]
fn horner<B: SimdBackend>(x: B::Lanes, coefficients: &[f32]) -> B::Lanes {
    let mut iter = coefficients.iter().rev();
    let mut acc = match iter.next() {
        Some(&c) => B::splat(c),
        None => return B::zero(),
    };
    for &c in iter {
        acc = B::multiply_add(acc, x, B::splat(c));
    }
    acc
}

/// 把角度规约到 [-π, π]
#[inline]
pub fn mod_angles<B: SimdBackend>(v: B::Lanes) -> B::Lanes {
    let k = B::round(B::mul(v, B::splat(RECIPROCAL_TWO_PI)));
    B::negative_multiply_subtract(k, B::splat(TWO_PI), v)
}

/// 规约到 [-π/2, π/2]，返回 `(x, cos的符号)`
#[inline(always)]
fn reduce_half_pi<B: SimdBackend>(v: B::Lanes) -> (B::Lanes, B::Lanes) {
    let x = mod_angles::<B>(v);
    let sign = B::and(x, B::splat_bits(SIGN_MASK));
    // x >= 0 时为 π，否则为 -π
    let c = B::or(B::splat(PI), sign);
    let absx = B::and_not(x, sign);
    let reflected = B::sub(c, x);
    let inside = B::less_or_equal(absx, B::splat(HALF_PI));
    let x = B::select(reflected, x, inside);
    let cos_sign = B::select(B::splat(-1.0), B::splat_one(), inside);
    (x, cos_sign)
}

#[inline]
pub fn sin<B: SimdBackend>(v: B::Lanes) -> B::Lanes {
    let (x, _) = reduce_half_pi::<B>(v);
    let x2 = B::mul(x, x);
    let p = horner::<B>(x2, &SIN_COEFFICIENTS);
    let p = B::multiply_add(p, x2, B::splat_one());
    B::mul(p, x)
}

#[inline]
pub fn cos<B: SimdBackend>(v: B::Lanes) -> B::Lanes {
    let (x, sign) = reduce_half_pi::<B>(v);
    let x2 = B::mul(x, x);
    let p = horner::<B>(x2, &COS_COEFFICIENTS);
    let p = B::multiply_add(p, x2, B::splat_one());
    B::mul(p, sign)
}

#[inline]
pub fn sin_cos<B: SimdBackend>(v: B::Lanes) -> (B::Lanes, B::Lanes) {
    let (x, sign) = reduce_half_pi::<B>(v);
    let x2 = B::mul(x, x);
    let s = B::multiply_add(horner::<B>(x2, &SIN_COEFFICIENTS), x2, B::splat_one());
    let c = B::multiply_add(horner::<B>(x2, &COS_COEFFICIENTS), x2, B::splat_one());
    (B::mul(s, x), B::mul(c, sign))
}

#[inline]
pub fn sin_est<B: SimdBackend>(v: B::Lanes) -> B::Lanes {
    let (x, _) = reduce_half_pi::<B>(v);
    let x2 = B::mul(x, x);
    let p = B::multiply_add(horner::<B>(x2, &SIN_EST_COEFFICIENTS), x2, B::splat_one());
    B::mul(p, x)
}

#[inline]
pub fn cos_est<B: SimdBackend>(v: B::Lanes) -> B::Lanes {
    let (x, sign) = reduce_half_pi::<B>(v);
    let x2 = B::mul(x, x);
    let p = B::multiply_add(horner::<B>(x2, &COS_EST_COEFFICIENTS), x2, B::splat_one());
    B::mul(p, sign)
}

#[inline]
pub fn sin_cos_est<B: SimdBackend>(v: B::Lanes) -> (B::Lanes, B::Lanes) {
    let (x, sign) = reduce_half_pi::<B>(v);
    let x2 = B::mul(x, x);
    let s = B::multiply_add(horner::<B>(x2, &SIN_EST_COEFFICIENTS), x2, B::splat_one());
    let c = B::multiply_add(horner::<B>(x2, &COS_EST_COEFFICIENTS), x2, B::splat_one());
    (B::mul(s, x), B::mul(c, sign))
}

/// 有理逼近：按 π/2 的整数倍规约，奇数倍时取 `-1/tan`
#[inline]
pub fn tan<B: SimdBackend>(v: B::Lanes) -> B::Lanes {
    let zero = B::zero();
    let k = B::round(B::mul(v, B::splat(TWO_OVER_PI)));
    // 两段常数规约，保留 π/2 的低位
    let vc = B::negative_multiply_subtract(k, B::splat(TAN_REDUCTION_HI), v);
    let vc = B::negative_multiply_subtract(k, B::splat(TAN_REDUCTION_LO), vc);

    let k_int = B::convert_f32_to_i32(B::abs(k));
    let is_even = B::equal_int(B::and(k_int, B::splat_bits(1)), zero);

    let vc2 = B::mul(vc, vc);
    let n = B::mul(vc2, horner::<B>(vc2, &TAN_NUMERATOR));
    let n = B::multiply_add(vc, n, vc);
    let d = horner::<B>(vc2, &TAN_DENOMINATOR);

    let near_zero = B::in_bounds(vc, B::splat(TAN_NEAR_ZERO));
    let n = B::select(n, vc, near_zero);
    let d = B::select(d, B::splat_one(), near_zero);

    let r_even = B::div(n, d);
    let r_odd = B::div(d, B::negate(n));
    let result = B::select(r_odd, r_even, is_even);
    B::select(result, zero, B::equal(v, zero))
}

/// `sin_est / cos_est`，共用一次规约
#[inline]
pub fn tan_est<B: SimdBackend>(v: B::Lanes) -> B::Lanes {
    let (s, c) = sin_cos_est::<B>(v);
    B::div(s, c)
}

/// `sqrt(1 - |v|) * P(|v|)`，返回 `(t, v >= 0)`；acos(v) = v>=0 ? t : π - t
#[inline(always)]
fn arc_kernel<B: SimdBackend>(v: B::Lanes, coefficients: &[f32]) -> (B::Lanes, B::Lanes) {
    let nonnegative = B::greater_or_equal(v, B::zero());
    let x = B::abs(v);
    let root = B::sqrt(B::max(B::zero(), B::sub(B::splat_one(), x)));
    let t = B::mul(horner::<B>(x, coefficients), root);
    (t, nonnegative)
}

#[inline]
pub fn acos<B: SimdBackend>(v: B::Lanes) -> B::Lanes {
    let (t, nonnegative) = arc_kernel::<B>(v, &ARC_COEFFICIENTS);
    B::select(B::sub(B::splat(PI), t), t, nonnegative)
}

/// |v| < 0.5 时直接求奇多项式，避免 `π/2 - acos` 在0附近的抵消
#[inline(always)]
fn asin_with<B: SimdBackend>(v: B::Lanes, small: &[f32], arc: &[f32]) -> B::Lanes {
    let sign = B::and(v, B::splat_bits(SIGN_MASK));
    let x = B::abs(v);
    let z = B::mul(x, x);
    let near_zero = B::multiply_add(B::mul(horner::<B>(z, small), z), x, x);
    let (t, _) = arc_kernel::<B>(x, arc);
    let far = B::sub(B::splat(HALF_PI), t);
    let r = B::select(far, near_zero, B::less(x, B::splat(ASIN_SMALL)));
    B::or(r, sign)
}

#[inline]
pub fn asin<B: SimdBackend>(v: B::Lanes) -> B::Lanes {
    asin_with::<B>(v, &ASIN_COEFFICIENTS, &ARC_COEFFICIENTS)
}

#[inline]
pub fn acos_est<B: SimdBackend>(v: B::Lanes) -> B::Lanes {
    let (t, nonnegative) = arc_kernel::<B>(v, &ARC_EST_COEFFICIENTS);
    B::select(B::sub(B::splat(PI), t), t, nonnegative)
}

#[inline]
pub fn asin_est<B: SimdBackend>(v: B::Lanes) -> B::Lanes {
    asin_with::<B>(v, &ASIN_EST_COEFFICIENTS, &ARC_EST_COEFFICIENTS)
}

/// |v| > 1 时用 `±π/2 - atan(1/v)`
#[inline(always)]
fn atan_kernel<B: SimdBackend>(v: B::Lanes, reciprocal: B::Lanes, estimate: bool) -> B::Lanes {
    let one = B::splat_one();
    let inside = B::less_or_equal(B::abs(v), one);
    let sign = B::select(B::splat(-1.0), one, B::greater(v, one));
    let sign = B::select(sign, B::zero(), inside);
    let x = B::select(reciprocal, v, inside);
    let x2 = B::mul(x, x);
    let p = if estimate {
        horner::<B>(x2, &ATAN_EST_COEFFICIENTS)
    } else {
        B::multiply_add(horner::<B>(x2, &ATAN_COEFFICIENTS), x2, one)
    };
    let p = B::mul(p, x);
    let outside = B::sub(B::mul(sign, B::splat(HALF_PI)), p);
    B::select(outside, p, inside)
}

#[inline]
pub fn atan<B: SimdBackend>(v: B::Lanes) -> B::Lanes {
    atan_kernel::<B>(v, B::reciprocal(v), false)
}

#[inline]
pub fn atan_est<B: SimdBackend>(v: B::Lanes) -> B::Lanes {
    atan_kernel::<B>(v, B::reciprocal(v), true)
}

/// 零与无穷操作数的特殊值表；返回 `(特殊值, 是否需要走atan路径)`
#[inline(always)]
fn atan2_special<B: SimdBackend>(y: B::Lanes, x: B::Lanes) -> (B::Lanes, B::Lanes, B::Lanes) {
    let zero = B::zero();
    let valid = B::true_mask();
    let sign_bit = B::splat_bits(SIGN_MASK);

    let y_zero = B::equal(y, zero);
    let x_zero = B::equal(x, zero);
    let x_positive = B::equal_int(B::and(x, sign_bit), zero);
    let y_infinite = B::is_infinite(y);
    let x_infinite = B::is_infinite(x);

    let y_sign = B::and(y, sign_bit);
    let pi = B::or(B::splat(PI), y_sign);
    let half_pi = B::or(B::splat(HALF_PI), y_sign);
    let quarter_pi = B::or(B::splat(QUARTER_PI), y_sign);
    let three_quarter_pi = B::or(B::splat(PI * 0.75), y_sign);

    let r1 = B::select(pi, y_sign, x_positive);
    let r2 = B::select(valid, half_pi, x_zero);
    let r3 = B::select(r2, r1, y_zero);
    let r4 = B::select(three_quarter_pi, quarter_pi, x_positive);
    let r5 = B::select(half_pi, r4, x_infinite);
    let result = B::select(r3, r5, y_infinite);
    let use_atan = B::equal_int(result, valid);

    // x < 0 时atan结果需要加 ±π
    let offset = B::select(pi, B::splat_bits(SIGN_MASK), x_positive);
    (result, use_atan, offset)
}

#[inline]
pub fn atan2<B: SimdBackend>(y: B::Lanes, x: B::Lanes) -> B::Lanes {
    let (special, use_atan, offset) = atan2_special::<B>(y, x);
    let r = B::add(atan::<B>(B::div(y, x)), offset);
    B::select(special, r, use_atan)
}

#[inline]
pub fn atan2_est<B: SimdBackend>(y: B::Lanes, x: B::Lanes) -> B::Lanes {
    let (special, use_atan, offset) = atan2_special::<B>(y, x);
    let r = B::add(atan_est::<B>(B::div(y, x)), offset);
    B::select(special, r, use_atan)
}

/// 由整数指数构造 2^i（i 必须在正规数范围内）
#[inline(always)]
fn pow2i<B: SimdBackend>(i: B::Lanes) -> B::Lanes {
    let biased = B::add_i32(B::convert_f32_to_i32(i), B::splat_bits(127));
    B::shift_left_i32(biased, 23)
}

#[inline(always)]
fn exp2_with<B: SimdBackend>(v: B::Lanes, coefficients: &[f32]) -> B::Lanes {
    let x = B::min(B::max(v, B::splat(-150.0)), B::splat(128.0));
    let whole = B::round(x);
    let fraction = B::sub(x, whole);
    let p = horner::<B>(fraction, coefficients);
    // 分两半缩放，保证每一半都是正规数
    let half = B::truncate(B::mul(whole, B::splat(0.5)));
    let rest = B::sub(whole, half);
    let r = B::mul(B::mul(p, pow2i::<B>(half)), pow2i::<B>(rest));
    B::select(r, B::splat_qnan(), B::is_nan(v))
}

#[inline]
pub fn exp2<B: SimdBackend>(v: B::Lanes) -> B::Lanes {
    exp2_with::<B>(v, &EXP2_COEFFICIENTS)
}

#[inline]
pub fn exp2_est<B: SimdBackend>(v: B::Lanes) -> B::Lanes {
    exp2_with::<B>(v, &EXP2_EST_COEFFICIENTS)
}

#[inline]
pub fn exp<B: SimdBackend>(v: B::Lanes) -> B::Lanes {
    exp2::<B>(B::mul(v, B::splat(LOG2_E)))
}

#[inline]
pub fn exp_est<B: SimdBackend>(v: B::Lanes) -> B::Lanes {
    exp2_est::<B>(B::mul(v, B::splat(LOG2_E)))
}

/// 拆分为 `(e, x)`，满足 `v = 2^e * (1 + x)`，`x ∈ [√½-1, √2-1)`
#[inline(always)]
fn split_exponent<B: SimdBackend>(v: B::Lanes) -> (B::Lanes, B::Lanes) {
    let one = B::splat_one();
    // 非正规数先放大 2^23
    let denormal = B::less(v, B::splat(f32::MIN_POSITIVE));
    let scaled = B::select(v, B::mul(v, B::splat(8_388_608.0)), denormal);
    let bias = B::select(B::splat(126.0), B::splat(149.0), denormal);

    let exponent_bits = B::shift_right_u32(B::and(scaled, B::splat_bits(INFINITY_BITS)), 23);
    let e = B::sub(B::convert_i32_to_f32(exponent_bits), bias);
    // 尾数 ∈ [0.5, 1)
    let mantissa = B::or(
        B::and(scaled, B::splat_bits(0x807F_FFFF)),
        B::splat_bits(0x3F00_0000),
    );
    let small = B::less(mantissa, B::splat(SQRT_HALF));
    let e = B::select(e, B::sub(e, one), small);
    let x = B::select(B::sub(mantissa, one), B::sub(B::add(mantissa, mantissa), one), small);
    (e, x)
}

/// `ln(1 + x)`，不含指数项
#[inline(always)]
fn log1p_kernel<B: SimdBackend>(x: B::Lanes, coefficients: &[f32]) -> B::Lanes {
    let z = B::mul(x, x);
    let y = B::mul(B::mul(horner::<B>(x, coefficients), x), z);
    let y = B::negative_multiply_subtract(B::splat(0.5), z, y);
    B::add(x, y)
}

#[inline(always)]
fn log_special<B: SimdBackend>(v: B::Lanes, r: B::Lanes) -> B::Lanes {
    let zero = B::zero();
    let r = B::select(r, B::splat_infinity(), B::equal(v, B::splat_infinity()));
    let r = B::select(r, B::negate(B::splat_infinity()), B::equal(v, zero));
    let invalid = B::or(B::less(v, zero), B::is_nan(v));
    B::select(r, B::splat_qnan(), invalid)
}

#[inline(always)]
fn log_with<B: SimdBackend>(v: B::Lanes, coefficients: &[f32]) -> B::Lanes {
    let (e, x) = split_exponent::<B>(v);
    let r = B::multiply_add(e, B::splat(LN2_LO), log1p_kernel::<B>(x, coefficients));
    let r = B::multiply_add(e, B::splat(LN2_HI), r);
    log_special::<B>(v, r)
}

#[inline(always)]
fn log2_with<B: SimdBackend>(v: B::Lanes, coefficients: &[f32]) -> B::Lanes {
    let (e, x) = split_exponent::<B>(v);
    let r = B::multiply_add(log1p_kernel::<B>(x, coefficients), B::splat(LOG2_E), e);
    log_special::<B>(v, r)
}

#[inline]
pub fn log<B: SimdBackend>(v: B::Lanes) -> B::Lanes {
    log_with::<B>(v, &LOG_COEFFICIENTS)
}

#[inline]
pub fn log_est<B: SimdBackend>(v: B::Lanes) -> B::Lanes {
    log_with::<B>(v, &LOG_EST_COEFFICIENTS)
}

#[inline]
pub fn log2<B: SimdBackend>(v: B::Lanes) -> B::Lanes {
    log2_with::<B>(v, &LOG_COEFFICIENTS)
}

#[inline]
pub fn log2_est<B: SimdBackend>(v: B::Lanes) -> B::Lanes {
    log2_with::<B>(v, &LOG_EST_COEFFICIENTS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActiveBackend as H, ScalarBackend as S};

    type Unary<B> = fn(<B as SimdBackend>::Lanes) -> <B as SimdBackend>::Lanes;

    const ACCURATE: f32 = 1e-6;
    const ESTIMATE: f32 = 1e-5;
    const ESTIMATE_LOOSE: f32 = 1e-4;

    const SMALL: [f32; 6] = [1.0e-6, -2.5e-5, 1.0e-4, -7.5e-4, 1.0e-3, -1.0e-3];

    fn grid(from: f32, to: f32) -> Vec<f32> {
        (0..=256).map(|i| from + (to - from) * i as f32 / 256.0).collect()
    }

    fn apply<B: SimdBackend>(op: impl Fn(B::Lanes) -> B::Lanes, inputs: &[f32]) -> Vec<f32> {
        inputs
            .chunks(4)
            .flat_map(|chunk| {
                let mut lanes = [chunk[0]; 4];
                lanes[..chunk.len()].copy_from_slice(chunk);
                B::to_array(op(B::from_array(lanes)))
                    .into_iter()
                    .take(chunk.len())
            })
            .collect()
    }

    /// 误差按 `max(|expected|, 1)` 归一；`relative` 为真时按 `|expected|` 归一
    fn assert_accuracy<B: SimdBackend>(
        name: &str,
        op: Unary<B>,
        reference: fn(f32) -> f32,
        inputs: &[f32],
        tolerance: f32,
        relative: bool,
    ) {
        for (x, actual) in inputs.iter().zip(apply::<B>(op, inputs)) {
            let expected = reference(*x);
            let scale = if relative {
                expected.abs()
            } else {
                expected.abs().max(1.0)
            };
            let err = (actual - expected).abs() / scale;
            assert!(
                err <= tolerance,
                "{}/{}({}) = {}, expected {} (err {:e})",
                B::KIND,
                name,
                x,
                actual,
                expected,
                err
            );
        }
    }

    fn away_from_poles(inputs: Vec<f32>) -> Vec<f32> {
        inputs.into_iter().filter(|x| x.cos().abs() > 0.1).collect()
    }

    fn atan_inputs() -> Vec<f32> {
        let mut inputs = grid(-100.0, 100.0);
        inputs.extend(grid(-2.0, 2.0));
        inputs
    }

    fn log_inputs() -> Vec<f32> {
        grid(-20.0, 20.0).into_iter().map(f32::exp).collect()
    }

    fn near_one() -> Vec<f32> {
        SMALL.iter().filter(|x| **x > 0.0).map(|x| 1.0 + x).collect()
    }

    fn check_accurate_family<B: SimdBackend>() {
        let angles = grid(-10.0, 10.0);
        let unit = grid(-1.0, 1.0);

        assert_accuracy::<B>("sin", sin::<B>, f32::sin, &angles, ACCURATE, false);
        assert_accuracy::<B>("cos", cos::<B>, f32::cos, &angles, ACCURATE, false);
        // 极点附近受参数舍入放大
        assert_accuracy::<B>("tan", tan::<B>, f32::tan, &away_from_poles(angles), 1e-5, false);
        assert_accuracy::<B>("asin", asin::<B>, f32::asin, &unit, ACCURATE, false);
        assert_accuracy::<B>("acos", acos::<B>, f32::acos, &unit, ACCURATE, false);
        assert_accuracy::<B>("atan", atan::<B>, f32::atan, &atan_inputs(), ACCURATE, false);
        assert_accuracy::<B>("exp2", exp2::<B>, f32::exp2, &grid(-20.0, 20.0), ACCURATE, true);
        assert_accuracy::<B>("exp", exp::<B>, f32::exp, &grid(-10.0, 10.0), 2e-6, true);
        assert_accuracy::<B>("log", log::<B>, f32::ln, &log_inputs(), ACCURATE, false);
        assert_accuracy::<B>("log2", log2::<B>, f32::log2, &log_inputs(), ACCURATE, false);

        let small_cases: [(&str, Unary<B>, fn(f32) -> f32); 4] = [
            ("sin", sin::<B>, f32::sin),
            ("tan", tan::<B>, f32::tan),
            ("asin", asin::<B>, f32::asin),
            ("atan", atan::<B>, f32::atan),
        ];
        for (name, op, reference) in small_cases {
            assert_accuracy::<B>(name, op, reference, &SMALL, ACCURATE, true);
        }
        assert_accuracy::<B>("log", log::<B>, f32::ln, &near_one(), ACCURATE, true);
        assert_accuracy::<B>("log2", log2::<B>, f32::log2, &near_one(), ACCURATE, true);
    }

    fn check_estimate_family<B: SimdBackend>() {
        let angles = grid(-10.0, 10.0);
        let unit = grid(-1.0, 1.0);

        assert_accuracy::<B>("sin_est", sin_est::<B>, f32::sin, &angles, ESTIMATE, false);
        assert_accuracy::<B>("cos_est", cos_est::<B>, f32::cos, &angles, ESTIMATE, false);
        assert_accuracy::<B>(
            "tan_est",
            tan_est::<B>,
            f32::tan,
            &away_from_poles(angles),
            ESTIMATE_LOOSE,
            false,
        );
        assert_accuracy::<B>("asin_est", asin_est::<B>, f32::asin, &unit, ESTIMATE_LOOSE, false);
        assert_accuracy::<B>("acos_est", acos_est::<B>, f32::acos, &unit, ESTIMATE, false);
        // 含 |x| > 1 的倒数分支
        assert_accuracy::<B>("atan_est", atan_est::<B>, f32::atan, &atan_inputs(), ESTIMATE, false);
        assert_accuracy::<B>("exp2_est", exp2_est::<B>, f32::exp2, &grid(-20.0, 20.0), ESTIMATE, true);
        assert_accuracy::<B>("exp_est", exp_est::<B>, f32::exp, &grid(-10.0, 10.0), ESTIMATE, true);
        assert_accuracy::<B>("log_est", log_est::<B>, f32::ln, &log_inputs(), ESTIMATE, false);
        assert_accuracy::<B>("log2_est", log2_est::<B>, f32::log2, &log_inputs(), ESTIMATE, false);

        let small_cases: [(&str, Unary<B>, fn(f32) -> f32); 4] = [
            ("sin_est", sin_est::<B>, f32::sin),
            ("tan_est", tan_est::<B>, f32::tan),
            ("asin_est", asin_est::<B>, f32::asin),
            ("atan_est", atan_est::<B>, f32::atan),
        ];
        for (name, op, reference) in small_cases {
            assert_accuracy::<B>(name, op, reference, &SMALL, ESTIMATE, true);
        }
        assert_accuracy::<B>("log_est", log_est::<B>, f32::ln, &near_one(), ESTIMATE, true);
        assert_accuracy::<B>("log2_est", log2_est::<B>, f32::log2, &near_one(), ESTIMATE, true);
    }

    fn check_atan2<B: SimdBackend>() {
        let axis = grid(-5.0, 5.0);
        let ys: Vec<f32> = axis.iter().step_by(16).copied().collect();
        let xs: Vec<f32> = ys.iter().copied().filter(|x| *x != 0.0).collect();
        for &y in &ys {
            let accurate = apply::<B>(|x| atan2::<B>(B::splat(y), x), &xs);
            let estimate = apply::<B>(|x| atan2_est::<B>(B::splat(y), x), &xs);
            for ((&x, a), e) in xs.iter().zip(accurate).zip(estimate) {
                let expected = y.atan2(x);
                let scale = expected.abs().max(1.0);
                assert!((a - expected).abs() <= ACCURATE * scale, "atan2({y}, {x}) = {a}");
                assert!((e - expected).abs() <= ESTIMATE * scale, "atan2_est({y}, {x}) = {e}");
            }
        }
    }

    fn check_sin_cos_pairs<B: SimdBackend>() {
        let v = B::set(0.3, -2.0, 4.5, -7.9);
        let (s, c) = sin_cos::<B>(v);
        assert_eq!(B::to_bits(s), B::to_bits(sin::<B>(v)));
        assert_eq!(B::to_bits(c), B::to_bits(cos::<B>(v)));
        let (s, c) = sin_cos_est::<B>(v);
        assert_eq!(B::to_bits(s), B::to_bits(sin_est::<B>(v)));
        assert_eq!(B::to_bits(c), B::to_bits(cos_est::<B>(v)));
    }

    #[test]
    fn test_accurate_family_against_std() {
        check_accurate_family::<H>();
        check_accurate_family::<S>();
    }

    #[test]
    fn test_estimate_family_against_std() {
        check_estimate_family::<H>();
        check_estimate_family::<S>();
    }

    #[test]
    fn test_atan2_grid() {
        check_atan2::<H>();
        check_atan2::<S>();
    }

    #[test]
    fn test_sin_cos_match_single_functions() {
        check_sin_cos_pairs::<H>();
        check_sin_cos_pairs::<S>();
    }

    #[test]
    fn test_asin_small_arguments_keep_relative_precision() {
        let r = H::to_array(asin::<H>(H::set(1.0e-6, -1.0e-4, 0.0, -0.0)));
        assert!((r[0] - 1.0e-6).abs() <= 1.0e-6 * ACCURATE);
        assert!((r[1] + 1.0e-4).abs() <= 1.0e-4 * ACCURATE);
        assert_eq!(r[2].to_bits(), 0.0f32.to_bits());
        assert_eq!(r[3].to_bits(), (-0.0f32).to_bits());
    }

    #[test]
    fn test_atan_est_reciprocal_branch() {
        let input = [1.083_007_8, -1.5, 7.25, -60.0];
        let r = H::to_array(atan_est::<H>(H::from_array(input)));
        for (a, x) in r.iter().zip(input.iter()) {
            assert!((a - x.atan()).abs() <= ESTIMATE, "atan_est({x}) = {a}");
        }
    }

    #[test]
    fn test_atan2_quadrants_and_specials() {
        let r = H::to_array(atan2::<H>(
            H::set(0.0, 2.0, f32::INFINITY, f32::INFINITY),
            H::set(-1.0, 0.0, 1.0, -f32::INFINITY),
        ));
        let expected = [PI, HALF_PI, HALF_PI, PI * 0.75];
        for (a, e) in r.iter().zip(expected.iter()) {
            assert!((a - e).abs() <= 1e-7, "{a} vs {e}");
        }
    }

    #[test]
    fn test_exp_log_special_values() {
        let r = H::to_array(exp2::<H>(H::set(200.0, -200.0, f32::NEG_INFINITY, f32::NAN)));
        assert_eq!(r[0], f32::INFINITY);
        assert_eq!(r[1], 0.0);
        assert_eq!(r[2], 0.0);
        assert!(r[3].is_nan());

        let r = H::to_array(log::<H>(H::set(0.0, -1.0, f32::INFINITY, 1.0e-40)));
        assert_eq!(r[0], f32::NEG_INFINITY);
        assert!(r[1].is_nan());
        assert_eq!(r[2], f32::INFINITY);
        assert!((r[3] - 1.0e-40f32.ln()).abs() < 1e-4);
    }
}
