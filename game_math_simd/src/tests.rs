//! 后端等价性测试
//!
//! 对有限、非退化输入，编译进来的后端与标量回退在相对容差内一致。

use proptest::prelude::*;

use crate::{ActiveBackend as H, LaneMatrix, ScalarBackend as S, SimdBackend};

const TOLERANCE: f32 = 1e-5;
/// Est族两端各有约1e-5的误差预算
const EST_TOLERANCE: f32 = 2e-5;

fn close(a: [f32; 4], b: [f32; 4], tolerance: f32) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| {
        if x.is_nan() || y.is_nan() {
            return x.is_nan() && y.is_nan();
        }
        (x - y).abs() <= tolerance * x.abs().max(y.abs()).max(1.0)
    })
}

fn finite_f32() -> impl Strategy<Value = f32> {
    -100.0f32..100.0f32
}

fn lanes() -> impl Strategy<Value = [f32; 4]> {
    prop::array::uniform4(finite_f32())
}

fn unit_range() -> impl Strategy<Value = [f32; 4]> {
    prop::array::uniform4(-1.0f32..1.0f32)
}

fn positive() -> impl Strategy<Value = [f32; 4]> {
    prop::array::uniform4(0.001f32..1000.0f32)
}

fn exponents() -> impl Strategy<Value = [f32; 4]> {
    prop::array::uniform4(-20.0f32..20.0f32)
}

macro_rules! unary_equivalence {
    ($name:ident, $op:ident, $strategy:expr, $tolerance:expr) => {
        proptest! {
            #[test]
            fn $name(v in $strategy) {
                let h = H::to_array(H::$op(H::from_array(v)));
                let s = S::to_array(S::$op(S::from_array(v)));
                prop_assert!(close(h, s, $tolerance), "{:?} vs {:?}", h, s);
            }
        }
    };
}

macro_rules! binary_equivalence {
    ($name:ident, $op:ident, $a:expr, $b:expr, $tolerance:expr) => {
        proptest! {
            #[test]
            fn $name(a in $a, b in $b) {
                let h = H::to_array(H::$op(H::from_array(a), H::from_array(b)));
                let s = S::to_array(S::$op(S::from_array(a), S::from_array(b)));
                prop_assert!(close(h, s, $tolerance), "{:?} vs {:?}", h, s);
            }
        }
    };
}

binary_equivalence!(prop_add, add, lanes(), lanes(), 0.0);
binary_equivalence!(prop_sub, sub, lanes(), lanes(), 0.0);
binary_equivalence!(prop_mul, mul, lanes(), lanes(), 0.0);
binary_equivalence!(prop_div, div, lanes(), positive(), TOLERANCE);
binary_equivalence!(prop_min, min, lanes(), lanes(), 0.0);
binary_equivalence!(prop_max, max, lanes(), lanes(), 0.0);
binary_equivalence!(prop_dot3, dot3, lanes(), lanes(), TOLERANCE);
binary_equivalence!(prop_dot4, dot4, lanes(), lanes(), TOLERANCE);
binary_equivalence!(prop_atan2, atan2, lanes(), lanes(), TOLERANCE);
binary_equivalence!(prop_atan2_est, atan2_est, lanes(), lanes(), EST_TOLERANCE);

unary_equivalence!(prop_floor, floor, lanes(), 0.0);
unary_equivalence!(prop_ceil, ceil, lanes(), 0.0);
unary_equivalence!(prop_round, round, lanes(), 0.0);
unary_equivalence!(prop_truncate, truncate, lanes(), 0.0);
unary_equivalence!(prop_sqrt, sqrt, positive(), TOLERANCE);
unary_equivalence!(prop_reciprocal, reciprocal, positive(), TOLERANCE);
unary_equivalence!(prop_reciprocal_sqrt, reciprocal_sqrt, positive(), TOLERANCE);
unary_equivalence!(prop_reciprocal_est, reciprocal_est, positive(), 1.0 / 2048.0);
unary_equivalence!(prop_reciprocal_sqrt_est, reciprocal_sqrt_est, positive(), 1.0 / 2048.0);
unary_equivalence!(prop_sin, sin, lanes(), TOLERANCE);
unary_equivalence!(prop_cos, cos, lanes(), TOLERANCE);
unary_equivalence!(prop_tan, tan, unit_range(), TOLERANCE);
unary_equivalence!(prop_asin, asin, unit_range(), TOLERANCE);
unary_equivalence!(prop_acos, acos, unit_range(), TOLERANCE);
unary_equivalence!(prop_atan, atan, lanes(), TOLERANCE);
unary_equivalence!(prop_exp2, exp2, exponents(), TOLERANCE);
unary_equivalence!(prop_exp, exp, unit_range(), TOLERANCE);
unary_equivalence!(prop_log2, log2, positive(), TOLERANCE);
unary_equivalence!(prop_log, log, positive(), TOLERANCE);

unary_equivalence!(prop_sin_est, sin_est, lanes(), EST_TOLERANCE);
unary_equivalence!(prop_cos_est, cos_est, lanes(), EST_TOLERANCE);
unary_equivalence!(prop_tan_est, tan_est, unit_range(), 2e-4);
unary_equivalence!(prop_asin_est, asin_est, unit_range(), 2e-4);
unary_equivalence!(prop_acos_est, acos_est, unit_range(), EST_TOLERANCE);
unary_equivalence!(prop_atan_est, atan_est, lanes(), EST_TOLERANCE);
unary_equivalence!(prop_exp2_est, exp2_est, exponents(), EST_TOLERANCE);
unary_equivalence!(prop_exp_est, exp_est, unit_range(), EST_TOLERANCE);
unary_equivalence!(prop_log2_est, log2_est, positive(), EST_TOLERANCE);
unary_equivalence!(prop_log_est, log_est, positive(), EST_TOLERANCE);

fn matrix_rows() -> impl Strategy<Value = [[f32; 4]; 4]> {
    prop::array::uniform4(prop::array::uniform4(-10.0f32..10.0f32))
}

proptest! {
    #[test]
    fn prop_multiply_add_rounding(a in lanes(), b in lanes(), c in lanes()) {
        // 单次舍入与两次舍入的差异不超过乘积与加数量级上的几个ulp
        let h = H::to_array(H::multiply_add(H::from_array(a), H::from_array(b), H::from_array(c)));
        let s = S::to_array(S::multiply_add(S::from_array(a), S::from_array(b), S::from_array(c)));
        for i in 0..4 {
            let magnitude = (a[i] * b[i]).abs().max(c[i].abs()).max(1.0);
            prop_assert!((h[i] - s[i]).abs() <= 4.0 * f32::EPSILON * magnitude);
        }
    }

    #[test]
    fn prop_cross3(a in lanes(), b in lanes()) {
        // 两个乘积相减，差异按乘积量级（100 * 100）计
        let h = H::to_array(H::cross3(H::from_array(a), H::from_array(b)));
        let s = S::to_array(S::cross3(S::from_array(a), S::from_array(b)));
        for i in 0..4 {
            prop_assert!((h[i] - s[i]).abs() <= 4.0 * f32::EPSILON * 1.0e4);
        }
        prop_assert_eq!(h[3], 0.0);
    }

    #[test]
    fn prop_select_is_bitwise(a in lanes(), b in lanes(), c in lanes()) {
        let hm = H::less(H::from_array(a), H::from_array(c));
        let sm = S::less(S::from_array(a), S::from_array(c));
        prop_assert_eq!(H::move_mask(hm), S::move_mask(sm));
        let h = H::to_bits(H::select(H::from_array(a), H::from_array(b), hm));
        let s = S::to_bits(S::select(S::from_array(a), S::from_array(b), sm));
        prop_assert_eq!(h, s);
    }

    #[test]
    fn prop_matrix_ops(a in matrix_rows(), b in matrix_rows()) {
        let ha = H::load_float4x4(&a);
        let hb = H::load_float4x4(&b);
        let sa = S::load_float4x4(&a);
        let sb = S::load_float4x4(&b);

        let hp = H::matrix_multiply(&ha, &hb).to_array();
        let sp = S::matrix_multiply(&sa, &sb).to_array();
        for (h, s) in hp.iter().flatten().zip(sp.iter().flatten()) {
            // 累加项的量级可达 4 * 10 * 10，FMA差异按该量级计
            prop_assert!((h - s).abs() <= TOLERANCE * 400.0, "{} vs {}", h, s);
        }

        prop_assert_eq!(H::matrix_transpose(&ha).to_array(), S::matrix_transpose(&sa).to_array());

        let hd = H::matrix_determinant(&ha);
        let sd = S::matrix_determinant(&sa);
        prop_assert!((hd - sd).abs() <= 1e-3 * hd.abs().max(sd.abs()).max(1.0));
    }
}

#[test]
fn test_aligned_and_unaligned_loads_agree() {
    let data = crate::Align16::new([1.0f32, -2.0, 3.5, 4.25]);
    let a = H::to_array(H::load_float4a(&data));
    let u = H::to_array(H::load_float4(&data));
    assert_eq!(a, u);
    let p = unsafe { H::load_float4a_ptr(data.as_ptr()) };
    assert_eq!(H::to_array(p), *data);

    let mut out = crate::Align16::new([0.0f32; 4]);
    H::store_float4a(&mut out, H::splat(7.0));
    assert_eq!(*out, [7.0; 4]);

    let m = crate::Align16::new([[1.0f32, 2.0, 3.0, 4.0]; 4]);
    let lm: LaneMatrix<H> = H::load_float4x4a(&m);
    assert_eq!(lm.to_array(), *m);
}

#[test]
fn test_permute_and_swizzle() {
    let a = H::set(0.0, 1.0, 2.0, 3.0);
    let b = H::set(4.0, 5.0, 6.0, 7.0);
    assert_eq!(H::to_array(H::swizzle::<3, 2, 1, 0>(a)), [3.0, 2.0, 1.0, 0.0]);
    assert_eq!(H::to_array(H::permute::<0, 5, 2, 7>(a, b)), [0.0, 5.0, 2.0, 7.0]);
    assert_eq!(H::to_array(H::splat_z(a)), [2.0; 4]);
}

#[test]
fn test_cross3_basis() {
    let z = H::cross3(H::set(1.0, 0.0, 0.0, 9.0), H::set(0.0, 1.0, 0.0, 9.0));
    assert_eq!(H::to_array(z), [0.0, 0.0, 1.0, 0.0]);
}

#[test]
fn test_near_equal_and_specials() {
    let a = H::set(1.0, f32::NAN, f32::INFINITY, -f32::INFINITY);
    assert_eq!(H::move_mask(H::is_nan(a)), 0b0010);
    assert_eq!(H::move_mask(H::is_infinite(a)), 0b1100);
    let m = H::near_equal(H::splat(1.0), H::set(1.0005, 1.002, 0.9995, 2.0), H::splat(0.001));
    assert_eq!(H::move_mask(m), 0b0101);
}

#[test]
fn test_integer_shifts() {
    let v = H::splat_bits(0x0000_00F0);
    assert_eq!(H::to_bits(H::shift_left_i32(v, 4)), [0xF00; 4]);
    assert_eq!(H::to_bits(H::shift_right_u32(v, 4)), [0xF; 4]);
    let sum = H::add_i32(H::splat_bits(u32::MAX), H::splat_bits(2));
    assert_eq!(H::to_bits(sum), [1; 4]);
}
