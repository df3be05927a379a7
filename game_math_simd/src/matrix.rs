//! 4x4矩阵通用内核
//!
//! 逆矩阵使用余子式展开（6组2x2子式），全部以通道运算完成，
//! 因此标量与硬件后端走完全相同的运算序列。

use crate::backend::{LaneMatrix, SimdBackend, FLT_EPSILON};

#[inline]
pub fn multiply<B: SimdBackend>(a: &LaneMatrix<B>, b: &LaneMatrix<B>) -> LaneMatrix<B> {
    let row = |v: B::Lanes| {
        let r = B::mul(B::splat_x(v), b.r[0]);
        let r = B::multiply_add(B::splat_y(v), b.r[1], r);
        let r = B::multiply_add(B::splat_z(v), b.r[2], r);
        B::multiply_add(B::splat_w(v), b.r[3], r)
    };
    LaneMatrix::from_rows(row(a.r[0]), row(a.r[1]), row(a.r[2]), row(a.r[3]))
}

#[inline]
pub fn transpose<B: SimdBackend>(m: &LaneMatrix<B>) -> LaneMatrix<B> {
    // (r0.x, r1.x, r0.y, r1.y) / (r2.x, r3.x, r2.y, r3.y) ...
    let t0 = B::permute::<0, 4, 1, 5>(m.r[0], m.r[1]);
    let t1 = B::permute::<0, 4, 1, 5>(m.r[2], m.r[3]);
    let t2 = B::permute::<2, 6, 3, 7>(m.r[0], m.r[1]);
    let t3 = B::permute::<2, 6, 3, 7>(m.r[2], m.r[3]);
    LaneMatrix::from_rows(
        B::permute::<0, 1, 4, 5>(t0, t1),
        B::permute::<2, 3, 6, 7>(t0, t1),
        B::permute::<0, 1, 4, 5>(t2, t3),
        B::permute::<2, 3, 6, 7>(t2, t3),
    )
}

/// 第 `$a`、`$b` 列组成的2x2子式，按 (r2r3, r2r3, r1r3, r1r2) 排列
macro_rules! cofactor_pairs {
    ($B:ty, $m:expr, $a:literal, $b:literal) => {{
        let s00 = <$B>::permute::<$a, $a, { 4 + $a }, { 4 + $a }>($m.r[2], $m.r[1]);
        let s01 = <$B>::permute::<$b, $b, $b, { 4 + $b }>($m.r[3], $m.r[2]);
        let s02 = <$B>::permute::<$a, $a, $a, { 4 + $a }>($m.r[3], $m.r[2]);
        let s03 = <$B>::permute::<$b, $b, { 4 + $b }, { 4 + $b }>($m.r[2], $m.r[1]);
        <$B>::sub(<$B>::mul(s00, s01), <$B>::mul(s02, s03))
    }};
}

/// 伴随矩阵（行形式）与行列式
#[inline]
fn adjugate<B: SimdBackend>(m: &LaneMatrix<B>) -> (LaneMatrix<B>, f32) {
    let fac0 = cofactor_pairs!(B, m, 2, 3);
    let fac1 = cofactor_pairs!(B, m, 1, 3);
    let fac2 = cofactor_pairs!(B, m, 1, 2);
    let fac3 = cofactor_pairs!(B, m, 0, 3);
    let fac4 = cofactor_pairs!(B, m, 0, 2);
    let fac5 = cofactor_pairs!(B, m, 0, 1);

    let vec0 = B::permute::<0, 4, 4, 4>(m.r[1], m.r[0]);
    let vec1 = B::permute::<1, 5, 5, 5>(m.r[1], m.r[0]);
    let vec2 = B::permute::<2, 6, 6, 6>(m.r[1], m.r[0]);
    let vec3 = B::permute::<3, 7, 7, 7>(m.r[1], m.r[0]);

    let inv0 = B::add(B::sub(B::mul(vec1, fac0), B::mul(vec2, fac1)), B::mul(vec3, fac2));
    let inv1 = B::add(B::sub(B::mul(vec0, fac0), B::mul(vec2, fac3)), B::mul(vec3, fac4));
    let inv2 = B::add(B::sub(B::mul(vec0, fac1), B::mul(vec1, fac3)), B::mul(vec3, fac5));
    let inv3 = B::add(B::sub(B::mul(vec0, fac2), B::mul(vec1, fac4)), B::mul(vec2, fac5));

    let sign_a = B::set(1.0, -1.0, 1.0, -1.0);
    let sign_b = B::set(-1.0, 1.0, -1.0, 1.0);
    let adj = LaneMatrix::from_rows(
        B::mul(inv0, sign_a),
        B::mul(inv1, sign_b),
        B::mul(inv2, sign_a),
        B::mul(inv3, sign_b),
    );

    // 伴随矩阵第0列与原矩阵第0行的点积即行列式
    let t0 = B::permute::<0, 4, 0, 4>(adj.r[0], adj.r[1]);
    let t1 = B::permute::<0, 4, 0, 4>(adj.r[2], adj.r[3]);
    let col0 = B::permute::<0, 1, 4, 5>(t0, t1);
    let det = B::get_x(B::dot4(m.r[0], col0));
    (adj, det)
}

#[inline]
pub fn determinant<B: SimdBackend>(m: &LaneMatrix<B>) -> f32 {
    adjugate(m).1
}

/// 接近奇异时把行列式钳制到 `±FLT_EPSILON`，`±0` 都钳制为 `+FLT_EPSILON`
#[inline]
pub fn clamp_determinant(det: f32) -> f32 {
    if det == 0.0 {
        FLT_EPSILON
    } else if det.abs() < FLT_EPSILON {
        FLT_EPSILON.copysign(det)
    } else {
        det
    }
}

#[inline]
pub fn inverse<B: SimdBackend>(m: &LaneMatrix<B>) -> (LaneMatrix<B>, f32) {
    let (adj, det) = adjugate(m);
    let scale = B::splat(1.0 / clamp_determinant(det));
    let inv = LaneMatrix::from_rows(
        B::mul(adj.r[0], scale),
        B::mul(adj.r[1], scale),
        B::mul(adj.r[2], scale),
        B::mul(adj.r[3], scale),
    );
    (inv, det)
}
