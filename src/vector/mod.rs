//! 向量值类型
//!
//! [`Vector2`]、[`Vector3`]、[`Vector4`] 是普通的 `#[repr(C)]` 结构体，
//! 每次运算前装入当前后端的通道寄存器，运算后只写回有效分量。
//! 2维和3维向量装入时尾部通道置0，结果从不读取尾部通道。
//!
//! 本模块的私有函数是各维度共享的通道级算法，维度差异只体现在传入的点积结果上。

mod vector2;
mod vector3;
mod vector4;

pub use vector2::Vector2;
pub use vector3::Vector3;
pub use vector4::Vector4;

use game_math_simd::SimdBackend;

use crate::{Backend, Lanes};

/// 精确归一化
///
/// 长度为0时返回0；长度平方为无穷时返回QNaN。
#[inline]
pub(crate) fn normalize_lanes(v: Lanes, length_sq: Lanes) -> Lanes {
    let length = Backend::sqrt(length_sq);
    let non_zero = Backend::not_equal(length, Backend::zero());
    let finite = Backend::not_equal(length_sq, Backend::splat_infinity());
    let result = Backend::and(Backend::div(v, length), non_zero);
    Backend::select(Backend::splat_qnan(), result, finite)
}

/// 估算归一化，不处理零长度与无穷
#[inline]
pub(crate) fn normalize_est_lanes(v: Lanes, length_sq: Lanes) -> Lanes {
    Backend::mul(v, Backend::reciprocal_sqrt_est(length_sq))
}

/// 把长度钳制到 `[min, max]`
///
/// 长度已在范围内时原样返回输入（不经过归一化再缩放，位模式不变）。
#[inline]
pub(crate) fn clamp_length_lanes(v: Lanes, length_sq: Lanes, min: f32, max: f32) -> Lanes {
    debug_assert!(min >= 0.0, "clamp_length requires min >= 0");
    debug_assert!(min <= max, "clamp_length requires min <= max");

    let length_min = Backend::splat(min);
    let length_max = Backend::splat(max);

    let rcp_length = Backend::reciprocal_sqrt(length_sq);
    let infinite_length = Backend::equal_int(length_sq, Backend::splat_infinity());
    let zero_length = Backend::equal(length_sq, Backend::zero());
    let normal = Backend::mul(v, rcp_length);
    let length = Backend::mul(length_sq, rcp_length);

    // 零长度或无穷长度时沿用长度平方本身
    let usable = Backend::equal_int(infinite_length, zero_length);
    let length = Backend::select(length_sq, length, usable);
    let normal = Backend::select(length_sq, normal, usable);

    let control_max = Backend::greater(length, length_max);
    let control_min = Backend::less(length, length_min);
    let clamped = Backend::select(length, length_max, control_max);
    let clamped = Backend::select(clamped, length_min, control_min);
    let result = Backend::mul(normal, clamped);

    let in_range = Backend::equal_int(control_max, control_min);
    Backend::select(result, v, in_range)
}

/// `i - 2 * dot(i, n) * n`
#[inline]
pub(crate) fn reflect_lanes(incident: Lanes, normal: Lanes, dot: Lanes) -> Lanes {
    let twice = Backend::add(dot, dot);
    Backend::negative_multiply_subtract(twice, normal, incident)
}

/// 折射；全内反射时返回0
#[inline]
pub(crate) fn refract_lanes(incident: Lanes, normal: Lanes, dot: Lanes, eta: f32) -> Lanes {
    let eta = Backend::splat(eta);
    let one = Backend::splat_one();

    // r = 1 - eta^2 * (1 - dot^2)
    let r = Backend::negative_multiply_subtract(dot, dot, one);
    let r = Backend::mul(r, Backend::mul(eta, eta));
    let r = Backend::sub(one, r);

    if Backend::move_mask(Backend::less_or_equal(r, Backend::zero())) & 1 != 0 {
        return Backend::zero();
    }

    let r = Backend::multiply_add(eta, dot, Backend::sqrt(r));
    Backend::sub(Backend::mul(eta, incident), Backend::mul(normal, r))
}

/// `acos(clamp(dot, -1, 1))`
#[inline]
pub(crate) fn angle_from_cosine(cosine: Lanes, estimate: bool) -> f32 {
    let one = Backend::splat_one();
    let c = Backend::clamp(cosine, Backend::negate(one), one);
    let angle = if estimate {
        Backend::acos_est(c)
    } else {
        Backend::acos(c)
    };
    Backend::get_x(angle)
}

/// 两个任意向量的夹角（内部归一化）
#[inline]
pub(crate) fn angle_between_lanes(dot: Lanes, length_sq_a: Lanes, length_sq_b: Lanes) -> f32 {
    let l1 = Backend::reciprocal_sqrt(length_sq_a);
    let l2 = Backend::reciprocal_sqrt(length_sq_b);
    angle_from_cosine(Backend::mul(Backend::mul(dot, l1), l2), false)
}

/// 平滑插值：`t` 先钳制到 `[0, 1]`，再取 `t^2 * (3 - 2t)`
#[inline]
pub(crate) fn smooth_step_lanes(a: Lanes, b: Lanes, t: f32) -> Lanes {
    let t = t.clamp(0.0, 1.0);
    let t = t * t * (3.0 - 2.0 * t);
    Backend::lerp(a, b, Backend::splat(t))
}

/// `v1 + (v2 - v1) * f + (v3 - v1) * g`
#[inline]
pub(crate) fn barycentric_lanes(v1: Lanes, v2: Lanes, v3: Lanes, f: f32, g: f32) -> Lanes {
    let r = Backend::multiply_add(Backend::sub(v2, v1), Backend::splat(f), v1);
    Backend::multiply_add(Backend::sub(v3, v1), Backend::splat(g), r)
}

/// Catmull-Rom样条，`t = 0` 得到 `v1`，`t = 1` 得到 `v2`
#[inline]
pub(crate) fn catmull_rom_lanes(v0: Lanes, v1: Lanes, v2: Lanes, v3: Lanes, t: f32) -> Lanes {
    let t2 = t * t;
    let t3 = t * t2;

    let p0 = Backend::splat((-t3 + 2.0 * t2 - t) * 0.5);
    let p1 = Backend::splat((3.0 * t3 - 5.0 * t2 + 2.0) * 0.5);
    let p2 = Backend::splat((-3.0 * t3 + 4.0 * t2 + t) * 0.5);
    let p3 = Backend::splat((t3 - t2) * 0.5);

    let r = Backend::mul(p0, v0);
    let r = Backend::multiply_add(p1, v1, r);
    let r = Backend::multiply_add(p2, v2, r);
    Backend::multiply_add(p3, v3, r)
}

/// Hermite样条：位置 `v1`/`v2`，切线 `t1`/`t2`
#[inline]
pub(crate) fn hermite_lanes(v1: Lanes, t1: Lanes, v2: Lanes, t2: Lanes, t: f32) -> Lanes {
    let s2 = t * t;
    let s3 = t * s2;

    let p0 = Backend::splat(2.0 * s3 - 3.0 * s2 + 1.0);
    let m0 = Backend::splat(s3 - 2.0 * s2 + t);
    let p1 = Backend::splat(-2.0 * s3 + 3.0 * s2);
    let m1 = Backend::splat(s3 - s2);

    let r = Backend::mul(p0, v1);
    let r = Backend::multiply_add(m0, t1, r);
    let r = Backend::multiply_add(p1, v2, r);
    Backend::multiply_add(m1, t2, r)
}

/// 低 `lanes` 个通道的掩码是否全部置位
#[inline]
pub(crate) fn all_lanes(mask: Lanes, lanes: u32) -> bool {
    let bits = (1u32 << lanes) - 1;
    Backend::move_mask(mask) & bits == bits
}

/// 低 `lanes` 个通道的掩码是否有任一置位
#[inline]
pub(crate) fn any_lane(mask: Lanes, lanes: u32) -> bool {
    Backend::move_mask(mask) & ((1u32 << lanes) - 1) != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lanes(a: [f32; 4]) -> Lanes {
        Backend::from_array(a)
    }

    #[test]
    fn test_normalize_degenerate() {
        let zero = normalize_lanes(Backend::zero(), Backend::zero());
        assert_eq!(Backend::to_array(zero), [0.0; 4]);

        let v = lanes([f32::INFINITY, 0.0, 0.0, 0.0]);
        let r = normalize_lanes(v, Backend::dot3(v, v));
        assert!(Backend::to_array(r).iter().all(|x| x.is_nan()));
    }

    #[test]
    fn test_clamp_length_keeps_bits_in_range() {
        let v = lanes([0.1, 0.2, 0.3, 0.0]);
        let r = clamp_length_lanes(v, Backend::dot3(v, v), 0.0, 10.0);
        assert_eq!(Backend::to_bits(r), Backend::to_bits(v));
    }

    #[test]
    fn test_clamp_length_limits() {
        let v = lanes([3.0, 4.0, 0.0, 0.0]);
        let r = Backend::to_array(clamp_length_lanes(v, Backend::dot3(v, v), 0.0, 1.0));
        assert!((r[0] - 0.6).abs() < 1e-5 && (r[1] - 0.8).abs() < 1e-5);

        let r = Backend::to_array(clamp_length_lanes(v, Backend::dot3(v, v), 10.0, 20.0));
        assert!((r[0] - 6.0).abs() < 1e-4 && (r[1] - 8.0).abs() < 1e-4);

        let zero = clamp_length_lanes(Backend::zero(), Backend::zero(), 1.0, 2.0);
        assert_eq!(Backend::to_array(zero), [0.0; 4]);
    }

    #[test]
    fn test_spline_endpoints() {
        let a = lanes([1.0, 2.0, 3.0, 4.0]);
        let b = lanes([5.0, 6.0, 7.0, 8.0]);
        let c = lanes([-1.0, 0.0, 1.0, 2.0]);
        let d = lanes([9.0, 9.0, 9.0, 9.0]);

        assert_eq!(Backend::to_array(catmull_rom_lanes(c, a, b, d, 0.0)), Backend::to_array(a));
        let end = Backend::to_array(catmull_rom_lanes(c, a, b, d, 1.0));
        for (x, y) in end.iter().zip(Backend::to_array(b).iter()) {
            assert!((x - y).abs() < 1e-5);
        }

        assert_eq!(Backend::to_array(hermite_lanes(a, c, b, d, 0.0)), Backend::to_array(a));
        assert_eq!(Backend::to_array(hermite_lanes(a, c, b, d, 1.0)), Backend::to_array(b));
        assert_eq!(Backend::to_array(smooth_step_lanes(a, b, 2.0)), Backend::to_array(b));
        assert_eq!(
            Backend::to_array(barycentric_lanes(a, b, c, 0.0, 1.0)),
            Backend::to_array(c)
        );
    }

    #[test]
    fn test_mask_helpers() {
        let m = Backend::less(lanes([0.0, 1.0, 5.0, 5.0]), Backend::splat(2.0));
        assert!(all_lanes(m, 2));
        assert!(!all_lanes(m, 3));
        assert!(any_lane(m, 1));
        assert!(!any_lane(Backend::greater(Backend::zero(), Backend::splat(1.0)), 4));
    }
}
