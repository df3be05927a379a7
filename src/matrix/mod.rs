//! 矩阵值类型
//!
//! 所有矩阵都是行主序、行向量约定（`v' = v * M`，`A * B` 先应用A再应用B），
//! 每行存储为4个f32，列数不足4的矩阵尾部填充0，算术运算从不读取填充。
//!
//! 运算统一装入4x4通道矩阵完成：
//!
//! | 类型 | 装入方式 |
//! |------|----------|
//! | [`Float3x3`] | 左上3x3块，第4行第4列为1 |
//! | [`Float4x3`] | 4行，第4列为 `(0, 0, 0, 1)`（仿射） |
//! | [`Float3x4`] | 3行，第4行为 `(0, 0, 0, 1)`（转置的仿射） |
//! | [`Float4x4`] | 原样 |
//!
//! 因此行列式、逆矩阵与乘法对所有形状共享同一套4x4内核。

mod factory;
mod float3x3;
mod float3x4;
mod float4x3;
mod float4x4;

pub use float3x3::Float3x3;
pub use float3x4::Float3x4;
pub use float4x3::Float4x3;
pub use float4x4::Float4x4;

use game_math_simd::{LaneMatrix, SimdBackend};

use crate::{Backend, Lanes};

pub(crate) type LaneMatrix4 = LaneMatrix<Backend>;

/// 逐行应用一元运算
#[inline]
pub(crate) fn map_rows(m: &LaneMatrix4, f: impl Fn(Lanes) -> Lanes) -> LaneMatrix4 {
    LaneMatrix::from_rows(f(m.r[0]), f(m.r[1]), f(m.r[2]), f(m.r[3]))
}

/// 逐行应用二元运算
#[inline]
pub(crate) fn zip_rows(
    a: &LaneMatrix4,
    b: &LaneMatrix4,
    f: impl Fn(Lanes, Lanes) -> Lanes,
) -> LaneMatrix4 {
    LaneMatrix::from_rows(
        f(a.r[0], b.r[0]),
        f(a.r[1], b.r[1]),
        f(a.r[2], b.r[2]),
        f(a.r[3], b.r[3]),
    )
}

/// 从通道矩阵取前 `R` 行，第 `cols` 列之后的通道写0
#[inline]
pub(crate) fn store_rows<const R: usize>(m: &LaneMatrix4, cols: usize) -> [[f32; 4]; R] {
    let mut rows = [[0.0; 4]; R];
    for (dst, src) in rows.iter_mut().zip(m.r.iter()) {
        Backend::store_float4(dst, *src);
        for padding in dst.iter_mut().skip(cols) {
            *padding = 0.0;
        }
    }
    rows
}

/// 为矩阵类型实现通用接口
///
/// 要求类型有 `rows: [[f32; 4]; R]` 字段，以及 `lanes()` / `from_lanes()`。
macro_rules! impl_matrix_common {
    ($ty:ident, $r:literal, $c:literal) => {
        impl $ty {
            pub const ZERO: Self = Self {
                rows: [[0.0; 4]; $r],
            };

            /// 行数
            pub const ROWS: usize = $r;
            /// 列数
            pub const COLS: usize = $c;

            /// 从逻辑形状构造
            pub fn from_rows(rows: [[f32; $c]; $r]) -> Self {
                let mut m = Self::ZERO;
                for (dst, src) in m.rows.iter_mut().zip(rows.iter()) {
                    dst[..$c].copy_from_slice(src);
                }
                m
            }

            /// 导出逻辑形状
            pub fn to_rows(&self) -> [[f32; $c]; $r] {
                let mut out = [[0.0; $c]; $r];
                for (dst, src) in out.iter_mut().zip(self.rows.iter()) {
                    dst.copy_from_slice(&src[..$c]);
                }
                out
            }

            /// 第 `index` 行
            ///
            /// # Panics
            ///
            /// `index` 超出行数时panic
            pub fn row(&self, index: usize) -> [f32; $c] {
                assert!(index < $r, "row {} out of range for {}", index, stringify!($ty));
                let mut out = [0.0; $c];
                out.copy_from_slice(&self.rows[index][..$c]);
                out
            }

            /// 覆盖第 `index` 行
            pub fn set_row(&mut self, index: usize, row: [f32; $c]) {
                assert!(index < $r, "row {} out of range for {}", index, stringify!($ty));
                self.rows[index][..$c].copy_from_slice(&row);
            }

            #[inline]
            pub fn determinant(&self) -> f32 {
                Backend::matrix_determinant(&self.lanes())
            }

            /// 逆矩阵
            ///
            /// 近奇异矩阵的行列式在求倒数前被钳制为 `±FLT_EPSILON`，结果有限但没有几何意义。
            /// 需要检测奇异时使用 [`Self::checked_inverse`]。
            #[inline]
            pub fn inverse(&self) -> Self {
                self.inverse_with_determinant().0
            }

            /// 返回 `(逆矩阵, 原始行列式)`
            pub fn inverse_with_determinant(&self) -> (Self, f32) {
                let (inverse, determinant) = Backend::matrix_inverse(&self.lanes());
                if determinant.abs() < game_math_simd::FLT_EPSILON {
                    tracing::trace!(
                        target: "game_math::matrix",
                        determinant,
                        "{} inverse clamped a near-singular determinant",
                        stringify!($ty)
                    );
                }
                (Self::from_lanes(&inverse), determinant)
            }

            /// 逆矩阵；行列式绝对值小于 `FLT_EPSILON` 或非有限时返回错误
            pub fn checked_inverse(&self) -> $crate::error::MathResult<Self> {
                let (inverse, determinant) = self.inverse_with_determinant();
                if !determinant.is_finite() || determinant.abs() < game_math_simd::FLT_EPSILON {
                    return Err($crate::error::MathError::SingularMatrix { determinant });
                }
                Ok(inverse)
            }

            /// 所有逻辑元素之差都不超过 `epsilon`
            pub fn near_equal(&self, rhs: &Self, epsilon: f32) -> bool {
                let epsilon = Backend::splat(epsilon);
                self.rows.iter().zip(rhs.rows.iter()).all(|(a, b)| {
                    let mask = Backend::near_equal(Backend::load_float4(a), Backend::load_float4(b), epsilon);
                    $crate::vector::all_lanes(mask, $c)
                })
            }
        }

        impl std::ops::Index<(usize, usize)> for $ty {
            type Output = f32;

            #[inline]
            fn index(&self, (row, col): (usize, usize)) -> &f32 {
                assert!(
                    row < $r && col < $c,
                    "index ({}, {}) out of range for {}",
                    row,
                    col,
                    stringify!($ty)
                );
                &self.rows[row][col]
            }
        }

        impl std::ops::IndexMut<(usize, usize)> for $ty {
            #[inline]
            fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f32 {
                assert!(
                    row < $r && col < $c,
                    "index ({}, {}) out of range for {}",
                    row,
                    col,
                    stringify!($ty)
                );
                &mut self.rows[row][col]
            }
        }

        impl std::ops::Add for $ty {
            type Output = Self;

            #[inline]
            fn add(self, rhs: Self) -> Self {
                Self::from_lanes(&$crate::matrix::zip_rows(&self.lanes(), &rhs.lanes(), Backend::add))
            }
        }

        impl std::ops::Sub for $ty {
            type Output = Self;

            #[inline]
            fn sub(self, rhs: Self) -> Self {
                Self::from_lanes(&$crate::matrix::zip_rows(&self.lanes(), &rhs.lanes(), Backend::sub))
            }
        }

        impl std::ops::Mul for $ty {
            type Output = Self;

            /// 行向量约定：先应用 `self`，再应用 `rhs`
            #[inline]
            fn mul(self, rhs: Self) -> Self {
                Self::from_lanes(&Backend::matrix_multiply(&self.lanes(), &rhs.lanes()))
            }
        }

        impl std::ops::Mul<f32> for $ty {
            type Output = Self;

            #[inline]
            fn mul(self, rhs: f32) -> Self {
                Self::from_lanes(&$crate::matrix::map_rows(&self.lanes(), |r| Backend::scale(r, rhs)))
            }
        }

        impl std::ops::Mul<$ty> for f32 {
            type Output = $ty;

            #[inline]
            fn mul(self, rhs: $ty) -> $ty {
                rhs * self
            }
        }

        impl std::ops::Div<f32> for $ty {
            type Output = Self;

            #[inline]
            fn div(self, rhs: f32) -> Self {
                let d = Backend::splat(rhs);
                Self::from_lanes(&$crate::matrix::map_rows(&self.lanes(), |r| Backend::div(r, d)))
            }
        }

        impl std::ops::Neg for $ty {
            type Output = Self;

            #[inline]
            fn neg(self) -> Self {
                Self::from_lanes(&$crate::matrix::map_rows(&self.lanes(), Backend::negate))
            }
        }

        impl std::ops::AddAssign for $ty {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                *self = *self + rhs;
            }
        }

        impl std::ops::SubAssign for $ty {
            #[inline]
            fn sub_assign(&mut self, rhs: Self) {
                *self = *self - rhs;
            }
        }

        impl std::ops::MulAssign for $ty {
            #[inline]
            fn mul_assign(&mut self, rhs: Self) {
                *self = *self * rhs;
            }
        }

        impl std::ops::MulAssign<f32> for $ty {
            #[inline]
            fn mul_assign(&mut self, rhs: f32) {
                *self = *self * rhs;
            }
        }

        impl std::ops::DivAssign<f32> for $ty {
            #[inline]
            fn div_assign(&mut self, rhs: f32) {
                *self = *self / rhs;
            }
        }

        impl Default for $ty {
            fn default() -> Self {
                Self::IDENTITY
            }
        }

        impl From<[[f32; $c]; $r]> for $ty {
            fn from(rows: [[f32; $c]; $r]) -> Self {
                Self::from_rows(rows)
            }
        }

        impl From<$ty> for [[f32; $c]; $r] {
            fn from(m: $ty) -> Self {
                m.to_rows()
            }
        }
    };
}

pub(crate) use impl_matrix_common;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_rows_zeroes_padding() {
        let m = LaneMatrix4::from_rows(
            Backend::splat(1.0),
            Backend::splat(2.0),
            Backend::splat(3.0),
            Backend::splat(4.0),
        );
        let rows: [[f32; 4]; 3] = store_rows(&m, 3);
        assert_eq!(rows, [[1.0, 1.0, 1.0, 0.0], [2.0, 2.0, 2.0, 0.0], [3.0, 3.0, 3.0, 0.0]]);
    }

    #[test]
    fn test_shape_conversions() {
        let m = Float4x4::make_rotation_z(0.5) * Float4x4::make_translation(1.0, 2.0, 3.0);
        let affine = Float4x3::from(m);
        assert_eq!(Float4x4::from(affine), m);

        let upper = Float3x3::from(m);
        let back = Float4x4::from(upper);
        assert_eq!(back.row(3), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(back.row(0)[..3], m.row(0)[..3]);

        let transposed = affine.transpose();
        assert_eq!(transposed.transpose(), affine);
        assert_eq!(transposed[(0, 3)], 1.0);
    }
}
