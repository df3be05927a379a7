//! 核心宏定义
//!
//! 提供统一的宏来减少代码重复

/// 为结构体实现Default trait的宏
///
/// 使用示例:
/// ```rust
/// use game_math::impl_default;
///
/// struct Sampling {
///     samples: u32,
///     seed: u64,
/// }
///
/// impl_default!(Sampling {
///     samples: 256,
///     seed: 0,
/// });
///
/// assert_eq!(Sampling::default().samples, 256);
/// ```
#[macro_export]
macro_rules! impl_default {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }
    };
}

/// 为向量类型实现逐分量运算符的宏
///
/// 运算经由当前后端的通道寄存器完成，要求类型提供 `lanes()` / `from_lanes()`。
macro_rules! impl_vector_ops {
    ($ty:ident, $n:literal, $($field:ident),+) => {
        impl std::ops::Add for $ty {
            type Output = Self;

            #[inline]
            fn add(self, rhs: Self) -> Self {
                Self::from_lanes(Backend::add(self.lanes(), rhs.lanes()))
            }
        }

        impl std::ops::Sub for $ty {
            type Output = Self;

            #[inline]
            fn sub(self, rhs: Self) -> Self {
                Self::from_lanes(Backend::sub(self.lanes(), rhs.lanes()))
            }
        }

        impl std::ops::Mul for $ty {
            type Output = Self;

            #[inline]
            fn mul(self, rhs: Self) -> Self {
                Self::from_lanes(Backend::mul(self.lanes(), rhs.lanes()))
            }
        }

        impl std::ops::Div for $ty {
            type Output = Self;

            #[inline]
            fn div(self, rhs: Self) -> Self {
                Self::from_lanes(Backend::div(self.lanes(), rhs.lanes()))
            }
        }

        impl std::ops::Mul<f32> for $ty {
            type Output = Self;

            #[inline]
            fn mul(self, rhs: f32) -> Self {
                Self::from_lanes(Backend::scale(self.lanes(), rhs))
            }
        }

        impl std::ops::Mul<$ty> for f32 {
            type Output = $ty;

            #[inline]
            fn mul(self, rhs: $ty) -> $ty {
                $ty::from_lanes(Backend::scale(rhs.lanes(), self))
            }
        }

        impl std::ops::Div<f32> for $ty {
            type Output = Self;

            #[inline]
            fn div(self, rhs: f32) -> Self {
                Self::from_lanes(Backend::div(self.lanes(), Backend::splat(rhs)))
            }
        }

        impl std::ops::Neg for $ty {
            type Output = Self;

            #[inline]
            fn neg(self) -> Self {
                Self::from_lanes(Backend::negate(self.lanes()))
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

        impl std::ops::DivAssign for $ty {
            #[inline]
            fn div_assign(&mut self, rhs: Self) {
                *self = *self / rhs;
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

        impl From<[f32; $n]> for $ty {
            #[inline]
            fn from(a: [f32; $n]) -> Self {
                let [$($field),+] = a;
                Self { $($field),+ }
            }
        }

        impl From<$ty> for [f32; $n] {
            #[inline]
            fn from(v: $ty) -> Self {
                [$(v.$field),+]
            }
        }
    };
}

pub(crate) use impl_vector_ops;
