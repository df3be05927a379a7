//! SIMD后端契约
//!
//! 所有后端（标量回退、SSE2、NEON）共享同一组运算签名。每个后端是一个零尺寸类型，
//! 通过关联类型 [`SimdBackend::Lanes`] 暴露其4通道f32寄存器表示。
//!
//! 只有最底层的原语（算术、比较、位运算、整数通道运算）是必须实现的；
//! 其余运算以默认方法的形式由原语组合而成，硬件后端可以按需覆盖为更快的指令序列。
//! 覆盖实现必须与默认实现在容差范围内保持一致（见 `tests.rs` 中的后端等价测试）。

use std::fmt::Debug;
use std::ops::{Deref, DerefMut};

use crate::matrix;
use crate::transcendental;
use crate::BackendKind;

/// 单精度浮点机器epsilon（`FLT_EPSILON`）
pub const FLT_EPSILON: f32 = f32::EPSILON;
/// 符号位掩码
pub const SIGN_MASK: u32 = 0x8000_0000;
/// 绝对值掩码
pub const ABS_MASK: u32 = 0x7FFF_FFFF;
/// 全1掩码（比较结果的"真"）
pub const ALL_BITS: u32 = 0xFFFF_FFFF;
/// 静默NaN位模式
pub const QNAN_BITS: u32 = 0x7FC0_0000;
/// 正无穷位模式
pub const INFINITY_BITS: u32 = 0x7F80_0000;

/// 16字节对齐包装器
///
/// 对齐加载/存储只接受 `&Align16<...>`，对齐要求由类型系统保证。
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Align16<T>(pub T);

impl<T> Align16<T> {
    pub const fn new(value: T) -> Self {
        Self(value)
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Align16<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Align16<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

/// 4个通道寄存器组成的4x4矩阵（行主序，行向量约定）
#[derive(Debug, Clone, Copy)]
pub struct LaneMatrix<B: SimdBackend> {
    pub r: [B::Lanes; 4],
}

impl<B: SimdBackend> LaneMatrix<B> {
    #[inline]
    pub fn from_rows(r0: B::Lanes, r1: B::Lanes, r2: B::Lanes, r3: B::Lanes) -> Self {
        Self { r: [r0, r1, r2, r3] }
    }

    #[inline]
    pub fn identity() -> Self {
        B::matrix_identity()
    }

    #[inline]
    pub fn to_array(&self) -> [[f32; 4]; 4] {
        [
            B::to_array(self.r[0]),
            B::to_array(self.r[1]),
            B::to_array(self.r[2]),
            B::to_array(self.r[3]),
        ]
    }
}

/// SIMD后端trait
///
/// 所有函数都是关联函数（无 `self`），调用形式为 `B::add(a, b)`。
/// 比较运算返回逐通道的全1/全0掩码；掩码只应交给位运算、`select` 或 `move_mask` 使用。
pub trait SimdBackend: Copy + Clone + Debug + Default + Send + Sync + 'static {
    /// 4通道f32寄存器
    type Lanes: Copy + Debug + Send + Sync;

    /// 后端种类
    const KIND: BackendKind;

    // ------------------------------------------------------------------
    // 构造与通道访问
    // ------------------------------------------------------------------

    fn zero() -> Self::Lanes;
    fn set(x: f32, y: f32, z: f32, w: f32) -> Self::Lanes;
    fn splat(value: f32) -> Self::Lanes;
    fn to_array(v: Self::Lanes) -> [f32; 4];

    #[inline]
    fn from_array(a: [f32; 4]) -> Self::Lanes {
        Self::set(a[0], a[1], a[2], a[3])
    }

    /// 以位模式构造（用于掩码与整数常量）
    #[inline]
    fn set_bits(x: u32, y: u32, z: u32, w: u32) -> Self::Lanes {
        Self::set(
            f32::from_bits(x),
            f32::from_bits(y),
            f32::from_bits(z),
            f32::from_bits(w),
        )
    }

    #[inline]
    fn splat_bits(bits: u32) -> Self::Lanes {
        Self::splat(f32::from_bits(bits))
    }

    #[inline]
    fn to_bits(v: Self::Lanes) -> [u32; 4] {
        Self::to_array(v).map(f32::to_bits)
    }

    #[inline]
    fn splat_one() -> Self::Lanes {
        Self::splat(1.0)
    }

    #[inline]
    fn splat_infinity() -> Self::Lanes {
        Self::splat_bits(INFINITY_BITS)
    }

    #[inline]
    fn splat_qnan() -> Self::Lanes {
        Self::splat_bits(QNAN_BITS)
    }

    #[inline]
    fn splat_epsilon() -> Self::Lanes {
        Self::splat(FLT_EPSILON)
    }

    #[inline]
    fn true_mask() -> Self::Lanes {
        Self::splat_bits(ALL_BITS)
    }

    #[inline]
    fn get_x(v: Self::Lanes) -> f32 {
        Self::to_array(v)[0]
    }

    #[inline]
    fn get_y(v: Self::Lanes) -> f32 {
        Self::to_array(v)[1]
    }

    #[inline]
    fn get_z(v: Self::Lanes) -> f32 {
        Self::to_array(v)[2]
    }

    #[inline]
    fn get_w(v: Self::Lanes) -> f32 {
        Self::to_array(v)[3]
    }

    #[inline]
    fn set_x(v: Self::Lanes, x: f32) -> Self::Lanes {
        let mut a = Self::to_array(v);
        a[0] = x;
        Self::from_array(a)
    }

    #[inline]
    fn set_y(v: Self::Lanes, y: f32) -> Self::Lanes {
        let mut a = Self::to_array(v);
        a[1] = y;
        Self::from_array(a)
    }

    #[inline]
    fn set_z(v: Self::Lanes, z: f32) -> Self::Lanes {
        let mut a = Self::to_array(v);
        a[2] = z;
        Self::from_array(a)
    }

    #[inline]
    fn set_w(v: Self::Lanes, w: f32) -> Self::Lanes {
        let mut a = Self::to_array(v);
        a[3] = w;
        Self::from_array(a)
    }

    #[inline]
    fn splat_x(v: Self::Lanes) -> Self::Lanes {
        Self::swizzle::<0, 0, 0, 0>(v)
    }

    #[inline]
    fn splat_y(v: Self::Lanes) -> Self::Lanes {
        Self::swizzle::<1, 1, 1, 1>(v)
    }

    #[inline]
    fn splat_z(v: Self::Lanes) -> Self::Lanes {
        Self::swizzle::<2, 2, 2, 2>(v)
    }

    #[inline]
    fn splat_w(v: Self::Lanes) -> Self::Lanes {
        Self::swizzle::<3, 3, 3, 3>(v)
    }

    /// 编译期通道重排（索引 0..3）
    #[inline]
    fn swizzle<const X: usize, const Y: usize, const Z: usize, const W: usize>(
        v: Self::Lanes,
    ) -> Self::Lanes {
        let a = Self::to_array(v);
        Self::set(a[X], a[Y], a[Z], a[W])
    }

    /// 编译期双源通道重排（索引 0..3 取自 `a`，4..7 取自 `b`）
    #[inline]
    fn permute<const X: usize, const Y: usize, const Z: usize, const W: usize>(
        a: Self::Lanes,
        b: Self::Lanes,
    ) -> Self::Lanes {
        let a = Self::to_array(a);
        let b = Self::to_array(b);
        let pick = |i: usize| if i < 4 { a[i] } else { b[i - 4] };
        Self::set(pick(X), pick(Y), pick(Z), pick(W))
    }

    // ------------------------------------------------------------------
    // 加载与存储
    // ------------------------------------------------------------------

    #[inline]
    fn load_float2(src: &[f32; 2]) -> Self::Lanes {
        Self::set(src[0], src[1], 0.0, 0.0)
    }

    #[inline]
    fn load_float3(src: &[f32; 3]) -> Self::Lanes {
        Self::set(src[0], src[1], src[2], 0.0)
    }

    #[inline]
    fn load_float4(src: &[f32; 4]) -> Self::Lanes {
        Self::from_array(*src)
    }

    #[inline]
    fn load_float2a(src: &Align16<[f32; 2]>) -> Self::Lanes {
        Self::load_float2(&src.0)
    }

    #[inline]
    fn load_float3a(src: &Align16<[f32; 3]>) -> Self::Lanes {
        Self::load_float3(&src.0)
    }

    #[inline]
    fn load_float4a(src: &Align16<[f32; 4]>) -> Self::Lanes {
        Self::load_float4(&src.0)
    }

    /// 从裸指针做16字节对齐加载
    ///
    /// # Safety
    ///
    /// 调用者必须确保：
    /// 1. `src` 指向至少4个有效的f32
    /// 2. `src` 按16字节对齐（debug构建中断言，release构建中违反即为未定义行为）
    #[inline]
    unsafe fn load_float4a_ptr(src: *const f32) -> Self::Lanes {
        debug_assert_eq!(src as usize % 16, 0, "aligned load requires 16-byte alignment");
        Self::from_array(std::ptr::read(src as *const [f32; 4]))
    }

    #[inline]
    fn store_float2(dst: &mut [f32; 2], v: Self::Lanes) {
        let a = Self::to_array(v);
        dst.copy_from_slice(&a[..2]);
    }

    #[inline]
    fn store_float3(dst: &mut [f32; 3], v: Self::Lanes) {
        let a = Self::to_array(v);
        dst.copy_from_slice(&a[..3]);
    }

    #[inline]
    fn store_float4(dst: &mut [f32; 4], v: Self::Lanes) {
        *dst = Self::to_array(v);
    }

    #[inline]
    fn store_float2a(dst: &mut Align16<[f32; 2]>, v: Self::Lanes) {
        Self::store_float2(&mut dst.0, v)
    }

    #[inline]
    fn store_float3a(dst: &mut Align16<[f32; 3]>, v: Self::Lanes) {
        Self::store_float3(&mut dst.0, v)
    }

    #[inline]
    fn store_float4a(dst: &mut Align16<[f32; 4]>, v: Self::Lanes) {
        Self::store_float4(&mut dst.0, v)
    }

    /// 向裸指针做16字节对齐存储
    ///
    /// # Safety
    ///
    /// `dst` 必须可写至少4个f32，并且按16字节对齐。
    #[inline]
    unsafe fn store_float4a_ptr(dst: *mut f32, v: Self::Lanes) {
        debug_assert_eq!(dst as usize % 16, 0, "aligned store requires 16-byte alignment");
        std::ptr::write(dst as *mut [f32; 4], Self::to_array(v));
    }

    #[inline]
    fn load_float4x4(src: &[[f32; 4]; 4]) -> LaneMatrix<Self> {
        LaneMatrix::from_rows(
            Self::load_float4(&src[0]),
            Self::load_float4(&src[1]),
            Self::load_float4(&src[2]),
            Self::load_float4(&src[3]),
        )
    }

    /// 16宽对齐加载
    #[inline]
    fn load_float4x4a(src: &Align16<[[f32; 4]; 4]>) -> LaneMatrix<Self> {
        Self::load_float4x4(&src.0)
    }

    #[inline]
    fn store_float4x4(dst: &mut [[f32; 4]; 4], m: &LaneMatrix<Self>) {
        for (row, lanes) in dst.iter_mut().zip(m.r.iter()) {
            Self::store_float4(row, *lanes);
        }
    }

    #[inline]
    fn store_float4x4a(dst: &mut Align16<[[f32; 4]; 4]>, m: &LaneMatrix<Self>) {
        Self::store_float4x4(&mut dst.0, m)
    }

    // ------------------------------------------------------------------
    // 算术
    // ------------------------------------------------------------------

    fn add(a: Self::Lanes, b: Self::Lanes) -> Self::Lanes;
    fn sub(a: Self::Lanes, b: Self::Lanes) -> Self::Lanes;
    fn mul(a: Self::Lanes, b: Self::Lanes) -> Self::Lanes;
    fn div(a: Self::Lanes, b: Self::Lanes) -> Self::Lanes;

    /// 逐通道最小值；任一操作数为NaN时结果未指定
    fn min(a: Self::Lanes, b: Self::Lanes) -> Self::Lanes;
    /// 逐通道最大值；任一操作数为NaN时结果未指定
    fn max(a: Self::Lanes, b: Self::Lanes) -> Self::Lanes;

    /// 向下取整
    fn floor(v: Self::Lanes) -> Self::Lanes;
    /// 向上取整
    fn ceil(v: Self::Lanes) -> Self::Lanes;
    /// 四舍五入到最近偶数
    fn round(v: Self::Lanes) -> Self::Lanes;
    /// 向零取整
    fn truncate(v: Self::Lanes) -> Self::Lanes;

    /// `a * b + c`
    ///
    /// 支持FMA的硬件后端只舍入一次；标量回退先乘后加，舍入两次。
    #[inline]
    fn multiply_add(a: Self::Lanes, b: Self::Lanes, c: Self::Lanes) -> Self::Lanes {
        Self::add(Self::mul(a, b), c)
    }

    /// `c - a * b`
    #[inline]
    fn negative_multiply_subtract(a: Self::Lanes, b: Self::Lanes, c: Self::Lanes) -> Self::Lanes {
        Self::sub(c, Self::mul(a, b))
    }

    #[inline]
    fn negate(v: Self::Lanes) -> Self::Lanes {
        Self::xor(v, Self::splat_bits(SIGN_MASK))
    }

    #[inline]
    fn abs(v: Self::Lanes) -> Self::Lanes {
        Self::and(v, Self::splat_bits(ABS_MASK))
    }

    #[inline]
    fn scale(v: Self::Lanes, s: f32) -> Self::Lanes {
        Self::mul(v, Self::splat(s))
    }

    #[inline]
    fn clamp(v: Self::Lanes, min: Self::Lanes, max: Self::Lanes) -> Self::Lanes {
        debug_assert!(
            Self::move_mask(Self::less_or_equal(min, max)) == 0b1111,
            "clamp requires min <= max"
        );
        Self::min(Self::max(v, min), max)
    }

    #[inline]
    fn saturate(v: Self::Lanes) -> Self::Lanes {
        Self::min(Self::max(v, Self::zero()), Self::splat_one())
    }

    /// `a + (b - a) * t`
    #[inline]
    fn lerp(a: Self::Lanes, b: Self::Lanes, t: Self::Lanes) -> Self::Lanes {
        Self::multiply_add(Self::sub(b, a), t, a)
    }

    // ------------------------------------------------------------------
    // 开方与倒数
    // ------------------------------------------------------------------

    fn sqrt(v: Self::Lanes) -> Self::Lanes;
    fn sqrt_est(v: Self::Lanes) -> Self::Lanes;
    fn reciprocal(v: Self::Lanes) -> Self::Lanes;
    /// 约1/4096相对误差
    fn reciprocal_est(v: Self::Lanes) -> Self::Lanes;
    fn reciprocal_sqrt(v: Self::Lanes) -> Self::Lanes;
    /// 约1/4096相对误差
    fn reciprocal_sqrt_est(v: Self::Lanes) -> Self::Lanes;

    // ------------------------------------------------------------------
    // 比较（返回逐通道掩码）
    // ------------------------------------------------------------------

    fn equal(a: Self::Lanes, b: Self::Lanes) -> Self::Lanes;
    fn greater(a: Self::Lanes, b: Self::Lanes) -> Self::Lanes;
    fn greater_or_equal(a: Self::Lanes, b: Self::Lanes) -> Self::Lanes;
    fn less(a: Self::Lanes, b: Self::Lanes) -> Self::Lanes;
    fn less_or_equal(a: Self::Lanes, b: Self::Lanes) -> Self::Lanes;
    /// 按32位整数比较相等
    fn equal_int(a: Self::Lanes, b: Self::Lanes) -> Self::Lanes;

    /// 每个通道符号位组成的4位掩码（x为最低位）
    fn move_mask(v: Self::Lanes) -> u32;

    #[inline]
    fn not_equal(a: Self::Lanes, b: Self::Lanes) -> Self::Lanes {
        Self::xor(Self::equal(a, b), Self::true_mask())
    }

    /// `|a - b| <= epsilon`
    #[inline]
    fn near_equal(a: Self::Lanes, b: Self::Lanes, epsilon: Self::Lanes) -> Self::Lanes {
        Self::less_or_equal(Self::abs(Self::sub(a, b)), epsilon)
    }

    /// `-bounds <= v <= bounds`
    #[inline]
    fn in_bounds(v: Self::Lanes, bounds: Self::Lanes) -> Self::Lanes {
        Self::and(
            Self::less_or_equal(v, bounds),
            Self::less_or_equal(Self::negate(bounds), v),
        )
    }

    #[inline]
    fn is_nan(v: Self::Lanes) -> Self::Lanes {
        Self::not_equal(v, v)
    }

    #[inline]
    fn is_infinite(v: Self::Lanes) -> Self::Lanes {
        Self::equal(Self::abs(v), Self::splat_infinity())
    }

    // ------------------------------------------------------------------
    // 位运算
    // ------------------------------------------------------------------

    fn and(a: Self::Lanes, b: Self::Lanes) -> Self::Lanes;
    fn or(a: Self::Lanes, b: Self::Lanes) -> Self::Lanes;
    fn xor(a: Self::Lanes, b: Self::Lanes) -> Self::Lanes;
    /// `a & !b`
    fn and_not(a: Self::Lanes, b: Self::Lanes) -> Self::Lanes;

    /// 掩码选择：`control` 置位的通道取 `b`，否则取 `a`
    #[inline]
    fn select(a: Self::Lanes, b: Self::Lanes, control: Self::Lanes) -> Self::Lanes {
        Self::or(Self::and_not(a, control), Self::and(b, control))
    }

    // ------------------------------------------------------------------
    // 整数通道
    // ------------------------------------------------------------------

    fn add_i32(a: Self::Lanes, b: Self::Lanes) -> Self::Lanes;
    fn sub_i32(a: Self::Lanes, b: Self::Lanes) -> Self::Lanes;
    fn shift_left_i32(v: Self::Lanes, count: u32) -> Self::Lanes;
    /// 逻辑右移
    fn shift_right_u32(v: Self::Lanes, count: u32) -> Self::Lanes;
    /// 向零截断；超出i32范围的结果在各后端间未指定
    fn convert_f32_to_i32(v: Self::Lanes) -> Self::Lanes;
    fn convert_i32_to_f32(v: Self::Lanes) -> Self::Lanes;

    // ------------------------------------------------------------------
    // 几何
    // ------------------------------------------------------------------

    /// 2维点积，结果复制到所有通道
    #[inline]
    fn dot2(a: Self::Lanes, b: Self::Lanes) -> Self::Lanes {
        let m = Self::mul(a, b);
        Self::add(Self::splat_x(m), Self::splat_y(m))
    }

    /// 3维点积，结果复制到所有通道
    #[inline]
    fn dot3(a: Self::Lanes, b: Self::Lanes) -> Self::Lanes {
        let m = Self::mul(a, b);
        Self::add(Self::add(Self::splat_x(m), Self::splat_y(m)), Self::splat_z(m))
    }

    /// 4维点积，结果复制到所有通道
    #[inline]
    fn dot4(a: Self::Lanes, b: Self::Lanes) -> Self::Lanes {
        let m = Self::mul(a, b);
        Self::add(
            Self::add(Self::add(Self::splat_x(m), Self::splat_y(m)), Self::splat_z(m)),
            Self::splat_w(m),
        )
    }

    /// 2维叉积 `a.x * b.y - a.y * b.x`，结果复制到所有通道
    #[inline]
    fn cross2(a: Self::Lanes, b: Self::Lanes) -> Self::Lanes {
        let r = Self::mul(a, Self::swizzle::<1, 0, 1, 0>(b));
        Self::sub(Self::splat_x(r), Self::splat_y(r))
    }

    /// 3维叉积，w通道为0
    #[inline]
    fn cross3(a: Self::Lanes, b: Self::Lanes) -> Self::Lanes {
        let t1 = Self::swizzle::<1, 2, 0, 3>(a);
        let t2 = Self::swizzle::<2, 0, 1, 3>(b);
        let r = Self::mul(t1, t2);
        let t1 = Self::swizzle::<2, 0, 1, 3>(a);
        let t2 = Self::swizzle::<1, 2, 0, 3>(b);
        let r = Self::negative_multiply_subtract(t1, t2, r);
        Self::and(r, Self::set_bits(ALL_BITS, ALL_BITS, ALL_BITS, 0))
    }

    // ------------------------------------------------------------------
    // 超越函数（多项式逼近，所有后端共用同一套系数）
    // ------------------------------------------------------------------

    #[inline]
    fn sin(v: Self::Lanes) -> Self::Lanes {
        transcendental::sin::<Self>(v)
    }

    #[inline]
    fn cos(v: Self::Lanes) -> Self::Lanes {
        transcendental::cos::<Self>(v)
    }

    #[inline]
    fn sin_cos(v: Self::Lanes) -> (Self::Lanes, Self::Lanes) {
        transcendental::sin_cos::<Self>(v)
    }

    #[inline]
    fn tan(v: Self::Lanes) -> Self::Lanes {
        transcendental::tan::<Self>(v)
    }

    #[inline]
    fn asin(v: Self::Lanes) -> Self::Lanes {
        transcendental::asin::<Self>(v)
    }

    #[inline]
    fn acos(v: Self::Lanes) -> Self::Lanes {
        transcendental::acos::<Self>(v)
    }

    #[inline]
    fn atan(v: Self::Lanes) -> Self::Lanes {
        transcendental::atan::<Self>(v)
    }

    #[inline]
    fn atan2(y: Self::Lanes, x: Self::Lanes) -> Self::Lanes {
        transcendental::atan2::<Self>(y, x)
    }

    #[inline]
    fn exp2(v: Self::Lanes) -> Self::Lanes {
        transcendental::exp2::<Self>(v)
    }

    #[inline]
    fn exp(v: Self::Lanes) -> Self::Lanes {
        transcendental::exp::<Self>(v)
    }

    #[inline]
    fn log2(v: Self::Lanes) -> Self::Lanes {
        transcendental::log2::<Self>(v)
    }

    #[inline]
    fn log(v: Self::Lanes) -> Self::Lanes {
        transcendental::log::<Self>(v)
    }

    #[inline]
    fn sin_est(v: Self::Lanes) -> Self::Lanes {
        transcendental::sin_est::<Self>(v)
    }

    #[inline]
    fn cos_est(v: Self::Lanes) -> Self::Lanes {
        transcendental::cos_est::<Self>(v)
    }

    #[inline]
    fn sin_cos_est(v: Self::Lanes) -> (Self::Lanes, Self::Lanes) {
        transcendental::sin_cos_est::<Self>(v)
    }

    #[inline]
    fn tan_est(v: Self::Lanes) -> Self::Lanes {
        transcendental::tan_est::<Self>(v)
    }

    #[inline]
    fn asin_est(v: Self::Lanes) -> Self::Lanes {
        transcendental::asin_est::<Self>(v)
    }

    #[inline]
    fn acos_est(v: Self::Lanes) -> Self::Lanes {
        transcendental::acos_est::<Self>(v)
    }

    #[inline]
    fn atan_est(v: Self::Lanes) -> Self::Lanes {
        transcendental::atan_est::<Self>(v)
    }

    #[inline]
    fn atan2_est(y: Self::Lanes, x: Self::Lanes) -> Self::Lanes {
        transcendental::atan2_est::<Self>(y, x)
    }

    #[inline]
    fn exp2_est(v: Self::Lanes) -> Self::Lanes {
        transcendental::exp2_est::<Self>(v)
    }

    #[inline]
    fn exp_est(v: Self::Lanes) -> Self::Lanes {
        transcendental::exp_est::<Self>(v)
    }

    #[inline]
    fn log2_est(v: Self::Lanes) -> Self::Lanes {
        transcendental::log2_est::<Self>(v)
    }

    #[inline]
    fn log_est(v: Self::Lanes) -> Self::Lanes {
        transcendental::log_est::<Self>(v)
    }

    // ------------------------------------------------------------------
    // 4x4矩阵
    // ------------------------------------------------------------------

    #[inline]
    fn matrix_identity() -> LaneMatrix<Self> {
        LaneMatrix::from_rows(
            Self::set(1.0, 0.0, 0.0, 0.0),
            Self::set(0.0, 1.0, 0.0, 0.0),
            Self::set(0.0, 0.0, 1.0, 0.0),
            Self::set(0.0, 0.0, 0.0, 1.0),
        )
    }

    /// 行向量约定下的 `a * b`（先应用a，再应用b）
    #[inline]
    fn matrix_multiply(a: &LaneMatrix<Self>, b: &LaneMatrix<Self>) -> LaneMatrix<Self> {
        matrix::multiply::<Self>(a, b)
    }

    #[inline]
    fn matrix_transpose(m: &LaneMatrix<Self>) -> LaneMatrix<Self> {
        matrix::transpose::<Self>(m)
    }

    #[inline]
    fn matrix_determinant(m: &LaneMatrix<Self>) -> f32 {
        matrix::determinant::<Self>(m)
    }

    /// 返回 `(逆矩阵, 原始行列式)`
    ///
    /// 当 `|det| < FLT_EPSILON` 时，求倒数前将行列式钳制为 `±FLT_EPSILON`（保留符号，±0都视为正），
    /// 因此钳制本身不会产生NaN/Inf；返回的行列式是未钳制的原始值。
    #[inline]
    fn matrix_inverse(m: &LaneMatrix<Self>) -> (LaneMatrix<Self>, f32) {
        matrix::inverse::<Self>(m)
    }

    /// 行向量 `v * m`
    #[inline]
    fn vector4_transform(v: Self::Lanes, m: &LaneMatrix<Self>) -> Self::Lanes {
        let r = Self::mul(Self::splat_x(v), m.r[0]);
        let r = Self::multiply_add(Self::splat_y(v), m.r[1], r);
        let r = Self::multiply_add(Self::splat_z(v), m.r[2], r);
        Self::multiply_add(Self::splat_w(v), m.r[3], r)
    }
}
