use crate::error::MathResult;
use crate::matrix::Float4x4;
use crate::vector::{Vector2, Vector3, Vector4};

/// 为向量类型生成流变换三件套：panic版、`try_*` 版、切片版
macro_rules! impl_stream {
    ($ty:ident => $out:ident, $op:ident, $stream:ident, $try_stream:ident, $slice:ident) => {
        impl $ty {
            #[doc = concat!("批量 [`", stringify!($ty), "::", stringify!($op), "`]，前置条件不满足时返回错误")]
            ///
            /// # 参数
            ///
            /// * `output` / `output_stride` - 输出缓冲区与字节步长
            /// * `input` / `input_stride` - 输入缓冲区与字节步长
            /// * `count` - 元素个数
            /// * `m` - 变换矩阵
            pub fn $try_stream(
                output: &mut [u8],
                output_stride: usize,
                input: &[u8],
                input_stride: usize,
                count: usize,
                m: &Float4x4,
            ) -> MathResult<()> {
                tracing::trace!(
                    target: "game_math::batch",
                    count,
                    input_stride,
                    output_stride,
                    "{}::{}",
                    stringify!($ty),
                    stringify!($stream)
                );
                super::stream_map(output, output_stride, input, input_stride, count, |v: $ty| {
                    v.$op(m)
                })
            }

            #[doc = concat!("批量 [`", stringify!($ty), "::", stringify!($op), "`]")]
            ///
            /// # Panics
            ///
            /// 步长小于记录大小，或缓冲区装不下 `count` 条记录时panic
            pub fn $stream(
                output: &mut [u8],
                output_stride: usize,
                input: &[u8],
                input_stride: usize,
                count: usize,
                m: &Float4x4,
            ) {
                if let Err(error) =
                    Self::$try_stream(output, output_stride, input, input_stride, count, m)
                {
                    panic!("{}::{}: {}", stringify!($ty), stringify!($stream), error);
                }
            }

            /// 紧密排列的切片版本
            ///
            /// # Panics
            ///
            /// 两个切片长度不同时panic
            pub fn $slice(input: &[$ty], output: &mut [$out], m: &Float4x4) {
                assert_eq!(
                    input.len(),
                    output.len(),
                    "input and output slices must have the same length"
                );
                Self::$stream(
                    bytemuck::cast_slice_mut(output),
                    std::mem::size_of::<$out>(),
                    bytemuck::cast_slice(input),
                    std::mem::size_of::<$ty>(),
                    input.len(),
                    m,
                );
            }
        }
    };
}

impl_stream!(Vector2 => Vector4, transform, transform_stream, try_transform_stream, transform_slice);
impl_stream!(Vector2 => Vector2, transform_coord, transform_coord_stream, try_transform_coord_stream, transform_coord_slice);
impl_stream!(Vector2 => Vector2, transform_normal, transform_normal_stream, try_transform_normal_stream, transform_normal_slice);

impl_stream!(Vector3 => Vector4, transform, transform_stream, try_transform_stream, transform_slice);
impl_stream!(Vector3 => Vector3, transform_coord, transform_coord_stream, try_transform_coord_stream, transform_coord_slice);
impl_stream!(Vector3 => Vector3, transform_normal, transform_normal_stream, try_transform_normal_stream, transform_normal_slice);

impl_stream!(Vector4 => Vector4, transform, transform_stream, try_transform_stream, transform_slice);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MathError;
    use crate::quaternion::Quaternion;
    use bytemuck::{Pod, Zeroable};

    /// 交错顶点：位置 + 纹理坐标
    #[repr(C)]
    #[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
    struct Vertex {
        position: Vector3,
        uv: Vector2,
    }

    fn matrix() -> Float4x4 {
        Float4x4::make_affine_position_rotation_scale(
            Vector3::new(1.0, -2.0, 0.5),
            Quaternion::from_axis_angle(Vector3::new(1.0, 1.0, 0.0), 0.7),
            Vector3::new(2.0, 1.0, 3.0),
        ) * Float4x4::make_perspective_field_of_view(1.0, 1.5, 0.1, 50.0)
    }

    fn same_bits<T: Pod>(a: &T, b: &T) -> bool {
        bytemuck::bytes_of(a) == bytemuck::bytes_of(b)
    }

    fn vertices() -> Vec<Vertex> {
        (0..7)
            .map(|i| {
                let f = i as f32;
                Vertex {
                    position: Vector3::new(f, 0.5 * f - 1.0, 2.0 + f),
                    uv: Vector2::new(0.1 * f, 1.0 - 0.1 * f),
                }
            })
            .collect()
    }

    #[test]
    fn test_interleaved_positions_match_single() {
        let m = matrix();
        let verts = vertices();
        let stride = std::mem::size_of::<Vertex>();
        let mut out = verts.clone();

        Vector3::transform_coord_stream(
            bytemuck::cast_slice_mut(&mut out),
            stride,
            bytemuck::cast_slice(&verts),
            stride,
            verts.len(),
            &m,
        );

        for (src, dst) in verts.iter().zip(&out) {
            let expected = src.position.transform_coord(&m);
            assert!(same_bits(&dst.position, &expected));
            // 同一记录中的其他字段不受影响
            assert_eq!(dst.uv, src.uv);
        }
    }

    #[test]
    fn test_all_variants_match_single() {
        let m = matrix();
        let v2: Vec<Vector2> = vertices().iter().map(|v| v.uv).collect();
        let v3: Vec<Vector3> = vertices().iter().map(|v| v.position).collect();
        let v4: Vec<Vector4> = v3.iter().map(|v| v.extend(1.0)).collect();

        let mut out4 = vec![Vector4::ZERO; v2.len()];
        Vector2::transform_slice(&v2, &mut out4, &m);
        assert!(v2.iter().zip(&out4).all(|(a, b)| same_bits(&a.transform(&m), b)));

        let mut out2 = vec![Vector2::ZERO; v2.len()];
        Vector2::transform_coord_slice(&v2, &mut out2, &m);
        assert!(v2.iter().zip(&out2).all(|(a, b)| same_bits(&a.transform_coord(&m), b)));
        Vector2::transform_normal_slice(&v2, &mut out2, &m);
        assert!(v2.iter().zip(&out2).all(|(a, b)| same_bits(&a.transform_normal(&m), b)));

        Vector3::transform_slice(&v3, &mut out4, &m);
        assert!(v3.iter().zip(&out4).all(|(a, b)| same_bits(&a.transform(&m), b)));

        let mut out3 = vec![Vector3::ZERO; v3.len()];
        Vector3::transform_normal_slice(&v3, &mut out3, &m);
        assert!(v3.iter().zip(&out3).all(|(a, b)| same_bits(&a.transform_normal(&m), b)));
        Vector3::transform_coord_slice(&v3, &mut out3, &m);
        assert!(v3.iter().zip(&out3).all(|(a, b)| same_bits(&a.transform_coord(&m), b)));

        Vector4::transform_slice(&v4, &mut out4, &m);
        assert!(v4.iter().zip(&out4).all(|(a, b)| same_bits(&a.transform(&m), b)));
    }

    #[test]
    fn test_try_variants_report_errors() {
        let m = Float4x4::IDENTITY;
        let input = [0u8; 24];
        let mut output = [0u8; 32];

        let err = Vector3::try_transform_stream(&mut output, 16, &input, 8, 2, &m).unwrap_err();
        assert!(matches!(err, MathError::StrideTooSmall { stride: 8, minimum: 12 }));

        let err = Vector3::try_transform_stream(&mut output, 16, &input, 12, 3, &m).unwrap_err();
        assert!(matches!(err, MathError::BufferTooSmall { required: 36, actual: 24 }));

        let err = Vector3::try_transform_stream(&mut output, 12, &input, 12, 2, &m).unwrap_err();
        assert!(matches!(err, MathError::StrideTooSmall { stride: 12, minimum: 16 }));

        assert!(Vector3::try_transform_stream(&mut output, 16, &input, 12, 2, &m).is_ok());
        assert!(Vector2::try_transform_coord_stream(&mut output, 8, &input, 8, 0, &m).is_ok());
    }

    #[test]
    #[should_panic(expected = "Stride too small")]
    fn test_stream_panics_on_short_stride() {
        let input = [0u8; 64];
        let mut output = [0u8; 64];
        Vector4::transform_stream(&mut output, 16, &input, 12, 2, &Float4x4::IDENTITY);
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn test_slice_length_mismatch() {
        let input = [Vector3::ONE; 3];
        let mut output = [Vector3::ZERO; 2];
        Vector3::transform_normal_slice(&input, &mut output, &Float4x4::IDENTITY);
    }
}
