//! 数学运算性能基准测试
//!
//! 测试向量、矩阵、四元数等值类型的性能，并以glam作为参照

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use game_math::{Float4x4, Quaternion, Transform3D, Vector3, Vector4};
use glam::{Mat4, Quat, Vec3};

fn bench_vector3_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("vector3_operations");

    let v1 = Vector3::new(1.0, 2.0, 3.0);
    let v2 = Vector3::new(4.0, 5.0, 6.0);

    group.bench_function("add", |b| {
        b.iter(|| black_box(black_box(v1) + black_box(v2)));
    });

    group.bench_function("dot", |b| {
        b.iter(|| black_box(v1).dot(black_box(v2)));
    });

    group.bench_function("cross", |b| {
        b.iter(|| black_box(v1).cross(black_box(v2)));
    });

    group.bench_function("normalize", |b| {
        b.iter(|| black_box(v1).normalize());
    });

    group.bench_function("normalize_est", |b| {
        b.iter(|| black_box(v1).normalize_est());
    });

    group.bench_function("glam_normalize", |b| {
        let g = Vec3::from(v1);
        b.iter(|| black_box(g).normalize());
    });

    group.finish();
}

fn bench_matrix_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("matrix_operations");

    let m1 = Transform3D::new(
        Vector3::new(1.0, 2.0, 3.0),
        Quaternion::from_axis_angle(Vector3::UNIT_Z, 0.785_398),
        Vector3::splat(2.0),
    )
    .to_matrix();
    let m2 = Float4x4::make_perspective_field_of_view(1.0, 1.5, 0.1, 100.0);

    group.bench_function("multiply", |b| {
        b.iter(|| black_box(m1) * black_box(m2));
    });

    group.bench_function("glam_multiply", |b| {
        let (g1, g2) = (Mat4::from(m1), Mat4::from(m2));
        b.iter(|| black_box(g2) * black_box(g1));
    });

    group.bench_function("inverse", |b| {
        b.iter(|| black_box(m1).inverse());
    });

    group.bench_function("transpose", |b| {
        b.iter(|| black_box(m1).transpose());
    });

    group.bench_function("determinant", |b| {
        b.iter(|| black_box(m1).determinant());
    });

    group.bench_function("decompose", |b| {
        b.iter(|| black_box(m1).decompose());
    });

    group.bench_function("transform_coord", |b| {
        b.iter(|| black_box(Vector3::new(1.0, 2.0, 3.0)).transform_coord(&m2));
    });

    group.finish();
}

fn bench_quaternion_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("quaternion_operations");

    let q1 = Quaternion::from_yaw_pitch_roll(0.3, 0.2, 0.1);
    let q2 = Quaternion::from_axis_angle(Vector3::new(1.0, 1.0, 0.0), 1.2);

    group.bench_function("multiply", |b| {
        b.iter(|| black_box(q1) * black_box(q2));
    });

    group.bench_function("glam_multiply", |b| {
        let (g1, g2) = (Quat::from(q1), Quat::from(q2));
        b.iter(|| black_box(g1) * black_box(g2));
    });

    group.bench_function("slerp", |b| {
        b.iter(|| black_box(q1).slerp(black_box(q2), 0.5));
    });

    group.bench_function("rotate_vector", |b| {
        b.iter(|| black_box(q1).rotate_vector(Vector3::new(1.0, 2.0, 3.0)));
    });

    group.bench_function("to_rotation_matrix", |b| {
        b.iter(|| black_box(q1).to_rotation_matrix());
    });

    group.bench_function("from_rotation_matrix", |b| {
        let m = q1.to_rotation_matrix3();
        b.iter(|| Quaternion::from_rotation_matrix(black_box(&m)));
    });

    group.finish();
}

fn bench_stream_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream_transform");
    let m = Float4x4::make_rotation_y(0.5) * Float4x4::make_translation(1.0, 2.0, 3.0);

    for count in [64usize, 1024, 16384] {
        let points: Vec<Vector3> = (0..count)
            .map(|i| Vector3::new(i as f32, (i % 7) as f32, 1.0))
            .collect();
        let mut out = vec![Vector4::ZERO; count];

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("transform_slice", count), &points, |b, points| {
            b.iter(|| Vector3::transform_slice(black_box(points), &mut out, &m));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_vector3_operations,
    bench_matrix_operations,
    bench_quaternion_operations,
    bench_stream_transform
);
criterion_main!(benches);
