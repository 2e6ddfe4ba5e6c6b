use criterion::{criterion_group, criterion_main, Criterion, black_box};

use voxseg::brush::{footprint, path_footprint, BrushConfig, BrushShape, SizingMode};
use voxseg::core::types::{Mat4, UVec3, Vec2, Vec3};
use voxseg::math::Plane;
use voxseg::segmentation::scissor::{rasterize, FillRule};
use voxseg::view::ViewContext;
use voxseg::volume::VolumeGeometry;

fn bench_sphere_footprint(c: &mut Criterion) {
    let geometry = VolumeGeometry::unit(UVec3::splat(256));
    let view = ViewContext::three_d(Mat4::IDENTITY, 1.0, Plane::new(Vec3::ZERO, Vec3::Z));
    let brush = BrushConfig {
        shape: BrushShape::Sphere,
        sizing: SizingMode::Absolute,
        diameter: 24.0,
    };

    c.bench_function("sphere_footprint_d24", |b| {
        b.iter(|| {
            footprint(
                black_box(&geometry),
                black_box(&view),
                black_box(&brush),
                Vec3::splat(128.0),
                None,
            )
        });
    });
}

fn bench_stroke_path(c: &mut Criterion) {
    let geometry = VolumeGeometry::unit(UVec3::splat(256));
    let view = ViewContext::three_d(Mat4::IDENTITY, 1.0, Plane::new(Vec3::ZERO, Vec3::Z));
    let brush = BrushConfig {
        shape: BrushShape::Sphere,
        sizing: SizingMode::Absolute,
        diameter: 8.0,
    };

    c.bench_function("stroke_path_64vox", |b| {
        b.iter(|| {
            path_footprint(
                black_box(&geometry),
                black_box(&view),
                black_box(&brush),
                Vec3::new(64.0, 128.0, 128.0),
                Vec3::new(128.0, 128.0, 128.0),
                None,
            )
        });
    });
}

fn bench_scissor_prism(c: &mut Criterion) {
    let geometry = VolumeGeometry::unit(UVec3::splat(128));
    let view = ViewContext::three_d(Mat4::IDENTITY, 1.0, Plane::new(Vec3::ZERO, Vec3::Z));
    let polygon: Vec<Vec2> = vec![
        Vec2::new(32.0, 32.0),
        Vec2::new(96.0, 40.0),
        Vec2::new(88.0, 96.0),
        Vec2::new(24.0, 80.0),
    ];

    c.bench_function("scissor_prism_128", |b| {
        b.iter(|| {
            rasterize(
                black_box(&geometry),
                black_box(&view),
                black_box(&polygon),
                FillRule::EvenOdd,
            )
        });
    });
}

criterion_group!(
    benches,
    bench_sphere_footprint,
    bench_stroke_path,
    bench_scissor_prism
);
criterion_main!(benches);
