use criterion::{Criterion, black_box, criterion_group, criterion_main};

use gizmo_core::Color;
use gizmo_core::mesh::generators::{
    CIRCLE_RESOLUTION, generate_cube, generate_sphere, generate_wire_cube, generate_wire_sphere,
};

// ---------------------------------------------------------------------------
// Mesh generation
// ---------------------------------------------------------------------------

fn bench_generate_cube(c: &mut Criterion) {
    c.bench_function("generate_cube", |b| {
        b.iter(|| black_box(generate_cube()));
    });
}

fn bench_generate_wire_cube(c: &mut Criterion) {
    c.bench_function("generate_wire_cube", |b| {
        b.iter(|| black_box(generate_wire_cube()));
    });
}

fn bench_generate_wire_sphere(c: &mut Criterion) {
    c.bench_function("generate_wire_sphere_32", |b| {
        b.iter(|| generate_wire_sphere(black_box(CIRCLE_RESOLUTION)));
    });
}

fn bench_generate_sphere_medium(c: &mut Criterion) {
    c.bench_function("generate_sphere_64x32", |b| {
        b.iter(|| generate_sphere(black_box(0.5), black_box(64), black_box(32)));
    });
}

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

fn bench_lerp_hsv(c: &mut Criterion) {
    c.bench_function("color_lerp_hsv", |b| {
        b.iter(|| black_box(Color::RED).lerp_hsv(black_box(Color::CYAN), black_box(0.3)));
    });
}

criterion_group!(
    benches,
    bench_generate_cube,
    bench_generate_wire_cube,
    bench_generate_wire_sphere,
    bench_generate_sphere_medium,
    bench_lerp_hsv,
);
criterion_main!(benches);
