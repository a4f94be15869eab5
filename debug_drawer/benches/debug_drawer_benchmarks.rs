use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};

use gizmo_core::math::{Mat4, Pose, Vec3};
use gizmo_debug_drawer::{
    Color, CommandStream, GizmoDevice, GizmoManager, GizmoMaterial, GizmoMesh, GizmoPass,
    GizmoSettings, Replayer, WorldLine,
};

/// Device that only touches the data it receives.
struct NullDevice {
    lines: usize,
}

impl GizmoDevice for NullDevice {
    fn set_pass(&mut self, _: &GizmoMaterial, pass: GizmoPass, _: Color) {
        black_box(pass);
    }
    fn set_wireframe(&mut self, enabled: bool) {
        black_box(enabled);
    }
    fn draw_lines(&mut self, lines: &[WorldLine]) {
        self.lines += black_box(lines).len();
    }
    fn draw_mesh(&mut self, mesh: &GizmoMesh, transform: &Mat4) {
        black_box((mesh, transform));
    }
}

fn record_lines(stream: &mut CommandStream, count: usize) {
    for i in 0..count {
        let color = if i % 8 == 0 { Color::RED } else { Color::GREEN };
        stream.set_color(color);
        stream.draw_line(Vec3::zeros(), Vec3::new(i as f32, 1.0, 0.0));
    }
}

// ---------------------------------------------------------------------------
// Recording
// ---------------------------------------------------------------------------

fn bench_record_10k_lines(c: &mut Criterion) {
    let mut stream = CommandStream::new();
    c.bench_function("record_10k_lines", |b| {
        b.iter(|| {
            stream.clear();
            record_lines(&mut stream, 10_000);
            black_box(stream.operation_count());
        });
    });
}

fn bench_record_camera_aware_spheres(c: &mut Criterion) {
    let mut stream = CommandStream::new();
    stream.set_observer(Some(Pose::translation(0.0, 2.0, 10.0)));
    c.bench_function("record_100_wire_spheres", |b| {
        b.iter(|| {
            stream.clear();
            for i in 0..100 {
                stream.draw_wire_sphere(Vec3::new(i as f32, 0.0, 0.0), 0.5);
            }
            black_box(stream.operation_count());
        });
    });
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

fn bench_replay_10k_lines(c: &mut Criterion) {
    let mut stream = CommandStream::new();
    record_lines(&mut stream, 10_000);
    let material = GizmoMaterial::default_gizmo();
    let mut replayer = Replayer::new();
    c.bench_function("replay_10k_lines", |b| {
        b.iter(|| {
            let mut device = NullDevice { lines: 0 };
            replayer.replay(&stream, &material, &mut device);
            black_box(device.lines);
        });
    });
}

fn bench_frame_cycle(c: &mut Criterion) {
    c.bench_function("frame_cycle_1k_lines", |b| {
        b.iter_batched(
            || {
                let mut manager = GizmoManager::new(GizmoSettings::default());
                manager.activate();
                manager.register(|stream: &mut CommandStream| {
                    record_lines(stream, 1_000);
                    Ok(())
                });
                manager
            },
            |mut manager| {
                manager.record();
                let mut device = NullDevice { lines: 0 };
                black_box(manager.present(&mut device).ok());
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_record_10k_lines,
    bench_record_camera_aware_spheres,
    bench_replay_10k_lines,
    bench_frame_cycle,
);
criterion_main!(benches);
