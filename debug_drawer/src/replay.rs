//! Replay of a recorded [`CommandStream`] onto a display device.

use gizmo_core::Color;
use gizmo_core::math::{Mat4, transform_point};

use crate::geometry::GizmoMesh;
use crate::material::{GizmoMaterial, GizmoPass};
use crate::stream::{CommandStream, Operation};

/// Default initial capacity of the line batch (number of lines).
const DEFAULT_BATCH_CAPACITY: usize = 1024;

/// A world-space line segment, ready for upload as two `Float3` vertices.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct WorldLine {
    pub start: [f32; 3],
    pub end: [f32; 3],
}

/// Display context the host replays gizmos into.
///
/// Calls arrive in recording order. The replayer only issues
/// [`set_pass`](Self::set_pass) when the pass or color actually changes,
/// and hands over consecutive lines as one batch.
pub trait GizmoDevice {
    /// Bind `pass` of `material`, tinted with `color`.
    fn set_pass(&mut self, material: &GizmoMaterial, pass: GizmoPass, color: Color);

    /// Switch wireframe rasterization for subsequent meshes.
    fn set_wireframe(&mut self, enabled: bool);

    /// Draw world-space lines with the bound pass.
    fn draw_lines(&mut self, lines: &[WorldLine]);

    /// Draw `mesh` with a full local-to-world `transform`.
    fn draw_mesh(&mut self, mesh: &GizmoMesh, transform: &Mat4);
}

/// Counters for one replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub operations: usize,
    pub lines: usize,
    pub meshes: usize,
    pub pass_changes: usize,
    pub line_batches: usize,
    /// Operations dropped because their payload was missing.
    pub skipped: usize,
}

/// Walks command streams and issues device calls.
///
/// Owns the line batch so replaying every frame does not reallocate.
pub struct Replayer {
    batch: Vec<WorldLine>,
}

impl Replayer {
    pub fn new() -> Self {
        Self {
            batch: Vec::with_capacity(DEFAULT_BATCH_CAPACITY),
        }
    }

    /// Replay `stream` in recording order.
    ///
    /// Starts from the identity matrix, opaque white and wireframe off, and
    /// always leaves wireframe off. An operation without its payload is
    /// logged and skipped; the rest of the stream still plays.
    pub fn replay<D: GizmoDevice + ?Sized>(
        &mut self,
        stream: &CommandStream,
        material: &GizmoMaterial,
        device: &mut D,
    ) -> ReplayStats {
        let mut stats = ReplayStats::default();
        let mut state = ReplayState {
            matrix: Mat4::identity(),
            color: Color::WHITE,
            pass: None,
            wireframe: false,
        };

        let mut matrices = stream.matrices().iter();
        let mut colors = stream.colors().iter();
        let mut lines = stream.lines().iter();
        let mut meshes = stream.meshes().iter();

        self.batch.clear();

        for (index, operation) in stream.operations().iter().enumerate() {
            stats.operations += 1;
            match operation {
                Operation::SetMatrix => match matrices.next() {
                    Some(matrix) => state.matrix = *matrix,
                    None => Self::skip(&mut stats, index, *operation),
                },
                Operation::SetColor => match colors.next() {
                    Some(color) => {
                        state.color = *color;
                        // The material tint changed; rebind before the next draw.
                        state.pass = None;
                    }
                    None => Self::skip(&mut stats, index, *operation),
                },
                Operation::ToggleWireframe => {
                    self.flush(device, &mut stats);
                    state.wireframe = !state.wireframe;
                    device.set_wireframe(state.wireframe);
                }
                Operation::DrawLine => match lines.next() {
                    Some(line) => {
                        self.ensure_pass(&mut state, false, material, device, &mut stats);
                        let a = transform_point(&state.matrix, line.a);
                        let b = transform_point(&state.matrix, line.b);
                        self.batch.push(WorldLine {
                            start: [a.x, a.y, a.z],
                            end: [b.x, b.y, b.z],
                        });
                        stats.lines += 1;
                    }
                    None => Self::skip(&mut stats, index, *operation),
                },
                Operation::DrawMesh => match meshes.next() {
                    Some(draw) => {
                        let lit = !state.wireframe;
                        self.ensure_pass(&mut state, lit, material, device, &mut stats);
                        self.flush(device, &mut stats);
                        device.draw_mesh(&draw.mesh, &(state.matrix * draw.transform));
                        stats.meshes += 1;
                    }
                    None => Self::skip(&mut stats, index, *operation),
                },
            }
        }

        self.flush(device, &mut stats);
        if state.wireframe {
            device.set_wireframe(false);
        }

        log::trace!(
            "Replayed {} gizmo operations ({} lines in {} batches, {} meshes, {} pass changes)",
            stats.operations,
            stats.lines,
            stats.line_batches,
            stats.meshes,
            stats.pass_changes
        );
        stats
    }

    fn ensure_pass<D: GizmoDevice + ?Sized>(
        &mut self,
        state: &mut ReplayState,
        lit: bool,
        material: &GizmoMaterial,
        device: &mut D,
        stats: &mut ReplayStats,
    ) {
        let pass = GizmoPass::select(lit, state.color);
        if state.pass != Some(pass) {
            self.flush(device, stats);
            device.set_pass(material, pass, state.color);
            state.pass = Some(pass);
            stats.pass_changes += 1;
        }
    }

    fn flush<D: GizmoDevice + ?Sized>(&mut self, device: &mut D, stats: &mut ReplayStats) {
        if self.batch.is_empty() {
            return;
        }
        device.draw_lines(&self.batch);
        self.batch.clear();
        stats.line_batches += 1;
    }

    fn skip(stats: &mut ReplayStats, index: usize, operation: Operation) {
        log::error!("Gizmo operation #{index} ({operation:?}) has no payload; skipping");
        stats.skipped += 1;
    }
}

impl Default for Replayer {
    fn default() -> Self {
        Self::new()
    }
}

struct ReplayState {
    matrix: Mat4,
    color: Color,
    pass: Option<GizmoPass>,
    wireframe: bool,
}
