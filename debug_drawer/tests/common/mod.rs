//! Common utilities for gizmo integration tests.

use gizmo_core::math::Mat4;
use gizmo_debug_drawer::{Color, GizmoDevice, GizmoMaterial, GizmoMesh, GizmoPass, WorldLine};

/// A device call, as seen by [`RecordingDevice`].
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    SetPass { pass: GizmoPass, color: Color },
    SetWireframe(bool),
    DrawLines(Vec<WorldLine>),
    DrawMesh { vertices: u32, transform: Mat4 },
}

/// Device that records every call in order.
#[derive(Debug, Default)]
pub struct RecordingDevice {
    pub calls: Vec<DeviceCall>,
    /// Material name seen by the last `set_pass`.
    pub material: Option<String>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// All drawn lines, flattened across batches.
    pub fn lines(&self) -> Vec<WorldLine> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DeviceCall::DrawLines(lines) => Some(lines.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// Colors passed to `set_pass`, in order.
    pub fn pass_colors(&self) -> Vec<Color> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DeviceCall::SetPass { color, .. } => Some(*color),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
        self.material = None;
    }
}

impl GizmoDevice for RecordingDevice {
    fn set_pass(&mut self, material: &GizmoMaterial, pass: GizmoPass, color: Color) {
        self.material = Some(material.name.clone());
        self.calls.push(DeviceCall::SetPass { pass, color });
    }

    fn set_wireframe(&mut self, enabled: bool) {
        self.calls.push(DeviceCall::SetWireframe(enabled));
    }

    fn draw_lines(&mut self, lines: &[WorldLine]) {
        self.calls.push(DeviceCall::DrawLines(lines.to_vec()));
    }

    fn draw_mesh(&mut self, mesh: &GizmoMesh, transform: &Mat4) {
        self.calls.push(DeviceCall::DrawMesh {
            vertices: mesh.vertex_count(),
            transform: *transform,
        });
    }
}

/// Install a test logger once.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
