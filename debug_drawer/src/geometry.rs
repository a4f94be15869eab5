//! Shared procedural geometry.

use std::sync::Arc;

use gizmo_core::mesh::CpuMesh;
use gizmo_core::mesh::generators::{generate_cube, generate_wire_cube, generate_wire_sphere};

/// Shared, read-only handle to gizmo geometry.
///
/// Recorded draw operations clone the handle, never the mesh data.
pub type GizmoMesh = Arc<CpuMesh>;

/// The canonical gizmo meshes, generated once per activation.
///
/// Both streams of a [`GizmoManager`](crate::GizmoManager) and every
/// recorded mesh operation share one instance.
#[derive(Debug, Clone)]
pub struct GizmoGeometry {
    pub cube: GizmoMesh,
    pub wire_cube: GizmoMesh,
    pub wire_sphere: GizmoMesh,
    /// Externally supplied solid sphere; `draw_sphere` fails without it.
    pub sphere: Option<GizmoMesh>,
}

impl GizmoGeometry {
    /// Generate the procedural meshes.
    pub fn generate(circle_resolution: u32, sphere: Option<GizmoMesh>) -> Self {
        log::debug!(
            "Generating gizmo geometry (circle resolution {}, sphere mesh: {})",
            circle_resolution,
            sphere.is_some()
        );
        Self {
            cube: Arc::new(generate_cube()),
            wire_cube: Arc::new(generate_wire_cube()),
            wire_sphere: Arc::new(generate_wire_sphere(circle_resolution)),
            sphere,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_geometry() {
        let geometry = GizmoGeometry::generate(16, None);
        assert_eq!(geometry.cube.vertex_count(), 24);
        assert_eq!(geometry.wire_cube.vertex_count(), 8);
        assert_eq!(geometry.wire_sphere.vertex_count(), 48);
        assert!(geometry.sphere.is_none());
    }
}
