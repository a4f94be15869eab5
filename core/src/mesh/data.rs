//! CPU-side mesh data structures.
//!
//! This module provides:
//! - [`PrimitiveTopology`] - How vertices are assembled into primitives
//! - [`IndexFormat`] - Index data format (u16 or u32)
//! - [`CpuMesh`] - CPU-side mesh holding positions, normals and indices

use crate::math::Vec3;

/// Primitive topology describing how vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    /// Each vertex is a separate point.
    PointList,
    /// Every two vertices form a line.
    LineList,
    /// Vertices form a connected strip of lines.
    LineStrip,
    /// Every three vertices form a triangle.
    #[default]
    TriangleList,
    /// Vertices form a connected strip of triangles.
    TriangleStrip,
    /// Every four vertices form a planar quad (wound consistently).
    QuadList,
}

impl PrimitiveTopology {
    /// Get the number of vertices per primitive (for non-strip topologies).
    pub fn vertices_per_primitive(&self) -> Option<u32> {
        match self {
            Self::PointList => Some(1),
            Self::LineList => Some(2),
            Self::TriangleList => Some(3),
            Self::QuadList => Some(4),
            Self::LineStrip | Self::TriangleStrip => None, // Variable
        }
    }
}

/// Index format for indexed drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexFormat {
    /// 16-bit unsigned integers (max 65535 vertices).
    #[default]
    Uint16,
    /// 32-bit unsigned integers (max ~4 billion vertices).
    Uint32,
}

impl IndexFormat {
    /// Get the size in bytes of each index.
    pub fn size(&self) -> usize {
        match self {
            Self::Uint16 => 2,
            Self::Uint32 => 4,
        }
    }
}

/// A CPU-side mesh: positions, optional normals and an index list.
///
/// This is the geometry a gizmo draw call refers to. The gizmo recorder
/// never copies it; draw operations hold a shared handle and the host
/// uploads the bytes from [`vertex_bytes`](Self::vertex_bytes) and
/// [`index_bytes`](Self::index_bytes) once.
#[derive(Clone, Default)]
pub struct CpuMesh {
    topology: PrimitiveTopology,
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    indices: Vec<u32>,
    label: Option<String>,
}

impl CpuMesh {
    /// Create a new empty mesh with the given topology.
    pub fn new(topology: PrimitiveTopology) -> Self {
        Self {
            topology,
            ..Self::default()
        }
    }

    /// Set vertex positions.
    pub fn with_positions(mut self, positions: Vec<[f32; 3]>) -> Self {
        self.positions = positions;
        self
    }

    /// Set per-vertex normals. Must match the position count to be used.
    pub fn with_normals(mut self, normals: Vec<[f32; 3]>) -> Self {
        self.normals = normals;
        self
    }

    /// Set the index list.
    pub fn with_indices(mut self, indices: Vec<u32>) -> Self {
        self.indices = indices;
        self
    }

    /// Set a debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the primitive topology.
    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn normals(&self) -> &[[f32; 3]] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Get the number of vertices.
    pub fn vertex_count(&self) -> u32 {
        self.positions.len() as u32
    }

    /// Get the number of indices.
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Check if this mesh uses indexed drawing.
    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }

    /// A mesh with no vertices cannot be drawn.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Get the debug label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Smallest index format able to address every vertex.
    pub fn index_format(&self) -> IndexFormat {
        if self.positions.len() <= u16::MAX as usize + 1 {
            IndexFormat::Uint16
        } else {
            IndexFormat::Uint32
        }
    }

    /// Raw position bytes, tightly packed `[f32; 3]`.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Raw index bytes in [`index_format`](Self::index_format).
    pub fn index_bytes(&self) -> Vec<u8> {
        match self.index_format() {
            IndexFormat::Uint16 => {
                let narrow: Vec<u16> = self.indices.iter().map(|&i| i as u16).collect();
                bytemuck::cast_slice(&narrow).to_vec()
            }
            IndexFormat::Uint32 => bytemuck::cast_slice(&self.indices).to_vec(),
        }
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.positions.first()?;
        let bounds = self.positions.iter().fold((first, first), |(mut lo, mut hi), p| {
            for axis in 0..3 {
                lo[axis] = lo[axis].min(p[axis]);
                hi[axis] = hi[axis].max(p[axis]);
            }
            (lo, hi)
        });
        Some(bounds)
    }

    /// Recompute flat normals for triangle or quad lists.
    ///
    /// Each vertex receives the normal of the face it belongs to; shared
    /// vertices accumulate and are renormalized. Other topologies are left
    /// untouched.
    pub fn recalculate_normals(&mut self) {
        let stride = match self.topology {
            PrimitiveTopology::TriangleList => 3,
            PrimitiveTopology::QuadList => 4,
            _ => return,
        };

        let mut accum = vec![Vec3::zeros(); self.positions.len()];
        let position = |i: u32| Vec3::from(self.positions[i as usize]);

        for face in self.indices.chunks_exact(stride) {
            if face.iter().any(|&i| i as usize >= self.positions.len()) {
                log::warn!(
                    "Mesh {:?}: face references missing vertex, skipping",
                    self.label
                );
                continue;
            }
            let a = position(face[0]);
            let b = position(face[1]);
            let c = position(face[2]);
            let normal = (b - a).cross(&(c - a));
            for &i in face {
                accum[i as usize] += normal;
            }
        }

        self.normals = accum
            .into_iter()
            .map(|n| {
                let n = n.try_normalize(1e-12).unwrap_or_else(Vec3::zeros);
                [n.x, n.y, n.z]
            })
            .collect();
    }
}

impl std::fmt::Debug for CpuMesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuMesh")
            .field("label", &self.label)
            .field("topology", &self.topology)
            .field("vertex_count", &self.positions.len())
            .field("index_count", &self.indices.len())
            .field("has_normals", &!self.normals.is_empty())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_topology_vertices() {
        assert_eq!(
            PrimitiveTopology::PointList.vertices_per_primitive(),
            Some(1)
        );
        assert_eq!(
            PrimitiveTopology::LineList.vertices_per_primitive(),
            Some(2)
        );
        assert_eq!(
            PrimitiveTopology::QuadList.vertices_per_primitive(),
            Some(4)
        );
        assert_eq!(
            PrimitiveTopology::TriangleStrip.vertices_per_primitive(),
            None
        );
    }

    #[test]
    fn test_index_format_size() {
        assert_eq!(IndexFormat::Uint16.size(), 2);
        assert_eq!(IndexFormat::Uint32.size(), 4);
    }

    #[test]
    fn test_cpu_mesh_basic() {
        let mesh = CpuMesh::new(PrimitiveTopology::TriangleList)
            .with_positions(vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
            .with_label("test");

        assert_eq!(mesh.vertex_count(), 3);
        assert!(!mesh.is_indexed());
        assert!(!mesh.is_empty());
        assert_eq!(mesh.vertex_bytes().len(), 36);
        assert_eq!(mesh.label(), Some("test"));
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = CpuMesh::new(PrimitiveTopology::LineList);
        assert!(mesh.is_empty());
        assert!(mesh.bounds().is_none());
    }

    #[test]
    fn test_index_bytes_narrow() {
        let mesh = CpuMesh::new(PrimitiveTopology::TriangleList)
            .with_positions(vec![[0.0; 3]; 4])
            .with_indices(vec![0, 1, 2, 2, 3, 0]);

        assert_eq!(mesh.index_format(), IndexFormat::Uint16);
        assert_eq!(mesh.index_bytes().len(), 6 * 2);
    }

    #[test]
    fn test_bounds() {
        let mesh = CpuMesh::new(PrimitiveTopology::PointList).with_positions(vec![
            [-1.0, 0.0, 2.0],
            [3.0, -4.0, 0.5],
            [0.0, 1.0, -2.0],
        ]);
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, [-1.0, -4.0, -2.0]);
        assert_eq!(max, [3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_recalculate_normals_triangle() {
        let mut mesh = CpuMesh::new(PrimitiveTopology::TriangleList)
            .with_positions(vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
            .with_indices(vec![0, 1, 2]);
        mesh.recalculate_normals();
        for n in mesh.normals() {
            assert_eq!(*n, [0.0, 0.0, 1.0]);
        }
    }
}
