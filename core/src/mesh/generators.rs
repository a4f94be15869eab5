//! Mesh generators for the canonical gizmo shapes.
//!
//! All generators are pure: calling them twice yields identical meshes.
//! Unit shapes span `[-0.5, 0.5]` on every axis so a TRS scale equal to the
//! desired size (or twice the radius) places them directly.

use std::f32::consts::PI;

use super::data::{CpuMesh, PrimitiveTopology};
use crate::math::Vec3;

/// Default number of segments used for circles and wire spheres.
pub const CIRCLE_RESOLUTION: u32 = 32;

/// Generate a solid unit cube.
///
/// Six independent quads (24 vertices, no sharing between faces) so that
/// every face keeps a flat normal after [`CpuMesh::recalculate_normals`].
pub fn generate_cube() -> CpuMesh {
    let mut positions = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(24);

    let faces = [Vec3::z(), Vec3::x(), Vec3::y()];
    for i in 0..3 {
        let normal = faces[i];
        let axis1 = faces[(i + 1) % 3];
        let axis2 = faces[(i + 2) % 3];
        push_quad(&mut positions, &mut indices, normal, -axis1, axis2);
        push_quad(&mut positions, &mut indices, -normal, axis1, axis2);
    }

    let mut mesh = CpuMesh::new(PrimitiveTopology::QuadList)
        .with_positions(positions)
        .with_indices(indices)
        .with_label("gizmo_cube");
    mesh.recalculate_normals();
    mesh
}

/// Generate a wire unit cube: 8 corners, 12 edges as a line list.
///
/// Corners are enumerated `x`-major starting from `+0.5`, so corner `k` has
/// its x sign in bit 2, y in bit 1 and z in bit 0 (bit set = negative).
/// The corners `0, 3, 5, 6` each differ from every other one in that set by
/// two axes; emitting their three incident edges covers all twelve edges
/// exactly once.
pub fn generate_wire_cube() -> CpuMesh {
    let mut positions = Vec::with_capacity(8);
    for dx in [1.0f32, -1.0] {
        for dy in [1.0f32, -1.0] {
            for dz in [1.0f32, -1.0] {
                positions.push([0.5 * dx, 0.5 * dy, 0.5 * dz]);
            }
        }
    }

    let mut indices = Vec::with_capacity(24);
    for [corner, a, b, c] in [[0, 1, 2, 4], [3, 1, 2, 7], [5, 1, 4, 7], [6, 2, 4, 7]] {
        indices.extend_from_slice(&[corner, a, corner, b, corner, c]);
    }

    CpuMesh::new(PrimitiveTopology::LineList)
        .with_positions(positions)
        .with_indices(indices)
        .with_label("gizmo_wire_cube")
}

/// Generate a wire unit sphere made of three great circles.
///
/// Each step `i` places one vertex on each coordinate plane (XY, YZ, XZ),
/// interleaved, and links it to the vertex of the same plane in the next
/// step. `resolution` is the number of segments per circle.
pub fn generate_wire_sphere(resolution: u32) -> CpuMesh {
    let resolution = resolution.max(3);
    let total = resolution * 3;
    let mut positions = Vec::with_capacity(total as usize);
    let mut indices = Vec::with_capacity(total as usize * 2);

    for i in 0..resolution {
        let angle = 2.0 * PI * i as f32 / resolution as f32;
        let dx = 0.5 * angle.cos();
        let dy = 0.5 * angle.sin();

        for j in 0..3 {
            indices.push((i * 3 + j) % total);
            indices.push((i * 3 + j + 3) % total);
        }

        positions.push([dx, dy, 0.0]);
        positions.push([0.0, dx, dy]);
        positions.push([dx, 0.0, dy]);
    }

    CpuMesh::new(PrimitiveTopology::LineList)
        .with_positions(positions)
        .with_indices(indices)
        .with_label("gizmo_wire_sphere")
}

/// Generate a UV sphere mesh.
///
/// Creates a sphere with the given radius, number of longitudinal segments,
/// and number of latitudinal rings. Hosts that want a solid sphere gizmo
/// can pass this (with `radius = 0.5`) as the configured sphere mesh.
///
/// # Arguments
///
/// * `radius` - Sphere radius
/// * `segments` - Number of longitudinal segments (around the equator)
/// * `rings` - Number of latitudinal rings (from pole to pole)
pub fn generate_sphere(radius: f32, segments: u32, rings: u32) -> CpuMesh {
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    for ring in 0..=rings {
        let theta = ring as f32 * PI / rings as f32;
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for segment in 0..=segments {
            let phi = segment as f32 * 2.0 * PI / segments as f32;
            let sin_phi = phi.sin();
            let cos_phi = phi.cos();

            let x = sin_theta * cos_phi;
            let y = cos_theta;
            let z = sin_theta * sin_phi;

            positions.push([x * radius, y * radius, z * radius]);
            normals.push([x, y, z]);
        }
    }

    for ring in 0..rings {
        for segment in 0..segments {
            let current = ring * (segments + 1) + segment;
            let next = current + segments + 1;

            indices.push(current);
            indices.push(next);
            indices.push(current + 1);

            indices.push(current + 1);
            indices.push(next);
            indices.push(next + 1);
        }
    }

    CpuMesh::new(PrimitiveTopology::TriangleList)
        .with_positions(positions)
        .with_normals(normals)
        .with_indices(indices)
        .with_label("sphere")
}

fn push_quad(
    positions: &mut Vec<[f32; 3]>,
    indices: &mut Vec<u32>,
    normal: Vec3,
    axis1: Vec3,
    axis2: Vec3,
) {
    let base = positions.len() as u32;
    indices.extend_from_slice(&[base, base + 1, base + 2, base + 3]);

    for corner in [
        normal + axis1 + axis2,
        normal + axis1 - axis2,
        normal - axis1 - axis2,
        normal - axis1 + axis2,
    ] {
        let p = corner * 0.5;
        positions.push([p.x, p.y, p.z]);
    }
}
