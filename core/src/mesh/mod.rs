//! CPU-side mesh types and generators.
//!
//! - [`CpuMesh`] - positions, normals, indices and topology
//! - Generators for the canonical gizmo shapes (cube, wire cube, wire sphere)
//!   and a UV sphere

mod data;
pub mod generators;

pub use data::{CpuMesh, IndexFormat, PrimitiveTopology};
