//! # Gizmo Core
//!
//! Math, color and CPU mesh primitives shared by the runtime gizmo crates.

pub mod color;
pub mod math;
pub mod mesh;

pub use color::Color;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
