//! Runtime gizmo drawing.
//!
//! Records debug shapes (lines, meshes, arcs, camera-aware circles) into a
//! command stream during simulation and replays them onto a host display
//! device during presentation, double-buffered with one frame of latency.
//!
//! # Architecture
//!
//! - [`CommandStream`] - Append-only recording with coalesced state changes
//! - [`GizmoManager`] - Owns the front/back streams, producers and geometry
//! - [`Replayer`] - Walks a stream and drives a [`GizmoDevice`]
//! - [`SharedGizmoManager`] - Lock-per-phase wrapper for split host callbacks
//!
//! # Usage
//!
//! ```ignore
//! // Setup (once)
//! let mut gizmos = GizmoManager::new(GizmoSettings::load_or_default(path));
//! gizmos.activate();
//!
//! // Recording phase (camera-aware helpers read the observer here):
//! gizmos.set_observer(camera_pose);
//! if let Some(stream) = gizmos.back_stream() {
//!     stream.set_color(Color::GREEN);
//!     stream.draw_wire_sphere(Vec3::zeros(), 0.5);
//!     stream.draw_position_cross(Vec3::new(1.0, 0.0, 0.0));
//! }
//!
//! // Presentation phase:
//! gizmos.present(&mut device)?;
//! ```

mod arc;
mod draw_api;
mod drawer;
mod error;
mod geometry;
mod material;
mod replay;
mod settings;
mod shared;
mod stream;

pub use arc::{
    ArcSegment, ArcSegments, BACK_ALPHA_RATIO, Facing, arc_segment_alphas, segment_alpha,
};
pub use draw_api::{Axis, Collider};
pub use drawer::{GizmoManager, GizmoProducer, ManagerState, ProducerId};
pub use error::{GizmoError, GizmoResult};
pub use geometry::{GizmoGeometry, GizmoMesh};
pub use material::{DEFAULT_MATERIAL_NAME, GIZMO_PASS_COUNT, GizmoMaterial, GizmoPass};
pub use replay::{GizmoDevice, ReplayStats, Replayer, WorldLine};
pub use settings::GizmoSettings;
pub use shared::SharedGizmoManager;
pub use stream::{CommandStream, Line, MeshDraw, Operation};

pub use gizmo_core::Color;
