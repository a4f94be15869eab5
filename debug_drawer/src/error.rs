//! Gizmo error types.

use std::fmt;

/// Errors reported by the gizmo recorder, replayer and coordinator.
///
/// Every variant describes a recoverable condition: the offending call
/// fails, but the stream and the coordinator stay usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GizmoError {
    /// A mesh draw call received a mesh without vertices.
    EmptyMesh { label: Option<String> },
    /// `draw_sphere` was called but no solid sphere mesh was configured.
    NoSphereMesh,
    /// `pop_matrix` was called with an empty matrix stack.
    MatrixStackUnderflow,
    /// Operations were appended to a stream while it was guarded for replay.
    GuardViolation { appended: usize },
    /// A material does not expose the four gizmo passes.
    InvalidMaterial { name: String, passes: usize },
    /// The coordinator is not active.
    Inactive,
    /// Settings could not be read or parsed.
    Settings(String),
    /// A registered producer failed while recording.
    Producer { name: String, message: String },
}

impl fmt::Display for GizmoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMesh { label: Some(label) } => {
                write!(f, "mesh \"{label}\" has no vertices")
            }
            Self::EmptyMesh { label: None } => write!(f, "mesh cannot be empty"),
            Self::NoSphereMesh => write!(
                f,
                "cannot draw a sphere: no sphere mesh was configured at activation"
            ),
            Self::MatrixStackUnderflow => write!(f, "pop_matrix called on an empty matrix stack"),
            Self::GuardViolation { appended } => write!(
                f,
                "{appended} operation(s) were drawn to the stream being replayed; \
                 never keep a stream past its recording phase"
            ),
            Self::InvalidMaterial { name, passes } => write!(
                f,
                "material \"{name}\" has {passes} pass(es) and cannot be used for gizmos (needs 4)"
            ),
            Self::Inactive => write!(f, "gizmo manager is not active"),
            Self::Settings(msg) => write!(f, "invalid gizmo settings: {msg}"),
            Self::Producer { name, message } => write!(f, "gizmo producer {name} failed: {message}"),
        }
    }
}

impl std::error::Error for GizmoError {}

/// Result alias for gizmo operations.
pub type GizmoResult<T> = Result<T, GizmoError>;
