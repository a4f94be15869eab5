use std::sync::Arc;

use gizmo_core::Color;
use gizmo_core::math::{Mat4, Pose, Vec3};
use gizmo_core::mesh::generators::CIRCLE_RESOLUTION;

use crate::error::{GizmoError, GizmoResult};
use crate::geometry::{GizmoGeometry, GizmoMesh};

/// One recorded operation.
///
/// Payloads live in per-kind side arrays of the [`CommandStream`] and are
/// consumed in FIFO order during replay:
///
/// | Operation         | Payload array            |
/// |-------------------|--------------------------|
/// | `SetMatrix`       | [`CommandStream::matrices`] |
/// | `SetColor`        | [`CommandStream::colors`]   |
/// | `DrawLine`        | [`CommandStream::lines`]    |
/// | `DrawMesh`        | [`CommandStream::meshes`]   |
/// | `ToggleWireframe` | none                     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    SetMatrix,
    SetColor,
    ToggleWireframe,
    DrawLine,
    DrawMesh,
}

/// A line segment in the local space of the matrix active when it was drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub a: Vec3,
    pub b: Vec3,
}

/// A mesh draw: shared mesh handle plus the transform passed by the caller.
///
/// The transform is stored verbatim; replay composes it with the matrix
/// active at that point of the stream.
#[derive(Debug, Clone)]
pub struct MeshDraw {
    pub mesh: GizmoMesh,
    pub transform: Mat4,
}

/// Append-only recording of gizmo draw operations for one frame.
///
/// State setters coalesce: setting the color or matrix to the value that
/// is already current appends nothing, and a wireframe toggle is only
/// recorded on an actual mode change.
///
/// Obtain the writable stream from
/// [`GizmoManager::back_stream`](crate::GizmoManager::back_stream); never
/// keep it past the current recording phase.
pub struct CommandStream {
    operations: Vec<Operation>,
    matrices: Vec<Mat4>,
    colors: Vec<Color>,
    lines: Vec<Line>,
    meshes: Vec<MeshDraw>,

    current_color: Color,
    current_matrix: Mat4,
    matrix_stack: Vec<Mat4>,
    wireframe: bool,

    /// Operation count captured by `begin_guard`.
    guard: Option<usize>,
    observer: Option<Pose>,
    geometry: Arc<GizmoGeometry>,
    circle_resolution: u32,
    warn_on_unbalanced_stack: bool,
}

impl CommandStream {
    /// Create a standalone stream with its own procedural geometry.
    pub fn new() -> Self {
        Self::with_geometry(Arc::new(GizmoGeometry::generate(CIRCLE_RESOLUTION, None)))
    }

    /// Create a stream sharing an existing geometry cache.
    pub fn with_geometry(geometry: Arc<GizmoGeometry>) -> Self {
        Self {
            operations: Vec::new(),
            matrices: Vec::new(),
            colors: Vec::new(),
            lines: Vec::new(),
            meshes: Vec::new(),
            current_color: Color::WHITE,
            current_matrix: Mat4::identity(),
            matrix_stack: Vec::new(),
            wireframe: false,
            guard: None,
            observer: None,
            geometry,
            circle_resolution: CIRCLE_RESOLUTION,
            warn_on_unbalanced_stack: true,
        }
    }

    /// Set the default segment count for circles drawn through this stream.
    pub fn with_circle_resolution(mut self, segments: u32) -> Self {
        self.circle_resolution = segments.max(3);
        self
    }

    // ---- State -----------------------------------------------------------

    /// Color for the gizmos drawn next.
    pub fn color(&self) -> Color {
        self.current_color
    }

    /// Matrix applied to the gizmos drawn next.
    pub fn matrix(&self) -> Mat4 {
        self.current_matrix
    }

    pub fn is_wireframe(&self) -> bool {
        self.wireframe
    }

    /// Set the current color, recording a `SetColor` only on change.
    pub fn set_color(&mut self, color: Color) {
        if self.current_color == color {
            return;
        }
        self.current_color = color;
        self.operations.push(Operation::SetColor);
        self.colors.push(color);
    }

    /// Set the current matrix, recording a `SetMatrix` only on change.
    pub fn set_matrix(&mut self, matrix: Mat4) {
        if self.current_matrix == matrix {
            return;
        }
        self.current_matrix = matrix;
        self.operations.push(Operation::SetMatrix);
        self.matrices.push(matrix);
    }

    /// Draw everything that follows in the local space of `frame`
    /// (a local-to-world matrix).
    pub fn relative_to(&mut self, frame: Mat4) {
        self.set_matrix(frame);
    }

    /// Save the current matrix on the matrix stack.
    pub fn push_matrix(&mut self) {
        self.matrix_stack.push(self.current_matrix);
    }

    /// Restore the matrix saved by the matching [`push_matrix`](Self::push_matrix).
    ///
    /// An unbalanced pop is reported and leaves the state unchanged.
    pub fn pop_matrix(&mut self) -> GizmoResult<()> {
        match self.matrix_stack.pop() {
            Some(matrix) => {
                self.set_matrix(matrix);
                Ok(())
            }
            None => {
                log::error!("{}", GizmoError::MatrixStackUnderflow);
                Err(GizmoError::MatrixStackUnderflow)
            }
        }
    }

    pub fn matrix_stack_depth(&self) -> usize {
        self.matrix_stack.len()
    }

    /// Run `f` between a push and its matching pop.
    ///
    /// `f` gets a matrix stack of its own: its pushes are discarded on
    /// return and popping past its start is reported as an underflow
    /// without touching the caller's entries. The current matrix is
    /// restored afterwards.
    pub fn scoped_matrix<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = self.current_matrix;
        let outer = std::mem::take(&mut self.matrix_stack);
        let result = f(self);
        self.matrix_stack = outer;
        self.set_matrix(saved);
        result
    }

    /// Reset to the identity matrix and opaque white.
    ///
    /// Goes through the coalescing setters, so the stream records whatever
    /// state changes are needed for replay to see the reset too.
    pub fn reset_state(&mut self) {
        self.set_matrix(Mat4::identity());
        self.set_color(Color::WHITE);
    }

    // ---- Primitives --------------------------------------------------------

    /// Draw a line between two points in the current matrix space.
    pub fn draw_line(&mut self, a: Vec3, b: Vec3) {
        self.operations.push(Operation::DrawLine);
        self.lines.push(Line { a, b });
    }

    /// Draw a filled mesh with `transform`, under the current matrix.
    pub fn draw_mesh(&mut self, mesh: &GizmoMesh, transform: Mat4) -> GizmoResult<()> {
        Self::check_mesh(mesh)?;
        self.set_wireframe(false);
        self.push_mesh(mesh, transform);
        Ok(())
    }

    /// Draw a mesh in wireframe with `transform`, under the current matrix.
    pub fn draw_wire_mesh(&mut self, mesh: &GizmoMesh, transform: Mat4) -> GizmoResult<()> {
        Self::check_mesh(mesh)?;
        self.set_wireframe(true);
        self.push_mesh(mesh, transform);
        Ok(())
    }

    fn check_mesh(mesh: &GizmoMesh) -> GizmoResult<()> {
        if mesh.is_empty() {
            let err = GizmoError::EmptyMesh {
                label: mesh.label().map(str::to_owned),
            };
            log::error!("{err}");
            return Err(err);
        }
        Ok(())
    }

    pub(crate) fn push_mesh(&mut self, mesh: &GizmoMesh, transform: Mat4) {
        self.operations.push(Operation::DrawMesh);
        self.meshes.push(MeshDraw {
            mesh: Arc::clone(mesh),
            transform,
        });
    }

    pub(crate) fn set_wireframe(&mut self, wireframe: bool) {
        if self.wireframe != wireframe {
            self.operations.push(Operation::ToggleWireframe);
            self.wireframe = wireframe;
        }
    }

    // ---- Frame lifecycle ---------------------------------------------------

    /// Empty the stream for the next round of recording.
    ///
    /// Keeps the allocations of every array.
    pub fn clear(&mut self) {
        if self.warn_on_unbalanced_stack && !self.matrix_stack.is_empty() {
            log::warn!(
                "Gizmo stream cleared with {} unpopped matrix push(es)",
                self.matrix_stack.len()
            );
        }
        self.operations.clear();
        self.matrices.clear();
        self.colors.clear();
        self.lines.clear();
        self.meshes.clear();
        self.matrix_stack.clear();
        self.wireframe = false;
        self.current_matrix = Mat4::identity();
        self.current_color = Color::WHITE;
    }

    /// Start a guard interval: nothing may be drawn until [`end_guard`](Self::end_guard).
    pub fn begin_guard(&mut self) {
        self.guard = Some(self.operations.len());
    }

    /// End the guard interval.
    ///
    /// Reports a [`GizmoError::GuardViolation`] (and logs it) if operations
    /// were appended since [`begin_guard`](Self::begin_guard). Ending a
    /// stream that is not guarded is a no-op.
    pub fn end_guard(&mut self) -> GizmoResult<()> {
        let Some(snapshot) = self.guard.take() else {
            return Ok(());
        };
        let appended = self.operations.len().saturating_sub(snapshot);
        if appended > 0 {
            let err = GizmoError::GuardViolation { appended };
            log::error!("{err}");
            return Err(err);
        }
        Ok(())
    }

    pub fn is_guarded(&self) -> bool {
        self.guard.is_some()
    }

    // ---- Context -----------------------------------------------------------

    /// World pose of the observer used by camera-aware helpers.
    pub fn observer(&self) -> Option<&Pose> {
        self.observer.as_ref()
    }

    pub fn set_observer(&mut self, observer: Option<Pose>) {
        self.observer = observer;
    }

    pub fn geometry(&self) -> &Arc<GizmoGeometry> {
        &self.geometry
    }

    pub fn circle_resolution(&self) -> u32 {
        self.circle_resolution
    }

    pub(crate) fn set_circle_resolution(&mut self, segments: u32) {
        self.circle_resolution = segments.max(3);
    }

    /// Whether [`clear`](Self::clear) warns about unpopped matrix pushes.
    pub(crate) fn set_warn_on_unbalanced_stack(&mut self, warn: bool) {
        self.warn_on_unbalanced_stack = warn;
    }

    // ---- Recorded data -----------------------------------------------------

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn matrices(&self) -> &[Mat4] {
        &self.matrices
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn meshes(&self) -> &[MeshDraw] {
        &self.meshes
    }
}

impl Default for CommandStream {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CommandStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandStream")
            .field("operations", &self.operations.len())
            .field("matrices", &self.matrices.len())
            .field("colors", &self.colors.len())
            .field("lines", &self.lines.len())
            .field("meshes", &self.meshes.len())
            .field("wireframe", &self.wireframe)
            .field("guarded", &self.guard.is_some())
            .finish()
    }
}
