//! Arc drawing and camera-aware fading.
//!
//! A camera-aware circle draws the half nearer to the observer at full
//! alpha and the far half at [`BACK_ALPHA_RATIO`] of it, which gives wire
//! spheres a depth cue without a depth buffer. The segment that crosses
//! from one half to the other gets the average of both.

use std::f32::consts::TAU;

use gizmo_core::math::{Vec3, pose_position_in_frame, quat_from_axis_angle};

use crate::stream::CommandStream;

/// Alpha multiplier applied to segments on the far side of a circle.
pub const BACK_ALPHA_RATIO: f32 = 0.1;

const EPSILON: f32 = 1e-6;

/// One segment of an arc, relative to the arc center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSegment {
    pub start: Vec3,
    pub end: Vec3,
}

/// Iterator over the segments of an arc.
///
/// Starts at `radial_start_dir * radius` and rotates by `360° / segments`
/// around `normal` per step, stopping after `segments * fraction` steps
/// (truncated). `fraction` is clamped to one full turn.
#[derive(Debug, Clone)]
pub struct ArcSegments {
    step: gizmo_core::math::UnitQuat,
    current: Vec3,
    remaining: u32,
}

impl ArcSegments {
    pub fn new(normal: Vec3, radial_start_dir: Vec3, radius: f32, fraction: f32, segments: u32) -> Self {
        let segments = segments.max(1);
        let start = radial_start_dir
            .try_normalize(EPSILON)
            .map(|d| d * radius)
            .unwrap_or_else(Vec3::zeros);
        let remaining = if start == Vec3::zeros() || normal.norm_squared() < EPSILON {
            0
        } else {
            (segments as f32 * fraction.clamp(0.0, 1.0)) as u32
        };
        Self {
            step: quat_from_axis_angle(normal, TAU / segments as f32),
            current: start,
            remaining,
        }
    }
}

impl Iterator for ArcSegments {
    type Item = ArcSegment;

    fn next(&mut self) -> Option<ArcSegment> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let start = self.current;
        let end = self.step * start;
        self.current = end;
        Some(ArcSegment { start, end })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining as usize, Some(self.remaining as usize))
    }
}

impl ExactSizeIterator for ArcSegments {}

/// Which side of a circle points face, as seen from an observer.
#[derive(Debug, Clone, Copy)]
pub struct Facing {
    normal: Vec3,
    /// Observer direction projected into the circle plane; `None` when the
    /// observer sits on the circle axis.
    in_plane: Option<Vec3>,
    /// Whole-circle answer used when `in_plane` is `None`.
    on_axis_front: bool,
}

impl Facing {
    /// `view_dir` points from the circle center towards the observer.
    pub fn new(normal: Vec3, view_dir: Vec3) -> Self {
        let normal = normal.try_normalize(EPSILON).unwrap_or_else(Vec3::z);
        let along = view_dir.dot(&normal);
        let projected = view_dir - normal * along;
        let threshold = EPSILON * view_dir.norm_squared().max(EPSILON);
        let in_plane = (projected.norm_squared() > threshold).then_some(projected);
        Self {
            normal,
            in_plane,
            on_axis_front: along >= 0.0,
        }
    }

    /// `true` if the circle point at `radius_vector` faces the observer.
    pub fn is_front(&self, radius_vector: Vec3) -> bool {
        match self.in_plane {
            Some(dir) => radius_vector.dot(&dir) > 0.0,
            None => self.on_axis_front,
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

/// Alpha for one segment: front, back, or their average at the crossing.
pub fn segment_alpha(facing: &Facing, segment: &ArcSegment, front_alpha: f32) -> f32 {
    let back_alpha = front_alpha * BACK_ALPHA_RATIO;
    match (facing.is_front(segment.start), facing.is_front(segment.end)) {
        (true, true) => front_alpha,
        (false, false) => back_alpha,
        _ => (front_alpha + back_alpha) / 2.0,
    }
}

/// Per-segment alphas of a camera-aware arc, in drawing order.
pub fn arc_segment_alphas(
    normal: Vec3,
    radial_start_dir: Vec3,
    view_dir: Vec3,
    fraction: f32,
    segments: u32,
    front_alpha: f32,
) -> impl Iterator<Item = f32> {
    let facing = Facing::new(normal, view_dir);
    ArcSegments::new(normal, radial_start_dir, 1.0, fraction, segments)
        .map(move |segment| segment_alpha(&facing, &segment, front_alpha))
}

impl CommandStream {
    /// Draw `fraction` of a circle as line segments.
    ///
    /// `segments` is the number of segments a full circle would have.
    pub fn draw_wire_arc(
        &mut self,
        center: Vec3,
        normal: Vec3,
        radial_start_dir: Vec3,
        radius: f32,
        fraction: f32,
        segments: u32,
    ) {
        for segment in ArcSegments::new(normal, radial_start_dir, radius, fraction, segments) {
            self.draw_line(center + segment.start, center + segment.end);
        }
    }

    /// Direction from `center` to the observer, in the current matrix space.
    ///
    /// `None` without an observer or if the current matrix is singular.
    pub fn observer_direction(&self, center: Vec3) -> Option<Vec3> {
        let observer = self.observer()?;
        let local = pose_position_in_frame(&self.matrix(), observer)?;
        Some(local - center)
    }

    /// Draw a full circle around the local origin that fades on its far side.
    pub fn draw_camera_aware_wire_circle(&mut self, radius: f32, normal: Vec3, radial_start_dir: Vec3) {
        let segments = self.circle_resolution();
        self.draw_camera_aware_wire_arc(Vec3::zeros(), normal, radial_start_dir, radius, 1.0, segments);
    }

    /// Camera-aware variant of [`draw_wire_arc`](Self::draw_wire_arc).
    ///
    /// The observer direction is derived from the current matrix on every
    /// call. Without an observer every segment is drawn at the current
    /// alpha. The current color is restored afterwards.
    pub fn draw_camera_aware_wire_arc(
        &mut self,
        center: Vec3,
        normal: Vec3,
        radial_start_dir: Vec3,
        radius: f32,
        fraction: f32,
        segments: u32,
    ) {
        let original = self.color();
        let Some(view_dir) = self.observer_direction(center) else {
            self.draw_wire_arc(center, normal, radial_start_dir, radius, fraction, segments);
            return;
        };

        let facing = Facing::new(normal, view_dir);
        for segment in ArcSegments::new(normal, radial_start_dir, radius, fraction, segments) {
            let alpha = segment_alpha(&facing, &segment, original.a);
            self.set_color(original.with_alpha(alpha));
            self.draw_line(center + segment.start, center + segment.end);
        }
        self.set_color(original);
    }
}
