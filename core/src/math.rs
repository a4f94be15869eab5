//! Math type aliases and helper functions.
//!
//! All gizmo math is `f32`. Matrices are column-vector convention
//! (`m * v`), so `a * b` applies `b` first.

pub use nalgebra;

/// 2D vector (f32).
pub type Vec2 = nalgebra::Vector2<f32>;

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

/// 3D point (f32).
pub type Point3 = nalgebra::Point3<f32>;

/// 4x4 matrix (f32).
pub type Mat4 = nalgebra::Matrix4<f32>;

/// Quaternion (f32). Stored as `[x, y, z, w]` in memory.
pub type Quat = nalgebra::Quaternion<f32>;

/// Unit quaternion (f32), a pure rotation.
pub type UnitQuat = nalgebra::UnitQuaternion<f32>;

/// Rigid pose (rotation + translation), used for observer/camera placement.
pub type Pose = nalgebra::Isometry3<f32>;

const EPSILON: f32 = 1e-6;

/// Build a 4x4 TRS matrix from scale, rotation (quaternion), and translation.
pub fn mat4_from_scale_rotation_translation(
    scale: Vec3,
    rotation: Quat,
    translation: Vec3,
) -> Mat4 {
    let r = nalgebra::UnitQuaternion::new_unchecked(rotation);
    let m = r.to_rotation_matrix();
    let rm = m.matrix();
    #[rustfmt::skip]
    let result = Mat4::new(
        rm[(0, 0)] * scale.x, rm[(0, 1)] * scale.y, rm[(0, 2)] * scale.z, translation.x,
        rm[(1, 0)] * scale.x, rm[(1, 1)] * scale.y, rm[(1, 2)] * scale.z, translation.y,
        rm[(2, 0)] * scale.x, rm[(2, 1)] * scale.y, rm[(2, 2)] * scale.z, translation.z,
        0.0,                  0.0,                  0.0,                  1.0,
    );
    result
}

/// Build a TRS matrix from a translation, a unit rotation and a scale.
pub fn mat4_trs(translation: Vec3, rotation: UnitQuat, scale: Vec3) -> Mat4 {
    mat4_from_scale_rotation_translation(scale, rotation.into_inner(), translation)
}

/// Build a translation-only 4x4 matrix.
pub fn mat4_from_translation(t: Vec3) -> Mat4 {
    Mat4::new_translation(&t)
}

/// Build a non-uniform scale 4x4 matrix.
pub fn mat4_from_scale(s: Vec3) -> Mat4 {
    Mat4::new_nonuniform_scaling(&s)
}

/// Rotation of `radians` around `axis`. A zero axis yields the identity.
pub fn quat_from_axis_angle(axis: Vec3, radians: f32) -> UnitQuat {
    match nalgebra::Unit::try_new(axis, EPSILON) {
        Some(axis) => UnitQuat::from_axis_angle(&axis, radians),
        None => UnitQuat::identity(),
    }
}

/// Transform a point by an affine matrix.
pub fn transform_point(m: &Mat4, p: Vec3) -> Vec3 {
    m.transform_point(&Point3::from(p)).coords
}

/// Transform a direction by an affine matrix (translation ignored).
pub fn transform_vector(m: &Mat4, v: Vec3) -> Vec3 {
    m.transform_vector(&v)
}

/// A deterministic unit vector orthogonal to `v`.
///
/// Picks the world axis least aligned with `v` and crosses against it.
/// Returns +X for a zero vector.
pub fn any_perpendicular(v: Vec3) -> Vec3 {
    if v.norm_squared() < EPSILON {
        return Vec3::x();
    }
    let a = v.abs();
    let other = if a.x <= a.y && a.x <= a.z {
        Vec3::x()
    } else if a.y <= a.z {
        Vec3::y()
    } else {
        Vec3::z()
    };
    v.cross(&other).normalize()
}

/// Position of `pose` expressed in the local frame of `frame`.
///
/// Returns `None` if `frame` cannot be inverted (e.g. a zero scale axis).
pub fn pose_position_in_frame(frame: &Mat4, pose: &Pose) -> Option<Vec3> {
    let inverse = frame.try_inverse()?;
    Some(transform_point(&inverse, pose.translation.vector))
}
