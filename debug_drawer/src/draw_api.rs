use gizmo_core::Color;
use gizmo_core::math::{
    Mat4, UnitQuat, Vec2, Vec3, any_perpendicular, mat4_from_translation, mat4_trs,
    transform_point,
};

use crate::error::{GizmoError, GizmoResult};
use crate::geometry::GizmoMesh;
use crate::stream::CommandStream;

/// Segments of the rings and end caps of a wire capsule.
const CAPSULE_SEGMENTS: u32 = 8;

/// Size of a position cross per unit of observer distance.
const POSITION_CROSS_SCALE: f32 = 0.06;

/// Alpha of the negative half-axes of a position cross.
const NEGATIVE_AXIS_ALPHA: f32 = 0.6;

/// Local axis of a capsule collider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn unit(self) -> Vec3 {
        match self {
            Self::X => Vec3::x(),
            Self::Y => Vec3::y(),
            Self::Z => Vec3::z(),
        }
    }
}

/// Collision shape in its local frame.
#[derive(Debug, Clone)]
pub enum Collider {
    Box { center: Vec3, size: Vec3 },
    Sphere { center: Vec3, radius: f32 },
    /// `height` is the full length including both hemispherical caps.
    Capsule { center: Vec3, axis: Axis, height: f32, radius: f32 },
    Mesh(GizmoMesh),
}

impl CommandStream {
    /// Draw a filled mesh placed by translation, rotation and scale.
    pub fn draw_mesh_trs(
        &mut self,
        mesh: &GizmoMesh,
        position: Vec3,
        rotation: UnitQuat,
        scale: Vec3,
    ) -> GizmoResult<()> {
        self.draw_mesh(mesh, mat4_trs(position, rotation, scale))
    }

    /// Draw a wireframe mesh placed by translation, rotation and scale.
    pub fn draw_wire_mesh_trs(
        &mut self,
        mesh: &GizmoMesh,
        position: Vec3,
        rotation: UnitQuat,
        scale: Vec3,
    ) -> GizmoResult<()> {
        self.draw_wire_mesh(mesh, mat4_trs(position, rotation, scale))
    }

    /// Draw a filled box centered at `position`.
    pub fn draw_cube(&mut self, position: Vec3, size: Vec3) {
        let cube = self.geometry().cube.clone();
        self.set_wireframe(false);
        self.push_mesh(&cube, mat4_trs(position, UnitQuat::identity(), size));
    }

    /// Draw the edges of a box centered at `position`.
    pub fn draw_wire_cube(&mut self, position: Vec3, size: Vec3) {
        let cube = self.geometry().wire_cube.clone();
        self.set_wireframe(true);
        self.push_mesh(&cube, mat4_trs(position, UnitQuat::identity(), size));
    }

    /// Draw a filled sphere with the sphere mesh supplied at activation.
    pub fn draw_sphere(&mut self, center: Vec3, radius: f32) -> GizmoResult<()> {
        let Some(sphere) = self.geometry().sphere.clone() else {
            log::error!("{}", GizmoError::NoSphereMesh);
            return Err(GizmoError::NoSphereMesh);
        };
        self.draw_mesh_trs(
            &sphere,
            center,
            UnitQuat::identity(),
            Vec3::repeat(radius * 2.0),
        )
    }

    /// Draw a wire sphere: its silhouette plus three camera-aware great circles.
    pub fn draw_wire_sphere(&mut self, center: Vec3, radius: f32) {
        self.draw_camera_facing_circle(center, radius);
        self.scoped_matrix(|s| {
            s.set_matrix(s.matrix() * mat4_from_translation(center));
            s.draw_camera_aware_wire_circle(radius, Vec3::y(), Vec3::x());
            s.draw_camera_aware_wire_circle(radius, Vec3::z(), Vec3::y());
            s.draw_camera_aware_wire_circle(radius, Vec3::x(), Vec3::z());
        });
    }

    /// Draw a full circle around `center` in the plane orthogonal to `normal`.
    pub fn draw_wire_circle(&mut self, center: Vec3, normal: Vec3, radius: f32) {
        let segments = self.circle_resolution();
        self.draw_wire_arc(center, normal, any_perpendicular(normal), radius, 1.0, segments);
    }

    /// Draw a circle around `center` that faces the observer.
    ///
    /// Faces +Z when there is no observer.
    pub fn draw_camera_facing_circle(&mut self, center: Vec3, radius: f32) {
        let normal = self
            .observer_direction(center)
            .and_then(|dir| dir.try_normalize(f32::EPSILON))
            .unwrap_or_else(Vec3::z);
        self.draw_wire_circle(center, normal, radius);
    }

    /// Draw a wire capsule whose cap centers are `start` and `end`.
    pub fn draw_wire_capsule(&mut self, start: Vec3, end: Vec3, radius: f32) {
        let dir = (end - start)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vec3::y);
        let forward_dir = any_perpendicular(dir);
        let up = dir * radius;
        let forward = forward_dir * radius;
        let right = dir.cross(&forward_dir) * radius;

        self.draw_wire_arc(start, up, forward, radius, 1.0, CAPSULE_SEGMENTS);
        self.draw_wire_arc(end, -up, forward, radius, 1.0, CAPSULE_SEGMENTS);

        self.draw_line(start + right, end + right);
        self.draw_line(start - right, end - right);
        self.draw_line(start + forward, end + forward);
        self.draw_line(start - forward, end - forward);

        self.draw_wire_arc(start, right, forward, radius, 0.5, CAPSULE_SEGMENTS);
        self.draw_wire_arc(start, forward, -right, radius, 0.5, CAPSULE_SEGMENTS);
        self.draw_wire_arc(end, right, -forward, radius, 0.5, CAPSULE_SEGMENTS);
        self.draw_wire_arc(end, forward, right, radius, 0.5, CAPSULE_SEGMENTS);
    }

    /// Draw an XYZ cross at `position`, scaled with the observer distance.
    pub fn draw_position_cross(&mut self, position: Vec3) {
        self.draw_position_cross_with(position, Color::WHITE, 0.0, None);
    }

    /// Draw an XYZ cross at `position`.
    ///
    /// Positive half-axes are red, green and blue; negative ones are
    /// translucent black. Every color is blended towards `tint` by `t` in
    /// HSV space. `override_scale` replaces the observer-relative size.
    /// The current color is restored afterwards.
    pub fn draw_position_cross_with(
        &mut self,
        position: Vec3,
        tint: Color,
        t: f32,
        override_scale: Option<f32>,
    ) {
        let scale = override_scale.unwrap_or_else(|| {
            let world = transform_point(&self.matrix(), position);
            match self.observer() {
                Some(observer) => {
                    POSITION_CROSS_SCALE * (world - observer.translation.vector).norm()
                }
                None => POSITION_CROSS_SCALE,
            }
        });
        let extent = scale / 2.0;
        let tinted = |color: Color| if t != 0.0 { color.lerp_hsv(tint, t) } else { color };

        let original = self.color();
        let negative = Color::BLACK.with_alpha(NEGATIVE_AXIS_ALPHA);
        for (axis, color) in [
            (Vec3::x(), Color::RED),
            (Vec3::y(), Color::GREEN),
            (Vec3::z(), Color::BLUE),
        ] {
            self.set_color(tinted(color));
            self.draw_line(position, position + axis * extent);
            self.set_color(tinted(negative));
            self.draw_line(position, position - axis * extent);
        }
        self.set_color(original);
    }

    /// Draw the outline of the rectangle `min..max` on the XY plane of `frame`.
    pub fn draw_rect(&mut self, frame: Mat4, min: Vec2, max: Vec2) {
        self.scoped_matrix(|s| {
            s.set_matrix(frame);
            let c00 = Vec3::new(min.x, min.y, 0.0);
            let c01 = Vec3::new(min.x, max.y, 0.0);
            let c11 = Vec3::new(max.x, max.y, 0.0);
            let c10 = Vec3::new(max.x, min.y, 0.0);
            s.draw_line(c00, c01);
            s.draw_line(c01, c11);
            s.draw_line(c11, c10);
            s.draw_line(c10, c00);
        });
    }

    /// Draw an axis-aligned bounding box from min to max corners (12 edges).
    pub fn draw_aabb(&mut self, min: Vec3, max: Vec3) {
        let c = [
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(max.x, max.y, max.z),
            Vec3::new(min.x, max.y, max.z),
        ];
        for i in 0..4 {
            // Bottom, top, vertical
            self.draw_line(c[i], c[(i + 1) % 4]);
            self.draw_line(c[i + 4], c[(i + 1) % 4 + 4]);
            self.draw_line(c[i], c[i + 4]);
        }
    }

    /// Draw a grid on the XZ plane.
    pub fn draw_grid(&mut self, center: Vec3, cell_size: f32, half_count: u32) {
        let extent = cell_size * half_count as f32;
        let n = half_count as i32;

        for i in -n..=n {
            let offset = i as f32 * cell_size;
            // Along Z
            self.draw_line(
                center + Vec3::new(offset, 0.0, -extent),
                center + Vec3::new(offset, 0.0, extent),
            );
            // Along X
            self.draw_line(
                center + Vec3::new(-extent, 0.0, offset),
                center + Vec3::new(extent, 0.0, offset),
            );
        }
    }

    /// Draw a collider in the frame given by `local_to_world`.
    pub fn draw_collider(
        &mut self,
        collider: &Collider,
        local_to_world: Mat4,
        wireframe: bool,
    ) -> GizmoResult<()> {
        self.scoped_matrix(|s| {
            s.relative_to(local_to_world);
            match collider {
                Collider::Box { center, size } => {
                    if wireframe {
                        s.draw_wire_cube(*center, *size);
                    } else {
                        s.draw_cube(*center, *size);
                    }
                    Ok(())
                }
                Collider::Sphere { center, radius } => {
                    if wireframe {
                        s.draw_wire_sphere(*center, *radius);
                        Ok(())
                    } else {
                        s.draw_sphere(*center, *radius)
                    }
                }
                Collider::Capsule {
                    center,
                    axis,
                    height,
                    radius,
                } => {
                    let dir = axis.unit();
                    if wireframe {
                        let offset = dir * (height / 2.0 - radius);
                        s.draw_wire_capsule(center + offset, center - offset, *radius);
                    } else {
                        let size = Vec3::repeat(radius * 2.0) + dir * (height - radius * 2.0);
                        s.draw_cube(*center, size);
                    }
                    Ok(())
                }
                Collider::Mesh(mesh) => {
                    if wireframe {
                        s.draw_wire_mesh(mesh, Mat4::identity())
                    } else {
                        s.draw_mesh(mesh, Mat4::identity())
                    }
                }
            }
        })
    }
}
