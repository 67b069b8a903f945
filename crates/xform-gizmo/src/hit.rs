//! Gizmo hit geometry
//!
//! Each transform mode has a fixed catalog of pick regions expressed in
//! gizmo-local units and multiplied by the camera-derived gizmo scale. A
//! screen point is turned into a camera ray, moved into gizmo-local space and
//! tested against the catalog.

use glam::{Quat, Vec2, Vec3};
use xform_core::{Axis, BoundingBox, GizmoHandle, RectHandle, Side, TransformSettings};

use crate::camera::{Camera, Ray};
use crate::collision::{ray_aabb_intersection, ray_ring_intersection};

/// Half-size of the center free-drag box
pub const CENTER_HALF_SIZE: f32 = 0.40;
/// Where the axis arms begin along their axis
pub const ARM_START: f32 = CENTER_HALF_SIZE;
/// Where the axis arms end along their axis
pub const ARM_END: f32 = 3.0;
/// Half-width of an axis arm box
pub const ARM_HALF_WIDTH: f32 = 0.25;
/// Inner edge of a plane handle
pub const PLANE_START: f32 = 0.60;
/// Outer edge of a plane handle
pub const PLANE_END: f32 = 1.40;
/// Half-thickness of a plane handle
pub const PLANE_HALF_THICKNESS: f32 = 0.10;
/// Radius of the rotate rings
pub const RING_RADIUS: f32 = 2.0;
/// Hit tolerance around a rotate ring
pub const RING_HIT_THICKNESS: f32 = 0.25;
/// Half-size of a rectangle-scale handle box
pub const RECT_HANDLE_HALF_SIZE: f32 = 0.25;

/// Interaction mode of the transform tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum TransformMode {
    /// Move along axes or planes
    #[default]
    Translate,
    /// Non-uniform scale about the pivot
    Scale,
    /// Rotate about one axis
    Rotate,
    /// Resize the selection box by its faces and corners
    RectangleScale,
}

/// Where the gizmo is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GizmoPose {
    /// Gizmo center in world space
    pub position: Vec3,
    /// Gizmo frame (identity in world space)
    pub rotation: Quat,
    /// Camera-derived size multiplier
    pub scale: f32,
}

impl GizmoPose {
    /// Gizmo pose from explicit values
    pub fn new(position: Vec3, rotation: Quat, scale: f32) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Gizmo pose from the runtime fields of the settings
    pub fn from_settings(settings: &TransformSettings) -> Self {
        Self::new(settings.origin, settings.rotation, settings.gizmo_scale)
    }

    /// Express a world ray in gizmo-local coordinates (rotation and translation only)
    pub fn to_local(&self, ray: &Ray) -> Ray {
        let inverse = self.rotation.inverse();
        Ray {
            origin: inverse * (ray.origin - self.position),
            direction: inverse * ray.direction,
        }
    }
}

fn scaled_box(min: Vec3, max: Vec3, scale: f32) -> (Vec3, Vec3) {
    (min * scale, max * scale)
}

fn arm_box(axis: Axis) -> (Vec3, Vec3) {
    let dir = axis.direction();
    let cross = Vec3::ONE - dir;
    (
        dir * ARM_START - cross * ARM_HALF_WIDTH,
        dir * ARM_END + cross * ARM_HALF_WIDTH,
    )
}

fn plane_box(plane: Axis) -> (Vec3, Vec3) {
    let normal = plane.plane_normal_axis().direction();
    let span = Vec3::ONE - normal;
    (
        span * PLANE_START - normal * PLANE_HALF_THICKNESS,
        span * PLANE_END + normal * PLANE_HALF_THICKNESS,
    )
}

/// Translate/scale gizmo: center box first, then single axes, then planes.
///
/// The first region hit in that order wins; regions overlap near the center.
pub fn hit_translate_scale(local_ray: &Ray, scale: f32, settings: &TransformSettings) -> Axis {
    let Ray { origin, direction } = *local_ray;

    let (min, max) = scaled_box(
        Vec3::splat(-CENTER_HALF_SIZE),
        Vec3::splat(CENTER_HALF_SIZE),
        scale,
    );
    if ray_aabb_intersection(origin, direction, min, max).is_some() {
        return Axis::ALL;
    }

    for axis in [Axis::X, Axis::Y, Axis::Z] {
        if !settings.is_axis_visible(axis) {
            continue;
        }
        let (min, max) = arm_box(axis);
        let (min, max) = scaled_box(min, max, scale);
        if ray_aabb_intersection(origin, direction, min, max).is_some() {
            return axis;
        }
    }

    for plane in [Axis::XY, Axis::YZ, Axis::XZ] {
        if !settings.is_axis_visible(plane) {
            continue;
        }
        let (min, max) = plane_box(plane);
        let (min, max) = scaled_box(min, max, scale);
        if ray_aabb_intersection(origin, direction, min, max).is_some() {
            return plane;
        }
    }

    Axis::NONE
}

/// Rotate gizmo: one ring per axis, the nearest hit wins
pub fn hit_rotate(local_ray: &Ray, scale: f32, settings: &TransformSettings) -> Axis {
    let ring_radius = RING_RADIUS * scale;
    let hit_thickness = RING_HIT_THICKNESS * scale;

    let mut closest_axis = Axis::NONE;
    let mut closest_dist = f32::MAX;

    for axis in [Axis::X, Axis::Y, Axis::Z] {
        if !settings.is_axis_visible(axis) {
            continue;
        }
        if let Some(dist) = ray_ring_intersection(
            local_ray.origin,
            local_ray.direction,
            Vec3::ZERO,
            axis.direction(),
            ring_radius,
            hit_thickness,
        ) && dist < closest_dist
        {
            closest_dist = dist;
            closest_axis = axis;
        }
    }

    closest_axis
}

/// Rectangle gizmo: face and corner handles on the world selection box, nearest hit wins
pub fn hit_rectangle(
    ray: &Ray,
    bounds: &BoundingBox,
    scale: f32,
    settings: &TransformSettings,
) -> Option<RectHandle> {
    let half = Vec3::splat(RECT_HANDLE_HALF_SIZE * scale);

    let mut closest = None;
    let mut closest_dist = f32::MAX;

    for handle in RectHandle::catalog() {
        if !settings.is_axis_visible(handle.moved_axes()) {
            continue;
        }
        let anchor = handle.anchor(bounds.min, bounds.max);
        if let Some(dist) =
            ray_aabb_intersection(ray.origin, ray.direction, anchor - half, anchor + half)
            && dist < closest_dist
        {
            closest_dist = dist;
            closest = Some(handle);
        }
    }

    closest
}

/// Which gizmo handle lies under a screen point.
///
/// Pure function of the inputs; a miss returns [`GizmoHandle::None`].
pub fn resolve_handle(
    mode: TransformMode,
    camera: &dyn Camera,
    point: Vec2,
    pose: &GizmoPose,
    bounds: &BoundingBox,
    settings: &TransformSettings,
) -> GizmoHandle {
    let ray = camera.ray_from_screen_point(point);
    let handle = match mode {
        TransformMode::Translate | TransformMode::Scale => {
            GizmoHandle::from(hit_translate_scale(&pose.to_local(&ray), pose.scale, settings))
        }
        TransformMode::Rotate => {
            GizmoHandle::from(hit_rotate(&pose.to_local(&ray), pose.scale, settings))
        }
        TransformMode::RectangleScale => hit_rectangle(&ray, bounds, pose.scale, settings)
            .map_or(GizmoHandle::None, GizmoHandle::Rect),
    };
    tracing::trace!(?mode, ?handle, "gizmo hit test");
    handle
}

/// Handle that rectangle mode derives from a plain axis key: the max side of each axis
pub fn rect_handle_for_axis(axis: Axis) -> RectHandle {
    let side = |a: Axis| if axis.contains(a) { Side::Max } else { Side::Fixed };
    RectHandle::new(side(Axis::X), side(Axis::Y), side(Axis::Z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::OrbitCamera;

    fn down_z(x: f32, y: f32) -> Ray {
        Ray::new(Vec3::new(x, y, 10.0), Vec3::NEG_Z)
    }

    #[test]
    fn test_center_wins_over_arm() {
        let settings = TransformSettings::default();
        // Runs along the X arm and through the center box
        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::NEG_X);
        assert_eq!(hit_translate_scale(&ray, 1.0, &settings), Axis::ALL);
    }

    #[test]
    fn test_arm_and_plane_hits() {
        let settings = TransformSettings::default();
        assert_eq!(hit_translate_scale(&down_z(2.0, 0.0), 1.0, &settings), Axis::X);
        assert_eq!(hit_translate_scale(&down_z(0.0, 2.5), 1.0, &settings), Axis::Y);
        assert_eq!(hit_translate_scale(&down_z(1.0, 1.0), 1.0, &settings), Axis::XY);
        assert_eq!(hit_translate_scale(&down_z(-2.0, -2.0), 1.0, &settings), Axis::NONE);
    }

    #[test]
    fn test_hidden_axis_is_skipped() {
        let settings = TransformSettings {
            show_x: false,
            ..Default::default()
        };
        assert_eq!(hit_translate_scale(&down_z(2.0, 0.0), 1.0, &settings), Axis::NONE);
    }

    #[test]
    fn test_regions_follow_gizmo_scale() {
        let settings = TransformSettings::default();
        assert_eq!(hit_translate_scale(&down_z(5.0, 0.0), 1.0, &settings), Axis::NONE);
        assert_eq!(hit_translate_scale(&down_z(5.0, 0.0), 2.0, &settings), Axis::X);
    }

    #[test]
    fn test_local_rotation_applied_to_ray() {
        let settings = TransformSettings::default();
        let pose = GizmoPose::new(
            Vec3::ZERO,
            Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
            1.0,
        );
        // Local X arm now points along world Y
        let local = pose.to_local(&down_z(0.0, 2.0));
        assert_eq!(hit_translate_scale(&local, 1.0, &settings), Axis::X);
    }

    #[test]
    fn test_rotate_ring_hit() {
        let settings = TransformSettings::default();
        assert_eq!(hit_rotate(&down_z(2.0, 0.0), 1.0, &settings), Axis::Z);
        assert_eq!(hit_rotate(&down_z(0.5, 0.0), 1.0, &settings), Axis::NONE);
    }

    #[test]
    fn test_rectangle_nearest_handle() {
        let settings = TransformSettings::default();
        let bounds = BoundingBox::fallback();

        let face = hit_rectangle(&down_z(1.0, 0.0), &bounds, 1.0, &settings);
        assert_eq!(face, Some(RectHandle::new(Side::Max, Side::Fixed, Side::Fixed)));

        let corner = hit_rectangle(&down_z(1.0, 1.0), &bounds, 1.0, &settings);
        assert_eq!(corner, Some(RectHandle::new(Side::Max, Side::Max, Side::Max)));
    }

    #[test]
    fn test_resolve_handle_through_camera() {
        let settings = TransformSettings::default();
        let camera = OrbitCamera::looking_at(
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::ZERO,
            Vec2::new(800.0, 600.0),
        );
        let pose = GizmoPose::new(Vec3::ZERO, Quat::IDENTITY, 1.0);
        let bounds = BoundingBox::fallback();

        let point = camera.world_to_screen(Vec3::new(2.0, 0.0, 0.0)).unwrap();
        let handle =
            resolve_handle(TransformMode::Translate, &camera, point, &pose, &bounds, &settings);
        assert_eq!(handle, GizmoHandle::Axis(Axis::X));

        let center = camera.world_to_screen(Vec3::ZERO).unwrap();
        let handle =
            resolve_handle(TransformMode::Scale, &camera, center, &pose, &bounds, &settings);
        assert_eq!(handle, GizmoHandle::Axis(Axis::ALL));
    }

    #[test]
    fn test_rect_handle_for_axis() {
        let handle = rect_handle_for_axis(Axis::XZ);
        assert_eq!(handle.moved_axes(), Axis::XZ);
        assert_eq!(handle.y, Side::Fixed);
    }
}
