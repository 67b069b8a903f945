//! Rotation about a single axis or the view axis

use glam::{Quat, Vec3};
use xform_core::constants::EPSILON;
use xform_core::{
    Axis, PivotSpace, PoseArena, PoseHandle, PoseSnapshot, TransformSettings, snap_value,
};
use xform_gizmo::ray_plane_intersection;

use super::{ActionInput, for_each_pose, pivot_for};

#[derive(Debug, Clone, Default)]
pub struct RotateAction {
    axis: Axis,
    origin: Vec3,
    pivot: PivotSpace,
    /// World rotation axis; `None` for plane selections
    rotation_axis: Option<Vec3>,
    /// Pivot to the last plane hit
    previous_vec: Option<Vec3>,
    /// Unwrapped mouse angle in degrees
    total_angle: f32,
    /// Angle applied this frame in degrees
    angle: f32,
    moved: bool,
}

impl RotateAction {
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn rotation_axis(&self) -> Option<Vec3> {
        self.rotation_axis
    }

    pub fn reset(&mut self, input: &ActionInput<'_>, settings: &TransformSettings) {
        self.axis = settings.active_axis();
        self.origin = settings.origin;
        self.pivot = settings.pivot;
        self.total_angle = 0.0;
        self.angle = 0.0;
        self.moved = false;

        let forward = input.camera.forward();
        self.rotation_axis = if self.axis.is_all() {
            (forward.length_squared() > EPSILON).then(|| -forward.normalize())
        } else if self.axis.is_single() {
            Some((settings.rotation * self.axis.direction()).normalize())
        } else {
            None
        };
        self.previous_vec = self.plane_vector(input);
    }

    /// Pivot to the mouse ray's hit on the rotation plane
    fn plane_vector(&self, input: &ActionInput<'_>) -> Option<Vec3> {
        let axis = self.rotation_axis?;
        let ray = input.ray();
        let hit = ray_plane_intersection(ray.origin, ray.direction, self.origin, axis)?;
        let vec = hit - self.origin;
        (vec.length_squared() > EPSILON).then_some(vec)
    }

    fn snap_step(&self, settings: &TransformSettings) -> f32 {
        let steps = settings.rotate_snap;
        match self.axis {
            Axis::Y => steps.y,
            Axis::Z => steps.z,
            _ => steps.x,
        }
    }

    pub fn compute_delta(&mut self, input: &ActionInput<'_>, settings: &TransformSettings) -> bool {
        let Some(axis) = self.rotation_axis else {
            return false;
        };

        let angle = match settings.text_input {
            Some(value) => value,
            None => {
                let (Some(previous), Some(current)) = (self.previous_vec, self.plane_vector(input))
                else {
                    return false;
                };
                let step = axis.dot(previous.cross(current)).atan2(previous.dot(current));
                if !step.is_finite() {
                    return false;
                }
                self.total_angle += step.to_degrees();
                self.previous_vec = Some(current);
                if settings.snapping() {
                    snap_value(self.total_angle, self.snap_step(settings))
                } else {
                    self.total_angle
                }
            }
        };

        if angle == self.angle {
            return false;
        }
        self.angle = angle;
        if angle != 0.0 {
            self.moved = true;
        }
        tracing::trace!(angle, "rotate delta");
        true
    }

    pub fn finish(&mut self) -> bool {
        std::mem::take(&mut self.moved)
    }

    pub fn apply(&self, previous: &[PoseSnapshot], handles: &[PoseHandle], poses: &mut PoseArena) {
        let Some(axis) = self.rotation_axis else {
            return;
        };
        let delta = Quat::from_axis_angle(axis, self.angle.to_radians());

        for_each_pose(previous, handles, poses, |prev, pose| {
            let pivot = pivot_for(self.pivot, self.origin, prev);
            pose.restore(prev);
            pose.set_rotation(delta * prev.rotation);
            pose.set_position(pivot + delta * (prev.position - pivot));
            if let Some(origin) = prev.custom_origin {
                pose.set_custom_origin(Some(pivot + delta * (origin - pivot)));
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeScene, action_input, front_camera, screen, top_camera};
    use approx::assert_relative_eq;
    use xform_core::{BoundingBox, GizmoHandle, Pose};
    use xform_gizmo::OrbitCamera;

    fn settings_for(axis: Axis) -> TransformSettings {
        TransformSettings {
            active: GizmoHandle::Axis(axis),
            ..Default::default()
        }
    }

    /// Point at `degrees` about +Y from +X, radius 2
    fn around_y(degrees: f32) -> Vec3 {
        Quat::from_rotation_y(degrees.to_radians()) * Vec3::new(2.0, 0.0, 0.0)
    }

    fn rotate_through(
        camera: &OrbitCamera,
        settings: &TransformSettings,
        points: &[Vec3],
    ) -> RotateAction {
        let scene = FakeScene::default();
        let bounds = BoundingBox::fallback();
        let mut action = RotateAction::default();
        action.reset(&action_input(camera, &scene, screen(camera, points[0]), bounds), settings);
        for point in &points[1..] {
            let input = action_input(camera, &scene, screen(camera, *point), bounds);
            action.compute_delta(&input, settings);
        }
        action
    }

    #[test]
    fn test_raw_angle_snaps_to_step() {
        let camera = top_camera();
        let mut settings = settings_for(Axis::Y);
        settings.snap_enabled = true;

        let action = rotate_through(&camera, &settings, &[around_y(0.0), around_y(100.0)]);
        assert_eq!(action.angle(), 90.0);

        let mut poses = PoseArena::new();
        let handle = poses.insert(Pose::default());
        let previous = vec![poses.get(handle).unwrap().snapshot()];
        action.apply(&previous, &[handle], &mut poses);
        let rotation = poses.get(handle).unwrap().rotation();
        assert!(rotation.abs_diff_eq(Quat::from_rotation_y(90.0_f32.to_radians()), 1e-5));
    }

    #[test]
    fn test_angle_accumulates_past_half_turn() {
        let camera = top_camera();
        let settings = settings_for(Axis::Y);

        let points = [around_y(0.0), around_y(100.0), around_y(200.0), around_y(300.0)];
        let action = rotate_through(&camera, &settings, &points);
        assert_relative_eq!(action.angle(), 300.0, epsilon = 0.05);
    }

    #[test]
    fn test_plane_selection_is_noop() {
        let camera = top_camera();
        let settings = settings_for(Axis::XZ);
        let mut action = rotate_through(&camera, &settings, &[around_y(0.0), around_y(90.0)]);
        assert_eq!(action.angle(), 0.0);
        assert!(action.rotation_axis().is_none());
        assert!(!action.finish());
    }

    #[test]
    fn test_axis_parallel_to_view_plane_is_noop() {
        // Ray hits the Y rotation plane edge-on
        let camera = front_camera();
        let settings = settings_for(Axis::Y);
        let action = rotate_through(&camera, &settings, &[Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)]);
        assert_eq!(action.angle(), 0.0);
    }

    #[test]
    fn test_view_axis_rotation_about_pivot() {
        let camera = front_camera();
        let mut settings = settings_for(Axis::ALL);
        settings.text_input = Some(90.0);

        let action = rotate_through(&camera, &settings, &[Vec3::ZERO, Vec3::ZERO]);
        assert_eq!(action.angle(), 90.0);

        let mut poses = PoseArena::new();
        let handle = poses.insert(Pose::from_position(Vec3::X));
        let previous = vec![poses.get(handle).unwrap().snapshot()];
        action.apply(&previous, &[handle], &mut poses);
        // View axis points at the camera (+Z): X turns into Y
        assert!(poses.get(handle).unwrap().position().abs_diff_eq(Vec3::Y, 1e-5));
    }

    #[test]
    fn test_individual_pivot_rotates_in_place() {
        let camera = front_camera();
        let mut settings = settings_for(Axis::Z);
        settings.text_input = Some(45.0);
        settings.pivot = PivotSpace::Individual;

        let action = rotate_through(&camera, &settings, &[Vec3::ZERO, Vec3::ZERO]);
        let mut poses = PoseArena::new();
        let handle = poses.insert(Pose::from_position(Vec3::new(3.0, 0.0, 0.0)));
        let previous = vec![poses.get(handle).unwrap().snapshot()];
        action.apply(&previous, &[handle], &mut poses);
        let pose = poses.get(handle).unwrap();
        assert!(pose.position().abs_diff_eq(Vec3::new(3.0, 0.0, 0.0), 1e-6));
        assert!(pose.rotation().abs_diff_eq(Quat::from_rotation_z(45.0_f32.to_radians()), 1e-6));
    }
}
