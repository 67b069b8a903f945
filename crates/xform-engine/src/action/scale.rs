//! Non-uniform scale about the pivot
//!
//! The factor is the mouse's signed screen distance from the projected pivot
//! along the drag-start direction, relative to the distance at drag start.

use glam::{Quat, Vec2, Vec3};
use xform_core::{
    Axis, PivotSpace, PoseArena, PoseHandle, PoseSnapshot, TransformSettings, snap_vec3,
};

use super::{ActionInput, for_each_pose, pivot_for};

/// Drags starting closer than this to the projected pivot (pixels) have no reference distance
const MIN_START_DISTANCE: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct ScaleAction {
    axis: Axis,
    origin: Vec3,
    frame: Quat,
    pivot: PivotSpace,
    /// Pivot projected to the screen at reset
    origin_screen: Option<Vec2>,
    start_dir: Vec2,
    start_distance: f32,
    /// Per-axis factor of the current frame
    scale: Vec3,
    moved: bool,
}

impl Default for ScaleAction {
    fn default() -> Self {
        Self {
            axis: Axis::NONE,
            origin: Vec3::ZERO,
            frame: Quat::IDENTITY,
            pivot: PivotSpace::Selected,
            origin_screen: None,
            start_dir: Vec2::ZERO,
            start_distance: 0.0,
            scale: Vec3::ONE,
            moved: false,
        }
    }
}

impl ScaleAction {
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn reset(&mut self, input: &ActionInput<'_>, settings: &TransformSettings) {
        self.axis = settings.active_axis();
        self.origin = settings.origin;
        self.frame = settings.rotation;
        self.pivot = settings.pivot;
        self.scale = Vec3::ONE;
        self.moved = false;

        self.origin_screen = input.camera.world_to_screen(self.origin);
        let start = self
            .origin_screen
            .map_or(Vec2::ZERO, |center| input.mouse - center);
        self.start_distance = start.length();
        self.start_dir = start.normalize_or_zero();
    }

    pub fn compute_delta(&mut self, input: &ActionInput<'_>, settings: &TransformSettings) -> bool {
        if self.axis.is_none() {
            return false;
        }

        let selected = self.axis.mask().cmpgt(Vec3::ZERO);
        let scale = match settings.text_input {
            Some(value) => Vec3::select(selected, Vec3::splat(value), Vec3::ONE),
            None => {
                let Some(factor) = self.drag_factor(input) else {
                    return false;
                };
                let scale = Vec3::select(selected, Vec3::splat(factor), Vec3::ONE);
                if settings.snapping() {
                    Vec3::select(selected, snap_vec3(scale, settings.scale_snap), Vec3::ONE)
                } else {
                    scale
                }
            }
        };

        if !scale.is_finite() || scale == self.scale {
            return false;
        }
        self.scale = scale;
        if scale != Vec3::ONE {
            self.moved = true;
        }
        tracing::trace!(?scale, "scale delta");
        true
    }

    fn drag_factor(&self, input: &ActionInput<'_>) -> Option<f32> {
        let center = self.origin_screen?;
        if self.start_distance < MIN_START_DISTANCE {
            return None;
        }
        Some((input.mouse - center).dot(self.start_dir) / self.start_distance)
    }

    pub fn finish(&mut self) -> bool {
        std::mem::take(&mut self.moved)
    }

    pub fn apply(&self, previous: &[PoseSnapshot], handles: &[PoseHandle], poses: &mut PoseArena) {
        let scale = self.scale;
        let frame = self.frame;
        let inverse = frame.inverse();
        let scale_about =
            |pivot: Vec3, point: Vec3| pivot + frame * (scale * (inverse * (point - pivot)));

        for_each_pose(previous, handles, poses, |prev, pose| {
            let pivot = pivot_for(self.pivot, self.origin, prev);
            pose.restore(prev);
            pose.set_position(scale_about(pivot, prev.position));
            pose.set_scale(prev.scale * scale);
            if let Some(origin) = prev.custom_origin {
                pose.set_custom_origin(Some(scale_about(pivot, origin)));
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeScene, action_input, front_camera};
    use xform_core::{BoundingBox, GizmoHandle, Pose};

    fn two_objects() -> (PoseArena, Vec<PoseHandle>, Vec<PoseSnapshot>) {
        let mut poses = PoseArena::new();
        let handles = vec![
            poses.insert(Pose::from_position(Vec3::ZERO)),
            poses.insert(Pose::from_position(Vec3::new(10.0, 0.0, 0.0))),
        ];
        let previous = handles
            .iter()
            .map(|h| poses.get(*h).unwrap().snapshot())
            .collect();
        (poses, handles, previous)
    }

    fn scaled(settings: &TransformSettings, from: Vec2, to: Vec2) -> (ScaleAction, bool) {
        let camera = front_camera();
        let scene = FakeScene::default();
        let bounds = BoundingBox::fallback();
        let mut action = ScaleAction::default();
        action.reset(&action_input(&camera, &scene, from, bounds), settings);
        let changed = action.compute_delta(&action_input(&camera, &scene, to, bounds), settings);
        (action, changed)
    }

    #[test]
    fn test_scale_about_selection_center() {
        let settings = TransformSettings {
            active: GizmoHandle::Axis(Axis::X),
            origin: Vec3::new(5.0, 0.0, 0.0),
            text_input: Some(2.0),
            ..Default::default()
        };
        let (action, changed) = scaled(&settings, Vec2::ZERO, Vec2::ZERO);
        assert!(changed);
        assert_eq!(action.scale(), Vec3::new(2.0, 1.0, 1.0));

        let (mut poses, handles, previous) = two_objects();
        action.apply(&previous, &handles, &mut poses);
        assert_eq!(poses.get(handles[0]).unwrap().position(), Vec3::new(-5.0, 0.0, 0.0));
        assert_eq!(poses.get(handles[1]).unwrap().position(), Vec3::new(15.0, 0.0, 0.0));
        assert_eq!(poses.get(handles[1]).unwrap().scale(), Vec3::new(2.0, 1.0, 1.0));
    }

    #[test]
    fn test_individual_pivot_keeps_positions() {
        let settings = TransformSettings {
            active: GizmoHandle::Axis(Axis::ALL),
            origin: Vec3::new(5.0, 0.0, 0.0),
            pivot: PivotSpace::Individual,
            text_input: Some(3.0),
            ..Default::default()
        };
        let (action, _) = scaled(&settings, Vec2::ZERO, Vec2::ZERO);

        let (mut poses, handles, previous) = two_objects();
        action.apply(&previous, &handles, &mut poses);
        let b = poses.get(handles[1]).unwrap();
        assert_eq!(b.position(), Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(b.scale(), Vec3::splat(3.0));
    }

    #[test]
    fn test_drag_factor_from_screen_distance() {
        // Pivot at the origin projects to the viewport center
        let settings = TransformSettings {
            active: GizmoHandle::Axis(Axis::Y),
            ..Default::default()
        };
        let (action, changed) =
            scaled(&settings, Vec2::new(500.0, 300.0), Vec2::new(600.0, 300.0));
        assert!(changed);
        assert!(action.scale().abs_diff_eq(Vec3::new(1.0, 2.0, 1.0), 1e-4));
    }

    #[test]
    fn test_snapped_factor() {
        let settings = TransformSettings {
            active: GizmoHandle::Axis(Axis::X),
            snap_enabled: true,
            ..Default::default()
        };
        let (action, _) = scaled(&settings, Vec2::new(500.0, 300.0), Vec2::new(612.0, 300.0));
        assert_eq!(action.scale(), Vec3::new(2.0, 1.0, 1.0));
    }

    #[test]
    fn test_drag_started_on_pivot_is_noop() {
        let settings = TransformSettings {
            active: GizmoHandle::Axis(Axis::X),
            ..Default::default()
        };
        let (mut action, changed) =
            scaled(&settings, Vec2::new(400.0, 300.0), Vec2::new(600.0, 300.0));
        assert!(!changed);
        assert!(!action.finish());
    }
}
