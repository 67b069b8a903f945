//! Host-side collaborators for the demo session

use glam::{Vec2, Vec3};
use xform_core::{BoundingBox, Pose, PoseArena, PoseHandle};
use xform_engine::{Picker, SceneQuery, SelectionItem};
use xform_gizmo::{Camera, ray_plane_intersection};

/// Selected objects plus a ground plane at y = 0 for drop-to-collision
#[derive(Debug, Default)]
pub struct DemoScene {
    pub selected: Vec<SelectionItem>,
}

impl DemoScene {
    pub fn add_box(&mut self, poses: &mut PoseArena, pose: Pose) -> PoseHandle {
        let handle = poses.insert(pose);
        self.selected
            .push(SelectionItem::new(handle).with_bounds(BoundingBox::fallback()));
        handle
    }
}

impl SceneQuery for DemoScene {
    fn selected_objects(&self) -> Vec<SelectionItem> {
        self.selected.clone()
    }

    fn raycast_collision(&self, origin: Vec3, direction: Vec3) -> Option<Vec3> {
        ray_plane_intersection(origin, direction, Vec3::ZERO, Vec3::Y)
    }
}

/// Picks the object whose projected position is nearest to the cursor
#[derive(Debug)]
pub struct NearestPicker {
    targets: Vec<(PoseHandle, Vec2)>,
    radius: f32,
}

impl NearestPicker {
    pub fn new(radius: f32) -> Self {
        Self {
            targets: Vec::new(),
            radius,
        }
    }

    /// Re-project every pose; call once per frame before input is handled
    pub fn rebuild(&mut self, poses: &PoseArena, camera: &dyn Camera) {
        self.targets = poses
            .iter()
            .filter_map(|(handle, pose)| {
                camera
                    .world_to_screen(pose.position())
                    .map(|point| (handle, point))
            })
            .collect();
    }
}

impl Picker for NearestPicker {
    fn find_object_at_screen_point(&self, point: Vec2) -> Option<PoseHandle> {
        self.targets
            .iter()
            .map(|(handle, target)| (*handle, target.distance(point)))
            .filter(|(_, distance)| *distance <= self.radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(handle, _)| handle)
    }
}
