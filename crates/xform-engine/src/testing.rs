//! In-memory collaborators for unit tests

use glam::{Vec2, Vec3};
use xform_core::{BoundingBox, Pose, PoseArena, PoseHandle};
use xform_gizmo::{Camera, OrbitCamera};

use crate::action::ActionInput;
use crate::context::{EngineContext, Picker, SceneQuery, SelectionItem};
use crate::undo::UndoHistory;

pub const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

/// Camera on +Z looking at the origin
pub fn front_camera() -> OrbitCamera {
    OrbitCamera::looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, VIEWPORT)
}

/// Camera above the origin looking down (pitch clamped just short of vertical)
pub fn top_camera() -> OrbitCamera {
    OrbitCamera::looking_at(Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO, VIEWPORT)
}

pub fn screen(camera: &dyn Camera, world: Vec3) -> Vec2 {
    camera
        .world_to_screen(world)
        .unwrap_or_else(|| panic!("{world} is behind the camera"))
}

#[derive(Debug, Default)]
pub struct FakePicker {
    pub hit: Option<PoseHandle>,
}

impl Picker for FakePicker {
    fn find_object_at_screen_point(&self, _point: Vec2) -> Option<PoseHandle> {
        self.hit
    }
}

#[derive(Debug, Default)]
pub struct FakeScene {
    pub selected: Vec<SelectionItem>,
    pub collision: Option<Vec3>,
}

impl SceneQuery for FakeScene {
    fn selected_objects(&self) -> Vec<SelectionItem> {
        self.selected.clone()
    }

    fn raycast_collision(&self, _origin: Vec3, _direction: Vec3) -> Option<Vec3> {
        self.collision
    }
}

pub fn action_input<'a>(
    camera: &'a dyn Camera,
    scene: &'a dyn SceneQuery,
    mouse: Vec2,
    bounds: BoundingBox,
) -> ActionInput<'a> {
    ActionInput {
        camera,
        scene,
        mouse,
        bounds,
    }
}

/// Everything an engine call borrows, owned in one place
pub struct Harness {
    pub poses: PoseArena,
    pub camera: OrbitCamera,
    pub picker: FakePicker,
    pub scene: FakeScene,
    pub history: UndoHistory,
}

impl Harness {
    pub fn new(camera: OrbitCamera) -> Self {
        Self {
            poses: PoseArena::new(),
            camera,
            picker: FakePicker::default(),
            scene: FakeScene::default(),
            history: UndoHistory::new(),
        }
    }

    /// Add a pose and select it
    pub fn select(&mut self, pose: Pose) -> PoseHandle {
        let handle = self.poses.insert(pose);
        self.scene.selected.push(SelectionItem::new(handle));
        handle
    }

    pub fn select_with_bounds(&mut self, pose: Pose, bounds: BoundingBox) -> PoseHandle {
        let handle = self.poses.insert(pose);
        self.scene
            .selected
            .push(SelectionItem::new(handle).with_bounds(bounds));
        handle
    }

    pub fn ctx(&mut self) -> EngineContext<'_> {
        EngineContext::new(
            &mut self.poses,
            &self.camera,
            &self.picker,
            &self.scene,
            &mut self.history,
        )
    }

    pub fn position(&self, handle: PoseHandle) -> Vec3 {
        self.poses
            .get(handle)
            .map(|pose| pose.position())
            .unwrap_or_else(|| panic!("missing pose {handle:?}"))
    }
}
