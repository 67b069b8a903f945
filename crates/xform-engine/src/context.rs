//! Collaborators the engine talks to
//!
//! The host owns the pose arena, camera, picking, scene selection and undo
//! stack; it bundles borrows of them into an [`EngineContext`] for each call.

use glam::{Vec2, Vec3};
use xform_core::{BoundingBox, PoseArena, PoseHandle};
use xform_gizmo::Camera;

use crate::undo::Revertable;

/// "What is under this screen point" query
pub trait Picker {
    fn find_object_at_screen_point(&self, point: Vec2) -> Option<PoseHandle>;
}

/// Scene-side selection and collision queries
pub trait SceneQuery {
    /// Currently selected transformable objects
    fn selected_objects(&self) -> Vec<SelectionItem>;

    /// First collision surface hit by the ray, for drop-to-ground placement
    fn raycast_collision(&self, _origin: Vec3, _direction: Vec3) -> Option<Vec3> {
        None
    }
}

/// Batched undo stack.
///
/// Steps are never withdrawn. A drag cancelled after its first change leaves
/// a step whose revert restores the poses they already hold.
pub trait UndoStack {
    fn begin_collection(&mut self);
    fn add(&mut self, command: Box<dyn Revertable>);
    fn end_collection(&mut self);
}

/// One selected object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionItem {
    pub pose: PoseHandle,
    /// Object-space bounds; `None` contributes only the pose origin
    pub local_bounds: Option<BoundingBox>,
    /// Objects being edited in place are not transformed as a whole
    pub edit_mode: bool,
}

impl SelectionItem {
    pub fn new(pose: PoseHandle) -> Self {
        Self {
            pose,
            local_bounds: None,
            edit_mode: false,
        }
    }

    pub fn with_bounds(mut self, bounds: BoundingBox) -> Self {
        self.local_bounds = Some(bounds);
        self
    }
}

/// Borrowed collaborators for one engine call
pub struct EngineContext<'a> {
    pub poses: &'a mut PoseArena,
    pub camera: &'a dyn Camera,
    pub picker: &'a dyn Picker,
    pub scene: &'a dyn SceneQuery,
    pub undo: &'a mut dyn UndoStack,
}

impl<'a> EngineContext<'a> {
    pub fn new(
        poses: &'a mut PoseArena,
        camera: &'a dyn Camera,
        picker: &'a dyn Picker,
        scene: &'a dyn SceneQuery,
        undo: &'a mut dyn UndoStack,
    ) -> Self {
        Self {
            poses,
            camera,
            picker,
            scene,
            undo,
        }
    }
}
