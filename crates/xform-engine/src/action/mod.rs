//! Transform actions
//!
//! One action per [`TransformMode`]. Every action follows the same cycle:
//! `reset` captures the drag start, `compute_delta` turns the current mouse
//! position into a constrained delta (true only when it changed since the last
//! call), `apply` writes baseline + delta into the poses and `finish` reports
//! whether the drag changed anything.

mod rectangle;
mod rotate;
mod scale;
mod translate;

pub use rectangle::RectangleScaleAction;
pub use rotate::RotateAction;
pub use scale::ScaleAction;
pub use translate::TranslateAction;
pub use xform_gizmo::TransformMode;

use glam::{Vec2, Vec3};
use xform_core::{
    BoundingBox, PivotSpace, Pose, PoseArena, PoseHandle, PoseSnapshot, TransformSettings,
};
use xform_gizmo::{Camera, Ray};

use crate::context::SceneQuery;

/// Per-call inputs of an action
pub struct ActionInput<'a> {
    pub camera: &'a dyn Camera,
    pub scene: &'a dyn SceneQuery,
    /// Mouse position in screen pixels
    pub mouse: Vec2,
    /// Current selection bounds
    pub bounds: BoundingBox,
}

impl ActionInput<'_> {
    pub fn ray(&self) -> Ray {
        self.camera.ray_from_screen_point(self.mouse)
    }
}

/// The action of the active mode
#[derive(Debug, Clone)]
pub enum TransformAction {
    Translate(TranslateAction),
    Scale(ScaleAction),
    Rotate(RotateAction),
    RectangleScale(RectangleScaleAction),
}

impl TransformAction {
    pub fn new(mode: TransformMode) -> Self {
        match mode {
            TransformMode::Translate => Self::Translate(TranslateAction::default()),
            TransformMode::Scale => Self::Scale(ScaleAction::default()),
            TransformMode::Rotate => Self::Rotate(RotateAction::default()),
            TransformMode::RectangleScale => Self::RectangleScale(RectangleScaleAction::default()),
        }
    }

    pub fn mode(&self) -> TransformMode {
        match self {
            Self::Translate(_) => TransformMode::Translate,
            Self::Scale(_) => TransformMode::Scale,
            Self::Rotate(_) => TransformMode::Rotate,
            Self::RectangleScale(_) => TransformMode::RectangleScale,
        }
    }

    pub fn reset(&mut self, input: &ActionInput<'_>, settings: &TransformSettings) {
        match self {
            Self::Translate(action) => action.reset(input, settings),
            Self::Scale(action) => action.reset(input, settings),
            Self::Rotate(action) => action.reset(input, settings),
            Self::RectangleScale(action) => action.reset(input, settings),
        }
    }

    pub fn compute_delta(&mut self, input: &ActionInput<'_>, settings: &TransformSettings) -> bool {
        match self {
            Self::Translate(action) => action.compute_delta(input, settings),
            Self::Scale(action) => action.compute_delta(input, settings),
            Self::Rotate(action) => action.compute_delta(input, settings),
            Self::RectangleScale(action) => action.compute_delta(input, settings),
        }
    }

    pub fn finish(&mut self) -> bool {
        match self {
            Self::Translate(action) => action.finish(),
            Self::Scale(action) => action.finish(),
            Self::Rotate(action) => action.finish(),
            Self::RectangleScale(action) => action.finish(),
        }
    }

    /// Write baseline + current delta into the poses
    pub fn apply(&self, previous: &[PoseSnapshot], handles: &[PoseHandle], poses: &mut PoseArena) {
        match self {
            Self::Translate(action) => action.apply(previous, handles, poses),
            Self::Scale(action) => action.apply(previous, handles, poses),
            Self::Rotate(action) => action.apply(previous, handles, poses),
            Self::RectangleScale(action) => action.apply(previous, handles, poses),
        }
    }

    /// Accumulated rotation in degrees, rotate mode only
    pub fn rotation_angle(&self) -> Option<f32> {
        match self {
            Self::Rotate(action) => Some(action.angle()),
            _ => None,
        }
    }
}

/// Visit each live pose with its baseline
pub(crate) fn for_each_pose(
    previous: &[PoseSnapshot],
    handles: &[PoseHandle],
    poses: &mut PoseArena,
    mut f: impl FnMut(&PoseSnapshot, &mut Pose),
) {
    for (prev, handle) in previous.iter().zip(handles) {
        match poses.get_mut(*handle) {
            Some(pose) => f(prev, pose),
            None => tracing::trace!(?handle, "pose removed during drag"),
        }
    }
}

/// Pivot a member is rotated or scaled around
pub(crate) fn pivot_for(pivot: PivotSpace, origin: Vec3, prev: &PoseSnapshot) -> Vec3 {
    match pivot {
        PivotSpace::Selected => origin,
        PivotSpace::Individual => prev.origin(),
    }
}
