//! Translation along an axis, a plane or freely

use glam::{Quat, Vec3};
use xform_core::constants::EPSILON;
use xform_core::{Axis, PoseArena, PoseHandle, PoseSnapshot, TransformSettings, snap_vec3};
use xform_gizmo::ray_plane_intersection;

use super::{ActionInput, for_each_pose};

#[derive(Debug, Clone, Default)]
pub struct TranslateAction {
    axis: Axis,
    origin: Vec3,
    /// Gizmo frame the constraint is expressed in
    frame: Quat,
    plane_normal: Option<Vec3>,
    /// Drag plane hit at reset
    start: Option<Vec3>,
    /// World offset of the current frame
    offset: Vec3,
    moved: bool,
}

/// Plane the mouse ray is projected onto.
///
/// A single axis uses the plane containing the axis that faces the camera
/// most; `None` when the axis points straight into the view.
fn drag_plane_normal(axis: Axis, frame: Quat, forward: Vec3) -> Option<Vec3> {
    if axis.is_all() {
        return (forward.length_squared() > EPSILON).then(|| -forward.normalize());
    }
    if axis.is_single() {
        let dir = frame * axis.direction();
        let normal = dir.cross(forward.cross(dir));
        return (normal.length_squared() > EPSILON).then(|| normal.normalize());
    }
    if axis.is_multi() {
        return Some(frame * axis.plane_normal_axis().direction());
    }
    None
}

impl TranslateAction {
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    pub fn reset(&mut self, input: &ActionInput<'_>, settings: &TransformSettings) {
        self.axis = settings.active_axis();
        self.origin = settings.origin;
        self.frame = settings.rotation;
        self.offset = Vec3::ZERO;
        self.moved = false;

        self.plane_normal = drag_plane_normal(self.axis, self.frame, input.camera.forward());
        let ray = input.ray();
        self.start = self.plane_normal.and_then(|normal| {
            ray_plane_intersection(ray.origin, ray.direction, self.origin, normal)
        });
    }

    pub fn compute_delta(&mut self, input: &ActionInput<'_>, settings: &TransformSettings) -> bool {
        if self.axis.is_none() {
            return false;
        }

        let local = match settings.text_input {
            // Typed distance along every constrained axis, never snapped
            Some(value) => self.axis.mask() * value,
            None => {
                let Some(local) = self.dragged_local_offset(input, settings) else {
                    return false;
                };
                let local = local * self.axis.mask();
                if settings.snapping() {
                    snap_vec3(local, settings.translate_snap)
                } else {
                    local
                }
            }
        };

        let offset = self.frame * local;
        if !offset.is_finite() || offset == self.offset {
            return false;
        }
        self.offset = offset;
        if offset != Vec3::ZERO {
            self.moved = true;
        }
        tracing::trace!(?offset, "translate delta");
        true
    }

    /// Mouse movement since reset in gizmo-local coordinates
    fn dragged_local_offset(
        &self,
        input: &ActionInput<'_>,
        settings: &TransformSettings,
    ) -> Option<Vec3> {
        let ray = input.ray();
        let inverse = self.frame.inverse();

        if self.axis.is_all()
            && settings.collision_detect
            && let Some(hit) = input.scene.raycast_collision(ray.origin, ray.direction)
        {
            return Some(inverse * (hit - self.origin));
        }

        let normal = self.plane_normal?;
        let start = self.start?;
        let hit = ray_plane_intersection(ray.origin, ray.direction, self.origin, normal)?;
        Some(inverse * (hit - start))
    }

    pub fn finish(&mut self) -> bool {
        std::mem::take(&mut self.moved)
    }

    pub fn apply(&self, previous: &[PoseSnapshot], handles: &[PoseHandle], poses: &mut PoseArena) {
        let offset = self.offset;
        for_each_pose(previous, handles, poses, |prev, pose| {
            pose.restore(prev);
            pose.set_position(prev.position + offset);
            if let Some(origin) = prev.custom_origin {
                pose.set_custom_origin(Some(origin + offset));
            }
        });
    }
}
