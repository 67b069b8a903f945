//! Rectangle scale: drag a face or corner of the selection box
//!
//! The box is resized first; each member's position and scale are then mapped
//! from the old box to the new one.

use glam::Vec3;
use xform_core::constants::{EPSILON, MIN_BOX_EXTENT};
use xform_core::{
    BoundingBox, GizmoHandle, PoseArena, PoseHandle, PoseSnapshot, RectHandle, Side,
    TransformSettings, snap_vec3,
};
use xform_gizmo::ray_plane_intersection;

use super::{ActionInput, for_each_pose};

#[derive(Debug, Clone, Default)]
pub struct RectangleScaleAction {
    handle: Option<RectHandle>,
    /// Selection box at reset
    baseline: BoundingBox,
    /// Resized box of the current frame
    bounds: BoundingBox,
    plane_normal: Vec3,
    start: Option<Vec3>,
    moved: bool,
}

impl RectangleScaleAction {
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    pub fn reset(&mut self, input: &ActionInput<'_>, settings: &TransformSettings) {
        self.handle = match settings.active {
            GizmoHandle::Rect(handle) => Some(handle),
            _ => None,
        };
        self.baseline = input.bounds;
        self.bounds = input.bounds;
        self.moved = false;

        self.plane_normal = -input.camera.forward();
        let ray = input.ray();
        self.start = self.handle.and_then(|handle| {
            let anchor = handle.anchor(self.baseline.min, self.baseline.max);
            ray_plane_intersection(ray.origin, ray.direction, anchor, self.plane_normal)
        });
    }

    pub fn compute_delta(&mut self, input: &ActionInput<'_>, settings: &TransformSettings) -> bool {
        let Some(handle) = self.handle else {
            return false;
        };

        let delta = match settings.text_input {
            // Typed amount moves each face outward
            Some(value) => handle.signs() * value,
            None => {
                let Some(start) = self.start else {
                    return false;
                };
                let ray = input.ray();
                let Some(hit) =
                    ray_plane_intersection(ray.origin, ray.direction, start, self.plane_normal)
                else {
                    return false;
                };
                let delta = (hit - start) * handle.moved_axes().mask();
                if settings.snapping() {
                    snap_vec3(delta, settings.translate_snap)
                } else {
                    delta
                }
            }
        };

        let bounds = resize(&self.baseline, handle, delta);
        if !bounds.min.is_finite() || !bounds.max.is_finite() || bounds == self.bounds {
            return false;
        }
        self.bounds = bounds;
        if bounds != self.baseline {
            self.moved = true;
        }
        tracing::trace!(?delta, "rectangle delta");
        true
    }

    pub fn finish(&mut self) -> bool {
        std::mem::take(&mut self.moved)
    }

    pub fn apply(&self, previous: &[PoseSnapshot], handles: &[PoseHandle], poses: &mut PoseArena) {
        let base = self.baseline;
        let bounds = self.bounds;
        let base_size = base.size();
        let size = bounds.size();
        let ratio = Vec3::select(
            base_size.cmpgt(Vec3::splat(EPSILON)),
            size / base_size,
            Vec3::ONE,
        );
        let remap = |point: Vec3| bounds.min + (point - base.min) * ratio;

        for_each_pose(previous, handles, poses, |prev, pose| {
            pose.restore(prev);
            pose.set_position(remap(prev.position));
            pose.set_scale(prev.scale * ratio);
            if let Some(origin) = prev.custom_origin {
                pose.set_custom_origin(Some(remap(origin)));
            }
        });
    }
}

/// Move the handle's faces by `delta`, never closer than the minimum extent
fn resize(base: &BoundingBox, handle: RectHandle, delta: Vec3) -> BoundingBox {
    let mut min = base.min;
    let mut max = base.max;
    for (i, side) in handle.sides().into_iter().enumerate() {
        match side {
            Side::Fixed => {}
            Side::Max => max[i] = (base.max[i] + delta[i]).max(base.min[i] + MIN_BOX_EXTENT),
            Side::Min => min[i] = (base.min[i] + delta[i]).min(base.max[i] - MIN_BOX_EXTENT),
        }
    }
    BoundingBox::new(min, max)
}
