//! Pose records and the arena that owns them
//!
//! Scene objects keep a [`PoseHandle`]; the transform engine mutates the
//! [`Pose`] in the shared [`PoseArena`] in place so every reader sees the
//! change immediately.

use std::cell::Cell;

use glam::{Mat4, Quat, Vec3};

/// Position, rotation and scale of one manipulable object
#[derive(Debug, Clone)]
pub struct Pose {
    position: Vec3,
    rotation: Quat,
    scale: Vec3,
    /// Pivot independent of the position (None = pivot at position)
    custom_origin: Option<Vec3>,
    /// Object must stay on its current height while free-dragged
    pub ignore_y: bool,
    /// Cached world matrix, cleared by every setter
    matrix: Cell<Option<Mat4>>,
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE)
    }
}

impl Pose {
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation: rotation.normalize(),
            scale,
            custom_origin: None,
            ignore_y: false,
            matrix: Cell::new(None),
        }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY, Vec3::ONE)
    }

    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.custom_origin = Some(origin);
        self
    }

    pub fn with_ignore_y(mut self, ignore_y: bool) -> Self {
        self.ignore_y = ignore_y;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Pivot used for gizmo placement, rotation and scaling
    pub fn origin(&self) -> Vec3 {
        self.custom_origin.unwrap_or(self.position)
    }

    pub fn custom_origin(&self) -> Option<Vec3> {
        self.custom_origin
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.invalidate();
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation.normalize();
        self.invalidate();
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.invalidate();
    }

    pub fn set_custom_origin(&mut self, origin: Option<Vec3>) {
        self.custom_origin = origin;
        self.invalidate();
    }

    /// World matrix (translation * rotation * scale), recomputed when dirty
    pub fn matrix(&self) -> Mat4 {
        if let Some(matrix) = self.matrix.get() {
            return matrix;
        }
        let matrix =
            Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position);
        self.matrix.set(Some(matrix));
        matrix
    }

    pub fn is_dirty(&self) -> bool {
        self.matrix.get().is_none()
    }

    fn invalidate(&self) {
        self.matrix.set(None);
    }

    pub fn snapshot(&self) -> PoseSnapshot {
        PoseSnapshot {
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
            custom_origin: self.custom_origin,
        }
    }

    /// Overwrite the pose with a snapshot
    pub fn restore(&mut self, snapshot: &PoseSnapshot) {
        self.position = snapshot.position;
        self.rotation = snapshot.rotation;
        self.scale = snapshot.scale;
        if self.custom_origin.is_some() {
            self.custom_origin = snapshot.custom_origin;
        }
        self.invalidate();
    }
}

/// Copy of a pose's editable state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseSnapshot {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub custom_origin: Option<Vec3>,
}

impl PoseSnapshot {
    pub fn origin(&self) -> Vec3 {
        self.custom_origin.unwrap_or(self.position)
    }
}

/// Stable reference to a pose in a [`PoseArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoseHandle {
    index: u32,
    generation: u32,
}

impl PoseHandle {
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    pose: Option<Pose>,
}

/// Generational arena of poses
#[derive(Debug, Clone, Default)]
pub struct PoseArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl PoseArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pose: Pose) -> PoseHandle {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.pose = Some(pose);
            return PoseHandle {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            pose: Some(pose),
        });
        PoseHandle {
            index,
            generation: 0,
        }
    }

    /// Remove a pose; the handle (and any copy of it) goes stale
    pub fn remove(&mut self, handle: PoseHandle) -> Option<Pose> {
        let slot = self.slots.get_mut(handle.index())?;
        if slot.generation != handle.generation {
            return None;
        }
        let pose = slot.pose.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.len -= 1;
        Some(pose)
    }

    pub fn get(&self, handle: PoseHandle) -> Option<&Pose> {
        self.slots
            .get(handle.index())
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.pose.as_ref())
    }

    pub fn get_mut(&mut self, handle: PoseHandle) -> Option<&mut Pose> {
        self.slots
            .get_mut(handle.index())
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.pose.as_mut())
    }

    pub fn contains(&self, handle: PoseHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (PoseHandle, &Pose)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.pose.as_ref().map(|pose| {
                (
                    PoseHandle {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    pose,
                )
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_recomputed_after_change() {
        let mut pose = Pose::from_position(Vec3::new(1.0, 2.0, 3.0));
        assert!(pose.is_dirty());
        let m = pose.matrix();
        assert!(!pose.is_dirty());
        assert_eq!(m.w_axis.truncate(), Vec3::new(1.0, 2.0, 3.0));

        pose.set_scale(Vec3::splat(2.0));
        assert!(pose.is_dirty());
        assert_eq!(pose.matrix().x_axis.truncate(), Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_matrix_composition_order() {
        let rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let pose = Pose::new(Vec3::new(10.0, 0.0, 0.0), rotation, Vec3::new(2.0, 1.0, 1.0));
        // Scaled first, then rotated, then translated
        let p = pose.matrix().transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::new(10.0, 0.0, -2.0), 1e-5));
    }

    #[test]
    fn test_origin_defaults_to_position() {
        let pose = Pose::from_position(Vec3::X);
        assert_eq!(pose.origin(), Vec3::X);
        let pose = pose.with_origin(Vec3::Z);
        assert_eq!(pose.origin(), Vec3::Z);
    }

    #[test]
    fn test_restore_snapshot() {
        let mut pose = Pose::from_position(Vec3::X).with_origin(Vec3::Y);
        let snapshot = pose.snapshot();
        pose.set_position(Vec3::splat(9.0));
        pose.set_custom_origin(Some(Vec3::splat(4.0)));
        pose.set_rotation(Quat::from_rotation_x(1.0));
        pose.restore(&snapshot);
        assert_eq!(pose.snapshot(), snapshot);
    }

    #[test]
    fn test_stale_handle_after_remove() {
        let mut arena = PoseArena::new();
        let a = arena.insert(Pose::default());
        assert!(arena.remove(a).is_some());
        let b = arena.insert(Pose::from_position(Vec3::X));
        assert_eq!(a.index(), b.index());
        assert!(arena.get(a).is_none());
        assert_eq!(arena.get(b).map(|p| p.position()), Some(Vec3::X));
        assert_eq!(arena.len(), 1);
    }
}
