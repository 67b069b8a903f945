//! Transform tool settings
//!
//! Persisted options (snap steps, pivot and space modes, key bindings) are
//! serialized as RON. Runtime fields describe the drag in progress and are
//! skipped by serde.

use std::path::Path;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::axis::{Axis, GizmoHandle};
use crate::constants::{
    DEFAULT_GIZMO_SIZE, DEFAULT_MIN_GIZMO_SIZE, DEFAULT_ROTATE_SNAP, DEFAULT_SCALE_SNAP,
    DEFAULT_TRANSLATE_SNAP,
};
use crate::error::SettingsError;

/// Which frame the gizmo axes are expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransformSpace {
    World,
    /// Axes follow the rotation of the last selected object
    #[default]
    Local,
}

/// Pivot used for rotating and scaling a multi-object selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PivotSpace {
    /// Shared pivot at the center of the selection
    #[default]
    Selected,
    /// Each object pivots around its own origin
    Individual,
}

/// Keyboard shortcuts of the transform tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub axis_x: char,
    pub axis_y: char,
    pub axis_z: char,
    /// Gizmo mode selection (only while no drag is active)
    pub translate_gizmo: char,
    pub rotate_gizmo: char,
    pub scale_gizmo: char,
    pub rectangle_gizmo: char,
    /// Start a drag without clicking a gizmo handle
    pub translate: char,
    pub rotate: char,
    pub scale: char,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            axis_x: 'x',
            axis_y: 'y',
            axis_z: 'z',
            translate_gizmo: '1',
            rotate_gizmo: '2',
            scale_gizmo: '3',
            rectangle_gizmo: '4',
            translate: 'g',
            rotate: 'r',
            scale: 's',
        }
    }
}

/// Transform tool configuration and drag state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformSettings {
    /// Gizmo size before being scaled by the camera distance
    pub gizmo_size: f32,
    /// Lower bound for the camera-scaled gizmo size
    pub min_gizmo_size: f32,
    /// Translation snap step per axis (world units)
    pub translate_snap: Vec3,
    /// Scale snap step per axis
    pub scale_snap: Vec3,
    /// Rotation snap step per axis (degrees)
    pub rotate_snap: Vec3,
    /// Snapping is always on (it is also on while the snap modifier is held)
    pub snap_enabled: bool,
    pub space: TransformSpace,
    pub pivot: PivotSpace,
    /// Axes shown on the gizmo; hidden axes cannot be picked
    pub show_x: bool,
    pub show_y: bool,
    pub show_z: bool,
    /// Keep the pivot's height instead of dropping it to the ground plane
    pub vertical_pivot: bool,
    pub display_gizmo: bool,
    /// Middle mouse button starts a scale drag
    pub middle_mouse_scale: bool,
    /// Free drags drop objects onto scene collision
    pub drop_to_collision: bool,
    pub keys: KeyBindings,

    /// Camera-scaled gizmo size, updated every frame
    #[serde(skip)]
    pub gizmo_scale: f32,
    /// Position of the gizmo and shared pivot
    #[serde(skip)]
    pub origin: Vec3,
    /// Rotation of the gizmo frame (identity in world space)
    #[serde(skip)]
    pub rotation: Quat,
    /// Handle of the drag in progress
    #[serde(skip)]
    pub active: GizmoHandle,
    /// Angle of the current rotation drag in degrees, for UI display
    #[serde(skip)]
    pub rotation_angle: f32,
    /// Typed value overriding the mouse-derived magnitude
    #[serde(skip)]
    pub text_input: Option<f32>,
    /// Some member of the selection must keep its height
    #[serde(skip)]
    pub ignore_y: bool,
    /// Drop to collision for the drag in progress
    #[serde(skip)]
    pub collision_detect: bool,
    /// Snap modifier (Ctrl) currently held
    #[serde(skip)]
    pub snap_held: bool,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            gizmo_size: DEFAULT_GIZMO_SIZE,
            min_gizmo_size: DEFAULT_MIN_GIZMO_SIZE,
            translate_snap: Vec3::splat(DEFAULT_TRANSLATE_SNAP),
            scale_snap: Vec3::splat(DEFAULT_SCALE_SNAP),
            rotate_snap: Vec3::splat(DEFAULT_ROTATE_SNAP),
            snap_enabled: false,
            space: TransformSpace::default(),
            pivot: PivotSpace::default(),
            show_x: true,
            show_y: true,
            show_z: true,
            vertical_pivot: false,
            display_gizmo: true,
            middle_mouse_scale: false,
            drop_to_collision: true,
            keys: KeyBindings::default(),
            gizmo_scale: 1.0,
            origin: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            active: GizmoHandle::None,
            rotation_angle: 0.0,
            text_input: None,
            ignore_y: false,
            collision_detect: false,
            snap_held: false,
        }
    }
}

impl TransformSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ron_str(source: &str) -> Result<Self, SettingsError> {
        Ok(ron::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_ron_str(&source)
    }

    pub fn to_ron_string(&self) -> Result<String, SettingsError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }

    pub fn is_local(&self) -> bool {
        self.space == TransformSpace::Local
    }

    pub fn snapping(&self) -> bool {
        self.snap_enabled || self.snap_held
    }

    pub fn active_axis(&self) -> Axis {
        self.active.axis()
    }

    /// Active constraint spans more than one axis (no rotation is shown for it)
    pub fn is_multi_axis(&self) -> bool {
        self.active_axis().is_multi()
    }

    pub fn is_axis_visible(&self, axis: Axis) -> bool {
        (!axis.contains(Axis::X) || self.show_x)
            && (!axis.contains(Axis::Y) || self.show_y)
            && (!axis.contains(Axis::Z) || self.show_z)
    }

    /// Drop the drag-specific state
    pub fn clear_drag_state(&mut self) {
        self.active = GizmoHandle::None;
        self.text_input = None;
        self.rotation_angle = 0.0;
        self.collision_detect = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_snap_steps() {
        let settings = TransformSettings::default();
        assert_eq!(settings.translate_snap, Vec3::splat(0.25));
        assert_eq!(settings.rotate_snap, Vec3::splat(45.0));
        assert_eq!(settings.space, TransformSpace::Local);
        assert_eq!(settings.pivot, PivotSpace::Selected);
    }

    #[test]
    fn test_ron_round_trip_skips_runtime_state() {
        let mut settings = TransformSettings {
            snap_enabled: true,
            pivot: PivotSpace::Individual,
            ..Default::default()
        };
        settings.active = GizmoHandle::Axis(Axis::X);
        settings.text_input = Some(3.0);

        let text = settings.to_ron_string().unwrap();
        let loaded = TransformSettings::from_ron_str(&text).unwrap();
        assert!(loaded.snap_enabled);
        assert_eq!(loaded.pivot, PivotSpace::Individual);
        assert_eq!(loaded.active, GizmoHandle::None);
        assert_eq!(loaded.text_input, None);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let loaded =
            TransformSettings::from_ron_str("(gizmo_size: 0.1, keys: (rotate: 'e'))").unwrap();
        assert_eq!(loaded.gizmo_size, 0.1);
        assert_eq!(loaded.keys.rotate, 'e');
        assert_eq!(loaded.keys.scale, 's');
        assert!(loaded.display_gizmo);
    }

    #[test]
    fn test_save_and_load_file() {
        use tempfile::tempdir;

        let temp = tempdir().unwrap();
        let path = temp.path().join("transform.ron");
        let settings = TransformSettings {
            space: TransformSpace::World,
            rotate_snap: Vec3::splat(15.0),
            ..Default::default()
        };
        settings.save(&path).unwrap();

        let loaded = TransformSettings::load(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp = tempfile::tempdir().unwrap();
        let err = TransformSettings::load(temp.path().join("missing.ron")).unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }

    #[test]
    fn test_invalid_ron_is_parse_error() {
        let err = TransformSettings::from_ron_str("(gizmo_size: \"big\")").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_hidden_axis_not_visible() {
        let settings = TransformSettings {
            show_y: false,
            ..Default::default()
        };
        assert!(settings.is_axis_visible(Axis::X));
        assert!(!settings.is_axis_visible(Axis::XY));
        assert!(settings.is_axis_visible(Axis::ALL));
    }
}
