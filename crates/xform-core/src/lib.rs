//! Transform tool data model
//!
//! Shared types for the viewport transform tools:
//! - [`Axis`] / [`RectHandle`] / [`GizmoHandle`] - what a drag is constrained to
//! - [`Pose`] / [`PoseArena`] - manipulable object poses addressed by handle
//! - [`BoundingBox`] - selection bounds
//! - [`TransformSettings`] - persisted tool configuration plus per-drag runtime state

pub mod axis;
pub mod bounds;
pub mod constants;
pub mod error;
pub mod pose;
pub mod settings;
pub mod snap;

pub use axis::{Axis, GizmoHandle, RectHandle, Side};
pub use bounds::BoundingBox;
pub use error::SettingsError;
pub use pose::{Pose, PoseArena, PoseHandle, PoseSnapshot};
pub use settings::{KeyBindings, PivotSpace, TransformSettings, TransformSpace};
pub use snap::{snap_value, snap_vec3};
