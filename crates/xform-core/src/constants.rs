//! Global constants for xform-core

/// Lengths below this are treated as zero (degenerate rays, axes and drags)
pub const EPSILON: f32 = 1e-6;

/// Smallest extent a rectangle-scaled box may shrink to along any axis
pub const MIN_BOX_EXTENT: f32 = 1e-4;

/// Half-size of the box used when a selection has no extent
pub const FALLBACK_BOX_HALF_SIZE: f32 = 1.0;

/// Default gizmo size before camera-distance scaling
pub const DEFAULT_GIZMO_SIZE: f32 = 0.05;

/// Default lower bound for the camera-scaled gizmo size
pub const DEFAULT_MIN_GIZMO_SIZE: f32 = 0.01;

/// Default translation snap step (world units)
pub const DEFAULT_TRANSLATE_SNAP: f32 = 0.25;

/// Default scale snap step (scale factor)
pub const DEFAULT_SCALE_SNAP: f32 = 0.25;

/// Default rotation snap step (degrees)
pub const DEFAULT_ROTATE_SNAP: f32 = 45.0;
