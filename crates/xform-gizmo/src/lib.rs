//! Camera contract and gizmo hit geometry
//!
//! Everything here is a pure function of its inputs so hit resolution can be
//! tested without a rendering context.

pub mod camera;
pub mod collision;
pub mod hit;

pub use camera::{Camera, OrbitCamera, Ray};
pub use collision::{ray_aabb_intersection, ray_plane_intersection, ray_ring_intersection};
pub use hit::{GizmoPose, TransformMode, resolve_handle};
