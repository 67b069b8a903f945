//! Gizmo collision detection utilities
//!
//! Ray casts against the handle shapes: axis-aligned boxes for the
//! translate/scale/rectangle handles, rings for the rotate gizmo and planes
//! for drag projection.

use glam::Vec3;
use xform_core::constants::EPSILON;

/// Ray-AABB intersection test (slab method).
///
/// # Arguments
///
/// * `ray_origin` - The starting point of the ray.
/// * `ray_dir` - The direction of the ray (should be normalized).
/// * `min` / `max` - Corners of the box.
///
/// # Returns
///
/// * `Some(t)` - The ray parameter where the ray enters the box, `0.0` when
///   the origin is already inside.
/// * `None` - If the ray misses the box or the box is behind the ray.
pub fn ray_aabb_intersection(ray_origin: Vec3, ray_dir: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;

    for i in 0..3 {
        let origin = ray_origin[i];
        let dir = ray_dir[i];
        if dir.abs() < EPSILON {
            // Parallel to this slab: must already be between its planes
            if origin < min[i] || origin > max[i] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / dir;
        let mut t0 = (min[i] - origin) * inv;
        let mut t1 = (max[i] - origin) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return None;
        }
    }

    if t_max < 0.0 {
        return None;
    }
    Some(t_min.max(0.0))
}

/// Ray-plane intersection.
///
/// Returns the hit point, or `None` when the ray is parallel to the plane or
/// the plane is behind the ray origin.
pub fn ray_plane_intersection(
    ray_origin: Vec3,
    ray_dir: Vec3,
    plane_point: Vec3,
    plane_normal: Vec3,
) -> Option<Vec3> {
    let denom = ray_dir.dot(plane_normal);
    if denom.abs() < EPSILON {
        return None;
    }

    let t = (plane_point - ray_origin).dot(plane_normal) / denom;
    if t < 0.0 {
        return None;
    }

    Some(ray_origin + ray_dir * t)
}

/// Ray-ring intersection test.
///
/// Tests if a ray intersects with a ring (circle with thickness) in 3D space.
/// The ring is defined by its center, normal (axis), radius, and thickness.
///
/// # Algorithm
///
/// 1. Find intersection of ray with the ring's plane
/// 2. Check if the intersection point is within the ring's annular region
///    (distance from center is close to ring radius, within thickness)
///
/// # Returns
///
/// * `Some(t)` - The ray parameter at the intersection point.
/// * `None` - If the ray does not intersect the ring.
pub fn ray_ring_intersection(
    ray_origin: Vec3,
    ray_dir: Vec3,
    ring_center: Vec3,
    ring_normal: Vec3,
    ring_radius: f32,
    thickness: f32,
) -> Option<f32> {
    let denom = ray_dir.dot(ring_normal);

    // Ray is nearly parallel to the plane
    if denom.abs() < EPSILON {
        return None;
    }

    let t = (ring_center - ray_origin).dot(ring_normal) / denom;

    // Intersection is behind the ray origin
    if t < 0.0 {
        return None;
    }

    let hit_point = ray_origin + ray_dir * t;
    let distance_from_center = (hit_point - ring_center).length();
    let distance_from_ring = (distance_from_center - ring_radius).abs();

    if distance_from_ring <= thickness {
        Some(t)
    } else {
        None
    }
}
