//! Axis-aligned bounds of a selection.

use glam::{Mat4, Vec3};

use crate::constants::FALLBACK_BOX_HALF_SIZE;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner of the bounding box.
    pub min: Vec3,
    /// Maximum corner of the bounding box.
    pub max: Vec3,
}

impl BoundingBox {
    /// Creates a new bounding box from min and max points.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Creates an empty (inverted) bounding box.
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    /// The box used when there is nothing to measure, centered at zero.
    pub fn fallback() -> Self {
        Self::from_center_half_extents(Vec3::ZERO, Vec3::splat(FALLBACK_BOX_HALF_SIZE))
    }

    /// Creates a bounding box from a center point and half-extents.
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Creates a bounding box that contains all given points.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut bbox = Self::empty();
        for point in points {
            bbox = bbox.expand_to_include(point);
        }
        bbox
    }

    /// Returns the center of the bounding box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Returns the size (full extents) of the bounding box.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Returns true if the bounding box contains the given point.
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Returns the union of two bounding boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Returns a new bounding box expanded to include the given point.
    pub fn expand_to_include(&self, point: Vec3) -> BoundingBox {
        BoundingBox {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// Returns the box moved by `offset`.
    pub fn translated(&self, offset: Vec3) -> BoundingBox {
        BoundingBox {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Transforms the bounding box by the given matrix.
    ///
    /// Returns the axis-aligned box around the transformed corners.
    pub fn transform(&self, transform: &Mat4) -> BoundingBox {
        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];

        BoundingBox::from_points(corners.map(|c| transform.transform_point3(c)))
    }

    /// Returns true if the bounding box is valid (non-empty).
    pub fn is_valid(&self) -> bool {
        self.min.cmple(self.max).all()
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_center() {
        let bbox = BoundingBox::new(Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(bbox.center(), Vec3::ZERO);
        assert_eq!(bbox.size(), Vec3::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn test_empty_box_is_invalid_until_expanded() {
        let bbox = BoundingBox::empty();
        assert!(!bbox.is_valid());
        let bbox = bbox.expand_to_include(Vec3::new(1.0, 2.0, 3.0));
        assert!(bbox.is_valid());
        assert_eq!(bbox.size(), Vec3::ZERO);
    }

    #[test]
    fn test_fallback_box_is_centered() {
        let bbox = BoundingBox::fallback();
        assert_eq!(bbox.center(), Vec3::ZERO);
        assert!(bbox.contains_point(Vec3::splat(0.9)));
        assert!(!bbox.contains_point(Vec3::new(1.5, 0.0, 0.0)));
    }

    #[test]
    fn test_transform_scales_and_moves() {
        let bbox = BoundingBox::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let mtx = Mat4::from_translation(Vec3::X * 5.0) * Mat4::from_scale(Vec3::splat(2.0));
        let moved = bbox.transform(&mtx);
        assert_eq!(moved.min, Vec3::new(3.0, -2.0, -2.0));
        assert_eq!(moved.max, Vec3::new(7.0, 2.0, 2.0));
    }
}
