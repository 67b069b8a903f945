//! Snapping helpers

use glam::Vec3;

/// Round `value` to the nearest multiple of `step`. A non-positive step disables snapping.
pub fn snap_value(value: f32, step: f32) -> f32 {
    if step <= 0.0 || !step.is_finite() {
        return value;
    }
    (value / step).round() * step
}

/// Component-wise [`snap_value`]
pub fn snap_vec3(value: Vec3, steps: Vec3) -> Vec3 {
    Vec3::new(
        snap_value(value.x, steps.x),
        snap_value(value.y, steps.y),
        snap_value(value.z, steps.z),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_nearest_step() {
        assert_eq!(snap_value(1.10, 0.25), 1.0);
        assert_eq!(snap_value(1.13, 0.25), 1.25);
        assert_eq!(snap_value(-0.6, 0.25), -0.5);
        assert_eq!(snap_value(100.0, 45.0), 90.0);
    }

    #[test]
    fn test_zero_step_disables_snapping() {
        assert_eq!(snap_value(1.1, 0.0), 1.1);
        assert_eq!(
            snap_vec3(Vec3::new(1.1, 0.3, 2.0), Vec3::new(0.25, 0.0, 1.0)),
            Vec3::new(1.0, 0.3, 2.0)
        );
    }
}
