//! Camera contract used by hit testing and the transform actions

use glam::{Mat4, Vec2, Vec3};
use xform_core::constants::EPSILON;

/// Half-line in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing the direction (zero stays zero)
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// What the transform tools need from the viewport camera
pub trait Camera {
    /// World-space ray through a screen point (pixels, origin top-left)
    fn ray_from_screen_point(&self, point: Vec2) -> Ray;

    /// Project a world point to screen pixels; `None` when behind the camera
    fn world_to_screen(&self, point: Vec3) -> Option<Vec2>;

    /// Eye position
    fn position(&self) -> Vec3;

    /// Unit view direction
    fn forward(&self) -> Vec3;

    /// World size that keeps `size` apparent size at `point`
    fn scale_at_distance(&self, point: Vec3, size: f32) -> f32 {
        (point - self.position()).length() * size
    }

    /// Top-down 2D view; free drags are not coerced to the ground plane
    fn is_2d(&self) -> bool {
        false
    }
}

/// Y-up orbit camera
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Eye position, derived from the orbit parameters
    pub position: Vec3,
    /// Orbit center
    pub target: Vec3,
    /// Up vector
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Viewport size in pixels
    pub viewport: Vec2,
    /// Rotation around the up axis in radians
    pub yaw: f32,
    /// Elevation in radians
    pub pitch: f32,
    /// Distance from the target
    pub distance: f32,
}

impl OrbitCamera {
    /// Create a camera with default orbit parameters
    pub fn new(viewport: Vec2) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 40.0_f32.to_radians(),
            near: 0.1,
            far: 100000.0,
            viewport,
            yaw: 45.0_f32.to_radians(),
            pitch: 30.0_f32.to_radians(),
            distance: 5.0,
        };
        camera.update_position_from_orbit();
        camera
    }

    /// Create a camera at `position` looking at `target`
    pub fn looking_at(position: Vec3, target: Vec3, viewport: Vec2) -> Self {
        let offset = position - target;
        let distance = offset.length().max(0.1);
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        let yaw = offset.x.atan2(offset.z);
        let mut camera = Self::new(viewport);
        camera.target = target;
        camera.distance = distance;
        camera.yaw = yaw;
        camera.pitch = pitch.clamp(-89.0_f32.to_radians(), 89.0_f32.to_radians());
        camera.update_position_from_orbit();
        camera
    }

    /// Width over height
    pub fn aspect(&self) -> f32 {
        if self.viewport.y > 0.0 {
            self.viewport.x / self.viewport.y
        } else {
            1.0
        }
    }

    fn update_position_from_orbit(&mut self) {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.position = self.target + Vec3::new(x, y, z);
    }

    /// Get view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Get projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect(), self.near, self.far)
    }

    /// Projection times view
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

impl Camera for OrbitCamera {
    fn ray_from_screen_point(&self, point: Vec2) -> Ray {
        // Convert to normalized device coordinates
        let ndc_x = (2.0 * point.x / self.viewport.x) - 1.0;
        let ndc_y = 1.0 - (2.0 * point.y / self.viewport.y);

        let inv_view_proj = self.view_projection().inverse();
        let near_world = inv_view_proj.project_point3(Vec3::new(ndc_x, ndc_y, 0.0));
        let far_world = inv_view_proj.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));

        Ray::new(near_world, far_world - near_world)
    }

    fn world_to_screen(&self, point: Vec3) -> Option<Vec2> {
        let clip = self.view_projection() * point.extend(1.0);
        if clip.w <= EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (1.0 - ndc.y) * 0.5 * self.viewport.y,
        ))
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }
}
