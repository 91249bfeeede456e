//! Camera and view management.

use glam::{Mat4, Quat, Vec3};

/// Closest the orbit may get to the up axis, as a cosine.
const MAX_PITCH_COS: f32 = 0.999;

/// A perspective orbit camera.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Up vector.
    pub up: Vec3,
    /// Field of view in radians.
    pub fov: f32,
    /// Aspect ratio (width / height).
    pub aspect_ratio: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
}

impl Camera {
    /// Creates a new camera with default settings.
    #[must_use]
    pub fn new(aspect_ratio: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: std::f32::consts::FRAC_PI_3, // 60 degrees
            aspect_ratio,
            near: 0.01,
            far: 1000.0,
        }
    }

    /// Sets the aspect ratio.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Returns the view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Returns the projection matrix.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect_ratio, self.near, self.far)
    }

    /// Returns the combined view-projection matrix.
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Returns the camera's forward direction.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    /// Returns the camera's right direction.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalize()
    }

    /// Distance from the eye to the target.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    /// Places the camera on the `front` side of `lookat`, far enough to see
    /// the sphere around `bounds`, scaled by `zoom`.
    pub fn set_viewpoint(
        &mut self,
        front: Vec3,
        lookat: Vec3,
        up: Vec3,
        zoom: f32,
        bounds: Option<(Vec3, Vec3)>,
    ) {
        let (center, radius) = bounds.map_or((lookat, 1.0), |(min, max)| {
            ((min + max) * 0.5, ((max - min).length() * 0.5).max(1e-3))
        });
        // Cover the bounds even when they are not centered on the look-at point.
        let reach = radius + center.distance(lookat);
        let distance = reach / (self.fov * 0.5).tan() * zoom.max(0.01);

        let mut front = front.normalize_or_zero();
        if front == Vec3::ZERO {
            front = Vec3::Z;
        }
        let mut up = up.normalize_or_zero();
        if up == Vec3::ZERO || front.cross(up).length_squared() < 1e-8 {
            up = front.any_orthonormal_vector();
        }

        self.target = lookat;
        self.position = lookat + front * distance;
        self.up = up;
        self.near = (distance * 1e-3).max(1e-4);
        self.far = (distance + reach) * 10.0;
    }

    /// Orbits around the target, turntable style about the up vector.
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        let yaw = Quat::from_axis_angle(self.up, -delta_x);
        let mut offset = yaw * (self.position - self.target);

        let right = offset.cross(self.up).normalize_or_zero();
        if right != Vec3::ZERO {
            let pitched = Quat::from_axis_angle(right, delta_y) * offset;
            if pitched.normalize().dot(self.up).abs() < MAX_PITCH_COS {
                offset = pitched;
            }
        }

        self.position = self.target + offset;
    }

    /// Pans the camera.
    pub fn pan(&mut self, delta_x: f32, delta_y: f32) {
        let right = self.right();
        let up = right.cross(self.forward());
        let offset = right * delta_x + up * delta_y;
        self.position += offset;
        self.target += offset;
    }

    /// Zooms by moving toward/away from the target.
    pub fn zoom(&mut self, delta: f32) {
        let direction = self.forward();
        let distance = self.distance();
        let new_distance = (distance - delta).max(self.near * 2.0);
        self.position = self.target - direction * new_distance;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(16.0 / 9.0)
    }
}
