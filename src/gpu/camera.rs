//! Orbit camera around the image plane.

use glam::{Mat4, Vec3};

/// Vertical field of view in degrees.
pub const FOV_Y_DEGREES: f32 = 45.0;
/// Closest and farthest allowed orbit distance.
pub const MIN_DISTANCE: f32 = 2.0;
pub const MAX_DISTANCE: f32 = 50.0;

const NEAR: f32 = 0.1;
const FAR: f32 = 1000.0;
const PITCH_LIMIT: f32 = 1.5;
/// Radians per pixel of drag.
const ORBIT_SENSITIVITY: f32 = 0.005;
/// Fractional distance change per wheel line.
const ZOOM_STEP: f32 = 0.1;
/// Idle spin, one turn per minute at unit speed.
const AUTO_ROTATE_RATE: f32 = std::f32::consts::TAU / 60.0;

/// Orbit camera for viewing the point field.
///
/// Starts 15 units in front of the image, looking at its centre.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
}

impl Camera {
    /// Create a new camera with default positioning.
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 15.0,
            target: Vec3::ZERO,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Perspective projection for the given width / height ratio.
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect.max(f32::EPSILON), NEAR, FAR)
    }

    /// Rotate by a pointer drag measured in pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * ORBIT_SENSITIVITY;
        self.pitch = (self.pitch + dy * ORBIT_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Dolly in (positive) or out (negative) by wheel lines.
    pub fn zoom(&mut self, lines: f32) {
        self.distance = (self.distance * (1.0 - lines * ZOOM_STEP)).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Spin around the vertical axis.
    pub fn auto_rotate(&mut self, delta: f32, speed: f32) {
        self.yaw += AUTO_ROTATE_RATE * speed * delta;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_looks_down_z() {
        let camera = Camera::new();
        let pos = camera.position();
        assert!((pos - Vec3::new(0.0, 0.0, 15.0)).length() < 1e-5);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut camera = Camera::new();
        for _ in 0..100 {
            camera.zoom(5.0);
        }
        assert_eq!(camera.distance, MIN_DISTANCE);
        for _ in 0..100 {
            camera.zoom(-5.0);
        }
        assert_eq!(camera.distance, MAX_DISTANCE);
    }

    #[test]
    fn test_pitch_clamped() {
        let mut camera = Camera::new();
        camera.orbit(0.0, 10_000.0);
        assert_eq!(camera.pitch, PITCH_LIMIT);
    }

    #[test]
    fn test_auto_rotate_only_moves_yaw() {
        let mut camera = Camera::new();
        camera.auto_rotate(1.0, 0.5);
        assert!(camera.yaw > 0.0);
        assert_eq!(camera.pitch, 0.0);
        assert_eq!(camera.distance, 15.0);
    }
}
