/// First-person fly camera
use nalgebra::{Matrix4, Point3, Vector3};

use crate::transform::Transform;

/// Camera defaults
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    pub yaw: f32,
    pub pitch: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    /// Vertical field of view in degrees
    pub zoom: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            yaw: -90.0,
            pitch: 0.0,
            movement_speed: 5.0,
            mouse_sensitivity: 0.1,
            zoom: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Camera driven by yaw/pitch in degrees
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub world_up: Vector3<f32>,
    pub yaw: f32,
    pub pitch: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    pub zoom: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    front: Vector3<f32>,
    right: Vector3<f32>,
    up: Vector3<f32>,
}

impl Camera {
    pub fn new(position: Point3<f32>, aspect: f32) -> Self {
        Self::with_settings(position, aspect, CameraSettings::default())
    }

    pub fn with_settings(position: Point3<f32>, aspect: f32, settings: CameraSettings) -> Self {
        let mut camera = Self {
            position,
            world_up: Vector3::y(),
            yaw: settings.yaw,
            pitch: settings.pitch,
            movement_speed: settings.movement_speed,
            mouse_sensitivity: settings.mouse_sensitivity,
            zoom: settings.zoom,
            aspect,
            near: settings.near,
            far: settings.far,
            front: -Vector3::z(),
            right: Vector3::x(),
            up: Vector3::y(),
        };
        camera.update_vectors();
        camera
    }

    pub fn eye(&self) -> Point3<f32> {
        self.position
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.front
    }

    pub fn right(&self) -> Vector3<f32> {
        self.right
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Transform::look_at(&self.position, &(self.position + self.front), &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Transform::perspective(self.zoom, self.aspect, self.near, self.far)
    }

    pub fn process_movement(&mut self, direction: CameraMovement, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
            CameraMovement::Up => self.position += self.world_up * velocity,
            CameraMovement::Down => self.position -= self.world_up * velocity,
        }
    }

    /// Turn by raw pointer offsets; positive `dy` looks up
    pub fn process_rotation(&mut self, dx: f32, dy: f32, constrain_pitch: bool) {
        self.yaw += dx * self.mouse_sensitivity;
        self.pitch += dy * self.mouse_sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-89.0, 89.0);
        }
        self.update_vectors();
    }

    pub fn process_zoom(&mut self, delta: f32) {
        self.zoom = (self.zoom - delta).clamp(1.0, 45.0);
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        let front = Vector3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos());

        self.front = front.try_normalize(0.0).unwrap_or(self.front);
        self.right = self.front.cross(&self.world_up).try_normalize(0.0).unwrap_or(self.right);
        self.up = self.right.cross(&self.front).try_normalize(0.0).unwrap_or(self.up);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Point3::new(0.0, 0.0, 3.0), 800.0 / 600.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(Point3::new(0.0, 2.0, 5.0), 16.0 / 9.0);

        assert!((camera.forward() - -Vector3::z()).norm() < 1e-6);
        assert!((camera.right() - Vector3::x()).norm() < 1e-6);
        assert!((camera.up() - Vector3::y()).norm() < 1e-6);
    }

    #[test]
    fn test_view_matrix() {
        let camera = Camera::new(Point3::new(0.0, 2.0, 5.0), 1.0);
        let view = camera.view_matrix();

        let eye = view.transform_point(&camera.eye());
        assert!(eye.coords.norm() < 1e-5);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = Camera::default();
        camera.process_rotation(0.0, 10_000.0, true);

        assert_eq!(camera.pitch, 89.0);
        assert!(camera.forward().y > 0.99);
        assert!((camera.forward().norm() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_movement() {
        let mut camera = Camera::new(Point3::origin(), 1.0);
        camera.process_movement(CameraMovement::Forward, 0.5);
        assert!((camera.position - Point3::new(0.0, 0.0, -2.5)).norm() < 1e-5);

        camera.process_movement(CameraMovement::Up, 1.0);
        assert!((camera.position.y - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = Camera::default();
        camera.process_zoom(100.0);
        assert_eq!(camera.zoom, 1.0);
        camera.process_zoom(-100.0);
        assert_eq!(camera.zoom, 45.0);
    }
}
