/// Per-entity placement state
use nalgebra::{Matrix4, Vector3};

use crate::transform::Transform;

/// Position, Euler rotation (degrees) and scale with a derived model matrix.
///
/// The model matrix is rebuilt inside every setter, so callers always read a
/// matrix that matches the current components.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectTransform {
    position: Vector3<f32>,
    rotation: Vector3<f32>,
    scale: Vector3<f32>,
    model: Matrix4<f32>,
}

impl ObjectTransform {
    pub fn new() -> Self {
        Self::from_parts(Vector3::zeros(), Vector3::zeros(), Vector3::repeat(1.0))
    }

    pub fn from_parts(position: Vector3<f32>, rotation: Vector3<f32>, scale: Vector3<f32>) -> Self {
        Self {
            position,
            rotation,
            scale,
            model: Transform::compose_model(&position, &rotation, &scale),
        }
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn rotation(&self) -> Vector3<f32> {
        self.rotation
    }

    pub fn scale(&self) -> Vector3<f32> {
        self.scale
    }

    pub fn model_matrix(&self) -> &Matrix4<f32> {
        &self.model
    }

    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
        self.update_model_matrix();
    }

    pub fn set_rotation(&mut self, rotation: Vector3<f32>) {
        self.rotation = rotation;
        self.update_model_matrix();
    }

    pub fn set_scale(&mut self, scale: Vector3<f32>) {
        self.scale = scale;
        self.update_model_matrix();
    }

    /// Add `delta` degrees to the current rotation
    pub fn rotate(&mut self, delta: Vector3<f32>) {
        self.set_rotation(self.rotation + delta);
    }

    fn update_model_matrix(&mut self) {
        self.model = Transform::compose_model(&self.position, &self.rotation, &self.scale);
    }
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_default_is_identity() {
        let transform = ObjectTransform::new();
        assert_eq!(*transform.model_matrix(), Matrix4::identity());
    }

    #[test]
    fn test_setters_refresh_matrix() {
        let mut transform = ObjectTransform::new();

        transform.set_position(Vector3::new(2.0, 0.0, 0.0));
        let p = transform.model_matrix().transform_point(&Point3::origin());
        assert!((p.coords - Vector3::new(2.0, 0.0, 0.0)).norm() < 1e-6);

        transform.set_scale(Vector3::new(3.0, 3.0, 3.0));
        let p = transform.model_matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((p.coords - Vector3::new(5.0, 0.0, 0.0)).norm() < 1e-6);

        transform.set_rotation(Vector3::new(0.0, 0.0, 90.0));
        let p = transform.model_matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((p.coords - Vector3::new(2.0, 3.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn test_rotate_accumulates() {
        let mut transform = ObjectTransform::new();
        transform.rotate(Vector3::new(0.0, 30.0, 0.0));
        transform.rotate(Vector3::new(0.0, 15.0, 0.0));

        assert!((transform.rotation().y - 45.0).abs() < 1e-6);
        let expected = Transform::rotation(&Vector3::new(0.0, 45.0, 0.0));
        assert!((transform.model_matrix() - expected).norm() < 1e-6);
    }
}
