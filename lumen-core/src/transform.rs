/// 3D transformation matrices
///
/// All builders are pure. Matrices cross the shading contract as 16
/// contiguous floats in column-major order, see [`Transform::to_column_major`].
use nalgebra::{Matrix4, Point3, Vector3};

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Rotation from Euler angles in degrees.
    ///
    /// The X rotation is applied first, then Y, then Z: `R = Rz * Ry * Rx`.
    pub fn rotation(euler_degrees: &Vector3<f32>) -> Matrix4<f32> {
        let rx = Matrix4::from_axis_angle(&Vector3::x_axis(), euler_degrees.x.to_radians());
        let ry = Matrix4::from_axis_angle(&Vector3::y_axis(), euler_degrees.y.to_radians());
        let rz = Matrix4::from_axis_angle(&Vector3::z_axis(), euler_degrees.z.to_radians());

        rz * ry * rx
    }

    /// Create a translation matrix
    pub fn translation(t: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_translation(t)
    }

    /// Create a scale matrix
    pub fn scale(s: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(s)
    }

    /// Matrix product `a * b`
    pub fn multiply(a: &Matrix4<f32>, b: &Matrix4<f32>) -> Matrix4<f32> {
        a * b
    }

    /// Model matrix `T * (R * S)`: scale, then rotate, then translate
    pub fn compose_model(
        translation: &Vector3<f32>,
        rotation_degrees: &Vector3<f32>,
        scale: &Vector3<f32>,
    ) -> Matrix4<f32> {
        let rs = Self::multiply(&Self::rotation(rotation_degrees), &Self::scale(scale));
        Self::multiply(&Self::translation(translation), &rs)
    }

    /// Right-handed view matrix looking from `eye` towards `target`
    pub fn look_at(eye: &Point3<f32>, target: &Point3<f32>, up: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::look_at_rh(eye, target, up)
    }

    /// OpenGL-style perspective projection (clip depth in [-1, 1])
    pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Matrix4<f32> {
        Matrix4::new_perspective(aspect, fov_degrees.to_radians(), near, far)
    }

    /// Object space straight to clip space: `projection * view * model`
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }

    /// Wire layout of a matrix: 16 floats, column by column
    pub fn to_column_major(m: &Matrix4<f32>) -> [f32; 16] {
        let mut out = [0.0; 16];
        out.copy_from_slice(m.as_slice());
        out
    }

    pub fn from_column_major(values: &[f32; 16]) -> Matrix4<f32> {
        Matrix4::from_column_slice(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: &Vector3<f32>, b: &Vector3<f32>) -> bool {
        (a - b).norm() < 1e-5
    }

    #[test]
    fn test_identity_rotation() {
        let matrix = Transform::rotation(&Vector3::zeros());
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_rotation_applies_x_then_y() {
        // X by 90 takes +y to +z, Y by 90 then takes +z to +x
        let r = Transform::rotation(&Vector3::new(90.0, 90.0, 0.0));
        let v = r.transform_vector(&Vector3::y());
        assert!(approx(&v, &Vector3::x()));
    }

    #[test]
    fn test_rotation_applies_y_then_z() {
        // Y by 90 takes +x to -z, Z leaves -z alone
        let r = Transform::rotation(&Vector3::new(0.0, 90.0, 90.0));
        let v = r.transform_vector(&Vector3::x());
        assert!(approx(&v, &-Vector3::z()));

        // Y by 90 takes +z to +x, Z by 90 then takes +x to +y
        let v = r.transform_vector(&Vector3::z());
        assert!(approx(&v, &Vector3::y()));
    }

    #[test]
    fn test_translation_only_model() {
        let model = Transform::compose_model(
            &Vector3::new(2.0, 0.0, 0.0),
            &Vector3::zeros(),
            &Vector3::repeat(1.0),
        );
        let origin = model.transform_point(&Point3::origin());
        assert!(approx(&origin.coords, &Vector3::new(2.0, 0.0, 0.0)));

        let upper = model.fixed_view::<3, 3>(0, 0).into_owned();
        assert!((upper - nalgebra::Matrix3::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_model_scales_before_translating() {
        let model = Transform::compose_model(
            &Vector3::new(0.0, 1.0, 0.0),
            &Vector3::new(0.0, 0.0, 90.0),
            &Vector3::new(2.0, 1.0, 1.0),
        );
        // (1,0,0) -> scale (2,0,0) -> rotate z 90 (0,2,0) -> translate (0,3,0)
        let p = model.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!(approx(&p.coords, &Vector3::new(0.0, 3.0, 0.0)));
    }

    #[test]
    fn test_multiply_is_matrix_product() {
        let a = Transform::translation(&Vector3::new(1.0, 2.0, 3.0));
        let b = Transform::scale(&Vector3::new(2.0, 2.0, 2.0));
        let c = Transform::multiply(&a, &b);

        assert_eq!(c[(0, 0)], 2.0);
        assert_eq!(c[(0, 3)], 1.0);
        // element-wise product would have zeroed the translation column
        assert_ne!(c, a.component_mul(&b));
    }

    #[test]
    fn test_column_major_layout() {
        let m = Transform::translation(&Vector3::new(4.0, 5.0, 6.0));
        let flat = Transform::to_column_major(&m);

        assert_eq!(&flat[12..15], &[4.0, 5.0, 6.0]);
        assert_eq!(flat[15], 1.0);
        assert_eq!(Transform::from_column_major(&flat), m);
    }

    #[test]
    fn test_look_at_moves_eye_to_origin() {
        let eye = Point3::new(0.0, 2.0, 5.0);
        let view = Transform::look_at(&eye, &Point3::new(0.0, 2.0, 0.0), &Vector3::y());

        let e = view.transform_point(&eye);
        assert!(approx(&e.coords, &Vector3::zeros()));
        let ahead = view.transform_point(&Point3::new(0.0, 2.0, 0.0));
        assert!(approx(&ahead.coords, &Vector3::new(0.0, 0.0, -5.0)));
    }

    #[test]
    fn test_perspective_maps_near_and_far() {
        let proj = Transform::perspective(45.0, 16.0 / 9.0, 0.1, 100.0);

        let near = proj.transform_point(&Point3::new(0.0, 0.0, -0.1));
        let far = proj.transform_point(&Point3::new(0.0, 0.0, -100.0));
        assert!((near.z + 1.0).abs() < 1e-4);
        assert!((far.z - 1.0).abs() < 1e-4);

        let f = 1.0 / (22.5f32.to_radians()).tan();
        assert!((proj[(1, 1)] - f).abs() < 1e-5);
        assert!((proj[(0, 0)] - f * 9.0 / 16.0).abs() < 1e-5);
    }

    #[test]
    fn test_mvp_applies_model_first() {
        let model = Transform::translation(&Vector3::new(2.0, 0.0, 0.0));
        let view = Transform::look_at(&Point3::new(0.0, 0.0, 5.0), &Point3::origin(), &Vector3::y());
        let projection = Transform::perspective(45.0, 1.0, 0.1, 100.0);

        let mvp = Transform::mvp_matrix(&model, &view, &projection);
        assert_eq!(mvp, projection * view * model);
        assert_ne!(mvp, model * view * projection);

        let clip = mvp * Point3::origin().to_homogeneous();
        assert!((clip.w - 5.0).abs() < 1e-4);
        let f = 1.0 / (22.5f32.to_radians()).tan();
        assert!((clip.x / clip.w - 2.0 * f / 5.0).abs() < 1e-4);
    }
}
