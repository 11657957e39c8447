use nalgebra as na;
use na::{matrix, Matrix4, Vector3};

use crate::error::Result;
use crate::util::{cross, diff, dot, length, matmul4, normalize};

/// Look-at camera: eye position, point it looks at and an up hint.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    pub fn new(eye: Vector3<f32>, target: Vector3<f32>, up: Vector3<f32>) -> Self {
        return Self { eye, target, up };
    }

    /// Distance between the eye and the target.
    pub fn distance(&self) -> f32 {
        return length(diff(self.eye, self.target));
    }

    /// Change of basis into the camera frame, followed by translation of the eye to the origin.
    /// Fails if the eye sits on the target or the up hint is parallel to the view direction.
    pub fn view_matrix(&self) -> Result<Matrix4<f32>> {
        // New coordinate system r, u, f around camera position, f pointing back at the eye.
        let f = normalize(diff(self.eye, self.target))?;
        let r = normalize(cross(self.up, f))?;
        let u = normalize(cross(f, r))?;
        let e = self.eye;
        return Ok(matrix![r.x, r.y, r.z, -dot(e, r);
                          u.x, u.y, u.z, -dot(e, u);
                          f.x, f.y, f.z, -dot(e, f);
                          0.0, 0.0, 0.0, 1.0]);
    }

    /// Single parameter perspective: w grows with z by 1 / distance to the target.
    /// Not a field of view projection.
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let distance = self.distance();
        let coef = if distance == 0.0 { 0.0 } else { 1.0 / distance };
        return matrix![1.0, 0.0, 0.0,  0.0;
                       0.0, 1.0, 0.0,  0.0;
                       0.0, 0.0, 1.0,  0.0;
                       0.0, 0.0, coef, 1.0];
    }

    /// Combined camera transform, view * projection.
    pub fn transform(&self) -> Result<Matrix4<f32>> {
        return Ok(matmul4(&self.view_matrix()?, &self.projection_matrix()));
    }
}

impl Default for Camera {
    fn default() -> Self {
        return Self {
            eye: Vector3::new(1.0, 1.0, 3.0),
            target: Vector3::zeros(),
            up: Vector3::new(0.0, 1.0, 0.0),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use na::vector;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_view_matrix_axis_aligned() {
        let camera = Camera::new(vector![0.0, 0.0, 1.0], Vector3::zeros(), vector![0.0, 1.0, 0.0]);
        let view = camera.view_matrix().unwrap();
        let expected = matrix![1.0, 0.0, 0.0,  0.0;
                               0.0, 1.0, 0.0,  0.0;
                               0.0, 0.0, 1.0, -1.0;
                               0.0, 0.0, 0.0,  1.0];
        assert!((view - expected).norm() < EPS);
    }

    #[test]
    fn test_view_basis_is_orthonormal() {
        let camera = Camera::default();
        let view = camera.view_matrix().unwrap();
        let basis = view.fixed_slice::<3, 3>(0, 0).into_owned();
        assert!((basis * basis.transpose() - na::Matrix3::identity()).norm() < EPS);
    }

    #[test]
    fn test_view_maps_eye_to_origin() {
        let camera = Camera::default();
        let view = camera.view_matrix().unwrap();
        let eye = view * vector![1.0, 1.0, 3.0, 1.0];
        assert!(eye.xyz().norm() < EPS);
        // Target lies straight ahead, along -f.
        let target = view * vector![0.0, 0.0, 0.0, 1.0];
        assert!(target.x.abs() < EPS && target.y.abs() < EPS);
        assert!((target.z + camera.distance()).abs() < EPS);
    }

    #[test]
    fn test_projection_coefficient() {
        let camera = Camera::new(vector![0.0, 0.0, 4.0], Vector3::zeros(), vector![0.0, 1.0, 0.0]);
        let projection = camera.projection_matrix();
        assert!((projection[(3, 2)] - 0.25).abs() < EPS);
        assert_eq!(projection[(3, 3)], 1.0);
        assert_eq!(projection[(0, 0)], 1.0);
    }

    #[test]
    fn test_projection_zero_distance() {
        let camera = Camera::new(Vector3::zeros(), Vector3::zeros(), vector![0.0, 1.0, 0.0]);
        assert_eq!(camera.projection_matrix(), Matrix4::identity());
    }

    #[test]
    fn test_eye_on_target_is_degenerate() {
        let camera = Camera::new(Vector3::zeros(), Vector3::zeros(), vector![0.0, 1.0, 0.0]);
        assert!(camera.view_matrix().unwrap_err().is_recoverable());
        assert!(camera.transform().is_err());
    }

    #[test]
    fn test_up_parallel_to_forward_is_degenerate() {
        let camera = Camera::new(vector![0.0, 2.0, 0.0], Vector3::zeros(), vector![0.0, 1.0, 0.0]);
        assert!(camera.view_matrix().is_err());
    }

    #[test]
    fn test_transform_is_view_times_projection() {
        let camera = Camera::default();
        let expected = camera.view_matrix().unwrap() * camera.projection_matrix();
        assert!((camera.transform().unwrap() - expected).norm() < EPS);
    }
}
