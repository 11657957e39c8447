use nalgebra as na;
use na::{vector, Matrix4, Vector3, Vector4};

use crate::error::{RenderError, Result};

/// Point in screen space - x, y give pixel index and z gives depth, larger is closer to the camera.
/// i32 to allow coordinates outside of the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
    pub z: f32,
}

/// Component-wise sum of 2 Vector3's.
pub fn sum(a: Vector3<f32>, b: Vector3<f32>) -> Vector3<f32> {
    return a + b;
}

/// Component-wise difference of 2 Vector3's.
pub fn diff(a: Vector3<f32>, b: Vector3<f32>) -> Vector3<f32> {
    return a - b;
}

/// Cross product of 2 Vector3's. Zero vector for parallel or zero inputs.
pub fn cross(a: Vector3<f32>, b: Vector3<f32>) -> Vector3<f32> {
    return a.cross(&b);
}

/// Dot product of 2 Vector3's.
pub fn dot(a: Vector3<f32>, b: Vector3<f32>) -> f32 {
    return a.dot(&b);
}

/// Euclidean norm of a Vector3.
pub fn length(v: Vector3<f32>) -> f32 {
    return v.norm();
}

/// Unit vector with the direction of v.
/// Zero-length and non-finite inputs have no direction and are reported as degenerate.
pub fn normalize(v: Vector3<f32>) -> Result<Vector3<f32>> {
    let l = length(v);
    if l == 0.0 || !l.is_finite() {
        return Err(RenderError::DegenerateGeometry(format!(
            "cannot normalize vector of length {}",
            l
        )));
    }
    return Ok(v / l);
}

/// Standard 4x4 matrix product a * b.
pub fn matmul4(a: &Matrix4<f32>, b: &Matrix4<f32>) -> Matrix4<f32> {
    return a * b;
}

/// Transformation of a point to homogenous coordinates.
pub fn to_hom_point(v: Vector3<f32>) -> Vector4<f32> {
    return vector![v.x, v.y, v.z, 1.0];
}

/// Applies m to v as a point, does the perspective divide and truncates x, y to pixel indices.
/// Depth is kept as a float.
pub fn transform_point(v: Vector3<f32>, m: &Matrix4<f32>) -> Result<ScreenPoint> {
    let h = m * to_hom_point(v);
    if h.w == 0.0 || !h.w.is_finite() {
        return Err(RenderError::DegenerateGeometry(format!(
            "homogeneous w is {} for point ({}, {}, {})",
            h.w, v.x, v.y, v.z
        )));
    }
    let x = h.x / h.w;
    let y = h.y / h.w;
    let z = h.z / h.w;
    if !(x.is_finite() && y.is_finite() && z.is_finite()) {
        return Err(RenderError::DegenerateGeometry(format!(
            "projected point ({}, {}, {}) is not finite",
            x, y, z
        )));
    }
    // Truncation towards zero, same as a float to int cast.
    return Ok(ScreenPoint {
        x: x as i32,
        y: y as i32,
        z,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use na::matrix;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_sum_and_diff() {
        let a = vector![1.0, 2.0, 3.0];
        let b = vector![0.5, -2.0, 4.0];
        assert_eq!(sum(a, b), vector![1.5, 0.0, 7.0]);
        assert_eq!(diff(a, b), vector![0.5, 4.0, -1.0]);
    }

    #[test]
    fn test_cross_is_perpendicular() {
        let a = vector![1.0, 2.0, 3.0];
        let b = vector![-2.0, 0.5, 1.0];
        let c = cross(a, b);
        assert!(dot(c, a).abs() < EPS);
        assert!(dot(c, b).abs() < EPS);
        assert_eq!(cross(vector![1.0, 0.0, 0.0], vector![0.0, 1.0, 0.0]), vector![0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_cross_of_parallel_is_zero() {
        let a = vector![1.0, 2.0, 3.0];
        assert_eq!(cross(a, 2.0 * a), Vector3::zeros());
    }

    #[test]
    fn test_normalize_unit_length_same_direction() {
        for v in [vector![3.0, 4.0, 0.0], vector![-0.1, 0.02, 7.0], vector![1e-3, 1e-3, 1e-3]] {
            let n = normalize(v).unwrap();
            assert!((length(n) - 1.0).abs() < EPS);
            assert!(dot(n, v) > 0.0);
        }
    }

    #[test]
    fn test_normalize_zero_is_degenerate() {
        let err = normalize(Vector3::zeros()).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_matmul4_associative() {
        let a = matrix![1.0, 2.0, 0.0, 1.0;
                        0.0, 1.0, 3.0, 0.0;
                        2.0, 0.0, 1.0, 4.0;
                        0.0, 0.0, 0.5, 1.0];
        let b = matrix![0.0, 1.0, 0.0, 2.0;
                        1.0, 0.0, 0.0, 0.0;
                        0.0, 0.0, 2.0, 1.0;
                        1.0, 1.0, 0.0, 1.0];
        let c = matrix![3.0, 0.0, 1.0, 0.0;
                        0.0, 0.5, 0.0, 1.0;
                        1.0, 0.0, 1.0, 0.0;
                        0.0, 2.0, 0.0, 1.0];
        let left = matmul4(&matmul4(&a, &b), &c);
        let right = matmul4(&a, &matmul4(&b, &c));
        assert!((left - right).norm() < 1e-3);
    }

    #[test]
    fn test_matmul4_row_by_column() {
        let a = matrix![1.0, 2.0, 3.0, 4.0;
                        0.0, 0.0, 0.0, 0.0;
                        0.0, 0.0, 0.0, 0.0;
                        0.0, 0.0, 0.0, 0.0];
        let b = Matrix4::from_element(1.0);
        assert_eq!(matmul4(&a, &b)[(0, 3)], 10.0);
    }

    #[test]
    fn test_transform_point_perspective_divide_truncates() {
        let m = matrix![1.0, 0.0, 0.0, 0.0;
                        0.0, 1.0, 0.0, 0.0;
                        0.0, 0.0, 1.0, 0.0;
                        0.0, 0.0, 0.0, 2.0];
        let p = transform_point(vector![7.0, -5.0, 3.0], &m).unwrap();
        assert_eq!(p.x, 3);
        assert_eq!(p.y, -2);
        assert!((p.z - 1.5).abs() < EPS);
    }

    #[test]
    fn test_transform_point_zero_w_is_degenerate() {
        let m = matrix![1.0, 0.0, 0.0, 0.0;
                        0.0, 1.0, 0.0, 0.0;
                        0.0, 0.0, 1.0, 0.0;
                        0.0, 0.0, 1.0, 1.0];
        // w = z + 1 = 0.
        let err = transform_point(vector![0.0, 0.0, -1.0], &m).unwrap_err();
        assert!(matches!(err, RenderError::DegenerateGeometry(_)));
    }
}
