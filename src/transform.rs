use nalgebra as na;
use na::{Matrix4, Rotation3, Vector3};

use crate::camera::Camera;
use crate::error::Result;
use crate::util::matmul4;

/// Per draw call object placement. Integer units, rotation in degrees applied X, then Y, then Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelTransform {
    pub translation: Vector3<i32>,
    pub scale: Vector3<i32>,
    pub rotation: Vector3<i32>,
}

impl ModelTransform {
    pub fn identity() -> Self {
        return Self {
            translation: Vector3::zeros(),
            scale: Vector3::new(1, 1, 1),
            rotation: Vector3::zeros(),
        };
    }

    pub fn translation_matrix(&self) -> Matrix4<f32> {
        return Matrix4::new_translation(&self.translation.cast::<f32>());
    }

    pub fn scale_matrix(&self) -> Matrix4<f32> {
        return Matrix4::new_nonuniform_scaling(&self.scale.cast::<f32>());
    }

    /// Rx * Ry * Rz.
    pub fn rotation_matrix(&self) -> Matrix4<f32> {
        let rx = rotation_x(self.rotation.x);
        let ry = rotation_y(self.rotation.y);
        let rz = rotation_z(self.rotation.z);
        return matmul4(&matmul4(&rx, &ry), &rz);
    }

    /// T * R * S.
    pub fn matrix(&self) -> Matrix4<f32> {
        return matmul4(
            &matmul4(&self.translation_matrix(), &self.rotation_matrix()),
            &self.scale_matrix(),
        );
    }
}

impl Default for ModelTransform {
    fn default() -> Self {
        return Self::identity();
    }
}

fn rotation_x(degrees: i32) -> Matrix4<f32> {
    return Rotation3::from_axis_angle(&Vector3::x_axis(), (degrees as f32).to_radians()).to_homogeneous();
}

fn rotation_y(degrees: i32) -> Matrix4<f32> {
    return Rotation3::from_axis_angle(&Vector3::y_axis(), (degrees as f32).to_radians()).to_homogeneous();
}

fn rotation_z(degrees: i32) -> Matrix4<f32> {
    return Rotation3::from_axis_angle(&Vector3::z_axis(), (degrees as f32).to_radians()).to_homogeneous();
}

/// All matrices of one draw call. Computed once and shared by every vertex of the call.
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub camera: Matrix4<f32>,    // view * projection.
    pub model: Matrix4<f32>,
    pub composite: Matrix4<f32>, // model * camera, applied to every vertex.
}

impl Transform {
    pub fn new(camera: &Camera, model: &ModelTransform) -> Result<Self> {
        let view = camera.view_matrix()?;
        let projection = camera.projection_matrix();
        let camera = matmul4(&view, &projection);
        let model = model.matrix();
        return Ok(Self {
            view,
            projection,
            camera,
            model,
            composite: matmul4(&model, &camera),
        });
    }

    /// Composite that leaves points untouched, handy for feeding screen space geometry directly.
    pub fn identity() -> Self {
        let i = Matrix4::identity();
        return Self {
            view: i,
            projection: i,
            camera: i,
            model: i,
            composite: i,
        };
    }
}
