use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::util::{dot, normalize};

/// Object space geometry of one face, as seen by a shader.
#[derive(Debug, Clone, Copy)]
pub struct FaceGeometry {
    pub positions: [Vector3<f32>; 3],
    pub normals: [Option<Vector3<f32>>; 3], // Raw vertex normals, not necessarily unit length.
    pub face_normal: Vector3<f32>,          // Unit normal of the face.
}

/// Vertex stage of a shading strategy: light intensity at each corner of a face.
/// The rasterizer blends the three values with barycentric weights, so a constant result
/// gives flat shading and distinct values give Gouraud shading.
pub trait Shader: Send + Sync {
    fn vertex_intensities(&self, face: &FaceGeometry, light_direction: Vector3<f32>) -> [f32; 3];
}

/// One intensity for the whole face, from the face normal.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatShader;

impl Shader for FlatShader {
    fn vertex_intensities(&self, face: &FaceGeometry, light_direction: Vector3<f32>) -> [f32; 3] {
        let intensity = dot(face.face_normal, light_direction);
        return [intensity; 3];
    }
}

/// Intensity per vertex from normalized vertex normals. Corners without a usable normal fall back
/// to the face normal.
#[derive(Debug, Clone, Copy, Default)]
pub struct GouraudShader;

impl Shader for GouraudShader {
    fn vertex_intensities(&self, face: &FaceGeometry, light_direction: Vector3<f32>) -> [f32; 3] {
        let mut intensities = [0.0; 3];
        for i in 0..3 {
            let normal = face.normals[i]
                .and_then(|n| normalize(n).ok())
                .unwrap_or(face.face_normal);
            intensities[i] = dot(normal, light_direction);
        }
        return intensities;
    }
}

/// Shading strategy selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShadingMode {
    Flat,
    #[default]
    Gouraud,
}

impl ShadingMode {
    pub fn shader(self) -> Box<dyn Shader> {
        match self {
            ShadingMode::Flat => return Box::new(FlatShader),
            ShadingMode::Gouraud => return Box::new(GouraudShader),
        }
    }
}
