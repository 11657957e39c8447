use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use nalgebra::Vector3;
use obj::raw::object::Polygon;
use obj::raw::{parse_obj, RawObj};

use crate::error::{RenderError, Result};

/// One corner of a face: 0-based indices into the mesh vertex and normal lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corner {
    pub vertex: usize,
    pub normal: Option<usize>,
}

/// Triangle as three corners, in winding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub corners: [Corner; 3],
}

impl Face {
    pub fn new(corners: [Corner; 3]) -> Self {
        return Self { corners };
    }
}

/// Immutable triangulated mesh. Every face index is guaranteed to resolve.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    vertices: Vec<Vector3<f32>>,
    normals: Vec<Vector3<f32>>,
    faces: Vec<Face>,
}

impl Mesh {
    /// Builds a mesh from parts, failing with `MalformedInput` on any dangling index.
    pub fn new(vertices: Vec<Vector3<f32>>, normals: Vec<Vector3<f32>>, faces: Vec<Face>) -> Result<Self> {
        let mesh = Self {
            vertices,
            normals,
            faces,
        };
        mesh.validate()?;
        return Ok(mesh);
    }

    /// Loads a Wavefront OBJ file. Only `v`, `vn` and `f` records matter, anything else is ignored.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        return Self::from_reader(BufReader::new(file));
    }

    /// Parses OBJ text. Unparseable numbers fail the whole load rather than turning into zeros.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let raw = parse_obj(reader)?;
        return Self::from_raw(raw);
    }

    fn from_raw(raw: RawObj) -> Result<Self> {
        let vertices = raw
            .positions
            .iter()
            .map(|&(x, y, z, _)| Vector3::new(x, y, z))
            .collect();
        let normals = raw
            .normals
            .iter()
            .map(|&(x, y, z)| Vector3::new(x, y, z))
            .collect();

        let mut faces = Vec::with_capacity(raw.polygons.len());
        for (index, polygon) in raw.polygons.iter().enumerate() {
            // Texture coordinates are of no use here and are dropped.
            let corners: Vec<Corner> = match polygon {
                Polygon::P(v) => v.iter().map(|&p| Corner { vertex: p, normal: None }).collect(),
                Polygon::PT(v) => v.iter().map(|&(p, _)| Corner { vertex: p, normal: None }).collect(),
                Polygon::PN(v) => v.iter().map(|&(p, n)| Corner { vertex: p, normal: Some(n) }).collect(),
                Polygon::PTN(v) => v.iter().map(|&(p, _, n)| Corner { vertex: p, normal: Some(n) }).collect(),
            };
            if corners.len() < 3 {
                return Err(RenderError::MalformedInput(format!(
                    "face {} has {} corners, at least 3 are required",
                    index,
                    corners.len()
                )));
            }
            // Fan triangulation keeps the winding of convex polygons.
            for k in 1..corners.len() - 1 {
                faces.push(Face::new([corners[0], corners[k], corners[k + 1]]));
            }
        }

        return Self::new(vertices, normals, faces);
    }

    /// Checks that every face index resolves within the vertex and normal lists.
    pub fn validate(&self) -> Result<()> {
        for (index, face) in self.faces.iter().enumerate() {
            for corner in &face.corners {
                if corner.vertex >= self.vertices.len() {
                    return Err(RenderError::MalformedInput(format!(
                        "face {} references vertex {} of {}",
                        index,
                        corner.vertex,
                        self.vertices.len()
                    )));
                }
                if let Some(normal) = corner.normal {
                    if normal >= self.normals.len() {
                        return Err(RenderError::MalformedInput(format!(
                            "face {} references normal {} of {}",
                            index,
                            normal,
                            self.normals.len()
                        )));
                    }
                }
            }
        }
        return Ok(());
    }

    pub fn vertices(&self) -> &[Vector3<f32>] {
        return &self.vertices[..];
    }

    pub fn normals(&self) -> &[Vector3<f32>] {
        return &self.normals[..];
    }

    pub fn faces(&self) -> &[Face] {
        return &self.faces[..];
    }

    /// Positions and raw normals of a face's corners.
    pub fn resolve(&self, face: &Face) -> Result<([Vector3<f32>; 3], [Option<Vector3<f32>>; 3])> {
        let mut positions = [Vector3::zeros(); 3];
        let mut normals = [None; 3];
        for (i, corner) in face.corners.iter().enumerate() {
            positions[i] = *self.vertices.get(corner.vertex).ok_or_else(|| {
                RenderError::MalformedInput(format!("vertex index {} out of range", corner.vertex))
            })?;
            normals[i] = match corner.normal {
                Some(n) => Some(*self.normals.get(n).ok_or_else(|| {
                    RenderError::MalformedInput(format!("normal index {} out of range", n))
                })?),
                None => None,
            };
        }
        return Ok((positions, normals));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    const TRIANGLE: &str = "\
# single triangle
o tri
v -1.0 -1.0 0.0
v 1.0 -1.0 0.0
v 0.0 1.0 0.0
vn 0.0 0.0 1.0
f 1//1 2//1 3//1
";

    #[test]
    fn test_parse_triangle_with_normals() {
        let mesh = Mesh::from_reader(TRIANGLE.as_bytes()).unwrap();
        assert_eq!(mesh.vertices().len(), 3);
        assert_eq!(mesh.normals(), &[vector![0.0, 0.0, 1.0]]);
        assert_eq!(
            mesh.faces(),
            &[Face::new([
                Corner { vertex: 0, normal: Some(0) },
                Corner { vertex: 1, normal: Some(0) },
                Corner { vertex: 2, normal: Some(0) },
            ])]
        );
        assert_eq!(mesh.vertices()[2], vector![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_faces_without_normals() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let mesh = Mesh::from_reader(text.as_bytes()).unwrap();
        assert!(mesh.faces()[0].corners.iter().all(|c| c.normal.is_none()));
    }

    #[test]
    fn test_texture_indices_dropped() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 2/1/1 3/1/1\n";
        let mesh = Mesh::from_reader(text.as_bytes()).unwrap();
        assert_eq!(mesh.faces()[0].corners[1], Corner { vertex: 1, normal: Some(0) });
    }

    #[test]
    fn test_quad_is_fan_triangulated() {
        let text = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let mesh = Mesh::from_reader(text.as_bytes()).unwrap();
        let faces: Vec<[usize; 3]> = mesh
            .faces()
            .iter()
            .map(|f| [f.corners[0].vertex, f.corners[1].vertex, f.corners[2].vertex])
            .collect();
        assert_eq!(faces, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_out_of_range_vertex_is_malformed() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 9\n";
        let err = Mesh::from_reader(text.as_bytes()).unwrap_err();
        // Whichever layer notices first, the load must fail.
        assert!(matches!(err, RenderError::MalformedInput(_) | RenderError::Obj(_)));
    }

    #[test]
    fn test_out_of_range_normal_is_malformed() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//2\n";
        let err = Mesh::from_reader(text.as_bytes()).unwrap_err();
        // Whichever layer notices first, the load must fail.
        assert!(matches!(err, RenderError::MalformedInput(_) | RenderError::Obj(_)));
    }

    #[test]
    fn test_non_numeric_token_fails() {
        let text = "v 0 zero 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        assert!(Mesh::from_reader(text.as_bytes()).is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Mesh::load("/definitely/not/here.obj").unwrap_err();
        assert!(matches!(err, RenderError::Io(_)));
    }

    #[test]
    fn test_resolve() {
        let mesh = Mesh::from_reader(TRIANGLE.as_bytes()).unwrap();
        let (positions, normals) = mesh.resolve(&mesh.faces()[0]).unwrap();
        assert_eq!(positions[1], vector![1.0, -1.0, 0.0]);
        assert_eq!(normals, [Some(vector![0.0, 0.0, 1.0]); 3]);
    }

    #[test]
    fn test_new_validates() {
        let face = Face::new([
            Corner { vertex: 0, normal: None },
            Corner { vertex: 1, normal: None },
            Corner { vertex: 3, normal: None },
        ]);
        let result = Mesh::new(vec![Vector3::zeros(); 3], vec![], vec![face]);
        assert!(matches!(result, Err(RenderError::MalformedInput(_))));
    }
}
