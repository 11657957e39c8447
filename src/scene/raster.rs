use std::cmp::{max, min};

use nalgebra::{vector, Vector3};

use super::{Color, RenderTarget};
use crate::util::{cross, ScreenPoint};

/// Triangle ready for rasterization: screen space corners and the light intensity at each corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTriangle {
    pub points: [ScreenPoint; 3],
    pub intensities: [f32; 3],
}

/// Barycentric weights of a pixel. `w` belongs to vertex 0, `v` to vertex 1 and `u` to vertex 2.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Barycentric {
    pub u: f32,
    pub v: f32,
    pub w: f32,
}

impl Barycentric {
    /// Weights reported for pixels of zero-area triangles.
    pub const OUTSIDE: Barycentric = Barycentric { u: -1.0, v: -1.0, w: -1.0 };

    pub fn is_inside(&self) -> bool {
        return self.u >= 0.0 && self.v >= 0.0 && self.w >= 0.0;
    }

    /// Blends per-vertex values, pairing w with vertex 0, v with vertex 1 and u with vertex 2.
    pub fn interpolate(&self, values: [f32; 3]) -> f32 {
        return values[0] * self.w + values[1] * self.v + values[2] * self.u;
    }
}

/// Axis aligned box; `ll` is inclusive, `ur` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub ll: (i32, i32), // lower left corner
    pub ur: (i32, i32), // upper right corner
}

pub fn bounding_box(points: &[ScreenPoint; 3]) -> BoundingBox {
    let [a, b, c] = points;
    return BoundingBox {
        ll: (min(min(a.x, b.x), c.x), min(min(a.y, b.y), c.y)),
        ur: (max(max(a.x, b.x), c.x), max(max(a.y, b.y), c.y)),
    };
}

/// Barycentric coordinates of pixel (x, y) via the cross product of the two edge/offset vectors.
pub fn barycentric(points: &[ScreenPoint; 3], x: i32, y: i32) -> Barycentric {
    let [a, b, c] = points;
    let raw_cross: Vector3<f32> = cross(
        vector![
            c.x as f32 - a.x as f32,
            b.x as f32 - a.x as f32,
            a.x as f32 - x as f32
        ],
        vector![
            c.y as f32 - a.y as f32,
            b.y as f32 - a.y as f32,
            a.y as f32 - y as f32
        ],
    );
    // raw_cross.z is twice the signed area and integral, so anything below 1 is zero.
    if raw_cross.z.abs() < 1.0 {
        return Barycentric::OUTSIDE;
    }
    let u = raw_cross.x / raw_cross.z;
    let v = raw_cross.y / raw_cross.z;
    return Barycentric { u, v, w: 1.0 - (u + v) };
}

/// Maps a blended light intensity to an 8 bit grey level.
/// Rounds to nearest instead of truncating, so a fully lit face reaches exactly 255
/// even when the interpolated intensity lands a hair below 1.
pub fn intensity_to_grey(intensity: f32) -> u8 {
    return (intensity * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// Draws a triangle into the target with depth testing and interpolated shading.
/// Only pixels inside the target's rows and columns are visited.
/// Returns the number of fragments that passed the depth test.
pub fn draw_triangle(target: &mut RenderTarget, triangle: &ScreenTriangle) -> usize {
    let points = &triangle.points;
    let bbox = bounding_box(points);
    let columns = target.color.columns();
    let rows = target.color.rows();
    let x_range = max(bbox.ll.0, columns.start)..min(bbox.ur.0, columns.end);
    let y_range = max(bbox.ll.1, rows.start)..min(bbox.ur.1, rows.end);

    let mut written = 0;
    for j in y_range {
        for i in x_range.clone() {
            let bar = barycentric(points, i, j);
            if !bar.is_inside() {
                continue;
            }
            let z = bar.interpolate([points[0].z, points[1].z, points[2].z]);
            // Strictly closer only, so on ties the fragment drawn first stays.
            match target.depth.get(i, j) {
                Some(current) if z > current => {}
                _ => continue,
            }
            let grey = intensity_to_grey(bar.interpolate(triangle.intensities));
            target.depth.set(i, j, z);
            target.color.set(i, j, Color::grey(grey));
            written += 1;
        }
    }
    return written;
}
