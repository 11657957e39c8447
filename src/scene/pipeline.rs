use std::sync::{mpsc, Arc};
use std::time;

use nalgebra::Vector3;
use threadpool::ThreadPool;
use tracing::{debug, trace};

use super::raster::{draw_triangle, ScreenTriangle};
use super::shader::{FaceGeometry, Shader};
use super::RenderTarget;
use crate::error::{RenderError, Result};
use crate::mesh::{Face, Mesh};
use crate::transform::Transform;
use crate::util::{cross, diff, dot, normalize, transform_point, ScreenPoint};

/// Counters of one draw call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub faces: usize,      // Faces seen.
    pub drawn: usize,      // Faces handed to the rasterizer.
    pub culled: usize,     // Faces facing away from the light.
    pub degenerate: usize, // Faces skipped for zero area or failed projection.
    pub fragments: usize,  // Pixels that passed the depth test.
}

/// What happened to a single face on its way to the rasterizer.
#[derive(Debug)]
enum FaceOutcome {
    Draw(ScreenTriangle),
    Culled,
    Degenerate(RenderError),
}

/// One draw call: composite transform, light and shading strategy shared by every face.
pub struct Pipeline {
    transform: Transform,
    light_direction: Vector3<f32>,
    shader: Box<dyn Shader>,
    threads: usize,
}

impl Pipeline {
    /// The light direction is normalized here, a zero light is rejected.
    pub fn new(transform: Transform, light_direction: Vector3<f32>, shader: Box<dyn Shader>) -> Result<Self> {
        let light_direction = normalize(light_direction).map_err(|_| {
            RenderError::InvalidConfig("light direction must be a non-zero vector".to_string())
        })?;
        return Ok(Self {
            transform,
            light_direction,
            shader,
            threads: 1,
        });
    }

    /// Number of horizontal bands rasterized in parallel, 1 keeps everything on the calling thread.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        return self;
    }

    pub fn light_direction(&self) -> Vector3<f32> {
        return self.light_direction;
    }

    /// Culls, projects and shades a face. Index errors abort, geometry problems only skip the face.
    fn prepare_face(&self, mesh: &Mesh, face: &Face) -> Result<FaceOutcome> {
        let (positions, normals) = mesh.resolve(face)?;

        // Flat facing test in object space, independent of the per-pixel shading.
        let face_normal = match normalize(cross(
            diff(positions[1], positions[0]),
            diff(positions[2], positions[1]),
        )) {
            Ok(n) => n,
            Err(e) if e.is_recoverable() => return Ok(FaceOutcome::Degenerate(e)),
            Err(e) => return Err(e),
        };
        if dot(face_normal, self.light_direction) < 0.0 {
            return Ok(FaceOutcome::Culled);
        }

        let mut points = [ScreenPoint { x: 0, y: 0, z: 0.0 }; 3];
        for i in 0..3 {
            points[i] = match transform_point(positions[i], &self.transform.composite) {
                Ok(p) => p,
                Err(e) if e.is_recoverable() => return Ok(FaceOutcome::Degenerate(e)),
                Err(e) => return Err(e),
            };
        }

        let geometry = FaceGeometry {
            positions,
            normals,
            face_normal,
        };
        let intensities = self.shader.vertex_intensities(&geometry, self.light_direction);
        return Ok(FaceOutcome::Draw(ScreenTriangle { points, intensities }));
    }

    /// Runs every face of the mesh through culling and projection, in mesh order.
    pub fn prepare(&self, mesh: &Mesh) -> Result<(Vec<ScreenTriangle>, RenderStats)> {
        let mut stats = RenderStats::default();
        let mut triangles = Vec::with_capacity(mesh.faces().len());
        for (index, face) in mesh.faces().iter().enumerate() {
            stats.faces += 1;
            match self.prepare_face(mesh, face)? {
                FaceOutcome::Draw(triangle) => {
                    stats.drawn += 1;
                    triangles.push(triangle);
                }
                FaceOutcome::Culled => {
                    trace!(face = index, "culled");
                    stats.culled += 1;
                }
                FaceOutcome::Degenerate(e) => {
                    trace!(face = index, error = %e, "skipped");
                    stats.degenerate += 1;
                }
            }
        }
        return Ok((triangles, stats));
    }

    /// Draws the mesh into the target. The target is not cleared, so consecutive calls composite.
    pub fn draw(&self, mesh: &Mesh, target: &mut RenderTarget) -> Result<RenderStats> {
        let time_begin = time::Instant::now();
        let (triangles, mut stats) = self.prepare(mesh)?;
        debug!(
            elapsed_ms = time_begin.elapsed().as_secs_f32() * 1000.0,
            triangles = triangles.len(),
            "geometry prepared"
        );

        let time_begin = time::Instant::now();
        stats.fragments = if self.threads > 1 && target.height() > 1 {
            self.rasterize_parallel(triangles, target)?
        } else {
            rasterize(&triangles, target)
        };
        debug!(
            elapsed_ms = time_begin.elapsed().as_secs_f32() * 1000.0,
            fragments = stats.fragments,
            threads = self.threads,
            "rasterized"
        );
        return Ok(stats);
    }

    /// Rasterizes disjoint row bands on a thread pool. Every band sees all triangles in mesh
    /// order, so the result matches the single threaded path exactly.
    /// On error the target keeps its contents from before the call.
    fn rasterize_parallel(&self, triangles: Vec<ScreenTriangle>, target: &mut RenderTarget) -> Result<usize> {
        let bands = target.clone().split_rows(self.threads);
        let n_bands = bands.len();

        let pool = ThreadPool::new(n_bands);
        let triangles = Arc::new(triangles);
        let (tx, rx) = mpsc::channel();
        for mut band in bands {
            let tx = tx.clone();
            let triangles = Arc::clone(&triangles);
            pool.execute(move || {
                let fragments = rasterize(&triangles, &mut band);
                // Receiver outlives the pool, a failed send only means the render was abandoned.
                let _ = tx.send((band, fragments));
            });
        }
        drop(tx);

        let mut done = Vec::with_capacity(n_bands);
        let mut fragments = 0;
        for (band, count) in rx.iter() {
            fragments += count;
            done.push(band);
        }
        merge_bands(target, done, n_bands)?;
        return Ok(fragments);
    }
}

/// Replaces the target with the joined bands. The target is only touched when every band is back.
fn merge_bands(target: &mut RenderTarget, done: Vec<RenderTarget>, n_bands: usize) -> Result<()> {
    if done.len() != n_bands {
        return Err(RenderError::Worker(format!(
            "{} of {} raster bands did not finish",
            n_bands - done.len(),
            n_bands
        )));
    }
    *target = RenderTarget::join_rows(done)?;
    return Ok(());
}

/// Sequential rasterization of prepared triangles, in order.
pub fn rasterize(triangles: &[ScreenTriangle], target: &mut RenderTarget) -> usize {
    return triangles.iter().map(|t| draw_triangle(target, t)).sum();
}
