use std::path::PathBuf;
use std::time;

use tracing::{debug, info};

use crate::config::RenderConfig;
use crate::error::Result;
use crate::image::{save_depth, save_framebuffer};
use crate::mesh::Mesh;
use crate::scene::pipeline::{Pipeline, RenderStats};
use crate::scene::RenderTarget;
use crate::transform::Transform;

pub const DEFAULT_OUTPUT: &str = "out.bmp";

/// Struct, defining execution context of one run.
#[derive(Debug, Clone)]
pub struct Params {
    pub mesh_path: PathBuf,
    pub config_path: Option<PathBuf>,
    pub output_path: PathBuf,
    pub depth_path: Option<PathBuf>,
}

impl Params {
    pub fn new(mesh_path: PathBuf) -> Self {
        return Self {
            mesh_path,
            config_path: None,
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            depth_path: None,
        };
    }
}

/// Renders a mesh into a fresh target with the given config.
pub fn render(mesh: &Mesh, config: &RenderConfig) -> Result<(RenderTarget, RenderStats)> {
    config.validate()?;
    let transform = Transform::new(&config.camera.camera(), &config.model_transform())?;
    let pipeline = Pipeline::new(transform, config.light_direction(), config.shading.shader())?
        .with_threads(config.threads);

    let mut target = RenderTarget::new(config.width, config.height, config.background_color());
    target.clear();
    let stats = pipeline.draw(mesh, &mut target)?;
    return Ok((target, stats));
}

/// Loads everything, renders once and writes the results.
pub fn run(params: Params) -> Result<RenderStats> {
    let config = match &params.config_path {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };
    debug!(?config, "config");

    let time_begin = time::Instant::now();
    let mesh = Mesh::load(&params.mesh_path)?;
    info!(
        path = %params.mesh_path.display(),
        vertices = mesh.vertices().len(),
        normals = mesh.normals().len(),
        faces = mesh.faces().len(),
        "mesh loaded"
    );

    let (target, stats) = render(&mesh, &config)?;
    info!(
        drawn = stats.drawn,
        culled = stats.culled,
        degenerate = stats.degenerate,
        fragments = stats.fragments,
        "render finished"
    );

    save_framebuffer(&target, &params.output_path)?;
    info!(path = %params.output_path.display(), "image written");
    if let Some(path) = &params.depth_path {
        save_depth(&target, path)?;
        info!(path = %path.display(), "depth image written");
    }
    debug!(elapsed_ms = time_begin.elapsed().as_secs_f32() * 1000.0, "total");

    return Ok(stats);
}
