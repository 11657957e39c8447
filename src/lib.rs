//! Offline software rasterizer: OBJ mesh in, depth tested Gouraud shaded image out.

pub mod app;
pub mod camera;
pub mod config;
pub mod error;
pub mod image;
pub mod mesh;
pub mod scene;
pub mod transform;
pub mod util;

pub use camera::Camera;
pub use config::RenderConfig;
pub use error::{RenderError, Result};
pub use mesh::{Corner, Face, Mesh};
pub use scene::pipeline::{Pipeline, RenderStats};
pub use scene::{Color, RenderTarget};
pub use transform::{ModelTransform, Transform};
