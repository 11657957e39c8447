use std::fs;
use std::path::Path;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::error::{RenderError, Result};
use crate::scene::shader::ShadingMode;
use crate::scene::Color;
use crate::transform::ModelTransform;

pub const DEFAULT_WIDTH: u32 = 400;
pub const DEFAULT_HEIGHT: u32 = 400;

/// Look-at camera as stored in a config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: [f32; 3],
    pub target: [f32; 3],
    pub up: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        let camera = Camera::default();
        return Self {
            eye: camera.eye.into(),
            target: camera.target.into(),
            up: camera.up.into(),
        };
    }
}

impl CameraConfig {
    pub fn camera(&self) -> Camera {
        return Camera::new(self.eye.into(), self.target.into(), self.up.into());
    }
}

/// Everything a render depends on besides the mesh. Any field left out of a RON file keeps its
/// default, so `()` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub translation: [i32; 3],
    pub scale: [i32; 3],
    pub rotation: [i32; 3], // Degrees, applied X, then Y, then Z.
    pub camera: CameraConfig,
    pub light: [f32; 3],    // Direction towards the light, normalized before use.
    pub shading: ShadingMode,
    pub threads: usize,
    pub background: [u8; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        // Maps the [-1, 1] cube of a typical model onto the middle of the image.
        return Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            translation: [DEFAULT_WIDTH as i32 / 2, DEFAULT_HEIGHT as i32 / 2, 0],
            scale: [DEFAULT_WIDTH as i32 / 3, DEFAULT_HEIGHT as i32 / 3, 100],
            rotation: [0, 0, 0],
            camera: CameraConfig::default(),
            light: [0.0, 0.0, 1.0],
            shading: ShadingMode::Gouraud,
            threads: 1,
            background: [0, 0, 0],
        };
    }
}

impl RenderConfig {
    /// Reads and validates a RON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        return Self::from_ron(&contents);
    }

    pub fn from_ron(s: &str) -> Result<Self> {
        let config: RenderConfig = ron::from_str(s)?;
        config.validate()?;
        return Ok(config);
    }

    pub fn to_ron(&self) -> Result<String> {
        let pretty = ron::ser::PrettyConfig::new().depth_limit(2);
        return ron::ser::to_string_pretty(self, pretty)
            .map_err(|e| RenderError::InvalidConfig(e.to_string()));
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.light.iter().all(|&c| c == 0.0) || self.light.iter().any(|c| !c.is_finite()) {
            return Err(RenderError::InvalidConfig(format!(
                "light direction {:?} has no direction",
                self.light
            )));
        }
        if self.threads == 0 {
            return Err(RenderError::InvalidConfig("threads must be at least 1".to_string()));
        }
        return Ok(());
    }

    pub fn model_transform(&self) -> ModelTransform {
        return ModelTransform {
            translation: self.translation.into(),
            scale: self.scale.into(),
            rotation: self.rotation.into(),
        };
    }

    pub fn light_direction(&self) -> Vector3<f32> {
        return self.light.into();
    }

    pub fn background_color(&self) -> Color {
        let [r, g, b] = self.background;
        return Color::new(r, g, b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(RenderConfig::from_ron("()").unwrap(), RenderConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = RenderConfig::from_ron("(width: 64, shading: Flat, camera: (eye: (0.0, 0.0, 5.0)))").unwrap();
        assert_eq!(config.width, 64);
        assert_eq!(config.height, DEFAULT_HEIGHT);
        assert_eq!(config.shading, ShadingMode::Flat);
        assert_eq!(config.camera.eye, [0.0, 0.0, 5.0]);
        assert_eq!(config.camera.up, CameraConfig::default().up);
    }

    #[test]
    fn test_ron_round_trip() {
        let config = RenderConfig {
            rotation: [10, 20, 30],
            threads: 4,
            ..Default::default()
        };
        let text = config.to_ron().unwrap();
        assert_eq!(RenderConfig::from_ron(&text).unwrap(), config);
    }

    #[test]
    fn test_rejects_zero_size() {
        let err = RenderConfig::from_ron("(width: 0)").unwrap_err();
        assert!(matches!(err, RenderError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_zero_light() {
        assert!(RenderConfig::from_ron("(light: (0.0, 0.0, 0.0))").is_err());
    }

    #[test]
    fn test_rejects_unknown_syntax() {
        let err = RenderConfig::from_ron("(width: \"wide\")").unwrap_err();
        assert!(matches!(err, RenderError::InvalidConfig(_)));
    }

    #[test]
    fn test_model_transform_conversion() {
        let config = RenderConfig {
            translation: [1, 2, 3],
            scale: [4, 5, 6],
            rotation: [7, 8, 9],
            ..Default::default()
        };
        let model = config.model_transform();
        assert_eq!(model.translation, Vector3::new(1, 2, 3));
        assert_eq!(model.scale, Vector3::new(4, 5, 6));
        assert_eq!(model.rotation, Vector3::new(7, 8, 9));
    }
}
