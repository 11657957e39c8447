use std::path::Path;

use image::{GrayImage, RgbImage};

use crate::error::{RenderError, Result};
use crate::scene::RenderTarget;

/// Copies the framebuffer into an image buffer, flipping rows so (0, 0) ends up bottom left.
pub fn to_rgb_image(target: &RenderTarget) -> Result<RgbImage> {
    return RgbImage::from_raw(target.width(), target.height(), target.as_render_data()).ok_or_else(|| {
        RenderError::InvalidConfig(format!(
            "framebuffer does not fill a {}x{} image",
            target.width(),
            target.height()
        ))
    });
}

/// Grey visualization of the depth buffer, nearest is brightest.
pub fn to_depth_image(target: &RenderTarget) -> Result<GrayImage> {
    return GrayImage::from_raw(target.width(), target.height(), target.as_depth_data()).ok_or_else(|| {
        RenderError::InvalidConfig(format!(
            "depth buffer does not fill a {}x{} image",
            target.width(),
            target.height()
        ))
    });
}

/// Writes the rendered image. Format follows the file extension, `.bmp` gives a 24 bit bitmap.
pub fn save_framebuffer<P: AsRef<Path>>(target: &RenderTarget, path: P) -> Result<()> {
    to_rgb_image(target)?.save(path)?;
    return Ok(());
}

pub fn save_depth<P: AsRef<Path>>(target: &RenderTarget, path: P) -> Result<()> {
    to_depth_image(target)?.save(path)?;
    return Ok(());
}
