pub mod buffer;
pub mod pipeline;
pub mod raster;
pub mod shader;

use crate::error::Result;
use buffer::Grid;

/// Struct, representing raw rgb8 pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Color {
        return Color { r, g, b };
    }

    /// Same value in all three channels.
    pub fn grey(value: u8) -> Color {
        return Color { r: value, g: value, b: value };
    }
}

/// Grid of colors, row 0 is the bottom row.
pub type Framebuffer = Grid<Color>;

/// Grid of accepted fragment depths, larger is closer. Untouched cells hold negative infinity.
pub type DepthBuffer = Grid<f32>;

/// Owned render state of one pass: color and depth grids of identical geometry.
/// (0, 0) is the bottom left coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTarget {
    pub color: Framebuffer,
    pub depth: DepthBuffer,
    background: Color,
}

impl RenderTarget {
    /// Generates a cleared target with specified width and height.
    pub fn new(width: u32, height: u32, background: Color) -> RenderTarget {
        return RenderTarget {
            color: Grid::new(width, height, background),
            depth: Grid::new(width, height, f32::NEG_INFINITY),
            background,
        };
    }

    pub fn width(&self) -> u32 {
        return self.color.width();
    }

    pub fn height(&self) -> u32 {
        return self.color.height();
    }

    pub fn background(&self) -> Color {
        return self.background;
    }

    /// Resets all pixels to the background color and the depth buffer to negative infinity.
    pub fn clear(&mut self) {
        self.color.fill(self.background);
        self.depth.fill(f32::NEG_INFINITY);
    }

    /// Get rendered image as rgb8 bytes, top row first, ready for image encoders.
    pub fn as_render_data(&self) -> Vec<u8> {
        let width = self.width() as usize;
        let mut data = Vec::with_capacity(3 * self.color.as_slice().len());
        for row in self.color.as_slice().chunks(width.max(1)).rev() {
            for pixel in row {
                data.extend_from_slice(&[pixel.r, pixel.g, pixel.b]);
            }
        }
        return data;
    }

    /// Get grey levels representing depth buffer values, top row first.
    /// Finite depths are stretched over [0, 255], nearest is brightest. Untouched cells are 0.
    pub fn as_depth_data(&self) -> Vec<u8> {
        let finite = || self.depth.as_slice().iter().copied().filter(|z| z.is_finite());
        let z_max = finite().fold(f32::MIN, f32::max);
        let z_min = finite().fold(f32::MAX, f32::min);
        let scale = z_max - z_min;

        let width = self.width() as usize;
        let mut data = Vec::with_capacity(self.depth.as_slice().len());
        for row in self.depth.as_slice().chunks(width.max(1)).rev() {
            for &z in row {
                let value = if !z.is_finite() {
                    0
                } else if scale > 0.0 {
                    (1.0 + 254.0 * (z - z_min) / scale).round() as u8
                } else {
                    255
                };
                data.push(value);
            }
        }
        return data;
    }

    /// Splits into horizontal bands that can be rendered independently.
    pub fn split_rows(self, parts: usize) -> Vec<RenderTarget> {
        let background = self.background;
        return self
            .color
            .split_rows(parts)
            .into_iter()
            .zip(self.depth.split_rows(parts))
            .map(|(color, depth)| RenderTarget { color, depth, background })
            .collect();
    }

    /// Reassembles bands produced by `split_rows`.
    pub fn join_rows(bands: Vec<RenderTarget>) -> Result<RenderTarget> {
        let background = bands.first().map(|band| band.background).unwrap_or_default();
        let (colors, depths): (Vec<_>, Vec<_>) = bands
            .into_iter()
            .map(|band| (band.color, band.depth))
            .unzip();
        return Ok(RenderTarget {
            color: Grid::join_rows(colors)?,
            depth: Grid::join_rows(depths)?,
            background,
        });
    }
}
