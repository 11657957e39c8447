use std::ops::Range;

use crate::error::{RenderError, Result};

/// Flat row-major grid of per-pixel values, (0, 0) is the bottom left cell.
///
/// A grid may cover only a horizontal band of a taller image: `row_offset` is the global row of
/// its first stored row, and all accessors take global coordinates. A full image has offset 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: u32,
    height: u32,     // Rows stored in this grid.
    row_offset: u32, // Global index of the first stored row.
    data: Vec<T>,
}

impl<T: Copy> Grid<T> {
    pub fn new(width: u32, height: u32, value: T) -> Self {
        return Self {
            width,
            height,
            row_offset: 0,
            data: vec![value; width as usize * height as usize],
        };
    }

    pub fn width(&self) -> u32 {
        return self.width;
    }

    pub fn height(&self) -> u32 {
        return self.height;
    }

    pub fn row_offset(&self) -> u32 {
        return self.row_offset;
    }

    /// Global row indices covered by this grid.
    pub fn rows(&self) -> Range<i32> {
        let start = self.row_offset as i32;
        return start..start + self.height as i32;
    }

    /// Global column indices covered by this grid.
    pub fn columns(&self) -> Range<i32> {
        return 0..self.width as i32;
    }

    /// Flat index of a global coordinate, None if it falls outside the grid.
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.columns().contains(&x) || !self.rows().contains(&y) {
            return None;
        }
        let local_y = (y - self.row_offset as i32) as usize;
        return Some(x as usize + local_y * self.width as usize);
    }

    pub fn get(&self, x: i32, y: i32) -> Option<T> {
        return self.index(x, y).map(|i| self.data[i]);
    }

    /// Writes a value, silently ignoring coordinates outside of the grid.
    /// Returns whether anything was written.
    pub fn set(&mut self, x: i32, y: i32, value: T) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.data[i] = value;
                return true;
            }
            None => return false,
        }
    }

    pub fn fill(&mut self, value: T) {
        for elem in &mut self.data {
            *elem = value;
        }
    }

    /// Stored values, bottom row first.
    pub fn as_slice(&self) -> &[T] {
        return &self.data[..];
    }

    /// Splits the grid into at most `parts` bands of consecutive rows, bottom band first.
    /// Band heights differ by at most one row.
    pub fn split_rows(self, parts: usize) -> Vec<Grid<T>> {
        let parts = parts.clamp(1, self.height.max(1) as usize);
        let base = self.height as usize / parts;
        let extra = self.height as usize % parts;
        let row_len = self.width as usize;

        let mut bands = Vec::with_capacity(parts);
        let mut rest = self.data;
        let mut offset = self.row_offset;
        for i in 0..parts {
            let rows = base + if i < extra { 1 } else { 0 };
            let tail = rest.split_off(rows * row_len);
            bands.push(Grid {
                width: self.width,
                height: rows as u32,
                row_offset: offset,
                data: rest,
            });
            rest = tail;
            offset += rows as u32;
        }
        return bands;
    }

    /// Inverse of `split_rows`. Bands may come in any order but must tile a contiguous row range
    /// of equal width.
    pub fn join_rows(mut bands: Vec<Grid<T>>) -> Result<Grid<T>> {
        bands.sort_by_key(|band| band.row_offset);
        let first = bands
            .first()
            .ok_or_else(|| RenderError::InvalidConfig("no bands to join".to_string()))?;
        let width = first.width;
        let row_offset = first.row_offset;

        let mut height = 0;
        let mut data = Vec::with_capacity(bands.iter().map(|band| band.data.len()).sum());
        for band in bands {
            if band.width != width || band.row_offset != row_offset + height {
                return Err(RenderError::InvalidConfig(format!(
                    "band at row {} (width {}) does not continue rows {}..{} (width {})",
                    band.row_offset,
                    band.width,
                    row_offset,
                    row_offset + height,
                    width
                )));
            }
            height += band.height;
            data.extend(band.data);
        }
        return Ok(Grid {
            width,
            height,
            row_offset,
            data,
        });
    }
}
