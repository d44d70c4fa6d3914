//! Accumulation buffer shared by the tile workers.
//!
//! The buffer is a single flat allocation indexed `row * width + col`,
//! with row 0 at the bottom of the image. Workers never see the whole
//! buffer: [`FrameBuffer::tile_views`] splits it into disjoint row
//! slices, one bundle per tile.

use crate::error::{RenderError, RenderResult};
use crate::tile::{Tile, TileGrid};
use image::RgbImage;
use rayon::prelude::*;
use tessera_math::{Color, Interval};

/// Channel range kept before scaling to 8 bits.
const INTENSITY: Interval = Interval::new(0.0, 0.999);

/// Linear-space sums of radiance samples, one cell per pixel.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl FrameBuffer {
    /// Allocate a black buffer.
    ///
    /// Allocation failure is reported instead of aborting the process.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::invalid(format!(
                "frame buffer must not be empty, got {width}x{height}"
            )));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or(RenderError::FrameBufferAlloc { width, height })?;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| RenderError::FrameBufferAlloc { width, height })?;
        pixels.resize(len, Color::ZERO);

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Accumulated sum at (row, col); row 0 is the bottom of the image.
    pub fn get(&self, row: u32, col: u32) -> Color {
        self.pixels[self.index(row, col)]
    }

    /// All cells in row-major order, bottom row first.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    #[inline]
    fn index(&self, row: u32, col: u32) -> usize {
        row as usize * self.width as usize + col as usize
    }

    /// Split the buffer into one mutable view per tile of `grid`.
    ///
    /// The grid must have been laid out for this buffer's dimensions.
    pub fn tile_views(&mut self, grid: &TileGrid) -> Vec<TileView<'_>> {
        let mut views: Vec<TileView<'_>> = grid
            .tiles()
            .iter()
            .map(|&tile| TileView {
                tile,
                rows: Vec::with_capacity(tile.height as usize),
            })
            .collect();

        let width = self.width as usize;
        for (row, line) in self.pixels.chunks_mut(width).enumerate() {
            let row = row as u32;
            let mut rest = line;
            // Tiles of one band are stored left to right
            for view in views.iter_mut().filter(|v| v.tile.rows().contains(&row)) {
                let (segment, tail) = std::mem::take(&mut rest).split_at_mut(view.tile.width as usize);
                view.rows.push(segment);
                rest = tail;
            }
            debug_assert!(rest.is_empty(), "tiles do not cover row {row}");
        }

        views
    }

    /// Average, gamma-correct and quantize into an 8-bit image.
    ///
    /// The output is ordered top row first, so row `height - 1` of the
    /// buffer becomes the first image row.
    pub fn resolve(&self, samples_per_pixel: u32) -> RgbImage {
        let scale = 1.0 / samples_per_pixel.max(1) as f32;
        let width = self.width as usize;
        let height = self.height as usize;

        let non_finite = self.pixels.par_iter().filter(|c| !c.is_finite()).count();
        if non_finite > 0 {
            log::warn!("{non_finite} pixels hold non-finite radiance; NaN channels encode as 0");
        }

        let mut image = RgbImage::new(self.width, self.height);
        image
            .par_chunks_mut(width * 3)
            .enumerate()
            .for_each(|(out_row, line)| {
                let row = height - 1 - out_row;
                let sums = &self.pixels[row * width..(row + 1) * width];
                for (rgb, sum) in line.chunks_exact_mut(3).zip(sums) {
                    rgb.copy_from_slice(&color_to_rgb(*sum, scale));
                }
            });
        image
    }
}

/// A worker's exclusive window onto the frame buffer.
///
/// `rows[i]` is frame buffer row `tile.row + i`, columns
/// `tile.col..tile.col + tile.width`.
pub struct TileView<'a> {
    tile: Tile,
    rows: Vec<&'a mut [Color]>,
}

impl<'a> TileView<'a> {
    pub fn tile(&self) -> Tile {
        self.tile
    }

    /// Mutable rows of the tile, bottom row first.
    pub fn rows_mut(&mut self) -> &mut [&'a mut [Color]] {
        &mut self.rows
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert an accumulated sample sum to 8-bit RGB.
///
/// `scale` is `1 / samples_per_pixel`.
pub fn color_to_rgb(sum: Color, scale: f32) -> [u8; 3] {
    let channel = |c: f32| (256.0 * INTENSITY.clamp(linear_to_gamma(c * scale))) as u8;
    [channel(sum.x), channel(sum.y), channel(sum.z)]
}
