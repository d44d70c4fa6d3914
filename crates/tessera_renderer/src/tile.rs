//! Tile-based partitioning of the image.
//!
//! The image is cut into one rectangular tile per worker. The tile grid
//! is as close to square as the worker count allows, with more tiles
//! along the image's longer axis.

use crate::camera::Camera;
use crate::config::RenderConfig;
use crate::framebuffer::TileView;
use crate::progress::Progress;
use crate::random::pixel_rng;
use crate::renderer::render_pixel;
use crate::scene::Scene;
use std::num::NonZeroUsize;
use std::ops::Range;

/// A rectangular region of the image to render.
///
/// Rows are frame buffer rows, counted from the bottom of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Index of this tile; also the worker that owns it
    pub index: usize,
    /// First row covered by the tile
    pub row: u32,
    /// First column covered by the tile
    pub col: u32,
    /// Height of the tile in pixels
    pub height: u32,
    /// Width of the tile in pixels
    pub width: u32,
}

impl Tile {
    pub fn rows(&self) -> Range<u32> {
        self.row..self.row + self.height
    }

    pub fn cols(&self) -> Range<u32> {
        self.col..self.col + self.width
    }
}

/// Split `n` into the factor pair whose members are closest together.
///
/// Returns `(larger, smaller)`; a prime `n` gives `(n, 1)`.
pub fn closest_factors(n: usize) -> (usize, usize) {
    let n = n.max(1);
    let mut small = (n as f64).sqrt() as usize;
    // Correct any float rounding of the square root
    while small * small > n {
        small -= 1;
    }
    while (small + 1) * (small + 1) <= n {
        small += 1;
    }
    while n % small != 0 {
        small -= 1;
    }
    (n / small, small)
}

/// The tiles covering an image for a given degree of parallelism.
#[derive(Debug, Clone)]
pub struct TileGrid {
    tile_width: u32,
    tile_height: u32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Lay out tiles for a `width` x `height` image and `parallelism` workers.
    ///
    /// Ceiling division can leave fewer tiles than workers, never more.
    /// The last row and column of tiles are clamped to the image bounds.
    pub fn new(width: u32, height: u32, parallelism: NonZeroUsize) -> Self {
        let (larger, smaller) = closest_factors(parallelism.get());
        let (tiles_x, tiles_y) = if width >= height {
            (larger, smaller)
        } else {
            (smaller, larger)
        };

        let tile_width = width.div_ceil(axis_count(tiles_x)).max(1);
        let tile_height = height.div_ceil(axis_count(tiles_y)).max(1);

        let mut tiles = Vec::new();
        let mut row = 0;
        while row < height {
            let mut col = 0;
            while col < width {
                tiles.push(Tile {
                    index: tiles.len(),
                    row,
                    col,
                    height: tile_height.min(height - row),
                    width: tile_width.min(width - col),
                });
                col += tile_width;
            }
            row += tile_height;
        }

        Self {
            tile_width,
            tile_height,
            tiles,
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Width of every tile except possibly the last column.
    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    /// Height of every tile except possibly the last row.
    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    /// Number of tiles sharing one scanline.
    pub fn columns(&self) -> usize {
        self.tiles.iter().take_while(|t| t.row == 0).count()
    }
}

fn axis_count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Render every pixel of one tile into its frame buffer view.
///
/// Each cell receives the raw sum of `samples_per_pixel` radiance samples.
/// Samples are drawn from a generator seeded per pixel, so the result
/// does not depend on how the image was tiled.
pub fn render_tile(
    view: &mut TileView<'_>,
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
    progress: &Progress,
) {
    let tile = view.tile();
    log::debug!(
        "Working on tile {} with origin row {} col {} ({}x{})",
        tile.index,
        tile.row,
        tile.col,
        tile.width,
        tile.height
    );

    for (local_y, line) in view.rows_mut().iter_mut().enumerate() {
        let y = tile.row + local_y as u32;
        for (local_x, cell) in line.iter_mut().enumerate() {
            let x = tile.col + local_x as u32;
            let mut rng = pixel_rng(config.seed, y, x);
            *cell += render_pixel(camera, scene, x, y, config, &mut rng);
        }
        progress.advance();
    }

    log::debug!("Tile {} finished", tile.index);
}
