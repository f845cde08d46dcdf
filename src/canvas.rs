// Module for compositing 8x8 tiles onto an ARGB pixel buffer.
use itertools::iproduct;

use crate::{
    common::{ColorArgb, TileIdx, TILE_SIZE},
    grid::TileGrid,
    palette::{self, BACKGROUND},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<ColorArgb>, // row-major, no padding
}

impl Canvas {
    /// A canvas filled with the background color.
    pub fn new(width: usize, height: usize) -> Self {
        Canvas {
            width,
            height,
            pixels: vec![BACKGROUND; width * height],
        }
    }

    pub fn from_pixels(width: usize, height: usize, pixels: Vec<ColorArgb>) -> Self {
        assert_eq!(pixels.len(), width * height);
        Canvas {
            width,
            height,
            pixels,
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> ColorArgb {
        self.pixels[y * self.width + x]
    }

    /// Draws tile `idx` of `grid` with its top-left corner at pixel
    /// (`dest_x`, `dest_y`), reversing its columns if `mirror` is set.
    ///
    /// The destination must lie entirely within the canvas.
    pub fn draw_tile(
        &mut self,
        grid: &TileGrid,
        idx: TileIdx,
        dest_x: usize,
        dest_y: usize,
        mirror: bool,
    ) {
        assert!(
            dest_x + TILE_SIZE <= self.width && dest_y + TILE_SIZE <= self.height,
            "tile at ({}, {}) overruns {}x{} canvas",
            dest_x,
            dest_y,
            self.width,
            self.height
        );
        for (y, x) in iproduct!(0..TILE_SIZE, 0..TILE_SIZE) {
            let src_x = if mirror { TILE_SIZE - 1 - x } else { x };
            let color = palette::index_to_color(grid.palletized_value(idx, src_x, y));
            self.pixels[(dest_y + y) * self.width + dest_x + x] = color;
        }
    }
}

/// Renders every tile of `grid` at its own raster position.
pub fn render_grid(grid: &TileGrid) -> Canvas {
    let mut canvas = Canvas::new(grid.pixel_width(), grid.pixel_height());
    for (tile_y, tile_x) in iproduct!(0..grid.tile_y_count(), 0..grid.tile_x_count()) {
        canvas.draw_tile(
            grid,
            grid.tile_index(tile_x, tile_y),
            tile_x * TILE_SIZE,
            tile_y * TILE_SIZE,
            false,
        );
    }
    canvas
}
