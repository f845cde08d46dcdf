//! Curated composite layouts.
//!
//! A layout arranges hand-picked tiles of an exported grid onto one compact
//! image, independent of where those tiles sit in the ROM.
use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::{
    canvas::{self, Canvas},
    common::{TileIdx, MAX_GRID_SIDE, MAX_IMAGE_SIDE, TILE_SIZE},
    grid::TileGrid,
};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub from: TileIdx,
    pub to: TileIdx,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub tile: TileIdx,
    pub x: usize,
    pub y: usize,
    #[serde(default)]
    pub mirror: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layout {
    // Tiles copied into a second grid, then rendered raster-fashion.
    Tiles {
        name: String,
        columns: usize,
        rows: usize,
        cells: Vec<Cell>,
    },
    // Tiles drawn at arbitrary pixel offsets, optionally mirrored.
    Sprites {
        name: String,
        width: usize,
        height: usize,
        placements: Vec<Placement>,
    },
}

impl Layout {
    pub fn name(&self) -> &str {
        match self {
            Layout::Tiles { name, .. } | Layout::Sprites { name, .. } => name,
        }
    }

    pub fn max_source_tile(&self) -> Option<TileIdx> {
        match self {
            Layout::Tiles { cells, .. } => cells.iter().map(|c| c.from).max(),
            Layout::Sprites { placements, .. } => placements.iter().map(|p| p.tile).max(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Layout::Tiles {
                name,
                columns,
                rows,
                cells,
            } => {
                ensure!(
                    *columns <= MAX_GRID_SIDE && *rows <= MAX_GRID_SIDE,
                    "layout '{}': {}x{} grid exceeds {} tiles per side",
                    name,
                    columns,
                    rows,
                    MAX_GRID_SIDE
                );
                for cell in cells {
                    ensure!(
                        cell.to < columns * rows,
                        "layout '{}': destination tile {} outside {}x{} grid",
                        name,
                        cell.to,
                        columns,
                        rows
                    );
                }
            }
            Layout::Sprites {
                name,
                width,
                height,
                placements,
            } => {
                ensure!(
                    *width <= MAX_IMAGE_SIDE && *height <= MAX_IMAGE_SIDE,
                    "layout '{}': {}x{} canvas exceeds {} pixels per side",
                    name,
                    width,
                    height,
                    MAX_IMAGE_SIDE
                );
                for p in placements {
                    let fits = |pos: usize, limit: usize| {
                        pos.checked_add(TILE_SIZE).is_some_and(|end| end <= limit)
                    };
                    ensure!(
                        fits(p.x, *width) && fits(p.y, *height),
                        "layout '{}': tile {} at ({}, {}) outside {}x{} canvas",
                        name,
                        p.tile,
                        p.x,
                        p.y,
                        width,
                        height
                    );
                }
            }
        }
        Ok(())
    }

    /// Renders the layout from `source`. The layout must be valid and every
    /// source tile must exist in `source`.
    pub fn render(&self, source: &TileGrid) -> Canvas {
        match self {
            Layout::Tiles {
                columns,
                rows,
                cells,
                ..
            } => {
                let mut sheet = TileGrid::new(*columns, *rows);
                for cell in cells {
                    sheet.copy_palletized(source, cell.from, cell.to);
                }
                canvas::render_grid(&sheet)
            }
            Layout::Sprites {
                width,
                height,
                placements,
                ..
            } => {
                let mut canvas = Canvas::new(*width, *height);
                for p in placements {
                    canvas.draw_tile(source, p.tile, p.x, p.y, p.mirror);
                }
                canvas
            }
        }
    }
}

fn cell(from: TileIdx, to: TileIdx) -> Cell {
    Cell { from, to }
}

fn placement(tile: TileIdx, x: usize, y: usize, mirror: bool) -> Placement {
    Placement { tile, x, y, mirror }
}

pub fn builtin_layouts() -> Vec<Layout> {
    vec![
        Layout::Tiles {
            name: "reformatted".to_string(),
            columns: 6,
            rows: 3,
            cells: vec![
                cell(0x04, 0),
                cell(0x05, 1),
                cell(0x06, 6),
                cell(0x07, 7),
                cell(0x44, 2),
                cell(0x45, 3),
                cell(0x46, 8),
                cell(0x47, 9),
                cell(0x80, 5),
                cell(0x85, 10),
                cell(0x86, 11),
                cell(0x87, 16),
                cell(0x88, 17),
            ],
        },
        Layout::Sprites {
            name: "facing".to_string(),
            width: 32,
            height: 16,
            placements: vec![
                placement(0x04, 0, 0, false),
                placement(0x05, 8, 0, false),
                placement(0x06, 0, 8, false),
                placement(0x07, 8, 8, false),
                placement(0x05, 16, 0, true),
                placement(0x04, 24, 0, true),
                placement(0x07, 16, 8, true),
                placement(0x06, 24, 8, true),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{index_to_color, BACKGROUND};

    // Every pixel of tile i holds palette index i % 4, except column 0 which
    // holds (i + 1) % 4 so mirroring is visible.
    fn numbered_grid(count: usize) -> TileGrid {
        let mut grid = TileGrid::new(count, 1);
        for i in 0..count {
            for y in 0..8 {
                for x in 0..8 {
                    let v = if x == 0 { (i + 1) % 4 } else { i % 4 };
                    grid.set_palletized_value(i, x, y, v as u8);
                }
            }
        }
        grid
    }

    #[test]
    fn builtin_layouts_are_valid() {
        for layout in builtin_layouts() {
            layout.validate().unwrap();
        }
        let max: Vec<_> = builtin_layouts()
            .iter()
            .map(|l| l.max_source_tile())
            .collect();
        assert_eq!(max, [Some(0x88), Some(0x07)]);
    }

    #[test]
    fn tiles_layout_copies_into_sheet() {
        let layout = Layout::Tiles {
            name: "t".to_string(),
            columns: 2,
            rows: 2,
            cells: vec![cell(2, 3), cell(1, 0)],
        };
        let canvas = layout.render(&numbered_grid(3));
        assert_eq!((canvas.width, canvas.height), (16, 16));
        assert_eq!(canvas.pixel(1, 0), index_to_color(1));
        assert_eq!(canvas.pixel(8, 8), index_to_color(3));
        assert_eq!(canvas.pixel(9, 8), index_to_color(2));
        assert_eq!(canvas.pixel(9, 0), BACKGROUND);
    }

    #[test]
    fn sprites_layout_draws_with_mirroring() {
        let layout = Layout::Sprites {
            name: "s".to_string(),
            width: 24,
            height: 10,
            placements: vec![placement(1, 2, 2, false), placement(1, 16, 0, true)],
        };
        let canvas = layout.render(&numbered_grid(2));
        assert_eq!((canvas.width, canvas.height), (24, 10));
        assert_eq!(canvas.pixel(2, 2), index_to_color(2));
        assert_eq!(canvas.pixel(3, 2), index_to_color(1));
        assert_eq!(canvas.pixel(23, 0), index_to_color(2));
        assert_eq!(canvas.pixel(22, 0), index_to_color(1));
        assert_eq!(canvas.pixel(0, 0), BACKGROUND);
    }

    #[test]
    fn validate_rejects_out_of_bounds_destinations() {
        let bad_cell = Layout::Tiles {
            name: "t".to_string(),
            columns: 2,
            rows: 1,
            cells: vec![cell(0, 2)],
        };
        assert!(bad_cell.validate().is_err());

        let bad_placement = Layout::Sprites {
            name: "s".to_string(),
            width: 16,
            height: 8,
            placements: vec![placement(0, 9, 0, false)],
        };
        let err = bad_placement.validate().unwrap_err();
        assert!(err.to_string().contains("layout 's'"));
    }

    #[test]
    fn validate_rejects_oversized_layouts() {
        let far_placement = Layout::Sprites {
            name: "far".to_string(),
            width: 16,
            height: 16,
            placements: vec![placement(0, usize::MAX, 0, false)],
        };
        assert!(far_placement.validate().is_err());

        let huge_grid = Layout::Tiles {
            name: "huge".to_string(),
            columns: usize::MAX / 2,
            rows: usize::MAX / 2,
            cells: vec![cell(0, 0)],
        };
        let err = huge_grid.validate().unwrap_err();
        assert!(err.to_string().contains("exceeds"));

        let huge_canvas = Layout::Sprites {
            name: "wide".to_string(),
            width: MAX_IMAGE_SIDE + 1,
            height: 8,
            placements: vec![],
        };
        assert!(huge_canvas.validate().is_err());

        let largest = Layout::Tiles {
            name: "edge".to_string(),
            columns: MAX_GRID_SIDE,
            rows: 1,
            cells: vec![cell(0, MAX_GRID_SIDE - 1)],
        };
        largest.validate().unwrap();
    }

    #[test]
    fn oversized_values_in_json_are_errors() {
        let json = r#"[{"kind": "sprites", "name": "a", "width": 16, "height": 16,
            "placements": [{"tile": 0, "x": 18446744073709551615, "y": 0}]}]"#;
        let layouts: Vec<Layout> = serde_json::from_str(json).unwrap();
        assert!(layouts[0].validate().is_err());
    }

    #[test]
    fn parses_json_with_default_mirror() {
        let json = r#"[
            {"kind": "sprites", "name": "a", "width": 8, "height": 8,
             "placements": [{"tile": 3, "x": 0, "y": 0}]},
            {"kind": "tiles", "name": "b", "columns": 1, "rows": 1,
             "cells": [{"from": 9, "to": 0}]}
        ]"#;
        let layouts: Vec<Layout> = serde_json::from_str(json).unwrap();
        assert_eq!(
            layouts[0],
            Layout::Sprites {
                name: "a".to_string(),
                width: 8,
                height: 8,
                placements: vec![placement(3, 0, 0, false)],
            }
        );
        assert_eq!(layouts[1].name(), "b");
        assert_eq!(layouts[1].max_source_tile(), Some(9));
    }
}
