// ROM tiles -> raster image (+ curated composite images).
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use log::{debug, info, warn};

use crate::{
    canvas::{self, Canvas},
    common::{tile_count_for_len, MAX_GRID_SIDE, RAW_TILE_LEN},
    grid::TileGrid,
    image_io::ImageCodec,
    layout::Layout,
    persist,
    rom::{Rom, RomOffset},
    tile::RawTile,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Composites {
    None,
    // Skipped (with a warning) when the export doesn't cover their tiles.
    Builtin(Vec<Layout>),
    // Must be fully covered by the export.
    Custom(Vec<Layout>),
}

#[derive(Clone, Debug)]
pub struct ExportOptions {
    pub raster_width: usize,
    pub composites: Composites,
}

/// Reads `byte_len / 16` consecutive tiles starting at `offset` into a grid
/// `raster_width` tiles wide, and decodes them.
pub fn read_tiles(
    rom: &Rom,
    offset: RomOffset,
    byte_len: usize,
    raster_width: usize,
) -> Result<(TileGrid, usize)> {
    let tile_count = tile_count_for_len(byte_len)?;
    ensure!(
        (1..=MAX_GRID_SIDE).contains(&raster_width),
        "raster width {} must be between 1 and {} tiles",
        raster_width,
        MAX_GRID_SIDE
    );
    let data = rom.read_n(offset, byte_len)?;

    let mut grid = TileGrid::new(raster_width, tile_count.div_ceil(raster_width));
    for (i, bytes) in data.chunks_exact(RAW_TILE_LEN).enumerate() {
        grid.set_raw(i, RawTile::from_bytes(bytes));
    }
    grid.decode_all();
    info!("Decoded {} tiles at {}", tile_count, offset);
    Ok((grid, tile_count))
}

/// The composite layouts to render for an export of `tile_count` tiles.
pub fn select_layouts(composites: &Composites, tile_count: usize) -> Result<Vec<&Layout>> {
    let mut selected = vec![];
    match composites {
        Composites::None => {}
        Composites::Builtin(layouts) => {
            for layout in layouts {
                match layout.max_source_tile() {
                    Some(max) if max >= tile_count => {
                        warn!(
                            "Skipping layout '{}': it uses tile 0x{:X} but only {} tiles were exported",
                            layout.name(),
                            max,
                            tile_count
                        );
                    }
                    _ => selected.push(layout),
                }
            }
        }
        Composites::Custom(layouts) => {
            for layout in layouts {
                layout.validate()?;
                if let Some(max) = layout.max_source_tile() {
                    ensure!(
                        max < tile_count,
                        "layout '{}' uses tile 0x{:X} but only {} tiles were exported",
                        layout.name(),
                        max,
                        tile_count
                    );
                }
                selected.push(layout);
            }
        }
    }
    Ok(selected)
}

/// `sprites.png` + `facing` -> `sprites.facing.png`
pub fn composite_path(image_path: &Path, layout_name: &str) -> PathBuf {
    let stem = image_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = image_path
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "png".to_string());
    image_path.with_file_name(format!("{}.{}.{}", stem, layout_name, ext))
}

/// Renders the raster image and every selected composite.
pub fn render(
    rom: &Rom,
    offset: RomOffset,
    byte_len: usize,
    options: &ExportOptions,
) -> Result<(Canvas, Vec<(String, Canvas)>)> {
    let (grid, tile_count) = read_tiles(rom, offset, byte_len, options.raster_width)?;
    let raster = canvas::render_grid(&grid);

    let mut composites = vec![];
    for layout in select_layouts(&options.composites, tile_count)? {
        debug!("Rendering layout '{}'", layout.name());
        composites.push((layout.name().to_string(), layout.render(&grid)));
    }
    Ok((raster, composites))
}

pub fn run(
    codec: &impl ImageCodec,
    rom_path: &Path,
    image_path: &Path,
    offset: RomOffset,
    byte_len: usize,
    options: &ExportOptions,
) -> Result<()> {
    info!(
        "Exporting {} bytes at {} from {}",
        byte_len,
        offset,
        rom_path.display()
    );
    let rom = persist::load_rom(rom_path)?;
    let (raster, composites) = render(&rom, offset, byte_len, options)
        .with_context(|| format!("exporting tiles from {}", rom_path.display()))?;

    codec.encode(image_path, &raster)?;
    for (name, canvas) in &composites {
        codec.encode(&composite_path(image_path, name), canvas)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::FormatError,
        layout::{builtin_layouts, Cell},
        palette::BACKGROUND,
    };

    fn rom_with_tiles(count: usize) -> Rom {
        let mut data = vec![0; count * RAW_TILE_LEN];
        for i in 0..count {
            data[i * RAW_TILE_LEN] = 0x80; // pixel (0, 0) of every tile = 1
        }
        Rom::new(data)
    }

    #[test]
    fn grid_rounds_up_to_whole_rows() {
        let rom = rom_with_tiles(20);
        let (grid, count) = read_tiles(&rom, RomOffset(0), 17 * RAW_TILE_LEN, 16).unwrap();
        assert_eq!(count, 17);
        assert_eq!((grid.tile_x_count(), grid.tile_y_count()), (16, 2));
        assert_eq!(grid.palletized_value(16, 0, 0), 1);
        assert_eq!(grid.palletized_value(17, 0, 0), 0);
    }

    #[test]
    fn byte_length_must_be_tile_multiple() {
        let rom = rom_with_tiles(4);
        for len in [0, 15, 33] {
            let err = read_tiles(&rom, RomOffset(0), len, 16).unwrap_err();
            assert_eq!(
                err.downcast_ref::<FormatError>(),
                Some(&FormatError::ByteLength { len })
            );
        }
    }

    #[test]
    fn region_past_end_of_rom_is_an_error() {
        let rom = rom_with_tiles(2);
        assert!(read_tiles(&rom, RomOffset(0x10), 32, 16).is_err());
        assert!(read_tiles(&rom, RomOffset(0), 32, 0).is_err());
    }

    #[test]
    fn raster_width_is_bounded() {
        let rom = rom_with_tiles(2);
        let err = read_tiles(&rom, RomOffset(0), 32, usize::MAX / 4).unwrap_err();
        assert!(err.to_string().contains("raster width"));
        assert!(read_tiles(&rom, RomOffset(0), 32, MAX_GRID_SIDE + 1).is_err());

        let (grid, tile_count) = read_tiles(&rom, RomOffset(0), 32, MAX_GRID_SIDE).unwrap();
        assert_eq!(tile_count, 2);
        assert_eq!((grid.tile_x_count(), grid.tile_y_count()), (MAX_GRID_SIDE, 1));
    }

    #[test]
    fn raster_is_sixteen_tiles_wide() {
        let mut rom = rom_with_tiles(4);
        rom.data[0x10 + 8] = 0x80; // tile at 0x10 has pixel (0, 0) = 3
        let options = ExportOptions {
            raster_width: 16,
            composites: Composites::None,
        };
        let (raster, composites) = render(&rom, RomOffset(0x10), 32, &options).unwrap();
        assert!(composites.is_empty());
        assert_eq!((raster.width, raster.height), (128, 8));
        assert_eq!(raster.pixel(0, 0), 0xFF60A0C0);
        assert_eq!(raster.pixel(8, 0), 0xFFE0A0C0);
        assert!((16..128).all(|x| (0..8).all(|y| raster.pixel(x, y) == BACKGROUND)));
    }

    #[test]
    fn builtin_layouts_are_skipped_when_uncovered() {
        let layouts = builtin_layouts();
        let composites = Composites::Builtin(layouts.clone());
        let names = |n| {
            select_layouts(&composites, n)
                .unwrap()
                .iter()
                .map(|l| l.name().to_string())
                .collect::<Vec<_>>()
        };
        assert!(names(2).is_empty());
        assert_eq!(names(8), ["facing"]);
        assert_eq!(names(256), ["reformatted", "facing"]);
    }

    #[test]
    fn custom_layouts_must_be_covered() {
        let layout = Layout::Tiles {
            name: "big".to_string(),
            columns: 1,
            rows: 1,
            cells: vec![Cell { from: 40, to: 0 }],
        };
        let composites = Composites::Custom(vec![layout]);
        assert!(select_layouts(&composites, 40).is_err());
        assert_eq!(select_layouts(&composites, 41).unwrap().len(), 1);
    }

    #[test]
    fn composite_files_sit_next_to_the_raster() {
        assert_eq!(
            composite_path(Path::new("out/sprites.png"), "facing"),
            PathBuf::from("out/sprites.facing.png")
        );
        assert_eq!(
            composite_path(Path::new("sheet"), "reformatted"),
            PathBuf::from("sheet.reformatted.png")
        );
    }
}
