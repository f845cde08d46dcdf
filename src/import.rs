// Raster image -> ROM tiles. Only the straight raster layout can be imported;
// curated composites have no fixed relationship to ROM order.
use std::path::Path;

use anyhow::{ensure, Context, Result};
use itertools::iproduct;
use log::info;

use crate::{
    canvas::Canvas,
    common::{tile_count_for_len, FormatError, RAW_TILE_LEN, TILE_SIZE},
    grid::TileGrid,
    image_io::ImageCodec,
    palette,
    persist,
    rom::{Rom, RomOffset},
};

/// Maps every pixel back to its palette index and re-encodes the tiles.
/// Fails on the first pixel whose color is not in the palette.
pub fn image_to_grid(canvas: &Canvas) -> Result<TileGrid> {
    let (width, height) = (canvas.width, canvas.height);
    if width % TILE_SIZE != 0 || height % TILE_SIZE != 0 {
        return Err(FormatError::ImageSize { width, height }.into());
    }

    let mut grid = TileGrid::new(width / TILE_SIZE, height / TILE_SIZE);
    for (y, x) in iproduct!(0..height, 0..width) {
        let idx = palette::color_to_index(canvas.pixel(x, y))
            .with_context(|| format!("pixel ({}, {})", x, y))?;
        let tile_idx = grid.tile_index(x / TILE_SIZE, y / TILE_SIZE);
        grid.set_palletized_value(tile_idx, x % TILE_SIZE, y % TILE_SIZE, idx);
    }
    grid.encode_all();
    Ok(grid)
}

/// Writes the first `tile_count` tiles of `grid` into `rom` starting at
/// `offset`. The whole region is checked before anything is written.
pub fn patch_rom(
    rom: &mut Rom,
    offset: RomOffset,
    grid: &TileGrid,
    tile_count: usize,
) -> Result<()> {
    ensure!(
        tile_count <= grid.tile_count(),
        "{} tiles requested but the image only holds {}",
        tile_count,
        grid.tile_count()
    );
    rom.ensure_range(offset, tile_count * RAW_TILE_LEN)?;
    for idx in 0..tile_count {
        rom.write_n(offset.of_tile(idx), grid.tile(idx).raw.as_bytes())?;
    }
    info!("Patched {} tiles at {}", tile_count, offset);
    Ok(())
}

/// `byte_len` limits how many leading tiles are written; `None` writes them all.
pub fn run(
    codec: &impl ImageCodec,
    image_path: &Path,
    rom_path: &Path,
    offset: RomOffset,
    byte_len: Option<usize>,
) -> Result<()> {
    info!(
        "Importing {} into {} at {}",
        image_path.display(),
        rom_path.display(),
        offset
    );
    let canvas = codec.decode(image_path)?;
    let grid = image_to_grid(&canvas)
        .with_context(|| format!("converting {}", image_path.display()))?;
    let tile_count = match byte_len {
        Some(len) => tile_count_for_len(len)?,
        None => grid.tile_count(),
    };

    let mut rom = persist::load_rom(rom_path)?;
    patch_rom(&mut rom, offset, &grid, tile_count)?;
    persist::save_rom(rom_path, &rom)?;
    Ok(())
}
