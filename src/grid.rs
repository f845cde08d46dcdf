// Rectangular array of tiles, addressed in raster order by a single tile index.
use crate::{
    common::{PaletteIdx, PixelCoord, TileIdx, TILE_SIZE},
    tile::{self, PalletizedTile, RawTile},
};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Tile {
    pub raw: RawTile,
    pub palletized: PalletizedTile,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    tile_x_count: usize,
    tile_y_count: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Panics if the grid's tile or pixel dimensions overflow `usize`.
    pub fn new(tile_x_count: usize, tile_y_count: usize) -> Self {
        let tile_count = tile_x_count
            .checked_mul(tile_y_count)
            .filter(|_| tile_x_count.checked_mul(TILE_SIZE).is_some())
            .filter(|_| tile_y_count.checked_mul(TILE_SIZE).is_some());
        let Some(tile_count) = tile_count else {
            panic!("{}x{} tile grid is too large", tile_x_count, tile_y_count);
        };
        TileGrid {
            tile_x_count,
            tile_y_count,
            tiles: vec![Tile::default(); tile_count],
        }
    }

    pub fn tile_x_count(&self) -> usize {
        self.tile_x_count
    }

    pub fn tile_y_count(&self) -> usize {
        self.tile_y_count
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn tile_index(&self, tile_x: usize, tile_y: usize) -> TileIdx {
        tile_y * self.tile_x_count + tile_x
    }

    // Cannot overflow; `new` checks both pixel dimensions.
    pub fn pixel_width(&self) -> usize {
        self.tile_x_count * TILE_SIZE
    }

    pub fn pixel_height(&self) -> usize {
        self.tile_y_count * TILE_SIZE
    }

    pub fn tile(&self, idx: TileIdx) -> &Tile {
        &self.tiles[idx]
    }

    pub fn set_tile(&mut self, idx: TileIdx, tile: Tile) {
        self.tiles[idx] = tile;
    }

    pub fn palletized_value(&self, idx: TileIdx, x: PixelCoord, y: PixelCoord) -> PaletteIdx {
        debug_assert!(x < TILE_SIZE && y < TILE_SIZE);
        self.tiles[idx].palletized[y][x]
    }

    pub fn set_palletized_value(
        &mut self,
        idx: TileIdx,
        x: PixelCoord,
        y: PixelCoord,
        value: PaletteIdx,
    ) {
        debug_assert!(x < TILE_SIZE && y < TILE_SIZE);
        self.tiles[idx].palletized[y][x] = value;
    }

    pub fn raw_byte(&self, idx: TileIdx, byte_idx: usize) -> u8 {
        self.tiles[idx].raw.byte(byte_idx)
    }

    pub fn set_raw_byte_bit(&mut self, idx: TileIdx, byte_idx: usize, mask: u8) {
        self.tiles[idx].raw.or_bits(byte_idx, mask);
    }

    pub fn set_raw(&mut self, idx: TileIdx, raw: RawTile) {
        self.tiles[idx].raw = raw;
    }

    /// Copies only the decoded indices of `from[from_idx]` into `self[to_idx]`.
    pub fn copy_palletized(&mut self, from: &TileGrid, from_idx: TileIdx, to_idx: TileIdx) {
        self.tiles[to_idx].palletized = from.tiles[from_idx].palletized;
    }

    pub fn decode_all(&mut self) {
        for t in &mut self.tiles {
            t.palletized = tile::decode(&t.raw);
        }
    }

    pub fn encode_all(&mut self) {
        for t in &mut self.tiles {
            t.raw = tile::encode(&t.palletized);
        }
    }
}
