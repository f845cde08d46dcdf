//! 2bpp planar tile codec.
//!
//! A raw tile is 16 bytes: bytes 0-7 hold the low bit-plane of rows 0-7 and
//! bytes 8-15 hold the high bit-plane of the same rows. Within each byte the
//! most significant bit is the leftmost pixel.
use itertools::iproduct;

use crate::common::{PaletteIdx, PixelCoord, RAW_TILE_LEN, TILE_SIZE};

const HIGH_PLANE: usize = TILE_SIZE;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RawTile(pub [u8; RAW_TILE_LEN]);

// Palette indices (0-3), indexed [y][x].
pub type PalletizedTile = [[PaletteIdx; TILE_SIZE]; TILE_SIZE];

pub fn column_mask(x: PixelCoord) -> u8 {
    0x80 >> x
}

impl RawTile {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut data = [0; RAW_TILE_LEN];
        data.copy_from_slice(bytes);
        RawTile(data)
    }

    pub fn as_bytes(&self) -> &[u8; RAW_TILE_LEN] {
        &self.0
    }

    pub fn byte(&self, byte_idx: usize) -> u8 {
        self.0[byte_idx]
    }

    // Bits are only ever set here, never cleared.
    pub fn or_bits(&mut self, byte_idx: usize, mask: u8) {
        self.0[byte_idx] |= mask;
    }
}

pub fn decode_pixel(raw: &RawTile, x: PixelCoord, y: PixelCoord) -> PaletteIdx {
    let mask = column_mask(x);
    let low = ((raw.0[y] & mask) != 0) as PaletteIdx;
    let high = ((raw.0[HIGH_PLANE + y] & mask) != 0) as PaletteIdx;
    low | high << 1
}

pub fn decode(raw: &RawTile) -> PalletizedTile {
    let mut tile: PalletizedTile = [[0; TILE_SIZE]; TILE_SIZE];
    for (y, x) in iproduct!(0..TILE_SIZE, 0..TILE_SIZE) {
        tile[y][x] = decode_pixel(raw, x, y);
    }
    tile
}

/// Packs palette indices back into planar form, starting from an all-zero tile.
///
/// Panics if any index is outside 0-3.
pub fn encode(tile: &PalletizedTile) -> RawTile {
    let mut raw = RawTile::default();
    for (y, x) in iproduct!(0..TILE_SIZE, 0..TILE_SIZE) {
        let idx = tile[y][x];
        assert!(idx < 4, "palette index {} out of range at ({}, {})", idx, x, y);
        let mask = column_mask(x);
        if idx & 1 != 0 {
            raw.or_bits(y, mask);
        }
        if idx & 2 != 0 {
            raw.or_bits(HIGH_PLANE + y, mask);
        }
    }
    raw
}
