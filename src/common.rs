use std::fmt::Display;

pub type PaletteIdx = u8; // Index into the 4-color palette (0-3)
pub type ColorArgb = u32; // 32-bit ARGB pixel value
pub type TileIdx = usize; // Linear raster index into a tile grid
pub type PixelCoord = usize; // Pixel coordinate within a tile (0-7)

pub const TILE_SIZE: usize = 8;
pub const TILE_PIXELS: usize = TILE_SIZE * TILE_SIZE;
pub const RAW_TILE_LEN: usize = 16;

// Tiles per row of the straight raster export.
pub const DEFAULT_RASTER_WIDTH: usize = 16;

// Largest layout canvas edge and widest raster export, in pixels.
pub const MAX_IMAGE_SIDE: usize = 16384;
pub const MAX_GRID_SIDE: usize = MAX_IMAGE_SIDE / TILE_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    ByteLength { len: usize },
    ImageSize { width: usize, height: usize },
}

impl Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatError::ByteLength { len } => write!(
                f,
                "byte length {} is not a positive multiple of {}",
                len, RAW_TILE_LEN
            ),
            FormatError::ImageSize { width, height } => write!(
                f,
                "image size {}x{} is not a multiple of the {}x{} tile size",
                width, height, TILE_SIZE, TILE_SIZE
            ),
        }
    }
}

impl std::error::Error for FormatError {}

/// Number of whole tiles in `len` bytes of tile data.
pub fn tile_count_for_len(len: usize) -> Result<usize, FormatError> {
    if len == 0 || len % RAW_TILE_LEN != 0 {
        return Err(FormatError::ByteLength { len });
    }
    Ok(len / RAW_TILE_LEN)
}
