// Fixed 4-color palette shared by export and import.
use std::fmt::Display;

use crate::common::{ColorArgb, PaletteIdx};

pub const BACKGROUND: ColorArgb = 0xFF505050;
pub const SKIN: ColorArgb = 0xFFE0A0C0;
pub const OUTLINE: ColorArgb = 0xFF000000;
pub const EQUIPMENT: ColorArgb = 0xFF60A0C0;

pub const PALETTE: [ColorArgb; 4] = [BACKGROUND, SKIN, OUTLINE, EQUIPMENT];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownColorError {
    pub color: ColorArgb,
}

impl Display for UnknownColorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "color 0x{:08X} is not in the palette", self.color)
    }
}

impl std::error::Error for UnknownColorError {}

/// Panics if `idx` is not a valid palette index (0-3).
pub fn index_to_color(idx: PaletteIdx) -> ColorArgb {
    PALETTE[idx as usize]
}

pub fn color_to_index(color: ColorArgb) -> Result<PaletteIdx, UnknownColorError> {
    PALETTE
        .iter()
        .position(|&c| c == color)
        .map(|i| i as PaletteIdx)
        .ok_or(UnknownColorError { color })
}
