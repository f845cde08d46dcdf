use std::{fmt::Display, ops::Add};

use anyhow::{ensure, Result};

use crate::common::{TileIdx, RAW_TILE_LEN};

// Byte index into the ROM file. Kept distinct from plain counts so that
// offsets and lengths don't get mixed up.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct RomOffset(pub usize);

impl Add<usize> for RomOffset {
    type Output = RomOffset;

    fn add(self, other: usize) -> Self {
        RomOffset(self.0 + other)
    }
}

impl Display for RomOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:X}", self.0)?;
        Ok(())
    }
}

impl RomOffset {
    pub fn of_tile(self, idx: TileIdx) -> RomOffset {
        self + idx * RAW_TILE_LEN
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rom {
    pub data: Vec<u8>,
}

impl Rom {
    pub fn new(data: Vec<u8>) -> Self {
        Rom { data }
    }

    pub fn ensure_range(&self, addr: RomOffset, n: usize) -> Result<()> {
        ensure!(
            addr.0.checked_add(n).is_some_and(|end| end <= self.data.len()),
            "range {}..{} is outside the {}-byte ROM",
            addr,
            RomOffset(addr.0.saturating_add(n)),
            self.data.len()
        );
        Ok(())
    }

    pub fn read_n(&self, addr: RomOffset, n: usize) -> Result<&[u8]> {
        self.ensure_range(addr, n)?;
        Ok(&self.data[addr.0..addr.0 + n])
    }

    pub fn write_n(&mut self, addr: RomOffset, bytes: &[u8]) -> Result<()> {
        self.ensure_range(addr, bytes.len())?;
        self.data[addr.0..addr.0 + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }
}
