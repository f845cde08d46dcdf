use std::{fs, path::Path};

use anyhow::{ensure, Context, Result};
use json_pretty_compact::PrettyCompactFormatter;
use log::info;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Serializer;

use crate::{layout::Layout, rom::Rom};

pub fn to_json_bytes<T: Serialize>(data: &T) -> Result<Vec<u8>> {
    let formatter = PrettyCompactFormatter::new();
    let mut data_bytes = vec![];
    let mut ser = Serializer::with_formatter(&mut data_bytes, formatter);
    data.serialize(&mut ser)?;
    Ok(data_bytes)
}

pub fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    info!("Saving {}", path.display());
    let data_bytes = to_json_bytes(data)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(path, &data_bytes).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    info!("Loading {}", path.display());
    let data_bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let data: T = serde_json::from_slice(&data_bytes)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(data)
}

pub fn load_layouts(path: &Path) -> Result<Vec<Layout>> {
    let layouts: Vec<Layout> = load_json(path)?;
    for layout in &layouts {
        layout.validate()?;
    }
    Ok(layouts)
}

pub fn load_rom(path: &Path) -> Result<Rom> {
    info!("Loading ROM from {}", path.display());
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    ensure!(!data.is_empty(), "{} is unexpectedly empty", path.display());
    Ok(Rom::new(data))
}

// Rewrites the whole file, not only the patched region.
pub fn save_rom(path: &Path, rom: &Rom) -> Result<()> {
    info!("Saving ROM to {}", path.display());
    fs::write(path, &rom.data).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
