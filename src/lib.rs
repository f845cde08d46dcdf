//! Conversion between 2bpp planar ROM tile graphics and indexed-color images.
pub mod canvas;
pub mod common;
pub mod export;
pub mod grid;
pub mod helpers;
pub mod image_io;
pub mod import;
pub mod layout;
pub mod palette;
pub mod persist;
pub mod rom;
pub mod tile;
