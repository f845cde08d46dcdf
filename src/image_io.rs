//! Image codec capability.
//!
//! The pipelines never touch an image file format directly; they are handed
//! an [`ImageCodec`] that turns files into ARGB canvases and back.
use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use anyhow::{bail, Context, Result};
use itertools::Itertools;
use log::info;

use crate::{
    canvas::Canvas,
    helpers::{argb_from_rgba, rgba_from_argb},
};

pub trait ImageCodec {
    fn decode(&self, path: &Path) -> Result<Canvas>;
    fn encode(&self, path: &Path, canvas: &Canvas) -> Result<()>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PngCodec;

impl ImageCodec for PngCodec {
    fn decode(&self, path: &Path) -> Result<Canvas> {
        info!("Reading image {}", path.display());
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let mut decoder = png::Decoder::new(BufReader::new(file));
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
        let mut reader = decoder
            .read_info()
            .with_context(|| format!("decoding {}", path.display()))?;
        let mut buf = vec![0; reader.output_buffer_size()];
        let frame = reader
            .next_frame(&mut buf)
            .with_context(|| format!("decoding {}", path.display()))?;
        let data = &buf[..frame.buffer_size()];

        let pixels = match frame.color_type {
            png::ColorType::Rgba => data
                .chunks_exact(4)
                .map(|p| argb_from_rgba([p[0], p[1], p[2], p[3]]))
                .collect_vec(),
            png::ColorType::Rgb => data
                .chunks_exact(3)
                .map(|p| argb_from_rgba([p[0], p[1], p[2], 0xFF]))
                .collect_vec(),
            png::ColorType::GrayscaleAlpha => data
                .chunks_exact(2)
                .map(|p| argb_from_rgba([p[0], p[0], p[0], p[1]]))
                .collect_vec(),
            png::ColorType::Grayscale => data
                .iter()
                .map(|&v| argb_from_rgba([v, v, v, 0xFF]))
                .collect_vec(),
            png::ColorType::Indexed => {
                bail!("{}: indexed color was not expanded", path.display())
            }
        };
        Ok(Canvas::from_pixels(
            frame.width as usize,
            frame.height as usize,
            pixels,
        ))
    }

    fn encode(&self, path: &Path, canvas: &Canvas) -> Result<()> {
        info!(
            "Writing {}x{} image {}",
            canvas.width,
            canvas.height,
            path.display()
        );
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        let mut encoder =
            png::Encoder::new(BufWriter::new(file), canvas.width as u32, canvas.height as u32);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let data = canvas
            .pixels
            .iter()
            .flat_map(|&c| rgba_from_argb(c))
            .collect_vec();
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&data)?;
        writer.finish()?;
        Ok(())
    }
}
