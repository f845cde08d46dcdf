use std::{io::Write, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use chr_tiles::{
    common::DEFAULT_RASTER_WIDTH,
    export::{self, Composites, ExportOptions},
    image_io::PngCodec,
    import,
    layout::builtin_layouts,
    persist,
    rom::RomOffset,
};
use clap::{Parser, Subcommand};
use log::{error, info};

#[derive(Parser, Debug)]
#[command(about = "Export ROM tile graphics to PNG and import them back")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode tiles from a ROM into a PNG image
    Export {
        rom_file: PathBuf,
        image_file: PathBuf,
        /// Offset of the first tile (hex, "0x" optional)
        #[arg(value_parser = parse_hex)]
        offset: usize,
        /// Length of the tile data in bytes (multiple of 16)
        #[arg(value_parser = parse_len)]
        byte_length: usize,
        /// Tiles per row in the raster image
        #[arg(long, default_value_t = DEFAULT_RASTER_WIDTH)]
        raster_width: usize,
        /// JSON file of composite layouts to use instead of the built-in ones
        #[arg(long)]
        layouts: Option<PathBuf>,
        /// Only write the raster image
        #[arg(long, conflicts_with = "layouts")]
        no_composites: bool,
    },
    /// Encode a PNG image back into a ROM
    Import {
        image_file: PathBuf,
        rom_file: PathBuf,
        /// Offset of the first tile (hex, "0x" optional)
        #[arg(value_parser = parse_hex)]
        offset: usize,
        /// Only write this many bytes of tiles (multiple of 16)
        #[arg(value_parser = parse_len)]
        byte_length: Option<usize>,
    },
    /// Print the built-in composite layouts as JSON
    Layouts {
        /// Write to a file instead of standard output
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn parse_hex(s: &str) -> Result<usize, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    // from_str_radix alone would also take a leading sign.
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(format!("invalid hex offset '{}'", s));
    }
    usize::from_str_radix(digits, 16).map_err(|e| format!("invalid hex offset '{}': {}", s, e))
}

fn parse_len(s: &str) -> Result<usize, String> {
    if s.starts_with("0x") || s.starts_with("0X") {
        return parse_hex(s);
    }
    s.parse()
        .map_err(|e| format!("invalid byte length '{}': {}", s, e))
}

fn run(args: Args) -> Result<()> {
    // Acquired once and passed into the pipelines.
    let codec = PngCodec;
    match args.command {
        Command::Export {
            rom_file,
            image_file,
            offset,
            byte_length,
            raster_width,
            layouts,
            no_composites,
        } => {
            let composites = if no_composites {
                Composites::None
            } else if let Some(path) = layouts {
                Composites::Custom(persist::load_layouts(&path)?)
            } else {
                Composites::Builtin(builtin_layouts())
            };
            let options = ExportOptions {
                raster_width,
                composites,
            };
            export::run(
                &codec,
                &rom_file,
                &image_file,
                RomOffset(offset),
                byte_length,
                &options,
            )
        }
        Command::Import {
            image_file,
            rom_file,
            offset,
            byte_length,
        } => import::run(
            &codec,
            &image_file,
            &rom_file,
            RomOffset(offset),
            byte_length,
        ),
        Command::Layouts { out } => match out {
            Some(path) => persist::save_json(&path, &builtin_layouts()),
            None => {
                let bytes = persist::to_json_bytes(&builtin_layouts())?;
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(&bytes)?;
                writeln!(stdout).context("writing to standard output")?;
                Ok(())
            }
        },
    }
}

pub fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => {
            info!("Success.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
