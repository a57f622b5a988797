use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use photo_palette_wasm::{
    ExtractOptions, PaletteColor, PaletteMode, extract_palette_bytes_with_rng, extract_palettes_bytes_with_rng,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;
use std::fs;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Natural,
    Artwork,
    Both,
}

/// Extract natural and artwork color palettes from photos.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Number of colors per palette
    #[arg(short = 'k', long, default_value_t = 8)]
    colors: u32,

    /// Selection policy
    #[arg(short, long, value_enum, default_value_t = ModeArg::Both)]
    mode: ModeArg,

    /// Seed for k-means initialisation; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Print JSON instead of swatch lines
    #[arg(long)]
    json: bool,

    /// Log pipeline stages (same as RUST_LOG=debug)
    #[arg(short, long)]
    verbose: bool,
}

fn print_palette(label: &str, palette: &[PaletteColor]) {
    println!("  {label}:");
    if palette.is_empty() {
        println!("    (no usable colors)");
    }
    for c in palette {
        println!("    {c}");
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut report = Vec::new();
    for input in &args.inputs {
        let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;

        let (natural, artwork) = match args.mode {
            ModeArg::Both => {
                let pair = extract_palettes_bytes_with_rng(&bytes, args.colors, &mut rng)
                    .with_context(|| format!("extracting palettes from {}", input.display()))?;
                (Some(pair.natural), Some(pair.artwork))
            }
            single => {
                let mode = if single == ModeArg::Natural {
                    PaletteMode::Natural
                } else {
                    PaletteMode::Artwork
                };
                let palette = extract_palette_bytes_with_rng(&bytes, &ExtractOptions::new(args.colors, mode), &mut rng)
                    .with_context(|| format!("extracting {mode} palette from {}", input.display()))?;
                match mode {
                    PaletteMode::Natural => (Some(palette), None),
                    PaletteMode::Artwork => (None, Some(palette)),
                }
            }
        };

        if args.json {
            report.push(json!({
                "input": input.display().to_string(),
                "natural": natural,
                "artwork": artwork,
            }));
        } else {
            println!("{}", input.display());
            if let Some(p) = &natural {
                print_palette("natural", p);
            }
            if let Some(p) = &artwork {
                print_palette("artwork", p);
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
