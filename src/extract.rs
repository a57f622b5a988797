use std::fmt;

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{ExtractOptions, PaletteMode};
use crate::error::{DecodeError, PaletteError};
use crate::kmeans::kmeans_lab;
use crate::merge::merge_close_clusters;
use crate::sampler::collect_samples;
use crate::select::{Candidate, rank_candidates, select_artwork, select_natural};

/// One entry of an extracted palette. Weights of a palette sum to 1.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaletteColor {
    pub rgb: [u8; 3],
    pub hex: String,
    pub weight: f64,
}

impl fmt::Display for PaletteColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.rgb;
        write!(
            f,
            "{}  RGB {}, {}, {} • {}%",
            self.hex,
            r,
            g,
            b,
            (self.weight * 100.0).round()
        )
    }
}

/// Both palettes for the same photo.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PalettePair {
    pub natural: Vec<PaletteColor>,
    pub artwork: Vec<PaletteColor>,
}

/// Check that `pixels` is a non-empty RGBA buffer of exactly `width × height` pixels.
pub fn validate_rgba(pixels: &[u8], width: u32, height: u32) -> Result<(), DecodeError> {
    let len = pixels.len();
    if len == 0 {
        return Err(DecodeError::Empty);
    }
    if len % 4 != 0 {
        return Err(DecodeError::NotRgba { len });
    }
    let expected = width as u64 * height as u64 * 4;
    if len as u64 != expected {
        return Err(DecodeError::DimensionMismatch { len, width, height });
    }
    Ok(())
}

/// Normalize counts over the selected candidates only.
fn to_palette(selected: &[&Candidate]) -> Vec<PaletteColor> {
    let total = selected.iter().map(|c| c.count as u64).sum::<u64>().max(1) as f64;
    selected
        .iter()
        .map(|c| PaletteColor {
            rgb: [c.rgb.red, c.rgb.green, c.rgb.blue],
            hex: c.hex.clone(),
            weight: c.count as f64 / total,
        })
        .collect()
}

/// Extract a palette from a decoded RGBA buffer, drawing k-means seeds from `rng`.
///
/// An image with no usable pixels yields an empty palette, not an error.
pub fn extract_palette_with_rng<R: Rng + ?Sized>(
    pixels: &[u8],
    width: u32,
    height: u32,
    options: &ExtractOptions,
    rng: &mut R,
) -> Result<Vec<PaletteColor>, PaletteError> {
    validate_rgba(pixels, width, height)?;
    if options.color_count == 0 {
        return Err(PaletteError::InvalidColorCount(options.color_count));
    }

    let color_count = options.color_count as usize;
    let preset = options.mode.preset();

    let samples = collect_samples(pixels, &preset.sample);
    debug!("{} mode: {} samples from {}x{}", options.mode, samples.len(), width, height);

    let clusters = kmeans_lab(&samples, color_count, preset.kmeans_iterations, rng);
    let merged = merge_close_clusters(clusters, preset.merge_threshold);
    let candidates = rank_candidates(&merged);
    debug!("{} clusters after merge, {} candidates", merged.len(), candidates.len());

    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let selected = match options.mode {
        PaletteMode::Natural => select_natural(&candidates, color_count),
        PaletteMode::Artwork => select_artwork(&candidates, color_count, preset),
    };
    debug!("selected {} of {} requested colors", selected.len(), color_count);

    Ok(to_palette(&selected))
}

/// [`extract_palette_with_rng`] seeded from the thread-local generator.
pub fn extract_palette(
    pixels: &[u8],
    width: u32,
    height: u32,
    options: &ExtractOptions,
) -> Result<Vec<PaletteColor>, PaletteError> {
    extract_palette_with_rng(pixels, width, height, options, &mut rand::rng())
}

/// Run both modes over the same buffer.
pub fn extract_palettes_with_rng<R: Rng + ?Sized>(
    pixels: &[u8],
    width: u32,
    height: u32,
    color_count: u32,
    rng: &mut R,
) -> Result<PalettePair, PaletteError> {
    let natural = ExtractOptions::new(color_count, PaletteMode::Natural);
    let artwork = ExtractOptions::new(color_count, PaletteMode::Artwork);
    Ok(PalettePair {
        natural: extract_palette_with_rng(pixels, width, height, &natural, rng)?,
        artwork: extract_palette_with_rng(pixels, width, height, &artwork, rng)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette::Srgb;

    #[test]
    fn validation_rejects_malformed_buffers() {
        assert_eq!(validate_rgba(&[], 0, 0), Err(DecodeError::Empty));
        assert_eq!(validate_rgba(&[0; 7], 1, 2), Err(DecodeError::NotRgba { len: 7 }));
        assert_eq!(
            validate_rgba(&[0; 8], 3, 1),
            Err(DecodeError::DimensionMismatch { len: 8, width: 3, height: 1 })
        );
        assert_eq!(validate_rgba(&[0; 8], 2, 1), Ok(()));
    }

    #[test]
    fn weights_use_selected_counts() {
        let a = Candidate::from_rgb(Srgb::new(200, 50, 50), 30);
        let b = Candidate::from_rgb(Srgb::new(50, 50, 200), 10);
        let palette = to_palette(&[&a, &b]);
        assert_eq!(palette[0].weight, 0.75);
        assert_eq!(palette[1].weight, 0.25);
        assert_eq!(palette[0].rgb, [200, 50, 50]);
        assert_eq!(palette[0].hex, "#C83232");
    }

    #[test]
    fn swatch_line_format() {
        let c = PaletteColor {
            rgb: [200, 50, 50],
            hex: "#C83232".into(),
            weight: 0.426,
        };
        assert_eq!(c.to_string(), "#C83232  RGB 200, 50, 50 • 43%");
    }
}
