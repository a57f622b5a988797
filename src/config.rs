use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Selection policy for a palette.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteMode {
    /// Report the dominant colors as they occur in the photo.
    Natural,
    /// Favor the most saturated hue family and suppress flat background tones.
    #[default]
    Artwork,
}

impl PaletteMode {
    pub fn preset(self) -> &'static ModePreset {
        match self {
            PaletteMode::Natural => &ModePreset::NATURAL,
            PaletteMode::Artwork => &ModePreset::ARTWORK,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaletteMode::Natural => "natural",
            PaletteMode::Artwork => "artwork",
        }
    }
}

impl fmt::Display for PaletteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown palette mode `{0}` (expected `natural` or `artwork`)")]
pub struct ParseModeError(pub String);

impl FromStr for PaletteMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "natural" => Ok(PaletteMode::Natural),
            "artwork" => Ok(PaletteMode::Artwork),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// Pixel admission rules applied while sampling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleFilter {
    /// Visit every `stride`-th pixel.
    pub stride: usize,
    pub min_alpha: u8,
    /// Mean of R, G, B must lie in `[min_brightness, max_brightness]`.
    pub min_brightness: f64,
    pub max_brightness: f64,
    /// Bright pixels whose channel spread is under `flat_spread` are dropped as
    /// background. Disabled when `None`.
    pub bright_background: Option<BrightBackground>,
    /// Pixels with a channel spread under this are dropped as gray noise.
    pub min_spread: u8,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrightBackground {
    pub brightness_above: f64,
    pub flat_spread: u8,
}

/// Thresholds used by the accent-family selection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AccentTuning {
    pub min_saturation: f64,
    /// Fraction of the total candidate count an accent must reach.
    pub min_share: f64,
    pub hue_bucket_degrees: f64,
    /// Minimum ΔE between the two accent tones.
    pub pair_distance: f64,
}

/// Every mode-dependent number in the pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModePreset {
    pub sample: SampleFilter,
    pub kmeans_iterations: usize,
    /// Clusters closer than this ΔE are folded together.
    pub merge_threshold: f64,
    /// Accent family detection; natural mode skips it entirely.
    pub accent: Option<AccentTuning>,
    /// Minimum ΔE between colors added by the diversity fill.
    pub diversity_distance: f64,
    /// Candidates below this share of the total are skipped by the diversity fill.
    pub diversity_min_weight: f64,
}

impl ModePreset {
    pub const NATURAL: ModePreset = ModePreset {
        sample: SampleFilter {
            stride: 6,
            min_alpha: 220,
            min_brightness: 5.0,
            max_brightness: 252.0,
            bright_background: None,
            min_spread: 0,
        },
        kmeans_iterations: 12,
        merge_threshold: 18.0,
        accent: None,
        diversity_distance: 12.0,
        diversity_min_weight: 0.005,
    };

    pub const ARTWORK: ModePreset = ModePreset {
        sample: SampleFilter {
            stride: 4,
            min_alpha: 220,
            min_brightness: 10.0,
            max_brightness: 248.0,
            bright_background: Some(BrightBackground {
                brightness_above: 160.0,
                flat_spread: 20,
            }),
            min_spread: 6,
        },
        kmeans_iterations: 12,
        merge_threshold: 12.0,
        accent: Some(AccentTuning {
            min_saturation: 0.22,
            min_share: 0.003,
            hue_bucket_degrees: 20.0,
            pair_distance: 10.0,
        }),
        diversity_distance: 12.0,
        diversity_min_weight: 0.005,
    };
}

pub const DEFAULT_COLOR_COUNT: u32 = 8;

/// Width, in pixels, photos are reduced to before sampling.
pub const WORKING_WIDTH: u32 = 180;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOptions {
    pub color_count: u32,
    pub mode: PaletteMode,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            color_count: DEFAULT_COLOR_COUNT,
            mode: PaletteMode::default(),
        }
    }
}

impl ExtractOptions {
    pub fn new(color_count: u32, mode: PaletteMode) -> Self {
        Self { color_count, mode }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_parse_case_insensitively() {
        assert_eq!("natural".parse::<PaletteMode>(), Ok(PaletteMode::Natural));
        assert_eq!(" Artwork ".parse::<PaletteMode>(), Ok(PaletteMode::Artwork));
        assert!("sepia".parse::<PaletteMode>().is_err());
        assert_eq!(PaletteMode::Natural.to_string(), "natural");
    }

    #[test]
    fn artwork_is_stricter_than_natural() {
        let n = PaletteMode::Natural.preset();
        let a = PaletteMode::Artwork.preset();
        assert!(a.sample.stride < n.sample.stride);
        assert!(a.sample.min_brightness > n.sample.min_brightness);
        assert!(a.sample.max_brightness < n.sample.max_brightness);
        assert!(a.merge_threshold < n.merge_threshold);
        assert!(n.accent.is_none() && a.accent.is_some());
    }
}
