use palette::Srgb;

use crate::color::{Lab, rgb_to_lab};
use crate::config::SampleFilter;

/// A pixel that survived filtering, with its LAB value precomputed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub rgb: Srgb<u8>,
    pub lab: Lab,
}

impl Sample {
    pub fn new(rgb: Srgb<u8>) -> Self {
        Self {
            rgb,
            lab: rgb_to_lab(rgb),
        }
    }
}

fn admit(filter: &SampleFilter, px: &[u8]) -> bool {
    let (r, g, b, a) = (px[0], px[1], px[2], px[3]);
    if a < filter.min_alpha {
        return false;
    }

    let brightness = (r as f64 + g as f64 + b as f64) / 3.0;
    if brightness < filter.min_brightness || brightness > filter.max_brightness {
        return false;
    }

    let spread = r.max(g).max(b) - r.min(g).min(b);
    if let Some(bg) = filter.bright_background {
        if brightness > bg.brightness_above && spread < bg.flat_spread {
            return false;
        }
    }
    spread >= filter.min_spread
}

/// Walk an RGBA buffer at the filter's stride and collect admitted pixels.
///
/// Trailing bytes that do not form a whole pixel are ignored.
pub fn collect_samples(rgba: &[u8], filter: &SampleFilter) -> Vec<Sample> {
    let stride = filter.stride.max(1);
    rgba.chunks_exact(4)
        .step_by(stride)
        .filter(|px| admit(filter, px))
        .map(|px| Sample::new(Srgb::new(px[0], px[1], px[2])))
        .collect()
}
