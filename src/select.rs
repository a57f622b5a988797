use log::{debug, trace};
use palette::Srgb;

use crate::color::{Lab, clamp_channel, lab_distance, rgb_to_hex, rgb_to_hsv, rgb_to_lab};
use crate::config::{AccentTuning, ModePreset};
use crate::kmeans::Cluster;

/// A merged cluster described the way the selection strategies need it.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub rgb: Srgb<u8>,
    pub lab: Lab,
    pub count: u32,
    pub hex: String,
    /// Degrees, `[0, 360)`.
    pub hue: f64,
    pub sat: f64,
}

impl Candidate {
    pub fn from_rgb(rgb: Srgb<u8>, count: u32) -> Self {
        let hsv = rgb_to_hsv(rgb);
        Self {
            rgb,
            lab: rgb_to_lab(rgb),
            count,
            hex: rgb_to_hex(rgb.red as f64, rgb.green as f64, rgb.blue as f64),
            hue: hsv.hue,
            sat: hsv.saturation,
        }
    }

    /// LAB is recomputed from the rounded RGB so it matches the displayed color.
    pub fn from_cluster(cluster: &Cluster) -> Self {
        let [r, g, b] = cluster.center_rgb;
        let rgb = Srgb::new(clamp_channel(r), clamp_channel(g), clamp_channel(b));
        Self::from_rgb(rgb, cluster.count)
    }
}

/// Turn clusters into candidates ordered by descending count. Equal counts keep
/// their cluster order.
pub fn rank_candidates(clusters: &[Cluster]) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = clusters
        .iter()
        .filter(|c| c.count > 0)
        .map(Candidate::from_cluster)
        .collect();
    candidates.sort_by(|a, b| b.count.cmp(&a.count));
    candidates
}

fn is_selected(selected: &[&Candidate], c: &Candidate) -> bool {
    selected.iter().any(|s| s.hex == c.hex)
}

fn far_from_all(selected: &[&Candidate], c: &Candidate, min_dist: f64) -> bool {
    selected.iter().all(|s| lab_distance(&s.lab, &c.lab) >= min_dist)
}

fn total_count(candidates: &[Candidate]) -> u64 {
    candidates.iter().map(|c| c.count as u64).sum::<u64>().max(1)
}

/// Take the most prevalent colors as they are.
pub fn select_natural(candidates: &[Candidate], color_count: usize) -> Vec<&Candidate> {
    candidates.iter().take(color_count).collect()
}

/// Hue bucket start in degrees; a hue that lands exactly on 360 folds to 0.
pub fn hue_bucket(hue: f64, width: f64) -> u32 {
    let start = ((hue / width).floor() * width) as u32;
    if start == 360 { 0 } else { start }
}

struct Bucket<'a> {
    start: u32,
    score: f64,
    members: Vec<&'a Candidate>,
}

/// Find the hue family with the highest `saturation × count` score among
/// saturated, non-negligible candidates. Members come back by count descending.
fn accent_family<'a>(candidates: &'a [Candidate], tuning: &AccentTuning) -> Option<Vec<&'a Candidate>> {
    let min_count = (total_count(candidates) as f64 * tuning.min_share).floor();

    let mut buckets: Vec<Bucket<'a>> = Vec::new();
    for c in candidates
        .iter()
        .filter(|c| c.sat >= tuning.min_saturation && c.count as f64 >= min_count)
    {
        let start = hue_bucket(c.hue, tuning.hue_bucket_degrees);
        let idx = match buckets.iter().position(|b| b.start == start) {
            Some(idx) => idx,
            None => {
                buckets.push(Bucket {
                    start,
                    score: 0.0,
                    members: Vec::new(),
                });
                buckets.len() - 1
            }
        };
        buckets[idx].score += c.sat * c.count as f64;
        buckets[idx].members.push(c);
    }

    // strict comparison: the first bucket seen wins a tie
    let mut best: Option<Bucket<'a>> = None;
    for bucket in buckets {
        trace!("hue bucket {}°: score {:.2}, {} members", bucket.start, bucket.score, bucket.members.len());
        if best.as_ref().is_none_or(|b| bucket.score > b.score) {
            best = Some(bucket);
        }
    }

    best.map(|b| {
        debug!("accent family at {}° with {} candidates", b.start, b.members.len());
        let mut members = b.members;
        members.sort_by(|x, y| y.count.cmp(&x.count));
        members
    })
}

/// Fill remaining slots, first with candidates at least `min_dist` from every
/// pick (ignoring tiny ones), then with anything not yet picked.
fn fill_with_diversity<'a>(
    candidates: &'a [Candidate],
    mut selected: Vec<&'a Candidate>,
    color_count: usize,
    min_dist: f64,
    min_weight: f64,
) -> Vec<&'a Candidate> {
    let total = total_count(candidates) as f64;

    for c in candidates.iter().filter(|c| c.count as f64 / total >= min_weight) {
        if selected.len() >= color_count {
            break;
        }
        if is_selected(&selected, c) || !far_from_all(&selected, c, min_dist) {
            continue;
        }
        selected.push(c);
    }

    for c in candidates {
        if selected.len() >= color_count {
            break;
        }
        if !is_selected(&selected, c) {
            selected.push(c);
        }
    }

    selected.truncate(color_count);
    selected
}

/// Keep the dominant color, add up to two tones from the accent family, then
/// fill for variety.
pub fn select_artwork<'a>(
    candidates: &'a [Candidate],
    color_count: usize,
    preset: &ModePreset,
) -> Vec<&'a Candidate> {
    let Some(base) = candidates.first() else {
        return Vec::new();
    };
    let mut selected = vec![base];

    let family = preset
        .accent
        .as_ref()
        .and_then(|tuning| accent_family(candidates, tuning).map(|f| (f, tuning.pair_distance)));

    if let Some((family, pair_distance)) = family {
        if let Some(first) = family.iter().copied().find(|c| !is_selected(&selected, c)) {
            selected.push(first);
        }
        if let Some(second) = family
            .iter()
            .copied()
            .find(|c| !is_selected(&selected, c) && far_from_all(&selected, c, pair_distance))
        {
            selected.push(second);
        }
    } else {
        debug!("no accent family found");
    }

    fill_with_diversity(
        candidates,
        selected,
        color_count,
        preset.diversity_distance,
        preset.diversity_min_weight,
    )
}
