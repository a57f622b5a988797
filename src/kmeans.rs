use rand::Rng;

use crate::color::{Lab, lab_distance_sq};
use crate::sampler::Sample;

/// A group of samples. `center_rgb` is the mean of the members' sRGB bytes,
/// kept apart from `center_lab` so displayed colors stay close to real pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cluster {
    pub center_lab: Lab,
    pub center_rgb: [f64; 3],
    pub count: u32,
}

fn nearest(lab: &Lab, centers: &[Lab]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (idx, c) in centers.iter().enumerate() {
        let d = lab_distance_sq(lab, c);
        // strict: ties stay with the lower index
        if d < best_dist {
            best_dist = d;
            best = idx;
        }
    }
    best
}

/// Lloyd's k-means over LAB samples.
///
/// Seeds are drawn uniformly (with replacement) from `samples` using `rng`, and
/// exactly `iterations` assign/update rounds run. Empty centers are left where
/// they are. Only clusters with members are returned, so the result may hold
/// fewer than `k` entries. `k` is capped at the sample count.
pub fn kmeans_lab<R: Rng + ?Sized>(
    samples: &[Sample],
    k: usize,
    iterations: usize,
    rng: &mut R,
) -> Vec<Cluster> {
    if samples.is_empty() || k == 0 {
        return Vec::new();
    }
    // no more than one non-empty cluster per sample
    let k = k.min(samples.len());

    let mut centers: Vec<Lab> = (0..k)
        .map(|_| samples[rng.random_range(0..samples.len())].lab)
        .collect();
    let mut assignments = vec![0usize; samples.len()];

    for _ in 0..iterations {
        for (slot, s) in assignments.iter_mut().zip(samples) {
            *slot = nearest(&s.lab, &centers);
        }

        let mut sums = vec![[0.0f64; 3]; k];
        let mut counts = vec![0u32; k];
        for (&c, s) in assignments.iter().zip(samples) {
            sums[c][0] += s.lab.l;
            sums[c][1] += s.lab.a;
            sums[c][2] += s.lab.b;
            counts[c] += 1;
        }

        for (center, (sum, &n)) in centers.iter_mut().zip(sums.iter().zip(&counts)) {
            if n == 0 {
                continue;
            }
            let n = n as f64;
            *center = Lab::new(sum[0] / n, sum[1] / n, sum[2] / n);
        }
    }

    let mut clusters: Vec<Cluster> = centers
        .into_iter()
        .map(|center_lab| Cluster {
            center_lab,
            center_rgb: [0.0; 3],
            count: 0,
        })
        .collect();

    let mut rgb_sums = vec![[0.0f64; 3]; k];
    for (&c, s) in assignments.iter().zip(samples) {
        clusters[c].count += 1;
        rgb_sums[c][0] += s.rgb.red as f64;
        rgb_sums[c][1] += s.rgb.green as f64;
        rgb_sums[c][2] += s.rgb.blue as f64;
    }

    for (cluster, sum) in clusters.iter_mut().zip(&rgb_sums) {
        if cluster.count == 0 {
            continue;
        }
        let n = cluster.count as f64;
        cluster.center_rgb = [sum[0] / n, sum[1] / n, sum[2] / n];
    }

    clusters.retain(|c| c.count > 0);
    clusters
}
