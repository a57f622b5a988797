use crate::color::{Lab, lab_distance};
use crate::kmeans::Cluster;

fn absorb(into: &mut Cluster, other: &Cluster) {
    let total = into.count + other.count;
    let (wa, wb, n) = (into.count as f64, other.count as f64, total as f64);

    let a = into.center_lab;
    let b = other.center_lab;
    into.center_lab = Lab::new(
        (a.l * wa + b.l * wb) / n,
        (a.a * wa + b.a * wb) / n,
        (a.b * wa + b.b * wb) / n,
    );
    for (dst, src) in into.center_rgb.iter_mut().zip(other.center_rgb) {
        *dst = (*dst * wa + src * wb) / n;
    }
    into.count = total;
}

/// Fold together clusters whose LAB centers are closer than `threshold` (ΔE).
///
/// One greedy pass in input order: each cluster joins the first already-kept
/// cluster within range, otherwise it is kept as is. Kept clusters are not
/// re-compared after they move, so two results may end up closer than
/// `threshold`.
pub fn merge_close_clusters(clusters: Vec<Cluster>, threshold: f64) -> Vec<Cluster> {
    let mut result: Vec<Cluster> = Vec::with_capacity(clusters.len());

    for c in clusters {
        match result
            .iter_mut()
            .find(|r| lab_distance(&c.center_lab, &r.center_lab) < threshold)
        {
            Some(r) => absorb(r, &c),
            None => result.push(c),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster(l: f64, rgb: f64, count: u32) -> Cluster {
        Cluster {
            center_lab: Lab::new(l, 0.0, 0.0),
            center_rgb: [rgb; 3],
            count,
        }
    }

    #[test]
    fn close_clusters_merge_with_weighted_centers() {
        let merged = merge_close_clusters(vec![cluster(50.0, 100.0, 3), cluster(54.0, 120.0, 1)], 18.0);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].count, 4);
        assert!((merged[0].center_lab.l - 51.0).abs() < 1e-12);
        assert!((merged[0].center_rgb[0] - 105.0).abs() < 1e-12);
    }

    #[test]
    fn distant_clusters_stay_apart() {
        let merged = merge_close_clusters(vec![cluster(20.0, 40.0, 5), cluster(80.0, 200.0, 5)], 18.0);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].count + merged[1].count, 10);
    }

    #[test]
    fn threshold_is_exclusive() {
        let merged = merge_close_clusters(vec![cluster(40.0, 0.0, 1), cluster(52.0, 0.0, 1)], 12.0);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn joins_first_match_only() {
        // 30 and 50 are kept apart; 41 is within 12 of both and joins 30.
        let merged = merge_close_clusters(
            vec![cluster(30.0, 0.0, 2), cluster(50.0, 0.0, 2), cluster(41.0, 0.0, 2)],
            12.0,
        );
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].count, 4);
        assert!((merged[0].center_lab.l - 35.5).abs() < 1e-12);
        assert_eq!(merged[1].count, 2);
    }

    #[test]
    fn single_pass_does_not_reach_fixpoint() {
        // 0 and 20 are kept; 15 pulls the first to 7.5, which is now within 16 of 20.
        let merged = merge_close_clusters(
            vec![cluster(0.0, 0.0, 1), cluster(20.0, 0.0, 1), cluster(15.0, 0.0, 1)],
            16.0,
        );
        assert_eq!(merged.len(), 2);
        assert!(lab_distance(&merged[0].center_lab, &merged[1].center_lab) < 16.0);
    }
}
