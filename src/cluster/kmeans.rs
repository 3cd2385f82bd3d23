//! Seeded 1-D k-means (Lloyd's algorithm).
//!
//! Given the normalized rate values and a cluster count `k`:
//!
//! - initial centroids are `k` *distinct* observed values, drawn with a
//!   seeded `StdRng` so re-runs with the same seed are bit-identical
//! - assignment ties go to the lower centroid index
//! - an empty cluster means `k` is too large for the data's variability and
//!   is reported as a fatal configuration error
//! - hitting the iteration cap is *not* fatal: the best partition found is
//!   returned with `converged = false` for the caller to surface as a warning

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::domain::ClusterAssignment;
use crate::error::{AppError, ErrorKind};

/// Knobs for the clustering stage. Everything is explicit; there is no
/// hidden randomness.
#[derive(Debug, Clone, Copy)]
pub struct KMeansOptions {
    pub k: usize,
    pub seed: u64,
    pub max_iters: usize,
    /// Maximum centroid movement that still counts as converged.
    pub tolerance: f64,
}

impl Default for KMeansOptions {
    fn default() -> Self {
        Self {
            k: 3,
            seed: 42,
            max_iters: 300,
            tolerance: 1e-4,
        }
    }
}

/// Partition `values` into `opts.k` clusters.
///
/// Every value receives exactly one cluster id in `[0, k)`.
pub fn cluster_series(values: &[f64], opts: &KMeansOptions) -> Result<ClusterAssignment, AppError> {
    if opts.k == 0 {
        return Err(AppError::new(
            ErrorKind::InvalidConfig,
            "Cluster count must be at least 1.",
        ));
    }
    if values.is_empty() {
        return Err(AppError::new(
            ErrorKind::EmptyDataset,
            "No values to cluster.",
        ));
    }

    let distinct = distinct_values(values);
    if opts.k > distinct.len() {
        return Err(AppError::new(
            ErrorKind::UnresolvableClustering,
            format!(
                "Cluster count {} exceeds the {} distinct observation(s); retry with a smaller K.",
                opts.k,
                distinct.len()
            ),
        ));
    }

    // Seeded initialization over the distinct values guarantees k distinct
    // starting centroids.
    let mut rng = StdRng::seed_from_u64(opts.seed);
    let mut centroids: Vec<f64> = distinct
        .choose_multiple(&mut rng, opts.k)
        .copied()
        .collect();

    let mut clusters = vec![0usize; values.len()];
    let mut converged = false;
    let mut iterations = 0usize;

    for iter in 1..=opts.max_iters.max(1) {
        iterations = iter;

        for (idx, &v) in values.iter().enumerate() {
            clusters[idx] = nearest_centroid(v, &centroids);
        }

        let mut sums = vec![0.0f64; opts.k];
        let mut counts = vec![0usize; opts.k];
        for (&c, &v) in clusters.iter().zip(values) {
            sums[c] += v;
            counts[c] += 1;
        }

        if let Some(empty) = counts.iter().position(|&c| c == 0) {
            return Err(AppError::new(
                ErrorKind::UnresolvableClustering,
                format!(
                    "Cluster {empty} ended up empty with K={}; retry with a smaller K.",
                    opts.k
                ),
            ));
        }

        let mut max_shift = 0.0f64;
        for c in 0..opts.k {
            let new = sums[c] / counts[c] as f64;
            max_shift = max_shift.max((new - centroids[c]).abs());
            centroids[c] = new;
        }

        if max_shift <= opts.tolerance {
            converged = true;
            break;
        }
    }

    Ok(ClusterAssignment {
        clusters,
        k: opts.k,
        converged,
        iterations,
    })
}

fn nearest_centroid(value: f64, centroids: &[f64]) -> usize {
    let mut best = 0usize;
    let mut best_dist = f64::INFINITY;
    for (idx, &c) in centroids.iter().enumerate() {
        let dist = (value - c).abs();
        // Strict `<` keeps ties on the lower index.
        if dist < best_dist {
            best = idx;
            best_dist = dist;
        }
    }
    best
}

fn distinct_values(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted.dedup();
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(k: usize) -> KMeansOptions {
        KMeansOptions {
            k,
            ..KMeansOptions::default()
        }
    }

    #[test]
    fn every_value_gets_exactly_one_cluster_id() {
        let values = [-1.0, -0.9, -1.1, 0.9, 1.0, 1.1];
        let assignment = cluster_series(&values, &opts(2)).unwrap();

        assert_eq!(assignment.clusters.len(), values.len());
        assert!(assignment.clusters.iter().all(|&c| c < 2));
        // No empty cluster.
        for c in 0..2 {
            assert!(assignment.clusters.iter().any(|&x| x == c));
        }
    }

    #[test]
    fn separates_two_obvious_groups() {
        let values = [-1.0, -1.0, -0.9, 1.0, 0.9, 1.1];
        let assignment = cluster_series(&values, &opts(2)).unwrap();

        let low = assignment.clusters[0];
        assert_eq!(assignment.clusters[1], low);
        assert_eq!(assignment.clusters[2], low);
        let high = assignment.clusters[3];
        assert_ne!(low, high);
        assert_eq!(assignment.clusters[4], high);
        assert_eq!(assignment.clusters[5], high);
        assert!(assignment.converged);
    }

    #[test]
    fn same_seed_is_bit_identical() {
        let values: Vec<f64> = (0..100).map(|i| ((i * 37) % 19) as f64 / 7.0).collect();
        let a = cluster_series(&values, &opts(3)).unwrap();
        let b = cluster_series(&values, &opts(3)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn k_larger_than_distinct_values_is_unresolvable() {
        // Three observations but only two distinct values.
        let values = [-0.707, -0.707, 1.414];
        let err = cluster_series(&values, &opts(3)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnresolvableClustering);
    }

    #[test]
    fn k_zero_is_a_config_error() {
        let err = cluster_series(&[1.0, 2.0], &opts(0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn k_one_puts_everything_in_cluster_zero() {
        let values = [0.1, 0.5, 0.9];
        let assignment = cluster_series(&values, &opts(1)).unwrap();
        assert!(assignment.clusters.iter().all(|&c| c == 0));
        assert!(assignment.converged);
    }

    #[test]
    fn iteration_cap_returns_best_partition_with_warning_flag() {
        let values = [-1.0, -0.5, 0.5, 1.0];
        let capped = KMeansOptions {
            k: 2,
            max_iters: 1,
            tolerance: 0.0,
            ..KMeansOptions::default()
        };
        let assignment = cluster_series(&values, &capped).unwrap();
        assert!(!assignment.converged);
        assert_eq!(assignment.iterations, 1);
        assert_eq!(assignment.clusters.len(), 4);
    }
}
