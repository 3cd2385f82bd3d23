//! Ordered cycle labeling.
//!
//! Cluster ids coming out of k-means are uninterpretable integers. This stage
//! makes them semantic: clusters are ranked ascending by the mean of the *raw*
//! daily rates assigned to them (stable tie-break on cluster id), and the
//! ordered vocabulary is assigned in rank order. The result is the joined
//! per-day output table.

use crate::domain::{ClusterAssignment, ClusterSummary, DailySeries, LabeledDay, LabeledSeries};
use crate::error::{AppError, ErrorKind};

/// Resolve the label vocabulary for a given `k`.
///
/// - an explicit vocabulary wins, but must have exactly `k` names
/// - `k == 3` defaults to the classic Low/Medium/High
/// - any other `k` falls back to `Cycle 1..k` (ascending); callers who want
///   nicer names pass them explicitly
pub fn vocabulary_for(k: usize, labels: &Option<Vec<String>>) -> Result<Vec<String>, AppError> {
    if let Some(labels) = labels {
        if labels.len() != k {
            return Err(AppError::new(
                ErrorKind::InvalidConfig,
                format!(
                    "Label vocabulary has {} name(s) but K={k}; supply exactly one name per cluster.",
                    labels.len()
                ),
            ));
        }
        return Ok(labels.clone());
    }

    if k == 3 {
        return Ok(vec![
            "Low".to_string(),
            "Medium".to_string(),
            "High".to_string(),
        ]);
    }
    Ok((1..=k).map(|i| format!("Cycle {i}")).collect())
}

/// Join the daily series with its cluster assignment and an ordered vocabulary.
///
/// Pure: neither input is mutated, and re-running on the same assignment
/// yields the same output.
pub fn label_series(
    daily: &DailySeries,
    assignment: &ClusterAssignment,
    vocabulary: &[String],
) -> Result<LabeledSeries, AppError> {
    if assignment.clusters.len() != daily.len() {
        return Err(AppError::new(
            ErrorKind::Internal,
            format!(
                "Cluster assignment covers {} day(s) but the series has {}.",
                assignment.clusters.len(),
                daily.len()
            ),
        ));
    }
    if vocabulary.len() != assignment.k {
        return Err(AppError::new(
            ErrorKind::InvalidConfig,
            format!(
                "Vocabulary has {} name(s) but K={}.",
                vocabulary.len(),
                assignment.k
            ),
        ));
    }

    // Mean raw rate per cluster.
    let mut sums = vec![0.0f64; assignment.k];
    let mut counts = vec![0usize; assignment.k];
    for (&c, &rate) in assignment.clusters.iter().zip(daily.rates()) {
        sums[c] += rate;
        counts[c] += 1;
    }
    if let Some(empty) = counts.iter().position(|&c| c == 0) {
        return Err(AppError::new(
            ErrorKind::UnresolvableClustering,
            format!("Cluster {empty} has no days assigned."),
        ));
    }

    // Rank ascending by mean. `ranked` starts in cluster-id order and the
    // sort is stable, so ties resolve to the smaller cluster id.
    let means: Vec<f64> = sums
        .iter()
        .zip(&counts)
        .map(|(s, &c)| s / c as f64)
        .collect();
    let mut ranked: Vec<usize> = (0..assignment.k).collect();
    ranked.sort_by(|&a, &b| {
        means[a]
            .partial_cmp(&means[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut label_for_cluster = vec![String::new(); assignment.k];
    let mut summaries = Vec::with_capacity(assignment.k);
    for (rank, &cluster) in ranked.iter().enumerate() {
        label_for_cluster[cluster] = vocabulary[rank].clone();
        summaries.push(ClusterSummary {
            cluster,
            label: vocabulary[rank].clone(),
            mean_rate: means[cluster],
            n_days: counts[cluster],
        });
    }

    let days = daily
        .iter()
        .zip(&assignment.clusters)
        .map(|((date, rate), &cluster)| LabeledDay {
            date,
            rate,
            cluster,
            label: label_for_cluster[cluster].clone(),
        })
        .collect();

    Ok(LabeledSeries { days, summaries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn daily(rates: &[f64]) -> DailySeries {
        DailySeries::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            rates.to_vec(),
        )
    }

    fn assignment(clusters: &[usize], k: usize) -> ClusterAssignment {
        ClusterAssignment {
            clusters: clusters.to_vec(),
            k,
            converged: true,
            iterations: 1,
        }
    }

    fn vocab(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn labels_follow_mean_rate_order_not_cluster_id_order() {
        // Cluster 0 has the *higher* mean, so it must get the higher label.
        let daily = daily(&[12.0, 12.5, 10.0, 10.1]);
        let labeled =
            label_series(&daily, &assignment(&[0, 0, 1, 1], 2), &vocab(&["Low", "High"])).unwrap();

        assert_eq!(labeled.days[0].label, "High");
        assert_eq!(labeled.days[2].label, "Low");
        assert_eq!(labeled.ranked_labels(), vec!["Low", "High"]);
        assert_eq!(labeled.summaries[0].cluster, 1);
        assert_eq!(labeled.summaries[1].cluster, 0);
    }

    #[test]
    fn equal_means_break_ties_on_smaller_cluster_id() {
        let daily = daily(&[10.0, 10.0]);
        let labeled =
            label_series(&daily, &assignment(&[1, 0], 2), &vocab(&["Low", "High"])).unwrap();

        // Cluster 0 takes the lower-ranked name.
        assert_eq!(labeled.summaries[0].cluster, 0);
        assert_eq!(labeled.summaries[0].label, "Low");
        assert_eq!(labeled.summaries[1].cluster, 1);
        assert_eq!(labeled.summaries[1].label, "High");
    }

    #[test]
    fn relabeling_the_same_assignment_is_idempotent() {
        let daily = daily(&[10.0, 10.0, 12.0]);
        let a = assignment(&[0, 0, 1], 2);
        let v = vocab(&["Low", "High"]);
        let first = label_series(&daily, &a, &v).unwrap();
        let second = label_series(&daily, &a, &v).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn current_label_is_the_last_day() {
        let daily = daily(&[10.0, 10.0, 12.0]);
        let labeled =
            label_series(&daily, &assignment(&[0, 0, 1], 2), &vocab(&["Low", "High"])).unwrap();
        assert_eq!(labeled.current_label().unwrap(), "High");
    }

    #[test]
    fn current_label_on_empty_series_is_an_error() {
        let empty = LabeledSeries {
            days: vec![],
            summaries: vec![],
        };
        let err = empty.current_label().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyDataset);
    }

    #[test]
    fn vocabulary_defaults() {
        assert_eq!(
            vocabulary_for(3, &None).unwrap(),
            vec!["Low", "Medium", "High"]
        );
        assert_eq!(
            vocabulary_for(2, &None).unwrap(),
            vec!["Cycle 1", "Cycle 2"]
        );
        let err = vocabulary_for(3, &Some(vocab(&["Low", "High"]))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn vocabulary_size_must_match_k() {
        let daily = daily(&[10.0, 12.0]);
        let err = label_series(&daily, &assignment(&[0, 1], 2), &vocab(&["Only"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }
}
