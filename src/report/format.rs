//! Formatted terminal output for a classification run.
//!
//! We keep formatting code in one place so:
//! - the series/clustering code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{ClassifyConfig, LabeledSeries};

/// Format the full run summary (dataset stats + cluster table + current cycle).
pub fn format_run_summary(
    config: &ClassifyConfig,
    rows_read: usize,
    labeled: &LabeledSeries,
    warnings: &[String],
) -> String {
    let mut out = String::new();

    out.push_str("=== tdc - Tesouro Direto Rate Cycle Classifier ===\n");
    out.push_str(&format!("Instrument: {}\n", config.instrument));
    if let (Some(first), Some(last)) = (labeled.days.first(), labeled.days.last()) {
        out.push_str(&format!(
            "Span: {} .. {} ({} day(s), {} raw row(s))\n",
            first.date,
            last.date,
            labeled.days.len(),
            rows_read
        ));
    }
    out.push_str(&format!("K={} | seed={}\n", config.k, config.seed));

    out.push_str("\nCycles (ranked by mean rate):\n");
    out.push_str(&format_cluster_table(labeled));

    for warning in warnings {
        out.push_str(&format!("\nwarning: {warning}\n"));
    }

    if let Ok(current) = labeled.current_label() {
        out.push_str(&format!("\nCurrent cycle: {current}\n"));
    }

    out
}

/// Format the per-cluster table, low cycle first.
pub fn format_cluster_table(labeled: &LabeledSeries) -> String {
    let mut out = String::new();
    let total: usize = labeled.summaries.iter().map(|s| s.n_days).sum();

    out.push_str(&format!(
        "{:<12} {:>8} {:>10} {:>7} {:>7}\n",
        "label", "cluster", "mean rate", "days", "share"
    ));
    for s in &labeled.summaries {
        let share = if total > 0 {
            100.0 * s.n_days as f64 / total as f64
        } else {
            0.0
        };
        out.push_str(&format!(
            "{:<12} {:>8} {:>10.4} {:>7} {:>6.1}%\n",
            s.label, s.cluster, s.mean_rate, s.n_days, share
        ));
    }

    out
}
