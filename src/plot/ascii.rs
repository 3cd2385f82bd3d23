//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Each cycle label gets its own glyph, assigned in rank order (low cycle
//! first), with a legend line above the grid.

use std::collections::HashMap;

use crate::domain::LabeledSeries;

/// Glyphs by label rank. More than eight cycles wrap around.
const GLYPHS: [char; 8] = ['o', 'x', '+', '*', '#', '@', '%', '&'];

/// Render the labeled series, one glyph per label.
pub fn render_labeled_series(labeled: &LabeledSeries, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let Some((first, last)) = labeled.days.first().zip(labeled.days.last()) else {
        return "Plot: empty series\n".to_string();
    };

    let glyph_for_label: HashMap<&str, char> = labeled
        .summaries
        .iter()
        .enumerate()
        .map(|(rank, s)| (s.label.as_str(), GLYPHS[rank % GLYPHS.len()]))
        .collect();

    let (y_min, y_max) = rate_range(labeled).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    let n = labeled.days.len();
    for (idx, day) in labeled.days.iter().enumerate() {
        let x = map_x(idx, n, width);
        let y = map_y(day.rate, y_min, y_max, height);
        grid[y][x] = glyph_for_label
            .get(day.label.as_str())
            .copied()
            .unwrap_or('?');
    }

    // Build final string. We include a small header with ranges and a legend.
    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {} .. {} | rate=[{y_min:.2}, {y_max:.2}]\n",
        first.date, last.date
    ));
    out.push_str("Legend:");
    for (rank, s) in labeled.summaries.iter().enumerate() {
        out.push_str(&format!(" {}={}", GLYPHS[rank % GLYPHS.len()], s.label));
    }
    out.push('\n');

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn rate_range(labeled: &LabeledSeries) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for day in &labeled.days {
        min_y = min_y.min(day.rate);
        max_y = max_y.max(day.rate);
    }
    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(idx: usize, n: usize, width: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    let u = idx as f64 / (n as f64 - 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClusterSummary, LabeledDay};
    use chrono::NaiveDate;

    #[test]
    fn plot_golden_snapshot_small() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let labeled = LabeledSeries {
            days: vec![
                LabeledDay {
                    date: start,
                    rate: 10.0,
                    cluster: 0,
                    label: "Low".to_string(),
                },
                LabeledDay {
                    date: start + chrono::Duration::days(1),
                    rate: 10.0,
                    cluster: 0,
                    label: "Low".to_string(),
                },
                LabeledDay {
                    date: start + chrono::Duration::days(2),
                    rate: 12.0,
                    cluster: 1,
                    label: "High".to_string(),
                },
            ],
            summaries: vec![
                ClusterSummary {
                    cluster: 0,
                    label: "Low".to_string(),
                    mean_rate: 10.0,
                    n_days: 2,
                },
                ClusterSummary {
                    cluster: 1,
                    label: "High".to_string(),
                    mean_rate: 12.0,
                    n_days: 1,
                },
            ],
        };

        let txt = render_labeled_series(&labeled, 10, 5);
        let expected = concat!(
            "Plot: 2024-01-01 .. 2024-01-03 | rate=[9.90, 12.10]\n",
            "Legend: o=Low x=High\n",
            "         x\n",
            "          \n",
            "          \n",
            "          \n",
            "o    o    \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_series_renders_a_hint_instead_of_panicking() {
        let empty = LabeledSeries {
            days: vec![],
            summaries: vec![],
        };
        assert_eq!(render_labeled_series(&empty, 10, 5), "Plot: empty series\n");
    }
}
