//! SVG chart export via Plotters.
//!
//! One polyline per cycle label over the date axis, mirroring the terminal
//! plot but suitable for sharing. We plot against the day index and format
//! the tick labels back into dates, which keeps the coordinate system simple
//! and avoids pulling in Plotters' datetime ranged types.

use std::path::Path;

use chrono::Duration;
use plotters::prelude::*;

use crate::domain::LabeledSeries;
use crate::error::{AppError, ErrorKind};

/// Series palette, by label rank (low cycle first). Wraps around for large K.
const PALETTE: [RGBColor; 6] = [
    RGBColor(31, 119, 180),  // blue
    RGBColor(44, 160, 44),   // green
    RGBColor(214, 39, 40),   // red
    RGBColor(255, 127, 14),  // orange
    RGBColor(148, 103, 189), // purple
    RGBColor(140, 86, 75),   // brown
];

/// Write the labeled series as an SVG line chart, one series per label.
pub fn write_labeled_series_svg(
    path: &Path,
    labeled: &LabeledSeries,
    width: u32,
    height: u32,
) -> Result<(), AppError> {
    let Some(first) = labeled.days.first() else {
        return Err(AppError::new(
            ErrorKind::EmptyDataset,
            "Cannot plot an empty labeled series.",
        ));
    };
    let start_date = first.date;
    let n = labeled.days.len();

    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for day in &labeled.days {
        y_min = y_min.min(day.rate);
        y_max = y_max.max(day.rate);
    }
    let pad = ((y_max - y_min) * 0.05).max(1e-6);
    let (y_min, y_max) = (y_min - pad, y_max + pad);

    let root = SVGBackend::new(path, (width.max(320), height.max(200))).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| chart_error(path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Purchase rate cycles", ("sans-serif", 20))
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 50)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(0f64..(n.max(2) as f64 - 1.0), y_min..y_max)
        .map_err(|e| chart_error(path, e))?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Purchase rate")
        .x_labels(6)
        .y_labels(8)
        .x_label_formatter(&|idx| {
            (start_date + Duration::days(idx.round() as i64))
                .format("%Y-%m-%d")
                .to_string()
        })
        .draw()
        .map_err(|e| chart_error(path, e))?;

    // One series per label, in rank order, matching the terminal legend.
    for (rank, summary) in labeled.summaries.iter().enumerate() {
        let color = PALETTE[rank % PALETTE.len()];
        let points: Vec<(f64, f64)> = labeled
            .days
            .iter()
            .enumerate()
            .filter(|(_, day)| day.label == summary.label)
            .map(|(idx, day)| (idx as f64, day.rate))
            .collect();

        chart
            .draw_series(LineSeries::new(points, &color))
            .map_err(|e| chart_error(path, e))?
            .label(summary.label.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|e| chart_error(path, e))?;

    root.present().map_err(|e| chart_error(path, e))?;
    Ok(())
}

fn chart_error(path: &Path, err: impl std::fmt::Display) -> AppError {
    AppError::new(
        ErrorKind::Io,
        format!("Failed to render SVG chart '{}': {err}", path.display()),
    )
}
