//! Export the labeled series to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::LabeledSeries;
use crate::error::{AppError, ErrorKind};

/// Write one row per day: `date,rate,cluster,label`.
pub fn write_series_csv(path: &Path, labeled: &LabeledSeries) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(
            ErrorKind::Io,
            format!("Failed to create export CSV '{}': {e}", path.display()),
        )
    })?;

    writeln!(file, "date,rate,cluster,label")
        .map_err(|e| AppError::new(ErrorKind::Io, format!("Failed to write export CSV header: {e}")))?;

    for day in &labeled.days {
        writeln!(
            file,
            "{},{:.6},{},{}",
            day.date, day.rate, day.cluster, day.label
        )
        .map_err(|e| AppError::new(ErrorKind::Io, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}
