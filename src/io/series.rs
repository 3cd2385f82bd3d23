//! Read/write labeled-series JSON files.
//!
//! The JSON file is the "portable" representation of a classification run:
//! the per-day labeled table, the per-cluster summaries, and enough run
//! metadata (instrument, K, seed) to reproduce it. `tdc plot` consumes it.
//!
//! The schema is defined by `domain::SeriesFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::SeriesFile;
use crate::error::{AppError, ErrorKind};

/// Write a labeled-series JSON file.
pub fn write_series_json(path: &Path, series: &SeriesFile) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            ErrorKind::Io,
            format!("Failed to create series JSON '{}': {e}", path.display()),
        )
    })?;

    serde_json::to_writer_pretty(file, series)
        .map_err(|e| AppError::new(ErrorKind::Io, format!("Failed to write series JSON: {e}")))?;

    Ok(())
}

/// Read a labeled-series JSON file.
pub fn read_series_json(path: &Path) -> Result<SeriesFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            ErrorKind::Io,
            format!("Failed to open series JSON '{}': {e}", path.display()),
        )
    })?;
    let series: SeriesFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(ErrorKind::Parse, format!("Invalid series JSON: {e}")))?;
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClusterSummary, LabeledDay, LabeledSeries};
    use chrono::NaiveDate;

    #[test]
    fn series_file_survives_a_write_read_cycle() {
        let series = SeriesFile {
            tool: "tdc".to_string(),
            instrument: "Tesouro IPCA+".to_string(),
            k: 2,
            seed: 42,
            series: LabeledSeries {
                days: vec![LabeledDay {
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                    rate: 5.47,
                    cluster: 0,
                    label: "Low".to_string(),
                }],
                summaries: vec![ClusterSummary {
                    cluster: 0,
                    label: "Low".to_string(),
                    mean_rate: 5.47,
                    n_days: 1,
                }],
            },
        };

        let dir = std::env::temp_dir().join("td-cycles-test-series");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("series.json");

        write_series_json(&path, &series).unwrap();
        let loaded = read_series_json(&path).unwrap();

        assert_eq!(loaded.instrument, series.instrument);
        assert_eq!(loaded.series, series.series);
    }
}
