//! Standardization of the daily series.
//!
//! Mean and population standard deviation are computed over the whole series
//! on every call; nothing is persisted between runs. A constant series has
//! no variance to cluster on, so σ = 0 is rejected explicitly instead of
//! silently dividing by zero.

use crate::domain::{DailySeries, NormalizedSeries};
use crate::error::{AppError, ErrorKind};

/// Rescale a [`DailySeries`] to zero mean and unit variance.
pub fn normalize(series: &DailySeries) -> Result<NormalizedSeries, AppError> {
    let rates = series.rates();
    if rates.is_empty() {
        return Err(AppError::new(
            ErrorKind::EmptyDataset,
            "Cannot normalize an empty series.",
        ));
    }

    let n = rates.len() as f64;
    let mean = rates.iter().sum::<f64>() / n;
    let variance = rates.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    if std_dev == 0.0 {
        return Err(AppError::new(
            ErrorKind::DegenerateSeries,
            "Series is constant (zero variance); clustering it is meaningless.",
        ));
    }

    let values = rates.iter().map(|r| (r - mean) / std_dev).collect();

    Ok(NormalizedSeries {
        values,
        mean,
        std_dev,
    })
}
