//! Raw table -> gap-free daily series.
//!
//! Steps, in order:
//!
//! 1. filter to the target instrument type (zero matches is a data error)
//! 2. stable-sort by date ascending
//! 3. deduplicate by date, keeping the *last* row in sort order
//!    (re-publications are assumed to be corrections)
//! 4. reindex to a complete daily calendar between the first and last date,
//!    carrying the most recent prior value forward into any gap
//!
//! The first surviving date must carry a rate; there is nothing to fill it
//! from, so a missing value there is fatal.

use crate::domain::{DailySeries, RateRecord};
use crate::error::{AppError, ErrorKind};

/// Build a [`DailySeries`] from raw records filtered to one instrument type.
pub fn prepare_daily_series(
    records: &[RateRecord],
    instrument: &str,
) -> Result<DailySeries, AppError> {
    let mut filtered: Vec<&RateRecord> = records
        .iter()
        .filter(|r| r.instrument == instrument)
        .collect();

    if filtered.is_empty() {
        return Err(AppError::new(
            ErrorKind::EmptyDataset,
            format!("No rows match instrument type '{instrument}'."),
        ));
    }

    // Stable sort: rows sharing a date keep their file order, so "last in
    // sort order" below means "last published".
    filtered.sort_by_key(|r| r.date);

    // Dedup keep-last.
    let mut observed: Vec<&RateRecord> = Vec::with_capacity(filtered.len());
    for rec in filtered {
        match observed.last_mut() {
            Some(last) if last.date == rec.date => *last = rec,
            _ => observed.push(rec),
        }
    }

    let first = observed[0];
    let Some(first_rate) = valid_rate(first.rate) else {
        return Err(AppError::new(
            ErrorKind::IncompleteSeries,
            format!(
                "First observation ({}) has no rate value; nothing to forward-fill from.",
                first.date
            ),
        ));
    };

    let start = first.date;
    let end = observed[observed.len() - 1].date;
    let n_days = (end - start).num_days() as usize + 1;

    // Reindex + forward-fill. `observed` is sorted and date-unique, so we
    // walk it alongside the calendar.
    let mut rates = Vec::with_capacity(n_days);
    let mut carry = first_rate;
    let mut next = 0usize;
    for offset in 0..n_days {
        let date = start + chrono::Duration::days(offset as i64);
        if next < observed.len() && observed[next].date == date {
            if let Some(rate) = valid_rate(observed[next].rate) {
                carry = rate;
            }
            next += 1;
        }
        rates.push(carry);
    }

    Ok(DailySeries::new(start, rates))
}

/// Treat NaN/infinite rates the same as absent ones: forward-fillable.
fn valid_rate(rate: Option<f64>) -> Option<f64> {
    rate.filter(|r| r.is_finite())
}
