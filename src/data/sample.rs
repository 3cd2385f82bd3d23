//! Synthetic rate history generation for offline runs.
//!
//! Produces a deterministic IPCA+-style purchase-rate series that walks
//! through three rate regimes (low, then high, then medium) with seeded
//! Gaussian noise, so the clustering stages have real structure to find
//! without any network access. Weekend dates are skipped, like the real
//! Tesouro publications, which exercises the forward-fill path.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::RateRecord;
use crate::error::{AppError, ErrorKind};

/// Daily noise standard deviation, in rate points.
const NOISE_STD: f64 = 0.06;

/// Regime base levels, in publication order.
const REGIME_LEVELS: [f64; 3] = [4.6, 6.4, 5.5];

#[derive(Debug, Clone)]
pub struct SampleOptions {
    /// Calendar span of the generated history, in days.
    pub days: usize,
    pub seed: u64,
    pub start: NaiveDate,
    pub instrument: String,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            days: 720,
            seed: 42,
            start: NaiveDate::from_ymd_opt(2022, 1, 3).unwrap_or_default(),
            instrument: "Tesouro IPCA+".to_string(),
        }
    }
}

/// Generate a deterministic synthetic rate table.
pub fn generate_sample(opts: &SampleOptions) -> Result<Vec<RateRecord>, AppError> {
    if opts.days < 3 {
        return Err(AppError::new(
            ErrorKind::InvalidConfig,
            "Sample span must be at least 3 days.",
        ));
    }

    let mut rng = StdRng::seed_from_u64(opts.seed);
    let noise = Normal::new(0.0, NOISE_STD)
        .map_err(|e| AppError::new(ErrorKind::Internal, format!("Noise distribution error: {e}")))?;

    let regime_span = opts.days / REGIME_LEVELS.len();
    let mut records = Vec::with_capacity(opts.days);

    for offset in 0..opts.days {
        let date = opts.start + Duration::days(offset as i64);
        // No weekend publications.
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            continue;
        }

        let regime = (offset / regime_span.max(1)).min(REGIME_LEVELS.len() - 1);
        let rate = REGIME_LEVELS[regime] + noise.sample(&mut rng);

        records.push(RateRecord {
            instrument: opts.instrument.clone(),
            date,
            rate: Some(rate),
        });
    }

    // The weekday filter cannot empty a >= 3 day span entirely, but the
    // pipeline's first-date invariant makes this worth asserting cheaply.
    if records.is_empty() {
        return Err(AppError::new(
            ErrorKind::Internal,
            "Synthetic sample generation produced no records.",
        ));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_history() {
        let opts = SampleOptions::default();
        let a = generate_sample(&opts).unwrap();
        let b = generate_sample(&opts).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let a = generate_sample(&SampleOptions::default()).unwrap();
        let b = generate_sample(&SampleOptions {
            seed: 7,
            ..SampleOptions::default()
        })
        .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn skips_weekends() {
        let records = generate_sample(&SampleOptions::default()).unwrap();
        assert!(records.iter().all(|r| !matches!(
            r.date.weekday(),
            Weekday::Sat | Weekday::Sun
        )));
        // Roughly 5/7 of the span survives.
        assert!(records.len() < 720);
        assert!(records.len() > 400);
    }

    #[test]
    fn regimes_are_visible_in_the_levels() {
        let records = generate_sample(&SampleOptions::default()).unwrap();
        let first_third: Vec<f64> = records[..records.len() / 3]
            .iter()
            .filter_map(|r| r.rate)
            .collect();
        let mid_third: Vec<f64> = records[records.len() / 3..2 * records.len() / 3]
            .iter()
            .filter_map(|r| r.rate)
            .collect();
        let mean = |v: &[f64]| v.iter().sum::<f64>() / v.len() as f64;
        assert!(mean(&mid_third) > mean(&first_third) + 1.0);
    }

    #[test]
    fn tiny_span_is_rejected() {
        let err = generate_sample(&SampleOptions {
            days: 2,
            ..SampleOptions::default()
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }
}
