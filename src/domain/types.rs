//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during classification
//! - exported to JSON/CSV
//! - reloaded later for plotting or comparisons
//!
//! The pipeline is a forward chain of immutable values:
//!
//! `Vec<RateRecord> -> DailySeries -> NormalizedSeries -> ClusterAssignment -> LabeledSeries`
//!
//! Each stage consumes the previous stage's output and returns new state, so
//! an invalid call order (e.g. querying the current cycle before clustering)
//! is unrepresentable.

use std::path::PathBuf;

use chrono::{Duration, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorKind};

/// Decimal separator convention of the input CSV's rate column.
///
/// Tesouro Transparente exports use the Brazilian convention (`13,45`), but
/// re-exports from spreadsheets often come back with a dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DecimalSep {
    Comma,
    Dot,
}

/// One row of the provider's raw table.
///
/// `rate` is `None` when the row was published with an empty rate field; such
/// rows are eligible for forward-fill during series preparation.
#[derive(Debug, Clone, PartialEq)]
pub struct RateRecord {
    pub instrument: String,
    pub date: NaiveDate,
    pub rate: Option<f64>,
}

/// A gap-free daily rate series.
///
/// Contiguity is structural: the series stores its first date plus one rate
/// per calendar day, so a gap or an out-of-order date cannot be represented.
/// Construct via [`crate::series::prepare_daily_series`].
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    start: NaiveDate,
    rates: Vec<f64>,
}

impl DailySeries {
    /// Build from a start date and one rate per consecutive day.
    ///
    /// `rates` must be non-empty; the preparation stage guarantees this.
    pub fn new(start: NaiveDate, rates: Vec<f64>) -> Self {
        debug_assert!(!rates.is_empty());
        Self { start, rates }
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start
    }

    pub fn end_date(&self) -> NaiveDate {
        self.start + Duration::days(self.rates.len() as i64 - 1)
    }

    pub fn date_at(&self, idx: usize) -> NaiveDate {
        self.start + Duration::days(idx as i64)
    }

    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.rates
            .iter()
            .enumerate()
            .map(|(i, &r)| (self.date_at(i), r))
    }
}

/// The daily series rescaled to zero mean and unit variance.
///
/// Mean and standard deviation are recomputed on every normalization call;
/// they are kept here only for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSeries {
    pub values: Vec<f64>,
    pub mean: f64,
    pub std_dev: f64,
}

/// Per-day cluster ids, aligned index-wise with the daily series.
///
/// Cluster ids are arbitrary integers in `[0, k)` with no inherent ordering;
/// the labeling stage ranks them by mean rate.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterAssignment {
    pub clusters: Vec<usize>,
    pub k: usize,
    /// False when Lloyd's algorithm hit the iteration cap before the
    /// centroids stabilized. Non-fatal: the best partition found is kept.
    pub converged: bool,
    pub iterations: usize,
}

/// One day of the classifier's primary output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledDay {
    pub date: NaiveDate,
    pub rate: f64,
    pub cluster: usize,
    pub label: String,
}

/// Per-cluster aggregate, in ascending mean-rate order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub cluster: usize,
    pub label: String,
    pub mean_rate: f64,
    pub n_days: usize,
}

/// Daily series joined with cluster ids and semantic labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledSeries {
    /// One row per calendar day, chronological.
    pub days: Vec<LabeledDay>,
    /// One row per cluster, ranked ascending by mean rate.
    pub summaries: Vec<ClusterSummary>,
}

impl LabeledSeries {
    /// Label attached to the chronologically last day.
    ///
    /// The constructor path cannot produce an empty series, but this method
    /// is part of the public API and may be called on a deserialized value,
    /// so the emptiness check stays.
    pub fn current_label(&self) -> Result<&str, AppError> {
        self.days
            .last()
            .map(|d| d.label.as_str())
            .ok_or_else(|| AppError::new(ErrorKind::EmptyDataset, "Labeled series has no rows."))
    }

    /// Labels in ascending rank order (low cycle first).
    pub fn ranked_labels(&self) -> Vec<&str> {
        self.summaries.iter().map(|s| s.label.as_str()).collect()
    }
}

/// A saved labeled-series file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesFile {
    pub tool: String,
    pub instrument: String,
    pub k: usize,
    pub seed: u64,
    pub series: LabeledSeries,
}

/// Where the raw table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Local CSV in the Tesouro taxas schema.
    Csv(PathBuf),
    /// Download the taxas CSV from Tesouro Transparente.
    Fetch,
    /// Deterministic synthetic history (offline runs, demos, tests).
    Sample,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults) and passed explicitly into
/// every stage; nothing is read from ambient state.
#[derive(Debug, Clone)]
pub struct ClassifyConfig {
    pub source: InputSource,
    /// Instrument type the raw table is filtered to.
    pub instrument: String,
    /// Number of clusters (cycles).
    pub k: usize,
    /// Seed for centroid initialization; fixed so re-runs are reproducible.
    pub seed: u64,
    /// Ordered label vocabulary, low to high. `None` selects the default
    /// vocabulary for `k` (see `cluster::label::vocabulary_for`).
    pub labels: Option<Vec<String>>,
    /// Iteration cap for Lloyd's algorithm.
    pub max_iters: usize,
    /// Centroid movement threshold that counts as converged.
    pub tolerance: f64,
    pub decimal_sep: DecimalSep,

    /// Number of days generated when `source == Sample`.
    pub sample_days: usize,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_results: Option<PathBuf>,
    pub export_series: Option<PathBuf>,
    pub svg: Option<PathBuf>,
}
