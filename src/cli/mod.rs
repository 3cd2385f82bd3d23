//! Command-line parsing for the rate cycle classifier.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the series/clustering code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::data::Dataset;
use crate::domain::DecimalSep;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "tdc", version, about = "Tesouro Direto IPCA+ Rate Cycle Classifier")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify the rate history into cycles, print the report, and
    /// optionally plot/export.
    Classify(ClassifyArgs),
    /// Print only the current cycle label (useful for scripting).
    Current(ClassifyArgs),
    /// Download Tesouro Transparente datasets to local CSV files.
    Fetch(FetchArgs),
    /// Plot a previously exported labeled-series JSON.
    Plot(PlotArgs),
}

/// Common options for classification.
#[derive(Debug, Parser, Clone)]
pub struct ClassifyArgs {
    /// Local CSV in the Tesouro "Preços e Taxas" schema.
    #[arg(short = 'i', long, value_name = "CSV")]
    pub input: Option<PathBuf>,

    /// Download the taxas CSV from Tesouro Transparente instead of reading a file.
    #[arg(long)]
    pub fetch: bool,

    /// Use a deterministic synthetic rate history (offline demo mode).
    #[arg(long)]
    pub sample: bool,

    /// Calendar span of the synthetic history, in days.
    #[arg(long, default_value_t = 720)]
    pub sample_days: usize,

    /// Instrument type to filter the raw table to.
    #[arg(short = 't', long, default_value = "Tesouro IPCA+")]
    pub instrument: String,

    /// Number of cycles (clusters).
    #[arg(short = 'k', long = "clusters", default_value_t = 3)]
    pub k: usize,

    /// Random seed for centroid initialization.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Ordered label vocabulary, low cycle first (comma-separated, one name
    /// per cluster). Defaults to Low,Medium,High for K=3.
    #[arg(long, value_delimiter = ',')]
    pub labels: Option<Vec<String>>,

    /// Iteration cap for the clustering loop.
    #[arg(long, default_value_t = 300)]
    pub max_iters: usize,

    /// Centroid movement threshold that counts as converged.
    #[arg(long, default_value_t = 1e-4)]
    pub tolerance: f64,

    /// Decimal separator of the rate column.
    #[arg(long, value_enum, default_value = "comma")]
    pub decimal_sep: DecimalSep,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the labeled series to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the labeled series (plus run metadata) to JSON.
    #[arg(long = "export-series", value_name = "JSON")]
    pub export_series: Option<PathBuf>,

    /// Write an SVG chart of the labeled series.
    #[arg(long, value_name = "SVG")]
    pub svg: Option<PathBuf>,
}

/// Options for batch dataset downloads.
#[derive(Debug, Parser)]
pub struct FetchArgs {
    /// Directory the CSV files are written to (created if missing).
    #[arg(short = 'o', long, default_value = "data")]
    pub out_dir: PathBuf,

    /// Datasets to download (comma-separated). Defaults to all five.
    #[arg(long, value_enum, value_delimiter = ',')]
    pub datasets: Vec<Dataset>,
}

/// Options for plotting a saved labeled series.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Series JSON file produced by `tdc classify --export-series`.
    #[arg(long, value_name = "JSON")]
    pub series: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Also write an SVG chart.
    #[arg(long, value_name = "SVG")]
    pub svg: Option<PathBuf>,
}
