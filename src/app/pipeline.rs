//! Shared classification pipeline used by all front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load raw table -> prepare daily series -> normalize -> cluster -> label -> current cycle
//!
//! The CLI subcommands then focus on presentation (full report vs bare label).

use crate::cluster::{KMeansOptions, cluster_series, label_series, vocabulary_for};
use crate::data::{SampleOptions, TesouroClient, generate_sample};
use crate::domain::{
    ClassifyConfig, ClusterAssignment, DailySeries, InputSource, LabeledSeries, NormalizedSeries,
};
use crate::error::AppError;
use crate::io::ingest::{IngestedTable, load_rate_records, read_rate_records};
use crate::series::{normalize, prepare_daily_series};

/// All computed outputs of a single classification run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub rows_read: usize,
    pub daily: DailySeries,
    pub normalized: NormalizedSeries,
    pub assignment: ClusterAssignment,
    pub labeled: LabeledSeries,
    pub current: String,
    /// Non-fatal conditions the caller should surface (e.g. non-convergence).
    pub warnings: Vec<String>,
}

/// Load the raw table per config and execute the full pipeline.
pub fn run_classify(config: &ClassifyConfig) -> Result<RunOutput, AppError> {
    let table = load_table(config)?;
    run_classify_table(config, table)
}

/// Execute the pipeline on an already loaded raw table.
///
/// This is the in-memory entry point: tests and embedders can hand records
/// straight to the classifier without any file or network round trip.
pub fn run_classify_table(
    config: &ClassifyConfig,
    table: IngestedTable,
) -> Result<RunOutput, AppError> {
    let daily = prepare_daily_series(&table.records, &config.instrument)?;
    let normalized = normalize(&daily)?;

    let opts = KMeansOptions {
        k: config.k,
        seed: config.seed,
        max_iters: config.max_iters,
        tolerance: config.tolerance,
    };
    let assignment = cluster_series(&normalized.values, &opts)?;

    let mut warnings = Vec::new();
    if !assignment.converged {
        warnings.push(format!(
            "clustering stopped at the iteration cap ({} iteration(s)) before converging; \
             using the best partition found",
            assignment.iterations
        ));
    }

    let vocabulary = vocabulary_for(config.k, &config.labels)?;
    let labeled = label_series(&daily, &assignment, &vocabulary)?;
    let current = labeled.current_label()?.to_string();

    Ok(RunOutput {
        rows_read: table.rows_read,
        daily,
        normalized,
        assignment,
        labeled,
        current,
        warnings,
    })
}

fn load_table(config: &ClassifyConfig) -> Result<IngestedTable, AppError> {
    match &config.source {
        InputSource::Csv(path) => load_rate_records(path, config.decimal_sep),
        InputSource::Fetch => {
            let client = TesouroClient::new()?;
            let bytes = client.fetch_rates()?;
            read_rate_records(bytes.as_slice(), config.decimal_sep)
        }
        InputSource::Sample => {
            let records = generate_sample(&SampleOptions {
                days: config.sample_days,
                seed: config.seed,
                instrument: config.instrument.clone(),
                ..SampleOptions::default()
            })?;
            let rows_read = records.len();
            Ok(IngestedTable { records, rows_read })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DecimalSep, RateRecord};
    use crate::error::ErrorKind;
    use chrono::NaiveDate;

    fn config(k: usize) -> ClassifyConfig {
        ClassifyConfig {
            source: InputSource::Sample,
            instrument: "Tesouro IPCA+".to_string(),
            k,
            seed: 42,
            labels: None,
            max_iters: 300,
            tolerance: 1e-4,
            decimal_sep: DecimalSep::Comma,
            sample_days: 720,
            plot: false,
            plot_width: 100,
            plot_height: 25,
            export_results: None,
            export_series: None,
            svg: None,
        }
    }

    fn table(rows: &[(u32, f64)]) -> IngestedTable {
        let records: Vec<RateRecord> = rows
            .iter()
            .map(|&(day, rate)| RateRecord {
                instrument: "Tesouro IPCA+".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
                rate: Some(rate),
            })
            .collect();
        let rows_read = records.len();
        IngestedTable { records, rows_read }
    }

    #[test]
    fn three_rows_two_clusters_end_to_end() {
        // Rates 10.0, 10.0, 12.0: the two low days must rank below the high
        // day, and the current cycle is the higher-ranked name.
        let mut cfg = config(2);
        cfg.labels = Some(vec!["Low".to_string(), "High".to_string()]);

        let out = run_classify_table(&cfg, table(&[(1, 10.0), (2, 10.0), (3, 12.0)])).unwrap();

        assert_eq!(out.daily.len(), 3);
        assert_eq!(out.labeled.days[0].label, "Low");
        assert_eq!(out.labeled.days[1].label, "Low");
        assert_eq!(out.labeled.days[2].label, "High");
        assert_eq!(out.current, "High");
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn repeated_runs_are_bit_identical() {
        let cfg = config(3);
        let a = run_classify(&cfg).unwrap();
        let b = run_classify(&cfg).unwrap();
        assert_eq!(a.labeled, b.labeled);
        assert_eq!(a.current, b.current);
    }

    #[test]
    fn sample_run_covers_three_cycles() {
        let out = run_classify(&config(3)).unwrap();
        assert_eq!(out.labeled.summaries.len(), 3);
        assert_eq!(out.labeled.ranked_labels(), vec!["Low", "Medium", "High"]);
        // Gap-free daily calendar over the full span.
        let span = (out.daily.end_date() - out.daily.start_date()).num_days() as usize + 1;
        assert_eq!(out.daily.len(), span);
    }

    #[test]
    fn constant_series_fails_before_clustering() {
        let err = run_classify_table(&config(2), table(&[(1, 5.0), (2, 5.0), (3, 5.0)])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DegenerateSeries);
    }

    #[test]
    fn wrong_instrument_fails_with_empty_dataset() {
        let mut cfg = config(2);
        cfg.instrument = "Tesouro Selic".to_string();
        let err = run_classify_table(&cfg, table(&[(1, 10.0)])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyDataset);
    }
}
