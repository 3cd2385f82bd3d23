//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the raw rate table (file, fetch, or synthetic sample)
//! - runs the classification pipeline
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{ClassifyArgs, Command, FetchArgs, PlotArgs};
use crate::domain::{ClassifyConfig, InputSource, SeriesFile};
use crate::error::{AppError, ErrorKind};

pub mod pipeline;

/// Entry point for the `tdc` binary.
pub fn run() -> Result<(), AppError> {
    // We want `tdc -i taxas.csv` to behave like `tdc classify -i taxas.csv`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Classify(args) => handle_classify(args, OutputMode::Full),
        Command::Current(args) => handle_classify(args, OutputMode::CurrentOnly),
        Command::Fetch(args) => handle_fetch(args),
        Command::Plot(args) => handle_plot(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    CurrentOnly,
}

fn handle_classify(args: ClassifyArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = classify_config_from_args(&args)?;
    let run = pipeline::run_classify(&config)?;

    match mode {
        OutputMode::Full => {
            print!(
                "{}",
                crate::report::format_run_summary(&config, run.rows_read, &run.labeled, &run.warnings)
            );

            if config.plot {
                let plot = crate::plot::render_labeled_series(
                    &run.labeled,
                    config.plot_width,
                    config.plot_height,
                );
                println!("\n{plot}");
            }
        }
        OutputMode::CurrentOnly => {
            for warning in &run.warnings {
                eprintln!("warning: {warning}");
            }
            println!("{}", run.current);
        }
    }

    // Optional exports.
    if let Some(path) = &config.export_results {
        crate::io::export::write_series_csv(path, &run.labeled)?;
    }
    if let Some(path) = &config.export_series {
        let file = SeriesFile {
            tool: "tdc".to_string(),
            instrument: config.instrument.clone(),
            k: config.k,
            seed: config.seed,
            series: run.labeled.clone(),
        };
        crate::io::series::write_series_json(path, &file)?;
    }
    if let Some(path) = &config.svg {
        crate::plot::write_labeled_series_svg(path, &run.labeled, 1024, 512)?;
    }

    Ok(())
}

fn handle_fetch(args: FetchArgs) -> Result<(), AppError> {
    std::fs::create_dir_all(&args.out_dir).map_err(|e| {
        AppError::new(
            ErrorKind::Io,
            format!("Failed to create '{}': {e}", args.out_dir.display()),
        )
    })?;

    let datasets = if args.datasets.is_empty() {
        crate::data::Dataset::ALL.to_vec()
    } else {
        args.datasets
    };

    let client = crate::data::TesouroClient::new()?;
    let outcomes = client.download_all(&args.out_dir, &datasets);

    // Report every outcome; a partial failure is visible but never hides the
    // datasets that did succeed.
    let mut failures = 0usize;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(path) => println!("{:<14} -> {}", outcome.dataset.display_name(), path.display()),
            Err(err) => {
                failures += 1;
                eprintln!("{:<14} -> FAILED: {err}", outcome.dataset.display_name());
            }
        }
    }

    if failures > 0 {
        return Err(AppError::new(
            ErrorKind::Network,
            format!("{failures} of {} download(s) failed.", outcomes.len()),
        ));
    }
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let file = crate::io::series::read_series_json(&args.series)?;

    let plot = crate::plot::render_labeled_series(&file.series, args.width, args.height);
    println!("{plot}");

    if let Some(path) = &args.svg {
        crate::plot::write_labeled_series_svg(path, &file.series, 1024, 512)?;
    }
    Ok(())
}

pub fn classify_config_from_args(args: &ClassifyArgs) -> Result<ClassifyConfig, AppError> {
    let source = match (&args.input, args.fetch, args.sample) {
        (Some(path), false, false) => InputSource::Csv(path.clone()),
        (None, true, false) => InputSource::Fetch,
        (None, false, true) => InputSource::Sample,
        (None, false, false) => {
            return Err(AppError::new(
                ErrorKind::InvalidConfig,
                "No input source: pass --input <CSV>, --fetch, or --sample.",
            ));
        }
        _ => {
            return Err(AppError::new(
                ErrorKind::InvalidConfig,
                "Pick exactly one input source (--input, --fetch, or --sample).",
            ));
        }
    };

    Ok(ClassifyConfig {
        source,
        instrument: args.instrument.clone(),
        k: args.k,
        seed: args.seed,
        labels: args.labels.clone(),
        max_iters: args.max_iters,
        tolerance: args.tolerance,
        decimal_sep: args.decimal_sep,
        sample_days: args.sample_days,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_results: args.export.clone(),
        export_series: args.export_series.clone(),
        svg: args.svg.clone(),
    })
}

/// Rewrite argv so `tdc` defaults to `tdc classify`.
///
/// Rules:
/// - `tdc`                     -> `tdc classify` (which then asks for a source)
/// - `tdc -i taxas.csv ...`    -> `tdc classify -i taxas.csv ...`
/// - `tdc --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("classify".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "classify" | "current" | "fetch" | "plot");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "classify flags".
    if arg1.starts_with('-') {
        argv.insert(1, "classify".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_classify() {
        assert_eq!(rewrite_args(argv(&["tdc"])), argv(&["tdc", "classify"]));
    }

    #[test]
    fn leading_flag_routes_to_classify() {
        assert_eq!(
            rewrite_args(argv(&["tdc", "-i", "taxas.csv"])),
            argv(&["tdc", "classify", "-i", "taxas.csv"])
        );
    }

    #[test]
    fn explicit_subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(argv(&["tdc", "fetch"])),
            argv(&["tdc", "fetch"])
        );
        assert_eq!(
            rewrite_args(argv(&["tdc", "--help"])),
            argv(&["tdc", "--help"])
        );
    }

    #[test]
    fn exactly_one_source_is_required() {
        let args = ClassifyArgs::parse_from(["classify", "--fetch", "--sample"]);
        let err = classify_config_from_args(&args).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);

        let args = ClassifyArgs::parse_from(["classify"]);
        let err = classify_config_from_args(&args).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }
}
