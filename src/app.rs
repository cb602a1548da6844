//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves configuration (flags + environment)
//! - runs the load -> aggregate -> render -> compose pipeline
//! - prints the run summary and operator confirmation

use std::path::PathBuf;

use clap::Parser;

use crate::cli::{Command, ReportArgs, SampleArgs};
use crate::domain::{ReportConfig, TargetMonths};
use crate::error::AppError;

pub mod pipeline;

/// Smallest chart the bar panels stay legible at.
const MIN_CHART_WIDTH: u32 = 320;
const MIN_CHART_HEIGHT: u32 = 200;

/// Entry point for the `salesreport` binary.
pub fn run() -> Result<(), AppError> {
    env_logger::init();

    // We want `salesreport -i vendas.csv` to behave like
    // `salesreport report -i vendas.csv`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while keeping the one-command UX of the report this tool replaces.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Report(args) => handle_report(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let config = report_config_from_args(args)?;
    let run = pipeline::run_report(&config)?;

    println!(
        "{}",
        crate::report::format_run_summary(&run.ingest, &run.result, &config)
    );
    println!(
        "PDF report '{}' written successfully.",
        config.out_path.display()
    );
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let spec = crate::data::sample::SampleSpec {
        count: args.count,
        seed: args.seed,
        year: args.year,
    };
    let records = crate::data::sample::generate_sample(&spec)?;
    crate::data::sample::write_sample_csv(&args.out, &records)?;

    println!(
        "Sample CSV '{}' written ({} records).",
        args.out.display(),
        records.len()
    );
    Ok(())
}

/// Build the run configuration from CLI flags plus the environment.
pub fn report_config_from_args(args: ReportArgs) -> Result<ReportConfig, AppError> {
    let input_path = match args.input {
        Some(path) => path,
        None => {
            dotenvy::dotenv().ok();
            std::env::var("SALES_REPORT_INPUT")
                .map(PathBuf::from)
                .map_err(|_| {
                    AppError::load(
                        "Missing input: pass --input or set SALES_REPORT_INPUT (environment or .env).",
                    )
                })?
        }
    };

    if args.month_a == args.month_b {
        return Err(AppError::load("Target months must be two distinct months."));
    }
    if args.chart_width < MIN_CHART_WIDTH || args.chart_height < MIN_CHART_HEIGHT {
        return Err(AppError::load(format!(
            "Chart dimensions too small (minimum {MIN_CHART_WIDTH}x{MIN_CHART_HEIGHT})."
        )));
    }

    Ok(ReportConfig {
        input_path,
        out_path: args.out,
        chart_path: args.chart,
        target_months: TargetMonths {
            first: args.month_a,
            second: args.month_b,
        },
        title: args.title,
        chart_width: args.chart_width,
        chart_height: args.chart_height,
        export_json: args.export_json,
    })
}

/// Rewrite argv so `salesreport` defaults to `salesreport report`.
///
/// Rules:
/// - `salesreport`                      -> `salesreport report`
/// - `salesreport -i vendas.csv ...`    -> `salesreport report -i vendas.csv ...`
/// - `salesreport --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("report".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "report" | "sample");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "report flags".
    if arg1.starts_with('-') {
        argv.insert(1, "report".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
