//! Command-line parsing for the sales report generator.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the aggregation/composition code.

use std::path::PathBuf;

use chrono::Month;
use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "salesreport", version, about = "Sales report generator (CSV -> chart + PDF)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Aggregate a sales CSV and write the illustrated PDF report.
    Report(ReportArgs),
    /// Generate a synthetic sales CSV for demos and testing.
    Sample(SampleArgs),
}

/// Options for report generation.
#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    /// Input sales CSV. Falls back to `SALES_REPORT_INPUT` (environment or .env).
    #[arg(short = 'i', long)]
    pub input: Option<PathBuf>,

    /// Output PDF path (overwritten if present).
    #[arg(short = 'o', long, default_value = "sales_report.pdf")]
    pub out: PathBuf,

    /// Chart artifact path (PNG, embedded into the PDF; overwritten if present).
    #[arg(long, default_value = "sales_charts.png")]
    pub chart: PathBuf,

    /// First target month for the daily-sales breakdown (number or name).
    #[arg(long, value_parser = parse_month, default_value = "july")]
    pub month_a: Month,

    /// Second target month for the daily-sales breakdown (number or name).
    #[arg(long, value_parser = parse_month, default_value = "august")]
    pub month_b: Month,

    /// Report title.
    #[arg(long, default_value = "Sales and Revenue Report")]
    pub title: String,

    /// Chart width (pixels).
    #[arg(long, default_value_t = 1400)]
    pub chart_width: u32,

    /// Chart height (pixels).
    #[arg(long, default_value_t = 700)]
    pub chart_height: u32,

    /// Export the aggregate metrics to JSON as well.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

/// Options for synthetic CSV generation.
#[derive(Debug, Parser)]
pub struct SampleArgs {
    /// Output CSV path.
    #[arg(long, default_value = "sales_sample.csv")]
    pub out: PathBuf,

    /// Number of records to generate.
    #[arg(short = 'n', long, default_value_t = 500)]
    pub count: usize,

    /// Random seed (a fixed seed yields an identical CSV).
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Calendar year the generated dates fall in.
    #[arg(long, default_value_t = 2024)]
    pub year: i32,
}

/// Parse a month given as a number (1-12) or an English name/abbreviation.
pub fn parse_month(s: &str) -> Result<Month, String> {
    if let Ok(n) = s.parse::<u8>() {
        return Month::try_from(n).map_err(|_| format!("Month number out of range: {s}"));
    }
    s.parse::<Month>()
        .map_err(|_| format!("Unrecognized month: {s}"))
}
