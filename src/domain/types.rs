//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - built up row-by-row during ingest
//! - aggregated in-memory without copying
//! - rendered into report sections and exports

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{Datelike, Month, NaiveDate};

/// One sales transaction after normalization.
///
/// Field names are ours; the source column names (`numvenda`, `datavenda`,
/// `receita`, `estado`, `titulo`, `sku`) are an external contract handled by
/// the ingest layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub sale_id: String,
    /// `None` when the source value was absent or unparseable. Such records
    /// still participate in region and product aggregations but are excluded
    /// from every date-keyed metric.
    pub sale_date: Option<NaiveDate>,
    /// Non-negative; rows with missing or negative revenue are rejected at
    /// ingest.
    pub revenue: f64,
    pub region: String,
    pub product_title: String,
    pub sku: String,
}

/// The two calendar months configured for the daily-sales breakdown.
///
/// Matching is by month-of-year regardless of year, mirroring the upstream
/// report this tool replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetMonths {
    pub first: Month,
    pub second: Month,
}

/// A calendar month qualified by its year, used to key monthly revenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Per-day sales counts for one target month.
///
/// Only days with at least one sale appear; `BTreeMap` keeps the dates
/// ascending. Zero-sale days are never synthesized (the downstream document
/// format depends on this).
#[derive(Debug, Clone, PartialEq)]
pub struct DailyCounts {
    pub month: Month,
    pub days: BTreeMap<NaiveDate, u64>,
}

impl DailyCounts {
    pub fn empty(month: Month) -> Self {
        Self {
            month,
            days: BTreeMap::new(),
        }
    }

    /// Total sales across all days of this month bucket.
    pub fn total(&self) -> u64 {
        self.days.values().sum()
    }
}

/// One region's slice of the total transaction count, in percent (0-100).
#[derive(Debug, Clone, PartialEq)]
pub struct RegionShare {
    pub region: String,
    pub share: f64,
}

/// Summary of the best-selling product (by transaction count).
#[derive(Debug, Clone, PartialEq)]
pub struct TopProduct {
    pub title: String,
    /// SKU of the first record carrying the winning title.
    pub sku: String,
    pub units_sold: u64,
    /// Revenue summed over every record with the winning title.
    pub revenue: f64,
}

/// All derived metrics for one report run.
///
/// Computed once from a frozen snapshot of loaded records; never mutated
/// afterwards and never persisted beyond the optional JSON export.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    /// Daily counts for the two target months, in configuration order.
    pub daily_counts: [DailyCounts; 2],
    /// Revenue per calendar month for ALL months present in the dataset,
    /// chronological.
    pub monthly_revenue: BTreeMap<YearMonth, f64>,
    /// Descending by share; encounter order breaks ties.
    pub region_share: Vec<RegionShare>,
    /// `None` when the dataset is empty.
    pub top_product: Option<TopProduct>,
    pub records_total: usize,
    /// Records with a parseable sale date.
    pub records_dated: usize,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults and the environment).
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub input_path: PathBuf,
    pub out_path: PathBuf,
    pub chart_path: PathBuf,
    pub target_months: TargetMonths,
    pub title: String,
    pub chart_width: u32,
    pub chart_height: u32,
    pub export_json: Option<PathBuf>,
}
