//! Export aggregate metrics to JSON.
//!
//! The export is the "portable" representation of one run's metrics, meant
//! to be easy to consume in spreadsheets, notebooks, or downstream scripts.
//! The schema is explicit so the in-memory types can evolve without breaking
//! consumers.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::AggregateResult;
use crate::error::AppError;

/// On-disk schema of the metrics export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsFile {
    pub tool: String,
    pub target_months: [String; 2],
    pub daily_counts: [Vec<DayCountRow>; 2],
    pub monthly_revenue: Vec<MonthRevenueRow>,
    pub region_share: Vec<RegionShareRow>,
    pub top_product: Option<TopProductRow>,
    pub records_total: usize,
    pub records_dated: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayCountRow {
    pub date: NaiveDate,
    pub sales: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthRevenueRow {
    pub month: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionShareRow {
    pub region: String,
    pub share: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopProductRow {
    pub title: String,
    pub sku: String,
    pub units_sold: u64,
    pub revenue: f64,
}

/// Write the metrics JSON file.
pub fn write_metrics_json(path: &Path, result: &AggregateResult) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::compose(format!(
            "Failed to create metrics JSON '{}': {e}",
            path.display()
        ))
    })?;

    serde_json::to_writer_pretty(file, &metrics_file(result))
        .map_err(|e| AppError::compose(format!("Failed to write metrics JSON: {e}")))?;
    log::info!("wrote metrics export: {}", path.display());
    Ok(())
}

fn metrics_file(result: &AggregateResult) -> MetricsFile {
    let [first, second] = &result.daily_counts;

    let day_rows = |counts: &crate::domain::DailyCounts| {
        counts
            .days
            .iter()
            .map(|(&date, &sales)| DayCountRow { date, sales })
            .collect::<Vec<_>>()
    };

    MetricsFile {
        tool: "salesreport".to_string(),
        target_months: [first.month.name().to_string(), second.month.name().to_string()],
        daily_counts: [day_rows(first), day_rows(second)],
        monthly_revenue: result
            .monthly_revenue
            .iter()
            .map(|(month, &revenue)| MonthRevenueRow {
                month: month.to_string(),
                revenue,
            })
            .collect(),
        region_share: result
            .region_share
            .iter()
            .map(|s| RegionShareRow {
                region: s.region.clone(),
                share: s.share,
            })
            .collect(),
        top_product: result.top_product.as_ref().map(|top| TopProductRow {
            title: top.title.clone(),
            sku: top.sku.clone(),
            units_sold: top.units_sold,
            revenue: top.revenue,
        }),
        records_total: result.records_total,
        records_dated: result.records_dated,
    }
}
