//! CSV ingest and normalization.
//!
//! This module turns the raw sales export into a clean `SalesRecord`
//! sequence that is safe to aggregate.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Tolerant dates**: an unparseable sale date never aborts the run; the
//!   record stays in, flagged date-less
//! - **Separation of concerns**: no aggregation logic here

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::SalesRecord;
use crate::error::AppError;

/// Columns the loader requires. The names are the external contract of the
/// upstream sales export; matching is case-insensitive.
const REQUIRED_COLUMNS: [&str; 6] = ["numvenda", "datavenda", "receita", "estado", "titulo", "sku"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub id: Option<String>,
    pub message: String,
}

/// Ingest output: normalized records + counts for the run summary.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub records: Vec<SalesRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
    /// Rows kept despite an absent or unparseable sale date.
    pub rows_undated: usize,
}

/// Load and normalize the sales CSV.
///
/// An empty file (headers only, or zero rows) is NOT an error: the pipeline
/// degrades to an empty report downstream.
pub fn load_sales_records(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::load(format!("Failed to open sales CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::load(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_undated = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    id: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map) {
            Ok(row) => {
                if row.sale_date.is_none() {
                    rows_undated += 1;
                }
                records.push(row);
            }
            Err(e) => row_errors.push(RowError {
                line,
                id: get_optional(&record, &header_map, "numvenda").map(str::to_string),
                message: e,
            }),
        }
    }

    if !row_errors.is_empty() {
        log::warn!("{} row(s) skipped during ingest (see run summary)", row_errors.len());
    }
    if rows_undated > 0 {
        log::warn!(
            "{rows_undated} record(s) have no parseable sale date; excluded from date-keyed metrics"
        );
    }

    let rows_used = records.len();
    Ok(IngestedData {
        records,
        row_errors,
        rows_read,
        rows_used,
        rows_undated,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on
    // the first header (e.g. "﻿numvenda"). If we don't strip it, schema
    // validation will incorrectly report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    for column in REQUIRED_COLUMNS {
        if !header_map.contains_key(column) {
            return Err(AppError::load(format!("Missing required column: `{column}`")));
        }
    }
    Ok(())
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<SalesRecord, String> {
    let sale_id = get_required(record, header_map, "numvenda")?.to_string();

    let revenue = get_required(record, header_map, "receita")?
        .parse::<f64>()
        .map_err(|_| "Invalid `receita` value (not a number).".to_string())?;
    if !revenue.is_finite() || revenue < 0.0 {
        return Err("Invalid `receita` value (must be finite and >= 0).".to_string());
    }

    // Absent or unparseable dates degrade to `None` rather than rejecting
    // the row; the record still counts for region/product metrics.
    let sale_date = get_optional(record, header_map, "datavenda").and_then(parse_sale_date);

    let region = get_optional(record, header_map, "estado")
        .map(str::to_string)
        .unwrap_or_default();
    let product_title = get_optional(record, header_map, "titulo")
        .map(str::to_string)
        .unwrap_or_default();
    let sku = get_optional(record, header_map, "sku")
        .map(str::to_string)
        .unwrap_or_default();

    Ok(SalesRecord {
        sale_id,
        sale_date,
        revenue,
        region,
        product_title,
        sku,
    })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

/// Parse a sale date, accepting the formats seen in real exports.
///
/// We recommend ISO dates (`YYYY-MM-DD`), but marketplace exports often use
/// `DD/MM/YYYY` or carry a time-of-day suffix. Parsing stays deterministic:
/// the first matching format wins, and failure maps to `None`.
fn parse_sale_date(s: &str) -> Option<NaiveDate> {
    const DATE_FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    const DATETIME_FMTS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%d/%m/%Y %H:%M:%S"];

    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}
