//! Synthetic sales CSV generation for demos and manual testing.
//!
//! The generator is deterministic: a fixed seed yields an identical CSV, so
//! generated files are safe to use in walkthroughs and regression checks.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::LogNormal;

use crate::domain::SalesRecord;
use crate::error::AppError;

/// Product catalog: (title, sku) with a pick weight.
const CATALOG: [((&str, &str), f64); 6] = [
    (("Capa Protetora Premium", "CAP-001"), 0.30),
    (("Cabo USB-C 2m", "CAB-014"), 0.22),
    (("Pelicula de Vidro", "PEL-003"), 0.18),
    (("Carregador Turbo 20W", "CAR-020"), 0.14),
    (("Suporte Veicular", "SUP-007"), 0.10),
    (("Fone Bluetooth", "FON-002"), 0.06),
];

/// Region pool with rough marketplace weights.
const REGIONS: [(&str, f64); 8] = [
    ("SP", 0.38),
    ("RJ", 0.15),
    ("MG", 0.12),
    ("PR", 0.09),
    ("RS", 0.08),
    ("BA", 0.07),
    ("SC", 0.06),
    ("PE", 0.05),
];

/// Month-of-year weights. The bulk of sales lands in July/August so the
/// default report months have something to show.
const MONTHS: [(u32, f64); 12] = [
    (1, 0.03),
    (2, 0.03),
    (3, 0.04),
    (4, 0.05),
    (5, 0.06),
    (6, 0.08),
    (7, 0.28),
    (8, 0.26),
    (9, 0.07),
    (10, 0.04),
    (11, 0.03),
    (12, 0.03),
];

/// Log-revenue parameters: median around R$ 36 with a long right tail.
const REVENUE_MU: f64 = 3.6;
const REVENUE_SIGMA: f64 = 0.6;

#[derive(Debug, Clone)]
pub struct SampleSpec {
    pub count: usize,
    pub seed: u64,
    /// Calendar year all generated dates fall in.
    pub year: i32,
}

/// Generate `spec.count` synthetic sales records.
pub fn generate_sample(spec: &SampleSpec) -> Result<Vec<SalesRecord>, AppError> {
    if spec.count == 0 {
        return Err(AppError::load("Sample count must be > 0."));
    }

    let mut rng = StdRng::seed_from_u64(spec.seed);
    let revenue_dist = LogNormal::new(REVENUE_MU, REVENUE_SIGMA)
        .map_err(|e| AppError::load(format!("Revenue distribution error: {e}")))?;

    let mut records = Vec::with_capacity(spec.count);
    for i in 0..spec.count {
        let month = *pick_weighted(&mut rng, &MONTHS);
        let day = rng.gen_range(1..=days_in_month(spec.year, month));
        let sale_date = NaiveDate::from_ymd_opt(spec.year, month, day)
            .ok_or_else(|| AppError::load("Generated an invalid calendar date."))?;

        let (title, sku) = *pick_weighted(&mut rng, &CATALOG);
        let region = *pick_weighted(&mut rng, &REGIONS);
        let revenue = (revenue_dist.sample(&mut rng) * 100.0).round() / 100.0;

        records.push(SalesRecord {
            sale_id: format!("{}", 100_000 + i),
            sale_date: Some(sale_date),
            revenue,
            region: region.to_string(),
            product_title: title.to_string(),
            sku: sku.to_string(),
        });
    }

    Ok(records)
}

/// Write records as a CSV using the external column contract.
pub fn write_sample_csv(path: &Path, records: &[SalesRecord]) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::load(format!("Failed to create sample CSV '{}': {e}", path.display())))?;

    writeln!(file, "numvenda,datavenda,receita,estado,titulo,sku")
        .map_err(|e| AppError::load(format!("Failed to write sample CSV header: {e}")))?;

    for record in records {
        let date = record
            .sale_date
            .map(|d| d.to_string())
            .unwrap_or_default();
        writeln!(
            file,
            "{},{},{:.2},{},{},{}",
            record.sale_id, date, record.revenue, record.region, record.product_title, record.sku
        )
        .map_err(|e| AppError::load(format!("Failed to write sample CSV row: {e}")))?;
    }

    Ok(())
}

fn pick_weighted<'a, T>(rng: &mut StdRng, items: &'a [(T, f64)]) -> &'a T {
    let total: f64 = items.iter().map(|(_, w)| w).sum();
    let mut roll = rng.r#gen::<f64>() * total;
    for (item, weight) in items {
        if roll < *weight {
            return item;
        }
        roll -= weight;
    }
    // Floating point can leave a hair of weight unconsumed.
    &items[items.len() - 1].0
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    first_of_next
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}
