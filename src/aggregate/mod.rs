//! Aggregate metric computation over the loaded record set.
//!
//! Everything here is a pure function of the record slice:
//!
//! - no I/O and no hidden state (same input -> identical output)
//! - date-less records participate in region/product metrics only
//! - grouping happens once; rankings and revenue sums reuse the index

pub mod groups;

use std::collections::BTreeMap;

use chrono::{Datelike, Month, NaiveDate};

use crate::domain::{
    AggregateResult, DailyCounts, RegionShare, SalesRecord, TargetMonths, TopProduct, YearMonth,
};
use groups::GroupIndex;

/// Derive all report metrics from a frozen snapshot of records.
pub fn aggregate(records: &[SalesRecord], targets: TargetMonths) -> AggregateResult {
    let mut by_region = GroupIndex::new();
    let mut by_title = GroupIndex::new();
    for (idx, record) in records.iter().enumerate() {
        by_region.push(&record.region, idx);
        by_title.push(&record.product_title, idx);
    }

    let daily_counts = [
        daily_counts_for(records, targets.first),
        daily_counts_for(records, targets.second),
    ];

    AggregateResult {
        daily_counts,
        monthly_revenue: monthly_revenue(records),
        region_share: region_share(&by_region, records.len()),
        top_product: top_product(records, &by_title),
        records_total: records.len(),
        records_dated: records.iter().filter(|r| r.sale_date.is_some()).count(),
    }
}

/// Count sales per exact date for records whose date falls in `month`.
///
/// Matching is month-of-year only (any year); days with zero sales are not
/// synthesized.
fn daily_counts_for(records: &[SalesRecord], month: Month) -> DailyCounts {
    let mut days: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for record in records {
        let Some(date) = record.sale_date else { continue };
        if date.month() != month.number_from_month() {
            continue;
        }
        *days.entry(date).or_insert(0) += 1;
    }
    DailyCounts { month, days }
}

/// Sum revenue per calendar month over all date-bearing records.
fn monthly_revenue(records: &[SalesRecord]) -> BTreeMap<YearMonth, f64> {
    let mut totals = BTreeMap::new();
    for record in records {
        let Some(date) = record.sale_date else { continue };
        *totals.entry(YearMonth::of(date)).or_insert(0.0) += record.revenue;
    }
    totals
}

/// Percentage of total records per region, descending by share.
///
/// The denominator is the full record count (date-less records included), so
/// shares sum to 100 whenever anything was loaded. No rounding here; the
/// composer rounds for presentation.
fn region_share(by_region: &GroupIndex, total: usize) -> Vec<RegionShare> {
    if total == 0 {
        return Vec::new();
    }

    let mut shares: Vec<RegionShare> = by_region
        .iter()
        .map(|(region, indices)| RegionShare {
            region: region.to_string(),
            share: indices.len() as f64 / total as f64 * 100.0,
        })
        .collect();

    // Stable sort: equal shares keep their first-encounter order.
    shares.sort_by(|a, b| b.share.partial_cmp(&a.share).unwrap_or(std::cmp::Ordering::Equal));
    shares
}

/// The title with the most transactions; ties resolve to the title seen
/// first in the record sequence.
fn top_product(records: &[SalesRecord], by_title: &GroupIndex) -> Option<TopProduct> {
    let (title, indices) = by_title.max_by_count()?;
    let first = &records[indices[0]];
    let revenue = indices.iter().map(|&i| records[i].revenue).sum();

    Some(TopProduct {
        title: title.to_string(),
        sku: first.sku.clone(),
        units_sold: indices.len() as u64,
        revenue,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, date: Option<&str>, revenue: f64, region: &str, title: &str, sku: &str) -> SalesRecord {
        SalesRecord {
            sale_id: id.to_string(),
            sale_date: date.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
            revenue,
            region: region.to_string(),
            product_title: title.to_string(),
            sku: sku.to_string(),
        }
    }

    fn targets() -> TargetMonths {
        TargetMonths {
            first: Month::July,
            second: Month::August,
        }
    }

    #[test]
    fn three_record_scenario() {
        // Two July sales (10 + 20), one August sale (5), one region, title
        // counts {2, 1}.
        let records = vec![
            rec("1", Some("2024-07-01"), 10.0, "SP", "Case", "SKU-A"),
            rec("2", Some("2024-07-01"), 20.0, "SP", "Case", "SKU-A"),
            rec("3", Some("2024-08-02"), 5.0, "SP", "Cable", "SKU-B"),
        ];

        let result = aggregate(&records, targets());

        assert_eq!(result.daily_counts[0].total(), 2);
        assert_eq!(result.daily_counts[0].days.len(), 1);
        assert_eq!(result.daily_counts[1].total(), 1);

        let july = YearMonth { year: 2024, month: 7 };
        let august = YearMonth { year: 2024, month: 8 };
        assert_eq!(result.monthly_revenue[&july], 30.0);
        assert_eq!(result.monthly_revenue[&august], 5.0);

        assert_eq!(result.region_share.len(), 1);
        assert_eq!(result.region_share[0].region, "SP");
        assert!((result.region_share[0].share - 100.0).abs() < 1e-9);

        let top = result.top_product.unwrap();
        assert_eq!(top.title, "Case");
        assert_eq!(top.sku, "SKU-A");
        assert_eq!(top.units_sold, 2);
        assert!((top.revenue - 30.0).abs() < 1e-9);
    }

    #[test]
    fn daily_counts_total_matches_month_population() {
        let records = vec![
            rec("1", Some("2024-07-01"), 1.0, "SP", "A", "S1"),
            rec("2", Some("2024-07-03"), 1.0, "SP", "A", "S1"),
            rec("3", Some("2024-07-03"), 1.0, "RJ", "B", "S2"),
            rec("4", Some("2024-09-01"), 1.0, "RJ", "B", "S2"),
            rec("5", None, 1.0, "RJ", "B", "S2"),
        ];

        let result = aggregate(&records, targets());
        let in_july = records
            .iter()
            .filter(|r| r.sale_date.is_some_and(|d| d.month() == 7))
            .count() as u64;
        assert_eq!(result.daily_counts[0].total(), in_july);
        assert_eq!(result.daily_counts[0].days.len(), 2);
    }

    #[test]
    fn daily_counts_bucket_by_month_across_years() {
        let records = vec![
            rec("1", Some("2023-07-10"), 1.0, "SP", "A", "S1"),
            rec("2", Some("2024-07-10"), 1.0, "SP", "A", "S1"),
        ];

        let result = aggregate(&records, targets());
        // Same month-of-year, different years: two distinct day buckets.
        assert_eq!(result.daily_counts[0].days.len(), 2);
        assert_eq!(result.daily_counts[0].total(), 2);
    }

    #[test]
    fn monthly_revenue_covers_all_months_and_sums_dated_revenue() {
        let records = vec![
            rec("1", Some("2024-03-01"), 7.5, "SP", "A", "S1"),
            rec("2", Some("2024-07-01"), 10.0, "SP", "A", "S1"),
            rec("3", Some("2024-12-31"), 2.5, "SP", "A", "S1"),
            rec("4", None, 99.0, "SP", "A", "S1"),
        ];

        let result = aggregate(&records, targets());
        assert_eq!(result.monthly_revenue.len(), 3);

        let dated_total: f64 = records
            .iter()
            .filter(|r| r.sale_date.is_some())
            .map(|r| r.revenue)
            .sum();
        let summed: f64 = result.monthly_revenue.values().sum();
        assert!((summed - dated_total).abs() < 1e-9);

        // BTreeMap keys come back chronologically.
        let months: Vec<String> = result.monthly_revenue.keys().map(|m| m.to_string()).collect();
        assert_eq!(months, vec!["2024-03", "2024-07", "2024-12"]);
    }

    #[test]
    fn region_shares_sum_to_100_and_sort_descending() {
        let records = vec![
            rec("1", Some("2024-07-01"), 1.0, "RJ", "A", "S1"),
            rec("2", Some("2024-07-01"), 1.0, "SP", "A", "S1"),
            rec("3", Some("2024-07-02"), 1.0, "SP", "A", "S1"),
            rec("4", None, 1.0, "MG", "A", "S1"),
        ];

        let result = aggregate(&records, targets());
        let total: f64 = result.region_share.iter().map(|s| s.share).sum();
        assert!((total - 100.0).abs() < 1e-9);

        assert_eq!(result.region_share[0].region, "SP");
        assert!((result.region_share[0].share - 50.0).abs() < 1e-9);
        // RJ and MG tie at 25%; RJ was encountered first.
        assert_eq!(result.region_share[1].region, "RJ");
        assert_eq!(result.region_share[2].region, "MG");
    }

    #[test]
    fn top_product_tie_resolves_to_first_encounter() {
        let records = vec![
            rec("1", Some("2024-07-01"), 3.0, "SP", "Cable", "SKU-B"),
            rec("2", Some("2024-07-01"), 1.0, "SP", "Case", "SKU-A"),
            rec("3", Some("2024-07-02"), 2.0, "SP", "Case", "SKU-A"),
            rec("4", Some("2024-07-02"), 4.0, "SP", "Cable", "SKU-B"),
        ];

        let top = aggregate(&records, targets()).top_product.unwrap();
        assert_eq!(top.title, "Cable");
        assert_eq!(top.units_sold, 2);
        assert!((top.revenue - 7.0).abs() < 1e-9);
    }

    #[test]
    fn undated_records_still_count_for_region_and_product() {
        let records = vec![rec("1", None, 12.0, "BA", "Strap", "SKU-S")];

        let result = aggregate(&records, targets());
        assert_eq!(result.daily_counts[0].total(), 0);
        assert_eq!(result.daily_counts[1].total(), 0);
        assert!(result.monthly_revenue.is_empty());

        assert_eq!(result.region_share.len(), 1);
        assert!((result.region_share[0].share - 100.0).abs() < 1e-9);

        let top = result.top_product.unwrap();
        assert_eq!(top.title, "Strap");
        assert_eq!(top.units_sold, 1);
        assert_eq!(result.records_dated, 0);
    }

    #[test]
    fn empty_input_yields_empty_result() {
        let result = aggregate(&[], targets());
        assert_eq!(result.records_total, 0);
        assert!(result.daily_counts[0].days.is_empty());
        assert!(result.daily_counts[1].days.is_empty());
        assert!(result.monthly_revenue.is_empty());
        assert!(result.region_share.is_empty());
        assert!(result.top_product.is_none());
    }

    #[test]
    fn aggregation_is_idempotent() {
        let records = vec![
            rec("1", Some("2024-07-01"), 10.0, "SP", "Case", "SKU-A"),
            rec("2", Some("2024-08-09"), 20.0, "RJ", "Cable", "SKU-B"),
            rec("3", None, 5.0, "MG", "Case", "SKU-A"),
        ];

        let first = aggregate(&records, targets());
        let second = aggregate(&records, targets());
        assert_eq!(first, second);
    }
}
