//! Report composition: aggregate metrics -> ordered document sections.
//!
//! We keep composition and formatting in one place so:
//! - the aggregation code stays clean and testable
//! - output changes are localized (important for future snapshot tests)
//!
//! The section order is a contract: title, chart, daily sales per target
//! month, monthly revenue, region share, and (for non-empty datasets) the
//! best-selling product table + details.

pub mod sections;

use std::collections::BTreeMap;
use std::path::Path;

use crate::domain::{AggregateResult, DailyCounts, RegionShare, ReportConfig, YearMonth};
use crate::io::ingest::IngestedData;
use sections::Section;

const MAX_ROW_ERRORS_SHOWN: usize = 5;

/// Assemble the full ordered section list for one report.
///
/// Composition never fails: empty metric maps degrade to a header plus
/// column line with no data rows, and an empty dataset simply omits the
/// top-product sections.
pub fn compose_sections(result: &AggregateResult, chart_path: &Path, title: &str) -> Vec<Section> {
    let mut out = Vec::new();

    out.push(Section::Title(title.to_string()));
    out.push(Section::Image(chart_path.to_path_buf()));

    let [first, second] = &result.daily_counts;
    out.push(Section::Heading(format!(
        "Sales per Day ({} and {}):",
        first.month.name(),
        second.month.name()
    )));
    out.push(Section::TextBlock(daily_lines(first)));
    out.push(Section::TextBlock(daily_lines(second)));

    out.push(Section::Heading("Revenue per Month:".to_string()));
    out.push(Section::TextBlock(revenue_lines(&result.monthly_revenue)));

    out.push(Section::Heading("Sales Share by Region:".to_string()));
    out.push(Section::TextBlock(region_lines(&result.region_share)));

    if let Some(top) = &result.top_product {
        out.push(Section::Heading("Best-Selling Product:".to_string()));
        out.push(Section::Table {
            columns: vec!["Product".to_string(), "SKU".to_string()],
            rows: vec![vec![top.title.clone(), top.sku.clone()]],
        });
        out.push(Section::Heading("Best-Selling Product Details:".to_string()));
        out.push(Section::TextBlock(vec![
            format!("Product: {}", top.title),
            format!("SKU: {}", top.sku),
            format!("Units Sold: {}", top.units_sold),
            format!("Revenue Generated: {:.2}", top.revenue),
        ]));
    }

    out
}

fn daily_lines(counts: &DailyCounts) -> Vec<String> {
    let mut lines = vec![
        format!("{} sales:", counts.month.name()),
        "Date            |    Sales".to_string(),
        "--------------------------------".to_string(),
    ];
    for (date, count) in &counts.days {
        lines.push(format!("{date} | {count} sales"));
    }
    lines
}

fn revenue_lines(monthly: &BTreeMap<YearMonth, f64>) -> Vec<String> {
    let mut lines = vec![
        "Month      | Revenue".to_string(),
        "-----------------------".to_string(),
    ];
    for (month, total) in monthly {
        lines.push(format!("{month} | {total:.2}"));
    }
    lines
}

fn region_lines(shares: &[RegionShare]) -> Vec<String> {
    let mut lines = vec![
        "Region     | Share (%)".to_string(),
        "-----------------------".to_string(),
    ];
    for share in shares {
        lines.push(format!("{} | {:.2}%", share.region, share.share));
    }
    lines
}

/// Format the run summary printed to the operator after a successful run.
pub fn format_run_summary(ingest: &IngestedData, result: &AggregateResult, config: &ReportConfig) -> String {
    let mut out = String::new();

    out.push_str("=== salesreport - Sales & Revenue Report ===\n");
    out.push_str(&format!("Input: {}\n", config.input_path.display()));
    out.push_str(&format!(
        "Target months: {} / {}\n",
        config.target_months.first.name(),
        config.target_months.second.name()
    ));
    out.push_str(&format!(
        "Rows: read={} used={} undated={} skipped={}\n",
        ingest.rows_read,
        ingest.rows_used,
        ingest.rows_undated,
        ingest.row_errors.len()
    ));
    for err in ingest.row_errors.iter().take(MAX_ROW_ERRORS_SHOWN) {
        let id = err.id.as_deref().unwrap_or("-");
        out.push_str(&format!("  (line {}, id {id}) {}\n", err.line, err.message));
    }
    if ingest.row_errors.len() > MAX_ROW_ERRORS_SHOWN {
        out.push_str(&format!(
            "  ... and {} more\n",
            ingest.row_errors.len() - MAX_ROW_ERRORS_SHOWN
        ));
    }

    out.push_str(&format!(
        "Metrics: revenue months={} regions={}\n",
        result.monthly_revenue.len(),
        result.region_share.len()
    ));
    match &result.top_product {
        Some(top) => out.push_str(&format!(
            "Top product: {} ({}) x{} = {:.2}\n",
            top.title, top.sku, top.units_sold, top.revenue
        )),
        None => out.push_str("Top product: none (empty dataset)\n"),
    }
    out.push_str(&format!(
        "Artifacts: chart={} document={}\n",
        config.chart_path.display(),
        config.out_path.display()
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DailyCounts, TopProduct};
    use chrono::{Month, NaiveDate};
    use std::path::PathBuf;

    fn sample_result() -> AggregateResult {
        let mut july = DailyCounts::empty(Month::July);
        july.days
            .insert(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(), 2);
        july.days
            .insert(NaiveDate::from_ymd_opt(2024, 7, 3).unwrap(), 1);
        let august = DailyCounts::empty(Month::August);

        let mut monthly = BTreeMap::new();
        monthly.insert(YearMonth { year: 2024, month: 7 }, 30.0);
        monthly.insert(YearMonth { year: 2024, month: 8 }, 5.0);

        AggregateResult {
            daily_counts: [july, august],
            monthly_revenue: monthly,
            region_share: vec![
                RegionShare { region: "SP".to_string(), share: 66.666_666_666_7 },
                RegionShare { region: "RJ".to_string(), share: 33.333_333_333_3 },
            ],
            top_product: Some(TopProduct {
                title: "Capa Premium".to_string(),
                sku: "CAP-001".to_string(),
                units_sold: 2,
                revenue: 30.0,
            }),
            records_total: 3,
            records_dated: 3,
        }
    }

    fn empty_result() -> AggregateResult {
        AggregateResult {
            daily_counts: [DailyCounts::empty(Month::July), DailyCounts::empty(Month::August)],
            monthly_revenue: BTreeMap::new(),
            region_share: Vec::new(),
            top_product: None,
            records_total: 0,
            records_dated: 0,
        }
    }

    #[test]
    fn section_order_is_fixed() {
        let sections = compose_sections(&sample_result(), Path::new("charts.png"), "Sales Report");

        assert!(matches!(&sections[0], Section::Title(t) if t == "Sales Report"));
        assert!(matches!(&sections[1], Section::Image(p) if p == &PathBuf::from("charts.png")));
        assert!(matches!(&sections[2], Section::Heading(h) if h == "Sales per Day (July and August):"));
        assert!(matches!(&sections[3], Section::TextBlock(_)));
        assert!(matches!(&sections[4], Section::TextBlock(_)));
        assert!(matches!(&sections[5], Section::Heading(h) if h == "Revenue per Month:"));
        assert!(matches!(&sections[6], Section::TextBlock(_)));
        assert!(matches!(&sections[7], Section::Heading(h) if h == "Sales Share by Region:"));
        assert!(matches!(&sections[8], Section::TextBlock(_)));
        assert!(matches!(&sections[9], Section::Heading(h) if h == "Best-Selling Product:"));
        assert!(matches!(&sections[10], Section::Table { .. }));
        assert!(matches!(&sections[11], Section::Heading(h) if h == "Best-Selling Product Details:"));
        assert!(matches!(&sections[12], Section::TextBlock(_)));
        assert_eq!(sections.len(), 13);
    }

    #[test]
    fn daily_revenue_and_region_lines_use_contract_formats() {
        let sections = compose_sections(&sample_result(), Path::new("charts.png"), "T");

        let Section::TextBlock(july) = &sections[3] else {
            panic!("expected July text block")
        };
        assert_eq!(july[0], "July sales:");
        assert_eq!(july[3], "2024-07-01 | 2 sales");
        assert_eq!(july[4], "2024-07-03 | 1 sales");

        let Section::TextBlock(revenue) = &sections[6] else {
            panic!("expected revenue text block")
        };
        assert_eq!(revenue[2], "2024-07 | 30.00");
        assert_eq!(revenue[3], "2024-08 | 5.00");

        let Section::TextBlock(regions) = &sections[8] else {
            panic!("expected region text block")
        };
        assert_eq!(regions[2], "SP | 66.67%");
        assert_eq!(regions[3], "RJ | 33.33%");
    }

    #[test]
    fn empty_dataset_degrades_to_headers_without_top_product() {
        let sections = compose_sections(&empty_result(), Path::new("charts.png"), "T");

        // No table and no top-product headings anywhere.
        assert!(!sections.iter().any(|s| matches!(s, Section::Table { .. })));
        assert!(
            !sections
                .iter()
                .any(|s| matches!(s, Section::Heading(h) if h.contains("Best-Selling")))
        );

        // Metric blocks still carry their column line + rule, just no rows.
        let Section::TextBlock(revenue) = &sections[6] else {
            panic!("expected revenue text block")
        };
        assert_eq!(revenue.len(), 2);
    }

    #[test]
    fn month_headers_follow_configuration() {
        let mut result = empty_result();
        result.daily_counts[0].month = Month::September;
        result.daily_counts[1].month = Month::October;

        let sections = compose_sections(&result, Path::new("c.png"), "T");
        assert!(
            matches!(&sections[2], Section::Heading(h) if h == "Sales per Day (September and October):")
        );
        let Section::TextBlock(first) = &sections[3] else {
            panic!("expected text block")
        };
        assert_eq!(first[0], "September sales:");
    }

    #[test]
    fn run_summary_mentions_empty_dataset() {
        let config = ReportConfig {
            input_path: PathBuf::from("vendas.csv"),
            out_path: PathBuf::from("out.pdf"),
            chart_path: PathBuf::from("charts.png"),
            target_months: crate::domain::TargetMonths {
                first: Month::July,
                second: Month::August,
            },
            title: "T".to_string(),
            chart_width: 1400,
            chart_height: 700,
            export_json: None,
        };
        let ingest = IngestedData {
            records: Vec::new(),
            row_errors: Vec::new(),
            rows_read: 0,
            rows_used: 0,
            rows_undated: 0,
        };

        let summary = format_run_summary(&ingest, &empty_result(), &config);
        assert!(summary.contains("Top product: none"));
        assert!(summary.contains("read=0"));
    }
}
