//! Shared report pipeline used by the CLI front-end.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV load -> aggregation -> chart artifact -> section composition -> PDF
//!
//! The front-end focuses on flags and operator output.

use crate::aggregate;
use crate::domain::{AggregateResult, ReportConfig};
use crate::error::AppError;
use crate::io::ingest::{self, IngestedData};

/// All computed outputs of a single report run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub result: AggregateResult,
}

/// Execute the full report pipeline and return the computed outputs.
///
/// The stages run strictly in sequence; in particular the chart artifact is
/// fully flushed to disk before composition starts, because the document
/// writer reads it back to embed it.
pub fn run_report(config: &ReportConfig) -> Result<RunOutput, AppError> {
    // 1) Load and normalize the sales CSV. An empty dataset is fine.
    let ingest = ingest::load_sales_records(&config.input_path)?;

    // 2) Aggregate metrics from the frozen record snapshot.
    let result = aggregate::aggregate(&ingest.records, config.target_months);

    // 3) Render the chart artifact.
    crate::chart::render_chart(
        &config.chart_path,
        &result,
        config.chart_width,
        config.chart_height,
    )?;

    // 4) Compose the ordered sections and write the document artifact.
    let sections = crate::report::compose_sections(&result, &config.chart_path, &config.title);
    crate::io::pdf::write_report_pdf(&config.out_path, &sections)?;

    // 5) Optional metrics export.
    if let Some(path) = &config.export_json {
        crate::io::export::write_metrics_json(path, &result)?;
    }

    Ok(RunOutput { ingest, result })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TargetMonths;
    use chrono::Month;
    use std::io::Write;
    use std::path::Path;

    fn config_for(dir: &Path, input: &str) -> ReportConfig {
        ReportConfig {
            input_path: dir.join(input),
            out_path: dir.join("report.pdf"),
            chart_path: dir.join("charts.png"),
            target_months: TargetMonths {
                first: Month::July,
                second: Month::August,
            },
            title: "Sales and Revenue Report".to_string(),
            chart_width: 640,
            chart_height: 320,
            export_json: Some(dir.join("metrics.json")),
        }
    }

    fn write_input(dir: &Path, name: &str, contents: &str) {
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn end_to_end_produces_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        write_input(
            dir.path(),
            "vendas.csv",
            "numvenda,datavenda,receita,estado,titulo,sku\n\
             1,2024-07-01,10.00,SP,Capa,CAP-001\n\
             2,2024-07-01,20.00,SP,Capa,CAP-001\n\
             3,2024-08-02,5.00,SP,Cabo,CAB-014\n",
        );
        let config = config_for(dir.path(), "vendas.csv");

        let run = run_report(&config).unwrap();

        assert_eq!(run.ingest.rows_used, 3);
        assert_eq!(run.result.daily_counts[0].total(), 2);
        assert_eq!(run.result.top_product.as_ref().unwrap().title, "Capa");

        let pdf = std::fs::read(&config.out_path).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
        let png = std::fs::read(&config.chart_path).unwrap();
        assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
        assert!(config.export_json.as_ref().unwrap().exists());
    }

    #[test]
    fn empty_dataset_still_produces_a_report() {
        let dir = tempfile::tempdir().unwrap();
        write_input(
            dir.path(),
            "vendas.csv",
            "numvenda,datavenda,receita,estado,titulo,sku\n",
        );
        let config = config_for(dir.path(), "vendas.csv");

        let run = run_report(&config).unwrap();

        assert_eq!(run.result.records_total, 0);
        assert!(run.result.top_product.is_none());
        assert!(config.out_path.exists());
        assert!(config.chart_path.exists());
    }

    #[test]
    fn missing_input_fails_in_the_load_stage() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path(), "nope.csv");

        let err = run_report(&config).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn reruns_overwrite_existing_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        write_input(
            dir.path(),
            "vendas.csv",
            "numvenda,datavenda,receita,estado,titulo,sku\n\
             1,2024-07-01,10.00,SP,Capa,CAP-001\n",
        );
        let config = config_for(dir.path(), "vendas.csv");

        run_report(&config).unwrap();
        let first = std::fs::read(&config.out_path).unwrap();
        run_report(&config).unwrap();
        let second = std::fs::read(&config.out_path).unwrap();

        assert!(first.starts_with(b"%PDF"));
        assert!(second.starts_with(b"%PDF"));
    }
}
