//! Compare command - score a work order against a purchase order.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use console::style;
use tracing::{debug, info};

use labelcheck_core::{compare_documents, shared_embedder, ComparisonReport, MatchBand};

use super::{load_config, read_input, spinner};

/// Arguments for the compare command.
#[derive(Args)]
pub struct CompareArgs {
    /// Work order PDF
    #[arg(required = true)]
    wo: PathBuf,

    /// Purchase order PDF
    #[arg(required = true)]
    po: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: ReportFormat,

    /// Output file (CSV defaults to a timestamped file, others to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Render the PO VSD#/VSS# field against the WO codes
    #[arg(long)]
    conditional_vsd: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ReportFormat {
    /// JSON report with summary and extraction details
    Json,
    /// CSV table of field rows
    Csv,
    /// Plain text table
    Table,
}

pub fn run(args: CompareArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if args.conditional_vsd {
        config.comparison.conditional_vsd = true;
    }

    let wo_pdf = read_input(&args.wo)?;
    let po_pdf = read_input(&args.po)?;
    info!("Comparing {} against {}", args.wo.display(), args.po.display());

    let pb = spinner("Loading embedding model...")?;
    let embedder = shared_embedder(&config.models).context("Comparison needs a sentence-embedding model")?;

    pb.set_message("Extracting and comparing fields...");
    let report = compare_documents(&wo_pdf, &po_pdf, &config, embedder);
    pb.finish_and_clear();

    let output_path = match (&args.output, args.format) {
        (Some(path), _) => Some(path.clone()),
        (None, ReportFormat::Csv) => Some(PathBuf::from(default_csv_name())),
        (None, _) => None,
    };

    let rendered = match args.format {
        ReportFormat::Json => serde_json::to_string_pretty(&report)?,
        ReportFormat::Csv => format_csv(&report)?,
        ReportFormat::Table => format_table(&report),
    };

    if let Some(path) = output_path {
        fs::write(&path, &rendered).with_context(|| format!("Failed to write {}", path.display()))?;
        println!("{} Report written to {}", style("✓").green(), path.display());
    } else {
        println!("{}", rendered);
    }

    print_summary(&report);
    debug!("Total comparison time: {:?}", start.elapsed());

    Ok(())
}

/// `po_wo_comparison_results_<YYYYmmdd_HHMMSS>.csv`
fn default_csv_name() -> String {
    format!(
        "po_wo_comparison_results_{}.csv",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    )
}

pub(crate) fn format_csv(report: &ComparisonReport) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(ComparisonReport::CSV_HEADER)?;
    for record in report.records() {
        wtr.write_record(&record)?;
    }
    Ok(String::from_utf8(wtr.into_inner()?)?)
}

pub(crate) fn format_table(report: &ComparisonReport) -> String {
    let header = ComparisonReport::CSV_HEADER.map(str::to_string);
    let records: Vec<[String; 5]> = report.records().collect();

    let mut widths = header.clone().map(|h| h.chars().count());
    for record in &records {
        for (width, cell) in widths.iter_mut().zip(record) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |cells: &[String; 5]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut output = String::new();
    output.push_str(&render(&header));
    output.push('\n');
    output.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    output.push('\n');
    for record in &records {
        output.push_str(&render(record));
        output.push('\n');
    }
    output
}

fn print_summary(report: &ComparisonReport) {
    let summary = &report.summary;
    let line = format!(
        "{}/{} fields matched ({:.1}%)",
        summary.matched_fields, summary.total_fields, summary.match_percentage
    );
    let styled = match summary.band {
        MatchBand::Excellent => style(line).green(),
        MatchBand::Good => style(line).yellow(),
        MatchBand::Poor => style(line).red(),
    };

    eprintln!();
    eprintln!("{} {} - {} overall", style("ℹ").blue(), styled, summary.band);
    eprintln!(
        "{} WO: {} ({} pages), PO: {} ({} pages, {} line items)",
        style("ℹ").blue(),
        report.wo_extraction.method.label(),
        report.wo_extraction.page_count,
        report.po_extraction.method.label(),
        report.po_extraction.page_count,
        report.po_items.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use labelcheck_core::comparison::ComparisonSummary;
    use labelcheck_core::models::ExtractionInfo;
    use labelcheck_core::{ComparisonRow, FieldName, FieldSet, Verdict};

    fn report() -> ComparisonReport {
        let rows = vec![ComparisonRow {
            field: FieldName::FactoryId,
            wo_value: "36013779".to_string(),
            po_value: "36013779".to_string(),
            score: 100.0,
            verdict: Verdict::ExcellentMatch,
        }];
        ComparisonReport {
            summary: ComparisonSummary::from_rows(&rows),
            rows,
            wo_fields: FieldSet::new(),
            po_fields: FieldSet::new(),
            po_items: Vec::new(),
            wo_extraction: ExtractionInfo::default(),
            po_extraction: ExtractionInfo::default(),
        }
    }

    #[test]
    fn test_csv_has_header_and_rows() {
        let csv = format_csv(&report()).unwrap();
        assert_eq!(
            csv,
            "Field,WO Value,PO Value,Score,Verdict\nFactory ID,36013779,36013779,100.0%,Excellent Match\n"
        );
    }

    #[test]
    fn test_table_aligns_columns() {
        let table = format_table(&report());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Field      | WO Value"));
        assert!(lines[2].starts_with("Factory ID | 36013779"));
    }

    #[test]
    fn test_default_csv_name() {
        let name = default_csv_name();
        assert!(name.starts_with("po_wo_comparison_results_"));
        assert!(name.ends_with(".csv"));
        assert_eq!(name.len(), "po_wo_comparison_results_20250101_120000.csv".len());
    }
}
