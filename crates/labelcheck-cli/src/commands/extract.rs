//! Extract command - print the label fields of a single document.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use serde_json::json;
use tracing::info;

use labelcheck_core::fields::FieldSetExtractor;
use labelcheck_core::models::ExtractionQuality;
use labelcheck_core::{
    parse_line_items, ExtractionChain, ExtractionResult, FieldSet, PoLineItem,
    PurchaseOrderExtractor, WorkOrderExtractor,
};

use super::{load_config, read_input};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Document kind
    #[arg(short, long, value_enum, default_value = "wo")]
    kind: KindArg,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: FieldsFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also print the extracted raw text
    #[arg(long)]
    show_text: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum KindArg {
    /// Work order
    Wo,
    /// Purchase order
    Po,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum FieldsFormat {
    /// JSON object with fields, line items and extraction info
    Json,
    /// One `Field: value` line per field
    Text,
}

pub fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let data = read_input(&args.input)?;

    let extraction = ExtractionChain::new(&config.extraction).extract_text(&data);
    if extraction.info.quality == ExtractionQuality::Failed {
        eprintln!(
            "{} Text extraction failed for {}; every field will be reported as not found",
            style("⚠").yellow(),
            args.input.display()
        );
    }

    let (fields, items) = match args.kind {
        KindArg::Wo => (WorkOrderExtractor.extract(&extraction.raw_text), Vec::new()),
        KindArg::Po => {
            let items = parse_line_items(&extraction.raw_text);
            let fields = PurchaseOrderExtractor::new(&items).extract(&extraction.raw_text);
            (fields, items)
        }
    };
    info!("Extracted {} of 11 fields", fields.found_count());

    let rendered = match args.format {
        FieldsFormat::Json => format_json(&extraction, &fields, &items, args.show_text)?,
        FieldsFormat::Text => format_text(&extraction, &fields, &items, args.show_text),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &rendered)?;
        println!("{} Output written to {}", style("✓").green(), output_path.display());
    } else {
        println!("{}", rendered);
    }

    Ok(())
}

fn format_json(
    extraction: &ExtractionResult,
    fields: &FieldSet,
    items: &[PoLineItem],
    show_text: bool,
) -> anyhow::Result<String> {
    let mut value = json!({
        "extraction": extraction.info,
        "fields": fields,
        "items": items,
    });
    if show_text {
        value["raw_text"] = json!(extraction.raw_text);
    }
    Ok(serde_json::to_string_pretty(&value)?)
}

fn format_text(
    extraction: &ExtractionResult,
    fields: &FieldSet,
    items: &[PoLineItem],
    show_text: bool,
) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Extraction: {} ({} quality, {} pages, {} tables)\n\n",
        extraction.info.method.label(),
        extraction.info.quality,
        extraction.info.page_count,
        extraction.info.tables_found
    ));

    for (field, _) in fields.iter() {
        output.push_str(&format!("{}: {}\n", field, fields.display_value(field)));
    }

    if !items.is_empty() {
        output.push_str("\nLine items:\n");
        for item in items {
            output.push_str(&format!(
                "  {} {} size={} colour={} qty={}\n",
                item.item_number, item.item_code, item.size, item.colour_code, item.quantity
            ));
        }
    }

    if show_text {
        output.push_str("\nRaw text:\n");
        output.push_str(&extraction.raw_text);
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use labelcheck_core::models::ExtractionInfo;
    use labelcheck_core::FieldName;

    fn failed() -> ExtractionResult {
        ExtractionResult {
            raw_text: String::new(),
            info: ExtractionInfo::default(),
        }
    }

    #[test]
    fn test_text_lists_every_field() {
        let fields = FieldSet::new().with(FieldName::FactoryId, "36013779");
        let text = format_text(&failed(), &fields, &[], false);

        assert!(text.starts_with("Extraction: failed (failed quality, 0 pages, 0 tables)"));
        assert!(text.contains("Factory ID: 36013779\n"));
        assert!(text.contains("Silhouette: Not found\n"));
        assert_eq!(text.matches(": ").count(), 12);
    }

    #[test]
    fn test_json_shape() {
        let json = format_json(&failed(), &FieldSet::new(), &[], true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["fields"]["VSD#"], "Not found");
        assert_eq!(value["extraction"]["quality"], "failed");
        assert_eq!(value["items"], json!([]));
        assert_eq!(value["raw_text"], "");
    }
}
