//! Merge command - email data cover page plus PDF attachments.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use console::style;

use labelcheck_core::{assemble_email_pdf, NOT_FOUND};

use super::{read_input, spinner};

const DEFAULT_OUTPUT: &str = "Care_BEL_mergePO.pdf";

/// Arguments for the merge command.
#[derive(Args)]
pub struct MergeArgs {
    /// Email file (.eml)
    #[arg(required = true)]
    eml: PathBuf,

    /// Output PDF
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
}

pub fn run(args: MergeArgs) -> anyhow::Result<()> {
    let raw = read_input(&args.eml)?;

    let pb = spinner("Processing email and merging attachments...")?;
    let assembled = assemble_email_pdf(&raw);
    pb.finish_and_clear();
    let assembled = assembled.context("Failed to create merged PDF")?;

    let output = with_pdf_extension(args.output);
    fs::write(&output, &assembled.pdf).with_context(|| format!("Failed to write {}", output.display()))?;

    for (label, value) in assembled.fields.entries() {
        println!("{}: {}", label, value.unwrap_or(NOT_FOUND));
    }
    for name in &assembled.skipped {
        println!("{} Skipped unreadable attachment {}", style("⚠").yellow(), name);
    }
    println!(
        "{} Merged PDF ({} pages, {} attachment(s)) written to {}",
        style("✓").green(),
        assembled.page_count,
        assembled.merged.len(),
        output.display()
    );

    Ok(())
}

fn with_pdf_extension(path: PathBuf) -> PathBuf {
    let has_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

    if has_pdf {
        path
    } else {
        let mut name = path.into_os_string();
        name.push(".pdf");
        PathBuf::from(name)
    }
}
