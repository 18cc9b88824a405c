//! CLI for checking care-label work orders against purchase orders.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{compare, config, extract, merge};

/// Care-label verification - compare WO and PO documents field by field
#[derive(Parser)]
#[command(name = "labelcheck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a work order PDF against a purchase order PDF
    Compare(compare::CompareArgs),

    /// Extract the label fields from a single PDF
    Extract(extract::ExtractArgs),

    /// Build one PDF from an email's data and its PDF attachments
    Merge(merge::MergeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Compare(args) => compare::run(args, cli.config.as_deref()),
        Commands::Extract(args) => extract::run(args, cli.config.as_deref()),
        Commands::Merge(args) => merge::run(args),
        Commands::Config(args) => config::run(args, cli.config.as_deref()),
    }
}
