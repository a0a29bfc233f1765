use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::Parser;
use log::info;
use tallyman::{cli, processor, summary::Summary, transaction::TransactionParser};

/// Summarizes a statement of dated, signed transactions.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Statement to read, with an `Id,Date,Transaction` header.
    #[clap(default_value = "transactions.csv")]
    input: PathBuf,

    /// Account the summary is attached to.
    #[clap(long, env = "ACCOUNT_ID", default_value = "default")]
    account_id: String,

    /// Year given to the statement's dates. Defaults to the current year.
    #[clap(long, env = "REFERENCE_YEAR")]
    year: Option<i32>,

    /// Pretty-print the JSON summary.
    #[clap(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let year = args.year.unwrap_or_else(|| chrono::Local::now().year());

    let file = File::open(&args.input)
        .with_context(|| format!("unable to open {}", args.input.display()))?;
    let rows = cli::read_transactions(file).context("unable to read transactions")?;

    info!(
        "processing {} rows from {} for account {} (year {})",
        rows.len(),
        args.input.display(),
        args.account_id,
        year
    );

    let account = processor::ingest(&TransactionParser::new(year), rows)
        .context("unable to process transactions")?;
    let output = cli::Output::new(args.account_id, Summary::project(&account));

    let stdout = std::io::stdout();
    let written = if args.pretty {
        serde_json::to_writer_pretty(stdout.lock(), &output)
    } else {
        serde_json::to_writer(stdout.lock(), &output)
    };
    written.context("unable to serialize summary")?;
    println!();

    Ok(())
}
