//! Score command: compare a predictions file against a gold file.

use clap::Parser;

use crate::cli::parser::OutputFormat;
use crate::eval::{score_sets, score_sets_sharded};
use crate::jsonl::{load_records, SourceKind};
use crate::Result;

/// Score predictions against gold labels
#[derive(Parser, Debug)]
pub struct ScoreArgs {
    /// Gold labels (JSONL, `ground_truth` payload or flat fields)
    #[arg(short, long, value_name = "PATH")]
    pub gold: String,

    /// Model predictions (JSONL, `pred` payload or flat fields)
    #[arg(short, long, value_name = "PATH")]
    pub pred: String,

    /// Output format
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,

    /// Score across N worker threads (record pairs are independent)
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,
}

/// Run the score command, printing the report to stdout.
pub fn run(args: &ScoreArgs) -> Result<()> {
    let gold = load_records(&args.gold, SourceKind::Gold)?;
    let predictions = load_records(&args.pred, SourceKind::Predictions)?;

    let report = match args.threads {
        Some(threads) if threads > 1 => score_sets_sharded(&gold, &predictions, threads),
        _ => score_sets(&gold, &predictions),
    };

    match args.format {
        OutputFormat::Human => print!("{}", report.summary()),
        OutputFormat::Markdown => print!("{}", report.to_markdown()),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).map_err(|err| crate::Error::parse(err.to_string()))?
        ),
    }
    Ok(())
}
