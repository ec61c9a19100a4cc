//! Validate command: per-line diagnostics for a JSONL record file.

use std::fs::File;
use std::io::{BufRead, BufReader};

use clap::Parser;

use crate::cli::parser::FileKind;
use crate::jsonl::{parse_line, LineOutcome, SourceKind};
use crate::Result;

/// Validate a JSONL record file
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// File to validate
    #[arg(value_name = "PATH")]
    pub file: String,

    /// Which payload key to expect
    #[arg(long, default_value = "gold")]
    pub kind: FileKind,
}

/// Run the validate command. Returns `Ok(true)` when the file is clean.
pub fn run(args: &ValidateArgs) -> Result<bool> {
    let kind = match args.kind {
        FileKind::Gold => SourceKind::Gold,
        FileKind::Pred => SourceKind::Predictions,
    };

    let reader = BufReader::new(File::open(&args.file)?);
    let mut records = 0usize;
    let mut empty_records = 0usize;
    let mut problems = 0usize;
    let mut seen_ids = std::collections::HashSet::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        match parse_line(&line, kind) {
            LineOutcome::Blank => {}
            LineOutcome::Record(record) => {
                records += 1;
                if record.is_empty() {
                    empty_records += 1;
                }
                if !seen_ids.insert(record.id.clone()) {
                    problems += 1;
                    println!("{}:{}: duplicate id {:?}", args.file, number + 1, record.id);
                }
            }
            LineOutcome::Malformed(why) => {
                problems += 1;
                println!("{}:{}: malformed line: {}", args.file, number + 1, why);
            }
            LineOutcome::MissingId => {
                problems += 1;
                println!("{}:{}: missing \"id\" key", args.file, number + 1);
            }
        }
    }

    println!(
        "{}: {} record(s), {} with zero stated fields, {} problem(s)",
        args.file, records, empty_records, problems
    );
    Ok(problems == 0)
}
