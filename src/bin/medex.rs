//! medex - clinical extraction benchmark CLI.
//!
//! ```bash
//! medex run --model google/medgemma-4b-it --notes notes.jsonl --out preds.jsonl
//! medex score --gold notes.jsonl --pred preds.jsonl
//! medex validate preds.jsonl --kind pred
//! ```

use std::process::ExitCode;

use clap::Parser;

use medex::cli::{dispatch, parser::Cli};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    dispatch(&cli)
}
