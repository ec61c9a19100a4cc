//! CLI argument parsing and structure definitions.

use clap::{Parser, Subcommand, ValueEnum};

use super::commands::{RunArgs, ScoreArgs, ValidateArgs};

/// Clinical extraction benchmark - run models and score their extractions
#[derive(Parser)]
#[command(name = "medex")]
#[command(
    author,
    version,
    about = "Clinical extraction benchmark - run models and score their extractions",
    long_about = r#"
medex - benchmark instruction-tuned models on clinical-note extraction

PIPELINE:
  1. run      Send each note to a chat-completions endpoint, collect
              {"id", "pred"} JSONL predictions
  2. score    Compare predictions to gold labels: per-field P/R/F1,
              overall accuracy, macro-F1
  3. validate Check a JSONL record file line by line

SCHEMA:
  sex, age, systolic_bp, diastolic_bp, heart_rate, diagnosis,
  treatment, outcome. Blood pressure matches within ±5 mmHg; strings
  match case-insensitively after trimming.

EXAMPLES:
  medex run --model google/medgemma-4b-it --notes notes.jsonl --out preds.jsonl
  medex score --gold notes.jsonl --pred preds.jsonl
  medex score --gold notes.jsonl --pred preds.jsonl --format json
  medex validate preds.jsonl --kind pred
"#
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Selected subcommand.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Score predictions against gold labels
    #[command(visible_alias = "s")]
    Score(ScoreArgs),

    /// Run inference over a notes file, producing predictions
    #[command(visible_alias = "r")]
    Run(RunArgs),

    /// Validate a JSONL record file
    #[command(visible_alias = "v")]
    Validate(ValidateArgs),
}

/// Output format for the score report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table for terminals.
    Human,
    /// Machine-readable JSON.
    Json,
    /// Markdown table.
    Markdown,
}

/// Which payload key a record file uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FileKind {
    /// Gold labels (`"ground_truth"` payload or flat fields).
    Gold,
    /// Model predictions (`"pred"` payload or flat fields).
    Pred,
}
