//! Run command: batched inference over a notes file.

use std::fs::File;
use std::io::BufWriter;
use std::time::{Duration, Instant};

use clap::Parser;

use crate::infer::{load_notes, run_inference, OpenAiCompatClient, PromptTemplate};
use crate::{Error, Result};

/// Run inference over a notes file, producing predictions
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Model name passed to the endpoint
    #[arg(short, long)]
    pub model: String,

    /// Notes file (JSONL with "id" and "note" keys)
    #[arg(short, long, value_name = "PATH", default_value = "synthetic_notes.jsonl")]
    pub notes: String,

    /// Output predictions file (JSONL with "id" and "pred" keys)
    #[arg(short, long, value_name = "PATH")]
    pub out: String,

    /// Prompt template file containing {{NOTE_TEXT}}; built-in if omitted
    #[arg(long, value_name = "PATH")]
    pub prompt_template: Option<String>,

    /// API base URL (env: VLLM_ENDPOINT, OPENAI_API_BASE)
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// API key (env: OPENAI_API_KEY)
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Only process the first N notes (0 = all)
    #[arg(long, default_value_t = 0, value_name = "N")]
    pub limit: usize,

    /// Concurrent requests per batch
    #[arg(long, default_value_t = 50, value_name = "N")]
    pub batch_size: usize,

    /// Completion token budget
    #[arg(long, default_value_t = 64, value_name = "N")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[arg(long, default_value_t = 0.0)]
    pub temperature: f64,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 120, value_name = "SECS")]
    pub timeout: u64,
}

/// Run the inference command.
pub fn run(args: &RunArgs) -> Result<()> {
    let endpoint = args
        .endpoint
        .clone()
        .or_else(|| std::env::var("VLLM_ENDPOINT").ok())
        .or_else(|| std::env::var("OPENAI_API_BASE").ok())
        .unwrap_or_else(|| "http://127.0.0.1:8000/v1".to_string());
    let api_key = args
        .api_key
        .clone()
        .or_else(|| std::env::var("OPENAI_API_KEY").ok())
        .unwrap_or_else(|| "dummy".to_string());

    let limit = if args.limit == 0 { None } else { Some(args.limit) };
    let notes = load_notes(&args.notes, limit)?;
    if notes.is_empty() {
        return Err(Error::parse(format!("no notes to process in {}", args.notes)));
    }

    let template = match &args.prompt_template {
        Some(path) => PromptTemplate::from_file(path)?,
        None => PromptTemplate::builtin(),
    };

    let client =
        OpenAiCompatClient::with_timeout(endpoint, api_key, &args.model, Duration::from_secs(args.timeout))?
            .max_tokens(args.max_tokens)
            .temperature(args.temperature);

    let mut out = BufWriter::new(File::create(&args.out)?);
    let started = Instant::now();
    let stats = run_inference(&client, &template, &notes, args.batch_size, &mut out)?;

    log::info!(
        "{} notes in {:.2}s ({} parsed, {} retried, {} failed)",
        stats.total,
        started.elapsed().as_secs_f64(),
        stats.parsed,
        stats.retried,
        stats.failed
    );
    println!(
        "done: {} notes, {} parsed, {} failed -> {}",
        stats.total, stats.parsed, stats.failed, args.out
    );
    Ok(())
}
