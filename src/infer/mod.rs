//! Inference glue: prompt templating and a batched benchmark runner.
//!
//! The scoring core treats the model as an external collaborator behind the
//! [`CompletionClient`] trait: prompt in, raw text out. The runner turns a
//! notes file into a predictions file, one `{"id": ..., "pred": {...}}` line
//! per note. A completion that fails or yields no recoverable JSON becomes
//! an empty prediction (a full miss when scored), never a run failure.

pub mod json_extract;
pub mod openai;

pub use json_extract::extract_json;
pub use openai::OpenAiCompatClient;

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use serde_json::Value;

use crate::schema::ID_KEY;
use crate::{Error, Result};

/// Placeholder the prompt template must contain; replaced by the note text.
pub const NOTE_PLACEHOLDER: &str = "{{NOTE_TEXT}}";

/// Built-in template used when no template file is supplied.
const DEFAULT_TEMPLATE: &str = "\
Extract the following fields from the clinical note below and return ONLY a \
compact JSON object with these keys (omit a key when the note does not state \
it): sex, age, systolic_bp, diastolic_bp, heart_rate, diagnosis, treatment, \
outcome.

Note:
{{NOTE_TEXT}}
";

/// Suffix appended for the single strict retry after unparseable output.
const STRICT_RETRY_SUFFIX: &str =
    "\n\nReturn ONLY a valid JSON object with the required keys. No prose.";

/// A model client: prompt in, raw completion text out.
///
/// Implementations own their transport, timeouts, and credentials. `Sync`
/// because the runner issues batched requests from worker threads.
pub trait CompletionClient: Sync {
    /// Request one completion for `prompt`.
    fn complete(&self, prompt: &str) -> Result<String>;
}

/// A prompt template with a `{{NOTE_TEXT}}` placeholder.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    /// Build from template text.
    ///
    /// # Errors
    ///
    /// Fails when the placeholder is missing, since every rendered prompt
    /// would then be identical.
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if !text.contains(NOTE_PLACEHOLDER) {
            return Err(Error::template(format!(
                "template does not contain {}",
                NOTE_PLACEHOLDER
            )));
        }
        Ok(Self { text })
    }

    /// Load a template from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(std::fs::read_to_string(path)?)
    }

    /// The built-in extraction template.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            text: DEFAULT_TEMPLATE.to_string(),
        }
    }

    /// Render the template for one note.
    #[must_use]
    pub fn render(&self, note_text: &str) -> String {
        self.text.replace(NOTE_PLACEHOLDER, note_text)
    }
}

/// One input narrative.
#[derive(Debug, Clone)]
pub struct Note {
    /// Record identifier, shared with the gold file.
    pub id: String,
    /// Free-text clinical narrative.
    pub text: String,
}

/// Load notes from a JSONL file (`{"id": ..., "note": "..."}` per line).
///
/// Malformed lines and lines without an id or note are skipped with a
/// warning, matching the record loaders' recovery policy.
pub fn load_notes(path: impl AsRef<Path>, limit: Option<usize>) -> Result<Vec<Note>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let mut notes = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        if let Some(limit) = limit {
            if notes.len() >= limit {
                break;
            }
        }
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = match serde_json::from_str(&line) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("{}:{}: skipping malformed note line: {}", path.display(), number + 1, err);
                continue;
            }
        };
        let id = match value.get(ID_KEY) {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => {
                log::warn!("{}:{}: skipping note without id", path.display(), number + 1);
                continue;
            }
        };
        let text = match value.get("note").and_then(Value::as_str) {
            Some(text) => text.to_string(),
            None => {
                log::warn!("{}:{}: skipping note without text", path.display(), number + 1);
                continue;
            }
        };
        notes.push(Note { id, text });
    }
    Ok(notes)
}

/// Outcome counts of one inference run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Notes processed.
    pub total: usize,
    /// Completions that yielded a JSON object (possibly after the retry).
    pub parsed: usize,
    /// Completions that needed the strict retry to parse.
    pub retried: usize,
    /// Requests that failed or never yielded JSON; written as empty preds.
    pub failed: usize,
}

/// Obtain one prediction: complete, extract, and retry once strictly.
pub fn predict_one(
    client: &dyn CompletionClient,
    template: &PromptTemplate,
    note: &Note,
) -> (serde_json::Map<String, Value>, bool) {
    let prompt = template.render(&note.text);
    match client.complete(&prompt) {
        Ok(text) => {
            if let Some(pred) = extract_json(&text) {
                return (pred, false);
            }
        }
        Err(err) => {
            log::warn!("id={}: completion failed: {}", note.id, err);
            return (serde_json::Map::new(), false);
        }
    }

    // One strict retry, per the benchmark protocol.
    let retry_prompt = format!("{}{}", prompt, STRICT_RETRY_SUFFIX);
    match client.complete(&retry_prompt) {
        Ok(text) => match extract_json(&text) {
            Some(pred) => (pred, true),
            None => {
                log::warn!("id={}: completion not parseable as JSON after retry", note.id);
                (serde_json::Map::new(), true)
            }
        },
        Err(err) => {
            log::warn!("id={}: retry failed: {}", note.id, err);
            (serde_json::Map::new(), true)
        }
    }
}

/// Run inference over all notes, writing one prediction line per note.
///
/// Requests are issued in batches of `batch_size` concurrent worker threads;
/// output preserves note order within and across batches. Per-note failures
/// degrade to empty predictions.
pub fn run_inference(
    client: &dyn CompletionClient,
    template: &PromptTemplate,
    notes: &[Note],
    batch_size: usize,
    out: &mut dyn Write,
) -> Result<RunStats> {
    let batch_size = batch_size.max(1);
    let mut stats = RunStats::default();

    for batch in notes.chunks(batch_size) {
        let results: Vec<(serde_json::Map<String, Value>, bool)> = std::thread::scope(|scope| {
            let handles: Vec<_> = batch
                .iter()
                .map(|note| scope.spawn(move || predict_one(client, template, note)))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("inference worker panicked"))
                .collect()
        });

        for (note, (pred, retried)) in batch.iter().zip(results) {
            stats.total += 1;
            if retried {
                stats.retried += 1;
            }
            if pred.is_empty() {
                stats.failed += 1;
            } else {
                stats.parsed += 1;
            }
            let line = serde_json::json!({ "id": note.id, "pred": Value::Object(pred) });
            writeln!(out, "{}", line)?;
        }
        log::info!("processed {}/{}", stats.total, notes.len());
    }
    Ok(stats)
}
