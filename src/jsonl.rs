//! Line-delimited JSON record loading.
//!
//! One JSON object per line. Every object must carry the identifier key;
//! schema fields live either flat on the object or nested under a payload
//! key (`"ground_truth"` for gold files, `"pred"` for prediction files, the
//! format the benchmark's data files use).
//!
//! Loading degrades gracefully: a malformed line or a record without an
//! identifier is logged, counted in [`LoadDiagnostics`], and skipped. Only
//! an unreadable file is a structural failure.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde_json::Value;

use crate::record::{LoadDiagnostics, Record, RecordSet};
use crate::schema::ID_KEY;
use crate::Result;

/// Which side of the benchmark a record file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Ground-truth labels; nested payload key `"ground_truth"`.
    Gold,
    /// Model outputs; nested payload key `"pred"`.
    Predictions,
}

impl SourceKind {
    /// Payload key for the nested line form.
    #[must_use]
    pub fn payload_key(self) -> &'static str {
        match self {
            SourceKind::Gold => "ground_truth",
            SourceKind::Predictions => "pred",
        }
    }
}

/// Result of parsing a single line.
#[derive(Debug)]
pub enum LineOutcome {
    /// Blank line; skipped without comment.
    Blank,
    /// A usable record.
    Record(Record),
    /// Not a JSON object; the message says why.
    Malformed(String),
    /// A JSON object without a usable identifier.
    MissingId,
}

/// Parse one line into a record.
///
/// Identifiers may be JSON strings or numbers; numbers are stringified so
/// `1` and `"1"` name the same record. If the payload key is present but is
/// not an object, the record counts as stating zero fields (a full miss
/// downstream), not as malformed.
#[must_use]
pub fn parse_line(line: &str, kind: SourceKind) -> LineOutcome {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineOutcome::Blank;
    }

    let value: Value = match serde_json::from_str(trimmed) {
        Ok(value) => value,
        Err(err) => return LineOutcome::Malformed(err.to_string()),
    };
    let object = match value.as_object() {
        Some(object) => object,
        None => return LineOutcome::Malformed("line is not a JSON object".to_string()),
    };

    let id = match object.get(ID_KEY) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return LineOutcome::MissingId,
    };

    let record = match object.get(kind.payload_key()) {
        Some(Value::Object(payload)) => Record::from_object(id, payload),
        Some(_) => Record::new(id),
        None => Record::from_object(id, object),
    };
    LineOutcome::Record(record)
}

/// Load a record set from a JSONL file.
///
/// # Errors
///
/// Fails only when the file itself cannot be read. Per-line problems are
/// recovered from and reported through the set's [`LoadDiagnostics`].
pub fn load_records(path: impl AsRef<Path>, kind: SourceKind) -> Result<RecordSet> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let mut set = RecordSet::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        match parse_line(&line, kind) {
            LineOutcome::Blank => {}
            LineOutcome::Record(record) => {
                set.insert(record);
            }
            LineOutcome::Malformed(why) => {
                log::warn!("{}:{}: skipping malformed line: {}", path.display(), number + 1, why);
                set.diagnostics.malformed_lines += 1;
            }
            LineOutcome::MissingId => {
                log::warn!(
                    "{}:{}: skipping record without {:?} key",
                    path.display(),
                    number + 1,
                    ID_KEY
                );
                set.diagnostics.missing_id += 1;
            }
        }
    }

    log_summary(path, &set, kind);
    Ok(set)
}

fn log_summary(path: &Path, set: &RecordSet, kind: SourceKind) {
    let LoadDiagnostics {
        malformed_lines,
        missing_id,
        duplicate_ids,
    } = set.diagnostics;
    log::info!(
        "loaded {} {} records from {} ({} malformed, {} missing id, {} duplicate)",
        set.len(),
        match kind {
            SourceKind::Gold => "gold",
            SourceKind::Predictions => "predicted",
        },
        path.display(),
        malformed_lines,
        missing_id,
        duplicate_ids
    );
}
