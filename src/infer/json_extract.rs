//! Recover a JSON object from a raw model completion.
//!
//! Instruction-tuned models wrap JSON in code fences, add prose around it,
//! leave trailing commas, or emit stray control characters. Recovery here is
//! best effort: anything unrecoverable becomes `None`, which the caller
//! treats as a prediction with zero stated fields.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^```(?:json)?\s*|\s*```$").expect("fence pattern is valid"));
static TRAILING_COMMA_OBJ: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*\}").expect("comma pattern is valid"));
static TRAILING_COMMA_ARR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*\]").expect("comma pattern is valid"));
static CONTROL_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x00-\x1f\x7f-\x9f]").expect("control pattern is valid"));

/// Extract the outermost JSON object from `text`.
///
/// Strips code fences, slices from the first `{` to the last `}`, repairs
/// trailing commas, and retries once with control characters replaced by
/// spaces. Returns `None` when no object can be recovered.
#[must_use]
pub fn extract_json(text: &str) -> Option<serde_json::Map<String, Value>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let unfenced = CODE_FENCE.replace_all(trimmed, "");

    let start = unfenced.find('{')?;
    let end = unfenced.rfind('}')?;
    if end <= start {
        return None;
    }
    let candidate = &unfenced[start..=end];
    let candidate = TRAILING_COMMA_OBJ.replace_all(candidate, "}");
    let candidate = TRAILING_COMMA_ARR.replace_all(&candidate, "]");

    if let Some(object) = parse_object(&candidate) {
        return Some(object);
    }
    let scrubbed = CONTROL_CHARS.replace_all(&candidate, " ");
    parse_object(&scrubbed)
}

fn parse_object(candidate: &str) -> Option<serde_json::Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}
