//! Field normalization: canonicalize raw extracted values before comparison.
//!
//! Normalization is where "not stated" is decided. A missing key, a blank
//! string, an unparseable number, or a structurally wrong value (array,
//! object) all normalize to `None`; everything else becomes a tagged
//! [`NormValue`] the matcher can compare.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::schema::{FieldKind, FieldSpec};

/// A normalized field value.
///
/// `Option<NormValue>` is the scorer's currency: `None` means Absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NormValue {
    /// Normalized text (trimmed, lowercased, alias-canonicalized).
    Text(String),
    /// Parsed integer.
    Int(i64),
}

impl NormValue {
    /// Re-wrap as a raw JSON value. Normalization of the result is a
    /// fixed point, which the idempotence property tests rely on.
    #[must_use]
    pub fn to_raw(&self) -> Value {
        match self {
            NormValue::Text(s) => Value::String(s.clone()),
            NormValue::Int(i) => Value::from(*i),
        }
    }
}

impl std::fmt::Display for NormValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NormValue::Text(s) => write!(f, "{}", s),
            NormValue::Int(i) => write!(f, "{}", i),
        }
    }
}

/// A number, optionally followed by one unit token ("118 mmHg", "72bpm").
static NUMBER_WITH_UNIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([+-]?\d+(?:\.\d+)?)\s*(?:[a-zA-Z%/°]+\.?)?\s*$")
        .expect("number pattern is valid")
});

/// Normalize a raw value for a schema field.
///
/// - Text fields: trim and lowercase; categorical fields additionally map
///   through their alias table. Blank after trimming is Absent.
/// - Integer fields: accept JSON integers, floats (truncated toward zero,
///   matching `int(float(v))`), numeric strings, and numeric strings with a
///   unit suffix. Anything unparseable is Absent, logged as a formatting
///   defect, never an error.
/// - A missing key (`raw == None`) or JSON null is Absent.
///
/// Pure: no side effects beyond debug logging, and idempotent on its own
/// output (`normalize(f, norm.to_raw()) == norm`).
#[must_use]
pub fn normalize(spec: &FieldSpec, raw: Option<&Value>) -> Option<NormValue> {
    let raw = raw?;
    match spec.kind {
        FieldKind::Integer { .. } => normalize_integer(spec, raw),
        FieldKind::Text | FieldKind::Categorical { .. } => normalize_text(spec, raw),
    }
}

fn normalize_integer(spec: &FieldSpec, raw: &Value) -> Option<NormValue> {
    let parsed = match raw {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else {
                n.as_f64().and_then(truncate_f64)
            }
        }
        Value::String(s) => parse_int_str(s),
        _ => None,
    };
    if parsed.is_none() && !raw.is_null() {
        log::debug!("field {}: cannot parse {} as integer", spec.name, raw);
    }
    parsed.map(NormValue::Int)
}

fn normalize_text(spec: &FieldSpec, raw: &Value) -> Option<NormValue> {
    let lowered = match raw {
        Value::String(s) => s.trim().to_lowercase(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if lowered.is_empty() {
        return None;
    }
    let canon = match spec.canonical(&lowered) {
        Some(canon) => canon.to_string(),
        None => lowered,
    };
    Some(NormValue::Text(canon))
}

/// Parse an integer out of a string, tolerating a decimal part and one
/// trailing unit token.
fn parse_int_str(s: &str) -> Option<i64> {
    let captures = NUMBER_WITH_UNIT.captures(s)?;
    let number = &captures[1];
    if let Ok(i) = number.parse::<i64>() {
        return Some(i);
    }
    number.parse::<f64>().ok().and_then(truncate_f64)
}

fn truncate_f64(f: f64) -> Option<i64> {
    if f.is_finite() && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f.trunc() as i64)
    } else {
        None
    }
}
