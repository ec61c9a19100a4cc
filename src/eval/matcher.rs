//! Field matching: does a normalized prediction agree with gold?
//!
//! Absence handling lives in the record scorer, not here; both sides of a
//! match candidate are always present.

use crate::eval::normalize::NormValue;
use crate::schema::{FieldKind, FieldSpec};

/// Decide whether two normalized values match under a field's rules.
///
/// Text and categorical fields compare for exact equality. Integer fields
/// compare exactly, or within the field's tolerance when it carries one
/// (blood pressure: ±5). Pure and deterministic; symmetric in its two value
/// arguments.
#[must_use]
pub fn matches(spec: &FieldSpec, predicted: &NormValue, gold: &NormValue) -> bool {
    match (&spec.kind, predicted, gold) {
        (FieldKind::Integer { tolerance }, NormValue::Int(p), NormValue::Int(g)) => {
            match tolerance {
                // abs_diff never overflows, however far apart the values.
                Some(tol) => p.abs_diff(*g) <= tol.unsigned_abs(),
                None => p == g,
            }
        }
        (FieldKind::Text | FieldKind::Categorical { .. }, p, g) => p == g,
        // A kind/value disagreement can only come from hand-built values;
        // the normalizer never produces one. Count it as a non-match.
        _ => false,
    }
}
