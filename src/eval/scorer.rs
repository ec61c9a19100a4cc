//! Record scoring: classify every schema field of a (prediction, gold) pair.
//!
//! The outcome taxonomy mirrors MUC-style counting: a correct match, a
//! stated-but-wrong value, a gold value the model missed, a value the model
//! invented, or a field neither side stated.

use serde::Serialize;

use crate::eval::matcher::matches;
use crate::eval::normalize::normalize;
use crate::record::Record;
use crate::schema::SCHEMA;

/// Classification of one field comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Outcome {
    /// Both sides stated the field and the values agree.
    Match,
    /// Both sides stated the field and the values disagree.
    Mismatch,
    /// Gold states the field, the prediction does not.
    MissingPredicted,
    /// The prediction states a field gold does not.
    SpuriousPredicted,
    /// Neither side states the field; excluded from all tallies.
    BothAbsent,
}

/// One field's outcome for a record pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldOutcome {
    /// Schema field name.
    pub field: &'static str,
    /// Classification for this pair.
    pub outcome: Outcome,
}

/// Score one prediction against one gold record.
///
/// Walks the schema in order, normalizes both sides, and classifies each
/// field. `predicted` is `None` when the model produced no record for the
/// gold identifier; every gold-stated field then scores
/// [`Outcome::MissingPredicted`].
///
/// Pure function of its inputs. Unknown keys never reach this point (the
/// record type drops them), and predicted records whose ids have no gold
/// counterpart are the caller's concern; see [`super::score_sets`].
#[must_use]
pub fn score_record(predicted: Option<&Record>, gold: &Record) -> Vec<FieldOutcome> {
    SCHEMA
        .iter()
        .map(|spec| {
            let gold_value = normalize(spec, gold.get(spec.name));
            let pred_value = normalize(spec, predicted.and_then(|r| r.get(spec.name)));
            let outcome = match (&gold_value, &pred_value) {
                (None, None) => Outcome::BothAbsent,
                (Some(_), None) => Outcome::MissingPredicted,
                (None, Some(_)) => Outcome::SpuriousPredicted,
                (Some(g), Some(p)) => {
                    if matches(spec, p, g) {
                        Outcome::Match
                    } else {
                        Outcome::Mismatch
                    }
                }
            };
            FieldOutcome {
                field: spec.name,
                outcome,
            }
        })
        .collect()
}
