//! Confusion tallies: accumulate field outcomes across record pairs.
//!
//! Counters only ever grow. A [`ConfusionTally`] is created empty for one
//! run, fed once per gold record, and read out through
//! [`ConfusionTally::finalize`]. Shards built on disjoint record subsets can
//! be combined with [`ConfusionTally::merge`], so parallel scoring needs no
//! shared writer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::eval::report::{FieldMetrics, MetricsReport};
use crate::eval::scorer::{FieldOutcome, Outcome};
use crate::schema::SCHEMA;

/// Per-field confusion counters.
///
/// A `Mismatch` increments both `false_pos` and `false_neg` (the predicted
/// value is wrong, and the gold value was not produced) but `comparable`
/// only once, so accuracy counts it as a single incorrect instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldTally {
    /// Correct matches.
    pub true_pos: usize,
    /// Wrong or invented predicted values.
    pub false_pos: usize,
    /// Gold values the prediction got wrong or left out.
    pub false_neg: usize,
    /// Non-BothAbsent instances, mismatches counted once.
    pub comparable: usize,
}

impl FieldTally {
    /// Apply one outcome.
    pub fn accumulate(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Match => {
                self.true_pos += 1;
                self.comparable += 1;
            }
            Outcome::Mismatch => {
                self.false_pos += 1;
                self.false_neg += 1;
                self.comparable += 1;
            }
            Outcome::MissingPredicted => {
                self.false_neg += 1;
                self.comparable += 1;
            }
            Outcome::SpuriousPredicted => {
                self.false_pos += 1;
                self.comparable += 1;
            }
            Outcome::BothAbsent => {}
        }
    }

    /// Add another tally's counters into this one.
    pub fn merge(&mut self, other: &FieldTally) {
        self.true_pos += other.true_pos;
        self.false_pos += other.false_pos;
        self.false_neg += other.false_neg;
        self.comparable += other.comparable;
    }

    /// Records where gold states this field (TP + FN).
    #[must_use]
    pub fn support(&self) -> usize {
        self.true_pos + self.false_neg
    }

    /// Precision = TP / (TP + FP); 0 when nothing was predicted.
    #[must_use]
    pub fn precision(&self) -> f64 {
        ratio(self.true_pos, self.true_pos + self.false_pos)
    }

    /// Recall = TP / (TP + FN); 0 when gold never states the field.
    #[must_use]
    pub fn recall(&self) -> f64 {
        ratio(self.true_pos, self.true_pos + self.false_neg)
    }

    /// F1 = harmonic mean of precision and recall; 0 if both are 0.
    #[must_use]
    pub fn f1(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            return 0.0;
        }
        2.0 * p * r / (p + r)
    }

    /// Fraction of gold-stated instances predicted correctly.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        ratio(self.true_pos, self.support())
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Confusion counters for all schema fields plus record-level bookkeeping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfusionTally {
    fields: HashMap<String, FieldTally>,
    /// Gold records scored (with or without a predicted counterpart).
    pub records_scored: usize,
    /// Gold records that had no predicted counterpart.
    pub records_without_prediction: usize,
    /// Predicted records whose id had no gold counterpart; ignored entirely.
    pub predictions_ignored: usize,
}

impl ConfusionTally {
    /// Create an empty tally.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate the outcomes of one scored gold record.
    pub fn accumulate(&mut self, outcomes: &[FieldOutcome]) {
        self.records_scored += 1;
        for field_outcome in outcomes {
            self.fields
                .entry(field_outcome.field.to_string())
                .or_default()
                .accumulate(field_outcome.outcome);
        }
    }

    /// Note a gold record with no predicted counterpart.
    pub fn note_missing_prediction(&mut self) {
        self.records_without_prediction += 1;
    }

    /// Note a predicted record ignored for lack of a gold counterpart.
    pub fn note_ignored_prediction(&mut self) {
        self.predictions_ignored += 1;
    }

    /// Combine another tally (e.g. a parallel shard) into this one.
    pub fn merge(&mut self, other: &ConfusionTally) {
        for (field, tally) in &other.fields {
            self.fields.entry(field.clone()).or_default().merge(tally);
        }
        self.records_scored += other.records_scored;
        self.records_without_prediction += other.records_without_prediction;
        self.predictions_ignored += other.predictions_ignored;
    }

    /// This field's counters, zero if never touched.
    #[must_use]
    pub fn field(&self, name: &str) -> FieldTally {
        self.fields.get(name).copied().unwrap_or_default()
    }

    /// Derive the final metrics. Pure read; the tally is not consumed and
    /// not changed.
    ///
    /// Overall accuracy is Σ TP / Σ comparable across fields. Macro-F1
    /// averages per-field F1 over the schema fields gold states at least
    /// once. An empty run yields all-zero metrics plus a warning rather
    /// than an error.
    #[must_use]
    pub fn finalize(&self) -> MetricsReport {
        let mut fields = Vec::with_capacity(SCHEMA.len());
        let mut correct = 0usize;
        let mut comparable = 0usize;
        let mut f1_sum = 0.0f64;
        let mut f1_fields = 0usize;

        for spec in SCHEMA {
            let tally = self.field(spec.name);
            correct += tally.true_pos;
            comparable += tally.comparable;
            if tally.support() > 0 {
                f1_sum += tally.f1();
                f1_fields += 1;
            }
            fields.push(FieldMetrics {
                field: spec.name.to_string(),
                precision: tally.precision(),
                recall: tally.recall(),
                f1: tally.f1(),
                accuracy: tally.accuracy(),
                true_pos: tally.true_pos,
                false_pos: tally.false_pos,
                false_neg: tally.false_neg,
                support: tally.support(),
                comparable: tally.comparable,
            });
        }

        let mut warnings = Vec::new();
        if self.records_scored == 0 {
            warnings.push("no records were scored; all metrics are 0".to_string());
        } else if comparable == 0 {
            warnings.push("no comparable field instances; all metrics are 0".to_string());
        }
        if self.records_without_prediction > 0 {
            warnings.push(format!(
                "{} gold record(s) had no predicted counterpart",
                self.records_without_prediction
            ));
        }

        MetricsReport {
            accuracy: ratio(correct, comparable),
            macro_f1: if f1_fields == 0 { 0.0 } else { f1_sum / f1_fields as f64 },
            correct_instances: correct,
            comparable_instances: comparable,
            fields,
            records_scored: self.records_scored,
            records_without_prediction: self.records_without_prediction,
            predictions_ignored: self.predictions_ignored,
            gold_load: Default::default(),
            pred_load: Default::default(),
            warnings,
        }
    }
}
