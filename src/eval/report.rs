//! The metrics report: a read-only view over a finalized tally.
//!
//! Renders as an aligned text table for terminals, a markdown table for
//! docs, or JSON (serde) for downstream sinks. Chart rendering is left to
//! external consumers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::LoadDiagnostics;

/// Metrics for a single schema field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMetrics {
    /// Schema field name.
    pub field: String,
    /// TP / (TP + FP), 0 on empty denominator.
    pub precision: f64,
    /// TP / (TP + FN), 0 on empty denominator.
    pub recall: f64,
    /// Harmonic mean of precision and recall.
    pub f1: f64,
    /// TP / gold support, the per-field breakdown the original report shows.
    pub accuracy: f64,
    /// Correct matches.
    pub true_pos: usize,
    /// Wrong or invented predictions.
    pub false_pos: usize,
    /// Missed or wrong gold values.
    pub false_neg: usize,
    /// Records where gold states this field.
    pub support: usize,
    /// Non-BothAbsent instances for this field.
    pub comparable: usize,
}

/// Aggregated benchmark metrics for one scoring run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Fraction of comparable field instances that are exact matches.
    pub accuracy: f64,
    /// Unweighted mean of per-field F1 over fields with gold support.
    pub macro_f1: f64,
    /// Matches across all fields (the accuracy numerator).
    pub correct_instances: usize,
    /// Non-BothAbsent instances across all fields (the denominator).
    pub comparable_instances: usize,
    /// Per-field breakdown in schema order.
    pub fields: Vec<FieldMetrics>,
    /// Gold records scored.
    pub records_scored: usize,
    /// Gold records with no predicted counterpart.
    pub records_without_prediction: usize,
    /// Predicted records ignored for lack of a gold counterpart.
    pub predictions_ignored: usize,
    /// Problems recovered while loading the gold file.
    pub gold_load: LoadDiagnostics,
    /// Problems recovered while loading the predictions file.
    pub pred_load: LoadDiagnostics,
    /// Human-readable caveats about this run.
    pub warnings: Vec<String>,
}

impl MetricsReport {
    /// Total lines skipped across both input files.
    #[must_use]
    pub fn skipped_lines(&self) -> usize {
        self.gold_load.dropped() + self.pred_load.dropped()
    }

    /// Attach loader diagnostics (and derived warnings) to the report.
    pub fn set_load_diagnostics(&mut self, gold: LoadDiagnostics, pred: LoadDiagnostics) {
        self.gold_load = gold;
        self.pred_load = pred;
        let skipped = self.skipped_lines();
        if skipped > 0 {
            self.warnings
                .push(format!("{} input line(s)/record(s) were skipped while loading", skipped));
        }
    }

    /// Aligned plain-text summary table.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{:<14} {:>6} {:>6} {:>6} {:>6} {:>5} {:>5} {:>5} {:>7}\n",
            "field", "prec", "rec", "f1", "acc", "tp", "fp", "fn", "support"
        ));
        for m in &self.fields {
            if m.comparable == 0 {
                continue;
            }
            out.push_str(&format!(
                "{:<14} {:>6.3} {:>6.3} {:>6.3} {:>6.3} {:>5} {:>5} {:>5} {:>7}\n",
                m.field,
                m.precision,
                m.recall,
                m.f1,
                m.accuracy,
                m.true_pos,
                m.false_pos,
                m.false_neg,
                m.support
            ));
        }
        out.push('\n');
        out.push_str(&format!(
            "accuracy  {:.3}  ({}/{} comparable instances)\n",
            self.accuracy, self.correct_instances, self.comparable_instances
        ));
        out.push_str(&format!("macro-F1  {:.3}\n", self.macro_f1));
        out.push_str(&format!(
            "records   {} scored, {} without prediction, {} predictions ignored\n",
            self.records_scored, self.records_without_prediction, self.predictions_ignored
        ));
        if self.skipped_lines() > 0 {
            out.push_str(&format!("skipped   {} input line(s)\n", self.skipped_lines()));
        }
        for warning in &self.warnings {
            out.push_str(&format!("warning: {}\n", warning));
        }
        out
    }

    /// Markdown table for docs and PR comments.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::from(
            "| Field | Precision | Recall | F1 | Accuracy | Support |\n\
             |-------|-----------|--------|----|----------|---------|\n",
        );
        for m in &self.fields {
            out.push_str(&format!(
                "| {} | {:.1}% | {:.1}% | {:.1}% | {:.1}% | {} |\n",
                m.field,
                m.precision * 100.0,
                m.recall * 100.0,
                m.f1 * 100.0,
                m.accuracy * 100.0,
                m.support
            ));
        }
        out.push_str(&format!(
            "\n**Accuracy**: {:.1}% · **Macro-F1**: {:.1}% · {} records scored\n",
            self.accuracy * 100.0,
            self.macro_f1 * 100.0,
            self.records_scored
        ));
        out
    }
}

impl fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::scorer::{FieldOutcome, Outcome};
    use crate::eval::tally::ConfusionTally;

    fn sample_report() -> MetricsReport {
        let mut tally = ConfusionTally::new();
        tally.accumulate(&[
            FieldOutcome {
                field: "sex",
                outcome: Outcome::Match,
            },
            FieldOutcome {
                field: "age",
                outcome: Outcome::Mismatch,
            },
        ]);
        tally.finalize()
    }

    #[test]
    fn test_summary_lists_touched_fields_only() {
        let summary = sample_report().summary();
        assert!(summary.contains("sex"));
        assert!(summary.contains("age"));
        assert!(!summary.contains("diastolic_bp"));
        assert!(summary.contains("macro-F1"));
    }

    #[test]
    fn test_markdown_has_all_schema_rows() {
        let markdown = sample_report().to_markdown();
        for field in ["sex", "age", "systolic_bp", "outcome"] {
            assert!(markdown.contains(&format!("| {} |", field)), "{}", field);
        }
    }

    #[test]
    fn test_json_round_trip() {
        let report = sample_report();
        let json = serde_json::to_string(&report).unwrap();
        let back: MetricsReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.records_scored, report.records_scored);
        assert!((back.accuracy - report.accuracy).abs() < 1e-12);
    }

    #[test]
    fn test_skip_warning_attached() {
        let mut report = sample_report();
        report.set_load_diagnostics(
            LoadDiagnostics {
                malformed_lines: 2,
                ..Default::default()
            },
            LoadDiagnostics::default(),
        );
        assert_eq!(report.skipped_lines(), 2);
        assert!(report.warnings.iter().any(|w| w.contains("skipped")));
    }
}
