//! End-to-end pipeline tests: gold file + predictions file in, report out.

use std::io::Write;

use medex::eval::score_sets;
use medex::jsonl::{load_records, SourceKind};
use tempfile::NamedTempFile;

fn write_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn test_full_scoring_run() {
    let gold = write_file(&[
        r#"{"id":"1","ground_truth":{"sex":"Female","age":54,"systolic_bp":118,"diastolic_bp":76}}"#,
        r#"{"id":"2","ground_truth":{"diagnosis":"hypertension","treatment":"lisinopril"}}"#,
        r#"{"id":"3","ground_truth":{"systolic_bp":120,"heart_rate":88}}"#,
    ]);
    let pred = write_file(&[
        // id 1: all four correct (sex case-insensitive, systolic within ±5).
        r#"{"id":"1","pred":{"sex":"female","age":54,"systolic_bp":121,"diastolic_bp":76}}"#,
        // id 2: diagnosis right, treatment missing.
        r#"{"id":"2","pred":{"diagnosis":"Hypertension"}}"#,
        // id 3: systolic out of tolerance, heart rate right with units.
        r#"{"id":"3","pred":{"systolic_bp":130,"heart_rate":"88 bpm"}}"#,
        // id 99: not in gold, ignored.
        r#"{"id":"99","pred":{"age":40}}"#,
    ]);

    let gold = load_records(gold.path(), SourceKind::Gold).unwrap();
    let pred = load_records(pred.path(), SourceKind::Predictions).unwrap();
    let report = score_sets(&gold, &pred);

    assert_eq!(report.records_scored, 3);
    assert_eq!(report.predictions_ignored, 1);
    // 8 comparable instances: 4 matches (id 1) + match/miss (id 2) +
    // mismatch/match (id 3).
    assert_eq!(report.comparable_instances, 8);
    assert_eq!(report.correct_instances, 6);
    assert!((report.accuracy - 0.75).abs() < 1e-12);

    let treatment = report.fields.iter().find(|m| m.field == "treatment").unwrap();
    assert_eq!(treatment.false_neg, 1);
    let systolic = report.fields.iter().find(|m| m.field == "systolic_bp").unwrap();
    assert_eq!(systolic.true_pos, 1);
    assert_eq!(systolic.false_pos, 1);
    assert_eq!(systolic.false_neg, 1);
}

#[test]
fn test_malformed_prediction_lines_reported_not_fatal() {
    let gold = write_file(&[r#"{"id":"1","ground_truth":{"age":54}}"#]);
    let pred = write_file(&[
        "{broken json",
        r#"{"id":"1","pred":{"age":54}}"#,
    ]);

    let gold = load_records(gold.path(), SourceKind::Gold).unwrap();
    let pred = load_records(pred.path(), SourceKind::Predictions).unwrap();
    let report = score_sets(&gold, &pred);

    assert!(report.skipped_lines() > 0);
    assert!(report.warnings.iter().any(|w| w.contains("skipped")));
    // The well-formed line still scored.
    assert_eq!(report.correct_instances, 1);
}

#[test]
fn test_empty_prediction_file_still_produces_report() {
    let gold = write_file(&[r#"{"id":"1","ground_truth":{"age":54,"sex":"M"}}"#]);
    let pred = write_file(&[]);

    let gold = load_records(gold.path(), SourceKind::Gold).unwrap();
    let pred = load_records(pred.path(), SourceKind::Predictions).unwrap();
    let report = score_sets(&gold, &pred);

    assert_eq!(report.records_scored, 1);
    assert_eq!(report.records_without_prediction, 1);
    assert_eq!(report.accuracy, 0.0);
    assert_eq!(report.macro_f1, 0.0);
    assert!(report.warnings.iter().any(|w| w.contains("no predicted counterpart")));
}

#[test]
fn test_extreme_integer_values_still_produce_report() {
    // i64::MAX in gold against a small negative prediction: the run must
    // score it as an ordinary mismatch, not abort.
    let gold = write_file(&[r#"{"id":"1","ground_truth":{"systolic_bp":9223372036854775807}}"#]);
    let pred = write_file(&[r#"{"id":"1","pred":{"systolic_bp":-2}}"#]);

    let gold = load_records(gold.path(), SourceKind::Gold).unwrap();
    let pred = load_records(pred.path(), SourceKind::Predictions).unwrap();
    let report = score_sets(&gold, &pred);

    assert_eq!(report.records_scored, 1);
    assert_eq!(report.comparable_instances, 1);
    assert_eq!(report.correct_instances, 0);
    let bp = report.fields.iter().find(|m| m.field == "systolic_bp").unwrap();
    assert_eq!(bp.false_pos, 1);
    assert_eq!(bp.false_neg, 1);
}

#[test]
fn test_report_round_trips_through_json() {
    let gold = write_file(&[r#"{"id":"1","ground_truth":{"age":54}}"#]);
    let pred = write_file(&[r#"{"id":"1","pred":{"age":54}}"#]);

    let gold = load_records(gold.path(), SourceKind::Gold).unwrap();
    let pred = load_records(pred.path(), SourceKind::Predictions).unwrap();
    let report = score_sets(&gold, &pred);

    let json = serde_json::to_string_pretty(&report).unwrap();
    let back: medex::MetricsReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back.correct_instances, 1);
    assert!((back.accuracy - 1.0).abs() < 1e-12);
}
