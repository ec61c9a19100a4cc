//! Invariant tests for the scoring core.
//!
//! These verify that metrics always satisfy their mathematical invariants
//! and that the worked scenarios from the benchmark definition score the
//! way they must.

use medex::eval::{score_record, score_sets, ConfusionTally, Outcome};
use medex::record::{Record, RecordSet};
use medex::schema::SCHEMA;
use serde_json::{json, Value};

fn record(id: &str, fields: &[(&str, Value)]) -> Record {
    let mut record = Record::new(id);
    for (name, value) in fields {
        record.set(name, value.clone()).unwrap();
    }
    record
}

fn set(records: Vec<Record>) -> RecordSet {
    let mut set = RecordSet::new();
    for r in records {
        set.insert(r);
    }
    set
}

fn outcome_of(pred: &Record, gold: &Record, field: &str) -> Outcome {
    score_record(Some(pred), gold)
        .into_iter()
        .find(|o| o.field == field)
        .map(|o| o.outcome)
        .unwrap()
}

#[test]
fn test_scenario_case_and_tolerance_matches() {
    // gold {"id":1,"sex":"Female","age":54,"systolic_bp":118}
    // pred {"id":1,"sex":"female","age":54,"systolic_bp":121}
    let gold = record(
        "1",
        &[("sex", json!("Female")), ("age", json!(54)), ("systolic_bp", json!(118))],
    );
    let pred = record(
        "1",
        &[("sex", json!("female")), ("age", json!(54)), ("systolic_bp", json!(121))],
    );
    assert_eq!(outcome_of(&pred, &gold, "sex"), Outcome::Match);
    assert_eq!(outcome_of(&pred, &gold, "age"), Outcome::Match);
    assert_eq!(outcome_of(&pred, &gold, "systolic_bp"), Outcome::Match);
}

#[test]
fn test_scenario_missing_predicted_is_false_negative() {
    let gold = set(vec![record("2", &[("diagnosis", json!("hypertension"))])]);
    let pred = set(vec![record("2", &[])]);
    let report = score_sets(&gold, &pred);
    let diagnosis = report.fields.iter().find(|m| m.field == "diagnosis").unwrap();
    assert_eq!(diagnosis.false_neg, 1);
    assert_eq!(diagnosis.false_pos, 0);
    assert_eq!(diagnosis.true_pos, 0);
}

#[test]
fn test_scenario_mismatch_counts_once_for_accuracy() {
    let gold = set(vec![record("3", &[("systolic_bp", json!(120))])]);
    let pred = set(vec![record("3", &[("systolic_bp", json!(130))])]);
    let report = score_sets(&gold, &pred);
    let bp = report.fields.iter().find(|m| m.field == "systolic_bp").unwrap();
    // FP and FN both increment for F1 purposes...
    assert_eq!(bp.false_pos, 1);
    assert_eq!(bp.false_neg, 1);
    // ...but accuracy sees exactly one incorrect instance.
    assert_eq!(report.comparable_instances, 1);
    assert_eq!(report.correct_instances, 0);
    assert_eq!(report.accuracy, 0.0);
}

#[test]
fn test_scenario_unmatched_prediction_changes_nothing() {
    let gold = set(vec![record("1", &[("age", json!(40))])]);
    let with_stray = set(vec![
        record("1", &[("age", json!(40))]),
        record("99", &[("age", json!(70)), ("diagnosis", json!("flu"))]),
    ]);
    let without = set(vec![record("1", &[("age", json!(40))])]);

    let a = score_sets(&gold, &with_stray);
    let b = score_sets(&gold, &without);
    assert_eq!(a.comparable_instances, b.comparable_instances);
    assert_eq!(a.correct_instances, b.correct_instances);
    assert_eq!(a.macro_f1, b.macro_f1);
    assert_eq!(a.predictions_ignored, 1);
}

#[test]
fn test_metric_bounds_hold_across_mixed_outcomes() {
    let gold = set(vec![
        record("1", &[("sex", json!("M")), ("age", json!(80)), ("outcome", json!("died"))]),
        record("2", &[("heart_rate", json!(90))]),
        record("3", &[("diagnosis", json!("copd"))]),
    ]);
    let pred = set(vec![
        record("1", &[("sex", json!("F")), ("age", json!(80)), ("treatment", json!("o2"))]),
        record("3", &[("diagnosis", json!("asthma"))]),
    ]);
    let report = score_sets(&gold, &pred);

    assert!((0.0..=1.0).contains(&report.accuracy));
    assert!((0.0..=1.0).contains(&report.macro_f1));
    for m in &report.fields {
        assert!((0.0..=1.0).contains(&m.precision), "{}", m.field);
        assert!((0.0..=1.0).contains(&m.recall), "{}", m.field);
        assert!((0.0..=1.0).contains(&m.f1), "{}", m.field);
    }
}

#[test]
fn test_macro_f1_zero_without_true_positives() {
    let gold = set(vec![record("1", &[("age", json!(50)), ("sex", json!("M"))])]);
    let pred = set(vec![record("1", &[("age", json!(51)), ("sex", json!("F"))])]);
    let report = score_sets(&gold, &pred);
    assert_eq!(report.macro_f1, 0.0);
    assert_eq!(report.accuracy, 0.0);
}

#[test]
fn test_scoring_twice_doubles_every_counter() {
    let gold = record(
        "1",
        &[("sex", json!("M")), ("age", json!(77)), ("systolic_bp", json!(140))],
    );
    let pred = record(
        "1",
        &[("sex", json!("male")), ("age", json!(78)), ("diastolic_bp", json!(90))],
    );
    let outcomes = score_record(Some(&pred), &gold);

    let mut once = ConfusionTally::new();
    once.accumulate(&outcomes);
    let mut twice = ConfusionTally::new();
    twice.accumulate(&outcomes);
    twice.accumulate(&outcomes);

    for spec in SCHEMA {
        let a = once.field(spec.name);
        let b = twice.field(spec.name);
        assert_eq!(b.true_pos, 2 * a.true_pos, "{}", spec.name);
        assert_eq!(b.false_pos, 2 * a.false_pos, "{}", spec.name);
        assert_eq!(b.false_neg, 2 * a.false_neg, "{}", spec.name);
        assert_eq!(b.comparable, 2 * a.comparable, "{}", spec.name);
    }
}

#[test]
fn test_score_record_is_deterministic() {
    let gold = record("1", &[("diagnosis", json!("Sepsis")), ("heart_rate", json!("110 bpm"))]);
    let pred = record("1", &[("diagnosis", json!("sepsis")), ("heart_rate", json!(110))]);
    let first = score_record(Some(&pred), &gold);
    for _ in 0..10 {
        assert_eq!(score_record(Some(&pred), &gold), first);
    }
}

#[test]
fn test_both_absent_everywhere_yields_zero_comparable() {
    let gold = set(vec![record("1", &[])]);
    let pred = set(vec![record("1", &[])]);
    let report = score_sets(&gold, &pred);
    assert_eq!(report.comparable_instances, 0);
    assert_eq!(report.records_scored, 1);
    assert_eq!(report.accuracy, 0.0);
    assert!(report.warnings.iter().any(|w| w.contains("no comparable")));
}
