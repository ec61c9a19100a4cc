//! Property tests for the scoring core.
//!
//! Tests invariants that must hold for all inputs: normalization is
//! idempotent, tolerance matching is symmetric, and derived metrics stay in
//! [0, 1] for arbitrary tallies.

use medex::eval::{matches, normalize, score_record, ConfusionTally, NormValue, Outcome};
use medex::record::Record;
use medex::schema::{field, FieldKind, SCHEMA};
use proptest::prelude::*;
use serde_json::{json, Value};

fn arbitrary_raw() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::from),
        any::<f64>().prop_map(|f| json!(f)),
        "[ -~]{0,24}".prop_map(Value::String),
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
    ]
}

proptest! {
    #[test]
    fn normalize_is_idempotent(raw in arbitrary_raw(), index in 0..SCHEMA.len()) {
        let spec = &SCHEMA[index];
        if let Some(once) = normalize(spec, Some(&raw)) {
            let twice = normalize(spec, Some(&once.to_raw()));
            prop_assert_eq!(twice, Some(once));
        }
    }

    #[test]
    fn tolerance_match_is_symmetric(a in any::<i64>(), b in any::<i64>()) {
        // Full-range values double as an overflow check: matching must
        // neither panic nor depend on argument order.
        for name in ["systolic_bp", "diastolic_bp", "age", "heart_rate"] {
            let spec = field(name).unwrap();
            prop_assert_eq!(
                matches(spec, &NormValue::Int(a), &NormValue::Int(b)),
                matches(spec, &NormValue::Int(b), &NormValue::Int(a)),
                "field {}", name
            );
        }
    }

    #[test]
    fn text_match_is_symmetric(a in "[a-z ]{0,12}", b in "[a-z ]{0,12}") {
        let spec = field("diagnosis").unwrap();
        let (a, b) = (NormValue::Text(a), NormValue::Text(b));
        prop_assert_eq!(matches(spec, &a, &b), matches(spec, &b, &a));
    }

    #[test]
    fn metrics_stay_bounded(
        outcomes in prop::collection::vec(
            (0..SCHEMA.len(), 0..5usize),
            0..64
        )
    ) {
        let mut tally = ConfusionTally::new();
        for (index, kind) in outcomes {
            let outcome = match kind {
                0 => Outcome::Match,
                1 => Outcome::Mismatch,
                2 => Outcome::MissingPredicted,
                3 => Outcome::SpuriousPredicted,
                _ => Outcome::BothAbsent,
            };
            tally.accumulate(&[medex::eval::FieldOutcome {
                field: SCHEMA[index].name,
                outcome,
            }]);
        }
        let report = tally.finalize();
        prop_assert!((0.0..=1.0).contains(&report.accuracy));
        prop_assert!((0.0..=1.0).contains(&report.macro_f1));
        for m in &report.fields {
            prop_assert!((0.0..=1.0).contains(&m.precision));
            prop_assert!((0.0..=1.0).contains(&m.recall));
            prop_assert!((0.0..=1.0).contains(&m.f1));
            prop_assert!(m.true_pos <= m.comparable);
            prop_assert!(m.true_pos <= m.support);
        }
    }

    #[test]
    fn scorer_outcomes_cover_every_schema_field(raw_age in arbitrary_raw()) {
        let mut gold = Record::new("1");
        gold.set("age", raw_age).unwrap();
        let outcomes = score_record(None, &gold);
        prop_assert_eq!(outcomes.len(), SCHEMA.len());
        for (outcome, spec) in outcomes.iter().zip(SCHEMA) {
            prop_assert_eq!(outcome.field, spec.name);
        }
    }

    #[test]
    fn integer_normalization_handles_any_unit_suffix(
        n in -10_000i64..10_000,
        unit in "[a-zA-Z]{0,6}"
    ) {
        let spec = field("heart_rate").unwrap();
        let raw = json!(format!("{} {}", n, unit));
        let normalized = normalize(spec, Some(&raw));
        prop_assert_eq!(normalized, Some(NormValue::Int(n)));
    }
}

#[test]
fn normalize_text_never_produces_int() {
    for spec in SCHEMA {
        if matches!(spec.kind, FieldKind::Integer { .. }) {
            continue;
        }
        let normalized = normalize(spec, Some(&json!("123")));
        assert!(matches!(normalized, Some(NormValue::Text(_))));
    }
}
