//! Scoring core: normalization, matching, record scoring, aggregation.
//!
//! The pipeline is a pure fold: pair gold and predicted records by id, run
//! [`scorer::score_record`] on each pair, accumulate a [`ConfusionTally`],
//! and derive a [`MetricsReport`]. Every stage is deterministic and free of
//! I/O; record pairs are independent, so the fold can be sharded across
//! threads with per-shard tallies merged at the end.

pub mod matcher;
pub mod normalize;
pub mod report;
pub mod scorer;
pub mod tally;

pub use matcher::matches;
pub use normalize::{normalize, NormValue};
pub use report::{FieldMetrics, MetricsReport};
pub use scorer::{score_record, FieldOutcome, Outcome};
pub use tally::{ConfusionTally, FieldTally};

use crate::record::RecordSet;

/// Score a prediction set against a gold set.
///
/// Gold records drive the iteration: each one is scored against its
/// predicted counterpart, or against nothing (a full miss) when the
/// prediction set has no record for the id. Predicted records whose ids are
/// absent from gold are counted and otherwise ignored. Loader diagnostics
/// from both sets are carried into the report.
#[must_use]
pub fn score_sets(gold: &RecordSet, predictions: &RecordSet) -> MetricsReport {
    let mut tally = build_tally(gold, predictions);
    count_ignored_predictions(gold, predictions, &mut tally);
    let mut report = tally.finalize();
    report.set_load_diagnostics(gold.diagnostics, predictions.diagnostics);
    report
}

/// Sharded variant of [`score_sets`]: splits the gold records across
/// `shards` worker threads with one tally per shard, then merges. Produces
/// the same report as the sequential fold.
#[must_use]
pub fn score_sets_sharded(gold: &RecordSet, predictions: &RecordSet, shards: usize) -> MetricsReport {
    let shards = shards.max(1);
    let records: Vec<_> = gold.iter().collect();
    let chunk = records.len().div_ceil(shards).max(1);

    let mut tally = ConfusionTally::new();
    std::thread::scope(|scope| {
        let handles: Vec<_> = records
            .chunks(chunk)
            .map(|slice| {
                scope.spawn(move || {
                    let mut shard = ConfusionTally::new();
                    for &gold_record in slice {
                        let predicted = predictions.get(&gold_record.id);
                        if predicted.is_none() {
                            shard.note_missing_prediction();
                        }
                        shard.accumulate(&scorer::score_record(predicted, gold_record));
                    }
                    shard
                })
            })
            .collect();
        for handle in handles {
            // A panic in a shard is a bug in the pure scorer; propagate it.
            tally.merge(&handle.join().expect("scoring shard panicked"));
        }
    });

    count_ignored_predictions(gold, predictions, &mut tally);
    let mut report = tally.finalize();
    report.set_load_diagnostics(gold.diagnostics, predictions.diagnostics);
    report
}

fn build_tally(gold: &RecordSet, predictions: &RecordSet) -> ConfusionTally {
    let mut tally = ConfusionTally::new();
    for gold_record in gold.iter() {
        let predicted = predictions.get(&gold_record.id);
        if predicted.is_none() {
            tally.note_missing_prediction();
        }
        tally.accumulate(&scorer::score_record(predicted, gold_record));
    }
    tally
}

fn count_ignored_predictions(gold: &RecordSet, predictions: &RecordSet, tally: &mut ConfusionTally) {
    for predicted in predictions.iter() {
        if !gold.contains(&predicted.id) {
            log::debug!("prediction {:?} has no gold counterpart; ignored", predicted.id);
            tally.note_ignored_prediction();
        }
    }
}
