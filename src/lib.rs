//! # medex
//!
//! Benchmark scorer for structured clinical-note extraction.
//!
//! Instruction-tuned models are asked to turn free-text clinical narratives
//! into a fixed-schema JSON object (sex, age, vitals, diagnosis, treatment,
//! outcome). medex scores those extractions against gold labels and reports
//! per-field precision/recall/F1, overall accuracy, and macro-F1.
//!
//! ## Pipeline
//!
//! ```text
//! notes.jsonl ──(infer::run_inference)──▶ predictions.jsonl
//! gold.jsonl + predictions.jsonl ──(eval::score_sets)──▶ MetricsReport
//! ```
//!
//! ## Scoring rules
//!
//! | Field | Type | Match rule |
//! |-------|------|------------|
//! | sex | categorical | alias-canonicalized, exact |
//! | age, heart_rate | integer | exact |
//! | systolic_bp, diastolic_bp | integer | within ±5 |
//! | diagnosis, treatment, outcome | text | trimmed, lowercased, exact |
//!
//! A field absent from a record means "not stated" and is distinct from an
//! empty string or zero. Unknown keys are ignored, never penalized. All
//! per-line and per-field input problems are recovered from; a run always
//! ends in a [`eval::MetricsReport`].
//!
//! ## Quick start
//!
//! ```rust
//! use medex::record::{Record, RecordSet};
//! use medex::eval::score_sets;
//! use serde_json::json;
//!
//! let mut gold = RecordSet::new();
//! let mut record = Record::new("1");
//! record.set("sex", json!("Female")).unwrap();
//! record.set("systolic_bp", json!(118)).unwrap();
//! gold.insert(record);
//!
//! let mut preds = RecordSet::new();
//! let mut record = Record::new("1");
//! record.set("sex", json!("female")).unwrap();
//! record.set("systolic_bp", json!(121)).unwrap();
//! preds.insert(record);
//!
//! let report = score_sets(&gold, &preds);
//! assert_eq!(report.accuracy, 1.0);
//! ```

#![warn(missing_docs)]

pub mod cli;
pub mod error;
pub mod eval;
pub mod infer;
pub mod jsonl;
pub mod record;
pub mod schema;

pub use error::{Error, Result};
pub use eval::{score_sets, MetricsReport};
pub use record::{Record, RecordSet};
pub use schema::{FieldKind, FieldSpec, SCHEMA};
