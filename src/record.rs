//! Typed record abstractions for gold labels and model predictions.
//!
//! A [`Record`] maps schema field names to raw JSON values. A field that is
//! not stated is simply absent from the map; absence is distinct from an
//! empty string or a zero, and the normalizer preserves that distinction.
//! Unknown keys are dropped at construction time: they are neither penalized
//! nor rewarded by the scorer.

use std::collections::HashMap;

use serde_json::Value;

use crate::schema::{self, ID_KEY};

/// One record: an identifier plus a partial field-name → raw-value mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    /// Shared record identifier.
    pub id: String,
    fields: HashMap<&'static str, Value>,
}

impl Record {
    /// Create an empty record (no stated fields).
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: HashMap::new(),
        }
    }

    /// Build a record from a JSON object, keeping only schema fields.
    ///
    /// The identifier key and unknown keys are skipped; unknown keys are
    /// logged at debug level and otherwise ignored.
    #[must_use]
    pub fn from_object(id: impl Into<String>, object: &serde_json::Map<String, Value>) -> Self {
        let mut record = Record::new(id);
        for (key, value) in object {
            if key == ID_KEY {
                continue;
            }
            match schema::field(key) {
                Some(spec) => {
                    record.fields.insert(spec.name, value.clone());
                }
                None => {
                    log::debug!("record {}: ignoring unknown field {:?}", record.id, key);
                }
            }
        }
        record
    }

    /// Set a field's raw value. Unknown field names are rejected.
    pub fn set(&mut self, name: &str, value: Value) -> crate::Result<()> {
        let spec = schema::field(name).ok_or_else(|| crate::Error::unknown_field(name))?;
        self.fields.insert(spec.name, value);
        Ok(())
    }

    /// Raw value of a field, or `None` when the field is not stated.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Number of stated fields.
    #[must_use]
    pub fn stated(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record states no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Diagnostics accumulated while loading a record file.
///
/// Every counter here represents a recovered, non-fatal problem; the run
/// continues and the final report carries these numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoadDiagnostics {
    /// Lines that were not valid JSON objects and were skipped.
    pub malformed_lines: usize,
    /// Records dropped because the identifier key was missing or unusable.
    pub missing_id: usize,
    /// Records dropped because an earlier record claimed the same id.
    pub duplicate_ids: usize,
}

impl LoadDiagnostics {
    /// Total dropped lines/records.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.malformed_lines + self.missing_id + self.duplicate_ids
    }
}

/// An ordered collection of records keyed by identifier.
///
/// Insertion order (file order) is preserved for iteration; lookups go
/// through an id index. Identifiers are unique: on duplicates the first
/// record wins.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: Vec<Record>,
    index: HashMap<String, usize>,
    /// Problems recovered from while this set was loaded.
    pub diagnostics: LoadDiagnostics,
}

impl RecordSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record. Returns `false` (and warns) if the id is taken.
    pub fn insert(&mut self, record: Record) -> bool {
        if self.index.contains_key(&record.id) {
            log::warn!("duplicate record id {:?}: keeping first occurrence", record.id);
            self.diagnostics.duplicate_ids += 1;
            return false;
        }
        self.index.insert(record.id.clone(), self.records.len());
        self.records.push(record);
        true
    }

    /// Look up a record by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    /// Whether the set contains `id`.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Iterate records in file order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
