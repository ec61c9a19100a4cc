//! The extraction schema: field names, types, tolerances, and alias tables.
//!
//! The schema is a single static table so that adding a field is a one-place
//! change. Everything downstream (normalization, matching, scoring, report
//! ordering) iterates [`SCHEMA`] rather than hardcoding field names.

use serde::Serialize;

/// JSON key carrying the record identifier.
pub const ID_KEY: &str = "id";

/// How a field's values are normalized and compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    /// Free text: trimmed, lowercased, exact match.
    Text,
    /// Categorical text with a canonical alias table; values not in the
    /// table pass through lowercased and compare by string equality.
    Categorical {
        /// (surface form, canonical form) pairs, both lowercase.
        aliases: &'static [(&'static str, &'static str)],
    },
    /// Integer-valued: exact match, or within `tolerance` when set.
    Integer {
        /// Maximum absolute difference that still counts as a match.
        tolerance: Option<i64>,
    },
}

/// One entry of the extraction schema.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSpec {
    /// Field name as it appears in JSON records.
    pub name: &'static str,
    /// Normalization and matching rules for the field.
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Canonical form of a lowercased surface value, if this field carries
    /// an alias table and the value is in it.
    #[must_use]
    pub fn canonical(&self, lowered: &str) -> Option<&'static str> {
        match self.kind {
            FieldKind::Categorical { aliases } => aliases
                .iter()
                .find(|(surface, _)| *surface == lowered)
                .map(|(_, canon)| *canon),
            _ => None,
        }
    }
}

/// Sex canonicalization: chromosomal and single-letter forms collapse to
/// male/female; anything else compares as plain lowercased text.
const SEX_ALIASES: &[(&str, &str)] = &[
    ("m", "male"),
    ("male", "male"),
    ("xy", "male"),
    ("f", "female"),
    ("female", "female"),
    ("xx", "female"),
];

/// Blood-pressure fields tolerate a ±5 mmHg difference.
const BP_TOLERANCE: i64 = 5;

/// The fixed, ordered extraction schema.
pub const SCHEMA: &[FieldSpec] = &[
    FieldSpec {
        name: "sex",
        kind: FieldKind::Categorical {
            aliases: SEX_ALIASES,
        },
    },
    FieldSpec {
        name: "age",
        kind: FieldKind::Integer { tolerance: None },
    },
    FieldSpec {
        name: "systolic_bp",
        kind: FieldKind::Integer {
            tolerance: Some(BP_TOLERANCE),
        },
    },
    FieldSpec {
        name: "diastolic_bp",
        kind: FieldKind::Integer {
            tolerance: Some(BP_TOLERANCE),
        },
    },
    FieldSpec {
        name: "heart_rate",
        kind: FieldKind::Integer { tolerance: None },
    },
    FieldSpec {
        name: "diagnosis",
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "treatment",
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "outcome",
        kind: FieldKind::Text,
    },
];

/// Look up a schema field by name.
#[must_use]
pub fn field(name: &str) -> Option<&'static FieldSpec> {
    SCHEMA.iter().find(|spec| spec.name == name)
}

/// Whether `name` is a schema field.
#[must_use]
pub fn is_known_field(name: &str) -> bool {
    field(name).is_some()
}
