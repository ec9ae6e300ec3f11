//! Field-scoped validation error sink.
//!
//! The sink replaces the original pattern of mutating shared model state:
//! the caller hands a `&mut ValidationErrors` into the save hook and reads
//! the collected failures back out afterwards. One error per field, first
//! failure wins.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AttachmentErrorKind;

/// One field's validation failure for this save attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub kind: AttachmentErrorKind,
    pub message: String,
}

/// Mutable collection of field-scoped errors for one save attempt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationErrors {
    errors: BTreeMap<String, FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for a field. Later failures for the same field are
    /// ignored; the first recorded error wins.
    pub fn record(&mut self, label: &str, kind: AttachmentErrorKind, message: String) {
        self.errors
            .entry(label.to_string())
            .or_insert(FieldError { kind, message });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.errors.contains_key(label)
    }

    pub fn get(&self, label: &str) -> Option<&FieldError> {
        self.errors.get(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldError)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v))
    }
}
