//! Domain models for in-flight saves.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Record identifier. Callers reserve an id before save so filename
/// resolution never has to guess a forthcoming value.
pub type RecordId = i64;

/// One submitted file for one field. Exists only for the duration of one
/// save; the staged path points into the platform's upload staging area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadCandidate {
    pub tmp_path: PathBuf,
    pub original_filename: String,
    pub content_type: String,
    pub size: u64,
}

impl UploadCandidate {
    /// Extension derived from the original filename, lowercased. Empty when
    /// the filename has no extension.
    pub fn extension(&self) -> String {
        std::path::Path::new(&self.original_filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase()
    }

    /// Original filename without its extension.
    pub fn stem(&self) -> String {
        std::path::Path::new(&self.original_filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.original_filename)
            .to_string()
    }
}

/// Pending payload for one configured field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FieldValue {
    /// A freshly submitted file to validate and store.
    Upload(UploadCandidate),
    /// An already-persisted filename echoed back unchanged.
    Stored(String),
    /// Nothing submitted for this field.
    Empty,
}

impl FieldValue {
    pub fn as_upload(&self) -> Option<&UploadCandidate> {
        match self {
            FieldValue::Upload(candidate) => Some(candidate),
            _ => None,
        }
    }
}

/// Immutable snapshot of a record's pending field values, handed to the
/// processor by the persistence layer before save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordDraft {
    pub id: RecordId,
    pub values: BTreeMap<String, FieldValue>,
}

impl RecordDraft {
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            values: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, label: impl Into<String>, value: FieldValue) -> Self {
        self.values.insert(label.into(), value);
        self
    }

    pub fn value(&self, label: &str) -> Option<&FieldValue> {
        self.values.get(label)
    }
}
