//! Anexa Core Library
//!
//! This crate provides the domain models, per-field attachment configuration,
//! error types, and lifecycle hook traits shared across all Anexa components.

pub mod config;
pub mod error;
pub mod hooks;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{
    AttachmentSettings, FieldOverrides, MatchRule, ModelDefaults, ProcessorConfig, ResolvedField,
};
pub use error::{AppError, AttachmentErrorKind};
pub use hooks::{Clock, NoRecords, RecordStore, StoredFields, SystemClock};
pub use models::{FieldValue, RecordDraft, RecordId, UploadCandidate};
pub use validation::{FieldError, ValidationErrors};
