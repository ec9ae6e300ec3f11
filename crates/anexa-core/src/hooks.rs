//! Hooks and traits for persistence integration
//!
//! The processor never talks to a database directly. The persistence layer
//! implements `RecordStore` so the processor can re-read a record's
//! currently persisted field values (stale-file comparison on update,
//! cleanup on delete) without coupling to any particular ORM.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::RecordId;

/// Persisted field label -> stored filename. Empty string means the field
/// currently holds no attachment.
pub type StoredFields = HashMap<String, String>;

/// Read access to a record's persisted field values.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch the persisted field values for a record. `None` when no row
    /// exists yet (the reserved-id create case).
    async fn fetch_fields(&self, id: RecordId) -> Result<Option<StoredFields>, AppError>;
}

/// No-op implementation for setups without prior persisted state.
pub struct NoRecords;

#[async_trait]
impl RecordStore for NoRecords {
    async fn fetch_fields(&self, _id: RecordId) -> Result<Option<StoredFields>, AppError> {
        Ok(None)
    }
}

/// Wall-clock access, injectable so `{TIMESTAMP}` names are testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Default clock backed by the system time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
