//! Save/delete orchestration for attachment fields.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use anexa_core::{
    AppError, AttachmentErrorKind, AttachmentSettings, Clock, ProcessorConfig, RecordDraft,
    RecordId, ResolvedField, SystemClock, UploadCandidate, ValidationErrors,
};
use anexa_core::{FieldValue, RecordStore};
use anexa_storage::{destination_dir, AttachmentStore, StoreError};

use super::{filename, validate};

/// Result of a save-time pass over one record draft.
#[derive(Debug, Clone, Default)]
pub struct SaveOutcome {
    /// Whether the save may proceed. False when any field recorded a
    /// validation error; files moved during the attempt have been rolled
    /// back by then.
    pub proceed: bool,
    /// Accepted physical filename per field, for the caller to persist.
    /// Fields without a fresh upload are absent: stray non-upload payload
    /// is never a filename to persist.
    pub fields: BTreeMap<String, String>,
}

/// Attachment processor for one record type.
///
/// Holds the (immutable) per-field settings and the collaborators: the
/// filesystem store, the record store for persisted state, and the clock.
/// Invoked synchronously around a record's save and delete; one call is a
/// strictly sequential chain with no internal parallelism.
pub struct AttachmentProcessor {
    settings: Arc<AttachmentSettings>,
    store: Arc<dyn AttachmentStore>,
    records: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
    staging_dir: PathBuf,
}

impl AttachmentProcessor {
    pub fn new(
        settings: Arc<AttachmentSettings>,
        store: Arc<dyn AttachmentStore>,
        records: Arc<dyn RecordStore>,
        config: &ProcessorConfig,
    ) -> Self {
        Self {
            settings,
            store,
            records,
            clock: Arc::new(SystemClock),
            staging_dir: config.staging_dir.clone(),
        }
    }

    /// Replace the wall clock, for deterministic `{TIMESTAMP}` names.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Pre-save hook. Validates and stores every field's upload candidate,
    /// collecting field-scoped errors into `errors`. When any field fails,
    /// files moved during this attempt are deleted again and the outcome
    /// signals abort.
    #[tracing::instrument(skip(self, draft, errors), fields(record_id = draft.id))]
    pub async fn before_save(
        &self,
        draft: &RecordDraft,
        errors: &mut ValidationErrors,
    ) -> Result<SaveOutcome, AppError> {
        let mut accepted = BTreeMap::new();
        // Files moved into place during this attempt, kept explicitly so the
        // failure path can undo exactly what this pass did.
        let mut moved: Vec<(String, String)> = Vec::new();

        for label in self.settings.labels() {
            let Some(value) = draft.value(label) else {
                continue;
            };
            match value {
                FieldValue::Upload(candidate) if errors.is_empty() => {
                    self.process_field(draft, label, candidate, errors, &mut accepted, &mut moved)
                        .await?;
                }
                FieldValue::Upload(_) => {
                    // An earlier field already failed this save; skip the
                    // candidate, it stays in staging.
                }
                FieldValue::Stored(_) | FieldValue::Empty => {
                    // Not a fresh upload; dropped from the outcome.
                }
            }
        }

        if !errors.is_empty() {
            self.rollback(&moved).await;
            return Ok(SaveOutcome {
                proceed: false,
                fields: BTreeMap::new(),
            });
        }

        Ok(SaveOutcome {
            proceed: true,
            fields: accepted,
        })
    }

    /// Pre-delete hook. Removes the physical file of every configured field
    /// with a non-empty persisted filename. Failures are logged and skipped
    /// so the record delete always proceeds; the returned signal is always
    /// true.
    #[tracing::instrument(skip(self))]
    pub async fn before_delete(&self, id: RecordId) -> bool {
        let fields = match self.records.fetch_fields(id).await {
            Ok(Some(fields)) => fields,
            Ok(None) => return true,
            Err(e) => {
                tracing::warn!(record_id = id, error = %e, "Could not fetch persisted fields; skipping attachment cleanup");
                return true;
            }
        };

        for label in self.settings.labels() {
            let Some(stored) = fields.get(label) else {
                continue;
            };
            if stored.is_empty() {
                continue;
            }
            let resolved = self.settings.resolve(label);
            let dest = destination_dir(&self.settings.base_dir, &resolved.dir);
            if let Err(e) = self.store.remove(&dest, stored).await {
                tracing::warn!(
                    record_id = id,
                    field = %label,
                    file = %stored,
                    error = %e,
                    "Failed to remove attachment during record delete"
                );
            }
        }

        true
    }

    /// Validate one candidate, move it into place, and supersede any
    /// previous file. A validation failure records exactly one error for the
    /// field and leaves the candidate in staging.
    async fn process_field(
        &self,
        draft: &RecordDraft,
        label: &str,
        candidate: &UploadCandidate,
        errors: &mut ValidationErrors,
        accepted: &mut BTreeMap<String, String>,
        moved: &mut Vec<(String, String)>,
    ) -> Result<(), AppError> {
        let resolved = self.settings.resolve(label);
        let dest = destination_dir(&self.settings.base_dir, &resolved.dir);

        if let Some(kind) = self.run_checks(&resolved, &dest, candidate).await? {
            tracing::debug!(field = %label, kind = %kind, "Attachment validation failed");
            errors.record(label, kind, resolved.message_for(kind));
            return Ok(());
        }

        let physical = filename::render(
            &resolved.physical_name,
            draft.id,
            candidate,
            self.clock.as_ref(),
        );

        if resolved.create_dir {
            if let Err(e) = self.store.ensure_dir(&dest).await {
                tracing::warn!(field = %label, dest = %dest, error = %e, "Could not create destination directory");
                let kind = AttachmentErrorKind::ErrorUploadingFile;
                errors.record(label, kind, resolved.message_for(kind));
                return Ok(());
            }
        }

        match self.store.place(&candidate.tmp_path, &dest, &physical).await {
            Ok(()) => {
                moved.push((dest.clone(), physical.clone()));
                accepted.insert(label.to_string(), physical.clone());
                self.remove_previous(draft.id, label, &dest, &physical)
                    .await?;
            }
            Err(e) => {
                tracing::warn!(field = %label, file = %physical, error = %e, "Attachment move failed");
                let kind = AttachmentErrorKind::ErrorUploadingFile;
                errors.record(label, kind, resolved.message_for(kind));
            }
        }

        Ok(())
    }

    /// The validation chain, in fixed order; the first failing check decides
    /// the error kind and later checks do not run.
    async fn run_checks(
        &self,
        resolved: &ResolvedField,
        dest: &str,
        candidate: &UploadCandidate,
    ) -> Result<Option<AttachmentErrorKind>, AppError> {
        if !validate::valid_type(&resolved.types, &candidate.content_type) {
            return Ok(Some(AttachmentErrorKind::InvalidFileType));
        }
        if !validate::valid_extension(&resolved.extensions, &candidate.extension()) {
            return Ok(Some(AttachmentErrorKind::InvalidFileExtension));
        }
        if !validate::valid_size(resolved.max_size, candidate.size) {
            return Ok(Some(AttachmentErrorKind::InvalidFileSize));
        }
        if !validate::is_staged(&self.staging_dir, candidate).await {
            return Ok(Some(AttachmentErrorKind::FileNotUploaded));
        }
        if !resolved.create_dir && !self.store.dir_exists(dest).await.map_err(infra)? {
            return Ok(Some(AttachmentErrorKind::DirectoryDoesNotExist));
        }
        if !self.store.dir_writable(dest).await.map_err(infra)? {
            if resolved.create_dir {
                if !self.store.parent_writable(dest).await.map_err(infra)? {
                    return Ok(Some(AttachmentErrorKind::ParentDirectoryNotWritable));
                }
            } else {
                return Ok(Some(AttachmentErrorKind::DirectoryNotWritable));
            }
        }
        Ok(None)
    }

    /// Delete the previously persisted file for a field when the freshly
    /// stored name differs from it. Same resolved name means the new file
    /// already overwrote the old one in place.
    async fn remove_previous(
        &self,
        id: RecordId,
        label: &str,
        dest: &str,
        new_name: &str,
    ) -> Result<(), AppError> {
        let Some(fields) = self.records.fetch_fields(id).await? else {
            return Ok(());
        };
        let Some(previous) = fields.get(label) else {
            return Ok(());
        };
        if previous.is_empty() || previous == new_name {
            return Ok(());
        }
        if let Err(e) = self.store.remove(dest, previous).await {
            tracing::warn!(field = %label, file = %previous, error = %e, "Failed to remove superseded attachment");
        }
        Ok(())
    }

    /// Failure exit path: delete every file this attempt moved into place.
    async fn rollback(&self, moved: &[(String, String)]) {
        for (dir, name) in moved {
            tracing::warn!(dir = %dir, file = %name, "Rolling back attachment from failed save");
            if let Err(e) = self.store.remove(dir, name).await {
                tracing::warn!(dir = %dir, file = %name, error = %e, "Rollback removal failed");
            }
        }
    }
}

fn infra(e: StoreError) -> AppError {
    AppError::Internal(e.to_string())
}
