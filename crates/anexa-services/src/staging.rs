//! Upload staging helpers.
//!
//! The platform's upload mechanism writes incoming files into a staging
//! directory before the processor ever sees them. `stage_upload` reproduces
//! that step for callers (and tests) that start from raw bytes.

use std::path::Path;

use anexa_core::{AppError, UploadCandidate};
use tokio::fs;
use uuid::Uuid;

/// Write raw upload bytes into the staging directory and describe the result
/// as an `UploadCandidate`. The staged temp name is random; the original
/// filename travels on the candidate.
pub async fn stage_upload(
    staging_dir: &Path,
    original_filename: &str,
    content_type: &str,
    data: &[u8],
) -> Result<UploadCandidate, AppError> {
    let tmp_path = staging_dir.join(format!("upl-{}", Uuid::new_v4()));
    fs::write(&tmp_path, data).await?;

    tracing::debug!(
        path = %tmp_path.display(),
        original = %original_filename,
        size_bytes = data.len(),
        "Upload staged"
    );

    Ok(UploadCandidate {
        tmp_path,
        original_filename: original_filename.to_string(),
        content_type: content_type.to_string(),
        size: data.len() as u64,
    })
}
