//! Per-candidate validation checks.
//!
//! Each check answers one question; ordering and error recording are the
//! processor's job.

use std::path::Path;

use anexa_core::{MatchRule, UploadCandidate};
use tokio::fs;

/// Normalize MIME type by stripping parameters (e.g. "image/jpeg; charset=utf-8" -> "image/jpeg").
fn normalize_mime_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
}

/// Declared MIME type against the configured rule.
pub fn valid_type(rule: &MatchRule, content_type: &str) -> bool {
    rule.matches(normalize_mime_type(content_type))
}

/// Extension derived from the original filename against the configured rule.
pub fn valid_extension(rule: &MatchRule, extension: &str) -> bool {
    rule.matches(extension)
}

/// Size against the configured maximum.
///
/// The bound is exclusive: a candidate whose size equals the maximum is
/// rejected. 0 means unlimited.
pub fn valid_size(max_size: u64, size: u64) -> bool {
    max_size == 0 || size < max_size
}

/// Whether the candidate's temp path actually originates from the platform
/// staging directory and still exists on disk. An arbitrary caller-supplied
/// filesystem path fails this check.
pub async fn is_staged(staging_dir: &Path, candidate: &UploadCandidate) -> bool {
    let Ok(staging) = fs::canonicalize(staging_dir).await else {
        return false;
    };
    let Ok(tmp) = fs::canonicalize(&candidate.tmp_path).await else {
        return false;
    };
    tmp.starts_with(&staging) && fs::metadata(&tmp).await.map(|m| m.is_file()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn one_of(items: &[&str]) -> MatchRule {
        MatchRule::OneOf(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn type_check_ignores_mime_parameters_and_case() {
        let rule = one_of(&["image/jpeg"]);
        assert!(valid_type(&rule, "IMAGE/JPEG; charset=utf-8"));
        assert!(!valid_type(&rule, "image/png"));
    }

    #[test]
    fn wildcard_rules_accept_any_candidate() {
        assert!(valid_type(&MatchRule::Any, "application/x-whatever"));
        assert!(valid_extension(&MatchRule::Any, "xyz"));
        assert!(valid_type(&one_of(&["image/png", "*"]), "text/html"));
    }

    #[test]
    fn size_bound_is_exclusive() {
        assert!(valid_size(1024, 1023));
        assert!(!valid_size(1024, 1024));
        assert!(!valid_size(1024, 1025));
    }

    #[test]
    fn zero_max_size_is_unlimited() {
        assert!(valid_size(0, u64::MAX));
    }

    #[tokio::test]
    async fn path_outside_staging_is_not_staged() {
        let staging = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        let outside = elsewhere.path().join("upload");
        std::fs::write(&outside, b"data").unwrap();

        let candidate = UploadCandidate {
            tmp_path: outside,
            original_filename: "a.txt".into(),
            content_type: "text/plain".into(),
            size: 4,
        };
        assert!(!is_staged(staging.path(), &candidate).await);
    }

    #[tokio::test]
    async fn missing_staged_file_is_not_staged() {
        let staging = tempfile::tempdir().unwrap();
        let candidate = UploadCandidate {
            tmp_path: staging.path().join("never-written"),
            original_filename: "a.txt".into(),
            content_type: "text/plain".into(),
            size: 4,
        };
        assert!(!is_staged(staging.path(), &candidate).await);
    }

    #[tokio::test]
    async fn traversal_out_of_staging_is_rejected() {
        let staging = tempfile::tempdir().unwrap();
        let sibling = staging.path().parent().unwrap().join("smuggled");
        std::fs::write(&sibling, b"data").unwrap();

        let sneaky: PathBuf = staging.path().join("..").join("smuggled");
        let candidate = UploadCandidate {
            tmp_path: sneaky,
            original_filename: "a.txt".into(),
            content_type: "text/plain".into(),
            size: 4,
        };
        assert!(!is_staged(staging.path(), &candidate).await);
        std::fs::remove_file(&sibling).ok();
    }
}
