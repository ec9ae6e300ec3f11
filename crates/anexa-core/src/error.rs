//! Error types module
//!
//! Validation failures are field-scoped and carried by kind through the
//! `ValidationErrors` sink; they are collected, never raised. `AppError` is
//! reserved for infrastructure failures (I/O, record store, configuration)
//! that abort the operation as a whole.

use serde::{Deserialize, Serialize};

/// The kind of a field-scoped attachment validation failure.
///
/// Exactly one kind is recorded per field per save attempt (first failure
/// wins). Message text is configurable per field with model-level fallback;
/// `default_message` is the final fallback when neither level configures one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttachmentErrorKind {
    InvalidFileType,
    InvalidFileExtension,
    InvalidFileSize,
    FileNotUploaded,
    DirectoryDoesNotExist,
    DirectoryNotWritable,
    ParentDirectoryNotWritable,
    ErrorUploadingFile,
}

impl AttachmentErrorKind {
    /// Machine-readable code, e.g. `INVALID_FILE_SIZE`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidFileType => "INVALID_FILE_TYPE",
            Self::InvalidFileExtension => "INVALID_FILE_EXTENSION",
            Self::InvalidFileSize => "INVALID_FILE_SIZE",
            Self::FileNotUploaded => "FILE_NOT_UPLOADED",
            Self::DirectoryDoesNotExist => "DIRECTORY_DOES_NOT_EXIST",
            Self::DirectoryNotWritable => "DIRECTORY_NOT_WRITABLE",
            Self::ParentDirectoryNotWritable => "PARENT_DIRECTORY_NOT_WRITABLE",
            Self::ErrorUploadingFile => "ERROR_UPLOADING_FILE",
        }
    }

    /// Built-in user-facing message, used when neither the field nor the
    /// model configures one.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::InvalidFileType => "This file type is not supported.",
            Self::InvalidFileExtension => "This file type is not supported.",
            Self::InvalidFileSize => "The file is too large to upload.",
            Self::FileNotUploaded => "The file was not properly uploaded.",
            Self::DirectoryDoesNotExist => "The target directory doesn't exist.",
            Self::DirectoryNotWritable => "Directory not writable.",
            Self::ParentDirectoryNotWritable => "The parent directory is not writable.",
            Self::ErrorUploadingFile => "There was an error uploading the file.",
        }
    }
}

impl std::fmt::Display for AttachmentErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Record store error: {0}")]
    Record(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_codes_are_stable() {
        assert_eq!(AttachmentErrorKind::InvalidFileSize.as_str(), "INVALID_FILE_SIZE");
        assert_eq!(
            AttachmentErrorKind::ParentDirectoryNotWritable.as_str(),
            "PARENT_DIRECTORY_NOT_WRITABLE"
        );
    }

    #[test]
    fn kind_serializes_as_screaming_snake() {
        let json = serde_json::to_string(&AttachmentErrorKind::FileNotUploaded).unwrap();
        assert_eq!(json, "\"FILE_NOT_UPLOADED\"");
    }
}
