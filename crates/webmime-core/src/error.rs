//! Error types for the override store and the staging model.

use std::path::PathBuf;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Filesystem and persistence errors.
///
/// The store never surfaces these to its callers: they are logged and
/// resolved to a fallback. They are public so that custom [`FileSystem`]
/// implementations can report them.
///
/// [`FileSystem`]: crate::fs::FileSystem
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("File does not exist: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File too large: {path} ({size} bytes, limit {limit} bytes)")]
    FileTooBig {
        path: PathBuf,
        size: u64,
        limit: u64,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid data format in {path}: expected a JSON object")]
    InvalidFormat { path: PathBuf },

    #[error("Failed to serialize overrides: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl StoreError {
    /// True when the error only means "there is no document yet".
    pub fn is_not_found(&self) -> bool {
        match self {
            StoreError::NotFound { .. } => true,
            StoreError::FileRead { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// An extension/content-type pair that fails validation after normalization.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("Please enter a valid file extension.")]
    EmptyExtension,

    #[error("Please enter a valid content type.")]
    EmptyContentType,
}

/// Rejected staging-model mutations. A rejected mutation leaves the model untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StagingError {
    #[error(transparent)]
    InvalidEntry(#[from] EntryError),

    #[error("An override for extension '.{0}' already exists")]
    DuplicateExtension(String),

    #[error("Row {row} is out of range ({len} rows)")]
    RowOutOfRange { row: usize, len: usize },

    #[error("Cannot remove {count} row(s) starting at {row} ({len} rows)")]
    InvalidRange { row: usize, count: usize, len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_not_found_detection() {
        let missing = StoreError::NotFound {
            path: PathBuf::from("a.json"),
        };
        assert!(missing.is_not_found());

        let io_missing = StoreError::FileRead {
            path: PathBuf::from("a.json"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(io_missing.is_not_found());

        let denied = StoreError::FileRead {
            path: PathBuf::from("a.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!denied.is_not_found());

        let too_big = StoreError::FileTooBig {
            path: PathBuf::from("a.json"),
            size: 10,
            limit: 5,
        };
        assert!(!too_big.is_not_found());
    }

    #[test]
    fn test_too_big_message_mentions_sizes() {
        let err = StoreError::FileTooBig {
            path: PathBuf::from("webui_mime_types.json"),
            size: 200_000,
            limit: 131_072,
        };
        let msg = err.to_string();
        assert!(msg.contains("200000"));
        assert!(msg.contains("131072"));
    }

    #[test]
    fn test_staging_error_wraps_entry_error() {
        let err: StagingError = EntryError::EmptyContentType.into();
        assert_eq!(err, StagingError::InvalidEntry(EntryError::EmptyContentType));
        assert_eq!(err.to_string(), "Please enter a valid content type.");
    }

    #[test]
    fn test_duplicate_message_shows_dotted_extension() {
        let err = StagingError::DuplicateExtension("jpg".to_string());
        assert!(err.to_string().contains("'.jpg'"));
    }
}
