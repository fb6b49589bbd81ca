//! Override entries and extension normalization.
//!
//! Every component that compares or stores extensions goes through
//! [`normalize_extension`], so `".JPG"`, `"jpg"` and `"  ..Jpg "` all name the
//! same override.

use crate::error::EntryError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Normalize a file extension for use as an override key.
///
/// Trims surrounding whitespace, lower-cases, and strips every leading `.`.
/// Embedded dots are kept, so `"..TAR.gz"` becomes `"tar.gz"`.
///
/// ```
/// use webmime_core::normalize_extension;
///
/// assert_eq!(normalize_extension(".JPG"), "jpg");
/// assert_eq!(normalize_extension("..tar.GZ"), "tar.gz");
/// assert_eq!(normalize_extension("   "), "");
/// ```
pub fn normalize_extension(extension: &str) -> String {
    extension
        .trim()
        .to_lowercase()
        .trim_start_matches('.')
        .to_string()
}

/// Extension of the final component of `path`: the text after its last `.`.
///
/// Returns `None` when the component has no dot or ends with one.
/// Dot-files are treated as all-extension (`.htaccess` yields `htaccess`).
pub fn extension_of(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    let (_, suffix) = name.rsplit_once('.')?;
    if suffix.is_empty() {
        return None;
    }
    Some(suffix)
}

/// A single extension to content-type override.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Entry {
    pub extension: String,
    pub content_type: String,
}

impl Entry {
    pub fn new(extension: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            content_type: content_type.into(),
        }
    }

    /// Copy of this entry with the extension normalized and the content type trimmed.
    pub fn normalized(&self) -> Entry {
        Entry {
            extension: normalize_extension(&self.extension),
            content_type: self.content_type.trim().to_string(),
        }
    }

    /// True when both fields are non-empty. Only meaningful on normalized entries.
    pub fn is_valid(&self) -> bool {
        !self.extension.is_empty() && !self.content_type.is_empty()
    }

    /// Normalize and validate in one step.
    pub fn validated(&self) -> Result<Entry, EntryError> {
        validate_entry_input(&self.extension, &self.content_type)
    }
}

/// Validate raw form input for a new or edited override.
///
/// The extension is checked first, so an entry with both fields blank reports
/// [`EntryError::EmptyExtension`].
pub fn validate_entry_input(extension: &str, content_type: &str) -> Result<Entry, EntryError> {
    let extension = normalize_extension(extension);
    if extension.is_empty() {
        return Err(EntryError::EmptyExtension);
    }

    let content_type = content_type.trim();
    if content_type.is_empty() {
        return Err(EntryError::EmptyContentType);
    }

    Ok(Entry {
        extension,
        content_type: content_type.to_string(),
    })
}
