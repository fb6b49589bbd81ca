//! The canonical, persisted extension → content-type override mapping.
//!
//! ## Persistence
//!
//! Overrides live in a single JSON object (see [`StoreConfig::path`]) whose
//! keys are normalized extensions and whose values are content types:
//!
//! ```json
//! {
//!   "jpg": "image/jpeg",
//!   "png": "image/png"
//! }
//! ```
//!
//! Loading never fails. A missing document is an empty store; an oversized,
//! unreadable, malformed or non-object document is logged at warning level
//! and also treated as empty. Saving happens synchronously on every accepted
//! [`OverrideStore::set`]; a failed save is logged and the in-memory mapping
//! is kept.
//!
//! The store has no internal locking. `set` takes `&mut self`, so sharing a
//! store across threads requires wrapping it in a mutex.

use crate::config::StoreConfig;
use crate::entry::{Entry, extension_of, normalize_extension};
use crate::error::{StoreError, StoreResult};
use crate::fs::{FileSystem, RealFileSystem};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Normalized extension → trimmed content type, ordered by extension.
pub type OverridesMap = BTreeMap<String, String>;

/// Persistent store of per-extension content-type overrides.
#[derive(Debug)]
pub struct OverrideStore {
    config: StoreConfig,
    fs: Arc<dyn FileSystem>,
    overrides: OverridesMap,
}

impl OverrideStore {
    /// Open the store described by `config` on the real filesystem.
    pub fn open(config: StoreConfig) -> Self {
        Self::with_fs(config, Arc::new(RealFileSystem))
    }

    /// Open the store with a custom filesystem implementation.
    pub fn with_fs(config: StoreConfig, fs: Arc<dyn FileSystem>) -> Self {
        let overrides = load_or_empty(fs.as_ref(), &config);
        Self {
            config,
            fs,
            overrides,
        }
    }

    /// Current overrides. Keys and values are already normalized.
    pub fn get(&self) -> &OverridesMap {
        &self.overrides
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Path of the persisted document.
    pub fn path(&self) -> PathBuf {
        self.config.path()
    }

    /// Replace all overrides with `candidate`.
    ///
    /// Keys are normalized and values trimmed; pairs that end up empty are
    /// dropped and later duplicates win. If the result equals the current
    /// mapping nothing happens. Otherwise the mapping is replaced and saved.
    ///
    /// Returns `true` when the in-memory mapping changed, whether or not the
    /// save succeeded.
    pub fn set<I, K, V>(&mut self, candidate: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let normalized = normalize_overrides(candidate);
        if normalized == self.overrides {
            tracing::trace!("overrides unchanged, skipping save");
            return false;
        }

        self.overrides = normalized;
        self.store();
        true
    }

    /// Override for `extension`, which may carry leading dots or capitals.
    pub fn lookup_by_extension(&self, extension: &str) -> Option<Entry> {
        let extension = normalize_extension(extension);
        if extension.is_empty() {
            return None;
        }

        let content_type = self.overrides.get(&extension)?.clone();
        Some(Entry {
            extension,
            content_type,
        })
    }

    /// Override for the file at `path`.
    ///
    /// Only existing paths are considered: a path that does not exist yields
    /// `None` even if its extension has an override.
    pub fn lookup_by_path(&self, path: &Path) -> Option<Entry> {
        if !self.fs.exists(path) {
            return None;
        }
        self.lookup_by_extension(extension_of(path)?)
    }

    /// Discard the in-memory mapping and read the document again.
    pub fn reload(&mut self) {
        self.overrides = load_or_empty(self.fs.as_ref(), &self.config);
    }

    fn store(&self) {
        let path = self.config.path();
        let result = serialize_overrides(&self.overrides)
            .and_then(|data| self.fs.write_file(&path, data.as_bytes()));

        match result {
            Ok(()) => tracing::debug!(
                path = %path.display(),
                entries = self.overrides.len(),
                "stored WebUI MIME overrides"
            ),
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "Couldn't store WebUI MIME overrides"
            ),
        }
    }
}

/// Normalize a candidate mapping: keys through [`normalize_extension`],
/// values trimmed, empty pairs dropped, last duplicate wins.
pub fn normalize_overrides<I, K, V>(candidate: I) -> OverridesMap
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut normalized = OverridesMap::new();
    for (extension, content_type) in candidate {
        let extension = normalize_extension(extension.as_ref());
        let content_type = content_type.as_ref().trim();
        if extension.is_empty() || content_type.is_empty() {
            continue;
        }
        normalized.insert(extension, content_type.to_string());
    }
    normalized
}

/// Parse an overrides document.
///
/// Non-string values count as empty content types and are dropped with
/// the other invalid pairs.
pub fn parse_overrides(path: &Path, data: &[u8]) -> StoreResult<OverridesMap> {
    // Editors on some platforms save JSON with a UTF-8 byte order mark.
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let document: Value = serde_json::from_slice(data).map_err(|e| StoreError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;

    let Value::Object(object) = document else {
        return Err(StoreError::InvalidFormat {
            path: path.to_path_buf(),
        });
    };

    Ok(normalize_overrides(
        object
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str().unwrap_or_default())),
    ))
}

/// Render overrides as a pretty-printed JSON object with sorted keys.
pub fn serialize_overrides(overrides: &OverridesMap) -> StoreResult<String> {
    let mut data = serde_json::to_string_pretty(overrides).map_err(StoreError::Serialize)?;
    data.push('\n');
    Ok(data)
}

fn read_overrides(fs: &dyn FileSystem, config: &StoreConfig) -> StoreResult<OverridesMap> {
    let path = config.path();
    let data = fs.read_file(&path, config.max_file_size())?;
    parse_overrides(&path, &data)
}

fn load_or_empty(fs: &dyn FileSystem, config: &StoreConfig) -> OverridesMap {
    match read_overrides(fs, config) {
        Ok(overrides) => {
            tracing::debug!(
                path = %config.path().display(),
                entries = overrides.len(),
                "loaded WebUI MIME overrides"
            );
            overrides
        }
        Err(e) if e.is_not_found() => OverridesMap::new(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load WebUI MIME overrides");
            OverridesMap::new()
        }
    }
}
