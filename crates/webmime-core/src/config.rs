//! Store configuration: where the overrides document lives and how large it may be.

use std::path::{Path, PathBuf};

/// File name of the overrides document inside the configuration directory.
pub const CONFIG_FILE_NAME: &str = "webui_mime_types.json";

/// Documents larger than this are ignored on load.
pub const MAX_CONFIG_FILE_SIZE: u64 = 128 * 1024;

/// Application directory created under the platform configuration directory.
pub const APP_DIR_NAME: &str = "webmime";

/// Location and limits for an [`OverrideStore`](crate::OverrideStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    config_dir: PathBuf,
    file_name: String,
    max_file_size: u64,
}

impl StoreConfig {
    /// Configuration rooted at `config_dir`, with the default file name and size cap.
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            file_name: CONFIG_FILE_NAME.to_string(),
            max_file_size: MAX_CONFIG_FILE_SIZE,
        }
    }

    /// Configuration rooted at the platform configuration directory
    /// (for example `~/.config/webmime` on Linux).
    ///
    /// Returns `None` when the platform has no configuration directory.
    #[cfg(feature = "platform-dirs")]
    pub fn from_platform_dirs() -> Option<Self> {
        dirs::config_dir().map(|dir| Self::new(dir.join(APP_DIR_NAME)))
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Full path of the overrides document.
    pub fn path(&self) -> PathBuf {
        self.config_dir.join(&self.file_name)
    }
}
