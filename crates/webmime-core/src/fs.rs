//! Filesystem abstraction for dependency injection into the override store.
//!
//! The store only needs three things from the filesystem: a size-capped
//! read of its JSON document, an atomic write of that document, and an
//! existence check for path lookups.
//!
//! ## Usage
//!
//! Production code uses `RealFileSystem`:
//!
//! ```ignore
//! let fs = RealFileSystem;
//! let bytes = fs.read_file(Path::new("webui_mime_types.json"), 128 * 1024)?;
//! ```
//!
//! Tests use `MockFileSystem` to simulate filesystem state and to observe writes:
//!
//! ```ignore
//! let mock = MockFileSystem::new();
//! mock.add_file("config/webui_mime_types.json", r#"{"png": "image/png"}"#);
//! assert_eq!(mock.write_count(), 0);
//! ```

use crate::error::{StoreError, StoreResult};
#[cfg(any(test, feature = "test-utils"))]
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
#[cfg(any(test, feature = "test-utils"))]
use std::{path::PathBuf, sync::RwLock};

/// Trait abstracting the filesystem operations the store performs.
pub trait FileSystem: Send + Sync + std::fmt::Debug {
    /// Read a whole file, refusing files larger than `limit` bytes.
    ///
    /// A missing file is reported as [`StoreError::NotFound`].
    fn read_file(&self, path: &Path, limit: u64) -> StoreResult<Vec<u8>>;

    /// Replace the file at `path` with `contents`, creating parent directories.
    ///
    /// Implementations must not leave a partially written file behind.
    fn write_file(&self, path: &Path, contents: &[u8]) -> StoreResult<()>;

    /// Check if a path exists (file or directory).
    fn exists(&self, path: &Path) -> bool;
}

/// Real filesystem implementation backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_file(&self, path: &Path, limit: u64) -> StoreResult<Vec<u8>> {
        let read_err = |source: io::Error| {
            if source.kind() == io::ErrorKind::NotFound {
                StoreError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                StoreError::FileRead {
                    path: path.to_path_buf(),
                    source,
                }
            }
        };
        let too_big = |size: u64| StoreError::FileTooBig {
            path: path.to_path_buf(),
            size,
            limit,
        };

        let file = File::open(path).map_err(read_err)?;
        let metadata = file.metadata().map_err(read_err)?;
        if metadata.len() > limit {
            return Err(too_big(metadata.len()));
        }

        // Metadata lies for pipes, device nodes and files still being written,
        // so the read itself is bounded too.
        let mut buf = Vec::new();
        file.take(limit.saturating_add(1))
            .read_to_end(&mut buf)
            .map_err(read_err)?;
        if buf.len() as u64 > limit {
            return Err(too_big(buf.len() as u64));
        }
        Ok(buf)
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> StoreResult<()> {
        let write_err = |source: io::Error| StoreError::FileWrite {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        // Write next to the target, then rename over it.
        let mut tmp_name = path.file_name().map(|n| n.to_os_string()).ok_or_else(|| {
            write_err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "path has no file name",
            ))
        })?;
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);

        std::fs::write(&tmp_path, contents).map_err(write_err)?;
        if let Err(e) = std::fs::rename(&tmp_path, path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(write_err(e));
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// In-memory filesystem for tests.
///
/// Uses interior mutability so that it can be shared with a store through
/// an `Arc` while the test keeps a handle to inspect writes. Available to
/// other crates through the `test-utils` feature.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Default)]
pub struct MockFileSystem {
    state: RwLock<MockState>,
}

#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Default)]
struct MockState {
    files: HashMap<PathBuf, Vec<u8>>,
    dirs: HashSet<PathBuf>,
    writes: usize,
    fail_writes: bool,
    unreadable: HashSet<PathBuf>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockFileSystem {
    /// Create a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with the given content. Parent directories are created.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl AsRef<[u8]>) {
        let path = normalize_path(path.as_ref());
        let mut state = self.state_mut();
        if let Some(parent) = path.parent() {
            add_dir_recursive(&mut state.dirs, parent);
        }
        state.files.insert(path, content.as_ref().to_vec());
    }

    /// Add an empty directory. Parent directories are created.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = normalize_path(path.as_ref());
        add_dir_recursive(&mut self.state_mut().dirs, &path);
    }

    /// Current content of a file, if present and valid UTF-8.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        let path = normalize_path(path.as_ref());
        let state = self.state_ref();
        state
            .files
            .get(&path)
            .and_then(|bytes| String::from_utf8(bytes.clone()).ok())
    }

    /// Number of successful `write_file` calls so far.
    pub fn write_count(&self) -> usize {
        self.state_ref().writes
    }

    /// Make every subsequent `write_file` fail with a permission error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.state_mut().fail_writes = fail;
    }

    /// Make reads of `path` fail with a permission error.
    pub fn set_unreadable(&self, path: impl AsRef<Path>) {
        let path = normalize_path(path.as_ref());
        self.state_mut().unreadable.insert(path);
    }

    fn state_ref(&self) -> std::sync::RwLockReadGuard<'_, MockState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn state_mut(&self) -> std::sync::RwLockWriteGuard<'_, MockState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl FileSystem for MockFileSystem {
    fn read_file(&self, path: &Path, limit: u64) -> StoreResult<Vec<u8>> {
        let normalized = normalize_path(path);
        let state = self.state_ref();
        if state.unreadable.contains(&normalized) {
            return Err(StoreError::FileRead {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "unreadable in mock"),
            });
        }

        let bytes = state
            .files
            .get(&normalized)
            .ok_or_else(|| StoreError::NotFound {
                path: path.to_path_buf(),
            })?;

        let size = bytes.len() as u64;
        if size > limit {
            return Err(StoreError::FileTooBig {
                path: path.to_path_buf(),
                size,
                limit,
            });
        }
        Ok(bytes.clone())
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> StoreResult<()> {
        let normalized = normalize_path(path);
        let mut state = self.state_mut();
        if state.fail_writes {
            return Err(StoreError::FileWrite {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only mock"),
            });
        }
        if let Some(parent) = normalized.parent() {
            add_dir_recursive(&mut state.dirs, parent);
        }
        state.files.insert(normalized, contents.to_vec());
        state.writes += 1;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let normalized = normalize_path(path);
        let state = self.state_ref();
        state.files.contains_key(&normalized) || state.dirs.contains(&normalized)
    }
}

#[cfg(any(test, feature = "test-utils"))]
fn add_dir_recursive(dirs: &mut HashSet<PathBuf>, path: &Path) {
    if path.as_os_str().is_empty() {
        return;
    }
    dirs.insert(path.to_path_buf());
    if let Some(parent) = path.parent() {
        add_dir_recursive(dirs, parent);
    }
}

#[cfg(any(test, feature = "test-utils"))]
/// Normalize a path for consistent comparison.
///
/// Removes `.` components and resolves `..` lexically.
fn normalize_path(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                result.pop();
            }
            Component::Normal(s) => result.push(s),
            Component::RootDir => result.push(component.as_os_str()),
            Component::Prefix(p) => result.push(p.as_os_str()),
        }
    }
    result
}
