//! # webmime-core
//!
//! Per-extension content-type overrides for a Web UI's static assets.
//!
//! - [`OverrideStore`]: the canonical mapping, persisted as a JSON document
//!   and queried by extension or by path.
//! - [`StagingModel`]: an editable copy of the mapping for one editing
//!   session, with validation, a dirty flag, change notifications and an
//!   explicit [`apply`](StagingModel::apply) step.
//! - [`normalize_extension`]: the normalization every comparison goes through.
//!
//! The store does not resolve default content types; callers fall back to
//! their own MIME database when a lookup returns `None`.

pub mod config;
pub mod entry;
pub mod error;
pub mod fs;
pub mod staging;
pub mod store;

pub use config::{CONFIG_FILE_NAME, MAX_CONFIG_FILE_SIZE, StoreConfig};
pub use entry::{Entry, extension_of, normalize_extension, validate_entry_input};
pub use error::{EntryError, StagingError, StoreError, StoreResult};
#[cfg(any(test, feature = "test-utils"))]
pub use fs::MockFileSystem;
pub use fs::{FileSystem, RealFileSystem};
pub use staging::{ApplyOutcome, Column, ModelEvent, StagingModel, SubscriptionId};
pub use store::{OverrideStore, OverridesMap};
