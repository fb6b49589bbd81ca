//! Editable, validated working copy of the overrides.
//!
//! A [`StagingModel`] is created for one editing session. It copies the
//! store's overrides into an ordered list of rows, accepts add/update/remove
//! edits, and only touches the store again when [`StagingModel::apply`] is
//! called. Every mutation either succeeds completely or leaves the model
//! untouched and returns a [`StagingError`].
//!
//! Presentation layers read rows through [`StagingModel::row_count`] and
//! [`StagingModel::data`], and follow changes by subscribing to
//! [`ModelEvent`]s:
//!
//! ```
//! use webmime_core::{Entry, OverrideStore, StagingModel, StoreConfig};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut store = OverrideStore::open(StoreConfig::new(dir.path()));
//! let mut model = StagingModel::new(&store);
//!
//! model.add_entry(&Entry::new(".SVG", "image/svg+xml")).unwrap();
//! assert!(model.is_dirty());
//!
//! model.apply(&mut store);
//! assert_eq!(store.get()["svg"], "image/svg+xml");
//! ```

mod events;

pub use events::{ModelEvent, SubscriptionId};

use crate::entry::{Entry, normalize_extension};
use crate::error::StagingError;
use crate::store::{OverrideStore, OverridesMap};
use events::Listeners;

/// Column of the two-column override table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Extension,
    ContentType,
}

impl Column {
    pub const ALL: [Column; 2] = [Column::Extension, Column::ContentType];

    pub fn index(self) -> usize {
        match self {
            Column::Extension => 0,
            Column::ContentType => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Column> {
        Column::ALL.get(index).copied()
    }

    pub fn header(self) -> &'static str {
        match self {
            Column::Extension => "Extension",
            Column::ContentType => "Content type",
        }
    }
}

/// Result of [`StagingModel::apply`]. Both outcomes are successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Nothing was staged; the store was not touched.
    Unchanged,
    /// Staged rows were handed to the store.
    Committed,
}

/// Staged overrides for one editing session.
#[derive(Debug, Default)]
pub struct StagingModel {
    entries: Vec<Entry>,
    dirty: bool,
    listeners: Listeners,
}

impl StagingModel {
    /// Create a model holding a snapshot of `store`. The model starts clean.
    pub fn new(store: &OverrideStore) -> Self {
        let mut model = Self::default();
        model.load(store);
        model
    }

    /// Register a listener for row and dirty-flag changes.
    pub fn subscribe(&mut self, listener: impl FnMut(&ModelEvent) + 'static) -> SubscriptionId {
        self.listeners.subscribe(Box::new(listener))
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Discard staged edits and copy the store's current overrides,
    /// sorted by extension.
    pub fn load(&mut self, store: &OverrideStore) {
        self.entries = store
            .get()
            .iter()
            .map(|(extension, content_type)| Entry::new(extension, content_type))
            .collect();
        self.entries
            .sort_by(|left, right| left.extension.cmp(&right.extension));

        self.listeners.emit(ModelEvent::Reset);
        self.set_dirty(false);
    }

    /// Commit staged rows to `store` if anything changed since the last load
    /// or apply.
    ///
    /// Persistence problems are handled (and logged) by the store, so this
    /// never fails.
    pub fn apply(&mut self, store: &mut OverrideStore) -> ApplyOutcome {
        if !self.dirty {
            return ApplyOutcome::Unchanged;
        }

        let overrides: OverridesMap = self
            .entries
            .iter()
            .map(|entry| (entry.extension.clone(), entry.content_type.clone()))
            .collect();
        store.set(overrides);

        self.set_dirty(false);
        ApplyOutcome::Committed
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Append a new override. Returns the row it was placed at.
    pub fn add_entry(&mut self, entry: &Entry) -> Result<usize, StagingError> {
        let normalized = entry.validated()?;
        if self.has_extension(&normalized.extension, None) {
            return Err(StagingError::DuplicateExtension(normalized.extension));
        }

        let row = self.entries.len();
        self.entries.push(normalized);
        self.listeners.emit(ModelEvent::RowsInserted {
            first: row,
            last: row,
        });
        self.set_dirty(true);
        Ok(row)
    }

    /// Replace the override at `row`.
    ///
    /// The row itself is excluded from the duplicate check, so changing only
    /// the content type always succeeds.
    pub fn update_entry(&mut self, row: usize, entry: &Entry) -> Result<(), StagingError> {
        if row >= self.entries.len() {
            return Err(StagingError::RowOutOfRange {
                row,
                len: self.entries.len(),
            });
        }

        let normalized = entry.validated()?;
        if self.has_extension(&normalized.extension, Some(row)) {
            return Err(StagingError::DuplicateExtension(normalized.extension));
        }

        self.entries[row] = normalized;
        self.listeners.emit(ModelEvent::RowsChanged {
            first: row,
            last: row,
        });
        self.set_dirty(true);
        Ok(())
    }

    /// Remove `count` rows starting at `row`.
    pub fn remove_rows(&mut self, row: usize, count: usize) -> Result<(), StagingError> {
        let len = self.entries.len();
        let end = row.checked_add(count).filter(|end| *end <= len);
        let end = match end {
            Some(end) if count > 0 => end,
            _ => return Err(StagingError::InvalidRange { row, count, len }),
        };

        self.entries.drain(row..end);
        self.listeners.emit(ModelEvent::RowsRemoved {
            first: row,
            last: end - 1,
        });
        self.set_dirty(true);
        Ok(())
    }

    pub fn entry_at(&self, row: usize) -> Option<&Entry> {
        self.entries.get(row)
    }

    /// True if a row other than `ignore_row` holds `extension`.
    ///
    /// `extension` is normalized before comparing.
    pub fn has_extension(&self, extension: &str, ignore_row: Option<usize>) -> bool {
        let extension = normalize_extension(extension);
        self.entries
            .iter()
            .enumerate()
            .any(|(row, entry)| Some(row) != ignore_row && entry.extension == extension)
    }

    /// Row holding `extension`, if any.
    pub fn find_row(&self, extension: &str) -> Option<usize> {
        let extension = normalize_extension(extension);
        self.entries
            .iter()
            .position(|entry| entry.extension == extension)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn row_count(&self) -> usize {
        self.entries.len()
    }

    pub fn column_count(&self) -> usize {
        Column::ALL.len()
    }

    /// Display text for a cell. Extensions are shown with a leading dot.
    pub fn data(&self, row: usize, column: Column) -> Option<String> {
        let entry = self.entries.get(row)?;
        match column {
            Column::Extension if entry.extension.is_empty() => Some(String::new()),
            Column::Extension => Some(format!(".{}", entry.extension)),
            Column::ContentType => Some(entry.content_type.clone()),
        }
    }

    pub fn header(&self, column: Column) -> &'static str {
        column.header()
    }

    fn set_dirty(&mut self, dirty: bool) {
        if self.dirty == dirty {
            return;
        }
        self.dirty = dirty;
        self.listeners.emit(ModelEvent::DirtyChanged(dirty));
    }
}
