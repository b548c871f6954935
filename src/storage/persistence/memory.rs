//! In-memory snapshot backend.
//!
//! Used by offline debug mode, where nothing may touch the disk, and by
//! tests that need to observe exactly what was committed.

use crate::models::Dataset;
use crate::storage::traits::SnapshotBackend;
use crate::{Error, Result};
use std::cell::{Cell, RefCell};
use std::path::PathBuf;

/// Snapshot backend holding both generations in memory.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    primary: RefCell<Option<Dataset>>,
    backup: RefCell<Option<Dataset>>,
    saves: Cell<usize>,
}

impl MemorySnapshotStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose primary snapshot is already `dataset`.
    #[must_use]
    pub fn with_primary(dataset: Dataset) -> Self {
        Self {
            primary: RefCell::new(Some(dataset)),
            ..Self::default()
        }
    }

    /// Current primary generation, if any.
    #[must_use]
    pub fn primary(&self) -> Option<Dataset> {
        self.primary.borrow().clone()
    }

    /// Current backup generation, if any.
    #[must_use]
    pub fn backup(&self) -> Option<Dataset> {
        self.backup.borrow().clone()
    }

    /// Number of successful saves.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    fn not_found(slot: &str) -> Error {
        Error::NotFound {
            path: PathBuf::from(format!("memory://{slot}")),
        }
    }
}

impl SnapshotBackend for MemorySnapshotStore {
    fn load(&self) -> Result<Dataset> {
        self.primary().ok_or_else(|| Self::not_found("primary"))
    }

    fn load_backup(&self) -> Result<Dataset> {
        self.backup().ok_or_else(|| Self::not_found("backup"))
    }

    fn save(&self, dataset: &Dataset) -> Result<()> {
        let previous = self.primary.replace(Some(dataset.clone()));
        *self.backup.borrow_mut() = previous;
        self.saves.set(self.saves.get() + 1);
        tracing::debug!(records = dataset.len(), "Saved in-memory snapshot");
        Ok(())
    }

    fn describe(&self) -> String {
        "memory://primary".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Record;

    #[test]
    fn test_rotation_matches_filesystem_semantics() {
        let store = MemorySnapshotStore::new();
        assert!(store.load().unwrap_err().is_not_found());
        assert!(!store.exists().unwrap());

        let d1 = Dataset::new(vec![Record::new("a", "A")]);
        let d2 = Dataset::new(vec![Record::new("b", "B")]);

        store.save(&d1).unwrap();
        assert!(store.backup().is_none());

        store.save(&d2).unwrap();
        assert_eq!(store.load().unwrap(), d2);
        assert_eq!(store.load_backup().unwrap(), d1);
        assert_eq!(store.save_count(), 2);
    }

    #[test]
    fn test_with_primary() {
        let d = Dataset::new(vec![Record::new("a", "A")]);
        let store = MemorySnapshotStore::with_primary(d.clone());
        assert_eq!(store.load().unwrap(), d);
        assert_eq!(store.save_count(), 0);
        assert!(store.exists().unwrap());
    }
}
