//! Import CLI command.
//!
//! Merges the records of another snapshot file into the current snapshot,
//! the offline counterpart of a directory update.

use crate::Result;
use crate::models::{Dataset, MergeReport};
use crate::storage::{FilesystemSnapshotStore, SnapshotBackend};
use std::path::Path;

/// Merges the snapshot at `source` into `store` and commits the result.
///
/// A missing current snapshot counts as empty, so importing into a fresh
/// location bootstraps it. Existing ratings are never overwritten.
///
/// # Errors
///
/// Returns [`crate::Error::NotFound`] if `source` doesn't exist, or an
/// operation error if either snapshot can't be read or the commit fails.
pub fn cmd_import(store: &dyn SnapshotBackend, source: &Path) -> Result<MergeReport> {
    let incoming = FilesystemSnapshotStore::read_snapshot(source)?;
    let mut current = match store.load() {
        Ok(dataset) => dataset,
        Err(e) if e.is_not_found() => Dataset::empty(),
        Err(e) => return Err(e),
    };

    let report = current.merge_in_place(incoming);
    store.save(&current)?;

    tracing::info!(
        source = %source.display(),
        added = report.added,
        already_known = report.already_known,
        "Imported snapshot"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::fixture_dataset;
    use crate::models::{Disposition, Record, Slug};
    use crate::storage::MemorySnapshotStore;

    fn write_source(dir: &tempfile::TempDir, dataset: &Dataset) -> std::path::PathBuf {
        let path = dir.path().join("incoming.json");
        let source = FilesystemSnapshotStore::new(&path, dir.path().join("unused.json"));
        source.save(dataset).unwrap();
        path
    }

    #[test]
    fn test_import_adds_new_and_keeps_ratings() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(
            &dir,
            &Dataset::new(vec![
                Record::new("3858-christine-jiang", "Christine"),
                Record::new("6942-anonymous-person", "Anonymous"),
            ]),
        );
        let store = MemorySnapshotStore::with_primary(fixture_dataset());

        let report = cmd_import(&store, &source).unwrap();

        assert_eq!(report.added, 1);
        assert_eq!(report.already_known, 1);
        let saved = store.primary().unwrap();
        assert_eq!(saved.len(), 5);
        let christine = saved.get(&Slug::new("3858-christine-jiang")).unwrap();
        assert_eq!(christine.disposition, Disposition::Snoozed);
        assert_eq!(store.backup().unwrap(), fixture_dataset());
    }

    #[test]
    fn test_import_into_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(&dir, &fixture_dataset());
        let store = MemorySnapshotStore::new();

        let report = cmd_import(&store, &source).unwrap();

        assert_eq!(report.added, 4);
        assert_eq!(store.primary().unwrap(), fixture_dataset());
        assert!(store.backup().is_none());
    }

    #[test]
    fn test_import_missing_source_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemorySnapshotStore::with_primary(fixture_dataset());

        let err = cmd_import(&store, &dir.path().join("absent.json")).unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(store.save_count(), 0);
    }
}
