//! Integration tests for roster.
#![allow(clippy::unwrap_used)]

use roster::Error;
use roster::cli::{StatusReport, cmd_import, write_status};
use roster::directory::fixture_dataset;
use roster::{Dataset, FilesystemSnapshotStore, Record, SnapshotBackend};
use std::path::PathBuf;

#[test]
fn test_error_types() {
    let err = Error::InvalidInput("bad pattern".to_string());
    let display = format!("{err}");
    assert!(display.contains("invalid input"));
    assert!(display.contains("bad pattern"));

    let err = Error::OperationFailed {
        operation: "save_snapshot".to_string(),
        cause: "disk full".to_string(),
    };
    let display = format!("{err}");
    assert!(display.contains("save_snapshot"));
    assert!(display.contains("disk full"));

    let err = Error::NotFound {
        path: PathBuf::from("data/recursers.json"),
    };
    assert!(err.is_not_found());
    assert!(format!("{err}").contains("data/recursers.json"));
}

#[test]
fn test_import_then_status() {
    let dir = tempfile::tempdir().unwrap();
    let source_path = dir.path().join("export.json");
    FilesystemSnapshotStore::new(&source_path, dir.path().join("export_backup.json"))
        .save(&fixture_dataset())
        .unwrap();

    let store = FilesystemSnapshotStore::new(
        dir.path().join("current.json"),
        dir.path().join("backup.json"),
    );
    store
        .save(&Dataset::new(vec![Record::new("9999-new-person", "New")]))
        .unwrap();

    let report = cmd_import(&store, &source_path).unwrap();
    assert_eq!(report.added, 4);

    let status = StatusReport::collect(&store).unwrap();
    assert_eq!(status.current.unwrap().total(), 5);
    assert_eq!(status.backup.unwrap().total(), 1);

    let mut out = Vec::new();
    write_status(&mut out, &status).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("current.json"));
}

#[test]
fn test_snapshot_file_is_versioned_json() {
    let dir = tempfile::tempdir().unwrap();
    let store = FilesystemSnapshotStore::new(
        dir.path().join("current.json"),
        dir.path().join("backup.json"),
    );
    store.save(&fixture_dataset()).unwrap();

    let raw: serde_json::Value =
        serde_json::from_slice(&std::fs::read(store.primary_path()).unwrap()).unwrap();
    assert_eq!(raw["format_version"], 1);
    assert_eq!(raw["records"].as_array().unwrap().len(), 4);
    assert_eq!(raw["records"][2]["disposition"], "snoozed");
}
