//! Filesystem snapshot backend.
//!
//! Stores the dataset as one JSON snapshot file, keeping the previous
//! generation in a second file.
//!
//! # Commit protocol
//!
//! 1. The dataset is encoded in memory and written to a temp file next to the
//!    primary, then fsynced. Nothing visible has changed yet.
//! 2. An existing backup is deleted.
//! 3. An existing primary is renamed to the backup location.
//! 4. The temp file is renamed onto the primary location.
//!
//! A reader never sees a half-written primary. If step 4 fails the primary is
//! missing, but the last committed state is intact at the backup location.

use super::format::{decode_snapshot, encode_snapshot};
use crate::models::Dataset;
use crate::storage::traits::SnapshotBackend;
use crate::{Error, Result};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Maximum snapshot size accepted on load (64 MiB).
/// Prevents memory exhaustion from a corrupted or foreign file.
const MAX_SNAPSHOT_SIZE: u64 = 64 * 1024 * 1024;

/// Filesystem-based snapshot backend.
#[derive(Debug, Clone)]
pub struct FilesystemSnapshotStore {
    /// Location of the current snapshot.
    primary: PathBuf,
    /// Location of the previous generation.
    backup: PathBuf,
}

impl FilesystemSnapshotStore {
    /// Creates a store over the given primary and backup locations.
    ///
    /// Nothing is touched on disk until the first save.
    pub fn new(primary: impl Into<PathBuf>, backup: impl Into<PathBuf>) -> Self {
        Self {
            primary: primary.into(),
            backup: backup.into(),
        }
    }

    /// Returns the primary snapshot path.
    #[must_use]
    pub fn primary_path(&self) -> &Path {
        &self.primary
    }

    /// Returns the backup snapshot path.
    #[must_use]
    pub fn backup_path(&self) -> &Path {
        &self.backup
    }

    /// Reads and decodes the snapshot at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `path` doesn't exist, or
    /// [`Error::OperationFailed`] if it can't be read or decoded.
    pub fn read_snapshot(path: &Path) -> Result<Dataset> {
        let metadata = match fs::metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::NotFound {
                    path: path.to_path_buf(),
                });
            },
            Err(e) => {
                return Err(Error::operation(
                    "read_snapshot_metadata",
                    format!("{}: {e}", path.display()),
                ));
            },
        };

        if metadata.len() > MAX_SNAPSHOT_SIZE {
            return Err(Error::operation(
                "read_snapshot",
                format!(
                    "{} exceeds maximum snapshot size of {MAX_SNAPSHOT_SIZE} bytes",
                    path.display()
                ),
            ));
        }

        let bytes = fs::read(path)
            .map_err(|e| Error::operation("read_snapshot", format!("{}: {e}", path.display())))?;

        decode_snapshot(&bytes)
    }

    /// Returns the directory a file lives in, treating a bare filename as the
    /// current directory.
    fn parent_dir(path: &Path) -> &Path {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Checks whether `path` exists, surfacing permission and I/O errors
    /// instead of reporting them as absence.
    fn path_exists(path: &Path) -> Result<bool> {
        path.try_exists()
            .map_err(|e| Error::operation("stat_snapshot", format!("{}: {e}", path.display())))
    }

    /// Writes `bytes` to a synced temp file in the primary's directory.
    fn stage(&self, bytes: &[u8]) -> Result<NamedTempFile> {
        let dir = Self::parent_dir(&self.primary);
        fs::create_dir_all(dir)
            .map_err(|e| Error::operation("create_snapshot_dir", format!("{}: {e}", dir.display())))?;

        let mut tmp = NamedTempFile::new_in(dir)
            .map_err(|e| Error::operation("create_temp_snapshot", e))?;
        tmp.write_all(bytes)
            .map_err(|e| Error::operation("write_temp_snapshot", e))?;
        tmp.flush()
            .map_err(|e| Error::operation("flush_temp_snapshot", e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| Error::operation("fsync_temp_snapshot", e))?;
        Ok(tmp)
    }

    /// Moves the current primary into the backup slot.
    fn rotate_backup(&self) -> Result<()> {
        match fs::remove_file(&self.backup) {
            Ok(()) => tracing::debug!(path = %self.backup.display(), "Removed previous backup"),
            Err(e) if e.kind() == ErrorKind::NotFound => {},
            Err(e) => {
                return Err(Error::operation(
                    "remove_backup_snapshot",
                    format!("{}: {e}", self.backup.display()),
                ));
            },
        }

        if !Self::path_exists(&self.primary)? {
            return Ok(());
        }

        let backup_dir = Self::parent_dir(&self.backup);
        fs::create_dir_all(backup_dir).map_err(|e| {
            Error::operation("create_backup_dir", format!("{}: {e}", backup_dir.display()))
        })?;

        fs::rename(&self.primary, &self.backup).map_err(|e| {
            Error::operation(
                "rotate_snapshot",
                format!(
                    "{} -> {}: {e}",
                    self.primary.display(),
                    self.backup.display()
                ),
            )
        })?;
        tracing::debug!(
            from = %self.primary.display(),
            to = %self.backup.display(),
            "Rotated primary snapshot into backup"
        );
        Ok(())
    }
}

impl SnapshotBackend for FilesystemSnapshotStore {
    fn load(&self) -> Result<Dataset> {
        let dataset = Self::read_snapshot(&self.primary)?;
        tracing::debug!(
            path = %self.primary.display(),
            records = dataset.len(),
            "Loaded snapshot"
        );
        Ok(dataset)
    }

    fn load_backup(&self) -> Result<Dataset> {
        Self::read_snapshot(&self.backup)
    }

    fn save(&self, dataset: &Dataset) -> Result<()> {
        // Encoding and staging happen before anything on disk is rotated.
        let bytes = encode_snapshot(dataset)?;
        let staged = self.stage(&bytes)?;

        self.rotate_backup()?;

        staged.persist(&self.primary).map_err(|e| {
            Error::operation(
                "persist_snapshot",
                format!("{}: {}", self.primary.display(), e.error),
            )
        })?;

        tracing::info!(
            path = %self.primary.display(),
            records = dataset.len(),
            "Saved snapshot"
        );
        Ok(())
    }

    fn describe(&self) -> String {
        self.primary.display().to_string()
    }

    fn exists(&self) -> Result<bool> {
        Self::path_exists(&self.primary)
    }
}
