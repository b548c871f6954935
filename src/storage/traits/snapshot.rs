//! Snapshot backend trait.

use crate::Result;
use crate::models::Dataset;

/// Trait for snapshot backends.
///
/// A backend holds one primary snapshot and at most one backup generation.
/// Everything runs on a single thread, so implementations may use interior
/// mutability without locking.
pub trait SnapshotBackend {
    /// Loads the primary snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if no primary snapshot exists, or
    /// [`crate::Error::OperationFailed`] if it cannot be read or decoded.
    fn load(&self) -> Result<Dataset>;

    /// Loads the backup generation.
    ///
    /// # Errors
    ///
    /// Same as [`SnapshotBackend::load`], for the backup location.
    fn load_backup(&self) -> Result<Dataset>;

    /// Rotates the current primary into the backup slot and writes `dataset`
    /// as the new primary.
    ///
    /// After success the backup holds the pre-call primary, or is absent if
    /// there was no primary before the call.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OperationFailed`] if any step fails. A failure
    /// after the rotation leaves the last committed state at the backup
    /// location.
    fn save(&self, dataset: &Dataset) -> Result<()>;

    /// Human-readable location of the primary snapshot.
    fn describe(&self) -> String;

    /// Checks whether a primary snapshot exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the check itself fails for a reason other than the
    /// snapshot being absent.
    fn exists(&self) -> Result<bool> {
        match self.load() {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
