//! # Roster
//!
//! Triage a community directory roster one person at a time.
//!
//! Roster keeps a flat table of directory profiles, each carrying a
//! disposition (messaged, snoozed, ignored, or not yet rated). An interactive
//! session walks the unrated or snoozed people, most recently active first,
//! and commits the ratings back to a snapshot file that always keeps the
//! previous generation as a backup.
//!
//! ## Features
//!
//! - Merge freshly fetched profiles without touching existing ratings
//! - Snapshot persistence with one-generation backup rotation
//! - Temp-file-then-rename writes so the primary snapshot is never half written
//! - Offline debug mode backed by in-memory fixtures
//!
//! ## Example
//!
//! ```rust
//! use roster::{Dataset, Disposition, Record};
//!
//! let existing = Dataset::new(vec![
//!     Record::new("3890-ben-lerner", "Ben").with_disposition(Disposition::Ignored),
//! ]);
//! let incoming = Dataset::new(vec![
//!     Record::new("3890-ben-lerner", "Ben"),
//!     Record::new("6942-anonymous-person", "Anonymous"),
//! ]);
//!
//! let merged = existing.merge(incoming);
//! assert_eq!(merged.len(), 2);
//! assert_eq!(merged.records()[0].disposition, Disposition::Ignored);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;
use thiserror::Error as ThisError;

// Module declarations
pub mod cli;
pub mod config;
pub mod directory;
pub mod models;
pub mod observability;
pub mod session;
pub mod storage;

// Re-exports for convenience
pub use config::RosterConfig;
pub use directory::{DirectoryFetcher, FixtureFetcher, ProfileFilter, RecurseDirectoryClient};
pub use models::{Dataset, Disposition, DispositionCounts, MergeReport, Record, Slug};
pub use session::{SessionOutcome, TriageSession};
pub use storage::{FilesystemSnapshotStore, MemorySnapshotStore, SnapshotBackend};

/// Error type for roster operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `NotFound` | The primary (or backup) snapshot file does not exist |
/// | `OperationFailed` | Filesystem errors, HTTP failures, undecodable snapshots |
/// | `InvalidInput` | Malformed filter expressions, unknown slugs, bad config values |
#[derive(Debug, ThisError)]
pub enum Error {
    /// The expected snapshot does not exist.
    ///
    /// Recoverable: the session offers to bootstrap from the directory, and
    /// declining exits cleanly.
    #[error("snapshot not found: {}", path.display())]
    NotFound {
        /// Location that was looked up.
        path: PathBuf,
    },

    /// An operation failed.
    ///
    /// Raised when:
    /// - Snapshot files cannot be read, renamed, removed, or written
    /// - A snapshot cannot be decoded or has an unknown format version
    /// - The directory API is unreachable or returns an error status
    /// - Reading from the terminal fails or hits end of input
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - A filter expression is not a valid regular expression
    /// - A disposition update names a slug that is not in the dataset
    /// - A configuration value cannot be parsed
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Builds an [`Error::OperationFailed`] from any displayable cause.
    pub fn operation(operation: &str, cause: impl std::fmt::Display) -> Self {
        Self::OperationFailed {
            operation: operation.to_string(),
            cause: cause.to_string(),
        }
    }

    /// Returns `true` for [`Error::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type alias for roster operations.
pub type Result<T> = std::result::Result<T, Error>;
