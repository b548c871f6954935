//! Snapshot storage.
//!
//! A snapshot is a whole-dataset serialization at one location, with the
//! previous generation kept at a second location:
//! - **Traits**: [`SnapshotBackend`], the seam the session commits through
//! - **Persistence**: filesystem and in-memory implementations

pub mod persistence;
pub mod traits;

pub use persistence::{
    FilesystemSnapshotStore, MemorySnapshotStore, SNAPSHOT_FORMAT_VERSION, decode_snapshot,
    encode_snapshot,
};
pub use traits::SnapshotBackend;
