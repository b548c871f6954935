//! Snapshot backend implementations.

mod filesystem;
mod format;
mod memory;

pub use filesystem::FilesystemSnapshotStore;
pub use format::{SNAPSHOT_FORMAT_VERSION, decode_snapshot, encode_snapshot};
pub use memory::MemorySnapshotStore;
