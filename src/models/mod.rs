//! Data models for roster.
//!
//! A [`Record`] is one directory entry with a [`Disposition`]; a [`Dataset`]
//! is the ordered table of records that the session triages and the snapshot
//! store persists.

mod dataset;
mod record;

pub use dataset::{Dataset, DispositionCounts, MergeReport};
pub use record::{Disposition, Record, Slug};
