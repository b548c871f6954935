//! Status CLI command.

use crate::Result;
use crate::models::{Disposition, DispositionCounts};
use crate::storage::SnapshotBackend;
use std::io::{self, Write};

/// Disposition counts for the primary and backup snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    /// Where the primary snapshot lives.
    pub location: String,
    /// Counts in the primary snapshot, `None` if there is none yet.
    pub current: Option<DispositionCounts>,
    /// Counts in the backup generation, `None` if there is none.
    pub backup: Option<DispositionCounts>,
}

impl StatusReport {
    /// Collects counts from `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if a snapshot exists but can't be read.
    pub fn collect(store: &dyn SnapshotBackend) -> Result<Self> {
        let current = match store.load() {
            Ok(dataset) => Some(dataset.counts()),
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e),
        };
        let backup = match store.load_backup() {
            Ok(dataset) => Some(dataset.counts()),
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e),
        };

        Ok(Self {
            location: store.describe(),
            current,
            backup,
        })
    }
}

fn write_counts<W: Write>(
    writer: &mut W,
    label: &str,
    counts: Option<&DispositionCounts>,
) -> io::Result<()> {
    let Some(c) = counts else {
        return writeln!(writer, "{label:<10}{:>8}", "-");
    };
    write!(writer, "{label:<10}{:>8}", c.total())?;
    for disposition in Disposition::all() {
        write!(writer, "{:>10}", c.get(*disposition))?;
    }
    writeln!(writer)
}

/// Writes a status report as a table to the given writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_status<W: Write>(writer: &mut W, report: &StatusReport) -> io::Result<()> {
    writeln!(writer, "Snapshot: {}", report.location)?;
    if report.current.is_none() {
        writeln!(writer, "No snapshot yet. Run `roster triage` to fetch one.")?;
    }
    write!(writer, "{:<10}{:>8}", "", "TOTAL")?;
    for disposition in Disposition::all() {
        write!(writer, "{:>10}", disposition.as_str().to_uppercase())?;
    }
    writeln!(writer)?;
    write_counts(writer, "current", report.current.as_ref())?;
    write_counts(writer, "backup", report.backup.as_ref())
}

/// Executes the status command.
///
/// # Errors
///
/// Returns an error if a snapshot can't be read or output fails.
pub fn cmd_status(store: &dyn SnapshotBackend) -> Result<StatusReport> {
    let report = StatusReport::collect(store)?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_status(&mut handle, &report).map_err(|e| crate::Error::operation("write_status", e))?;
    Ok(report)
}
