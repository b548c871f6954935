//! The rated table of directory records.

use super::{Disposition, Record, Slug};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An ordered collection of records keyed by slug.
///
/// Order carries no meaning beyond display, which is re-derived by the
/// filters. Slugs are unique within a dataset built through [`Dataset::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<Record>,
}

/// Outcome of merging an incoming dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Incoming records appended because their slug was new.
    pub added: usize,
    /// Incoming records skipped because the slug was already present.
    pub already_known: usize,
}

/// Number of records per disposition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispositionCounts {
    /// Records never rated.
    pub unrated: usize,
    /// Records marked messaged.
    pub messaged: usize,
    /// Records snoozed.
    pub snoozed: usize,
    /// Records ignored.
    pub ignored: usize,
}

impl DispositionCounts {
    /// Total number of records counted.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.unrated + self.messaged + self.snoozed + self.ignored
    }

    /// Count for a single disposition.
    #[must_use]
    pub const fn get(&self, disposition: Disposition) -> usize {
        match disposition {
            Disposition::Unrated => self.unrated,
            Disposition::Messaged => self.messaged,
            Disposition::Snoozed => self.snoozed,
            Disposition::Ignored => self.ignored,
        }
    }
}

impl Dataset {
    /// Creates a dataset from records, keeping their order.
    #[must_use]
    pub const fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Creates an empty dataset.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in stored order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Iterates records in stored order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Looks up a record by slug.
    #[must_use]
    pub fn get(&self, slug: &Slug) -> Option<&Record> {
        self.records.iter().find(|r| &r.slug == slug)
    }

    /// Returns `true` if a record with this slug exists.
    #[must_use]
    pub fn contains(&self, slug: &Slug) -> bool {
        self.get(slug).is_some()
    }

    /// Counts records per disposition.
    #[must_use]
    pub fn counts(&self) -> DispositionCounts {
        self.records
            .iter()
            .fold(DispositionCounts::default(), |mut acc, r| {
                match r.disposition {
                    Disposition::Unrated => acc.unrated += 1,
                    Disposition::Messaged => acc.messaged += 1,
                    Disposition::Snoozed => acc.snoozed += 1,
                    Disposition::Ignored => acc.ignored += 1,
                }
                acc
            })
    }

    /// Records that have not been rated yet, most recently active first.
    #[must_use]
    pub fn filter_unrated(&self) -> Vec<&Record> {
        self.filter_by(Disposition::Unrated)
    }

    /// Snoozed records, most recently active first.
    #[must_use]
    pub fn filter_snoozed(&self) -> Vec<&Record> {
        self.filter_by(Disposition::Snoozed)
    }

    /// Records with the given disposition, sorted by `most_recent_activity`
    /// descending.
    ///
    /// Records without an activity date come last. The sort is stable, so ties
    /// keep their stored order.
    #[must_use]
    pub fn filter_by(&self, disposition: Disposition) -> Vec<&Record> {
        let mut selected: Vec<&Record> = self
            .records
            .iter()
            .filter(|r| r.disposition == disposition)
            .collect();
        // Option orders None below Some, so a descending sort puts None last.
        selected.sort_by(|a, b| b.most_recent_activity.cmp(&a.most_recent_activity));
        selected
    }

    /// Updates the disposition of one record and returns the previous value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if no record has this slug.
    pub fn set_disposition(&mut self, slug: &Slug, disposition: Disposition) -> Result<Disposition> {
        let record = self
            .records
            .iter_mut()
            .find(|r| &r.slug == slug)
            .ok_or_else(|| Error::InvalidInput(format!("no record with slug '{slug}'")))?;
        let previous = record.disposition;
        record.disposition = disposition;
        Ok(previous)
    }

    /// Merges `incoming` into this dataset and returns the result.
    ///
    /// See [`Dataset::merge_in_place`].
    #[must_use]
    pub fn merge(mut self, incoming: Self) -> Self {
        self.merge_in_place(incoming);
        self
    }

    /// Appends every incoming record whose slug is not already present.
    ///
    /// Existing records keep their position and every field, disposition
    /// included, whatever the incoming copy says. New records follow in
    /// incoming order. A slug appended earlier in the same merge counts as
    /// present, so the first incoming occurrence wins. Merging the same
    /// incoming dataset twice adds nothing the second time.
    pub fn merge_in_place(&mut self, incoming: Self) -> MergeReport {
        let mut known: HashSet<Slug> = self.records.iter().map(|r| r.slug.clone()).collect();
        let mut report = MergeReport::default();

        for record in incoming.records {
            if known.contains(&record.slug) {
                report.already_known += 1;
                continue;
            }
            known.insert(record.slug.clone());
            self.records.push(record);
            report.added += 1;
        }

        tracing::debug!(
            added = report.added,
            already_known = report.already_known,
            total = self.records.len(),
            "Merged incoming records"
        );
        report
    }
}

impl From<Vec<Record>> for Dataset {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for Dataset {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(slug: &str, name: &str, disposition: Disposition, day: Option<NaiveDate>) -> Record {
        let mut r = Record::new(slug, name).with_disposition(disposition);
        r.most_recent_activity = day;
        r
    }

    #[test]
    fn test_merge_does_not_affect_existing_rows() {
        let existing = Dataset::new(vec![
            record("3890", "Ben", Disposition::Ignored, Some(date(2011, 1, 1))),
            record("4269", "Rob", Disposition::Unrated, Some(date(2011, 4, 20))),
        ]);
        let incoming = Dataset::new(vec![
            record("3890", "Ben", Disposition::Unrated, Some(date(2011, 1, 1))),
            record("6942", "Anonymous", Disposition::Unrated, Some(date(2011, 2, 9))),
        ]);

        let expected = Dataset::new(vec![
            record("3890", "Ben", Disposition::Ignored, Some(date(2011, 1, 1))),
            record("4269", "Rob", Disposition::Unrated, Some(date(2011, 4, 20))),
            record("6942", "Anonymous", Disposition::Unrated, Some(date(2011, 2, 9))),
        ]);

        assert_eq!(existing.merge(incoming), expected);
    }

    #[test]
    fn test_merge_report_counts() {
        let mut existing = Dataset::new(vec![Record::new("a", "A")]);
        let report = existing.merge_in_place(Dataset::new(vec![
            Record::new("a", "A"),
            Record::new("b", "B"),
            Record::new("c", "C"),
        ]));
        assert_eq!(report.added, 2);
        assert_eq!(report.already_known, 1);
        assert_eq!(existing.len(), 3);
    }

    #[test]
    fn test_merge_empty_incoming_is_noop() {
        let existing = Dataset::new(vec![
            Record::new("a", "A").with_disposition(Disposition::Messaged),
            Record::new("b", "B"),
        ]);
        assert_eq!(existing.clone().merge(Dataset::empty()), existing);
    }

    #[test]
    fn test_merge_into_empty_returns_incoming() {
        let incoming = Dataset::new(vec![Record::new("x", "X"), Record::new("y", "Y")]);
        assert_eq!(Dataset::empty().merge(incoming.clone()), incoming);
    }

    #[test]
    fn test_merge_keeps_first_incoming_duplicate() {
        let incoming = Dataset::new(vec![
            Record::new("x", "First"),
            Record::new("x", "Second"),
        ]);
        let merged = Dataset::empty().merge(incoming);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.records()[0].name, "First");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let existing = Dataset::new(vec![Record::new("a", "A").with_disposition(Disposition::Snoozed)]);
        let incoming = Dataset::new(vec![Record::new("a", "A"), Record::new("b", "B")]);
        let once = existing.merge(incoming.clone());
        let twice = once.clone().merge(incoming);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_unrated_sorted_most_recent_first() {
        let dataset = Dataset::new(vec![
            record("old", "Old", Disposition::Unrated, Some(date(2011, 1, 1))),
            record("none", "None", Disposition::Unrated, None),
            record("new", "New", Disposition::Unrated, Some(date(2019, 1, 1))),
            record("rated", "Rated", Disposition::Messaged, Some(date(2020, 1, 1))),
            record("mid", "Mid", Disposition::Unrated, Some(date(2013, 1, 1))),
        ]);

        let slugs: Vec<&str> = dataset
            .filter_unrated()
            .iter()
            .map(|r| r.slug.as_str())
            .collect();
        assert_eq!(slugs, vec!["new", "mid", "old", "none"]);
    }

    #[test]
    fn test_filter_snoozed_ties_keep_stored_order() {
        let day = Some(date(2017, 1, 1));
        let dataset = Dataset::new(vec![
            record("a", "A", Disposition::Snoozed, None),
            record("b", "B", Disposition::Snoozed, day),
            record("c", "C", Disposition::Unrated, day),
            record("d", "D", Disposition::Snoozed, day),
            record("e", "E", Disposition::Snoozed, None),
        ]);

        let slugs: Vec<&str> = dataset
            .filter_snoozed()
            .iter()
            .map(|r| r.slug.as_str())
            .collect();
        assert_eq!(slugs, vec!["b", "d", "a", "e"]);
    }

    #[test]
    fn test_set_disposition() {
        let mut dataset = Dataset::new(vec![Record::new("a", "A")]);
        let previous = dataset
            .set_disposition(&Slug::new("a"), Disposition::Messaged)
            .unwrap();
        assert_eq!(previous, Disposition::Unrated);
        assert_eq!(
            dataset.get(&Slug::new("a")).map(|r| r.disposition),
            Some(Disposition::Messaged)
        );

        let err = dataset
            .set_disposition(&Slug::new("missing"), Disposition::Ignored)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_counts() {
        let dataset = Dataset::new(vec![
            Record::new("a", "A"),
            Record::new("b", "B").with_disposition(Disposition::Snoozed),
            Record::new("c", "C").with_disposition(Disposition::Snoozed),
            Record::new("d", "D").with_disposition(Disposition::Ignored),
        ]);
        let counts = dataset.counts();
        assert_eq!(counts.unrated, 1);
        assert_eq!(counts.snoozed, 2);
        assert_eq!(counts.ignored, 1);
        assert_eq!(counts.messaged, 0);
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.get(Disposition::Snoozed), 2);
    }
}
