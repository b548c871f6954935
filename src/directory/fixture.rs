//! Static directory data for offline debug mode.

use super::{DirectoryFetcher, Profile, ProfileFilter, Stint};
use crate::Result;
use crate::models::{Dataset, Disposition, Record};
use chrono::NaiveDate;

fn day(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn profile(slug: &str, name: &str, email: &str, bio: &str, start: Option<NaiveDate>) -> Profile {
    Profile {
        name: name.to_string(),
        slug: slug.to_string(),
        email: Some(email.to_string()),
        stints: start
            .map(|start_date| Stint {
                start_date: Some(start_date),
                end_date: None,
            })
            .into_iter()
            .collect(),
        bio_rendered: Some(bio.to_string()),
        ..Profile::default()
    }
}

/// The snapshot debug mode starts from: two unrated and two snoozed people.
#[must_use]
pub fn fixture_dataset() -> Dataset {
    let rows = [
        ("3890-ben-lerner", "Ben", "hacker_man@big.data", None, day(2011, 1, 1)),
        ("3585-toph-allen", "Toph", "toph@allen.ai", None, day(2013, 1, 1)),
        (
            "3858-christine-jiang",
            "Christine",
            "christine@data.science",
            Some(Disposition::Snoozed),
            day(2017, 1, 1),
        ),
        (
            "3718-johann-diedrick",
            "Johann",
            "johann@sebastian.bach",
            Some(Disposition::Snoozed),
            day(2019, 1, 1),
        ),
    ];

    rows.into_iter()
        .map(|(slug, name, email, disposition, activity)| {
            let mut record = Record::new(slug, name)
                .with_email(email)
                .with_disposition(disposition.unwrap_or_default());
            record.most_recent_activity = activity;
            record
        })
        .collect()
}

/// Fetcher that serves a fixed set of profiles without touching the network.
#[derive(Debug, Clone)]
pub struct FixtureFetcher {
    profiles: Vec<Profile>,
}

impl FixtureFetcher {
    /// Creates a fetcher over the given profiles.
    #[must_use]
    pub const fn new(profiles: Vec<Profile>) -> Self {
        Self { profiles }
    }

    /// The default fixture: one person already in [`fixture_dataset`] and one
    /// newcomer.
    #[must_use]
    pub fn sample() -> Self {
        Self::new(vec![
            profile(
                "3890-ben-lerner",
                "Ben",
                "hacker_man@big.data",
                "Big data and small compilers",
                day(2011, 1, 1),
            ),
            profile(
                "1002-plato-greek",
                "Plato",
                "good@republ.ic",
                "Philosopher, interested in forms",
                day(1990, 2, 3),
            ),
        ])
    }
}

impl DirectoryFetcher for FixtureFetcher {
    fn fetch(&self, filter: &ProfileFilter, offset: u64) -> Result<Dataset> {
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let profiles = self.profiles.iter().skip(skip).cloned().collect();
        Ok(super::reduce_profiles(profiles, filter))
    }
}
