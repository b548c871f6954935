//! Raw directory profiles and their reduction to records.

use crate::models::{Disposition, Record, Slug};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One attendance period of a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stint {
    /// First day of the stint.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Last day, absent for people without one on file.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// A profile as returned by the directory API.
///
/// Unknown fields in the API response are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Profile {
    /// Display name.
    pub name: String,
    /// Unique directory identifier.
    pub slug: String,
    /// Contact address.
    #[serde(default)]
    pub email: Option<String>,
    /// Recorded attendance periods.
    #[serde(default)]
    pub stints: Vec<Stint>,
    /// "Before RC" free text.
    #[serde(default)]
    pub before_rc_rendered: Option<String>,
    /// Interests free text.
    #[serde(default)]
    pub interests_rendered: Option<String>,
    /// Bio free text.
    #[serde(default)]
    pub bio_rendered: Option<String>,
    /// "During RC" free text.
    #[serde(default)]
    pub during_rc_rendered: Option<String>,
}

impl Profile {
    /// The free-text fields a filter expression is matched against.
    #[must_use]
    pub fn searchable_fields(&self) -> [&str; 4] {
        [
            self.before_rc_rendered.as_deref().unwrap_or_default(),
            self.interests_rendered.as_deref().unwrap_or_default(),
            self.bio_rendered.as_deref().unwrap_or_default(),
            self.during_rc_rendered.as_deref().unwrap_or_default(),
        ]
    }

    /// Latest stint start date.
    ///
    /// Start dates are used because not everyone has an end date. A profile
    /// without stints has no activity date.
    #[must_use]
    pub fn most_recent_start(&self) -> Option<NaiveDate> {
        self.stints.iter().filter_map(|s| s.start_date).max()
    }

    /// Reduces the profile to an unrated record.
    #[must_use]
    pub fn into_record(self) -> Record {
        let most_recent_activity = self.most_recent_start();
        Record {
            name: self.name,
            slug: Slug::new(self.slug),
            disposition: Disposition::Unrated,
            most_recent_activity,
            email: self.email,
            details: BTreeMap::new(),
        }
    }
}
