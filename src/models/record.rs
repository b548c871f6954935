//! Record types and identifiers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable identifier ("slug") assigned by the directory to one entry.
///
/// The slug is the only key used for identity and merge comparisons.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Creates a new slug.
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Slug {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Slug {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The user's verdict on a record.
///
/// `Unrated` is an explicit variant rather than an absent value, so a record
/// that has never been seen can't be confused with a missing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    /// Not yet seen by the user.
    #[default]
    Unrated,
    /// Already messaged.
    Messaged,
    /// Deferred; shows up again when browsing snoozed people.
    Snoozed,
    /// Never show again.
    Ignored,
}

impl Disposition {
    /// Returns all disposition variants.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Unrated, Self::Messaged, Self::Snoozed, Self::Ignored]
    }

    /// Returns the disposition as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unrated => "unrated",
            Self::Messaged => "messaged",
            Self::Snoozed => "snoozed",
            Self::Ignored => "ignored",
        }
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Display name.
    pub name: String,
    /// Unique directory identifier.
    pub slug: Slug,
    /// Current disposition.
    #[serde(default)]
    pub disposition: Disposition,
    /// Latest activity date, used only for ordering.
    #[serde(default)]
    pub most_recent_activity: Option<NaiveDate>,
    /// Contact address, carried through untouched.
    #[serde(default)]
    pub email: Option<String>,
    /// Other descriptive fields, carried through untouched.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, String>,
}

impl Record {
    /// Creates an unrated record with no activity date.
    #[must_use]
    pub fn new(slug: impl Into<Slug>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            disposition: Disposition::Unrated,
            most_recent_activity: None,
            email: None,
            details: BTreeMap::new(),
        }
    }

    /// Sets the disposition.
    #[must_use]
    pub const fn with_disposition(mut self, disposition: Disposition) -> Self {
        self.disposition = disposition;
        self
    }

    /// Sets the most recent activity date.
    #[must_use]
    pub const fn with_activity(mut self, date: NaiveDate) -> Self {
        self.most_recent_activity = Some(date);
        self
    }

    /// Sets the contact email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Adds a descriptive pass-through field.
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Builds the public directory URL for this record.
    #[must_use]
    pub fn url(&self, base_url: &str) -> String {
        format!("{base_url}{}", self.slug)
    }
}
