//! Community directory integration.
//!
//! Supplies fresh records given a filter expression and a starting offset.
//! The session only sees the [`DirectoryFetcher`] trait; the HTTP client and
//! the offline fixture are interchangeable behind it.

mod client;
mod filter;
mod fixture;
mod profile;

pub use client::{
    AUTH_TOKEN_ENV, DirectoryHttpConfig, RecurseDirectoryClient, TokenSource, build_http_client,
    token_from_env,
};
pub use filter::ProfileFilter;
pub use fixture::{FixtureFetcher, fixture_dataset};
pub use profile::{Profile, Stint};

use crate::Result;
use crate::models::Dataset;

/// Trait for directory sources.
pub trait DirectoryFetcher {
    /// Fetches every profile from `offset` onward that matches `filter`,
    /// reduced to unrated records.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OperationFailed`] if the source can't be read.
    fn fetch(&self, filter: &ProfileFilter, offset: u64) -> Result<Dataset>;
}

/// Keeps profiles matching `filter` and reduces them to records.
fn reduce_profiles(profiles: Vec<Profile>, filter: &ProfileFilter) -> Dataset {
    let total = profiles.len();
    let dataset: Dataset = profiles
        .into_iter()
        .filter(|p| filter.matches(p))
        .map(Profile::into_record)
        .collect();
    tracing::debug!(
        total,
        matched = dataset.len(),
        filter = filter.as_str(),
        "Filtered directory profiles"
    );
    dataset
}
