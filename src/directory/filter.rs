//! Case-insensitive pattern filter over profile free text.

use super::Profile;
use crate::{Error, Result};
use regex::{Regex, RegexBuilder};

/// Compiled filter expression.
///
/// A profile matches if the pattern is found in any of its searchable
/// fields. The pattern `.*` matches everything.
#[derive(Debug, Clone)]
pub struct ProfileFilter {
    pattern: Regex,
}

impl ProfileFilter {
    /// Compiles a filter expression.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the expression is not a valid
    /// regular expression.
    pub fn new(expression: &str) -> Result<Self> {
        let pattern = RegexBuilder::new(expression)
            .case_insensitive(true)
            .build()
            .map_err(|e| Error::InvalidInput(format!("invalid filter expression: {e}")))?;
        Ok(Self { pattern })
    }

    /// A filter that matches every profile.
    #[must_use]
    pub fn match_all() -> Self {
        Self {
            pattern: Regex::new(".*").unwrap_or_else(|_| unreachable!("literal pattern")),
        }
    }

    /// Returns the source expression.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// Returns `true` if any searchable field of `profile` matches.
    #[must_use]
    pub fn matches(&self, profile: &Profile) -> bool {
        profile
            .searchable_fields()
            .iter()
            .any(|field| self.pattern.is_match(field))
    }
}
