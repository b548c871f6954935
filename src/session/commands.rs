//! Single-character commands accepted by the session.

use crate::models::Disposition;

/// A command chosen by typing exactly one character.
pub trait Choice: Sized + Copy {
    /// Every accepted key, in display order.
    const KEYS: &'static str;

    /// Maps one key to a command.
    fn from_key(key: char) -> Option<Self>;

    /// Parses trimmed input that must be exactly one accepted key.
    fn parse(input: &str) -> Option<Self> {
        let mut chars = input.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(key), None) => Self::from_key(key),
            _ => None,
        }
    }
}

/// Top-level menu selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// `n`: browse people not rated yet.
    BrowseUnrated,
    /// `s`: browse snoozed people.
    BrowseSnoozed,
    /// `u`: fetch, merge, and commit new people.
    Update,
    /// `q`: leave without doing anything.
    Quit,
}

impl Choice for MenuChoice {
    const KEYS: &'static str = "nsuq";

    fn from_key(key: char) -> Option<Self> {
        match key {
            'n' => Some(Self::BrowseUnrated),
            's' => Some(Self::BrowseSnoozed),
            'u' => Some(Self::Update),
            'q' => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Command given while a record is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseCommand {
    /// `h`: show the legend again.
    Help,
    /// `m`, `i`, `s`: rate the record and move on.
    Rate(Disposition),
    /// `q`: stop and save the ratings made so far.
    Quit,
    /// `!`: stop and throw away every rating from this session.
    Discard,
}

impl Choice for BrowseCommand {
    const KEYS: &'static str = "hmisq!";

    fn from_key(key: char) -> Option<Self> {
        match key {
            'h' => Some(Self::Help),
            'm' => Some(Self::Rate(Disposition::Messaged)),
            'i' => Some(Self::Rate(Disposition::Ignored)),
            's' => Some(Self::Rate(Disposition::Snoozed)),
            'q' => Some(Self::Quit),
            '!' => Some(Self::Discard),
            _ => None,
        }
    }
}

/// Yes/no answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirm {
    /// `y`
    Yes,
    /// `n`
    No,
}

impl Choice for Confirm {
    const KEYS: &'static str = "yn";

    fn from_key(key: char) -> Option<Self> {
        match key {
            'y' => Some(Self::Yes),
            'n' => Some(Self::No),
            _ => None,
        }
    }
}

/// Legend shown before browsing and on `h`.
pub const BROWSE_HELP: &str = "\
h to print this message
m to mark this person as already messaged
i to ignore this person, keeping them out of future sessions
s to snooze this person, so they come back when browsing snoozed people
q to quit, leaving this person unrated and saving the ratings from this session
! to quit WITHOUT saving any ratings from this session";

/// Builds the top-level menu text.
#[must_use]
pub fn menu_text(initial_offset: u64) -> String {
    format!(
        "n for people you have not rated yet\n\
         s for snoozed people\n\
         u to update the roster with new people (offset {initial_offset}) and exit\n\
         q to quit"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("n", Some(MenuChoice::BrowseUnrated) ; "unrated")]
    #[test_case("s", Some(MenuChoice::BrowseSnoozed) ; "snoozed")]
    #[test_case(" u\n", Some(MenuChoice::Update) ; "update trimmed")]
    #[test_case("q", Some(MenuChoice::Quit) ; "quit")]
    #[test_case("x", None ; "unknown key")]
    #[test_case("nn", None ; "two keys")]
    #[test_case("", None ; "empty")]
    fn test_menu_parse(input: &str, expected: Option<MenuChoice>) {
        assert_eq!(MenuChoice::parse(input), expected);
    }

    #[test_case("m", Some(BrowseCommand::Rate(Disposition::Messaged)) ; "messaged")]
    #[test_case("i", Some(BrowseCommand::Rate(Disposition::Ignored)) ; "ignored")]
    #[test_case("s", Some(BrowseCommand::Rate(Disposition::Snoozed)) ; "snoozed")]
    #[test_case("h", Some(BrowseCommand::Help) ; "help")]
    #[test_case("q", Some(BrowseCommand::Quit) ; "quit")]
    #[test_case("!", Some(BrowseCommand::Discard) ; "discard")]
    #[test_case("n", None ; "menu key is not a browse key")]
    #[test_case("M", None ; "case sensitive")]
    fn test_browse_parse(input: &str, expected: Option<BrowseCommand>) {
        assert_eq!(BrowseCommand::parse(input), expected);
    }

    #[test]
    fn test_keys_cover_parsers() {
        for key in MenuChoice::KEYS.chars() {
            assert!(MenuChoice::from_key(key).is_some());
        }
        for key in BrowseCommand::KEYS.chars() {
            assert!(BrowseCommand::from_key(key).is_some());
        }
        for key in Confirm::KEYS.chars() {
            assert!(Confirm::from_key(key).is_some());
        }
    }

    #[test]
    fn test_menu_text_mentions_offset() {
        assert!(menu_text(1700).contains("(offset 1700)"));
    }
}
