//! Interactive triage session.
//!
//! A [`TriageSession`] walks the user through the menu, browsing, and
//! updating. Terminal I/O, the browser, the directory, and the store are all
//! reached through traits, so the whole flow runs under test with a
//! [`ScriptedPrompter`] and in-memory collaborators.

mod commands;
mod opener;
mod prompter;
mod triage;

pub use commands::{BROWSE_HELP, BrowseCommand, Choice, Confirm, MenuChoice, menu_text};
pub use opener::{NoopOpener, SystemBrowser, UrlOpener};
pub use prompter::{
    LineReader, Prompter, ScriptedPrompter, StdinLines, TerminalPrompter, ask_choice,
};
pub use triage::{SessionOutcome, SessionSettings, TriageSession};
