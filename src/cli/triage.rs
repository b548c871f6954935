//! Triage CLI command.

use crate::Result;
use crate::directory::{DirectoryFetcher, TokenSource, token_from_env};
use crate::session::{Prompter, SessionOutcome, SessionSettings, TriageSession, UrlOpener};
use crate::storage::SnapshotBackend;
use secrecy::SecretString;

/// Runs an interactive triage session and reports how it ended.
///
/// # Errors
///
/// Returns any error that aborted the session.
pub fn cmd_triage(
    store: &dyn SnapshotBackend,
    fetcher: &dyn DirectoryFetcher,
    opener: &dyn UrlOpener,
    prompter: &mut dyn Prompter,
    settings: SessionSettings,
) -> Result<SessionOutcome> {
    let outcome = TriageSession::new(store, fetcher, opener, &mut *prompter, settings).run()?;
    tracing::info!(
        committed = outcome.committed(),
        location = %store.describe(),
        "Triage session ended"
    );
    if let Some(summary) = outcome_summary(outcome) {
        prompter.say(&summary);
    }
    Ok(outcome)
}

/// One-line summary for outcomes that don't announce themselves.
#[must_use]
pub fn outcome_summary(outcome: SessionOutcome) -> Option<String> {
    match outcome {
        SessionOutcome::Saved { rated } => Some(format!("Saved {rated} new ratings.")),
        SessionOutcome::Discarded { rated: 0 } => None,
        SessionOutcome::Discarded { rated } => Some(format!("Discarded {rated} ratings.")),
        SessionOutcome::Quit | SessionOutcome::Declined | SessionOutcome::Updated { .. } => None,
    }
}

/// Token source that reads the environment first and otherwise asks through
/// a prompter built by `make_prompter`.
pub fn env_or_prompt_token<P, F>(make_prompter: F) -> TokenSource
where
    P: Prompter,
    F: Fn() -> P + 'static,
{
    Box::new(move || -> Result<SecretString> {
        if let Some(token) = token_from_env() {
            return Ok(token);
        }
        let mut prompter = make_prompter();
        let token = prompter.ask("Enter your directory API token>")?;
        let token = token.trim();
        if token.is_empty() {
            return Err(crate::Error::InvalidInput(
                "directory API token must not be empty".to_string(),
            ));
        }
        Ok(SecretString::from(token.to_string()))
    })
}
