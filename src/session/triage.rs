//! Triage state machine.

use super::commands::{BROWSE_HELP, BrowseCommand, Confirm, MenuChoice, menu_text};
use super::opener::UrlOpener;
use super::prompter::{Prompter, ask_choice};
use crate::directory::{DirectoryFetcher, ProfileFilter};
use crate::models::{Dataset, Disposition, Slug};
use crate::storage::SnapshotBackend;
use crate::{Error, Result};
use std::collections::VecDeque;

const FILTER_PROMPT: &str = "Enter a regex to filter profile bios. \
The regex '.*' will match everything. Don't include quotation marks>";

const EXHAUSTED_PROMPT: &str = "You are all out of people to rate.\n\
Enter s to save this session's ratings, or any other letter to exit without saving>";

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Left from the menu without touching anything.
    Quit,
    /// No snapshot existed and the user declined to bootstrap one.
    Declined,
    /// Ratings were committed.
    Saved {
        /// Records rated during the session.
        rated: usize,
    },
    /// Ratings were thrown away.
    Discarded {
        /// Records rated during the session.
        rated: usize,
    },
    /// New records were merged and committed.
    Updated {
        /// Records added by the merge.
        added: usize,
    },
}

impl SessionOutcome {
    /// Returns `true` if the session ended with a commit.
    #[must_use]
    pub const fn committed(&self) -> bool {
        matches!(self, Self::Saved { .. } | Self::Updated { .. })
    }
}

/// Settings a session needs beyond its collaborators.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Prefix joined with a slug to build a profile URL.
    pub base_url: String,
    /// Directory offset to fetch from when bootstrapping or updating.
    pub initial_offset: u64,
}

#[derive(Debug)]
enum SessionState {
    Start,
    MenuPrompt,
    Browsing(Disposition),
    PerRecordPrompt { queue: VecDeque<Slug>, rated: usize },
    SessionExhausted { rated: usize },
    Updating,
    Terminated(SessionOutcome),
}

impl SessionState {
    const fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::MenuPrompt => "menu",
            Self::Browsing(_) => "browsing",
            Self::PerRecordPrompt { .. } => "per_record",
            Self::SessionExhausted { .. } => "exhausted",
            Self::Updating => "updating",
            Self::Terminated(_) => "terminated",
        }
    }
}

/// One interactive triage run.
///
/// The working dataset lives only in memory until a commit. Nothing reaches
/// the store except through an explicit save: `q` while browsing, `s` once
/// the records run out, an update, or a bootstrap.
pub struct TriageSession<'a> {
    store: &'a dyn SnapshotBackend,
    fetcher: &'a dyn DirectoryFetcher,
    opener: &'a dyn UrlOpener,
    prompter: &'a mut dyn Prompter,
    settings: SessionSettings,
    dataset: Option<Dataset>,
}

impl<'a> TriageSession<'a> {
    /// Wires a session to its collaborators.
    pub fn new(
        store: &'a dyn SnapshotBackend,
        fetcher: &'a dyn DirectoryFetcher,
        opener: &'a dyn UrlOpener,
        prompter: &'a mut dyn Prompter,
        settings: SessionSettings,
    ) -> Self {
        Self {
            store,
            fetcher,
            opener,
            prompter,
            settings,
            dataset: None,
        }
    }

    /// Runs the session until it terminates.
    ///
    /// # Errors
    ///
    /// Returns an error if the store, the directory, or the prompter fails.
    /// Uncommitted ratings are lost in that case; the store keeps its last
    /// committed state.
    pub fn run(mut self) -> Result<SessionOutcome> {
        let mut state = SessionState::Start;
        loop {
            state = match state {
                SessionState::Start => self.start()?,
                SessionState::MenuPrompt => self.menu()?,
                SessionState::Browsing(disposition) => self.browse(disposition)?,
                SessionState::PerRecordPrompt { queue, rated } => self.rate_next(queue, rated)?,
                SessionState::SessionExhausted { rated } => self.exhausted(rated)?,
                SessionState::Updating => self.update()?,
                SessionState::Terminated(outcome) => {
                    tracing::info!(?outcome, "Session finished");
                    return Ok(outcome);
                },
            };
            tracing::debug!(state = state.name(), "Session transition");
        }
    }

    fn start(&mut self) -> Result<SessionState> {
        if self.store.exists()? {
            return Ok(SessionState::MenuPrompt);
        }

        let prompt = format!(
            "No snapshot found at {}. Fetch people from the directory starting at offset {}?",
            self.store.describe(),
            self.settings.initial_offset
        );
        match ask_choice::<Confirm>(&mut *self.prompter, &prompt)? {
            Confirm::No => {
                self.prompter.say("Okay, exiting without doing anything.");
                Ok(SessionState::Terminated(SessionOutcome::Declined))
            },
            Confirm::Yes => {
                let filter = self.ask_filter()?;
                let dataset = self.fetcher.fetch(&filter, self.settings.initial_offset)?;
                self.store.save(&dataset)?;
                tracing::info!(records = dataset.len(), "Bootstrapped snapshot");
                self.prompter
                    .say(&format!("Saved {} people to {}", dataset.len(), self.store.describe()));
                self.dataset = Some(dataset);
                Ok(SessionState::MenuPrompt)
            },
        }
    }

    fn menu(&mut self) -> Result<SessionState> {
        let prompt = menu_text(self.settings.initial_offset);
        let choice = ask_choice::<MenuChoice>(&mut *self.prompter, &prompt)?;
        if choice == MenuChoice::Quit {
            return Ok(SessionState::Terminated(SessionOutcome::Quit));
        }

        self.ensure_loaded()?;
        Ok(match choice {
            MenuChoice::BrowseUnrated => SessionState::Browsing(Disposition::Unrated),
            MenuChoice::BrowseSnoozed => SessionState::Browsing(Disposition::Snoozed),
            MenuChoice::Update => SessionState::Updating,
            MenuChoice::Quit => SessionState::Terminated(SessionOutcome::Quit),
        })
    }

    fn browse(&mut self, disposition: Disposition) -> Result<SessionState> {
        let queue: VecDeque<Slug> = self
            .dataset()?
            .filter_by(disposition)
            .into_iter()
            .map(|r| r.slug.clone())
            .collect();

        tracing::debug!(%disposition, records = queue.len(), "Browsing");
        if queue.is_empty() {
            self.prompter.say(&format!("No {disposition} people to show."));
            return Ok(SessionState::SessionExhausted { rated: 0 });
        }

        self.prompter.say(BROWSE_HELP);
        Ok(SessionState::PerRecordPrompt { queue, rated: 0 })
    }

    fn rate_next(&mut self, mut queue: VecDeque<Slug>, rated: usize) -> Result<SessionState> {
        let Some(slug) = queue.pop_front() else {
            return Ok(SessionState::SessionExhausted { rated });
        };

        let (line, url) = {
            let record = self
                .dataset()?
                .get(&slug)
                .ok_or_else(|| Error::InvalidInput(format!("no record with slug '{slug}'")))?;
            let url = record.url(&self.settings.base_url);
            (format!("{} | {url}", record.name), url)
        };
        self.prompter.say(&line);
        if let Err(e) = self.opener.open(&url) {
            tracing::warn!(url = %url, error = %e, "Failed to open browser");
        }

        loop {
            match ask_choice::<BrowseCommand>(&mut *self.prompter, "")? {
                BrowseCommand::Help => self.prompter.say(BROWSE_HELP),
                BrowseCommand::Rate(disposition) => {
                    self.dataset_mut()?.set_disposition(&slug, disposition)?;
                    tracing::debug!(slug = %slug, %disposition, "Rated");
                    return Ok(SessionState::PerRecordPrompt {
                        queue,
                        rated: rated + 1,
                    });
                },
                BrowseCommand::Quit => {
                    self.commit()?;
                    return Ok(SessionState::Terminated(SessionOutcome::Saved { rated }));
                },
                BrowseCommand::Discard => {
                    self.prompter.say("Exiting without saving.");
                    return Ok(SessionState::Terminated(SessionOutcome::Discarded { rated }));
                },
            }
        }
    }

    fn exhausted(&mut self, rated: usize) -> Result<SessionState> {
        let answer = self.prompter.ask(EXHAUSTED_PROMPT)?;
        if answer.trim() == "s" {
            self.commit()?;
            Ok(SessionState::Terminated(SessionOutcome::Saved { rated }))
        } else {
            self.prompter.say("Exiting without saving.");
            Ok(SessionState::Terminated(SessionOutcome::Discarded { rated }))
        }
    }

    fn update(&mut self) -> Result<SessionState> {
        let filter = self.ask_filter()?;
        let incoming = self.fetcher.fetch(&filter, self.settings.initial_offset)?;
        let report = self.dataset_mut()?.merge_in_place(incoming);
        self.prompter.say(&format!("{} new rows added", report.added));
        self.commit()?;
        Ok(SessionState::Terminated(SessionOutcome::Updated {
            added: report.added,
        }))
    }

    /// Asks for a filter expression until one compiles.
    fn ask_filter(&mut self) -> Result<ProfileFilter> {
        loop {
            let answer = self.prompter.ask(FILTER_PROMPT)?;
            match ProfileFilter::new(answer.trim()) {
                Ok(filter) => return Ok(filter),
                Err(e @ Error::InvalidInput(_)) => self.prompter.say(&e.to_string()),
                Err(e) => return Err(e),
            }
        }
    }

    fn ensure_loaded(&mut self) -> Result<()> {
        if self.dataset.is_none() {
            let dataset = self.store.load()?;
            tracing::debug!(records = dataset.len(), "Loaded snapshot");
            self.dataset = Some(dataset);
        }
        Ok(())
    }

    fn dataset(&self) -> Result<&Dataset> {
        self.dataset
            .as_ref()
            .ok_or_else(|| Error::operation("session", "dataset not loaded"))
    }

    fn dataset_mut(&mut self) -> Result<&mut Dataset> {
        self.dataset
            .as_mut()
            .ok_or_else(|| Error::operation("session", "dataset not loaded"))
    }

    fn commit(&mut self) -> Result<()> {
        let counts = {
            let dataset = self.dataset()?;
            self.store.save(dataset)?;
            dataset.counts()
        };
        self.prompter.say(&format!(
            "Saved to {} ({} unrated, {} messaged, {} snoozed, {} ignored)",
            self.store.describe(),
            counts.unrated,
            counts.messaged,
            counts.snoozed,
            counts.ignored
        ));
        Ok(())
    }
}
