//! End-to-end triage sessions against a real snapshot directory.
//!
//! Each test scripts the user's answers with a `ScriptedPrompter` and checks
//! what reached disk.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use chrono::NaiveDate;
use roster::directory::{FixtureFetcher, Profile, Stint, fixture_dataset};
use roster::session::{NoopOpener, ScriptedPrompter, SessionSettings};
use roster::{
    Dataset, Disposition, FilesystemSnapshotStore, Record, SessionOutcome, SnapshotBackend, Slug,
    TriageSession,
};
use std::path::PathBuf;
use tempfile::TempDir;

struct Workspace {
    _dir: TempDir,
    primary: PathBuf,
    backup: PathBuf,
    store: FilesystemSnapshotStore,
}

impl Workspace {
    fn empty() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let primary = dir.path().join("data").join("recursers.json");
        let backup = dir.path().join("data").join("recursers_backup.json");
        let store = FilesystemSnapshotStore::new(&primary, &backup);
        Self {
            _dir: dir,
            primary,
            backup,
            store,
        }
    }

    fn with(dataset: &Dataset) -> Self {
        let workspace = Self::empty();
        workspace.store.save(dataset).unwrap();
        workspace
    }

    fn primary_bytes(&self) -> Vec<u8> {
        std::fs::read(&self.primary).unwrap()
    }

    fn run(
        &self,
        fetcher: &FixtureFetcher,
        answers: &[&str],
    ) -> (SessionOutcome, ScriptedPrompter) {
        let mut prompter = ScriptedPrompter::new(answers.iter().copied());
        let settings = SessionSettings {
            base_url: "https://www.recurse.com/directory/".to_string(),
            initial_offset: 0,
        };
        let outcome =
            TriageSession::new(&self.store, fetcher, &NoopOpener, &mut prompter, settings)
                .run()
                .unwrap();
        (outcome, prompter)
    }
}

fn profile(slug: &str, name: &str, bio: &str, start: (i32, u32, u32)) -> Profile {
    Profile {
        name: name.to_string(),
        slug: slug.to_string(),
        stints: vec![Stint {
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2),
            end_date: None,
        }],
        bio_rendered: Some(bio.to_string()),
        ..Profile::default()
    }
}

#[test]
fn test_discard_leaves_disk_untouched() {
    let workspace = Workspace::with(&fixture_dataset());
    let before = workspace.primary_bytes();

    let (outcome, _) = workspace.run(&FixtureFetcher::sample(), &["n", "m", "i", "!"]);

    assert_eq!(outcome, SessionOutcome::Discarded { rated: 1 });
    assert_eq!(workspace.primary_bytes(), before);
    assert!(!workspace.backup.exists());
}

#[test]
fn test_quit_commits_and_rotates() {
    let workspace = Workspace::with(&fixture_dataset());
    let before = workspace.primary_bytes();

    let (outcome, prompter) = workspace.run(&FixtureFetcher::sample(), &["s", "m", "q"]);

    assert_eq!(outcome, SessionOutcome::Saved { rated: 1 });
    assert_eq!(std::fs::read(&workspace.backup).unwrap(), before);
    let saved = workspace.store.load().unwrap();
    // Snoozed people come most recent first: Johann (2019) before Christine (2017).
    let johann = saved.get(&Slug::new("3718-johann-diedrick")).unwrap();
    assert_eq!(johann.disposition, Disposition::Messaged);
    let christine = saved.get(&Slug::new("3858-christine-jiang")).unwrap();
    assert_eq!(christine.disposition, Disposition::Snoozed);
    assert!(prompter.saw("Johann | https://www.recurse.com/directory/3718-johann-diedrick"));
}

#[test]
fn test_exhausted_save_and_decline() {
    let workspace = Workspace::with(&fixture_dataset());
    let before = workspace.primary_bytes();

    let (outcome, prompter) = workspace.run(&FixtureFetcher::sample(), &["n", "i", "i", "x"]);
    assert_eq!(outcome, SessionOutcome::Discarded { rated: 2 });
    assert!(prompter.saw("Enter s to save this session's ratings"));
    assert_eq!(workspace.primary_bytes(), before);

    let (outcome, _) = workspace.run(&FixtureFetcher::sample(), &["n", "i", "i", "s"]);
    assert_eq!(outcome, SessionOutcome::Saved { rated: 2 });
    let counts = workspace.store.load().unwrap().counts();
    assert_eq!(counts.ignored, 2);
    assert_eq!(counts.unrated, 0);
}

#[test]
fn test_update_merges_and_commits_without_touching_ratings() {
    let existing = Dataset::new(vec![
        Record::new("3890-ben-lerner", "Ben").with_disposition(Disposition::Ignored),
        Record::new("1234-rob-tobert", "Rob").with_disposition(Disposition::Snoozed),
    ]);
    let workspace = Workspace::with(&existing);
    let fetcher = FixtureFetcher::new(vec![
        profile("3890-ben-lerner", "Ben", "compilers", (2011, 1, 1)),
        profile("6942-anonymous-person", "Anonymous", "mystery", (2020, 6, 1)),
    ]);

    let (outcome, prompter) = workspace.run(&fetcher, &["u", "[unclosed", ".*"]);

    assert_eq!(outcome, SessionOutcome::Updated { added: 1 });
    assert!(prompter.saw("1 new rows added"));
    assert!(prompter.saw("invalid input"));
    let saved = workspace.store.load().unwrap();
    assert_eq!(saved.len(), 3);
    assert_eq!(&saved.records()[..2], existing.records());
    let anonymous = saved.get(&Slug::new("6942-anonymous-person")).unwrap();
    assert_eq!(anonymous.disposition, Disposition::Unrated);
    assert_eq!(anonymous.most_recent_activity, NaiveDate::from_ymd_opt(2020, 6, 1));
    assert_eq!(workspace.store.load_backup().unwrap(), existing);
}

#[test]
fn test_update_with_nothing_new_still_commits() {
    let workspace = Workspace::with(&fixture_dataset());

    let (outcome, prompter) = workspace.run(&FixtureFetcher::sample(), &["u", "compilers"]);

    assert_eq!(outcome, SessionOutcome::Updated { added: 0 });
    assert!(prompter.saw("0 new rows added"));
    assert!(workspace.backup.exists());
    assert_eq!(workspace.store.load().unwrap(), fixture_dataset());
}

#[test]
fn test_bootstrap_declined_writes_nothing() {
    let workspace = Workspace::empty();

    let (outcome, prompter) = workspace.run(&FixtureFetcher::sample(), &["maybe", "n"]);

    assert_eq!(outcome, SessionOutcome::Declined);
    assert!(prompter.saw("Okay, exiting without doing anything."));
    assert!(!workspace.primary.exists());
    assert!(!workspace.backup.exists());
}

#[test]
fn test_bootstrap_then_browse() {
    let workspace = Workspace::empty();

    let (outcome, _) = workspace.run(&FixtureFetcher::sample(), &["y", ".*", "n", "m", "q"]);

    assert_eq!(outcome, SessionOutcome::Saved { rated: 1 });
    let saved = workspace.store.load().unwrap();
    assert_eq!(saved.len(), 2);
    // Ben (2011) is more recent than Plato (1990), so he is rated first.
    let ben = saved.get(&Slug::new("3890-ben-lerner")).unwrap();
    assert_eq!(ben.disposition, Disposition::Messaged);
    let bootstrapped = workspace.store.load_backup().unwrap();
    assert_eq!(bootstrapped.counts().unrated, 2);
}

#[test]
fn test_invalid_input_is_reprompted() {
    let workspace = Workspace::with(&fixture_dataset());

    let (outcome, prompter) =
        workspace.run(&FixtureFetcher::sample(), &["z", "n", "mm", "h", "q"]);

    assert_eq!(outcome, SessionOutcome::Saved { rated: 0 });
    assert!(prompter.saw("'z' is not one of [nsuq]"));
    assert!(prompter.saw("'mm' is not one of [hmisq!]"));
    assert_eq!(workspace.store.load().unwrap(), fixture_dataset());
}

#[test]
fn test_end_of_input_keeps_last_commit() {
    let workspace = Workspace::with(&fixture_dataset());
    let before = workspace.primary_bytes();
    let mut prompter = ScriptedPrompter::new(["n", "m"]);
    let settings = SessionSettings {
        base_url: String::new(),
        initial_offset: 0,
    };

    let fetcher = FixtureFetcher::sample();
    let result =
        TriageSession::new(&workspace.store, &fetcher, &NoopOpener, &mut prompter, settings).run();

    assert!(result.is_err());
    assert_eq!(workspace.primary_bytes(), before);
}
