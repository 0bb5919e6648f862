//! Progress document: per-user, per-forum, per-day outcomes plus the
//! run-bound pair used for crash detection.
//!
//! The run bounds work like a write-ahead marker: `run_start_day` is
//! persisted the moment a run enters its processing loop, `run_end_day`
//! only once the loop exhausts the list. A mismatch at next load means a
//! previous run started but never completed (crash, kill, or a concurrent
//! process racing the same file).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tbsign_core::{CheckInOutcome, RecordedOutcome};

use crate::document;
use crate::error::StoreError;

#[derive(Debug, Default, Serialize, Deserialize)]
struct ProgressDoc {
    #[serde(default)]
    users: BTreeMap<String, UserProgress>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct UserProgress {
    #[serde(default)]
    run_start_day: i64,
    #[serde(default)]
    run_end_day: i64,
    #[serde(default)]
    outcomes: BTreeMap<String, RecordedOutcome>,
}

pub struct ProgressStore {
    path: PathBuf,
    doc: ProgressDoc,
}

impl ProgressStore {
    /// Opens the progress document, starting empty when the file does not
    /// exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or
    /// parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let doc = document::load(&path)?;
        Ok(Self { path, doc })
    }

    /// The recorded outcome for `forum` if one exists for exactly `day`.
    /// Entries from earlier days are ignored, never reused.
    #[must_use]
    pub fn outcome_for(&self, user: &str, forum: &str, day: i64) -> Option<&CheckInOutcome> {
        let recorded = self.doc.users.get(user)?.outcomes.get(forum)?;
        (recorded.day == day).then_some(&recorded.outcome)
    }

    /// Records (or overwrites) the outcome for `(user, forum, day)` and
    /// persists immediately.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    pub fn record(
        &mut self,
        user: &str,
        forum: &str,
        day: i64,
        outcome: CheckInOutcome,
    ) -> Result<(), StoreError> {
        self.doc
            .users
            .entry(user.to_owned())
            .or_default()
            .outcomes
            .insert(forum.to_owned(), RecordedOutcome { day, outcome });
        self.persist()
    }

    /// Persists `run_start_day = day`, leaving `run_end_day` untouched.
    /// Until [`ProgressStore::mark_run_finished`] runs, the bounds stay
    /// mismatched and the run counts as incomplete.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    pub fn mark_run_started(&mut self, user: &str, day: i64) -> Result<(), StoreError> {
        self.doc.users.entry(user.to_owned()).or_default().run_start_day = day;
        self.persist()
    }

    /// Persists `run_end_day = day`, closing the bounds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    pub fn mark_run_finished(&mut self, user: &str, day: i64) -> Result<(), StoreError> {
        self.doc.users.entry(user.to_owned()).or_default().run_end_day = day;
        self.persist()
    }

    /// The day the most recent run started, or 0 if the user never ran.
    #[must_use]
    pub fn run_started_on(&self, user: &str) -> i64 {
        self.doc.users.get(user).map_or(0, |u| u.run_start_day)
    }

    /// Whether the most recent run started but never completed.
    #[must_use]
    pub fn has_incomplete_run(&self, user: &str) -> bool {
        self.doc
            .users
            .get(user)
            .is_some_and(|u| u.run_start_day != u.run_end_day)
    }

    /// All outcomes recorded for `user` on exactly `day`, in forum-name
    /// order. Used to rebuild tallies without any network traffic.
    pub fn outcomes_for_day(
        &self,
        user: &str,
        day: i64,
    ) -> impl Iterator<Item = (&str, &CheckInOutcome)> {
        self.doc
            .users
            .get(user)
            .into_iter()
            .flat_map(|u| u.outcomes.iter())
            .filter(move |(_, recorded)| recorded.day == day)
            .map(|(forum, recorded)| (forum.as_str(), &recorded.outcome))
    }

    fn persist(&self) -> Result<(), StoreError> {
        document::write(&self.path, &self.doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success() -> CheckInOutcome {
        CheckInOutcome::Success {
            gain: 8,
            rank: 12,
            continued: 4,
            total: 100,
            missed: 2,
        }
    }

    #[test]
    fn outcomes_survive_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("progress.json");

        let mut store = ProgressStore::open(&path).expect("opens");
        store.record("alice", "rust", 20_700, success()).expect("persists");

        let reopened = ProgressStore::open(&path).expect("reopens");
        assert_eq!(
            reopened.outcome_for("alice", "rust", 20_700),
            Some(&success())
        );
    }

    #[test]
    fn stale_day_outcomes_are_not_reused() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = ProgressStore::open(dir.path().join("progress.json")).expect("opens");
        store.record("alice", "rust", 20_699, success()).expect("persists");
        assert!(store.outcome_for("alice", "rust", 20_700).is_none());
    }

    #[test]
    fn record_overwrites_previous_outcome() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = ProgressStore::open(dir.path().join("progress.json")).expect("opens");
        store
            .record(
                "alice",
                "rust",
                20_700,
                CheckInOutcome::Failure {
                    message: "connection reset".to_owned(),
                    retryable: true,
                },
            )
            .expect("persists");
        store.record("alice", "rust", 20_700, success()).expect("persists");
        assert_eq!(
            store.outcome_for("alice", "rust", 20_700),
            Some(&success())
        );
    }

    #[test]
    fn run_bounds_flag_incomplete_runs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("progress.json");

        let mut store = ProgressStore::open(&path).expect("opens");
        assert!(!store.has_incomplete_run("alice"));

        store.mark_run_started("alice", 20_700).expect("persists");
        // Simulate the crash: reopen without finishing.
        let reopened = ProgressStore::open(&path).expect("reopens");
        assert!(reopened.has_incomplete_run("alice"));
        assert_eq!(reopened.run_started_on("alice"), 20_700);

        let mut store = reopened;
        store.mark_run_finished("alice", 20_700).expect("persists");
        assert!(!store.has_incomplete_run("alice"));
    }

    #[test]
    fn outcomes_for_day_filters_and_orders_by_forum() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = ProgressStore::open(dir.path().join("progress.json")).expect("opens");
        store.record("alice", "steam", 20_700, success()).expect("persists");
        store
            .record(
                "alice",
                "rust",
                20_700,
                CheckInOutcome::Failure {
                    message: "already checked in".to_owned(),
                    retryable: false,
                },
            )
            .expect("persists");
        store.record("alice", "linux", 20_699, success()).expect("persists");

        let today: Vec<&str> = store
            .outcomes_for_day("alice", 20_700)
            .map(|(forum, _)| forum)
            .collect();
        assert_eq!(today, ["rust", "steam"]);
    }

    #[test]
    fn users_are_isolated() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = ProgressStore::open(dir.path().join("progress.json")).expect("opens");
        store.record("alice", "rust", 20_700, success()).expect("persists");
        assert!(store.outcome_for("bob", "rust", 20_700).is_none());
        assert!(!store.has_incomplete_run("bob"));
    }
}
