//! The run loop.
//!
//! Everything is strictly sequential: at most one request in flight, one
//! suspension point per network call plus the fixed cooldown. The progress
//! store is only ever mutated from this loop, so there are no in-process
//! writer conflicts; concurrent processes against the same file are left
//! to the run-bound check to detect.

use std::time::Duration;

use tbsign_client::{check_in, TiebaClient};
use tbsign_core::{day, CheckInOutcome, Settings};
use tbsign_store::ProgressStore;

use crate::observer::RunObserver;
use crate::report::RunReport;
use crate::state::RunState;
use crate::{AbortFlag, BatchError};

/// Failure message recorded in tallies for blacklisted forums.
pub const MSG_BLOCKED: &str = "blocked";

pub struct Orchestrator<'a> {
    client: &'a TiebaClient,
    progress: &'a mut ProgressStore,
    settings: &'a Settings,
    user: &'a str,
    abort: AbortFlag,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        client: &'a TiebaClient,
        progress: &'a mut ProgressStore,
        settings: &'a Settings,
        user: &'a str,
    ) -> Self {
        Self {
            client,
            progress,
            settings,
            user,
            abort: AbortFlag::new(),
        }
    }

    /// A handle that stops the run before its next forum when triggered.
    #[must_use]
    pub fn abort_flag(&self) -> AbortFlag {
        self.abort.clone()
    }

    /// Runs the full workflow: enumerate, then process every forum in
    /// order.
    ///
    /// Per forum: blacklisted forums count as failed without any network
    /// call; forums with an outcome already recorded for today reuse it
    /// without calling the executor; everything else goes through one
    /// check-in attempt, whose outcome is persisted unless it is a
    /// retryable failure. The fixed cooldown applies only after forums
    /// that actually hit the network.
    ///
    /// `run_start_day` is persisted the moment processing begins and
    /// `run_end_day` only on normal completion, so an abort or crash
    /// leaves the bounds mismatched for the next startup check to report.
    ///
    /// # Errors
    ///
    /// - [`BatchError::Listing`] if enumeration fails; nothing has been
    ///   processed or persisted at that point.
    /// - [`BatchError::Store`] if persisting an outcome or run bound
    ///   fails.
    pub async fn run(&mut self, observer: &dyn RunObserver) -> Result<RunReport, BatchError> {
        observer.on_state_change(RunState::Listing);
        let forums = match self.client.list_forums().await {
            Ok(forums) => forums,
            Err(err) => {
                tracing::error!(error = %err, "enumeration failed; run not started");
                observer.on_state_change(RunState::ListingFailed);
                return Err(BatchError::Listing(err));
            }
        };

        let today = day::today();
        observer.on_state_change(RunState::Running);
        self.progress.mark_run_started(self.user, today)?;

        let total = forums.len();
        let mut report = RunReport {
            total,
            success: 0,
            failed: 0,
            aborted: false,
        };

        for (index, forum) in forums.iter().enumerate() {
            if self.abort.is_aborted() {
                tracing::info!(processed = index, total, "run aborted");
                report.aborted = true;
                observer.on_state_change(RunState::Aborted);
                return Ok(report);
            }
            let name = forum.name.as_str();

            if self.settings.is_blacklisted(name) {
                report.failed += 1;
                let outcome = CheckInOutcome::Failure {
                    message: MSG_BLOCKED.to_owned(),
                    retryable: false,
                };
                observer.on_progress(index, total, name, &outcome);
                continue;
            }

            if let Some(existing) = self.progress.outcome_for(self.user, name, today) {
                let existing = existing.clone();
                tally(&mut report, &existing);
                observer.on_progress(index, total, name, &existing);
                continue;
            }

            let outcome = check_in(self.client, name).await;
            if outcome.is_recordable() {
                self.progress
                    .record(self.user, name, today, outcome.clone())?;
            }
            tally(&mut report, &outcome);
            observer.on_progress(index, total, name, &outcome);

            tokio::time::sleep(Duration::from_millis(self.settings.interval_ms)).await;
        }

        self.progress.mark_run_finished(self.user, today)?;
        observer.on_state_change(RunState::Finished);
        tracing::info!(
            success = report.success,
            failed = report.failed,
            "run finished"
        );
        Ok(report)
    }

    /// Re-attempts one forum outside the batch loop, overwriting any
    /// recorded outcome for today on success or terminal failure.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::Store`] if persisting the outcome fails.
    pub async fn retry(&mut self, forum: &str) -> Result<CheckInOutcome, BatchError> {
        let today = day::today();
        let outcome = check_in(self.client, forum).await;
        if outcome.is_recordable() {
            self.progress
                .record(self.user, forum, today, outcome.clone())?;
        }
        Ok(outcome)
    }
}

fn tally(report: &mut RunReport, outcome: &CheckInOutcome) {
    if outcome.is_success() {
        report.success += 1;
    } else {
        report.failed += 1;
    }
}
