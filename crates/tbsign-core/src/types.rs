//! Shared data model for the check-in workflow.

use serde::{Deserialize, Serialize};

/// One forum the user is subscribed to, as produced by enumeration.
/// Immutable for the duration of a run; ordering matters because progress
/// is reported by index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forum {
    pub name: String,
    pub level: i64,
    pub level_label: String,
    pub experience: i64,
}

/// Classified result of one check-in attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckInOutcome {
    /// The API accepted the check-in and returned the day's stats.
    Success {
        /// Experience points gained.
        gain: i64,
        /// Rank among today's check-ins for this forum.
        rank: i64,
        /// Length of the current unbroken streak.
        continued: i64,
        /// Total check-ins ever for this forum.
        total: i64,
        /// Days missed since first check-in.
        missed: i64,
    },
    /// The check-in did not register. `retryable` distinguishes transient
    /// failures (worth a manual re-attempt) from terminal classifications
    /// such as "unsupported" or "already checked in".
    Failure { message: String, retryable: bool },
}

impl CheckInOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, CheckInOutcome::Success { .. })
    }

    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CheckInOutcome::Failure {
                retryable: true,
                ..
            }
        )
    }

    /// Retryable failures are surfaced for a manual re-attempt instead of
    /// being written to the progress store; everything else is final for
    /// the day and gets recorded.
    #[must_use]
    pub fn is_recordable(&self) -> bool {
        !self.is_retryable()
    }
}

/// A [`CheckInOutcome`] as persisted: stamped with the day index it was
/// produced on, so stale entries from earlier days are never reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedOutcome {
    pub day: i64,
    #[serde(flatten)]
    pub outcome: CheckInOutcome,
}
