//! Observer seam between the orchestrator and whatever renders progress.
//!
//! The core never touches a UI; a front end subscribes to state changes
//! and per-forum outcomes through this trait.

use tbsign_core::CheckInOutcome;

use crate::state::RunState;

pub trait RunObserver: Send + Sync {
    fn on_state_change(&self, _state: RunState) {}

    /// One forum has been accounted for, whether by a fresh check-in, a
    /// reused same-day record, or a blacklist skip. `index` is the forum's
    /// position in enumeration order.
    fn on_progress(&self, _index: usize, _total: usize, _forum: &str, _outcome: &CheckInOutcome) {}
}

/// Observer that ignores everything. For callers that only want the
/// returned report.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}
