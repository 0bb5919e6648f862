//! Batch orchestration of the daily check-in workflow.
//!
//! Drives the per-forum executor across every enumerated forum, strictly
//! sequentially: blacklist skips, same-day reuse of recorded outcomes,
//! a fixed cooldown between network calls, cooperative abort, and the
//! run-bound bookkeeping that makes interrupted runs detectable.

pub mod abort;
pub mod observer;
pub mod orchestrator;
pub mod report;
pub mod startup;
pub mod state;

pub use abort::AbortFlag;
pub use observer::{NoopObserver, RunObserver};
pub use orchestrator::{Orchestrator, MSG_BLOCKED};
pub use report::RunReport;
pub use startup::{startup_check, StartupCheck};
pub use state::RunState;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchError {
    /// Enumeration failed; the run never reached per-forum processing.
    #[error("forum enumeration failed: {0}")]
    Listing(#[source] tbsign_client::ClientError),

    #[error(transparent)]
    Store(#[from] tbsign_store::StoreError),
}
