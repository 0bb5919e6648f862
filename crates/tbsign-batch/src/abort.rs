//! Cooperative abort flag.
//!
//! Cloned handles share one flag; the orchestrator polls it once per loop
//! iteration, so an in-flight request always completes before the run
//! stops. Not preemptive.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct AbortFlag(Arc<AtomicBool>);

impl AbortFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that the current run stop before its next forum.
    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
