//! Startup decision: should an automatic run fire, and does the previous
//! run look interrupted?

use tbsign_core::Settings;
use tbsign_store::ProgressStore;

/// What the caller should do at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupCheck {
    /// Automatic runs are enabled and today's run has not started yet.
    pub should_run: bool,
    /// The previous run started but never completed (crash or a
    /// concurrent process against the same store). Only reported when no
    /// automatic run fires; a fresh run supersedes the warning.
    pub incomplete_previous_run: bool,
}

#[must_use]
pub fn startup_check(
    settings: &Settings,
    progress: &ProgressStore,
    user: &str,
    today: i64,
) -> StartupCheck {
    let should_run = settings.auto_run && progress.run_started_on(user) != today;
    let incomplete_previous_run = !should_run && progress.has_incomplete_run(user);
    StartupCheck {
        should_run,
        incomplete_previous_run,
    }
}
