/// Lifecycle of one run.
///
/// `Idle → Listing → Running → {Finished | Aborted}`; a failure while
/// listing goes to the terminal `ListingFailed` state instead. No
/// per-forum processing has happened at that point, so the run is not
/// "aborted" and leaves no bookkeeping behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Listing,
    Running,
    Finished,
    Aborted,
    ListingFailed,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunState::Idle => write!(f, "idle"),
            RunState::Listing => write!(f, "listing"),
            RunState::Running => write!(f, "running"),
            RunState::Finished => write!(f, "finished"),
            RunState::Aborted => write!(f, "aborted"),
            RunState::ListingFailed => write!(f, "listing failed"),
        }
    }
}
