//! Flat-file persistence for settings and check-in progress.
//!
//! Two JSON documents under a data directory: one for user preferences,
//! one for the per-user/per-forum/per-day progress record. Every mutation
//! is written through immediately: last write wins, no batching, no
//! transactions. Another process writing concurrently is detected after
//! the fact by the run-bounds check, never prevented.

mod document;
pub mod error;
pub mod progress;
pub mod settings;

pub use error::StoreError;
pub use progress::ProgressStore;
pub use settings::SettingsStore;

/// File name of the settings document inside the data directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// File name of the progress document inside the data directory.
pub const PROGRESS_FILE: &str = "progress.json";
