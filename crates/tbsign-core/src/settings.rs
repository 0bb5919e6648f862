//! User preferences for the check-in workflow.
//!
//! Loaded once at startup and persisted by the store layer on every edit.
//! Defaults: 650 ms between requests, empty blacklist, widget pinned
//! bottom-centre, automatic runs on.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Cooldown between consecutive check-in requests, in milliseconds.
    /// Too small a value gets requests rejected by the site.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Forum names to skip entirely: no network call, counted as failed.
    #[serde(default)]
    pub blacklist: Vec<String>,

    /// Widget position as percentages of the viewport, `(x, y)`.
    /// Carried for the UI layer; no behavior in the core.
    #[serde(default = "default_widget_pos")]
    pub widget_pos: (f64, f64),

    /// Whether a run fires automatically at startup when today's run has
    /// not started yet.
    #[serde(default = "default_auto_run")]
    pub auto_run: bool,
}

fn default_interval_ms() -> u64 {
    650
}

fn default_widget_pos() -> (f64, f64) {
    (50.0, 100.0)
}

fn default_auto_run() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            interval_ms: default_interval_ms(),
            blacklist: Vec::new(),
            widget_pos: default_widget_pos(),
            auto_run: default_auto_run(),
        }
    }
}

impl Settings {
    #[must_use]
    pub fn is_blacklisted(&self, forum: &str) -> bool {
        self.blacklist.iter().any(|entry| entry == forum)
    }
}
