//! Settings document: user preferences, written through on every edit.

use std::path::{Path, PathBuf};

use tbsign_core::Settings;

use crate::document;
use crate::error::StoreError;

#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// Opens the settings document, starting from defaults when the file
    /// does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or
    /// parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let settings = document::load(&path)?;
        Ok(Self { path, settings })
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Applies an edit and persists immediately.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails. The in-memory settings
    /// keep the edit either way (last-write-wins against the file).
    pub fn update(&mut self, edit: impl FnOnce(&mut Settings)) -> Result<(), StoreError> {
        edit(&mut self.settings);
        document::write(&self.path, &self.settings)
    }

    /// Adds a forum to the blacklist if not already present.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    pub fn blacklist_add(&mut self, forum: &str) -> Result<bool, StoreError> {
        if self.settings.is_blacklisted(forum) {
            return Ok(false);
        }
        self.update(|s| s.blacklist.push(forum.to_owned()))?;
        Ok(true)
    }

    /// Removes a forum from the blacklist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    pub fn blacklist_remove(&mut self, forum: &str) -> Result<bool, StoreError> {
        let before = self.settings.blacklist.len();
        self.update(|s| s.blacklist.retain(|entry| entry != forum))?;
        Ok(self.settings.blacklist.len() != before)
    }
}
