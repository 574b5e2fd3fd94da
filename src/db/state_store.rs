// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON file store for provisioning state.
//!
//! The whole file is read once at startup and rewritten after every change.
//! There is no locking: two processes syncing the same recipient at the same
//! time can both provision a bitable, and the last writer wins.

use crate::error::{AppError, Result};
use crate::models::{ProvisioningState, YearEntry};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Provisioning state bound to the file it is persisted in.
#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
    state: ProvisioningState,
}

impl StateStore {
    /// Load state from `path`. A missing file is an empty state.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let state = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => ProvisioningState::default(),
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                AppError::State(format!("Failed to parse {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No state file yet, starting empty");
                ProvisioningState::default()
            }
            Err(e) => {
                return Err(AppError::State(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        Ok(Self { path, state })
    }

    /// Store that starts empty, ignoring whatever is on disk.
    pub fn empty<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            state: ProvisioningState::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> &ProvisioningState {
        &self.state
    }

    // ─── Lookups ─────────────────────────────────────────────────

    /// Bitable app token for the recipient's year, if one was provisioned.
    pub fn app_token(&self, recipient: &str, year: &str) -> Option<&str> {
        self.state
            .year(recipient, year)
            .map(|entry| entry.app_token.as_str())
    }

    /// Table ID for the recipient's month, if known.
    pub fn table_id(&self, recipient: &str, year: &str, month: &str) -> Option<&str> {
        self.state.table(recipient, year, month)
    }

    // ─── Mutations (each one persists) ───────────────────────────

    /// Record a newly provisioned yearly bitable together with its first table.
    ///
    /// Replaces any previous entry for the recipient's year.
    pub fn record_container(
        &mut self,
        recipient: &str,
        year: &str,
        app_token: &str,
        month: &str,
        table_id: &str,
    ) -> Result<()> {
        let mut entry = YearEntry {
            app_token: app_token.to_string(),
            ..Default::default()
        };
        entry
            .tables
            .insert(month.to_string(), table_id.to_string());

        self.state
            .recipients
            .entry(recipient.to_string())
            .or_default()
            .insert(year.to_string(), entry);

        self.save()
    }

    /// Record the table for a month inside an already known bitable.
    pub fn record_table(
        &mut self,
        recipient: &str,
        year: &str,
        month: &str,
        table_id: &str,
    ) -> Result<()> {
        let entry = self
            .state
            .recipients
            .get_mut(recipient)
            .and_then(|years| years.get_mut(year))
            .ok_or_else(|| {
                AppError::State(format!(
                    "No bitable recorded for {} in {}",
                    recipient, year
                ))
            })?;

        entry
            .tables
            .insert(month.to_string(), table_id.to_string());

        self.save()
    }

    /// Rewrite the state file atomically (temp file in the same directory,
    /// then rename).
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.state)
            .map_err(|e| AppError::State(format!("Failed to serialize state: {}", e)))?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| self.write_error(e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| self.write_error(e))?;
        tmp.write_all(json.as_bytes())
            .and_then(|_| tmp.write_all(b"\n"))
            .map_err(|e| self.write_error(e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.write_error(e.error))?;

        tracing::debug!(path = %self.path.display(), "State file written");
        Ok(())
    }

    fn write_error(&self, e: std::io::Error) -> AppError {
        AppError::State(format!("Failed to write {}: {}", self.path.display(), e))
    }
}
