// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sync orchestration.
//!
//! Handles the core workflow for one export file:
//! 1. Read and transform the rows (nothing qualifying → done, no remote calls)
//! 2. Make sure the recipient's bitable for the year exists
//! 3. Make sure the month's table exists
//! 4. Push all records in one batch write
//!
//! Every provisioning decision is persisted before moving on, and recorded
//! IDs are never removed, even when the push fails.

use crate::config::Config;
use crate::db::StateStore;
use crate::error::{AppError, Result};
use crate::models::{RecordBatch, SourceRow};
use crate::services::bitable::BitableClient;
use crate::services::provisioner::{ProvisionSettings, ResourceProvisioner};
use crate::services::transform;
use chrono::{Datelike, NaiveDate};
use std::path::Path;

/// Year and month a sync run writes into, as used in names and state keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTarget {
    /// Four digits, e.g. `2024`
    pub year: String,
    /// Two digits, e.g. `03`
    pub month: String,
}

impl RunTarget {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: format!("{:04}", date.year()),
            month: format!("{:02}", date.month()),
        }
    }

    /// Derive the target from an export named `YYYY-MM-DD.<ext>`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| AppError::Input(format!("{}: no file name", path.display())))?;

        NaiveDate::parse_from_str(stem, "%Y-%m-%d")
            .map(Self::from_date)
            .map_err(|_| {
                AppError::Input(format!(
                    "{}: file name is not a YYYY-MM-DD date",
                    path.display()
                ))
            })
    }
}

/// How far a run got for a (recipient, year, month).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Unresolved,
    ContainerKnown,
    TableKnown,
    Pushed,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No row qualified; nothing was provisioned or sent.
    NothingToPush,
    Pushed {
        app_token: String,
        table_id: String,
        records: usize,
    },
}

/// Drives one recipient's sync from export file to bitable.
pub struct SyncService {
    client: BitableClient,
    state: StateStore,
    settings: ProvisionSettings,
}

impl SyncService {
    pub fn new(client: BitableClient, state: StateStore, settings: ProvisionSettings) -> Self {
        Self {
            client,
            state,
            settings,
        }
    }

    /// Build the service from configuration and an already loaded state.
    pub fn from_config(config: &Config, client: BitableClient, state: StateStore) -> Self {
        Self::new(client, state, ProvisionSettings::from(config))
    }

    pub fn state(&self) -> &StateStore {
        &self.state
    }

    pub fn client(&self) -> &BitableClient {
        &self.client
    }

    /// Sync an export file; year and month come from its name.
    pub async fn sync_file<P: AsRef<Path>>(
        &mut self,
        path: P,
        recipient: &str,
        include_filtered: bool,
    ) -> Result<SyncOutcome> {
        let path = path.as_ref();
        let target = RunTarget::from_path(path)?;
        let rows = transform::read_source_file(path)?;
        tracing::info!(path = %path.display(), rows = rows.len(), "Read export file");

        self.sync_rows(&rows, &target, recipient, include_filtered)
            .await
    }

    /// Sync already parsed rows into the given month.
    pub async fn sync_rows(
        &mut self,
        rows: &[SourceRow],
        target: &RunTarget,
        recipient: &str,
        include_filtered: bool,
    ) -> Result<SyncOutcome> {
        let Some(batch) = transform::transform(rows, include_filtered)? else {
            tracing::info!(recipient, "No data to push");
            return Ok(SyncOutcome::NothingToPush);
        };

        let mut phase = SyncPhase::Unresolved;
        let result = self.push(&batch, target, recipient, &mut phase).await;

        if let Err(e) = &result {
            tracing::error!(
                recipient,
                year = %target.year,
                month = %target.month,
                phase = ?phase,
                operation = e.operation().unwrap_or("local"),
                error = %e,
                "Sync failed"
            );
        }
        result
    }

    async fn push(
        &mut self,
        batch: &RecordBatch,
        target: &RunTarget,
        recipient: &str,
        phase: &mut SyncPhase,
    ) -> Result<SyncOutcome> {
        let provisioner = ResourceProvisioner::new(&self.client, &self.settings);

        let app_token = provisioner
            .ensure_container(&mut self.state, recipient, &target.year, &target.month)
            .await?;
        *phase = SyncPhase::ContainerKnown;

        let table_id = provisioner
            .ensure_table(&mut self.state, recipient, &target.year, &target.month)
            .await?;
        *phase = SyncPhase::TableKnown;

        let created = self
            .client
            .batch_create_records(&app_token, &table_id, batch)
            .await?;
        *phase = SyncPhase::Pushed;

        tracing::info!(
            recipient,
            app_token = %app_token,
            table_id = %table_id,
            records = created,
            "Pushed records to bitable"
        );

        Ok(SyncOutcome::Pushed {
            app_token,
            table_id,
            records: created,
        })
    }
}
