// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Provisioning of the yearly bitable and its monthly tables.
//!
//! A new bitable is set up in five sequential steps:
//! 1. Create the bitable (the service adds a placeholder table)
//! 2. Transfer ownership to the recipient
//! 3. Create the month's table with the paper schema
//! 4. Add a kanban view to that table
//! 5. Delete the placeholder table
//!
//! State is only written once all five succeed. There is no rollback: a
//! failure part way through leaves an orphaned bitable behind, and the next
//! run starts over with a new one.

use crate::config::Config;
use crate::db::StateStore;
use crate::error::{AppError, Result};
use crate::models::schema;
use crate::services::bitable::{BitableClient, TableSummary};

/// Settings that shape newly provisioned resources.
#[derive(Debug, Clone)]
pub struct ProvisionSettings {
    /// Bitable name prefix; the year is appended
    pub container_prefix: String,
    pub folder_token: String,
    pub time_zone: String,
    /// Name of the grid view every new table starts with
    pub default_view_name: String,
    pub kanban_view_name: String,
    /// Page size for the table listing (single page)
    pub list_page_size: u32,
}

impl Default for ProvisionSettings {
    fn default() -> Self {
        Self {
            container_prefix: "arXiv-文献库".to_string(),
            folder_token: String::new(),
            time_zone: "Asia/Shanghai".to_string(),
            default_view_name: "表格".to_string(),
            kanban_view_name: "看板".to_string(),
            list_page_size: 100,
        }
    }
}

impl From<&Config> for ProvisionSettings {
    fn from(config: &Config) -> Self {
        Self {
            container_prefix: config.container_prefix.clone(),
            folder_token: config.folder_token.clone(),
            time_zone: config.time_zone.clone(),
            ..Default::default()
        }
    }
}

impl ProvisionSettings {
    pub fn container_name(&self, year: &str) -> String {
        format!("{}-{}", self.container_prefix, year)
    }
}

const KANBAN_VIEW_TYPE: &str = "kanban";

/// Creates or finds the destination for a recipient's month.
pub struct ResourceProvisioner<'a> {
    client: &'a BitableClient,
    settings: &'a ProvisionSettings,
}

impl<'a> ResourceProvisioner<'a> {
    pub fn new(client: &'a BitableClient, settings: &'a ProvisionSettings) -> Self {
        Self { client, settings }
    }

    /// Return the recipient's bitable for `year`, provisioning it on a miss.
    ///
    /// On a miss the table for `month` is created as part of the sequence and
    /// recorded together with the bitable.
    pub async fn ensure_container(
        &self,
        state: &mut StateStore,
        recipient: &str,
        year: &str,
        month: &str,
    ) -> Result<String> {
        if let Some(app_token) = state.app_token(recipient, year) {
            tracing::debug!(recipient, year, app_token, "Bitable already provisioned");
            return Ok(app_token.to_string());
        }

        let name = self.settings.container_name(year);
        tracing::info!(recipient, year, name = %name, "Provisioning bitable");

        let app = self
            .client
            .create_app(&name, &self.settings.folder_token, &self.settings.time_zone)
            .await?;
        tracing::info!(app_token = %app.app_token, "Bitable created");

        self.client
            .transfer_owner(&app.app_token, recipient)
            .await?;
        tracing::info!(app_token = %app.app_token, recipient, "Ownership transferred");

        let table_id = self.create_month_table(&app.app_token, month).await?;

        self.client
            .delete_table(&app.app_token, &app.default_table_id)
            .await?;
        tracing::debug!(
            app_token = %app.app_token,
            table_id = %app.default_table_id,
            "Placeholder table deleted"
        );

        state.record_container(recipient, year, &app.app_token, month, &table_id)?;
        Ok(app.app_token)
    }

    /// Return the table for `month` inside the recipient's known bitable.
    ///
    /// Order of preference: the cached ID, a listed table whose name is the
    /// month (first match wins), then a newly created table.
    pub async fn ensure_table(
        &self,
        state: &mut StateStore,
        recipient: &str,
        year: &str,
        month: &str,
    ) -> Result<String> {
        if let Some(table_id) = state.table_id(recipient, year, month) {
            tracing::debug!(recipient, year, month, table_id, "Table cached");
            return Ok(table_id.to_string());
        }

        let app_token = state
            .app_token(recipient, year)
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::State(format!("No bitable recorded for {} in {}", recipient, year))
            })?;

        let tables = self
            .client
            .list_tables(&app_token, self.settings.list_page_size)
            .await?;

        let table_id = match find_table(&tables, month) {
            Some(existing) => {
                tracing::info!(
                    app_token = %app_token,
                    month,
                    table_id = %existing.table_id,
                    "Reusing existing table"
                );
                existing.table_id.clone()
            }
            None => self.create_month_table(&app_token, month).await?,
        };

        state.record_table(recipient, year, month, &table_id)?;
        Ok(table_id)
    }

    /// Create a table named after the month, plus its kanban view.
    async fn create_month_table(&self, app_token: &str, month: &str) -> Result<String> {
        let table_id = self
            .client
            .create_table(
                app_token,
                month,
                &self.settings.default_view_name,
                &schema::table_fields(),
            )
            .await?;

        self.client
            .create_view(
                app_token,
                &table_id,
                &self.settings.kanban_view_name,
                KANBAN_VIEW_TYPE,
            )
            .await?;

        tracing::info!(app_token, month, table_id = %table_id, "Table created");
        Ok(table_id)
    }
}

/// First listed table named exactly `name`.
pub fn find_table<'t>(tables: &'t [TableSummary], name: &str) -> Option<&'t TableSummary> {
    tables.iter().find(|t| t.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(name: &str, id: &str) -> TableSummary {
        TableSummary {
            name: name.to_string(),
            table_id: id.to_string(),
        }
    }

    #[test]
    fn test_find_table_first_match_wins() {
        let tables = vec![
            summary("02", "tbl_a"),
            summary("03", "tbl_b"),
            summary("03", "tbl_c"),
        ];
        assert_eq!(find_table(&tables, "03").unwrap().table_id, "tbl_b");
        assert!(find_table(&tables, "3").is_none());
        assert!(find_table(&[], "03").is_none());
    }

    #[test]
    fn test_container_name() {
        let settings = ProvisionSettings::default();
        assert_eq!(settings.container_name("2024"), "arXiv-文献库-2024");
    }
}
