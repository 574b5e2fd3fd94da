// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Feishu Bitable API client.
//!
//! Handles:
//! - Attaching a freshly refreshed tenant token to every call
//! - Decoding the `{code, msg, data}` envelope once, at this boundary
//! - Bounded, immediate retry of failed calls
//! - Typed wrappers for the bitable, table, view, record and permission
//!   endpoints used during provisioning and push

use crate::error::{AppError, Result};
use crate::models::{RecordBatch, TableField};
use crate::services::credentials::CredentialManager;
use crate::services::transport::{ApiRequest, Transport, TransportError};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Response envelope shared by every Open API endpoint.
#[derive(Debug, Deserialize)]
struct Envelope {
    code: i64,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: Value,
}

/// Why a single attempt failed.
#[derive(Debug)]
enum AttemptError {
    Application { code: i64, message: String },
    Transport(TransportError),
    Malformed(String),
}

impl std::fmt::Display for AttemptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptError::Application { code, message } => write!(f, "code {}: {}", code, message),
            AttemptError::Transport(e) => write!(f, "{}", e),
            AttemptError::Malformed(msg) => write!(f, "malformed response: {}", msg),
        }
    }
}

impl AttemptError {
    fn into_app_error(self, operation: &'static str) -> AppError {
        match self {
            AttemptError::Application { code, message } => AppError::Remote {
                operation,
                code,
                message,
            },
            AttemptError::Transport(e) => AppError::Transport {
                operation,
                message: e.to_string(),
            },
            AttemptError::Malformed(message) => AppError::Transport { operation, message },
        }
    }
}

/// Decode an envelope into `Ok(data)` or the application failure it carries.
fn decode_envelope<T: DeserializeOwned>(body: Value) -> std::result::Result<T, AttemptError> {
    let envelope: Envelope =
        serde_json::from_value(body).map_err(|e| AttemptError::Malformed(e.to_string()))?;

    if envelope.code != 0 {
        return Err(AttemptError::Application {
            code: envelope.code,
            message: envelope.msg,
        });
    }

    serde_json::from_value(envelope.data).map_err(|e| AttemptError::Malformed(e.to_string()))
}

/// Bitable API client with credential handling and retry.
pub struct BitableClient {
    transport: Arc<dyn Transport>,
    credentials: CredentialManager,
    max_attempts: u32,
}

impl BitableClient {
    /// Create a client; `max_attempts` applies both to token refresh and to
    /// each API call.
    pub fn new(
        transport: Arc<dyn Transport>,
        app_id: String,
        app_secret: String,
        max_attempts: u32,
    ) -> Self {
        let credentials =
            CredentialManager::new(transport.clone(), app_id, app_secret, max_attempts);
        Self {
            transport,
            credentials,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn credentials(&self) -> &CredentialManager {
        &self.credentials
    }

    /// Send a request, retrying immediately on failure.
    ///
    /// A fresh token is fetched before every attempt. If the token itself
    /// cannot be obtained the call is abandoned with `AppError::Auth`.
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let operation = request.operation;
        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            let credential = self.credentials.refresh().await?;

            let outcome = match self
                .transport
                .send(&request, Some(credential.token()))
                .await
            {
                Ok(body) => decode_envelope(body),
                Err(e) => Err(AttemptError::Transport(e)),
            };

            match outcome {
                Ok(data) => {
                    tracing::debug!(operation, attempt, "Request succeeded");
                    return Ok(data);
                }
                Err(e) => {
                    tracing::warn!(
                        operation,
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "Request failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        let error = last_error
            .map(|e| e.into_app_error(operation))
            .unwrap_or_else(|| AppError::Transport {
                operation,
                message: "no attempt made".to_string(),
            });
        tracing::error!(operation, error = %error, "Giving up after retries");
        Err(error)
    }

    // ─── Bitable apps ────────────────────────────────────────────────────────

    /// Create a bitable app. The service always adds a placeholder table.
    pub async fn create_app(
        &self,
        name: &str,
        folder_token: &str,
        time_zone: &str,
    ) -> Result<CreatedApp> {
        let request = ApiRequest::post("create_app", "/bitable/v1/apps").json(serde_json::json!({
            "name": name,
            "folder_token": folder_token,
            "time_zone": time_zone,
        }));

        let data: CreateAppData = self.execute(request).await?;
        Ok(data.app)
    }

    /// Hand ownership of a bitable to a user, keeping the app as collaborator.
    pub async fn transfer_owner(&self, app_token: &str, user_id: &str) -> Result<()> {
        let request = ApiRequest::post(
            "transfer_owner",
            format!("/drive/v1/permissions/{}/members/transfer_owner", app_token),
        )
        .query("type", "bitable")
        .query("remove_old_owner", "false")
        .json(serde_json::json!({
            "member_type": "userid",
            "member_id": user_id,
        }));

        let _: IgnoredAny = self.execute(request).await?;
        Ok(())
    }

    // ─── Tables ──────────────────────────────────────────────────────────────

    /// Create a table with the given fields; returns its table ID.
    pub async fn create_table(
        &self,
        app_token: &str,
        name: &str,
        default_view_name: &str,
        fields: &[TableField],
    ) -> Result<String> {
        let request = ApiRequest::post(
            "create_table",
            format!("/bitable/v1/apps/{}/tables", app_token),
        )
        .json(serde_json::json!({
            "table": {
                "name": name,
                "default_view_name": default_view_name,
                "fields": fields,
            }
        }));

        let data: CreateTableData = self.execute(request).await?;
        Ok(data.table_id)
    }

    pub async fn delete_table(&self, app_token: &str, table_id: &str) -> Result<()> {
        let request = ApiRequest::delete(
            "delete_table",
            format!("/bitable/v1/apps/{}/tables/{}", app_token, table_id),
        );

        let _: IgnoredAny = self.execute(request).await?;
        Ok(())
    }

    /// List tables (first page only).
    pub async fn list_tables(&self, app_token: &str, page_size: u32) -> Result<Vec<TableSummary>> {
        let request = ApiRequest::get(
            "list_tables",
            format!("/bitable/v1/apps/{}/tables", app_token),
        )
        .query("page_size", page_size);

        let data: ListTablesData = self.execute(request).await?;
        Ok(data.items)
    }

    // ─── Views ───────────────────────────────────────────────────────────────

    pub async fn create_view(
        &self,
        app_token: &str,
        table_id: &str,
        view_name: &str,
        view_type: &str,
    ) -> Result<()> {
        let request = ApiRequest::post(
            "create_view",
            format!("/bitable/v1/apps/{}/tables/{}/views", app_token, table_id),
        )
        .json(serde_json::json!({
            "view_name": view_name,
            "view_type": view_type,
        }));

        let _: IgnoredAny = self.execute(request).await?;
        Ok(())
    }

    // ─── Records ─────────────────────────────────────────────────────────────

    /// Upload records in one request; returns how many the service created.
    pub async fn batch_create_records(
        &self,
        app_token: &str,
        table_id: &str,
        batch: &RecordBatch,
    ) -> Result<usize> {
        let body = serde_json::to_value(batch).map_err(|e| AppError::Transport {
            operation: "batch_create_records",
            message: format!("Failed to encode records: {}", e),
        })?;

        let request = ApiRequest::post(
            "batch_create_records",
            format!(
                "/bitable/v1/apps/{}/tables/{}/records/batch_create",
                app_token, table_id
            ),
        )
        .json(body);

        let data: BatchCreateData = self.execute(request).await?;
        Ok(data.records.len())
    }
}

/// Bitable created by `create_app`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedApp {
    pub app_token: String,
    pub default_table_id: String,
}

#[derive(Debug, Deserialize)]
struct CreateAppData {
    app: CreatedApp,
}

#[derive(Debug, Deserialize)]
struct CreateTableData {
    table_id: String,
}

/// Entry of a table listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TableSummary {
    pub name: String,
    pub table_id: String,
}

#[derive(Debug, Deserialize)]
struct ListTablesData {
    #[serde(default)]
    items: Vec<TableSummary>,
}

#[derive(Debug, Deserialize)]
struct BatchCreateData {
    #[serde(default)]
    records: Vec<IgnoredAny>,
}
