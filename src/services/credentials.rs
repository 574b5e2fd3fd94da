// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tenant access token management.
//!
//! Feishu tenant tokens live for about two hours but may be rotated at any
//! point in the last thirty minutes. Rather than tracking expiry locally,
//! callers fetch a fresh token right before every privileged request.

use crate::error::{AppError, Result};
use crate::services::transport::{ApiRequest, Transport};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Path of the internal-app token endpoint.
pub const TOKEN_PATH: &str = "/auth/v3/tenant_access_token/internal";

/// A tenant access token and when it was issued.
#[derive(Clone)]
pub struct AccessCredential {
    token: String,
    issued_at: DateTime<Utc>,
    expires_in: Duration,
}

impl AccessCredential {
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Expiry reported by the service. Informational only.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.issued_at + self.expires_in
    }
}

impl std::fmt::Debug for AccessCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessCredential")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at())
            .finish()
    }
}

/// Token endpoint response. Unlike the other endpoints, the token sits at
/// the top level of the envelope rather than under `data`.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    code: i64,
    #[serde(default)]
    msg: String,
    tenant_access_token: Option<String>,
    #[serde(default)]
    expire: i64,
}

/// Exchanges the app ID/secret pair for tenant access tokens.
pub struct CredentialManager {
    transport: Arc<dyn Transport>,
    app_id: String,
    app_secret: String,
    max_attempts: u32,
    current: Mutex<Option<AccessCredential>>,
}

impl CredentialManager {
    pub fn new(
        transport: Arc<dyn Transport>,
        app_id: String,
        app_secret: String,
        max_attempts: u32,
    ) -> Self {
        Self {
            transport,
            app_id,
            app_secret,
            max_attempts: max_attempts.max(1),
            current: Mutex::new(None),
        }
    }

    /// Most recently obtained credential, if any.
    pub async fn current(&self) -> Option<AccessCredential> {
        self.current.lock().await.clone()
    }

    /// Obtain a fresh credential and make it the held one.
    ///
    /// Both application failures (`code != 0`) and transport failures use up
    /// an attempt; retries are immediate.
    pub async fn refresh(&self) -> Result<AccessCredential> {
        let request = ApiRequest::post(AppError::AUTH_OPERATION, TOKEN_PATH).json(
            serde_json::json!({
                "app_id": self.app_id,
                "app_secret": self.app_secret,
            }),
        );

        let mut last_error = AppError::Auth {
            code: None,
            message: "no attempt made".to_string(),
        };

        for attempt in 1..=self.max_attempts {
            match self.request_token(&request).await {
                Ok(credential) => {
                    *self.current.lock().await = Some(credential.clone());
                    tracing::debug!(attempt, "Tenant access token refreshed");
                    return Ok(credential);
                }
                Err(e) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "Tenant access token request failed"
                    );
                    last_error = e;
                }
            }
        }

        tracing::error!(error = %last_error, "Giving up on tenant access token");
        Err(last_error)
    }

    async fn request_token(&self, request: &ApiRequest) -> Result<AccessCredential> {
        let body = self
            .transport
            .send(request, None)
            .await
            .map_err(|e| AppError::Auth {
                code: None,
                message: e.to_string(),
            })?;

        let response: TokenResponse = serde_json::from_value(body).map_err(|e| AppError::Auth {
            code: None,
            message: format!("Malformed token response: {}", e),
        })?;

        if response.code != 0 {
            return Err(AppError::Auth {
                code: Some(response.code),
                message: response.msg,
            });
        }

        let token = response
            .tenant_access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Auth {
                code: Some(0),
                message: "Token missing from response".to_string(),
            })?;

        Ok(AccessCredential {
            token,
            issued_at: Utc::now(),
            expires_in: Duration::seconds(response.expire),
        })
    }
}
