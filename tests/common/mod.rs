// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

#![allow(dead_code)]

use async_trait::async_trait;
use feishu_bitable_sync::models::{Interest, SourceRow};
use feishu_bitable_sync::services::{ApiRequest, BitableClient, Transport, TransportError};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Request as seen by the mock transport.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub operation: &'static str,
    pub path: String,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

/// Offline transport answering by operation name.
///
/// One-shot responses queued with `push` are used first, then the default
/// for the operation. Defaults cover every endpoint with a success reply.
#[derive(Default)]
pub struct MockTransport {
    queued: Mutex<HashMap<&'static str, VecDeque<Result<Value, TransportError>>>>,
    defaults: Mutex<HashMap<&'static str, Value>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        let mock = Self::default();
        {
            let mut defaults = mock.defaults.lock().unwrap();
            defaults.insert(
                "obtain_credential",
                json!({"code": 0, "msg": "ok", "tenant_access_token": "t-token", "expire": 7200}),
            );
            defaults.insert(
                "create_app",
                ok(json!({"app": {"app_token": "app_new", "default_table_id": "tbl_placeholder"}})),
            );
            defaults.insert("transfer_owner", ok(json!({})));
            defaults.insert("create_table", ok(json!({"table_id": "tbl_new"})));
            defaults.insert("create_view", ok(json!({"view": {"view_id": "vew_1"}})));
            defaults.insert("delete_table", ok(json!({})));
            defaults.insert(
                "list_tables",
                ok(json!({"has_more": false, "items": [], "total": 0})),
            );
            defaults.insert(
                "batch_create_records",
                ok(json!({"records": [{"record_id": "rec_1"}]})),
            );
        }
        Arc::new(mock)
    }

    /// Queue a one-shot reply for an operation.
    pub fn push(&self, operation: &'static str, reply: Value) {
        self.queued
            .lock()
            .unwrap()
            .entry(operation)
            .or_default()
            .push_back(Ok(reply));
    }

    /// Queue a one-shot transport failure for an operation.
    pub fn push_error(&self, operation: &'static str, error: TransportError) {
        self.queued
            .lock()
            .unwrap()
            .entry(operation)
            .or_default()
            .push_back(Err(error));
    }

    /// Replace the default reply for an operation.
    pub fn set_default(&self, operation: &'static str, reply: Value) {
        self.defaults.lock().unwrap().insert(operation, reply);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Operation names in call order.
    pub fn operations(&self) -> Vec<&'static str> {
        self.calls().iter().map(|c| c.operation).collect()
    }

    /// Operation names in call order, without token refreshes.
    pub fn api_operations(&self) -> Vec<&'static str> {
        self.operations()
            .into_iter()
            .filter(|op| *op != "obtain_credential")
            .collect()
    }

    pub fn count(&self, operation: &str) -> usize {
        self.operations().iter().filter(|op| **op == operation).count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        request: &ApiRequest,
        bearer: Option<&str>,
    ) -> Result<Value, TransportError> {
        self.calls.lock().unwrap().push(RecordedCall {
            operation: request.operation,
            path: request.path.clone(),
            bearer: bearer.map(str::to_string),
            body: request.body.clone(),
        });

        if let Some(reply) = self
            .queued
            .lock()
            .unwrap()
            .get_mut(request.operation)
            .and_then(|q| q.pop_front())
        {
            return reply;
        }

        self.defaults
            .lock()
            .unwrap()
            .get(request.operation)
            .cloned()
            .ok_or_else(|| TransportError::Request(format!("no reply for {}", request.operation)))
    }
}

/// Success envelope around `data`.
pub fn ok(data: Value) -> Value {
    json!({"code": 0, "msg": "success", "data": data})
}

/// Failure envelope.
pub fn fail(code: i64, msg: &str) -> Value {
    json!({"code": code, "msg": msg})
}

/// Client over the mock with the given attempt budget.
pub fn test_client(mock: &Arc<MockTransport>, max_attempts: u32) -> BitableClient {
    BitableClient::new(
        mock.clone(),
        "cli_test_app".to_string(),
        "test_secret".to_string(),
        max_attempts,
    )
}

/// A well-formed row with the given title and interest.
pub fn row(title: &str, interest: Interest) -> SourceRow {
    SourceRow {
        title: title.to_string(),
        interest,
        title_translated: String::new(),
        categories: "cs.CL".to_string(),
        authors: "A. Author".to_string(),
        primary_link: "http://x/1".to_string(),
        secondary_link: "http://y/1".to_string(),
        first_submitted: "2024-01-05".to_string(),
        first_announced: "2024-01-06".to_string(),
        abstract_text: "abs".to_string(),
        abstract_translated: String::new(),
        comments: String::new(),
        note: String::new(),
    }
}
