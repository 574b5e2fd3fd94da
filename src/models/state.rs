// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persisted provisioning state: recipient → year → bitable and monthly tables.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything provisioned so far, keyed by recipient user ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProvisioningState {
    pub recipients: BTreeMap<String, RecipientEntry>,
}

/// Per-recipient entries keyed by four-digit year.
pub type RecipientEntry = BTreeMap<String, YearEntry>;

/// One yearly bitable and the monthly tables known inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearEntry {
    #[serde(rename = "bitable_token", alias = "containerToken")]
    pub app_token: String,
    /// Two-digit month → table ID
    #[serde(rename = "tables_id", alias = "tablesById", default)]
    pub tables: BTreeMap<String, String>,
}

impl ProvisioningState {
    pub fn year(&self, recipient: &str, year: &str) -> Option<&YearEntry> {
        self.recipients.get(recipient)?.get(year)
    }

    pub fn table(&self, recipient: &str, year: &str, month: &str) -> Option<&str> {
        self.year(recipient, year)?
            .tables
            .get(month)
            .map(String::as_str)
    }
}
