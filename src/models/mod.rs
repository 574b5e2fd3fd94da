// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod record;
pub mod schema;
pub mod state;

pub use record::{DestinationRecord, Interest, Link, RecordBatch, SourceRow};
pub use schema::TableField;
pub use state::{ProvisioningState, YearEntry};
