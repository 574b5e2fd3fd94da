// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Feishu Bitable sync: push the daily curated paper export into Feishu.
//!
//! This crate reads the tab-delimited export of the paper pipeline and
//! writes the selected rows into a per-user, per-year bitable, one table per
//! month, provisioning both on demand.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
