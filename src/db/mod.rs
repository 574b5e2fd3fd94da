// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence layer (local JSON state file).

pub mod state_store;

pub use state_store::StateStore;
