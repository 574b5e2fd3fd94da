// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - remote calls, provisioning and sync logic.

pub mod bitable;
pub mod credentials;
pub mod provisioner;
pub mod sync;
pub mod transform;
pub mod transport;

pub use bitable::BitableClient;
pub use credentials::{AccessCredential, CredentialManager};
pub use provisioner::{ProvisionSettings, ResourceProvisioner};
pub use sync::{RunTarget, SyncOutcome, SyncPhase, SyncService};
pub use transport::{ApiRequest, HttpTransport, Transport, TransportError};
