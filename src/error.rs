// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent failure reporting.

/// Application error type.
///
/// Every variant that comes from the network names the operation that failed,
/// so a failed run can report which provisioning or push step broke.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to obtain access credential{}: {message}", fmt_code(.code))]
    Auth { code: Option<i64>, message: String },

    #[error("{operation} failed with code {code}: {message}")]
    Remote {
        operation: &'static str,
        code: i64,
        message: String,
    },

    #[error("{operation} failed: {message}")]
    Transport {
        operation: &'static str,
        message: String,
    },

    #[error("Invalid input row {row}: {message}")]
    Transform { row: usize, message: String },

    #[error("Invalid input file: {0}")]
    Input(String),

    #[error("State file error: {0}")]
    State(String),
}

fn fmt_code(code: &Option<i64>) -> String {
    code.map(|c| format!(" (code {})", c)).unwrap_or_default()
}

impl AppError {
    /// Operation used for the credential exchange.
    pub const AUTH_OPERATION: &'static str = "obtain_credential";

    /// Name of the remote step that failed, if this error came from one.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            AppError::Auth { .. } => Some(Self::AUTH_OPERATION),
            AppError::Remote { operation, .. } | AppError::Transport { operation, .. } => {
                Some(operation)
            }
            _ => None,
        }
    }

    /// Check if this error means the app id/secret pair could not be exchanged
    /// for a credential.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, AppError::Auth { .. })
    }

    /// Application status code returned by the service, if any.
    pub fn remote_code(&self) -> Option<i64> {
        match self {
            AppError::Auth { code, .. } => *code,
            AppError::Remote { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_names_operation_and_code() {
        let err = AppError::Remote {
            operation: "create_table",
            code: 1254001,
            message: "WrongRequestBody".to_string(),
        };
        assert_eq!(err.operation(), Some("create_table"));
        assert_eq!(err.remote_code(), Some(1254001));
        assert_eq!(
            err.to_string(),
            "create_table failed with code 1254001: WrongRequestBody"
        );
        assert!(!err.is_auth_error());
    }

    #[test]
    fn test_auth_error_display() {
        let err = AppError::Auth {
            code: Some(99),
            message: "invalid app_secret".to_string(),
        };
        assert!(err.is_auth_error());
        assert_eq!(
            err.to_string(),
            "Failed to obtain access credential (code 99): invalid app_secret"
        );

        let err = AppError::Auth {
            code: None,
            message: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to obtain access credential: connection refused"
        );
    }

    #[test]
    fn test_local_errors_have_no_operation() {
        let err = AppError::Transform {
            row: 3,
            message: "bad date".to_string(),
        };
        assert_eq!(err.operation(), None);
        assert_eq!(err.remote_code(), None);
    }
}
