// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local runs.

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use validator::Validate;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone, Validate)]
pub struct Config {
    // --- Feishu application credentials ---
    /// Feishu app ID
    #[validate(length(min = 1))]
    pub app_id: String,
    /// Feishu app secret
    #[validate(length(min = 1))]
    pub app_secret: String,

    // --- Destination ---
    /// User ID that receives ownership of provisioned bitables
    #[validate(length(min = 1))]
    pub user_id: String,
    /// Push every row instead of only `chosen` ones
    pub include_filtered: bool,
    /// Open API base URL
    pub base_url: String,
    /// Time zone of newly created bitables
    pub time_zone: String,
    /// Folder that new bitables are created in (empty = root)
    pub folder_token: String,
    /// Bitable name prefix; the year is appended
    pub container_prefix: String,

    // --- Request behavior ---
    /// Attempts per remote call (1 = no retry)
    #[validate(range(min = 1, max = 10))]
    pub max_attempts: u32,
    /// Per-request HTTP timeout
    pub http_timeout: Duration,

    // --- Local files ---
    /// Persisted provisioning state
    pub state_file: PathBuf,
    /// Directory holding the daily TSV exports
    pub output_dir: PathBuf,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            app_id: "cli_test_app".to_string(),
            app_secret: "test_secret".to_string(),
            user_id: "ou_test_user".to_string(),
            include_filtered: false,
            base_url: DEFAULT_BASE_URL.to_string(),
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            folder_token: String::new(),
            container_prefix: DEFAULT_CONTAINER_PREFIX.to_string(),
            max_attempts: 1,
            http_timeout: Duration::from_secs(30),
            state_file: PathBuf::from("personal_cfg.json"),
            output_dir: PathBuf::from("output"),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let config = Self {
            app_id: required("FEISHU_APP_ID")?,
            app_secret: required("FEISHU_APP_SECRET")?,
            user_id: required("FEISHU_USER_ID")?,
            include_filtered: parse_bool("FEISHU_INCLUDE_FILTERED")?,
            base_url: env::var("FEISHU_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            time_zone: env::var("FEISHU_TIME_ZONE")
                .unwrap_or_else(|_| DEFAULT_TIME_ZONE.to_string()),
            folder_token: env::var("FEISHU_FOLDER_TOKEN").unwrap_or_default(),
            container_prefix: env::var("FEISHU_CONTAINER_PREFIX")
                .unwrap_or_else(|_| DEFAULT_CONTAINER_PREFIX.to_string()),
            max_attempts: parse_number("FEISHU_RETRY", 1)?,
            http_timeout: Duration::from_secs(parse_number("FEISHU_HTTP_TIMEOUT_SECS", 30)?),
            state_file: env::var("STATE_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("personal_cfg.json")),
            output_dir: env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("output")),
        };

        config.validate().map_err(|e| ConfigError::Invalid {
            var: "config",
            reason: e.to_string(),
        })?;

        Ok(config)
    }
}

const DEFAULT_BASE_URL: &str = "https://open.feishu.cn/open-apis";
const DEFAULT_TIME_ZONE: &str = "Asia/Shanghai";
const DEFAULT_CONTAINER_PREFIX: &str = "arXiv-文献库";

fn required(var: &'static str) -> Result<String, ConfigError> {
    env::var(var)
        .map(|v| v.trim().to_string())
        .map_err(|_| ConfigError::Missing(var))
}

fn parse_bool(var: &'static str) -> Result<bool, ConfigError> {
    match env::var(var) {
        Err(_) => Ok(false),
        Ok(v) => match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "" | "0" | "false" | "no" | "off" => Ok(false),
            other => Err(ConfigError::Invalid {
                var,
                reason: format!("expected a boolean, got {:?}", other),
            }),
        },
    }
}

fn parse_number<T>(var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Err(_) => Ok(default),
        Ok(v) => v.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env vars are process-wide, so everything touching them lives in one test.
    #[test]
    fn test_config_from_env() {
        env::set_var("FEISHU_APP_ID", "cli_a1b2");
        env::set_var("FEISHU_APP_SECRET", " secret \n");
        env::set_var("FEISHU_USER_ID", "ou_123");
        env::remove_var("FEISHU_INCLUDE_FILTERED");
        env::remove_var("FEISHU_RETRY");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.app_id, "cli_a1b2");
        assert_eq!(config.app_secret, "secret");
        assert_eq!(config.user_id, "ou_123");
        assert!(!config.include_filtered);
        assert_eq!(config.max_attempts, 1);

        env::set_var("FEISHU_INCLUDE_FILTERED", "true");
        env::set_var("FEISHU_RETRY", "3");
        let config = Config::from_env().expect("Config should load");
        assert!(config.include_filtered);
        assert_eq!(config.max_attempts, 3);

        env::set_var("FEISHU_RETRY", "0");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid { .. })
        ));

        env::set_var("FEISHU_RETRY", "1");
        env::set_var("FEISHU_INCLUDE_FILTERED", "maybe");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid {
                var: "FEISHU_INCLUDE_FILTERED",
                ..
            })
        ));
        env::remove_var("FEISHU_INCLUDE_FILTERED");
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::test_default().validate().is_ok());
    }
}
