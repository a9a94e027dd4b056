// SPDX-FileCopyrightText: 2026 Aegis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Aegis console.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Aegis configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// development values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AegisConfig {
    /// Console-wide behavior settings.
    #[serde(default)]
    pub console: ConsoleConfig,

    /// REST API server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Settings for the HTTP client talking to the record store API.
    #[serde(default)]
    pub api: ApiConfig,
}

/// Console-wide behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Per-request timeout for gateway round-trips, in seconds. A mutation
    /// whose round-trip exceeds this is treated as failed and rolled back.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

/// REST API server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bearer token required on `/api/*` routes. `None` leaves the API
    /// open (development default).
    #[serde(default)]
    pub bearer_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            bearer_token: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8642
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL journal mode.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    "aegis.db".to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// HTTP client configuration for the record store API.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL of the record store API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token sent as `Authorization: Bearer <token>`. `None` sends
    /// no auth header.
    #[serde(default)]
    pub bearer_token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            bearer_token: None,
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8642".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_development_friendly() {
        let config = AegisConfig::default();
        assert_eq!(config.console.log_level, "info");
        assert_eq!(config.console.request_timeout_secs, 10);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8642);
        assert!(config.server.bearer_token.is_none());
        assert_eq!(config.storage.database_path, "aegis.db");
        assert!(config.storage.wal_mode);
        assert_eq!(config.api.base_url, "http://127.0.0.1:8642");
    }

    #[test]
    fn sections_deserialize_from_toml() {
        let toml = r#"
            [console]
            log_level = "debug"

            [server]
            port = 9000
            bearer_token = "s3cret"

            [storage]
            database_path = "/var/lib/aegis/aegis.db"
        "#;
        let config: AegisConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.console.log_level, "debug");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bearer_token.as_deref(), Some("s3cret"));
        assert_eq!(config.storage.database_path, "/var/lib/aegis/aegis.db");
        // Unset sections fall back to defaults.
        assert_eq!(config.api.base_url, "http://127.0.0.1:8642");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let toml = r#"
            [console]
            log_levle = "debug"
        "#;
        let result: Result<AegisConfig, _> = toml::from_str(toml);
        assert!(result.is_err(), "typo key should be rejected");
    }
}
