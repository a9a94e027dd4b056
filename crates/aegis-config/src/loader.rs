// SPDX-FileCopyrightText: 2026 Aegis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./aegis.toml` > `~/.config/aegis/aegis.toml` >
//! `/etc/aegis/aegis.toml` with environment variable overrides via the
//! `AEGIS_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::AegisConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/aegis/aegis.toml` (system-wide)
/// 3. `~/.config/aegis/aegis.toml` (user XDG config)
/// 4. `./aegis.toml` (local directory)
/// 5. `AEGIS_*` environment variables
pub fn load_config() -> Result<AegisConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AegisConfig::default()))
        .merge(Toml::file("/etc/aegis/aegis.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("aegis/aegis.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("aegis.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<AegisConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AegisConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<AegisConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AegisConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `AEGIS_STORAGE_DATABASE_PATH` must map
/// to `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("AEGIS_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("console_", "console.", 1)
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("api_", "api.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_config_overrides_defaults() {
        let config = load_config_from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9100
        "#,
        )
        .unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9100);
        // Unspecified sections keep compiled defaults.
        assert_eq!(config.console.log_level, "info");
    }

    #[test]
    fn env_vars_override_file_values() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "aegis.toml",
                r#"
                [storage]
                database_path = "from-file.db"
            "#,
            )?;
            jail.set_env("AEGIS_STORAGE_DATABASE_PATH", "from-env.db");
            let config = load_config().expect("config should load");
            assert_eq!(config.storage.database_path, "from-env.db");
            Ok(())
        });
    }

    #[test]
    fn env_mapping_preserves_underscored_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("AEGIS_CONSOLE_REQUEST_TIMEOUT_SECS", "3");
            jail.set_env("AEGIS_API_BASE_URL", "http://api.internal:8642");
            let config = load_config().expect("config should load");
            assert_eq!(config.console.request_timeout_secs, 3);
            assert_eq!(config.api.base_url, "http://api.internal:8642");
            Ok(())
        });
    }
}
