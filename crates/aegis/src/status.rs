// SPDX-FileCopyrightText: 2026 Aegis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `aegis status` command implementation.
//!
//! Connects to the server's health endpoint and reports whether it is
//! running. Falls back gracefully when it is not.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use aegis_config::model::AegisConfig;
use aegis_core::AegisError;

/// Health endpoint response from the server.
#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
    uptime_secs: u64,
}

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub running: bool,
    pub status: String,
    pub uptime_secs: Option<u64>,
    pub uptime_human: Option<String>,
    pub host: String,
    pub port: u16,
}

/// Format seconds into a human-readable duration string.
fn format_uptime(secs: u64) -> String {
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Run the `aegis status` command.
pub async fn run_status(config: &AegisConfig, json: bool) -> Result<(), AegisError> {
    let host = &config.server.host;
    let port = config.server.port;
    let url = format!("http://{host}:{port}/health");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
        .map_err(|e| AegisError::Internal(format!("failed to create HTTP client: {e}")))?;

    let health = match client.get(&url).send().await {
        Ok(response) if response.status().is_success() => {
            response.json::<HealthResponse>().await.ok()
        }
        _ => None,
    };

    let status = match &health {
        Some(health) => StatusResponse {
            running: true,
            status: health.status.clone(),
            uptime_secs: Some(health.uptime_secs),
            uptime_human: Some(format_uptime(health.uptime_secs)),
            host: host.clone(),
            port,
        },
        None => StatusResponse {
            running: false,
            status: "not running".to_string(),
            uptime_secs: None,
            uptime_human: None,
            host: host.clone(),
            port,
        },
    };

    if json {
        let rendered = serde_json::to_string_pretty(&status)
            .map_err(|e| AegisError::Internal(format!("failed to render status: {e}")))?;
        println!("{rendered}");
    } else if status.running {
        println!(
            "aegis is running on {host}:{port} ({}, up {})",
            status.status,
            status.uptime_human.as_deref().unwrap_or("0m")
        );
    } else {
        println!("aegis is not running on {host}:{port}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_formats_across_magnitudes() {
        assert_eq!(format_uptime(59), "0m");
        assert_eq!(format_uptime(3 * 60), "3m");
        assert_eq!(format_uptime(2 * 3600 + 5 * 60), "2h 5m");
        assert_eq!(format_uptime(3 * 86400 + 3600), "3d 1h 0m");
    }
}
