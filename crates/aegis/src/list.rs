// SPDX-FileCopyrightText: 2026 Aegis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `aegis list` command implementation.
//!
//! Pulls the subscriber collection from a running server through the HTTP
//! gateway, applies the same filter/sort projection the console table uses,
//! and prints the result.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use aegis_client::HttpRecordGateway;
use aegis_config::model::AegisConfig;
use aegis_core::AegisError;
use aegis_roster::{Roster, Selection, SortDirection, SortKey, SortState};

/// Run the `aegis list` command.
pub async fn run_list(
    config: &AegisConfig,
    query: &str,
    sort: Option<&str>,
    json: bool,
) -> Result<(), AegisError> {
    let timeout = Duration::from_secs(config.console.request_timeout_secs);
    let gateway = HttpRecordGateway::new(
        &config.api.base_url,
        config.api.bearer_token.as_deref(),
        timeout,
    )?;

    let roster = Roster::new(Arc::new(gateway)).with_timeout(timeout);
    roster.load_all().await?;

    let sort_state = sort
        .map(|key| {
            SortKey::from_str(key)
                .map(|key| SortState {
                    key,
                    direction: SortDirection::Ascending,
                })
                .map_err(|_| AegisError::Config(format!("unknown sort key `{key}`")))
        })
        .transpose()?;

    let rows = roster.project(query, sort_state, &Selection::new()).await;

    if json {
        let records: Vec<_> = rows.iter().map(|row| &row.record).collect();
        let rendered = serde_json::to_string_pretty(&records)
            .map_err(|e| AegisError::Internal(format!("failed to render records: {e}")))?;
        println!("{rendered}");
        return Ok(());
    }

    if rows.is_empty() {
        println!("no matching subscribers");
        return Ok(());
    }

    println!(
        "{:<38} {:<22} {:<30} {:<12} {}",
        "ID", "NAME", "EMAIL", "PHONE", "TIER"
    );
    for row in &rows {
        let record = &row.record;
        println!(
            "{:<38} {:<22} {:<30} {:<12} {}",
            record.id,
            record.name,
            record.email,
            record.phone,
            record.subscription_tier
        );
    }
    println!("{} subscriber(s)", rows.len());

    Ok(())
}
