// SPDX-FileCopyrightText: 2026 Aegis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aegis - personnel console service for a security-response team.
//!
//! This is the binary entry point for the Aegis service.

use clap::{Parser, Subcommand};

mod list;
mod seed;
mod serve;
mod status;

/// Aegis - personnel console service for a security-response team.
#[derive(Parser, Debug)]
#[command(name = "aegis", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the record store API server.
    Serve,
    /// Probe a running server's health endpoint.
    Status {
        /// Emit structured JSON for scripting.
        #[arg(long)]
        json: bool,
    },
    /// Insert demo subscriber records into the store.
    Seed {
        /// Number of records to insert.
        #[arg(long, default_value_t = 8)]
        count: usize,
    },
    /// List subscribers from a running server.
    List {
        /// Case-insensitive search over name, email, phone, address, tier.
        #[arg(long, default_value = "")]
        query: String,
        /// Sort column (e.g. name, email, phone, created_at).
        #[arg(long)]
        sort: Option<String>,
        /// Emit the matching records as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match aegis_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            aegis_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Status { json }) => status::run_status(&config, json).await,
        Some(Commands::Seed { count }) => seed::run_seed(&config, count).await,
        Some(Commands::List { query, sort, json }) => {
            list::run_list(&config, &query, sort.as_deref(), json).await
        }
        None => {
            println!("aegis: use --help for available commands");
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("aegis: {err}");
        std::process::exit(1);
    }
}
