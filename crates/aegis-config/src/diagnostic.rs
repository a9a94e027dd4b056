// SPDX-FileCopyrightText: 2026 Aegis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration error diagnostics rendered through miette.

use miette::Diagnostic;
use thiserror::Error;

/// A configuration error with diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// Figment failed to deserialize the merged configuration.
    #[error("invalid configuration: {message}")]
    #[diagnostic(
        code(aegis::config::parse),
        help("check aegis.toml against the [console]/[server]/[storage]/[api] sections")
    )]
    Parse {
        /// The figment error, flattened to a message.
        message: String,
    },

    /// A semantic validation failed on a deserialized value.
    #[error("validation error: {message}")]
    #[diagnostic(code(aegis::config::validation))]
    Validation {
        /// Description of the failed constraint.
        message: String,
    },
}

/// Convert a figment extraction error into per-problem diagnostics.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    err.into_iter()
        .map(|e| ConfigError::Parse {
            message: e.to_string(),
        })
        .collect()
}

/// Render configuration errors to stderr via miette's fancy reporter.
pub fn render_errors(errors: &[ConfigError]) {
    for error in errors {
        let report = miette::Report::msg(format!("{error}"));
        eprintln!("{report:?}");
    }
    eprintln!(
        "aegis: {} configuration error{} -- fix aegis.toml and retry",
        errors.len(),
        if errors.len() == 1 { "" } else { "s" }
    );
}
