// SPDX-FileCopyrightText: 2026 Aegis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Aegis console.

use thiserror::Error;

/// The primary error type used across the Aegis workspace.
#[derive(Debug, Error)]
pub enum AegisError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database open, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Network or backend failure while talking to the record store API.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The backend rejected the submitted payload.
    #[error("payload rejected: {message}")]
    Validation { message: String },

    /// The requested record id does not exist.
    #[error("record not found: {id}")]
    NotFound { id: String },

    /// A mutation resolved after a newer mutation on the same id; its
    /// outcome was discarded to keep the newer local state authoritative.
    #[error("stale resolution for record {id} (sequence {seq} superseded)")]
    Conflict { id: String, seq: u64 },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AegisError {
    /// Shorthand for a transport error without an underlying source.
    pub fn transport(message: impl Into<String>) -> Self {
        AegisError::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a not-found error on the given id.
    pub fn not_found(id: impl Into<String>) -> Self {
        AegisError::NotFound { id: id.into() }
    }

    /// True when this error means the record id was unknown to the backend.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AegisError::NotFound { .. })
    }
}
