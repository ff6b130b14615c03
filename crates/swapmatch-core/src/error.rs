// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Swapmatch exchange engine.

use thiserror::Error;

use crate::types::InteractionKind;

/// Kind of entity a [`SwapError::NotFound`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Entity {
    User,
    Product,
    OfferedProduct,
    Category,
    Interaction,
    Match,
}

/// The primary error type raised by the engine and its storage layer.
#[derive(Debug, Error)]
pub enum SwapError {
    /// Configuration errors (invalid TOML, failed validation).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (connection loss, transaction abort, bad rows).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A referenced entity does not exist, or the caller may not see it.
    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: i64 },

    /// The actor already reacted to this product.
    #[error("already {} this product", .existing.past_tense())]
    Conflict { existing: InteractionKind },

    /// Malformed or rule-breaking input, scoped to one field.
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SwapError {
    /// Shorthand for a field-scoped validation failure.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        SwapError::Validation {
            field,
            message: message.into(),
        }
    }

    /// HTTP-equivalent status code for the API layer.
    pub fn status_code(&self) -> u16 {
        match self {
            SwapError::NotFound { .. } => 404,
            SwapError::Conflict { .. } => 409,
            SwapError::Validation { .. } => 400,
            SwapError::Timeout { .. } => 504,
            SwapError::Config(_) | SwapError::Storage { .. } | SwapError::Internal(_) => 500,
        }
    }

    /// Whether the caller may reasonably retry. The engine itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SwapError::Timeout { .. })
    }
}
