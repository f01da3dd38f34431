//! Unified error types for the comment engine.
//!
//! Every pre-write rejection of a submission (validation, quota, identity,
//! rate limit) is a distinct variant so the transport layer can map each to
//! its own client-facing message. Notification failures are logged at the
//! point of failure and never surfaced to callers.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the comment engine.
#[derive(Debug, Error)]
pub enum Error {
    /// A required submission field was absent or empty.
    #[error("missing required field: {0}")]
    Validation(String),

    /// An anonymous submission field exceeded its configured length bound.
    #[error("field {field} has {actual} characters, exceeds limit of {max}")]
    QuotaExceeded {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    /// An anonymous submission used the site owner's mail address.
    #[error("sign in before commenting as the site owner")]
    IdentityConflict,

    /// Too many submissions from one client identifier inside the window.
    #[error("too many requests: {message}")]
    RateLimited {
        message: String,
        retry_after_secs: Option<u64>,
    },

    /// The store rejected a write. Fatal to the operation.
    #[error("store write failed: {0}")]
    Persistence(String),

    /// A notification dispatch failed. Logged only, never propagated past
    /// the submission pipeline.
    #[error("notification failed: {0}")]
    Notification(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn validation(field: impl Into<String>) -> Self {
        Self::Validation(field.into())
    }

    pub fn quota(field: &'static str, max: usize, actual: usize) -> Self {
        Self::QuotaExceeded { field, max, actual }
    }

    pub fn rate_limited(message: impl Into<String>, retry_after_secs: Option<u64>) -> Self {
        Self::RateLimited {
            message: message.into(),
            retry_after_secs,
        }
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    pub fn notification(msg: impl Into<String>) -> Self {
        Self::Notification(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::QuotaExceeded { .. } => 400,
            Self::IdentityConflict => 403,
            Self::RateLimited { .. } => 429,
            Self::Persistence(_) => 500,
            Self::Notification(_) => 500,
            Self::Serialization(_) => 400,
            Self::Internal(_) => 500,
        }
    }

    /// Stable machine-readable code for the transport layer.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::QuotaExceeded { .. } => "quota_exceeded",
            Self::IdentityConflict => "identity_conflict",
            Self::RateLimited { .. } => "rate_limited",
            Self::Persistence(_) => "persistence",
            Self::Notification(_) => "notification",
            Self::Serialization(_) => "serialization",
            Self::Internal(_) => "internal",
        }
    }
}
