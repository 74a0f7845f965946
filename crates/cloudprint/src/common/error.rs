//! Common Error Types
//!
//! One error enum for the whole request pipeline, plus a stable numeric
//! code per failure class.

use thiserror::Error;

/// Failure classes, with stable numeric codes (used as CLI exit codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or incomplete credential material or settings
    Configuration = 2,
    /// Token endpoint rejected the assertion
    Auth = 3,
    /// API host answered with a non-success HTTP status
    Remote = 4,
    /// API host answered 2xx but reported `"success": false`
    Rejected = 5,
    /// Network-level failure, no response body available
    Transport = 6,
    /// Response body was not the expected JSON
    Decode = 7,
}

impl ErrorKind {
    pub fn code(&self) -> i32 {
        *self as i32
    }
}

/// Error type for every stage of an authenticated call.
#[derive(Debug, Error)]
pub enum CloudPrintError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("authorization failed: {0}")]
    Auth(String),

    #[error("HTTP {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },
}

impl CloudPrintError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Auth(_) => ErrorKind::Auth,
            Self::Remote { .. } => ErrorKind::Remote,
            Self::Rejected(_) => ErrorKind::Rejected,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Decode { .. } => ErrorKind::Decode,
        }
    }

    /// Message suitable for showing to a caller.
    ///
    /// Remote errors yield the response body verbatim: the service puts its
    /// machine-readable reason there.
    pub fn message(&self) -> String {
        match self {
            Self::Remote { status, body } if body.is_empty() => format!("HTTP {}", status),
            Self::Remote { body, .. } => body.clone(),
            Self::Rejected(message) => message.clone(),
            other => other.to_string(),
        }
    }
}
