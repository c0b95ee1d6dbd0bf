//! Shared primitives for all Rust crates in the service dispatch client.

#![forbid(unsafe_code)]

/// Credential primitives attached to outbound dispatch calls.
pub mod auth;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::BearerToken;

/// Semantic version of this client, embedded in request paths and headers.
///
/// The dispatch service routes on this value, so it must match the
/// published client version exactly.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Header carrying [`CLIENT_VERSION`] on every outbound call.
pub const CLIENT_VERSION_HEADER: &str = "Dispatch-Client-Version";

/// Result type used across service dispatch crates.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> DispatchResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DispatchError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Failure reported by an HTTP transport implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request never produced a response (refused, reset, timed out).
    #[error("connection failed: {0}")]
    Connection(String),

    /// The remote answered with a status the transport classifies as failure.
    #[error("unexpected HTTP status {status}: {body}")]
    Status {
        /// HTTP status code returned by the remote.
        status: u16,
        /// Response body, lossily decoded for diagnostics.
        body: String,
    },

    /// The response arrived but its body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// Error categories surfaced by the dispatch client.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// HTTP verb outside the supported set; raised before any network call.
    #[error("method not allowed [{method}]")]
    UnsupportedMethod {
        /// Upper-cased verb as supplied by the caller.
        method: String,
    },

    /// The transport failed to complete the exchange.
    #[error("error with service dispatch: {source}")]
    Transport {
        /// Underlying transport failure.
        #[from]
        source: TransportError,
    },

    /// Invalid input or configuration.
    #[error("validation error: {0}")]
    Validation(String),
}

impl DispatchError {
    /// Returns the stable numeric code for this error kind.
    #[must_use]
    pub fn code(&self) -> i32 {
        match self {
            Self::UnsupportedMethod { .. } => -405,
            Self::Transport { .. } => -1,
            Self::Validation(_) => -422,
        }
    }
}
