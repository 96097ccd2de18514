//! Error types for the ticket API client.
//!
//! # Design
//! `ApiError::Status` displays as the server's message and nothing else: the
//! backend answers failures with plain text meant for the user, so the
//! controller can surface `to_string()` verbatim. Neither the transport nor
//! the ticket client wraps or rewrites these errors on the way up.

use thiserror::Error;

/// Errors returned by the transport and the ticket client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status. `message` is the response
    /// body, or the status reason phrase when the body was empty.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The request could not be completed at all.
    #[error("network error: {0}")]
    Network(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// HTTP status of the failed response, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors surfaced by `TicketController` intent handlers.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The draft was rejected locally; no request was sent.
    #[error("{0}")]
    Validation(String),

    #[error("no ticket draft is open")]
    NotComposing,
}

/// Errors raised while reading client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    #[error("invalid base URL '{0}': expected an http:// or https:// URL")]
    InvalidBaseUrl(String),
}
