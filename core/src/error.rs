//! Error types for the HidroSafe API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant so the message shown to the operator
//! can tell "this endpoint does not exist" apart from a generic server
//! failure. Command endpoints never surface `HttpError`: whatever went wrong,
//! the caller gets `CommandRejected` with the best message available.

use std::fmt;

/// Errors returned by `HidroClient` parse methods and by the transports that
/// execute its requests.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request never produced a response (host unreachable, connection
    /// reset, timeout in the HTTP stack).
    Network(String),

    /// The server returned 404.
    NotFound,

    /// The server returned a non-2xx status other than 404.
    HttpError { status: u16, body: String },

    /// A fetch answered 2xx with `success: false`; carries the server's
    /// message.
    FetchRejected(String),

    /// A control command, emergency stop or reset was refused.
    CommandRejected(String),

    /// The response body could not be deserialized into the expected type.
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    SerializationError(String),
}

impl ApiError {
    /// Short message meant for an inline error label or a modal.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => "Could not reach the monitoring server".to_string(),
            ApiError::NotFound => "Data not found on the server (HTTP 404)".to_string(),
            ApiError::HttpError { status, .. } => format!("Server error (HTTP {status})"),
            ApiError::FetchRejected(msg) => msg.clone(),
            ApiError::CommandRejected(msg) => format!("Command failed: {msg}"),
            ApiError::DeserializationError(_) => "Unexpected response from the server".to_string(),
            ApiError::SerializationError(_) => "Could not encode the request".to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::NotFound => write!(f, "resource not found (HTTP 404)"),
            ApiError::HttpError { status, body } => {
                write!(f, "HTTP {status}: {body}")
            }
            ApiError::FetchRejected(msg) => write!(f, "request rejected: {msg}"),
            ApiError::CommandRejected(msg) => write!(f, "command rejected: {msg}"),
            ApiError::DeserializationError(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
            ApiError::SerializationError(msg) => {
                write!(f, "serialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}
