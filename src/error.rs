//! Error handling for the SportsComp Rust client

use std::fmt;
use thiserror::Error;

/// Unified error type for the SportsComp Rust client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Local persistence errors (session cache, event draft)
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// No usable session is cached; the caller should prompt for sign-in.
    ///
    /// Returned without any network call when the access token is absent,
    /// and after the authenticated-request pipeline exhausts its single
    /// refresh-and-retry.
    #[error("No active session")]
    NoSession,

    /// The API rejected the request with a non-success status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code of the rejected request
        status: u16,
        /// Message extracted from the response body
        message: String,
    },

    /// The event behind the current draft no longer exists on the server
    #[error("Event not found on the server")]
    EventMissing,

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new API error
    pub fn api<T: fmt::Display>(status: u16, message: T) -> Self {
        Error::Api {
            status,
            message: message.to_string(),
        }
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }

    /// Whether this error means the caller should re-authenticate
    pub fn is_no_session(&self) -> bool {
        matches!(self, Error::NoSession)
    }

    /// Whether this error means the drafted event disappeared server-side
    pub fn is_event_missing(&self) -> bool {
        matches!(self, Error::EventMissing)
    }
}

/// Reduce an API error body to a single human-readable message.
///
/// Priority: a `detail` string, then the first `non_field_errors` entry,
/// then the first field error as `field: message`, then the fallback.
pub fn api_message(body: &serde_json::Value, fallback: &str) -> String {
    let Some(record) = body.as_object() else {
        return fallback.to_string();
    };

    if let Some(detail) = record.get("detail").and_then(|v| v.as_str()) {
        return detail.to_string();
    }

    if let Some(first) = record
        .get("non_field_errors")
        .and_then(|v| v.as_array())
        .and_then(|errors| errors.first())
    {
        return value_text(first);
    }

    for (field, value) in record {
        if let Some(first) = value.as_array().and_then(|errors| errors.first()) {
            return format!("{}: {}", field, value_text(first));
        }
    }

    fallback.to_string()
}

fn value_text(value: &serde_json::Value) -> String {
    match value.as_str() {
        Some(text) => text.to_string(),
        None => value.to_string(),
    }
}
