//! Configuration options for the SportsComp client

use std::path::PathBuf;
use std::time::Duration;

/// Configuration options for the SportsComp client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Directory where the session cache and event draft are persisted.
    /// When unset, records live in memory and vanish with the client.
    pub storage_dir: Option<PathBuf>,

    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Value sent as the X-Client-Info header
    pub client_info: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            storage_dir: None,
            request_timeout: Some(Duration::from_secs(30)),
            client_info: format!("sportscomp-rust/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientOptions {
    /// Set the directory used to persist the session cache and event draft
    pub fn with_storage_dir(mut self, value: impl Into<PathBuf>) -> Self {
        self.storage_dir = Some(value.into());
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the X-Client-Info header value
    pub fn with_client_info(mut self, value: &str) -> Self {
        self.client_info = value.to_string();
        self
    }
}
