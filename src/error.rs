// Error handling module
// Defines the failure taxonomy shared by authentication, requests and paging

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while talking to the CASE registry
#[derive(Error, Debug)]
pub enum CaseError {
    /// Credentials or settings are missing or invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Token endpoint rejected the client credentials grant
    #[error("Authentication failed: {status} - {body}")]
    Authentication { status: u16, body: String },

    /// Resource request failed after the re-authentication attempt
    #[error("CASE API error: {status} - {body}")]
    Api { status: u16, body: String },

    /// Network-level failure (DNS, connect, TLS, timeout)
    #[error("Transport error while {context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    /// Response or credential file did not have the expected shape
    #[error("Failed to decode {context}: {source}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Credential file could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CaseError {
    pub(crate) fn transport(context: impl Into<String>, source: reqwest::Error) -> Self {
        CaseError::Transport {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        CaseError::Serialization {
            context: context.into(),
            source,
        }
    }

    /// HTTP status carried by the error, if the server produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            CaseError::Authentication { status, .. } | CaseError::Api { status, .. } => {
                Some(*status)
            }
            CaseError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Kind label used in structured log fields
    pub fn kind(&self) -> &'static str {
        match self {
            CaseError::Configuration(_) => "configuration",
            CaseError::Authentication { .. } => "authentication",
            CaseError::Api { .. } => "api",
            CaseError::Transport { .. } => "transport",
            CaseError::Serialization { .. } => "serialization",
            CaseError::Io { .. } => "io",
        }
    }
}

/// Classify a reqwest error for log output
pub(crate) fn transport_kind(e: &reqwest::Error) -> &'static str {
    if e.is_timeout() {
        "timeout"
    } else if e.is_connect() {
        "connection_failed"
    } else if e.is_request() {
        "request_error"
    } else if e.is_body() {
        "body_error"
    } else if e.is_decode() {
        "decode_error"
    } else {
        "unknown"
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, CaseError>;
