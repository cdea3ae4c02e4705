//! Error types surfaced by the client.
//!
//! Runtime failures are reported through [`ClientError`]. Only two kinds
//! describe the remote exchange itself: the request never produced a
//! response ([`ClientError::Transport`]) or it produced a non-2xx one
//! ([`ClientError::Http`]). Neither is retried.

use std::io;

use serde_json::Value;
use thiserror::Error;

/// Convenience alias for results returned by client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors returned by [`InsightClient`](crate::InsightClient) operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be dispatched or no response arrived.
    #[error("transport error: {message}")]
    Transport { message: String },
    /// The server answered with a status outside `200..=299`.
    #[error("HTTP status {status}: {body}")]
    Http { status: u16, body: String },
    /// A 2xx response carried a body that is not valid JSON.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
    /// The request payload could not be serialised.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ClientError {
    /// Status code carried by an [`ClientError::Http`] error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body carried by an [`ClientError::Http`] error.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Http { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Parse the body of an [`ClientError::Http`] error as JSON.
    ///
    /// Returns `None` for other variants or when the body is not JSON.
    pub fn body_json(&self) -> Option<Value> {
        self.body().and_then(|b| serde_json::from_str(b).ok())
    }

    /// Whether the error is a transport failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

/// Errors that may occur while building a client.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// Invalid user supplied configuration.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
    /// The TLS connector could not be initialised.
    #[error("failed to initialise TLS: {0}")]
    Tls(#[from] native_tls::Error),
}

/// Errors raised while loading a client configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file does not exist.
    #[error("{0} doesn't exist")]
    NotFound(String),
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    /// The file is empty.
    #[error("{0} is an empty file")]
    Empty(String),
    /// The requested text encoding is unknown.
    #[error("unknown encoding {0}")]
    UnknownEncoding(String),
    /// The file bytes could not be decoded with the requested encoding.
    #[error("{path} could not be decoded as {encoding}")]
    Decode { path: String, encoding: String },
    /// The INI syntax or a value inside it is invalid.
    #[error("{path} is invalid: {reason}")]
    Invalid { path: String, reason: String },
    /// The configuration does not describe a usable client.
    #[error(transparent)]
    Build(#[from] ClientBuildError),
}
