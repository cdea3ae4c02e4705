//! HTTP client for the log ingestion and query service.
//!
//! [`InsightClient`] turns two logical operations into HTTP calls:
//!
//! - `ingest` posts one log line as `{"streams":[...]}` to `{base}/ingest`.
//! - `query` issues `GET {base}/query?query=...&limit=...`.
//!
//! Both return the decoded JSON body on a 2xx response. Any other status
//! becomes [`ClientError::Http`](crate::ClientError::Http) and a failed
//! dispatch becomes [`ClientError::Transport`](crate::ClientError::Transport).
//! Nothing is retried, cached, or batched.
//!
//! # Authentication
//!
//! When a non-empty API key is configured every request carries it in the
//! `X-API-Key` header. Otherwise the header is omitted.

mod builder;
mod config;
mod core;
mod transport;
mod url_encoding;


pub use builder::ClientBuilder;
pub use config::{API_KEY_HEADER, ClientConfig};
pub use self::core::InsightClient;
