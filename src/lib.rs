//! Blocking client SDK for the insight-stream log service.
//!
//! The service accepts labelled log lines on `POST /ingest` and answers
//! queries on `GET /query`. [`InsightClient`] wraps both calls and returns
//! the response bodies as [`serde_json::Value`].
//!
//! ```no_run
//! use insight_stream::InsightClient;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = InsightClient::new("http://localhost:3100", Some("secret"))?;
//! client.ingest([("app", "web")], "boot ok", None)?;
//! let results = client.query("{app=\"web\"}", Some(10))?;
//! println!("{results}");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod clock;
pub mod error;
pub mod file_config;
pub mod model;

#[cfg(test)]
mod test_utils;

pub use client::{API_KEY_HEADER, ClientBuilder, ClientConfig, InsightClient};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ClientBuildError, ClientError, ClientResult, ConfigError};
pub use file_config::load_client_config;
pub use model::{DEFAULT_QUERY_LIMIT, IngestRequest, Labels, LogEntry, LogStream, QueryRequest};
