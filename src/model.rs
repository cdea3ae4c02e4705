//! Request payloads exchanged with the ingestion service.
//!
//! These types mirror the JSON wire format:
//!
//! ```json
//! {"streams":[{"labels":{"app":"web"},"entries":[{"ts":"...","line":"..."}]}]}
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Default number of results requested by a query.
pub const DEFAULT_QUERY_LIMIT: i64 = 100;

/// Label set attached to a stream.
pub type Labels = BTreeMap<String, String>;

/// One timestamped log line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO-8601 UTC timestamp, sent verbatim.
    #[serde(rename = "ts")]
    timestamp: String,
    line: String,
}

impl LogEntry {
    pub fn new(timestamp: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            line: line.into(),
        }
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn line(&self) -> &str {
        &self.line
    }
}

/// A label set and the entries recorded under it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogStream {
    pub labels: Labels,
    pub entries: Vec<LogEntry>,
}

/// Body of `POST /ingest`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestRequest {
    pub streams: Vec<LogStream>,
}

impl IngestRequest {
    /// Build a request holding one stream with one entry.
    pub fn single(labels: Labels, entry: LogEntry) -> Self {
        Self {
            streams: vec![LogStream {
                labels,
                entries: vec![entry],
            }],
        }
    }
}

/// Parameters of `GET /query`.
///
/// `start` and `end` are optional RFC3339 bounds passed through untouched;
/// the server picks its own window when they are absent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryRequest {
    pub query: String,
    pub limit: i64,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl QueryRequest {
    /// Create a query with the default limit and no time bounds.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: DEFAULT_QUERY_LIMIT,
            start: None,
            end: None,
        }
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }

    pub fn with_end(mut self, end: impl Into<String>) -> Self {
        self.end = Some(end.into());
        self
    }

    /// Query-string pairs in wire order.
    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("query", self.query.clone()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(start) = &self.start {
            params.push(("start", start.clone()));
        }
        if let Some(end) = &self.end {
            params.push(("end", end.clone()));
        }
        params
    }
}
