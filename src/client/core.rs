//! The client type exported by the crate.

use std::{fmt, sync::Arc};

use serde_json::Value;
use ureq::Agent;

use crate::clock::{Clock, format_timestamp};
use crate::error::{ClientBuildError, ClientError, ClientResult};
use crate::model::{DEFAULT_QUERY_LIMIT, IngestRequest, Labels, LogEntry, QueryRequest};

use super::builder::{ClientBuilder, reserved_header_error};
use super::config::ClientConfig;
use super::transport::{Exchange, Method, build_agent, execute};
use super::url_encoding::encode_path_segment;

/// Blocking client for the log ingestion and query service.
///
/// Holds no mutable state after construction, so a single instance can be
/// shared across threads. Every call performs exactly one HTTP round trip
/// and surfaces failures to the caller without retrying.
#[derive(Clone)]
pub struct InsightClient {
    config: Arc<ClientConfig>,
    agent: Agent,
    clock: Arc<dyn Clock>,
}

impl InsightClient {
    /// Create a client for `base_url`, optionally authenticating with
    /// `api_key`. An empty key sends no `X-API-Key` header.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<&str>,
    ) -> Result<Self, ClientBuildError> {
        let mut builder = ClientBuilder::new().with_url(base_url);
        if let Some(key) = api_key {
            builder = builder.with_api_key(key);
        }
        builder.build()
    }

    /// Return a builder for fine-grained configuration.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Construct the client from a configuration.
    ///
    /// An empty `api_key` is treated as no key. An extra header named
    /// `X-API-Key` is rejected.
    pub fn with_config(
        mut config: ClientConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ClientBuildError> {
        config.api_key = config.api_key.filter(|key| !key.is_empty());
        if let Some(name) = config.reserved_header() {
            return Err(reserved_header_error(name));
        }
        let agent = build_agent(&config)?;
        Ok(Self {
            config: Arc::new(config),
            agent,
            clock,
        })
    }

    /// Push one log line under `labels`.
    ///
    /// `timestamp` is sent verbatim when given. When it is `None` or empty the
    /// client stamps the entry with the current UTC time from its clock,
    /// formatted as ISO-8601 with a trailing `Z`.
    ///
    /// Returns the decoded JSON response body.
    pub fn ingest<I, K, V>(
        &self,
        labels: I,
        message: &str,
        timestamp: Option<&str>,
    ) -> ClientResult<Value>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let request = self.ingest_request(labels, message, timestamp);
        let body = serde_json::to_string(&request).map_err(ClientError::Encode)?;
        execute(
            &self.agent,
            &self.config,
            Exchange {
                method: Method::Post,
                path: "/ingest",
                params: &[],
                body: Some(body),
            },
        )
    }

    /// Assemble the payload `ingest` would send.
    pub fn ingest_request<I, K, V>(
        &self,
        labels: I,
        message: &str,
        timestamp: Option<&str>,
    ) -> IngestRequest
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let labels: Labels = labels
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let ts = match timestamp {
            Some(ts) if !ts.is_empty() => ts.to_string(),
            _ => format_timestamp(self.clock.now()),
        };
        IngestRequest::single(labels, LogEntry::new(ts, message))
    }

    /// Run `query` and return the decoded JSON response body.
    ///
    /// `limit` defaults to [`DEFAULT_QUERY_LIMIT`] and is sent verbatim
    /// otherwise.
    pub fn query(&self, query: &str, limit: Option<i64>) -> ClientResult<Value> {
        let request = QueryRequest::new(query).with_limit(limit.unwrap_or(DEFAULT_QUERY_LIMIT));
        self.query_request(&request)
    }

    /// Run a query with optional time bounds.
    pub fn query_request(&self, request: &QueryRequest) -> ClientResult<Value> {
        self.get("/query", &request.params())
    }

    /// Fetch the service health summary.
    pub fn health(&self) -> ClientResult<Value> {
        self.get("/health", &[])
    }

    /// Ask whether the service is ready to accept traffic.
    pub fn ready(&self) -> ClientResult<Value> {
        self.get("/ready", &[])
    }

    /// List the label names known to the service.
    pub fn labels(&self) -> ClientResult<Value> {
        self.get("/labels", &[])
    }

    /// List the values recorded for label `name`.
    pub fn label_values(&self, name: &str) -> ClientResult<Value> {
        let path = format!("/labels/{}/values", encode_path_segment(name));
        self.get(&path, &[])
    }

    /// The configuration the client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn get(&self, path: &str, params: &[(&'static str, String)]) -> ClientResult<Value> {
        execute(
            &self.agent,
            &self.config,
            Exchange {
                method: Method::Get,
                path,
                params,
                body: None,
            },
        )
    }
}

impl fmt::Debug for InsightClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsightClient")
            .field("base_url", &self.config.base_url)
            .field("has_api_key", &self.config.api_key.is_some())
            .finish()
    }
}
