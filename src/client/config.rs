//! Configuration consumed by [`InsightClient`](super::InsightClient).
//!
//! [`ClientBuilder`](super::ClientBuilder) validates and normalises these
//! values before the client is constructed.

use std::collections::BTreeMap;
use std::time::Duration;

/// Name of the header carrying the static credential.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Whether `name` is the credential header, ignoring ASCII case.
///
/// The credential only travels through [`ClientConfig::api_key`]; an extra
/// header with this name is never sent.
pub(crate) fn is_api_key_header(name: &str) -> bool {
    name.trim().eq_ignore_ascii_case(API_KEY_HEADER)
}

/// Connection parameters for the ingestion service.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Service root, without a trailing `/`.
    pub base_url: String,
    /// Static credential sent as `X-API-Key`. Never empty when `Some`.
    pub api_key: Option<String>,
    /// Additional headers sent with every request. Must not include
    /// [`API_KEY_HEADER`].
    pub headers: BTreeMap<String, String>,
    /// Timeout for establishing connections. `None` keeps the transport default.
    pub connect_timeout: Option<Duration>,
    /// Overall request timeout. `None` keeps the transport default.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Join the base URL with an absolute path such as `/ingest`.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// First extra header that would shadow the credential header.
    pub(crate) fn reserved_header(&self) -> Option<&str> {
        self.headers
            .keys()
            .map(String::as_str)
            .find(|name| is_api_key_header(name))
    }
}
