//! Builder for [`InsightClient`].
//!
//! Collects the service URL, credential, extra headers, timeouts, and the
//! time source, validates them, and produces a ready client.

use std::{collections::BTreeMap, fmt, sync::Arc, time::Duration};

use crate::clock::{Clock, SystemClock};
use crate::error::ClientBuildError;

use super::config::{ClientConfig, is_api_key_header};
use super::core::InsightClient;

macro_rules! ensure_positive {
    ($value:expr, $field:expr) => {{
        if $value == 0 {
            Err(ClientBuildError::InvalidConfig(format!(
                "{} must be greater than zero",
                $field
            )))
        } else {
            Ok($value)
        }
    }};
}

macro_rules! option_setter {
    ($(#[$meta:meta])* $fn_name:ident, $field:ident, $ty:ty) => {
        $(#[$meta])*
        pub fn $fn_name(mut self, value: $ty) -> Self {
            self.$field = Some(value);
            self
        }
    };
}

/// Builder for constructing [`InsightClient`] instances.
#[derive(Clone, Default)]
pub struct ClientBuilder {
    url: Option<String>,
    api_key: Option<String>,
    headers: BTreeMap<String, String>,
    connect_timeout_ms: Option<u64>,
    timeout_ms: Option<u64>,
    clock: Option<Arc<dyn Clock>>,
}

impl ClientBuilder {
    /// Create a new builder with no URL configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a builder from an existing configuration.
    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            url: Some(config.base_url),
            api_key: config.api_key,
            headers: config.headers,
            connect_timeout_ms: config.connect_timeout.map(duration_ms),
            timeout_ms: config.timeout.map(duration_ms),
            clock: None,
        }
    }

    /// Set the service base URL (required).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the static credential sent as `X-API-Key`.
    ///
    /// An empty key is treated as no key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Replace the set of extra headers.
    pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Add a single extra header.
    ///
    /// [`API_KEY_HEADER`](super::API_KEY_HEADER) is rejected at build time; use
    /// [`with_api_key`](Self::with_api_key) for the credential.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    option_setter!(
        #[doc = "Set the connect timeout in milliseconds."]
        with_connect_timeout_ms,
        connect_timeout_ms,
        u64
    );
    option_setter!(
        #[doc = "Set the overall request timeout in milliseconds."]
        with_timeout_ms,
        timeout_ms,
        u64
    );

    /// Use `clock` to stamp entries ingested without an explicit timestamp.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    fn validate(&self) -> Result<(), ClientBuildError> {
        self.validate_url()?;
        self.validate_timeouts()?;
        self.validate_headers()?;
        Ok(())
    }

    fn validate_url(&self) -> Result<(), ClientBuildError> {
        match &self.url {
            None => Err(ClientBuildError::InvalidConfig(
                "client requires a base URL".into(),
            )),
            Some(url) if url.trim().is_empty() => Err(ClientBuildError::InvalidConfig(
                "base URL must not be empty".into(),
            )),
            _ => Ok(()),
        }
    }

    fn validate_timeouts(&self) -> Result<(), ClientBuildError> {
        if let Some(timeout) = self.connect_timeout_ms {
            ensure_positive!(timeout, "connect_timeout_ms")?;
        }
        if let Some(timeout) = self.timeout_ms {
            ensure_positive!(timeout, "timeout_ms")?;
        }
        Ok(())
    }

    fn validate_headers(&self) -> Result<(), ClientBuildError> {
        match self.headers.keys().find(|name| is_api_key_header(name)) {
            Some(name) => Err(reserved_header_error(name)),
            None => Ok(()),
        }
    }

    /// Validate and normalise the collected settings.
    pub fn build_config(&self) -> Result<ClientConfig, ClientBuildError> {
        self.validate()?;
        let base_url = self
            .url
            .as_deref()
            .unwrap_or_default()
            .trim()
            .trim_end_matches('/')
            .to_string();
        Ok(ClientConfig {
            base_url,
            api_key: self.api_key.clone().filter(|key| !key.is_empty()),
            headers: self.headers.clone(),
            connect_timeout: self.connect_timeout_ms.map(Duration::from_millis),
            timeout: self.timeout_ms.map(Duration::from_millis),
        })
    }

    /// Build the client.
    pub fn build(&self) -> Result<InsightClient, ClientBuildError> {
        let config = self.build_config()?;
        let clock = self
            .clock
            .clone()
            .unwrap_or_else(|| Arc::new(SystemClock));
        InsightClient::with_config(config, clock)
    }
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

pub(crate) fn reserved_header_error(name: &str) -> ClientBuildError {
    ClientBuildError::InvalidConfig(format!(
        "header `{name}` is reserved for the API key; use with_api_key instead"
    ))
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
