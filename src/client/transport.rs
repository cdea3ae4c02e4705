//! Blocking HTTP exchange over a `ureq` agent.
//!
//! Each call dispatches one request, reads the whole response body, and maps
//! the outcome onto [`ClientError`]. Reading the body to completion returns
//! the connection to the agent pool on every exit path.

use std::io::Read;
use std::sync::Arc;

use log::{debug, warn};
use serde_json::Value;
use ureq::{Agent, AgentBuilder};

use crate::error::{ClientBuildError, ClientError, ClientResult};

use super::config::{API_KEY_HEADER, ClientConfig, is_api_key_header};
use super::url_encoding::encode_query;

/// HTTP methods issued by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Method {
    Get,
    Post,
}

impl Method {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// Classification of a received HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResponseClass {
    /// 2xx responses.
    Success,
    /// Anything else. 4xx and 5xx are not distinguished.
    Failure,
}

pub(crate) fn classify_status(status: u16) -> ResponseClass {
    match status {
        200..=299 => ResponseClass::Success,
        _ => ResponseClass::Failure,
    }
}

/// Build the agent used for every request of one client.
pub(crate) fn build_agent(config: &ClientConfig) -> Result<Agent, ClientBuildError> {
    let tls = native_tls::TlsConnector::new()?;
    let mut builder = AgentBuilder::new().tls_connector(Arc::new(tls));
    if let Some(timeout) = config.connect_timeout {
        builder = builder.timeout_connect(timeout);
    }
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build())
}

/// A single request ready to be dispatched.
pub(crate) struct Exchange<'a> {
    pub method: Method,
    pub path: &'a str,
    pub params: &'a [(&'static str, String)],
    pub body: Option<String>,
}

impl Exchange<'_> {
    fn url(&self, config: &ClientConfig) -> String {
        let url = config.endpoint(self.path);
        if self.params.is_empty() {
            url
        } else {
            format!("{url}?{}", encode_query(self.params))
        }
    }
}

/// Dispatch `exchange` and decode a 2xx body as JSON.
pub(crate) fn execute(
    agent: &Agent,
    config: &ClientConfig,
    exchange: Exchange<'_>,
) -> ClientResult<Value> {
    let url = exchange.url(config);
    debug!("InsightClient {} {url}", exchange.method.as_str());

    let mut request = agent.request(exchange.method.as_str(), &url);
    request = apply_headers(request, config);
    let result = match exchange.body {
        Some(body) => request
            .set("Content-Type", "application/json")
            .send_string(&body),
        None => request.call(),
    };

    let (status, body) = match result {
        Ok(response) => read_response(response)?,
        Err(ureq::Error::Status(code, response)) => (code, read_body(response)?),
        Err(ureq::Error::Transport(err)) => {
            warn!(
                "InsightClient {} {} failed: {err}",
                exchange.method.as_str(),
                exchange.path
            );
            return Err(ClientError::Transport {
                message: err.to_string(),
            });
        }
    };

    match classify_status(status) {
        ResponseClass::Success => decode_body(&body),
        ResponseClass::Failure => {
            warn!(
                "InsightClient {} {} returned status {status}",
                exchange.method.as_str(),
                exchange.path
            );
            Err(ClientError::Http { status, body })
        }
    }
}

fn apply_headers(mut request: ureq::Request, config: &ClientConfig) -> ureq::Request {
    for (key, value) in &config.headers {
        if is_api_key_header(key) {
            continue;
        }
        request = request.set(key, value);
    }
    if let Some(key) = config.api_key.as_deref().filter(|key| !key.is_empty()) {
        request = request.set(API_KEY_HEADER, key);
    }
    request
}

fn read_response(response: ureq::Response) -> ClientResult<(u16, String)> {
    let status = response.status();
    Ok((status, read_body(response)?))
}

/// Read the whole body. `Response::into_string` caps bodies at 10 MB, so the
/// reader is drained directly and only a real I/O failure is reported.
fn read_body(response: ureq::Response) -> ClientResult<String> {
    let mut body = String::new();
    response
        .into_reader()
        .read_to_string(&mut body)
        .map_err(|err| ClientError::Transport {
            message: format!("failed to read response body: {err}"),
        })?;
    Ok(body)
}

/// Decode a success body. An empty body becomes `null`.
pub(crate) fn decode_body(body: &str) -> ClientResult<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(ClientError::Decode)
}
