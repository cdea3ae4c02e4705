//! Load client settings from an INI file.
//!
//! ```ini
//! [insight_stream]
//! base_url = http://logs.internal:3100
//! api_key = s3cr3t
//! timeout_ms = 2000
//! header.X-Tenant = blue
//! ```
//!
//! Recognised keys are `base_url`, `api_key`, `connect_timeout_ms`,
//! `timeout_ms`, and any number of `header.<Name>` entries. Unknown keys are
//! rejected so typos do not pass silently, as is `header.X-API-Key`: the
//! credential is only read from `api_key`.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use encoding_rs::Encoding;
use ini::Ini;

use crate::client::{API_KEY_HEADER, ClientBuilder, ClientConfig};
use crate::error::ConfigError;

/// Section read when the caller does not name one.
pub const DEFAULT_SECTION: &str = "insight_stream";

const HEADER_PREFIX: &str = "header.";

/// Read `path` and build a validated [`ClientConfig`] from `section`.
///
/// `encoding` is a WHATWG encoding label such as `"utf-8"` or `"latin1"`;
/// UTF-8 is assumed when it is `None`.
pub fn load_client_config(
    path: impl AsRef<Path>,
    section: Option<&str>,
    encoding: Option<&str>,
) -> Result<ClientConfig, ConfigError> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let bytes = read_file_bytes(path, &display)?;
    if bytes.is_empty() {
        return Err(ConfigError::Empty(display));
    }
    let text = decode_with_encoding(&bytes, encoding.unwrap_or("utf-8"), &display)?;
    parse_client_config(&text, section.unwrap_or(DEFAULT_SECTION), &display)
}

fn read_file_bytes(path: &Path, display: &str) -> Result<Vec<u8>, ConfigError> {
    fs::read(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => ConfigError::NotFound(display.to_string()),
        _ => ConfigError::Io {
            path: display.to_string(),
            source: err,
        },
    })
}

fn decode_with_encoding(bytes: &[u8], label: &str, display: &str) -> Result<String, ConfigError> {
    let normalized_label = label.trim().to_ascii_lowercase();
    let encoding = Encoding::for_label(normalized_label.as_bytes())
        .ok_or_else(|| ConfigError::UnknownEncoding(label.to_string()))?;
    let (decoded, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(ConfigError::Decode {
            path: display.to_string(),
            encoding: encoding.name().to_string(),
        });
    }
    Ok(decoded.into_owned())
}

/// Parse INI text into a [`ClientConfig`].
pub(crate) fn parse_client_config(
    text: &str,
    section: &str,
    display: &str,
) -> Result<ClientConfig, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        path: display.to_string(),
        reason,
    };
    let ini = Ini::load_from_str(text).map_err(|err| invalid(err.to_string()))?;
    let props = ini
        .section(Some(section))
        .ok_or_else(|| invalid(format!("missing [{section}] section")))?;

    let mut builder = ClientBuilder::new();
    for (key, value) in props.iter() {
        let value = value.trim();
        builder = match key {
            "base_url" => builder.with_url(value),
            "api_key" => builder.with_api_key(value),
            "connect_timeout_ms" => {
                builder.with_connect_timeout_ms(parse_ms(key, value, &invalid)?)
            }
            "timeout_ms" => builder.with_timeout_ms(parse_ms(key, value, &invalid)?),
            other => match other.strip_prefix(HEADER_PREFIX) {
                Some(name) if name.trim().eq_ignore_ascii_case(API_KEY_HEADER) => {
                    return Err(invalid(format!(
                        "`{other}` is not allowed; set the credential with `api_key`"
                    )));
                }
                Some(name) if !name.is_empty() => builder.with_header(name, value),
                _ => return Err(invalid(format!("unknown key `{other}`"))),
            },
        };
    }
    Ok(builder.build_config()?)
}

fn parse_ms(
    key: &str,
    value: &str,
    invalid: &impl Fn(String) -> ConfigError,
) -> Result<u64, ConfigError> {
    value
        .parse()
        .map_err(|_| invalid(format!("`{key}` must be a whole number of milliseconds")))
}
