//! URL encoding for query strings and path segments.
//!
//! Query values follow `application/x-www-form-urlencoded` rules with `+`
//! for spaces, so `app="web"` becomes `app%3D%22web%22`.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Reserved and unsafe characters percent-encoded inside query values.
///
/// Unreserved characters (alphanumeric, `-`, `_`, `.`, `~`) pass through per
/// RFC 3986. Space is absent because [`url_encode`] maps it to `+`.
const QUERY_ENCODE_SET_NO_SPACE: &AsciiSet = &CONTROLS
    .add(b'"')
    .add(b'#')
    .add(b'$')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b',')
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}')
    .add(b'\'')
    .add(b'!')
    .add(b'(')
    .add(b')')
    .add(b'*');

/// Path segments additionally encode space as `%20`.
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &QUERY_ENCODE_SET_NO_SPACE.add(b' ');

/// URL-encode a query value using `+` for spaces.
pub(crate) fn url_encode(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut first = true;
    for chunk in s.split(' ') {
        if !first {
            result.push('+');
        }
        first = false;
        result.extend(utf8_percent_encode(chunk, QUERY_ENCODE_SET_NO_SPACE));
    }
    result
}

/// Encode a single path segment so it cannot introduce `/` or `?`.
pub(crate) fn encode_path_segment(s: &str) -> String {
    utf8_percent_encode(s, PATH_SEGMENT_ENCODE_SET).to_string()
}

/// Join `key=value` pairs into a query string, without the leading `?`.
pub(crate) fn encode_query<K, V>(pairs: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", url_encode(k.as_ref()), url_encode(v.as_ref())))
        .collect::<Vec<_>>()
        .join("&")
}
