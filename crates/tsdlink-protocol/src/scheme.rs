//! Embedded schema header encoding.
//!
//! The server describes the result columns in a `Link` response header whose
//! value is a base64 `data:` URI pointing at a CSVW metadata document:
//!
//! ```text
//! Link: <data:application/csvm+json;base64,eyJwdWJsaXNoZXIiOi...>; rel="describedBy"; type="application/csvm+json"
//! ```

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::HeaderMap;
use tracing::{trace, warn};
use tsdlink_types::SchemaError;

/// Response header carrying the schema document.
pub const SCHEME_HEADER: &str = "Link";

/// Literal preceding the base64 payload.
pub const START_LINK: &str = "<data:application/csvm+json;base64,";

/// Literal following the base64 payload.
pub const END_LINK: &str = ">; rel=\"describedBy\"; type=\"application/csvm+json\"";

/// Wraps a schema document into a header value.
///
/// ```
/// use tsdlink_protocol::{decode_scheme_header, encode_scheme_header};
///
/// let value = encode_scheme_header("{}");
/// assert_eq!(decode_scheme_header(&value).unwrap().as_deref(), Some("{}"));
/// ```
#[must_use]
pub fn encode_scheme_header(json: &str) -> String {
    format!("{START_LINK}{}{END_LINK}", STANDARD.encode(json))
}

/// Decodes the schema document from a header value.
///
/// Returns `Ok(None)` if the value does not carry both delimiters.
///
/// # Errors
///
/// Returns an error if the payload is not base64 or not UTF-8.
pub fn decode_scheme_header(value: &str) -> Result<Option<String>, SchemaError> {
    let Some(encoded) = value
        .strip_prefix(START_LINK)
        .and_then(|rest| rest.strip_suffix(END_LINK))
    else {
        return Ok(None);
    };

    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| SchemaError::HeaderEncoding(e.to_string()))?;
    String::from_utf8(bytes)
        .map(Some)
        .map_err(|e| SchemaError::HeaderEncoding(e.to_string()))
}

/// Extracts the schema document from response headers.
///
/// A missing header is not an error: the query simply has no discoverable
/// schema. A header that does not match the expected shape is skipped.
///
/// # Errors
///
/// Returns an error if a matching header has an undecodable payload.
pub fn extract_scheme(headers: &HeaderMap) -> Result<Option<String>, SchemaError> {
    for (name, value) in headers {
        trace!(%name, ?value, "response header");
    }

    for value in headers.get_all(SCHEME_HEADER) {
        let Ok(value) = value.to_str() else {
            warn!("skipping non-ASCII {SCHEME_HEADER} header");
            continue;
        };
        if let Some(json) = decode_scheme_header(value)? {
            trace!(%json, "JSON schema");
            return Ok(Some(json));
        }
        warn!(%value, "{SCHEME_HEADER} header does not embed a schema");
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    const SCHEME: &str = r#"{"publisher":{"schema":"atsd"},"tableSchema":{"columns":[{"name":"entité","datatype":"string"}]}}"#;

    #[test]
    fn test_header_round_trip_is_byte_exact() {
        let mut headers = HeaderMap::new();
        headers.insert(
            SCHEME_HEADER,
            HeaderValue::from_str(&encode_scheme_header(SCHEME)).unwrap(),
        );
        assert_eq!(extract_scheme(&headers).unwrap().as_deref(), Some(SCHEME));
    }

    #[test]
    fn test_missing_header_is_not_an_error() {
        assert_eq!(extract_scheme(&HeaderMap::new()).unwrap(), None);
    }

    #[test]
    fn test_unrelated_link_header_is_skipped() {
        let mut headers = HeaderMap::new();
        headers.append(
            SCHEME_HEADER,
            HeaderValue::from_static("<https://example.com/next>; rel=\"next\""),
        );
        assert_eq!(extract_scheme(&headers).unwrap(), None);

        headers.append(
            SCHEME_HEADER,
            HeaderValue::from_str(&encode_scheme_header("{}")).unwrap(),
        );
        assert_eq!(extract_scheme(&headers).unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_invalid_base64() {
        let value = format!("{START_LINK}not*base64{END_LINK}");
        assert!(matches!(
            decode_scheme_header(&value),
            Err(SchemaError::HeaderEncoding(_))
        ));
    }

    #[test]
    fn test_invalid_utf8() {
        let value = format!("{START_LINK}{}{END_LINK}", STANDARD.encode([0xff, 0xfe]));
        assert!(matches!(
            decode_scheme_header(&value),
            Err(SchemaError::HeaderEncoding(_))
        ));
    }
}
