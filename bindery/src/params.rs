//! Parameter reading and scalar parsers shared by bindings and clients.
//!
//! A parser turns raw text into a typed value, returning `None` when the
//! text does not have the expected format. Absent and empty values are
//! treated alike.

use axum::http::HeaderMap;

use crate::error::RequestError;

/// Parses a 32-bit integer.
pub fn parse_int(raw: &str) -> Option<i32> {
    raw.parse().ok()
}

/// Parses a 64-bit integer.
pub fn parse_long(raw: &str) -> Option<i64> {
    raw.parse().ok()
}

/// Parses a floating point number.
pub fn parse_float(raw: &str) -> Option<f64> {
    raw.parse().ok()
}

/// Parses exactly `true` or `false`.
///
/// ```
/// use bindery::parse_bool_strict;
///
/// assert_eq!(parse_bool_strict("true"), Some(true));
/// assert_eq!(parse_bool_strict("TRUE"), None);
/// assert_eq!(parse_bool_strict("1"), None);
/// ```
pub fn parse_bool_strict(raw: &str) -> Option<bool> {
    match raw {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Accepts any text.
pub fn parse_string(raw: &str) -> Option<String> {
    Some(raw.to_string())
}

/// Reads a header value as text.
///
/// ## Errors
///
/// `badParamFormat` when the header is present but not visible ASCII.
pub fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>, RequestError> {
    headers
        .get(name)
        .map(|v| v.to_str().map_err(|_| RequestError::bad_param_format(name)))
        .transpose()
}

/// Reads a parameter that must be present.
///
/// ## Errors
///
/// - `noParamFound` when the value is absent or empty
/// - `badParamFormat` when the parser rejects it
///
/// ## Examples
///
/// ```
/// use bindery::{RequestError, parse_int, read_required_param};
///
/// assert_eq!(read_required_param("limit", Some("10"), parse_int), Ok(10));
/// assert_eq!(
///     read_required_param("limit", Some(""), parse_int),
///     Err(RequestError::no_param_found("limit"))
/// );
/// assert_eq!(
///     read_required_param("limit", Some("ten"), parse_int),
///     Err(RequestError::bad_param_format("limit"))
/// );
/// ```
pub fn read_required_param<T>(
    name: &str,
    raw: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, RequestError> {
    read_optional_param(name, raw, parse)?.ok_or_else(|| RequestError::no_param_found(name))
}

/// Reads a parameter that may be absent.
///
/// ```
/// use bindery::{parse_int, read_optional_param};
///
/// assert_eq!(read_optional_param("limit", None, parse_int), Ok(None));
/// assert_eq!(read_optional_param("limit", Some("3"), parse_int), Ok(Some(3)));
/// ```
pub fn read_optional_param<T>(
    name: &str,
    raw: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, RequestError> {
    match raw {
        None | Some("") => Ok(None),
        Some(value) => parse(value)
            .map(Some)
            .ok_or_else(|| RequestError::bad_param_format(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_parsers() {
        assert_eq!(parse_int("-1"), Some(-1));
        assert_eq!(parse_int("3000000000"), None);
        assert_eq!(parse_long("3000000000"), Some(3_000_000_000));
        assert_eq!(parse_float("1.5"), Some(1.5));
        assert_eq!(parse_float("abc"), None);
        assert_eq!(parse_string("x"), Some("x".to_string()));
    }

    #[test]
    fn test_bool_is_strict() {
        assert_eq!(parse_bool_strict("false"), Some(false));
        assert_eq!(parse_bool_strict("yes"), None);
        assert_eq!(parse_bool_strict("True"), None);
    }

    #[test]
    fn test_required_missing() {
        assert_eq!(
            read_required_param("petId", None, parse_string),
            Err(RequestError::no_param_found("petId"))
        );
    }

    #[test]
    fn test_optional_empty_is_absent() {
        assert_eq!(read_optional_param("limit", Some(""), parse_int), Ok(None));
    }

    #[test]
    fn test_optional_bad_format() {
        assert_eq!(
            read_optional_param("flag", Some("maybe"), parse_bool_strict),
            Err(RequestError::bad_param_format("flag"))
        );
    }

    #[test]
    fn test_header_value_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert("x-version", HeaderValue::from_static("1.2"));
        assert_eq!(header_value(&headers, "X-Version"), Ok(Some("1.2")));
        assert_eq!(header_value(&headers, "x-missing"), Ok(None));
    }

    #[test]
    fn test_header_value_not_visible_ascii() {
        let mut headers = HeaderMap::new();
        headers.insert("x-version", HeaderValue::from_bytes(b"1.\xff").unwrap());
        assert_eq!(
            header_value(&headers, "x-version"),
            Err(RequestError::bad_param_format("x-version"))
        );
    }
}
