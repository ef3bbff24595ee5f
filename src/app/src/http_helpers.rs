//! HTTP helper functions for Crux Core
//!
//! This module extracts common HTTP response handling logic
//! into debuggable, testable functions.

use crux_http::{HttpError, Response};

/// Base URL for same-origin API endpoints.
///
/// NOTE: This is a dummy prefix required because `crux_http` requires
/// absolute URLs and rejects relative paths (`RelativeUrlWithoutBase` error).
/// The Shell strips this prefix before sending requests via `fetch()`,
/// making them relative to the page origin.
pub const BASE_URL: &str = "https://relative";

/// Endpoint of the QR code generation API
pub const GENERATE_ENDPOINT: &str = "/api/generate";

/// Action named in generation failure messages
pub const GENERATE_ACTION: &str = "generate QR code";

/// Constructs the full address from a given endpoint.
///
/// # Example
/// ```
/// use nopasswords_core::http_helpers::build_url;
/// let url = build_url("/api/generate");
/// assert_eq!(url, "https://relative/api/generate");
/// ```
pub fn build_url(endpoint: &str) -> String {
    format!("{BASE_URL}{endpoint}")
}

/// Validates HTTP response.
///
/// Only `200 OK` counts as success; other 2xx codes are treated as failures.
pub fn is_response_success(response: &Response<Vec<u8>>) -> bool {
    u16::from(response.status()) == 200
}

/// User-facing message for a failed request, e.g.
/// `Failed to generate QR code: 500, internal error`
pub fn failure_message(action: &str, status: impl std::fmt::Display, body: &str) -> String {
    format!("Failed to {action}: {status}, {body}")
}

/// Extracts error message from HTTP response.
pub fn extract_error_message(action: &str, response: &mut Response<Vec<u8>>) -> String {
    let status = u16::from(response.status());

    let body = match response.take_body() {
        Some(body) => match String::from_utf8(body) {
            Ok(text) => text,
            Err(e) => format!("(Invalid UTF-8: {e})"),
        },
        None => String::new(),
    };

    failure_message(action, status, &body)
}

/// Parse JSON from response body.
///
/// Returns error if response is not successful or JSON parsing fails.
pub fn parse_json_response<T: serde::de::DeserializeOwned>(
    action: &str,
    response: &mut Response<Vec<u8>>,
) -> Result<T, String> {
    if !is_response_success(response) {
        return Err(extract_error_message(action, response));
    }

    match response.take_body() {
        Some(body) => serde_json::from_slice(&body)
            .map_err(|e| format!("Failed to {action}: JSON parse error: {e}")),
        None => Err(format!("Failed to {action}: Empty response body")),
    }
}

/// Message for a failed request.
///
/// `crux_http` reports non-2xx replies as [`HttpError::Http`]; those keep the
/// status code and body text. Anything else (network failure, bad url) falls
/// back to the error's own message.
pub fn map_http_error(action: &str, error: HttpError) -> String {
    match error {
        HttpError::Http { code, body, .. } => failure_message(
            action,
            u16::from(code),
            &String::from_utf8_lossy(body.as_deref().unwrap_or_default()),
        ),
        other => format!("Failed to {action}: {other}"),
    }
}

/// Process HTTP response result and parse JSON
pub fn process_json_response<T: serde::de::DeserializeOwned>(
    action: &str,
    result: crux_http::Result<Response<Vec<u8>>>,
) -> Result<T, String> {
    match result {
        Ok(mut response) => parse_json_response(action, &mut response),
        Err(e) => Err(map_http_error(action, e)),
    }
}
