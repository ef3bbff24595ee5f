use actix_web::HttpResponse;
use anyhow::{Context, Result};
use log::error;
use nopasswords_core::GenerateResponse;
use reqwest::{Client, Response, StatusCode};
use std::fmt;

/// Create the HTTP client used for outbound calls (key-value store, generation service)
///
/// # Examples
/// ```no_run
/// use nopasswords::http_client::http_client;
///
/// let client = http_client().expect("failed to create client");
/// ```
pub fn http_client() -> Result<Client> {
    Client::builder()
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .context("failed to create HTTP client")
}

/// Trait for converting service results into HTTP responses
pub trait ServiceResultResponse {
    fn into_response(self) -> HttpResponse;
}

impl ServiceResultResponse for GenerateResponse {
    fn into_response(self) -> HttpResponse {
        match serde_json::to_string(&self) {
            Ok(json) => HttpResponse::Ok()
                .content_type("application/json")
                .body(json),
            Err(e) => {
                error!("failed to serialize GenerateResponse: {e:#}");
                HttpResponse::InternalServerError().body("failed to serialize response")
            }
        }
    }
}

/// Non-success reply of an upstream service
///
/// `request` names the upstream endpoint and is only meant for logs.
#[derive(Debug)]
pub struct UpstreamError {
    pub request: String,
    pub status: StatusCode,
    pub body: String,
}

impl UpstreamError {
    /// Find an upstream reply anywhere in the error chain
    pub fn find(error: &anyhow::Error) -> Option<&UpstreamError> {
        error
            .chain()
            .find_map(|cause| cause.downcast_ref::<UpstreamError>())
    }
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} failed with status {} and body: {}",
            self.request, self.status, self.body
        )
    }
}

impl std::error::Error for UpstreamError {}

/// Handle Result and convert data to Response
///
/// Puts the data or the error into a corresponding Response and logs failures.
/// The full error chain is only logged; the response carries the upstream
/// body if there is one.
///
/// # Arguments
/// * `result` - The Result to handle
/// * `operation` - Context message describing the operation
///
/// # Returns
/// * `HttpResponse` - The ServiceResultResponse (HttpResponse::Ok or HttpResponse::InternalServerError)
pub fn handle_service_result<T>(result: Result<T>, operation: &str) -> HttpResponse
where
    T: ServiceResultResponse,
{
    match result {
        Ok(data) => data.into_response(),
        Err(e) => {
            error!("{operation} failed: {e:#}");
            let body = match UpstreamError::find(&e) {
                Some(upstream) => upstream.body.clone(),
                None => format!("{operation} failed"),
            };
            HttpResponse::InternalServerError().body(body)
        }
    }
}

/// Handle HTTP response by checking status and extracting body
///
/// This is a common utility for processing HTTP responses.
/// It ensures the response status is successful and extracts the body text.
///
/// # Arguments
/// * `res` - The HTTP response to handle
/// * `context_msg` - Context message describing the request (e.g., "POST http://...")
///
/// # Returns
/// * `Ok(String)` - The response body if the status is successful
/// * `Err` - [`UpstreamError`] if the status is not successful, or reading the body failed
pub async fn handle_http_response(res: Response, context_msg: &str) -> Result<String> {
    let status = res.status();
    let body = res.text().await.context("failed to read response body")?;

    if !status.is_success() {
        return Err(UpstreamError {
            request: context_msg.to_string(),
            status,
            body,
        }
        .into());
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body::to_bytes, http::StatusCode};

    #[test]
    fn test_http_client_builds() {
        assert!(http_client().is_ok());
    }

    fn upstream_error() -> anyhow::Error {
        anyhow::Error::from(UpstreamError {
            request: "POST http://generator.internal:8000/generate".to_string(),
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            body: "internal error".to_string(),
        })
        .context("failed to generate QR code")
    }

    #[actix_web::test]
    async fn test_handle_service_result_answers_with_upstream_body_only() {
        let result: Result<GenerateResponse> = Err(upstream_error());
        let response = handle_service_result(result, "generate");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body()).await.unwrap();
        assert_eq!(body, "internal error");
    }

    #[actix_web::test]
    async fn test_handle_service_result_hides_other_errors() {
        let result: Result<GenerateResponse> = Err(anyhow::anyhow!(
            "failed to send POST request to http://generator.internal:8000/generate"
        ));
        let response = handle_service_result(result, "generate");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body()).await.unwrap();
        assert_eq!(body, "generate failed");
    }

    #[test]
    fn test_upstream_error_is_found_through_context() {
        let error = upstream_error();
        let upstream = UpstreamError::find(&error).expect("upstream error in chain");

        assert_eq!(upstream.status.as_u16(), 500);
        assert_eq!(upstream.body, "internal error");
        assert!(format!("{error:#}").contains("generator.internal"));
    }

    #[actix_web::test]
    async fn test_generate_response_is_serialized_as_json() {
        let response = handle_service_result(
            Ok(GenerateResponse {
                id: "abc123".to_string(),
                image_url: "https://x/img.png".to_string(),
                download_url: "https://x/img2.png".to_string(),
                model_latency_ms: 4500.0,
            }),
            "test",
        );

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["id"], "abc123");
        assert_eq!(json["model_latency_ms"], 4500.0);
    }
}
