use actix_web::{App, http::StatusCode, test, web};
use nopasswords::{
    api::Api,
    config::SiteConfig,
    generation_client::{GenerationServiceClient, QrGenerator},
    http_client::UpstreamError,
    kv_store_client::{KvRestClient, RecordStore},
};
use nopasswords_core::GenerateRequest;
use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

/// Request as seen by the mock server
#[derive(Clone, Debug, Default)]
struct RecordedRequest {
    request_line: String,
    headers: Vec<String>,
    body: String,
}

impl RecordedRequest {
    fn header(&self, name: &str) -> Option<String> {
        self.headers.iter().find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim().to_string())
        })
    }
}

// Integration tests against a local HTTP server answering every request with a canned response
async fn start_mock_server(
    status: &'static str,
    response_body: &'static str,
) -> (SocketAddr, Arc<Mutex<Vec<RecordedRequest>>>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind mock server");
    let addr = listener.local_addr().expect("failed to get local address");
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = requests.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let recorded = recorded.clone();

            tokio::spawn(async move {
                let mut reader = BufReader::new(&mut stream);
                let mut request = RecordedRequest::default();

                if reader.read_line(&mut request.request_line).await.is_err() {
                    return;
                }

                // Read HTTP headers
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).await.is_err() {
                        return;
                    }

                    if line.trim().is_empty() {
                        break;
                    }

                    request.headers.push(line.trim_end().to_string());
                }

                let content_length = request
                    .header("content-length")
                    .and_then(|length| length.parse::<usize>().ok())
                    .unwrap_or(0);
                let mut body = vec![0; content_length];
                if reader.read_exact(&mut body).await.is_err() {
                    return;
                }
                request.body = String::from_utf8_lossy(&body).to_string();
                recorded.lock().unwrap().push(request);

                let http_response = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{response_body}",
                    response_body.len(),
                );

                let _ = stream.write_all(http_response.as_bytes()).await;
            });
        }
    });

    (addr, requests)
}

fn valid_request() -> GenerateRequest {
    GenerateRequest {
        wifi_name: "infinity_5g".to_string(),
        wifi_password: "secret".to_string(),
        prompt: "italian mountains".to_string(),
        encryption: "WPA".to_string(),
    }
}

#[tokio::test]
async fn test_kv_store_client_reads_record() {
    let (addr, requests) = start_mock_server(
        "200 OK",
        r#"{"result":["prompt","italian mountains","wifi_name","infinity_5g","displayImg","https://x/img.png","passwordImg","https://x/img2.png","model_latency","4500"]}"#,
    )
    .await;

    let client = KvRestClient::with_endpoint(&format!("http://{addr}"), "kv-token")
        .expect("failed to create client");
    let record = client
        .record("xyz")
        .await
        .expect("request should succeed")
        .expect("record should exist");

    assert_eq!(record.prompt, "italian mountains");
    assert_eq!(record.wifi_name.as_deref(), Some("infinity_5g"));
    assert_eq!(record.model_latency_ms(), Some(4500.0));

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].request_line.starts_with("GET /hgetall/xyz "));
    assert_eq!(
        requests[0].header("authorization").as_deref(),
        Some("Bearer kv-token")
    );
}

#[tokio::test]
async fn test_kv_store_client_missing_record() {
    let (addr, _) = start_mock_server("200 OK", r#"{"result":[]}"#).await;

    let client = KvRestClient::with_endpoint(&format!("http://{addr}"), "kv-token")
        .expect("failed to create client");

    assert_eq!(client.record("missing").await.unwrap(), None);
}

#[tokio::test]
async fn test_kv_store_client_error_reply() {
    let (addr, _) = start_mock_server("200 OK", r#"{"error":"WRONGPASS invalid password"}"#).await;

    let client = KvRestClient::with_endpoint(&format!("http://{addr}"), "kv-token")
        .expect("failed to create client");
    let err = client.record("xyz").await.unwrap_err();

    assert!(format!("{err:#}").contains("WRONGPASS"));
}

#[tokio::test]
async fn test_kv_store_client_unauthorized() {
    let (addr, _) = start_mock_server("401 Unauthorized", r#"{"error":"Unauthorized"}"#).await;

    let client = KvRestClient::with_endpoint(&format!("http://{addr}"), "wrong")
        .expect("failed to create client");
    let err = client.record("xyz").await.unwrap_err();

    assert!(format!("{err:#}").contains("401"));
}

#[tokio::test]
async fn test_generation_client_forwards_request() {
    let (addr, requests) = start_mock_server(
        "200 OK",
        r#"{"id":"abc123","image_url":"https://x/img.png","download_url":"https://x/img2.png","model_latency_ms":4500}"#,
    )
    .await;

    let client = GenerationServiceClient::with_url(&format!("http://{addr}/generate"))
        .expect("failed to create client");
    let response = client
        .generate(valid_request())
        .await
        .expect("generation should succeed");

    assert_eq!(response.id, "abc123");
    assert_eq!(response.model_latency_ms, 4500.0);

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].request_line.starts_with("POST /generate "));
    let body: GenerateRequest = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(body, valid_request());
}

#[tokio::test]
async fn test_generation_client_upstream_failure() {
    let (addr, _) = start_mock_server("500 Internal Server Error", "internal error").await;

    let client = GenerationServiceClient::with_url(&format!("http://{addr}/generate"))
        .expect("failed to create client");
    let err = client.generate(valid_request()).await.unwrap_err();

    let message = format!("{err:#}");
    assert!(message.contains("500"));
    assert!(message.contains("internal error"));

    let upstream = UpstreamError::find(&err).expect("upstream reply in error chain");
    assert_eq!(upstream.status.as_u16(), 500);
    assert_eq!(upstream.body, "internal error");
}

#[actix_web::test]
async fn test_generate_endpoint_hides_generation_service_url() {
    let (addr, requests) = start_mock_server("500 Internal Server Error", "internal error").await;

    type ServiceApi = Api<KvRestClient, GenerationServiceClient>;
    let api = ServiceApi::new(
        KvRestClient::with_endpoint("http://127.0.0.1:1", "token").expect("failed to create client"),
        GenerationServiceClient::with_url(&format!("http://{addr}/private-render/generate"))
            .expect("failed to create client"),
        SiteConfig::default(),
        false,
    );

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(api))
            .route("/", web::post().to(ServiceApi::submit_form))
            .route("/api/generate", web::post().to(ServiceApi::generate)),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/generate")
            .set_json(valid_request())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = String::from_utf8_lossy(&test::read_body(resp).await).to_string();
    assert_eq!(body, "internal error");

    let request = valid_request();
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/")
            .set_form([
                ("wifi_name", request.wifi_name.as_str()),
                ("wifi_password", request.wifi_password.as_str()),
                ("prompt", request.prompt.as_str()),
                ("encryption", request.encryption.as_str()),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let page = String::from_utf8_lossy(&test::read_body(resp).await).to_string();
    assert!(page.contains("Failed to generate QR code: 500, internal error"));

    for text in [&body, &page] {
        assert!(!text.contains("private-render"));
        assert!(!text.contains(&addr.to_string()));
    }
    assert_eq!(requests.lock().unwrap().len(), 2);
}
