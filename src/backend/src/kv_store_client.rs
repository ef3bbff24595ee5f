#![cfg_attr(feature = "mock", allow(dead_code, unused_imports))]

use crate::{
    config::AppConfig,
    http_client::{handle_http_response, http_client},
};
use anyhow::{Context, Result, anyhow, bail, ensure};
use log::info;
#[cfg(any(test, feature = "mock"))]
use mockall::automock;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{Map, Value};
use trait_variant::make;

/// A generated result as persisted by the generation service
///
/// Field names follow the stored hash layout.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct GenerationRecord {
    #[serde(default)]
    pub prompt: String,
    #[serde(rename = "displayImg")]
    pub display_img: Option<String>,
    #[serde(rename = "passwordImg")]
    pub password_img: Option<String>,
    pub wifi_name: Option<String>,
    /// Milliseconds, stored as a string
    pub model_latency: Option<String>,
}

impl GenerationRecord {
    /// `model_latency` as a number, `None` if missing or not numeric
    pub fn model_latency_ms(&self) -> Option<f64> {
        self.model_latency
            .as_deref()
            .and_then(|latency| latency.trim().parse::<f64>().ok())
            .filter(|latency| latency.is_finite())
    }
}

#[make(Send)]
#[cfg_attr(any(test, feature = "mock"), automock)]
pub trait RecordStore {
    /// Read the record stored under `id`, `None` if there is none
    async fn record(&self, id: &str) -> Result<Option<GenerationRecord>>;
}

// REST reply envelope: {"result": ...} or {"error": "..."}
#[derive(Deserialize)]
struct RestReply {
    result: Option<Value>,
    error: Option<String>,
}

/// Client for a Redis-compatible key-value store exposed over REST (Upstash / Vercel KV)
#[derive(Clone)]
pub struct KvRestClient {
    client: Client,
    base_url: Url,
    token: String,
}

impl KvRestClient {
    const HGETALL_COMMAND: &'static str = "hgetall";

    pub fn new() -> Result<Self> {
        let config = &AppConfig::get().kv_store;
        Self::with_endpoint(&config.rest_api_url, &config.rest_api_token)
    }

    pub fn with_endpoint(rest_api_url: &str, token: &str) -> Result<Self> {
        let base_url = Url::parse(rest_api_url)
            .with_context(|| format!("failed to parse key-value store url: {rest_api_url}"))?;

        ensure!(
            !base_url.cannot_be_a_base(),
            "failed since key-value store url cannot be a base: {rest_api_url}"
        );

        Ok(KvRestClient {
            client: http_client()?,
            base_url,
            token: token.to_string(),
        })
    }

    /// Build `<base>/<command>/<key>` with the key percent-encoded as one segment
    fn command_url(&self, command: &str, key: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("failed to build command url"))?
            .pop_if_empty()
            .extend([command, key]);
        Ok(url)
    }

    /// GET request to the REST API, returning the `result` value
    async fn get(&self, url: Url) -> Result<Value> {
        info!("GET {url}");

        let res = self
            .client
            .get(url.clone())
            .bearer_auth(&self.token)
            .send()
            .await
            .context(format!("failed to send GET request to {url}"))?;

        let body = handle_http_response(res, &format!("GET {url}")).await?;
        let reply: RestReply =
            serde_json::from_str(&body).context("failed to parse key-value store reply")?;

        if let Some(error) = reply.error {
            bail!("key-value store returned error: {error}");
        }

        Ok(reply.result.unwrap_or(Value::Null))
    }
}

impl RecordStore for KvRestClient {
    async fn record(&self, id: &str) -> Result<Option<GenerationRecord>> {
        let url = self.command_url(Self::HGETALL_COMMAND, id)?;
        let result = self.get(url).await?;

        parse_hash(result)
    }
}

/// Convert an HGETALL result into a record
///
/// Accepts the flat `[field, value, ...]` form as well as an object. An empty
/// or null result means the key does not exist.
fn parse_hash(result: Value) -> Result<Option<GenerationRecord>> {
    let fields = match result {
        Value::Null => return Ok(None),
        Value::Array(items) => {
            ensure!(
                items.len() % 2 == 0,
                "failed to parse hash: odd number of items ({})",
                items.len()
            );

            items
                .chunks(2)
                .map(|pair| {
                    let field = pair[0]
                        .as_str()
                        .context("failed to parse hash: field name is not a string")?;
                    Ok((field.to_string(), normalize_value(pair[1].clone())))
                })
                .collect::<Result<Map<String, Value>>>()?
        }
        Value::Object(object) => object
            .into_iter()
            .map(|(field, value)| (field, normalize_value(value)))
            .collect(),
        other => bail!("failed to parse hash: unexpected result {other}"),
    };

    if fields.is_empty() {
        return Ok(None);
    }

    serde_json::from_value(Value::Object(fields))
        .map(Some)
        .context("failed to parse generation record")
}

// the store may hand back numbers for numeric strings; records only carry strings
fn normalize_value(value: Value) -> Value {
    match value {
        Value::Number(number) => Value::String(number.to_string()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_client() -> KvRestClient {
        KvRestClient::with_endpoint("https://kv.example.com", "token").unwrap()
    }

    mod command_url {
        use super::*;

        #[test]
        fn appends_command_and_key() {
            let client = create_test_client();
            let url = client.command_url("hgetall", "xyz").unwrap();
            assert_eq!(url.as_str(), "https://kv.example.com/hgetall/xyz");
        }

        #[test]
        fn encodes_key_as_single_segment() {
            let client = create_test_client();
            let url = client.command_url("hgetall", "a/b c").unwrap();
            assert_eq!(url.as_str(), "https://kv.example.com/hgetall/a%2Fb%20c");
        }

        #[test]
        fn keeps_base_path() {
            let client = KvRestClient::with_endpoint("https://kv.example.com/v1/", "t").unwrap();
            let url = client.command_url("hgetall", "xyz").unwrap();
            assert_eq!(url.as_str(), "https://kv.example.com/v1/hgetall/xyz");
        }

        #[test]
        fn rejects_invalid_base_url() {
            assert!(KvRestClient::with_endpoint("not a url", "t").is_err());
            assert!(KvRestClient::with_endpoint("mailto:kv@example.com", "t").is_err());
        }
    }

    mod parse_hash {
        use super::*;

        #[test]
        fn parses_flat_field_value_list() {
            let record = parse_hash(json!([
                "prompt", "italian mountains",
                "wifi_name", "infinity_5g",
                "displayImg", "https://x/img.png",
                "passwordImg", "https://x/img2.png",
                "model_latency", "4500"
            ]))
            .unwrap()
            .unwrap();

            assert_eq!(record.prompt, "italian mountains");
            assert_eq!(record.wifi_name.as_deref(), Some("infinity_5g"));
            assert_eq!(record.display_img.as_deref(), Some("https://x/img.png"));
            assert_eq!(record.password_img.as_deref(), Some("https://x/img2.png"));
            assert_eq!(record.model_latency_ms(), Some(4500.0));
        }

        #[test]
        fn parses_object_with_numeric_latency() {
            let record = parse_hash(json!({
                "prompt": "italian mountains",
                "model_latency": 4500
            }))
            .unwrap()
            .unwrap();

            assert_eq!(record.model_latency.as_deref(), Some("4500"));
            assert_eq!(record.display_img, None);
        }

        #[test]
        fn empty_or_null_result_is_missing_record() {
            assert_eq!(parse_hash(json!([])).unwrap(), None);
            assert_eq!(parse_hash(json!({})).unwrap(), None);
            assert_eq!(parse_hash(Value::Null).unwrap(), None);
        }

        #[test]
        fn ignores_unknown_fields() {
            let record = parse_hash(json!(["prompt", "p", "wifi_password", "secret"]))
                .unwrap()
                .unwrap();
            assert_eq!(record.prompt, "p");
        }

        #[test]
        fn rejects_malformed_results() {
            assert!(parse_hash(json!(["prompt"])).is_err());
            assert!(parse_hash(json!([1, "x"])).is_err());
            assert!(parse_hash(json!("OK")).is_err());
        }
    }

    mod model_latency {
        use super::*;

        fn with_latency(latency: Option<&str>) -> GenerationRecord {
            GenerationRecord {
                model_latency: latency.map(str::to_string),
                ..Default::default()
            }
        }

        #[test]
        fn parses_integer_and_float_strings() {
            assert_eq!(with_latency(Some("4500")).model_latency_ms(), Some(4500.0));
            assert_eq!(with_latency(Some(" 12.5 ")).model_latency_ms(), Some(12.5));
            assert_eq!(with_latency(Some("0")).model_latency_ms(), Some(0.0));
        }

        #[test]
        fn missing_or_invalid_latency_is_none() {
            assert_eq!(with_latency(None).model_latency_ms(), None);
            assert_eq!(with_latency(Some("fast")).model_latency_ms(), None);
            assert_eq!(with_latency(Some("NaN")).model_latency_ms(), None);
        }
    }
}
