#![cfg_attr(feature = "mock", allow(dead_code, unused_imports))]

use crate::{
    config::AppConfig,
    http_client::{handle_http_response, http_client},
};
use anyhow::{Context, Result};
use log::info;
#[cfg(any(test, feature = "mock"))]
use mockall::automock;
use nopasswords_core::{GenerateRequest, GenerateResponse};
use reqwest::{Client, Url};
use trait_variant::make;

#[make(Send)]
#[cfg_attr(any(test, feature = "mock"), automock)]
pub trait QrGenerator {
    /// Generate a QR code for an already validated request
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;
}

/// Client for the upstream service that renders and persists QR codes
#[derive(Clone)]
pub struct GenerationServiceClient {
    client: Client,
    service_url: Url,
}

impl GenerationServiceClient {
    pub fn new() -> Result<Self> {
        Self::with_url(&AppConfig::get().generation.service_url)
    }

    pub fn with_url(service_url: &str) -> Result<Self> {
        let service_url = Url::parse(service_url)
            .with_context(|| format!("failed to parse generation service url: {service_url}"))?;

        Ok(GenerationServiceClient {
            client: http_client()?,
            service_url,
        })
    }
}

impl QrGenerator for GenerationServiceClient {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let url = &self.service_url;
        info!("POST {url} (prompt: {})", request.prompt);

        let res = self
            .client
            .post(url.clone())
            .json(&request)
            .send()
            .await
            .context(format!("failed to send POST request to {url}"))?;

        let body = handle_http_response(res, &format!("POST {url}")).await?;

        serde_json::from_str(&body).context("failed to parse generation response")
    }
}
