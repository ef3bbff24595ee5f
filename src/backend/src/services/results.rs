//! Results loader
//!
//! Reads a stored generation record and turns it into page metadata and the
//! result the form is opened with.

use crate::{
    config::SiteConfig,
    kv_store_client::{GenerationRecord, RecordStore},
};
use anyhow::{Context, Result};
use log::{debug, info};
use nopasswords_core::{GeneratedQrCode, GenerationResult};

pub const TWITTER_CARD: &str = "summary_large_image";

/// Title, description and preview image of a page, rendered into Open Graph and Twitter meta tags
#[derive(Clone, Debug, PartialEq)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub image: String,
    pub twitter_card: &'static str,
    pub twitter_creator: String,
}

impl PageMetadata {
    /// Metadata of the results page for `record`
    pub fn for_record(record: &GenerationRecord, site: &SiteConfig) -> Self {
        Self {
            title: format!("Wifi Qr Code Generator: {}", record.prompt),
            description: format!(
                "A QR code generated from {} linking to: {}",
                site.name,
                record.wifi_name.as_deref().unwrap_or_default()
            ),
            image: record
                .display_img
                .clone()
                .filter(|image| !image.is_empty())
                .unwrap_or_else(|| site.fallback_image()),
            twitter_card: TWITTER_CARD,
            twitter_creator: site.twitter_creator.clone(),
        }
    }
}

/// Everything the results page is rendered from
#[derive(Clone, Debug, PartialEq)]
pub struct ResultsPage {
    pub metadata: PageMetadata,
    pub result: GenerationResult,
}

/// Service for loading shareable results
pub struct ResultsService;

impl ResultsService {
    /// Load the results page for `id`
    ///
    /// # Returns
    /// * `Ok(None)` - no record is stored under `id`
    /// * `Ok(Some(page))` - metadata plus the result, `NoResult` if the record is incomplete
    /// * `Err` - the store could not be read
    pub async fn load<Store: RecordStore>(
        store: &Store,
        site: &SiteConfig,
        id: &str,
    ) -> Result<Option<ResultsPage>> {
        debug!("load() called: {id}");

        let Some(record) = store
            .record(id)
            .await
            .with_context(|| format!("failed to read record {id}"))?
        else {
            info!("no record found for {id}");
            return Ok(None);
        };

        Ok(Some(ResultsPage {
            metadata: PageMetadata::for_record(&record, site),
            result: Self::generation_result(id, record),
        }))
    }

    /// A record is a displayable result only when all of its parts are present
    pub fn generation_result(id: &str, record: GenerationRecord) -> GenerationResult {
        let model_latency_ms = record.model_latency_ms();

        let (Some(image_url), Some(download_url), Some(wifi_name), Some(model_latency_ms)) = (
            record.display_img.filter(|url| !url.is_empty()),
            record.password_img.filter(|url| !url.is_empty()),
            record.wifi_name,
            model_latency_ms,
        ) else {
            return GenerationResult::NoResult;
        };

        if record.prompt.is_empty() {
            return GenerationResult::NoResult;
        }

        GenerationResult::Generated(GeneratedQrCode {
            id: id.to_string(),
            prompt: record.prompt,
            wifi_name,
            image_url,
            download_url,
            model_latency_ms,
        })
    }
}
