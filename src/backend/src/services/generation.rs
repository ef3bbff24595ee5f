//! QR code generation
//!
//! Validates form values with the shared schema and forwards valid requests to
//! the generation service.

use crate::generation_client::QrGenerator;
use anyhow::{Context, Result};
use log::debug;
use nopasswords_core::{GenerateRequest, GenerateResponse};
use std::collections::HashMap;

#[derive(Debug, PartialEq)]
pub enum GenerationOutcome {
    Generated(GenerateResponse),
    /// Validation failed, first message per field
    Invalid(HashMap<String, String>),
}

/// Service for generating QR codes
pub struct GenerationService;

impl GenerationService {
    /// Validate `request` and generate a QR code for it
    ///
    /// # Returns
    /// * `Ok(GenerationOutcome::Invalid)` - the generator is not called
    /// * `Ok(GenerationOutcome::Generated)` - the generator succeeded
    /// * `Err` - the generator failed
    pub async fn generate<Generator: QrGenerator>(
        generator: &Generator,
        request: GenerateRequest,
    ) -> Result<GenerationOutcome> {
        debug!("generate() called");

        let field_errors = request.field_errors();
        if !field_errors.is_empty() {
            debug!("rejected invalid request: {field_errors:?}");
            return Ok(GenerationOutcome::Invalid(field_errors));
        }

        generator
            .generate(request)
            .await
            .map(GenerationOutcome::Generated)
            .context("failed to generate QR code")
    }
}
