use serde::{Deserialize, Serialize};

use crate::types::*;

/// Id of the `<script type="application/json">` element through which the
/// server hands the page's [`GenerationResult`] to the shell
pub const RESULT_ELEMENT_ID: &str = "generation-result";

/// Events that can happen in the app
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum Event {
    /// Opened from the start page (`NoResult`) or from `/results/{id}`
    Initialize(GenerationResult),

    Form(FormEvent),
    Output(OutputEvent),
}

impl Event {
    /// `Initialize` from the text of the embedded result element
    ///
    /// An unreadable result starts with an empty form.
    pub fn initialize_from_embedded(json: &str) -> Self {
        let result = serde_json::from_str(json).unwrap_or_else(|e| {
            log::warn!("ignoring embedded generation result: {e}");
            GenerationResult::NoResult
        });

        Event::Initialize(result)
    }
}

/// Generation form events
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum FormEvent {
    UpdateField {
        field: FormField,
        value: String,
    },
    SelectSuggestion(String),
    Submit,

    // HTTP responses (internal events, skipped from serialization)
    #[serde(skip)]
    GenerateResponse {
        prompt: String,
        result: Result<GenerateResponse, String>,
    },
}

/// Output panel events
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum OutputEvent {
    Download(QrVariant),
}
