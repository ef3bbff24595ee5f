use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::*;

/// Application Model - the complete state
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
pub struct Model {
    // Form state
    pub form: GenerateRequest,
    /// Validation message per field key (`wifi_name`, `prompt`, ...)
    pub field_errors: HashMap<String, String>,

    // UI state
    pub is_loading: bool,
    pub error_message: Option<String>,

    // Output panel
    pub output: OutputState,
}

impl Model {
    /// Model as opened from a stored result
    pub fn from_result(result: GenerationResult) -> Self {
        let mut model = Self::default();
        model.apply_result(result);
        model
    }

    /// Show a stored result and pre-fill the fields it carries
    pub fn apply_result(&mut self, result: GenerationResult) {
        if let GenerationResult::Generated(qr_code) = result {
            self.form.prompt = qr_code.prompt.clone();
            self.form.wifi_name = qr_code.wifi_name.clone();
            self.output = OutputState::Ready(qr_code);
        }
    }

    /// Start a loading operation (sets is_loading=true, clears error)
    pub fn start_loading(&mut self) {
        self.is_loading = true;
        self.error_message = None;
    }

    /// Stop loading and clear error
    pub fn stop_loading(&mut self) {
        self.is_loading = false;
        self.error_message = None;
    }

    /// Set an error message and stop loading
    pub fn set_error(&mut self, error: String) {
        self.is_loading = false;
        self.error_message = Some(error);
    }

    /// Set an error message, stop loading, and return a render command
    pub fn set_error_and_render(
        &mut self,
        error: String,
    ) -> crux_core::Command<crate::Effect, crate::events::Event> {
        self.set_error(error);
        crux_core::render::render()
    }

    pub fn view(&self) -> ViewModel {
        let output = match &self.output {
            OutputState::Hidden => OutputView::Hidden,
            OutputState::Pending => OutputView::Placeholder,
            OutputState::Ready(qr_code) => OutputView::QrCode {
                image_url: qr_code.image_url.clone(),
                download_url: qr_code.download_url.clone(),
                time: qr_code.display_time(),
            },
        };

        let submit_label = match (&self.output, self.is_loading) {
            (_, true) => "",
            (OutputState::Ready(_), false) => "✨ Regenerate",
            _ => "Generate",
        };

        ViewModel {
            form: self.form.clone(),
            field_errors: self.field_errors.clone(),
            is_loading: self.is_loading,
            submit_label: submit_label.to_string(),
            error_message: self.error_message.clone(),
            output,
            suggestions: SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
            encryption_options: Encryption::ALL.into_iter().map(Into::into).collect(),
        }
    }
}

/// What the Shell (or the server renderer) draws
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
pub struct ViewModel {
    pub form: GenerateRequest,
    pub field_errors: HashMap<String, String>,
    /// Submit button shows a busy indicator and is disabled
    pub is_loading: bool,
    pub submit_label: String,
    pub error_message: Option<String>,
    pub output: OutputView,
    pub suggestions: Vec<String>,
    pub encryption_options: Vec<EncryptionOption>,
}

#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
pub enum OutputView {
    #[default]
    Hidden,
    Placeholder,
    QrCode {
        image_url: String,
        download_url: String,
        /// Generation time in seconds, two decimals
        time: String,
    },
}
