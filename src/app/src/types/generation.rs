use serde::{Deserialize, Serialize};

/// Response of the generation endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GenerateResponse {
    pub id: String,
    pub image_url: String,
    pub download_url: String,
    pub model_latency_ms: f64,
}

/// A finished QR code as shown in the output panel
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GeneratedQrCode {
    pub id: String,
    pub prompt: String,
    pub wifi_name: String,
    /// QR code without the embedded password, safe for sharing
    pub image_url: String,
    /// QR code variant meant to be downloaded with the password
    pub download_url: String,
    pub model_latency_ms: f64,
}

impl GeneratedQrCode {
    /// Generation time in seconds with two decimals, e.g. `4.50`
    pub fn display_time(&self) -> String {
        format!("{:.2}", self.model_latency_ms / 1000.0)
    }
}

/// Result data handed to the form when it is opened
///
/// `/results/{id}` passes `Generated`, the start page passes `NoResult`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub enum GenerationResult {
    #[default]
    NoResult,
    Generated(GeneratedQrCode),
}

/// Which of the two images a download refers to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum QrVariant {
    WithPassword,
    WithoutPassword,
}

/// Output panel state
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub enum OutputState {
    #[default]
    Hidden,
    /// Submitted, waiting for a result
    Pending,
    Ready(GeneratedQrCode),
}

impl OutputState {
    pub fn qr_code(&self) -> Option<&GeneratedQrCode> {
        match self {
            OutputState::Ready(qr_code) => Some(qr_code),
            _ => None,
        }
    }
}
