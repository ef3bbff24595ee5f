use serde::{Deserialize, Serialize};
use serde_valid::Validate;
use std::collections::HashMap;

/// Example prompts offered by the suggestion picker
pub const SUGGESTIONS: [&str; 8] = [
    "alient planet with rectangles",
    "italian mountains in a James Bond movie",
    "industrial age with plants",
    "spiritual wicked geometry patterns, colorful",
    "rivers and streams in Peruvian forest",
    "waterfall in Bali with palm trees and ocean",
    "minimalist futuristic architecture",
    "futuristic robot creatures",
];

/// WiFi security advertised in the QR payload
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Encryption {
    #[default]
    #[serde(rename = "WPA")]
    Wpa,
    #[serde(rename = "WEP")]
    Wep,
    #[serde(rename = "none")]
    None,
}

impl Encryption {
    pub const ALL: [Encryption; 3] = [Encryption::Wpa, Encryption::Wep, Encryption::None];

    /// Wire value as sent to the generation endpoint
    pub fn value(&self) -> &'static str {
        match self {
            Encryption::Wpa => "WPA",
            Encryption::Wep => "WEP",
            Encryption::None => "none",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Encryption::Wpa => "WPA",
            Encryption::Wep => "WEP",
            Encryption::None => "None",
        }
    }
}

/// Select option for the encryption picker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EncryptionOption {
    pub value: String,
    pub label: String,
}

impl From<Encryption> for EncryptionOption {
    fn from(encryption: Encryption) -> Self {
        Self {
            value: encryption.value().to_string(),
            label: encryption.label().to_string(),
        }
    }
}

fn default_encryption() -> String {
    Encryption::default().value().to_string()
}

/// Generation form values, also the request body of `/api/generate`
///
/// Missing fields deserialize to their defaults and are reported by validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(default)]
pub struct GenerateRequest {
    #[validate(min_length = 1, message = "Wifi network name is required")]
    pub wifi_name: String,
    #[validate(min_length = 1, message = "Wifi password is required")]
    pub wifi_password: String,
    #[validate(min_length = 3, message = "Prompt must contain at least 3 characters")]
    #[validate(max_length = 160, message = "Prompt must contain at most 160 characters")]
    pub prompt: String,
    #[validate(
        enumerate = ["WPA", "WEP", "none"],
        message = "Encryption must be one of WPA, WEP or none"
    )]
    pub encryption: String,
}

impl Default for GenerateRequest {
    fn default() -> Self {
        Self {
            wifi_name: String::new(),
            wifi_password: String::new(),
            prompt: String::new(),
            encryption: default_encryption(),
        }
    }
}

impl GenerateRequest {
    /// Validate all fields, returning the first message per failing field
    pub fn field_errors(&self) -> HashMap<String, String> {
        match self.validate() {
            Ok(()) => HashMap::new(),
            Err(errors) => collect_field_errors(&errors),
        }
    }

    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::WifiName => self.wifi_name = value,
            FormField::WifiPassword => self.wifi_password = value,
            FormField::Prompt => self.prompt = value,
            FormField::Encryption => self.encryption = value,
        }
    }
}

/// Editable fields of the generation form
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FormField {
    WifiName,
    WifiPassword,
    Prompt,
    Encryption,
}

impl FormField {
    /// Key used for the field in request bodies and error maps
    pub fn key(&self) -> &'static str {
        match self {
            FormField::WifiName => "wifi_name",
            FormField::WifiPassword => "wifi_password",
            FormField::Prompt => "prompt",
            FormField::Encryption => "encryption",
        }
    }
}

// serde_valid serializes errors as {"errors": [..], "properties": {"<field>": {"errors": [..]}}}
fn collect_field_errors(errors: &serde_valid::validation::Errors) -> HashMap<String, String> {
    let Ok(value) = serde_json::to_value(errors) else {
        return HashMap::new();
    };

    value
        .get("properties")
        .and_then(|properties| properties.as_object())
        .map(|properties| {
            properties
                .iter()
                .filter_map(|(field, field_errors)| {
                    let message = field_errors.get("errors")?.as_array()?.first()?.as_str()?;
                    Some((field.clone(), message.to_string()))
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> GenerateRequest {
        GenerateRequest {
            wifi_name: "infinity_5g".to_string(),
            wifi_password: "hunter22".to_string(),
            prompt: "italian mountains".to_string(),
            encryption: "WPA".to_string(),
        }
    }

    #[test]
    fn valid_request_has_no_errors() {
        assert!(valid_request().field_errors().is_empty());
    }

    #[test]
    fn all_encryption_values_are_accepted() {
        for encryption in Encryption::ALL {
            let request = GenerateRequest {
                encryption: encryption.value().to_string(),
                ..valid_request()
            };
            assert!(request.field_errors().is_empty(), "{encryption:?}");
        }
    }

    #[test]
    fn empty_credentials_are_rejected() {
        let request = GenerateRequest {
            wifi_name: String::new(),
            wifi_password: String::new(),
            ..valid_request()
        };

        let errors = request.field_errors();
        assert_eq!(
            errors.get("wifi_name").map(String::as_str),
            Some("Wifi network name is required")
        );
        assert_eq!(
            errors.get("wifi_password").map(String::as_str),
            Some("Wifi password is required")
        );
        assert!(!errors.contains_key("prompt"));
    }

    #[test]
    fn prompt_length_bounds() {
        let with_prompt = |prompt: String| GenerateRequest {
            prompt,
            ..valid_request()
        };

        assert!(with_prompt("ab".to_string()).field_errors().contains_key("prompt"));
        assert!(with_prompt("abc".to_string()).field_errors().is_empty());
        assert!(with_prompt("a".repeat(160)).field_errors().is_empty());
        assert!(with_prompt("a".repeat(161)).field_errors().contains_key("prompt"));
    }

    #[test]
    fn unknown_encryption_is_rejected() {
        let request = GenerateRequest {
            encryption: "WPA3".to_string(),
            ..valid_request()
        };

        assert!(request.field_errors().contains_key("encryption"));
    }

    #[test]
    fn encryption_defaults_to_wpa() {
        let request: GenerateRequest =
            serde_json::from_str(r#"{"wifi_name":"a","wifi_password":"b","prompt":"abc"}"#)
                .unwrap();

        assert_eq!(request.encryption, "WPA");
        assert_eq!(GenerateRequest::default().encryption, "WPA");
    }

    #[test]
    fn field_keys_match_request_body() {
        let json = serde_json::to_value(valid_request()).unwrap();
        for field in [
            FormField::WifiName,
            FormField::WifiPassword,
            FormField::Prompt,
            FormField::Encryption,
        ] {
            assert!(json.get(field.key()).is_some());
        }
    }
}
