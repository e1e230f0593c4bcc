/// Popup settings stored in chrome.storage.sync

use crate::error::AnalyzerError;
use serde::{Deserialize, Serialize};

pub const API_URL_KEY: &str = "apiUrl";
pub const THEME_KEY: &str = "theme";
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Value for the body's `data-theme` attribute
    pub fn body_attribute(self) -> &'static str {
        match self {
            Theme::Light => "",
            Theme::Dark => "dark",
        }
    }

    /// The toggle shows the theme it switches to
    pub fn toggle_icon(self) -> &'static str {
        match self {
            Theme::Light => "🌙",
            Theme::Dark => "☀️",
        }
    }
}

/// Raw storage record, as returned by `chrome.storage.sync.get`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "apiUrl", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_theme", skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

/// A stored value of the wrong type reads as unset
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    }))
}

/// Unrecognised theme values, of any type, fall back to light
fn lenient_theme<'de, D>(deserializer: D) -> Result<Option<Theme>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(raw.map(|value| match value.as_str() {
        Some("dark") => Theme::Dark,
        _ => Theme::Light,
    }))
}

impl Settings {
    /// Configured API URL, or the default when unset or blank
    pub fn api_url(&self) -> &str {
        self.api_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_URL)
    }

    pub fn theme(&self) -> Theme {
        self.theme.unwrap_or_default()
    }
}

/// Check user input for the API URL and return the value to store
pub fn validate_api_url(input: &str) -> Result<String, AnalyzerError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AnalyzerError::InvalidApiUrl("Please enter a valid URL".to_string()));
    }

    let parsed = url::Url::parse(trimmed)
        .map_err(|e| AnalyzerError::InvalidApiUrl(format!("Invalid URL '{}': {}", trimmed, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        scheme => Err(AnalyzerError::InvalidApiUrl(format!(
            "Unsupported URL scheme '{}', use http or https",
            scheme
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();

        assert_eq!(settings.api_url(), "http://localhost:8000");
        assert_eq!(settings.theme(), Theme::Light);
    }

    #[test]
    fn test_settings_deserialize() {
        let settings: Settings =
            serde_json::from_str(r#"{"apiUrl": "https://api.example.com", "theme": "dark"}"#).unwrap();

        assert_eq!(settings.api_url(), "https://api.example.com");
        assert_eq!(settings.theme(), Theme::Dark);
    }

    #[test]
    fn test_settings_unknown_theme() {
        let settings: Settings = serde_json::from_str(r#"{"theme": "solarized"}"#).unwrap();
        assert_eq!(settings.theme(), Theme::Light);
    }

    #[test]
    fn test_settings_wrong_value_types() {
        let settings: Settings = serde_json::from_str(r#"{"apiUrl": 42, "theme": 1}"#).unwrap();

        assert_eq!(settings.api_url(), DEFAULT_API_URL);
        assert_eq!(settings.theme(), Theme::Light);

        let settings: Settings =
            serde_json::from_str(r#"{"apiUrl": null, "theme": {"mode": "dark"}}"#).unwrap();
        assert_eq!(settings.api_url(), DEFAULT_API_URL);
        assert_eq!(settings.theme(), Theme::Light);
    }

    #[test]
    fn test_blank_api_url_uses_default() {
        let settings = Settings {
            api_url: Some("   ".to_string()),
            theme: None,
        };
        assert_eq!(settings.api_url(), DEFAULT_API_URL);
    }

    #[test]
    fn test_settings_serialize_keys() {
        let settings = Settings {
            api_url: Some("http://x:1".to_string()),
            theme: Some(Theme::Dark),
        };
        assert_eq!(
            serde_json::to_string(&settings).unwrap(),
            r#"{"apiUrl":"http://x:1","theme":"dark"}"#
        );
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Dark.toggle_icon(), "☀️");
        assert_eq!(Theme::Light.toggle_icon(), "🌙");
        assert_eq!(Theme::Dark.body_attribute(), "dark");
    }

    #[test]
    fn test_validate_api_url() {
        assert_eq!(
            validate_api_url("  http://localhost:8000  "),
            Ok("http://localhost:8000".to_string())
        );
        assert!(validate_api_url("https://sentiment.example.org/api").is_ok());
    }

    #[test]
    fn test_validate_api_url_rejects() {
        assert_eq!(
            validate_api_url("   "),
            Err(AnalyzerError::InvalidApiUrl("Please enter a valid URL".to_string()))
        );
        assert!(validate_api_url("not a url").is_err());
        assert!(validate_api_url("ftp://files.example.com").is_err());
    }
}
