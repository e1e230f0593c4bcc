/// Error type shared by the popup and the content script

use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalyzerError {
    #[error("Please open a YouTube video")]
    NotAWatchPage,

    #[error("The content script is not loaded. Refresh the video page and try again.")]
    ContentScriptUnavailable(String),

    #[error("No comments found. Scroll down to load more comments.")]
    NoComments,

    #[error("{0}")]
    InvalidApiUrl(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {status}{}", fmt_detail(.detail))]
    ApiStatus { status: u16, detail: Option<String> },

    #[error("Failed to decode {what}: {message}")]
    Decode { what: &'static str, message: String },

    #[error("Browser API failed: {0}")]
    Bridge(String),
}

fn fmt_detail(detail: &Option<String>) -> String {
    detail
        .as_ref()
        .map(|d| format!(" ({})", d))
        .unwrap_or_default()
}

impl AnalyzerError {
    pub fn decode(what: &'static str, err: impl std::fmt::Display) -> Self {
        AnalyzerError::Decode {
            what,
            message: err.to_string(),
        }
    }

    /// Wraps a rejected JS promise or thrown exception
    pub fn bridge(err: JsValue) -> Self {
        let message = err
            .as_string()
            .or_else(|| {
                js_sys::Reflect::get(&err, &JsValue::from_str("message"))
                    .ok()
                    .and_then(|m| m.as_string())
            })
            .unwrap_or_else(|| format!("{:?}", err));
        AnalyzerError::Bridge(message)
    }
}

impl From<reqwest::Error> for AnalyzerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AnalyzerError::decode("API response", err)
        } else {
            AnalyzerError::Network(err.to_string())
        }
    }
}
