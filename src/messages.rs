/// Message contract between the popup and the content script
use crate::comment::Comment;
use crate::error::AnalyzerError;
use serde::{Deserialize, Serialize};

/// Request sent from the popup to the content script of a tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum ContentRequest {
    #[serde(rename = "ping")]
    Ping,
    #[serde(rename = "extractComments")]
    ExtractComments,
    #[serde(other)]
    Unknown,
}

/// Reply from the content script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ContentResponse {
    pub fn pong() -> ContentResponse {
        ContentResponse {
            success: true,
            comments: None,
            count: None,
            error: None,
        }
    }

    pub fn comments(comments: Vec<Comment>) -> ContentResponse {
        ContentResponse {
            success: true,
            count: Some(comments.len()),
            comments: Some(comments),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> ContentResponse {
        ContentResponse {
            success: false,
            comments: None,
            count: None,
            error: Some(message.into()),
        }
    }

    /// Comments carried by a successful, non-empty reply
    pub fn into_comments(self) -> Result<Vec<Comment>, AnalyzerError> {
        match self.comments {
            Some(comments) if self.success && !comments.is_empty() => Ok(comments),
            _ => Err(AnalyzerError::NoComments),
        }
    }
}

/// Answer a request, running `extract` only when comments were asked for
pub fn respond<F>(request: &ContentRequest, extract: F) -> ContentResponse
where
    F: FnOnce() -> Vec<Comment>,
{
    match request {
        ContentRequest::Ping => ContentResponse::pong(),
        ContentRequest::ExtractComments => ContentResponse::comments(extract()),
        ContentRequest::Unknown => ContentResponse::failure("unknown action"),
    }
}
