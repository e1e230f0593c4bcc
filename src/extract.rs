/// Comment extraction from the YouTube watch page DOM (content script side)

use crate::comment::Comment;
use crate::error::AnalyzerError;
use crate::messages::{ContentRequest, ContentResponse, respond};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement};

pub const THREAD_SELECTOR: &str = "ytd-comment-thread-renderer";
pub const TEXT_SELECTOR: &str = "#content-text";
pub const AUTHOR_SELECTOR: &str = "#author-text";
pub const LIKES_SELECTOR: &str = "#vote-count-middle";

/// Extract every loaded comment thread from the document
///
/// Threads without text are skipped but still consume an index, so ids
/// stay tied to the thread's position on the page.
pub fn extract_comments(document: &Document) -> Vec<Comment> {
    let threads = match document.query_selector_all(THREAD_SELECTOR) {
        Ok(threads) => threads,
        Err(e) => {
            log::error!("Comment query failed: {}", AnalyzerError::bridge(e));
            return Vec::new();
        }
    };

    let comments: Vec<Comment> = (0..threads.length())
        .filter_map(|i| threads.item(i).map(|node| (i as usize, node)))
        .filter_map(|(index, node)| {
            let element = node.dyn_into::<Element>().ok()?;
            match extract_comment(index, &element) {
                Ok(comment) => comment,
                Err(e) => {
                    log::error!("Failed to extract comment {}: {}", index, e);
                    None
                }
            }
        })
        .collect();

    log::info!("Extracted {} comments from {} threads", comments.len(), threads.length());
    comments
}

fn extract_comment(index: usize, thread: &Element) -> Result<Option<Comment>, AnalyzerError> {
    let Some(text) = child_text(thread, TEXT_SELECTOR)? else {
        return Ok(None);
    };
    let author = child_text(thread, AUTHOR_SELECTOR)?;
    let likes = child_text(thread, LIKES_SELECTOR)?;

    Ok(Comment::from_parts(index, &text, author.as_deref(), likes.as_deref()))
}

/// Rendered text of the first matching child, if any
fn child_text(parent: &Element, selector: &str) -> Result<Option<String>, AnalyzerError> {
    let child = parent
        .query_selector(selector)
        .map_err(AnalyzerError::bridge)?;

    Ok(child.map(|element| match element.dyn_ref::<HtmlElement>() {
        Some(html) => html.inner_text(),
        None => element.text_content().unwrap_or_default(),
    }))
}

/// Entry point for the content-script message listener
#[wasm_bindgen]
pub fn handle_content_message(request: JsValue) -> Result<JsValue, JsValue> {
    let response = match serde_wasm_bindgen::from_value::<ContentRequest>(request) {
        Ok(request) => respond(&request, || {
            web_sys::window()
                .and_then(|window| window.document())
                .map(|document| extract_comments(&document))
                .unwrap_or_default()
        }),
        Err(e) => {
            log::warn!("Ignoring malformed message: {}", e);
            ContentResponse::failure("malformed message")
        }
    };

    serde_wasm_bindgen::to_value(&response).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Called once by content.js after the module is loaded
#[wasm_bindgen]
pub fn start_content_script() {
    log::info!("YouTube Sentiment Analyzer - content script loaded");
}
