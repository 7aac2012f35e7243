use scraper::Html;

use super::utils;

/// Text of every `<p>` in document order, joined by a single space.
///
/// The result is not truncated; whatever the page contains is what the
/// summarizer receives.
pub fn extract_body_text(document: &Html) -> String {
    utils::extract_texts(document, "p").join(" ")
}
