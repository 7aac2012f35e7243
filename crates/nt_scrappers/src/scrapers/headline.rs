//! Headline heuristic chain.
//!
//! In priority order, the first non-empty candidate wins:
//! 1. the first `<h1>`
//! 2. `<meta property="og:title" content="...">`
//! 3. `<title>`
//! 4. a title derived from the URL path

use scraper::Html;
use url::Url;

use super::utils;

/// Recover a displayable headline. `document` is `None` when the fetch failed.
pub fn extract_headline(url: &str, document: Option<&Html>) -> String {
    document
        .and_then(headline_from_document)
        .unwrap_or_else(|| title_from_url(url))
}

pub fn headline_from_document(document: &Html) -> Option<String> {
    first_heading(document)
        .or_else(|| open_graph_title(document))
        .or_else(|| document_title(document))
}

fn first_heading(document: &Html) -> Option<String> {
    utils::first_text(document, "h1")
}

fn open_graph_title(document: &Html) -> Option<String> {
    utils::first_attr(document, r#"meta[property="og:title"]"#, "content")
}

fn document_title(document: &Html) -> Option<String> {
    utils::first_text(document, "title")
}

/// `https://example.com/world/rate-cut%20news` becomes `World Rate Cut News`.
///
/// Falls back to the host and then to the raw input so the result is only
/// empty when `url` itself is.
pub fn title_from_url(url: &str) -> String {
    let parsed = Url::parse(url).ok();
    let path = match &parsed {
        Some(parsed) => parsed.path().to_string(),
        None => raw_path(url).to_string(),
    };

    let decoded = urlencoding::decode_binary(path.as_bytes());
    let decoded = String::from_utf8_lossy(&decoded);
    let joined = decoded
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.replace('-', " "))
        .collect::<Vec<_>>()
        .join(" ");

    let title = title_case(&joined);
    if !title.trim().is_empty() {
        return title;
    }

    parsed
        .as_ref()
        .and_then(|parsed| parsed.host_str())
        .map(str::to_string)
        .unwrap_or_else(|| url.trim().to_string())
}

/// Path portion of something that did not parse as an absolute URL.
fn raw_path(url: &str) -> &str {
    url.split(|c: char| c == '?' || c == '#').next().unwrap_or_default()
}

/// Upper-case a letter that follows a non-letter, lower-case every other letter.
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            result.push(c);
            previous_is_letter = false;
        }
    }
    result
}
