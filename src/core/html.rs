// src/core/html.rs

use scraper::{ElementRef, Selector};

use super::sanitize::normalize_ws;
use crate::error::FetchError;

/// Compile a CSS selector, surfacing bad selectors as parse errors.
pub fn selector(css: &str) -> Result<Selector, FetchError> {
    Selector::parse(css).map_err(|e| FetchError::Parse(format!("bad selector `{css}`: {e:?}")))
}

/// All text under `el`, whitespace-normalized.
pub fn text_of(el: ElementRef<'_>) -> String {
    let raw: String = el.text().collect::<Vec<_>>().join(" ");
    normalize_ws(&raw)
}
