//! Thin helpers over `scraper` for parsing documents and reading elements.

use scraper::{ElementRef, Html, Selector};

use crate::uri;

/// Parse raw response bytes into a document. Invalid UTF-8 is replaced.
pub fn parse(bytes: &[u8]) -> Html {
    Html::parse_document(&String::from_utf8_lossy(bytes))
}

/// Parse an in-memory markup string into a document.
pub fn parse_markup(markup: &str) -> Html {
    Html::parse_document(markup)
}

/// Parse a serialized subtree (an embed) into a standalone fragment.
pub fn parse_fragment(markup: &str) -> Html {
    Html::parse_fragment(markup)
}

/// Compile one of the crate's static selectors.
pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// The identity URI a document declares for itself, resolved against `base`.
///
/// Only links in the document head count; `<link rel="self">` takes
/// precedence over `<link rel="canonical">`.
pub fn canonical_uri(document: &Html, base: &str) -> Option<String> {
    let link_sel = selector("head link[rel][href]");
    let mut canonical = None;

    for link in document.select(&link_sel) {
        let Some(href) = link.value().attr("href").map(str::trim) else {
            continue;
        };
        if href.is_empty() {
            continue;
        }
        if has_rel(&link, "self") {
            return Some(uri::resolve(href, base));
        }
        if canonical.is_none() && has_rel(&link, "canonical") {
            canonical = Some(uri::resolve(href, base));
        }
    }

    canonical
}

/// Whether the element's `rel` attribute lists `token` (case-insensitive).
pub(crate) fn has_rel(el: &ElementRef<'_>, token: &str) -> bool {
    el.value()
        .attr("rel")
        .map(|rel| rel.split_whitespace().any(|t| t.eq_ignore_ascii_case(token)))
        .unwrap_or(false)
}

/// The `rel` attribute, trimmed; `None` when missing or blank.
pub(crate) fn rel_of(el: &ElementRef<'_>) -> Option<String> {
    el.value()
        .attr("rel")
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(String::from)
}

/// All descendant text, trimmed.
pub(crate) fn text_of(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Descendant text with whitespace runs collapsed; `None` when empty.
pub(crate) fn caption_of(el: &ElementRef<'_>) -> Option<String> {
    let caption = el
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if caption.is_empty() {
        None
    } else {
        Some(caption)
    }
}

/// Direct element children of `el` with the given tag name.
pub(crate) fn child_elements<'a>(
    el: &ElementRef<'a>,
    name: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    el.children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| child.value().name() == name)
}

/// Whether `el` contains any element children.
pub(crate) fn has_child_elements(el: &ElementRef<'_>) -> bool {
    el.children().any(|child| child.value().is_element())
}
