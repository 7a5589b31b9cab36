//! Locating and stripping embedded sub-resources.
//!
//! An embed is a `details` element (never the document root) whose direct
//! `summary` child holds an anchor with an `href`. The anchor's resolved href
//! is the embed's own URI. A `details` pointing back at the document's own
//! URI is not an embed; that is how a parsed embed recognises its own root.
//!
//! Only outermost embeds are reported for a document. Embeds nested inside
//! another embed belong to that embed and surface when it is parsed.

use std::collections::HashSet;

use scraper::{ElementRef, Html};

use crate::document::{self, caption_of, child_elements, rel_of, selector};
use crate::uri;

/// One embedded sub-resource found in a document.
#[derive(Debug, Clone)]
pub struct Embed<'a> {
    /// Resolved href of the summary anchor.
    pub uri: String,
    /// Relation of the summary anchor, if any.
    pub rel: Option<String>,
    /// Caption of the summary anchor, if any.
    pub title: Option<String>,
    /// The `details` element carrying the embed.
    pub element: ElementRef<'a>,
}

/// The identity anchor of an embed-shaped `details`, ignoring the self guard.
pub fn embed_anchor<'a>(el: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    if el.value().name() != "details" {
        return None;
    }
    // The document root can never be an embed.
    el.parent().and_then(ElementRef::wrap)?;

    let summary = child_elements(el, "summary").next()?;
    let anchor_sel = selector("a[href]");
    let anchor = summary.select(&anchor_sel).next();
    anchor
}

/// The embed URI of `el`, when it is an embed relative to `self_uri`.
fn embed_uri(el: &ElementRef<'_>, self_uri: &str) -> Option<String> {
    let anchor = embed_anchor(el)?;
    let href = anchor.value().attr("href")?.trim();
    let resolved = uri::resolve(href, self_uri);
    if resolved == self_uri {
        tracing::debug!(uri = %self_uri, "ignoring self-referencing embed");
        return None;
    }
    Some(resolved)
}

/// Whether some ancestor of `el` is itself an embed relative to `self_uri`.
fn inside_embed(el: &ElementRef<'_>, self_uri: &str) -> bool {
    let mut current = el.parent();
    while let Some(node) = current {
        if let Some(ancestor) = ElementRef::wrap(node) {
            if embed_uri(&ancestor, self_uri).is_some() {
                return true;
            }
        }
        current = node.parent();
    }
    false
}

/// Find the outermost embeds of `document`, in document order.
///
/// Embeds pointing at `self_uri` are skipped, and a URI already seen earlier
/// in the document is not reported twice.
pub fn locate_embeds<'a>(document: &'a Html, self_uri: &str) -> Vec<Embed<'a>> {
    let details_sel = selector("details");
    let mut seen = HashSet::new();
    let mut embeds = Vec::new();

    for el in document.select(&details_sel) {
        let Some(uri) = embed_uri(&el, self_uri) else {
            continue;
        };
        if inside_embed(&el, self_uri) || !seen.insert(uri.clone()) {
            continue;
        }
        let (rel, title) = match embed_anchor(&el) {
            Some(anchor) => (rel_of(&anchor), caption_of(&anchor)),
            None => (None, None),
        };
        embeds.push(Embed {
            uri,
            rel,
            title,
            element: el,
        });
    }

    embeds
}

/// A copy of `document` with every embed subtree removed.
///
/// The original is left untouched so link and embed extraction can still
/// run over it.
pub fn strip_embeds(document: &Html, self_uri: &str) -> Html {
    let mut copy = document.clone();
    let details_sel = selector("details");

    let doomed: Vec<_> = copy
        .select(&details_sel)
        .filter(|el| embed_uri(el, self_uri).is_some())
        .map(|el| el.id())
        .collect();

    for id in doomed {
        if let Some(mut node) = copy.tree.get_mut(id) {
            node.detach();
        }
    }

    copy
}

/// Whether `anchor` is the identity anchor in the summary of an
/// embed-shaped `details`, self-referencing ones included.
pub fn is_summary_anchor(anchor: &ElementRef<'_>) -> bool {
    let mut current = anchor.parent();
    while let Some(node) = current {
        if let Some(el) = ElementRef::wrap(node) {
            if el.value().name() == "summary" {
                return el
                    .parent()
                    .and_then(ElementRef::wrap)
                    .and_then(|details| embed_anchor(&details))
                    .is_some_and(|owner| owner.id() == anchor.id());
            }
        }
        current = node.parent();
    }
    false
}

/// Serialize an embed subtree and parse it as a standalone fragment.
pub fn embed_document(element: &ElementRef<'_>) -> Html {
    document::parse_fragment(&element.html())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_markup;

    const SELF: &str = "http://api.example/articles";

    const PAGE: &str = r#"
    <html><body>
        <dl><dt>count</dt><dd>2</dd></dl>
        <details>
            <summary><a rel="item" href="/articles/1">First</a></summary>
            <dl><dt>headline</dt><dd>Hello</dd></dl>
            <details>
                <summary><a rel="author" href="/people/7">Jane</a></summary>
                <dl><dt>name</dt><dd>Jane</dd></dl>
            </details>
        </details>
        <details>
            <summary><a rel="self" href="/articles">All articles</a></summary>
            <p>not an embed</p>
        </details>
        <details><summary>No anchor</summary></details>
    </body></html>
    "#;

    #[test]
    fn test_locate_outermost_embeds() {
        let doc = parse_markup(PAGE);
        let embeds = locate_embeds(&doc, SELF);

        assert_eq!(embeds.len(), 1);
        assert_eq!(embeds[0].uri, "http://api.example/articles/1");
        assert_eq!(embeds[0].rel.as_deref(), Some("item"));
        assert_eq!(embeds[0].title.as_deref(), Some("First"));
    }

    #[test]
    fn test_self_embed_guard() {
        let doc = parse_markup(PAGE);
        let uris: Vec<_> = locate_embeds(&doc, SELF)
            .into_iter()
            .map(|e| e.uri)
            .collect();
        assert!(!uris.contains(&SELF.to_string()));
    }

    #[test]
    fn test_strip_copies_and_removes() {
        let doc = parse_markup(PAGE);
        let stripped = strip_embeds(&doc, SELF);
        let dt = selector("dt");

        assert_eq!(doc.select(&dt).count(), 3);
        let remaining: Vec<_> = stripped.select(&dt).map(|t| t.inner_html()).collect();
        assert_eq!(remaining, vec!["count"]);
        // The self-referencing block stays in place.
        assert_eq!(stripped.select(&selector("details")).count(), 2);
    }

    #[test]
    fn test_nested_embed_found_from_its_container() {
        let doc = parse_markup(PAGE);
        let outer = locate_embeds(&doc, SELF).remove(0);
        let fragment = embed_document(&outer.element);

        let inner = locate_embeds(&fragment, &outer.uri);
        assert_eq!(inner.len(), 1);
        assert_eq!(inner[0].uri, "http://api.example/people/7");
        assert_eq!(inner[0].rel.as_deref(), Some("author"));
    }

    #[test]
    fn test_summary_anchor_detection() {
        let doc = parse_markup(PAGE);
        let anchors: Vec<_> = doc.select(&selector("a")).collect();

        let flags: Vec<_> = anchors.iter().map(is_summary_anchor).collect();
        assert_eq!(flags, vec![true, true, true]);

        let plain = parse_markup(r#"<p><a rel="next" href="/p2">next</a></p>"#);
        let a = plain.select(&selector("a")).next().unwrap();
        assert!(!is_summary_anchor(&a));
    }
}
