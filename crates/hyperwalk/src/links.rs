//! Discovering relation edges in a document.

use std::collections::BTreeMap;

use scraper::Html;

use crate::client::Client;
use crate::document::{caption_of, has_rel, rel_of, selector};
use crate::embed::{is_summary_anchor, locate_embeds, strip_embeds};
use crate::error::HypermediaResult;
use crate::resource::{Resource, ResourceList};
use crate::uri;

/// Collect the relation edges of `document`, keyed by relation.
///
/// Embeds are parsed on the spot into resolved resources and come first in
/// their relation's list; relation-tagged anchors outside any embed follow
/// as stubs, in document order. `rel="self"` anchors and embed summary
/// anchors are not edges. Creating stubs does no I/O.
pub fn extract_links(
    client: &Client,
    base_uri: &str,
    document: &Html,
) -> HypermediaResult<BTreeMap<String, ResourceList>> {
    extract_links_with(client, base_uri, document, &strip_embeds(document, base_uri))
}

/// [`extract_links`] with the embed-free copy of `document` supplied by the
/// caller.
pub(crate) fn extract_links_with(
    client: &Client,
    base_uri: &str,
    document: &Html,
    own: &Html,
) -> HypermediaResult<BTreeMap<String, ResourceList>> {
    let mut links: BTreeMap<String, ResourceList> = BTreeMap::new();

    for embed in locate_embeds(document, base_uri) {
        let resource = Resource::from_embed(
            client,
            &embed.element,
            &embed.uri,
            embed.rel.as_deref(),
            embed.title.as_deref(),
        )?;
        match embed.rel.filter(|rel| rel != "self") {
            Some(rel) => links.entry(rel).or_default().push(resource),
            None => tracing::debug!(uri = %embed.uri, "embed without relation, not linked"),
        }
    }

    let anchor_sel = selector("a[rel][href]");
    for anchor in own.select(&anchor_sel) {
        let Some(rel) = rel_of(&anchor) else {
            continue;
        };
        if has_rel(&anchor, "self") || is_summary_anchor(&anchor) {
            continue;
        }
        let href = anchor.value().attr("href").unwrap_or("").trim();
        let target = uri::resolve(href, base_uri);
        let title = caption_of(&anchor);
        let stub = Resource::link(client, &target, Some(rel.as_str()), title.as_deref());
        links.entry(rel).or_default().push(stub);
    }

    Ok(links)
}
