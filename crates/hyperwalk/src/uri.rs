//! Relative→absolute URI joining and query appending.

use url::Url;

use crate::error::{HypermediaError, HypermediaResult};

/// Resolve `href` against `base`.
///
/// An href that already carries a scheme separator is returned unchanged.
/// Anything that cannot be joined is also returned unchanged, so this never
/// fails.
pub fn resolve(href: &str, base: &str) -> String {
    if href.contains("://") {
        return href.to_string();
    }
    if let Ok(base) = Url::parse(base) {
        if let Ok(resolved) = base.join(href) {
            return resolved.to_string();
        }
    }
    href.to_string()
}

/// Append url-encoded `pairs` after the existing query of `uri`.
pub fn append_query<K, V>(uri: &str, pairs: &[(K, V)]) -> HypermediaResult<String>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut url = Url::parse(uri).map_err(|source| HypermediaError::InvalidUri {
        uri: uri.to_string(),
        source,
    })?;
    if !pairs.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(pairs.iter().map(|(k, v)| (k.as_ref(), v.as_ref())));
    }
    Ok(url.to_string())
}

/// Url-encode `pairs` as a form body.
pub fn encode_form<K, V>(pairs: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(k, v)| (k.as_ref(), v.as_ref())))
        .finish()
}
