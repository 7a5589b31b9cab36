//! Decoding typed properties from definition lists.
//!
//! Every `dt` names a property; the `dd` elements directly following it are
//! its values. A `data-type` attribute on the `dt` selects the decoding:
//!
//! | `data-type` | value |
//! |-------------|-------|
//! | `boolean`   | `true` when the text equals "true", ignoring case |
//! | `number`    | text parsed as `f64` |
//! | `null`      | always null |
//! | `string`    | text; must not contain child elements |
//! | `link`      | first inner anchor |
//! | `timestamp` | `datetime` of the first inner `time`, as a calendar date |
//!
//! Untyped terms are inferred from structure: a list becomes a
//! [`DecodedValue::List`] of its items, then an anchor, then a `time`, then
//! plain text. A value that cannot be decoded is reported with
//! `tracing::warn!` and skipped, so one bad entry never stops the rest.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use scraper::{ElementRef, Html};

use crate::document::{caption_of, child_elements, has_child_elements, rel_of, selector, text_of};
use crate::embed::strip_embeds;
use crate::uri;
use crate::value::{DecodedValue, Link, Properties};

/// Decode every property of `document` that is not inside an embed.
pub fn decode_properties(document: &Html, self_uri: &str) -> Properties {
    decode_own_properties(&strip_embeds(document, self_uri), self_uri)
}

/// Decode every property of `own`, a document whose embeds are already
/// stripped.
pub(crate) fn decode_own_properties(own: &Html, self_uri: &str) -> Properties {
    let term_sel = selector("dt");
    let mut properties = Properties::new();

    for term in own.select(&term_sel) {
        let name = text_of(&term);
        if name.is_empty() {
            continue;
        }
        let data_type = term.value().attr("data-type").map(str::trim);

        let values: Vec<DecodedValue> = definitions(&term)
            .into_iter()
            .filter_map(|dd| match data_type {
                Some(kind) => decode_typed(kind, &dd, &name, self_uri),
                None => Some(infer(&dd, self_uri)),
            })
            .collect();

        properties.insert(name, values);
    }

    properties
}

/// The run of `dd` siblings directly following `term`.
fn definitions<'a>(term: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    let mut found = Vec::new();
    let mut next = term.next_sibling();
    while let Some(node) = next {
        if let Some(el) = ElementRef::wrap(node) {
            if el.value().name() != "dd" {
                break;
            }
            found.push(el);
        }
        next = node.next_sibling();
    }
    found
}

fn decode_typed(kind: &str, dd: &ElementRef<'_>, name: &str, self_uri: &str) -> Option<DecodedValue> {
    match kind.to_ascii_lowercase().as_str() {
        "boolean" => Some(DecodedValue::Boolean(
            text_of(dd).eq_ignore_ascii_case("true"),
        )),
        "number" => {
            let text = text_of(dd);
            match text.parse::<f64>() {
                Ok(n) => Some(DecodedValue::Number(n)),
                Err(_) => {
                    tracing::warn!(uri = %self_uri, property = %name, value = %text, "not a number, value skipped");
                    None
                }
            }
        }
        "null" => Some(DecodedValue::Null),
        "string" => {
            if has_child_elements(dd) {
                tracing::warn!(uri = %self_uri, property = %name, "string property contains markup, using empty string");
                Some(DecodedValue::String(String::new()))
            } else {
                Some(DecodedValue::String(text_of(dd)))
            }
        }
        "link" => {
            let value = first_link(dd, self_uri);
            if value.is_none() {
                tracing::warn!(uri = %self_uri, property = %name, "link property has no anchor, value skipped");
            }
            value
        }
        "timestamp" => {
            let value = first_time(dd);
            if value.is_none() {
                tracing::warn!(uri = %self_uri, property = %name, "timestamp property has no readable datetime, value skipped");
            }
            value
        }
        other => {
            tracing::warn!(uri = %self_uri, property = %name, data_type = %other, "unknown data-type, value skipped");
            None
        }
    }
}

/// Structural inference for untyped definitions. Recurses into list items.
fn infer(el: &ElementRef<'_>, self_uri: &str) -> DecodedValue {
    let list_sel = selector("ul, ol");
    let list = el.select(&list_sel).next();
    if let Some(list) = list {
        let items = child_elements(&list, "li")
            .map(|item| infer(&item, self_uri))
            .collect();
        return DecodedValue::List(items);
    }
    if let Some(link) = first_link(el, self_uri) {
        return link;
    }
    if let Some(timestamp) = first_time(el) {
        return timestamp;
    }
    DecodedValue::String(text_of(el))
}

fn first_link(el: &ElementRef<'_>, self_uri: &str) -> Option<DecodedValue> {
    let anchor_sel = selector("a");
    let anchor = el.select(&anchor_sel).next()?;
    let href = anchor.value().attr("href").unwrap_or("").trim();
    Some(DecodedValue::Link(Link {
        uri: uri::resolve(href, self_uri),
        caption: caption_of(&anchor),
        rel: rel_of(&anchor),
    }))
}

fn first_time(el: &ElementRef<'_>) -> Option<DecodedValue> {
    let time_sel = selector("time");
    let time = el.select(&time_sel).next()?;
    let raw = time
        .value()
        .attr("datetime")
        .map(str::to_string)
        .unwrap_or_else(|| text_of(&time));
    parse_date(raw.trim()).map(DecodedValue::Timestamp)
}

/// Calendar date of a machine-readable datetime.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_markup;

    const SELF: &str = "http://api.example/people/1";

    fn decode(body: &str) -> Properties {
        decode_properties(&parse_markup(&format!("<html><body>{body}</body></html>")), SELF)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_typed_values() {
        let props = decode(
            r#"<dl>
                <dt data-type="number">score</dt><dd>3.5</dd>
                <dt data-type="boolean">active</dt><dd>True</dd>
                <dt data-type="boolean">banned</dt><dd>no</dd>
                <dt data-type="timestamp">born</dt><dd><time datetime="2024-01-02">Jan 2</time></dd>
                <dt data-type="null">spouse</dt><dd>whatever</dd>
                <dt data-type="string">nick</dt><dd> jd </dd>
            </dl>"#,
        );

        assert_eq!(props.first("score"), Some(&DecodedValue::Number(3.5)));
        assert_eq!(props.first("active"), Some(&DecodedValue::Boolean(true)));
        assert_eq!(props.first("banned"), Some(&DecodedValue::Boolean(false)));
        assert_eq!(props.first("born"), Some(&DecodedValue::Timestamp(date(2024, 1, 2))));
        assert_eq!(props.first("spouse"), Some(&DecodedValue::Null));
        assert_eq!(props.first("nick"), Some(&DecodedValue::String("jd".into())));
    }

    #[test]
    fn test_typed_link_resolved() {
        let props = decode(
            r#"<dl><dt data-type="link">homepage</dt>
               <dd><a rel="home" href="/~jane">Jane's page</a></dd></dl>"#,
        );
        assert_eq!(
            props.first("homepage"),
            Some(&DecodedValue::Link(Link {
                uri: "http://api.example/~jane".into(),
                caption: Some("Jane's page".into()),
                rel: Some("home".into()),
            }))
        );
    }

    #[test]
    fn test_multi_valued_in_order() {
        let props = decode(
            r#"<dl>
                <dt data-type="number">sizes</dt><dd>1</dd>
                <dd>2</dd>
                <dt>next</dt><dd>x</dd>
            </dl>"#,
        );
        assert_eq!(
            props.get("sizes").unwrap(),
            &[DecodedValue::Number(1.0), DecodedValue::Number(2.0)]
        );
        assert_eq!(props.get("next").unwrap().len(), 1);
    }

    #[test]
    fn test_diagnostics_do_not_abort() {
        let props = decode(
            r#"<dl>
                <dt data-type="colour">fav</dt><dd>red</dd>
                <dt data-type="string">bio</dt><dd><b>bold</b></dd>
                <dt data-type="number">age</dt><dd>old</dd>
                <dt data-type="timestamp">seen</dt><dd>yesterday</dd>
                <dt data-type="number">ok</dt><dd>7</dd>
            </dl>"#,
        );

        assert_eq!(props.get("fav"), Some(&[][..]));
        assert_eq!(props.first("bio"), Some(&DecodedValue::String(String::new())));
        assert!(props.get("age").unwrap().is_empty());
        assert!(props.get("seen").unwrap().is_empty());
        assert_eq!(props.first("ok"), Some(&DecodedValue::Number(7.0)));
    }

    #[test]
    fn test_structural_inference() {
        let props = decode(
            r#"<dl>
                <dt>tags</dt><dd><ul><li>a</li><li><a href="/t/b">b</a></li><li><ol><li>c</li></ol></li></ul></dd>
                <dt>friend</dt><dd><a href="/people/2">Bob</a></dd>
                <dt>joined</dt><dd><time datetime="2023-05-06T10:00:00Z">May</time></dd>
                <dt>city</dt><dd>  Berlin </dd>
            </dl>"#,
        );

        assert_eq!(
            props.first("tags"),
            Some(&DecodedValue::List(vec![
                DecodedValue::String("a".into()),
                DecodedValue::Link(Link {
                    uri: "http://api.example/t/b".into(),
                    caption: Some("b".into()),
                    rel: None,
                }),
                DecodedValue::List(vec![DecodedValue::String("c".into())]),
            ]))
        );
        assert_eq!(
            props.first("friend").and_then(|v| v.as_link()).map(|l| l.uri.as_str()),
            Some("http://api.example/people/2")
        );
        assert_eq!(props.first("joined"), Some(&DecodedValue::Timestamp(date(2023, 5, 6))));
        assert_eq!(props.first("city"), Some(&DecodedValue::String("Berlin".into())));
    }

    #[test]
    fn test_last_repeated_term_wins() {
        let props = decode(
            r#"<dl><dt>name</dt><dd>first</dd><dt>age</dt><dd>1</dd></dl>
               <dl><dt>name</dt><dd>second</dd><dd>third</dd></dl>"#,
        );
        assert_eq!(props.names().collect::<Vec<_>>(), vec!["name", "age"]);
        assert_eq!(
            props.get("name").unwrap(),
            &[DecodedValue::String("second".into()), DecodedValue::String("third".into())]
        );
    }

    #[test]
    fn test_embedded_properties_excluded() {
        let props = decode(
            r#"<dl><dt>title</dt><dd>Container</dd></dl>
               <details>
                 <summary><a rel="author" href="/people/2">Bob</a></summary>
                 <dl><dt>name</dt><dd>Bob</dd></dl>
               </details>"#,
        );
        assert!(props.contains("title"));
        assert!(!props.contains("name"));
    }

    #[test]
    fn test_parse_date_variants() {
        assert_eq!(parse_date("2024-01-02"), Some(date(2024, 1, 2)));
        assert_eq!(parse_date("2024-01-02T23:30:00+05:00"), Some(date(2024, 1, 2)));
        assert_eq!(parse_date("2024-01-02T08:15:00"), Some(date(2024, 1, 2)));
        assert_eq!(parse_date("soon"), None);
    }
}
