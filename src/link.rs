//! Link resolution - turns link templates into absolute, query-annotated URLs.
//!
//! A [`Link`] is a template: an href plus path parameters and query
//! parameters that are folded into it during resolution. Resolution is a
//! fixed four-step pipeline:
//!
//! 1. Prefix relative hrefs with the base URL.
//! 2. Substitute `:name` path segments from `params`; unmatched segments
//!    stay literal.
//! 3. Merge `queries` into the href's query string, dropping empty-string
//!    values and re-encoding with stable sorted key order.
//! 4. Emit a bare href string, or a `{href, meta}` object when the link
//!    carries meta.
//!
//! Params run before queries so that appended query values are never
//! themselves templated.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// Relation key for the next page of results.
pub const NEXT_KEY: &str = "next";
/// Relation key for the previous page of results.
pub const PREV_KEY: &str = "prev";
/// Relation key for the resource or document itself.
pub const SELF_KEY: &str = "self";
/// Relation key for the first page of results.
pub const FIRST_KEY: &str = "first";
/// Relation key for the last page of results.
pub const LAST_KEY: &str = "last";
/// Relation key for a related resource collection.
pub const RELATED_KEY: &str = "related";

/// Meta information attached to a link, resource, or document.
pub type Meta = serde_json::Map<String, Value>;

/// Path parameters substituted into `:name` segments of an href.
pub type Params = BTreeMap<String, Value>;

/// Query parameters appended to an href.
pub type Queries = BTreeMap<String, Value>;

/// A link template.
///
/// `params` and `queries` exist only to drive resolution and are never
/// serialized; the wire form of a resolved link is [`LinkValue`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// The link's URL. Relative hrefs get the base URL prefixed during
    /// resolution.
    pub href: String,
    /// Non-standard meta information about the link. A link with meta
    /// resolves to the object form.
    #[serde(default, skip_serializing_if = "Meta::is_empty")]
    pub meta: Meta,
    /// Path parameters substituted into `:name` segments of `href`.
    #[serde(skip)]
    pub params: Params,
    /// Query parameters merged into `href`.
    #[serde(skip)]
    pub queries: Queries,
}

impl Link {
    /// Creates a link with only an href.
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            ..Self::default()
        }
    }
}

/// Named link templates, keyed by relation.
pub type Links = BTreeMap<String, Link>;

/// A resolved link: a bare href, or an `{href, meta}` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkValue {
    /// Bare href form, used whenever the link has no meta.
    Url(String),
    /// Object form, used when the link carries meta.
    Object {
        href: String,
        #[serde(default)]
        meta: Meta,
    },
}

impl LinkValue {
    /// The href regardless of shape.
    pub fn href(&self) -> &str {
        match self {
            LinkValue::Url(href) => href,
            LinkValue::Object { href, .. } => href,
        }
    }
}

/// Named resolved links, keyed by relation.
pub type LinkMap = BTreeMap<String, LinkValue>;

/// Resolves every link in the map against the base URL.
pub fn resolve_links(links: Links, base_url: &str) -> LinkMap {
    links
        .into_iter()
        .map(|(key, link)| (key, resolve_link(link, base_url)))
        .collect()
}

/// Resolves a single link template against the base URL.
///
/// Malformed hrefs degrade gracefully: if the href cannot be parsed as a
/// URL during query composition, the link passes through with its query
/// parameters unapplied rather than failing the document.
pub fn resolve_link(link: Link, base_url: &str) -> LinkValue {
    let link = prefix_base_url(link, base_url);
    let link = substitute_path_params(link);
    let link = merge_query_params(link);
    string_or_object(link)
}

/// True when `href` parses as a URL with both a scheme and a host.
pub fn is_absolute_url(href: &str) -> bool {
    Url::parse(href).map(|url| url.has_host()).unwrap_or(false)
}

/// True when `href` is a relative reference that a base URL can prefix.
pub fn is_relative_url(href: &str) -> bool {
    matches!(Url::parse(href), Err(url::ParseError::RelativeUrlWithoutBase))
}

fn prefix_base_url(mut link: Link, base_url: &str) -> Link {
    if is_relative_url(&link.href) {
        link.href = format!("{base_url}{}", link.href);
    }

    link
}

fn substitute_path_params(mut link: Link) -> Link {
    if link.params.is_empty() {
        return link;
    }

    let segments: Vec<String> = link
        .href
        .split('/')
        .map(|segment| {
            match segment
                .strip_prefix(':')
                .and_then(|name| link.params.get(name))
            {
                Some(value) => display_value(value),
                None => segment.to_string(),
            }
        })
        .collect();
    link.href = segments.join("/");

    link
}

fn merge_query_params(mut link: Link) -> Link {
    if link.queries.is_empty() {
        return link;
    }

    if !href_parses(&link.href) {
        return link;
    }

    let (href, fragment) = match link.href.split_once('#') {
        Some((href, fragment)) => (href.to_string(), Some(fragment.to_string())),
        None => (link.href.clone(), None),
    };
    let (path, existing) = match href.split_once('?') {
        Some((path, existing)) => (path.to_string(), existing.to_string()),
        None => (href, String::new()),
    };

    let mut pairs: Vec<(String, String)> = url::form_urlencoded::parse(existing.as_bytes())
        .into_owned()
        .collect();
    for (key, value) in &link.queries {
        if matches!(value, Value::String(text) if text.is_empty()) {
            continue;
        }
        pairs.retain(|(existing_key, _)| existing_key != key);
        pairs.push((key.clone(), display_value(value)));
    }
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    let mut href = path;
    if !pairs.is_empty() {
        href.push('?');
        href.push_str(&encode_query_pairs(&pairs));
    }
    if let Some(fragment) = fragment {
        href.push('#');
        href.push_str(&fragment);
    }
    link.href = href;

    link
}

fn string_or_object(link: Link) -> LinkValue {
    if link.meta.is_empty() {
        LinkValue::Url(link.href)
    } else {
        LinkValue::Object {
            href: link.href,
            meta: link.meta,
        }
    }
}

/// Checks that an href is parseable, trying a placeholder base for
/// relative references.
fn href_parses(href: &str) -> bool {
    match Url::parse(href) {
        Ok(_) => true,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse("http://relative.invalid")
            .map(|base| base.join(href).is_ok())
            .unwrap_or(false),
        Err(_) => false,
    }
}

/// Joins query pairs unescaped with stable `key=value&...` layout.
pub(crate) fn encode_query_pairs(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Renders a param or query value the way it appears in a URL: strings
/// bare, everything else as its JSON text.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
