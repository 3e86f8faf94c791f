//! The HTTP-boundary surface: base-URL derivation, self links, and query
//! accessors.
//!
//! The engine never touches a server framework. Adapters copy the pieces
//! it needs into [`RequestParts`]; everything here is a pure function of
//! that snapshot. Forwarded headers win over the raw request values so
//! links reflect the URL the client actually used, not the proxied one.

use crate::error::IncludeError;
use crate::link::{encode_query_pairs, Link, Links, SELF_KEY};
use crate::pagination::PageParam;

/// Header carrying the path prefix a proxy stripped before forwarding.
pub const FORWARDED_PREFIX: &str = "X-Forwarded-Prefix";
/// Header carrying the original protocol (`http` | `https`).
pub const FORWARDED_PROTO: &str = "X-Forwarded-Proto";
/// Header carrying the original host.
pub const FORWARDED_HOST: &str = "X-Forwarded-Host";

/// Query parameter naming the side-loads a client requests.
pub const INCLUDE_PARAM: &str = "include";

/// The request pieces the engine needs to build links.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParts {
    /// Scheme of the received request.
    pub scheme: String,
    /// Host of the received request.
    pub host: String,
    /// Path of the received request.
    pub path: String,
    /// Raw query string, without the leading `?`.
    pub query: String,
    /// Value of the `X-Forwarded-Proto` header, if present.
    pub forwarded_proto: Option<String>,
    /// Value of the `X-Forwarded-Host` header, if present.
    pub forwarded_host: Option<String>,
    /// Value of the `X-Forwarded-Prefix` header, if present.
    pub forwarded_prefix: Option<String>,
}

impl RequestParts {
    /// Derives the externally visible base URL and the request path.
    ///
    /// Forwarded host and protocol take precedence over the raw request
    /// values; a forwarded prefix is appended to the base so relative
    /// links resolve under the proxy mount point.
    pub fn base_url(&self) -> (String, String) {
        let host = self
            .forwarded_host
            .as_deref()
            .filter(|host| !host.is_empty())
            .unwrap_or(&self.host);
        let scheme = self
            .forwarded_proto
            .as_deref()
            .filter(|scheme| !scheme.is_empty())
            .unwrap_or(&self.scheme);
        let prefix = self.forwarded_prefix.as_deref().unwrap_or("");

        (format!("{scheme}://{host}{prefix}"), self.path.clone())
    }

    /// Appends a generated `self` link echoing this request's URL and
    /// query string.
    pub fn with_self_link(&self, mut links: Links) -> Links {
        let (base_url, path) = self.base_url();

        let mut href = base_url;
        // only append the path when the base does not already end with it
        if !href.ends_with(&path) {
            href.push_str(&path);
        }

        let mut pairs = self.query_pairs();
        if !pairs.is_empty() {
            pairs.sort_by(|a, b| a.0.cmp(&b.0));
            href.push('?');
            href.push_str(&encode_query_pairs(&pairs));
        }

        links.insert(SELF_KEY.to_string(), Link::new(href));
        links
    }

    /// The first value of a query parameter, decoded.
    pub fn query_value(&self, name: &str) -> Option<String> {
        self.query_pairs()
            .into_iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Whether the query string contains the parameter at all.
    pub fn has_query(&self, name: &str) -> bool {
        self.query_pairs().into_iter().any(|(key, _)| key == name)
    }

    /// Whether the request carries the given pagination parameter.
    pub fn has_page_param(&self, param: PageParam) -> bool {
        self.has_query(param.as_str())
    }

    /// Integer value of `page[offset]`.
    pub fn page_offset(&self) -> Option<i64> {
        self.page_integer(PageParam::Offset)
    }

    /// Integer value of `page[limit]`.
    pub fn page_limit(&self) -> Option<i64> {
        self.page_integer(PageParam::Limit)
    }

    /// Integer value of `page[number]`.
    pub fn page_number(&self) -> Option<i64> {
        self.page_integer(PageParam::Number)
    }

    /// Integer value of `page[size]`.
    pub fn page_size(&self) -> Option<i64> {
        self.page_integer(PageParam::Size)
    }

    /// Opaque value of `page[cursor]`.
    pub fn page_cursor(&self) -> Option<String> {
        self.query_value(PageParam::Cursor.as_str())
    }

    /// Opaque value of `page[before]`.
    pub fn page_before(&self) -> Option<String> {
        self.query_value(PageParam::Before.as_str())
    }

    /// Opaque value of `page[after]`.
    pub fn page_after(&self) -> Option<String> {
        self.query_value(PageParam::After.as_str())
    }

    /// The side-load list from the `include` query parameter.
    pub fn included(&self) -> Included {
        match self.query_value(INCLUDE_PARAM) {
            Some(list) if !list.is_empty() => {
                Included(list.split(',').map(str::to_string).collect())
            }
            _ => Included::default(),
        }
    }

    fn page_integer(&self, param: PageParam) -> Option<i64> {
        self.query_value(param.as_str())?.parse().ok()
    }

    fn query_pairs(&self) -> Vec<(String, String)> {
        url::form_urlencoded::parse(self.query.as_bytes())
            .into_owned()
            .collect()
    }
}

/// Resource names requested through the `include` query parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Included(pub Vec<String>);

impl Included {
    /// Whether the client asked for `resource`.
    pub fn has_resource(&self, resource: &str) -> bool {
        self.0.iter().any(|included| included == resource)
    }

    /// Verifies every requested side-load against the available resource
    /// names.
    ///
    /// # Errors
    ///
    /// Returns `IncludeError::TooManyIncluded` when more resources are
    /// requested than exist, or `IncludeError::ResourceNotAvailable`
    /// naming the first unknown resource.
    pub fn verify_resources(&self, available: &[&str]) -> Result<(), IncludeError> {
        if self.0.len() > available.len() {
            return Err(IncludeError::TooManyIncluded);
        }

        for include in &self.0 {
            if !available.contains(&include.as_str()) {
                return Err(IncludeError::ResourceNotAvailable {
                    resource: include.clone(),
                });
            }
        }

        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}
