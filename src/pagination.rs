//! Pagination links and pagination-option validation.
//!
//! Three independent strategies build `next`/`prev` link sets from the
//! request's current query state: offset/limit, page-number/size, and
//! opaque cursors (before/after). Builders are pure; the caller passes
//! the current values, typically read through
//! [`RequestParts`](crate::request::RequestParts).
//!
//! The validation checks mirror the cursor-pagination profile: unsupported
//! or oversized options surface as status-400 [`ErrorObject`]s with
//! `source.parameter` set, never as panics.

use serde_json::{json, Value};

use crate::error::{ErrorObject, ErrorSource};
use crate::link::{Link, Links, Params, NEXT_KEY, PREV_KEY};
use crate::request::RequestParts;

const RANGE_PAGINATION_PROFILE: &str =
    "https://jsonapi.org/profiles/ethanresnick/cursor-pagination/#auto-id--range-pagination-not-supported-error";
const MAX_PAGE_SIZE_PROFILE: &str =
    "https://jsonapi.org/profiles/ethanresnick/cursor-pagination/#auto-id--max-page-size-exceeded-error";

/// The recognized `page[...]` query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageParam {
    /// Offset from the start of the result set. Used with `Limit`.
    Offset,
    /// Size limit of an offset page. Used with `Offset`.
    Limit,
    /// Page number. Used with `Size`.
    Number,
    /// Size limit of a numbered or cursor page.
    Size,
    /// Opaque cursor of the page. Used by itself.
    Cursor,
    /// Cursor upper bound. Used with `Size` and `After`.
    Before,
    /// Cursor lower bound. Used with `Size` and `Before`.
    After,
}

impl PageParam {
    /// Every recognized pagination parameter.
    pub const ALL: [PageParam; 7] = [
        PageParam::Offset,
        PageParam::Limit,
        PageParam::Number,
        PageParam::Size,
        PageParam::Cursor,
        PageParam::Before,
        PageParam::After,
    ];

    /// The wire name of this parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            PageParam::Offset => "page[offset]",
            PageParam::Limit => "page[limit]",
            PageParam::Number => "page[number]",
            PageParam::Size => "page[size]",
            PageParam::Cursor => "page[cursor]",
            PageParam::Before => "page[before]",
            PageParam::After => "page[after]",
        }
    }
}

/// Builds the `next` link set for offset/limit pagination.
///
/// Without more results available the map is empty: no `next` key at all.
pub fn offset_next_links(link: Link, offset: i64, limit: i64, more_results_available: bool) -> Links {
    let mut links = Links::new();

    if more_results_available {
        links.insert(NEXT_KEY.to_string(), offset_next_link(link, offset, limit));
    }

    links
}

/// Annotates a link with the next offset/limit page queries.
pub fn offset_next_link(mut link: Link, offset: i64, limit: i64) -> Link {
    link.queries
        .insert(PageParam::Offset.as_str().to_string(), json!(offset + limit));
    link.queries
        .insert(PageParam::Limit.as_str().to_string(), json!(limit));

    link
}

/// Builds the `next` link set for page-number/size pagination.
pub fn number_next_links(link: Link, number: i64, size: i64, more_results_available: bool) -> Links {
    let mut links = Links::new();

    if more_results_available {
        links.insert(NEXT_KEY.to_string(), number_next_link(link, number, size));
    }

    links
}

/// Annotates a link with the next page-number/size queries. A
/// non-positive size is omitted.
pub fn number_next_link(mut link: Link, number: i64, size: i64) -> Link {
    link.queries
        .insert(PageParam::Number.as_str().to_string(), json!(number + 1));
    if size > 0 {
        link.queries
            .insert(PageParam::Size.as_str().to_string(), json!(size));
    }

    link
}

/// Builds the `next`/`prev` link set for cursor pagination.
pub fn cursor_next_prev_links(
    href: &str,
    params: Params,
    size: i64,
    before: Option<&str>,
    after: Option<&str>,
) -> Links {
    let mut links = Links::new();

    if let Some(next) = cursor_next_link(href, params.clone(), size, after) {
        links.insert(NEXT_KEY.to_string(), next);
    }

    if let Some(prev) = cursor_prev_link(href, params, size, before) {
        links.insert(PREV_KEY.to_string(), prev);
    }

    links
}

/// The `next` cursor link, suppressed when it would be vacuous
/// (no size and no cursor).
///
/// A `Some("")` cursor is a valid, distinct value from `None`: the empty
/// query value survives to link resolution, which then strips it, so a
/// doubly-empty cursor degenerates to a plain sized link.
pub fn cursor_next_link(href: &str, params: Params, size: i64, after: Option<&str>) -> Option<Link> {
    if size == 0 && after.is_none() {
        return None;
    }

    let mut link = Link::new(href);
    link.params = params;
    if size > 0 {
        link.queries
            .insert(PageParam::Size.as_str().to_string(), json!(size));
    }
    if let Some(after) = after {
        link.queries
            .insert(PageParam::After.as_str().to_string(), json!(after));
    }

    Some(link)
}

/// The `prev` cursor link, emitted only when a `before` cursor exists.
pub fn cursor_prev_link(href: &str, params: Params, size: i64, before: Option<&str>) -> Option<Link> {
    let before = before?;

    let mut link = Link::new(href);
    link.params = params;
    if size > 0 {
        link.queries
            .insert(PageParam::Size.as_str().to_string(), json!(size));
    }
    link.queries
        .insert(PageParam::Before.as_str().to_string(), json!(before));

    Some(link)
}

/// Reports an error for every listed option present in the request.
pub fn check_unsupported_pagination(
    request: &RequestParts,
    unsupported_options: &[PageParam],
) -> Vec<ErrorObject> {
    unsupported_options
        .iter()
        .filter(|option| request.has_page_param(**option))
        .map(|option| range_pagination_error(*option))
        .collect()
}

/// Reports an error for every recognized option present in the request
/// that is not in the supported list.
pub fn check_supported_pagination(
    request: &RequestParts,
    supported_options: &[PageParam],
) -> Vec<ErrorObject> {
    let unsupported: Vec<PageParam> = PageParam::ALL
        .into_iter()
        .filter(|option| !supported_options.contains(option))
        .collect();

    check_unsupported_pagination(request, &unsupported)
}

/// Reports an error for each size-style option exceeding `max_size`.
pub fn check_exceeds_maximum_page_size(request: &RequestParts, max_size: i64) -> Vec<ErrorObject> {
    let mut errors = Vec::new();

    if let Some(size) = request.page_size() {
        if size > max_size {
            errors.push(max_size_error(
                "Page size requested is too large.",
                format!("You requested a size of {size}, but {max_size} is the maximum."),
                PageParam::Size,
                json!({"page": {"maxSize": max_size}}),
            ));
        }
    }

    if let Some(limit) = request.page_limit() {
        if limit > max_size {
            errors.push(max_size_error(
                "Page limit requested is too large.",
                format!("You requested a limit of {limit}, but {max_size} is the maximum."),
                PageParam::Limit,
                json!({"page": {"maxLimit": max_size}}),
            ));
        }
    }

    errors
}

fn range_pagination_error(option: PageParam) -> ErrorObject {
    ErrorObject {
        title: Some("Range Pagination Not Supported.".to_string()),
        detail: Some(format!(
            "{} is not a supported pagination option",
            option.as_str()
        )),
        status: Some(400),
        source: Some(ErrorSource {
            pointer: None,
            parameter: Some(option.as_str().to_string()),
        }),
        links: Links::from([("type".to_string(), Link::new(RANGE_PAGINATION_PROFILE))]),
        ..ErrorObject::default()
    }
}

fn max_size_error(title: &str, detail: String, option: PageParam, meta: Value) -> ErrorObject {
    ErrorObject {
        title: Some(title.to_string()),
        detail: Some(detail),
        status: Some(400),
        source: Some(ErrorSource {
            pointer: None,
            parameter: Some(option.as_str().to_string()),
        }),
        links: Links::from([("type".to_string(), Link::new(MAX_PAGE_SIZE_PROFILE))]),
        meta: Some(meta),
        ..ErrorObject::default()
    }
}
