//! JSON:API Document Transformation
//!
//! Turns application domain objects into wire documents shaped after the
//! JSON:API specification: `data`, `included`, `errors`, `links`, and
//! `meta`, with resources referencing each other through `{id, type}`
//! pairs and link templates resolved into absolute URLs.
//!
//! Domain objects participate by implementing [`Node`]. Identity and type
//! are required; attributes, meta, links, and relationships are optional
//! capabilities that default to absent, and capability absence maps to
//! member absence in the output.
//!
//! # Example
//!
//! ```
//! use jsonapi_document::{transform, Node, NodeInput, Response};
//! use serde::Serialize;
//! use serde_json::json;
//!
//! #[derive(Serialize)]
//! struct AgilityData {
//!     name: String,
//!     #[serde(rename = "tranId")]
//!     tran_id: String,
//! }
//!
//! impl Node for AgilityData {
//!     fn id(&self) -> String {
//!         self.tran_id.clone()
//!     }
//!
//!     fn resource_type(&self) -> String {
//!         "agilityData".to_string()
//!     }
//! }
//!
//! let response = Response {
//!     data: Some(NodeInput::one(AgilityData {
//!         name: "Testing data 1".to_string(),
//!         tran_id: "12345".to_string(),
//!     })),
//!     ..Response::default()
//! };
//!
//! let document = transform(response, "https://example.com");
//!
//! assert_eq!(
//!     serde_json::to_value(&document).unwrap(),
//!     json!({
//!         "data": {
//!             "id": "12345",
//!             "type": "agilityData",
//!             "attributes": {"name": "Testing data 1", "tranId": "12345"}
//!         }
//!     })
//! );
//! ```
//!
//! # Link templates
//!
//! A [`Link`] is an href plus path parameters and query parameters.
//! Resolution prefixes relative hrefs with the base URL, substitutes
//! `:name` path segments, merges query parameters (dropping empty-string
//! values, sorted key order), and emits a bare string unless the link
//! carries meta:
//!
//! | Template | Resolved against `https://example.com` |
//! |----------|----------------------------------------|
//! | `/api/objects` | `https://example.com/api/objects` |
//! | `/api/objects/:id` + `{id: 123}` | `https://example.com/api/objects/123` |
//! | `/api/objects` + query `{page[limit]: 25}` | `https://example.com/api/objects?page[limit]=25` |
//!
//! # Relationships and the included set
//!
//! Relationship cardinality is always declared, never inferred from
//! element count: [`RelationshipData::ToOne`] renders a single identifier
//! or `null`, [`RelationshipData::ToMany`] always renders an array. Every
//! node reachable through relationships is flattened into `included`,
//! deduplicated by `(id, type)`; cyclic graphs are safe.
//!
//! Errors and data are mutually exclusive at the top level: a [`Response`]
//! carrying any error produces a document without `data` or `included`.

mod document;
mod error;
mod link;
mod node;
mod pagination;
mod parser;
mod request;
mod resource;
mod transform;

pub use document::{transform, Document, Response};
pub use error::{DocumentError, ErrorObject, ErrorSource, IncludeError, ParseError};
pub use link::{
    is_absolute_url, is_relative_url, resolve_link, resolve_links, Link, LinkMap, LinkValue,
    Links, Meta, Params, Queries, FIRST_KEY, LAST_KEY, NEXT_KEY, PREV_KEY, RELATED_KEY, SELF_KEY,
};
pub use node::{Node, NodeInput, NodeValue, Relationship, RelationshipData, Relationships};
pub use pagination::{
    check_exceeds_maximum_page_size, check_supported_pagination, check_unsupported_pagination,
    cursor_next_link, cursor_next_prev_links, cursor_prev_link, number_next_link,
    number_next_links, offset_next_link, offset_next_links, PageParam,
};
pub use parser::{collect_by_type, decode_resource, decode_resources, ParsedResources};
pub use request::{
    Included, RequestParts, FORWARDED_HOST, FORWARDED_PREFIX, FORWARDED_PROTO, INCLUDE_PARAM,
};
pub use resource::{
    IdentifierData, PrimaryData, Resource, ResourceIdentifier, ResourceRelationship,
};
pub use transform::{
    resolve_relationship_data, resolve_relationships, resource_identifier, transform_node,
    transform_nodes,
};
