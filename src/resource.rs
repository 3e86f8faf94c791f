//! Wire shapes for resources and resource identifiers.
//!
//! Optional members serialize with omit-when-absent semantics: an absent
//! capability produces no key at all, never `null`. The one deliberate
//! exception is relationship `data`, which is always present and may be
//! `null` for an absent to-one target.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::link::LinkMap;

/// The minimal `{id, type, meta?}` reference to a resource.
///
/// Two identifiers are equal iff `(id, type)` match; `meta` is carried for
/// display only and never participates in equality, hashing, or
/// included-set deduplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    pub id: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl PartialEq for ResourceIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.resource_type == other.resource_type
    }
}

impl Eq for ResourceIdentifier {}

impl Hash for ResourceIdentifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.resource_type.hash(state);
    }
}

/// Relationship data: a single optional identifier or an identifier array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdentifierData {
    /// To-one target; `None` serializes as `null`.
    One(Option<ResourceIdentifier>),
    /// To-many targets; an empty vec serializes as `[]`.
    Many(Vec<ResourceIdentifier>),
}

/// A rendered relationship entry on a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRelationship {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<LinkMap>,
    pub data: IdentifierData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

/// The canonical wire representation of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<LinkMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<BTreeMap<String, ResourceRelationship>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

/// The document's primary data: one resource or a resource array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryData {
    One(Resource),
    Many(Vec<Resource>),
}
