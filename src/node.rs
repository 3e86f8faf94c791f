//! Domain-side contracts: nodes, relationships, and input shapes.
//!
//! A [`Node`] is any domain value the engine can turn into a resource.
//! Identity and type are required; everything else is an optional
//! capability expressed as a provided method returning `None`. The engine
//! keys field presence in the output off capability presence here: a node
//! that never overrides [`Node::links`] produces a resource without a
//! `links` member, not one with an empty map.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::link::Links;

/// Serialized form of a whole node, used as the attribute payload when the
/// node exposes no explicit [`Node::attributes`].
///
/// Implemented automatically for every [`Serialize`] type, so a node never
/// spells this out itself.
pub trait NodeValue {
    /// The node's own value as JSON.
    fn to_value(&self) -> Value;
}

impl<T: Serialize> NodeValue for T {
    fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// A domain value eligible for document transformation.
///
/// Only [`id`](Node::id) and [`resource_type`](Node::resource_type) are
/// required. The optional capabilities govern which members appear on the
/// transformed resource.
pub trait Node: NodeValue {
    /// Unique identifier of the node within its type.
    fn id(&self) -> String;

    /// The resource type name, e.g. `"articles"`.
    fn resource_type(&self) -> String;

    /// Explicit attribute payload. When `None`, the node's own serialized
    /// value stands in.
    fn attributes(&self) -> Option<Value> {
        None
    }

    /// Meta information carried on the resource.
    fn meta(&self) -> Option<Value> {
        None
    }

    /// The node's own hypermedia links, e.g. `self`.
    fn links(&self) -> Option<Links> {
        None
    }

    /// Named relationships to other nodes.
    fn relationships(&self) -> Option<Relationships> {
        None
    }
}

/// Primary data handed to the assembler: a single node or a collection.
///
/// The shape is declared here, at the call boundary, rather than inferred
/// from the value. A one-element [`NodeInput::Many`] still renders as an
/// array.
pub enum NodeInput {
    /// A single node, rendered as one resource object.
    One(Box<dyn Node>),
    /// A collection of nodes, rendered as a resource array.
    Many(Vec<Box<dyn Node>>),
}

impl NodeInput {
    /// Wraps a single node.
    pub fn one(node: impl Node + 'static) -> Self {
        NodeInput::One(Box::new(node))
    }

    /// Wraps an already-boxed collection, allowing mixed node types.
    pub fn many(nodes: Vec<Box<dyn Node>>) -> Self {
        NodeInput::Many(nodes)
    }

    /// Wraps a homogeneous collection.
    pub fn collection<N: Node + 'static>(nodes: impl IntoIterator<Item = N>) -> Self {
        NodeInput::Many(
            nodes
                .into_iter()
                .map(|node| Box::new(node) as Box<dyn Node>)
                .collect(),
        )
    }
}

/// Target node(s) of a relationship, with explicit cardinality.
///
/// Cardinality is never inferred from element count: a `ToMany` with one
/// element renders as a one-element array, a `ToMany` with none as `[]`,
/// and a `ToOne(None)` as `null`.
pub enum RelationshipData {
    /// Optional single target.
    ToOne(Option<Box<dyn Node>>),
    /// Zero or more targets.
    ToMany(Vec<Box<dyn Node>>),
}

impl RelationshipData {
    /// A present to-one relationship.
    pub fn to_one(node: impl Node + 'static) -> Self {
        RelationshipData::ToOne(Some(Box::new(node)))
    }

    /// An absent to-one relationship, rendered as `null`.
    pub fn absent() -> Self {
        RelationshipData::ToOne(None)
    }

    /// A to-many relationship over a homogeneous collection.
    pub fn to_many<N: Node + 'static>(nodes: impl IntoIterator<Item = N>) -> Self {
        RelationshipData::ToMany(
            nodes
                .into_iter()
                .map(|node| Box::new(node) as Box<dyn Node>)
                .collect(),
        )
    }
}

/// A named relationship entry on a node.
///
/// The bare case is [`RelationshipData`] itself; wrappers additionally
/// expose relationship-level links and meta. `links` receives the
/// *parent's* id because relationship links describe this relation of
/// that parent, e.g. `/articles/:id/comments`.
pub trait Relationship {
    /// Consumes the relationship, yielding its target node(s).
    fn into_data(self: Box<Self>) -> RelationshipData;

    /// Links for this relationship of the parent identified by `parent_id`.
    fn links(&self, parent_id: &str) -> Option<Links> {
        let _ = parent_id;
        None
    }

    /// Meta information carried on the relationship itself.
    fn meta(&self) -> Option<Value> {
        None
    }
}

impl Relationship for RelationshipData {
    fn into_data(self: Box<Self>) -> RelationshipData {
        *self
    }
}

/// Named relationships of a node.
#[derive(Default)]
pub struct Relationships {
    entries: BTreeMap<String, Box<dyn Relationship>>,
}

impl Relationships {
    /// Creates an empty relationship map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a relationship entry under `name`.
    pub fn with(mut self, name: impl Into<String>, relationship: impl Relationship + 'static) -> Self {
        self.entries.insert(name.into(), Box::new(relationship));
        self
    }

    /// Adds a present to-one relationship.
    pub fn to_one(self, name: impl Into<String>, node: impl Node + 'static) -> Self {
        self.with(name, RelationshipData::to_one(node))
    }

    /// Adds an absent to-one relationship.
    pub fn absent_to_one(self, name: impl Into<String>) -> Self {
        self.with(name, RelationshipData::absent())
    }

    /// Adds a to-many relationship over a homogeneous collection.
    pub fn to_many<N: Node + 'static>(
        self,
        name: impl Into<String>,
        nodes: impl IntoIterator<Item = N>,
    ) -> Self {
        self.with(name, RelationshipData::to_many(nodes))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn into_entries(self) -> BTreeMap<String, Box<dyn Relationship>> {
        self.entries
    }
}
