//! The node transformer: canonical resources and one-level relationship
//! harvesting.
//!
//! [`transform_node`] converts one node into its wire [`Resource`] and
//! returns every node its relationships point at. The harvest is exactly
//! one level deep and deliberately not deduplicated; walking the rest of
//! the graph and collapsing duplicates is the document assembler's job,
//! which keeps cyclic graphs from recursing unboundedly here.

use std::collections::BTreeMap;

use crate::link::resolve_links;
use crate::node::{Node, NodeValue, Relationship, RelationshipData, Relationships};
use crate::resource::{IdentifierData, Resource, ResourceIdentifier, ResourceRelationship};

/// Transforms a node into its resource representation.
///
/// Attribute selection prefers the explicit capability and falls back to
/// the node's own serialized value, so every resource carries attributes.
/// `links`, `meta`, and `relationships` appear only when the node exposes
/// the corresponding capability.
pub fn transform_node(node: &dyn Node, base_url: &str) -> (Resource, Vec<Box<dyn Node>>) {
    let attributes = node.attributes().unwrap_or_else(|| node.to_value());

    let links = node
        .links()
        .map(|links| resolve_links(links, base_url))
        .filter(|links| !links.is_empty());

    let (relationships, included) = match node.relationships() {
        Some(relationships) => {
            let (resolved, included) = resolve_relationships(&node.id(), relationships, base_url);
            (Some(resolved).filter(|map| !map.is_empty()), included)
        }
        None => (None, Vec::new()),
    };

    let resource = Resource {
        id: node.id(),
        resource_type: node.resource_type(),
        attributes: Some(attributes),
        links,
        relationships,
        meta: node.meta(),
    };

    (resource, included)
}

/// Transforms a collection of nodes, concatenating their harvests.
pub fn transform_nodes(
    nodes: Vec<Box<dyn Node>>,
    base_url: &str,
) -> (Vec<Resource>, Vec<Box<dyn Node>>) {
    let mut resources = Vec::with_capacity(nodes.len());
    let mut included = Vec::new();

    for node in nodes {
        let (resource, children) = transform_node(&*node, base_url);
        resources.push(resource);
        included.extend(children);
    }

    (resources, included)
}

/// Resolves every named relationship of a node.
///
/// Relationship links are resolved with the *parent's* id. Every key in
/// the source map appears in the output; the returned node list is the
/// union of all targets across entries.
pub fn resolve_relationships(
    parent_id: &str,
    relationships: Relationships,
    base_url: &str,
) -> (BTreeMap<String, ResourceRelationship>, Vec<Box<dyn Node>>) {
    let mut resolved = BTreeMap::new();
    let mut included = Vec::new();

    for (name, relationship) in relationships.into_entries() {
        let links = relationship
            .links(parent_id)
            .map(|links| resolve_links(links, base_url))
            .filter(|links| !links.is_empty());
        let meta = relationship.meta();
        let (data, nodes) = resolve_relationship_data(relationship.into_data());

        resolved.insert(name, ResourceRelationship { links, data, meta });
        included.extend(nodes);
    }

    (resolved, included)
}

/// Renders relationship data as resource identifiers and hands back the
/// consumed nodes for included-set accumulation.
///
/// An absent to-one yields `null` data and contributes nothing; a
/// declared-empty to-many yields an explicit empty array.
pub fn resolve_relationship_data(data: RelationshipData) -> (IdentifierData, Vec<Box<dyn Node>>) {
    match data {
        RelationshipData::ToOne(None) => (IdentifierData::One(None), Vec::new()),
        RelationshipData::ToOne(Some(node)) => {
            let identifier = resource_identifier(&*node);
            (IdentifierData::One(Some(identifier)), vec![node])
        }
        RelationshipData::ToMany(nodes) => {
            let identifiers = nodes.iter().map(|node| resource_identifier(&**node)).collect();
            (IdentifierData::Many(identifiers), nodes)
        }
    }
}

/// Builds the minimal `{id, type, meta?}` reference for a node.
pub fn resource_identifier(node: &dyn Node) -> ResourceIdentifier {
    ResourceIdentifier {
        id: node.id(),
        resource_type: node.resource_type(),
        meta: node.meta(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::{Link, Links, LinkValue, SELF_KEY};
    use serde::Serialize;
    use serde_json::{json, Value};

    const BASE_URL: &str = "http://example.com";

    #[derive(Clone, Serialize)]
    struct Child {
        id: String,
        number: i64,
    }

    impl Node for Child {
        fn id(&self) -> String {
            self.id.clone()
        }

        fn resource_type(&self) -> String {
            "tests".to_string()
        }
    }

    #[derive(Clone, Serialize)]
    struct Parent {
        id: String,
        number: i64,
        children: Vec<Child>,
        favorite: Child,
    }

    impl Node for Parent {
        fn id(&self) -> String {
            self.id.clone()
        }

        fn resource_type(&self) -> String {
            "parents".to_string()
        }

        fn meta(&self) -> Option<Value> {
            Some(json!({"something": "interesting"}))
        }

        fn links(&self) -> Option<Links> {
            Some(Links::from([(
                SELF_KEY.to_string(),
                Link::new("/path/to/resource"),
            )]))
        }

        fn relationships(&self) -> Option<Relationships> {
            Some(
                Relationships::new()
                    .to_many("tests", self.children.clone())
                    .to_one("favorite", self.favorite.clone()),
            )
        }
    }

    fn parent() -> Parent {
        Parent {
            id: "1234".into(),
            number: 1234,
            children: vec![Child {
                id: "4321".into(),
                number: 4321,
            }],
            favorite: Child {
                id: "9876".into(),
                number: 9876,
            },
        }
    }

    #[test]
    fn bare_node_falls_back_to_its_own_value() {
        let child = Child {
            id: "1234".into(),
            number: 7,
        };

        let (resource, included) = transform_node(&child, BASE_URL);

        assert_eq!(resource.id, "1234");
        assert_eq!(resource.resource_type, "tests");
        assert_eq!(resource.attributes, Some(json!({"id": "1234", "number": 7})));
        assert!(resource.links.is_none());
        assert!(resource.meta.is_none());
        assert!(resource.relationships.is_none());
        assert!(included.is_empty());
    }

    #[test]
    fn capabilities_flow_into_the_resource() {
        let (resource, included) = transform_node(&parent(), BASE_URL);

        assert_eq!(resource.meta, Some(json!({"something": "interesting"})));
        let links = resource.links.expect("links capability present");
        assert_eq!(
            links[SELF_KEY],
            LinkValue::Url("http://example.com/path/to/resource".into())
        );
        assert_eq!(included.len(), 2);
    }

    #[test]
    fn explicit_to_many_with_one_element_renders_an_array() {
        let (resource, _) = transform_node(&parent(), BASE_URL);

        let relationships = resource.relationships.expect("relationships present");
        match &relationships["tests"].data {
            IdentifierData::Many(identifiers) => {
                assert_eq!(identifiers.len(), 1);
                assert_eq!(identifiers[0].id, "4321");
                assert_eq!(identifiers[0].resource_type, "tests");
            }
            IdentifierData::One(_) => panic!("expected identifier array"),
        }
    }

    #[test]
    fn to_one_renders_a_single_identifier() {
        let (resource, _) = transform_node(&parent(), BASE_URL);

        let relationships = resource.relationships.expect("relationships present");
        match &relationships["favorite"].data {
            IdentifierData::One(Some(identifier)) => {
                assert_eq!(identifier.id, "9876");
                assert_eq!(identifier.resource_type, "tests");
            }
            other => panic!("expected single identifier, got {other:?}"),
        }
    }

    #[test]
    fn harvest_is_the_raw_union_of_targets() {
        let (_, included) = transform_node(&parent(), BASE_URL);

        let ids: Vec<String> = included.iter().map(|node| node.id()).collect();
        assert_eq!(ids, vec!["9876".to_string(), "4321".to_string()]);
    }

    #[test]
    fn absent_to_one_contributes_nothing() {
        let (data, nodes) = resolve_relationship_data(RelationshipData::ToOne(None));

        assert_eq!(data, IdentifierData::One(None));
        assert!(nodes.is_empty());
    }

    #[test]
    fn declared_empty_to_many_renders_empty_array() {
        let (data, nodes) = resolve_relationship_data(RelationshipData::ToMany(Vec::new()));

        assert_eq!(data, IdentifierData::Many(Vec::new()));
        assert!(nodes.is_empty());
    }

    struct CommentsRelation {
        comments: Vec<Child>,
    }

    impl Relationship for CommentsRelation {
        fn into_data(self: Box<Self>) -> RelationshipData {
            RelationshipData::to_many(self.comments)
        }

        fn links(&self, parent_id: &str) -> Option<Links> {
            Some(Links::from([(
                SELF_KEY.to_string(),
                Link::new(format!("/parents/{parent_id}/tests")),
            )]))
        }

        fn meta(&self) -> Option<Value> {
            Some(json!({"count": self.comments.len()}))
        }
    }

    #[test]
    fn relationship_links_use_the_parent_id() {
        let relationships = Relationships::new().with(
            "tests",
            CommentsRelation {
                comments: vec![Child {
                    id: "4321".into(),
                    number: 4321,
                }],
            },
        );

        let (resolved, included) = resolve_relationships("1234", relationships, BASE_URL);

        let relationship = &resolved["tests"];
        let links = relationship.links.as_ref().expect("relationship links");
        assert_eq!(
            links[SELF_KEY],
            LinkValue::Url("http://example.com/parents/1234/tests".into())
        );
        assert_eq!(relationship.meta, Some(json!({"count": 1})));
        assert_eq!(included.len(), 1);
    }
}
