//! Document assembly: primary data, flattened included set, errors,
//! links, and meta.
//!
//! The assembler owns the two top-level invariants:
//!
//! - `data` and `errors` never coexist. Any error suppresses data
//!   transformation entirely, whatever nodes were supplied.
//! - `included` lists every resource transitively reachable from the
//!   primary data exactly once, keyed by `(id, type)`, and only exists
//!   when `data` does.
//!
//! The included set is flattened breadth-first with a visited set seeded
//! from the primary resources, so cyclic relationship graphs terminate.

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DocumentError, ErrorObject};
use crate::link::{resolve_links, LinkMap, Links};
use crate::node::{Node, NodeInput};
use crate::resource::{PrimaryData, Resource};
use crate::transform::{transform_node, transform_nodes};

/// The top-level wire document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PrimaryData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub included: Option<Vec<Resource>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<DocumentError>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<LinkMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

/// Everything application code supplies for one document.
#[derive(Default)]
pub struct Response {
    /// Primary data; shape (single vs collection) is declared by the
    /// caller, never inferred.
    pub data: Option<NodeInput>,
    /// Errors to report. Any entry here suppresses `data` and `included`.
    pub errors: Vec<ErrorObject>,
    /// Document-level link templates.
    pub links: Links,
    /// Document-level meta.
    pub meta: Option<Value>,
}

/// Transforms a response into the wire document.
pub fn transform(response: Response, base_url: &str) -> Document {
    let links = if response.links.is_empty() {
        None
    } else {
        Some(resolve_links(response.links, base_url))
    };
    let meta = response.meta;

    if !response.errors.is_empty() {
        let errors = response
            .errors
            .into_iter()
            .map(|error| render_error(error, base_url))
            .collect();
        return Document {
            errors: Some(errors),
            links,
            meta,
            ..Document::default()
        };
    }

    let Some(input) = response.data else {
        return Document {
            links,
            meta,
            ..Document::default()
        };
    };

    let mut visited = BTreeSet::new();
    let (data, harvest) = match input {
        NodeInput::One(node) => {
            visited.insert((node.id(), node.resource_type()));
            let (resource, children) = transform_node(&*node, base_url);
            (PrimaryData::One(resource), children)
        }
        NodeInput::Many(nodes) => {
            for node in &nodes {
                visited.insert((node.id(), node.resource_type()));
            }
            let (resources, children) = transform_nodes(nodes, base_url);
            (PrimaryData::Many(resources), children)
        }
    };

    let included = collect_included(harvest, visited, base_url);

    Document {
        data: Some(data),
        included: if included.is_empty() {
            None
        } else {
            Some(included)
        },
        links,
        meta,
        errors: None,
    }
}

/// Breadth-first flattening of the relationship graph into the included
/// set. Each node is transformed at most once; revisits are dropped by
/// the `(id, type)` key.
fn collect_included(
    harvest: Vec<Box<dyn Node>>,
    mut visited: BTreeSet<(String, String)>,
    base_url: &str,
) -> Vec<Resource> {
    let mut queue: VecDeque<Box<dyn Node>> = harvest.into();
    let mut included = Vec::new();

    while let Some(node) = queue.pop_front() {
        if !visited.insert((node.id(), node.resource_type())) {
            continue;
        }

        let (resource, children) = transform_node(&*node, base_url);
        included.push(resource);
        queue.extend(children);
    }

    included
}

fn render_error(error: ErrorObject, base_url: &str) -> DocumentError {
    DocumentError {
        id: error.id,
        links: if error.links.is_empty() {
            None
        } else {
            Some(resolve_links(error.links, base_url))
        },
        status: error.status,
        code: error.code,
        title: error.title,
        detail: error.detail,
        source: error.source,
        meta: error.meta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Relationships;
    use serde::Serialize;
    use serde_json::json;

    const BASE_URL: &str = "https://example.com";

    #[derive(Clone, Serialize)]
    struct Author {
        id: String,
        name: String,
    }

    impl Node for Author {
        fn id(&self) -> String {
            self.id.clone()
        }

        fn resource_type(&self) -> String {
            "authors".to_string()
        }
    }

    #[derive(Clone, Serialize)]
    struct Article {
        id: String,
        title: String,
        #[serde(skip)]
        author: Author,
    }

    impl Node for Article {
        fn id(&self) -> String {
            self.id.clone()
        }

        fn resource_type(&self) -> String {
            "articles".to_string()
        }

        fn relationships(&self) -> Option<Relationships> {
            Some(Relationships::new().to_one("author", self.author.clone()))
        }
    }

    fn shared_author() -> Author {
        Author {
            id: "77".into(),
            name: "Robin".into(),
        }
    }

    #[test]
    fn errors_suppress_data_and_included() {
        let response = Response {
            data: Some(NodeInput::one(Article {
                id: "1".into(),
                title: "First".into(),
                author: shared_author(),
            })),
            errors: vec![ErrorObject {
                status: Some(400),
                detail: Some("this has an error".into()),
                ..ErrorObject::default()
            }],
            ..Response::default()
        };

        let document = transform(response, BASE_URL);

        assert!(document.data.is_none());
        assert!(document.included.is_none());
        let errors = document.errors.expect("errors present");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].status, Some(400));
    }

    #[test]
    fn shared_child_is_included_once() {
        let articles = vec![
            Article {
                id: "1".into(),
                title: "First".into(),
                author: shared_author(),
            },
            Article {
                id: "2".into(),
                title: "Second".into(),
                author: shared_author(),
            },
        ];
        let response = Response {
            data: Some(NodeInput::collection(articles)),
            ..Response::default()
        };

        let document = transform(response, BASE_URL);

        let included = document.included.expect("included present");
        assert_eq!(included.len(), 1);
        assert_eq!(included[0].id, "77");
        assert_eq!(included[0].resource_type, "authors");
    }

    #[test]
    fn single_node_renders_an_object_collection_an_array() {
        let article = Article {
            id: "1".into(),
            title: "First".into(),
            author: shared_author(),
        };

        let single = transform(
            Response {
                data: Some(NodeInput::one(article.clone())),
                ..Response::default()
            },
            BASE_URL,
        );
        assert!(matches!(single.data, Some(PrimaryData::One(_))));

        let collection = transform(
            Response {
                data: Some(NodeInput::collection(vec![article])),
                ..Response::default()
            },
            BASE_URL,
        );
        match collection.data {
            Some(PrimaryData::Many(resources)) => assert_eq!(resources.len(), 1),
            other => panic!("expected resource array, got {other:?}"),
        }
    }

    #[test]
    fn empty_collection_keeps_an_explicit_empty_array() {
        let response = Response {
            data: Some(NodeInput::many(Vec::new())),
            ..Response::default()
        };

        let document = transform(response, BASE_URL);

        assert_eq!(
            serde_json::to_value(&document).unwrap(),
            json!({"data": []})
        );
    }

    #[test]
    fn no_data_no_included() {
        let response = Response {
            meta: Some(json!({"total": 0})),
            ..Response::default()
        };

        let document = transform(response, BASE_URL);

        assert_eq!(
            serde_json::to_value(&document).unwrap(),
            json!({"meta": {"total": 0}})
        );
    }

    #[test]
    fn document_links_resolve_against_the_base_url() {
        let response = Response {
            links: Links::from([(
                crate::link::SELF_KEY.to_string(),
                crate::link::Link::new("/articles"),
            )]),
            ..Response::default()
        };

        let document = transform(response, BASE_URL);

        let links = document.links.expect("links present");
        assert_eq!(links["self"].href(), "https://example.com/articles");
    }
}
