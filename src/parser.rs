//! Inbound parsing: from a decoded document back to domain values.
//!
//! Walks the `data` and `included` members of a decoded document and
//! reconstructs values by resource type. The registry is the set of type
//! names the caller knows how to handle; resources of unregistered types
//! are ignored.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ParseError;

/// Outcome of a best-effort decode pass.
///
/// Resources that fail to decode land in `errors`; the rest still parse.
#[derive(Debug, Default)]
pub struct ParsedResources<T> {
    pub resources: Vec<T>,
    pub errors: Vec<ParseError>,
}

/// Groups the raw resource objects of `data` and `included` by type,
/// keeping only registered type names.
pub fn collect_by_type(document: &Value, types: &[&str]) -> BTreeMap<String, Vec<Map<String, Value>>> {
    let mut grouped = BTreeMap::new();

    for section in ["data", "included"] {
        if let Some(value) = document.get(section) {
            collect_section(value, types, &mut grouped);
        }
    }

    grouped
}

fn collect_section(
    value: &Value,
    types: &[&str],
    grouped: &mut BTreeMap<String, Vec<Map<String, Value>>>,
) {
    match value {
        Value::Object(resource) => {
            if let Some(type_name) = resource.get("type").and_then(Value::as_str) {
                if types.contains(&type_name) {
                    grouped
                        .entry(type_name.to_string())
                        .or_insert_with(Vec::new)
                        .push(resource.clone());
                }
            }
        }
        Value::Array(resources) => {
            for resource in resources {
                collect_section(resource, types, grouped);
            }
        }
        _ => {}
    }
}

/// Decodes every resource of `resource_type` in `data` and `included`
/// into `T` via its attributes.
///
/// Resources of other types are skipped silently; a matching resource
/// that fails to decode is reported in the result without aborting the
/// remaining resources.
pub fn decode_resources<T: DeserializeOwned>(
    document: &Value,
    resource_type: &str,
) -> ParsedResources<T> {
    let mut parsed = ParsedResources {
        resources: Vec::new(),
        errors: Vec::new(),
    };

    for section in ["data", "included"] {
        if let Some(value) = document.get(section) {
            decode_section(value, resource_type, &mut parsed);
        }
    }

    parsed
}

fn decode_section<T: DeserializeOwned>(
    value: &Value,
    resource_type: &str,
    parsed: &mut ParsedResources<T>,
) {
    match value {
        Value::Object(resource) => {
            if resource.get("type").and_then(Value::as_str) != Some(resource_type) {
                return;
            }
            match decode_resource(value, resource_type) {
                Ok(decoded) => parsed.resources.push(decoded),
                Err(error) => parsed.errors.push(error),
            }
        }
        Value::Array(resources) => {
            for resource in resources {
                decode_section(resource, resource_type, parsed);
            }
        }
        _ => {}
    }
}

/// Decodes a single resource object into `T` via its attributes.
///
/// # Errors
///
/// Returns `ParseError::TypeMismatch` when the resource's declared type
/// differs from `resource_type`, `ParseError::MissingAttributes` when
/// there is no attributes member, and `ParseError::Attributes` when the
/// attributes do not fit `T`.
pub fn decode_resource<T: DeserializeOwned>(
    resource: &Value,
    resource_type: &str,
) -> Result<T, ParseError> {
    let declared = resource
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if declared != resource_type {
        return Err(ParseError::TypeMismatch {
            expected: resource_type.to_string(),
            actual: declared.to_string(),
        });
    }

    let id = resource
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let Some(attributes) = resource.get("attributes") else {
        return Err(ParseError::MissingAttributes {
            id,
            resource_type: resource_type.to_string(),
        });
    };

    serde_json::from_value(attributes.clone()).map_err(|source| ParseError::Attributes {
        id,
        resource_type: resource_type.to_string(),
        source,
    })
}
