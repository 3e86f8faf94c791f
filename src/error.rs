//! Wire error objects and library error types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::link::{LinkMap, Links};

/// Machine-parseable pointer to the offending part of a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorSource {
    /// JSON Pointer (RFC 6901) into the request document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer: Option<String>,
    /// The query parameter that caused the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
}

/// An error as supplied by application code, before link resolution.
#[derive(Debug, Clone, Default)]
pub struct ErrorObject {
    pub id: Option<String>,
    /// Link templates attached to the error, resolved during assembly.
    pub links: Links,
    pub status: Option<u16>,
    pub code: Option<u64>,
    pub title: Option<String>,
    pub detail: Option<String>,
    pub source: Option<ErrorSource>,
    pub meta: Option<Value>,
}

/// The wire form of an error, with links resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<LinkMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ErrorSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

/// Errors during inbound document parsing.
///
/// Parsing is best-effort per resource: a failure on one resource is
/// reported and the remaining resources still parse.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("resource type \"{actual}\" does not match requested type \"{expected}\"")]
    TypeMismatch { expected: String, actual: String },

    #[error("resource \"{id}\" of type \"{resource_type}\" has no attributes object")]
    MissingAttributes { id: String, resource_type: String },

    #[error("cannot decode attributes of resource \"{id}\" of type \"{resource_type}\"")]
    Attributes {
        id: String,
        resource_type: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors while verifying the `include` query parameter against the
/// resources a handler can actually side-load.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IncludeError {
    #[error("included query has too many resources")]
    TooManyIncluded,

    #[error("resource \"{resource}\" from included query not available")]
    ResourceNotAvailable { resource: String },
}
