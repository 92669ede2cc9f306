//! Wire types for the natural-language query endpoint.
//!
//! Optional fields are omitted from the JSON when absent rather than sent as `null`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for `POST /query`.
///
/// `query` is optional at the wire level so a missing field reaches the handler and is
/// reported as a validation failure like an empty one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QueryReq {
    #[serde(default)]
    #[schema(example = "Show me all diabetic patients over 50")]
    pub query: Option<String>,
}

/// Age predicate as sent to clients.
///
/// `gt`/`lt` carry `value`; `range` carries inclusive `min` and `max`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AgeFilterRes {
    pub operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

/// A recognised condition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConditionRes {
    /// Short canonical name, e.g. `diabetes`.
    pub name: String,
    pub code: String,
    pub display: String,
    pub system: String,
}

/// The structured intent extracted from the query text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExtractedIntent {
    /// One of `show`, `find`, `count`, `list`.
    pub action: String,
    /// Requested number of results, present for `list`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<ConditionRes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_filter: Option<AgeFilterRes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<String>,
}

/// Response body for `POST /query`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct QueryRes {
    pub original_query: String,
    pub extracted_intent: ExtractedIntent,
    /// The FHIR search the intent corresponds to.
    #[schema(value_type = Object)]
    pub fhir_query: fhir::SearchRequest,
    /// A `searchset` Bundle of synthetic Patient resources.
    #[schema(value_type = Object)]
    pub fhir_response: fhir::Bundle,
}

/// Response body for `GET /examples`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExamplesRes {
    pub examples: Vec<String>,
}

/// Error body for 4xx/5xx responses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

impl ErrorRes {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
