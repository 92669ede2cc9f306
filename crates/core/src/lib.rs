//! # NLQ Core
//!
//! Core logic for the natural-language FHIR query service.
//!
//! This crate contains pure, synchronous operations:
//! - Intent extraction from free text ([`IntentExtractor`])
//! - Translation of the extracted intent into a FHIR search ([`to_search`])
//! - Synthetic patient generation that honours every extracted predicate
//!   ([`MockRecordGenerator`])
//! - The pipeline tying these together ([`QueryService`])
//!
//! **No transport concerns**: HTTP servers, CORS and OpenAPI belong in `api-rest`.

pub mod config;
pub mod constants;
pub mod error;
pub mod extract;
pub mod generator;
pub mod intent;
pub mod query;
pub mod search;
pub mod summary;

// Re-exports
pub use config::CoreConfig;
pub use constants::{DEFAULT_REST_ADDR, EXAMPLE_QUERIES};
pub use error::{QueryError, QueryResult};
pub use extract::IntentExtractor;
pub use generator::{MockRecordGenerator, Record};
pub use intent::{Action, AgeFilter, Condition, FilterSet, Modifier};
pub use query::{intent_to_wire, QueryService, ResultSet};
pub use search::to_search;
pub use summary::ResultSummary;

pub use nlq_types::{Gender, NonEmptyText, TextError};
