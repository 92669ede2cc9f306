//! # API Shared
//!
//! Shared request/response definitions for the NLQ APIs.
//!
//! Contains:
//! - Wire types for the query, examples and health endpoints (`query`, `health`)
//! - `HealthService`, usable by any transport
//!
//! Used by `nlq-core` (which builds responses) and `api-rest` (which serves them).

pub mod health;
pub mod query;

pub use health::{HealthRes, HealthService};
pub use query::{
    AgeFilterRes, ConditionRes, ErrorRes, ExamplesRes, ExtractedIntent, QueryReq, QueryRes,
};
