//! FHIR wire/boundary support for the NLQ query service.
//!
//! This crate provides **wire models** and **format/translation helpers** for the
//! FHIR-shaped payloads the service emits:
//! - `Patient` resources carrying synthetic demographics
//! - `searchset` Bundles wrapping those resources
//! - FHIR search requests (`Patient?birthdate=le1975-01-01&gender=female`)
//!
//! This crate focuses on:
//! - FHIR semantic alignment (without FHIR conformance validation)
//! - JSON serialisation/deserialisation
//! - translation between domain primitives and wire structs
//!
//! Nothing here talks to a FHIR server.

pub mod bundle;
pub mod patient;
pub mod search;

// Re-export facades
pub use bundle::{Bundle, BundleEntry, BundleType};
pub use patient::{Coding, NameUse, Patient, PatientData, PatientResource};
pub use search::{SearchParam, SearchPrefix, SearchRequest};

pub use nlq_types::Gender;

/// Code system URI for ICD-10-CM diagnosis codes.
pub const ICD10_CM_SYSTEM: &str = "http://hl7.org/fhir/sid/icd-10-cm";

/// Errors returned by the `fhir` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum FhirError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("translation error: {0}")]
    Translation(String),
}

/// Type alias for Results that can fail with a [`FhirError`].
pub type FhirResult<T> = Result<T, FhirError>;
