//! FHIR-aligned patient wire models and translation helpers.
//!
//! This module provides both domain-level types and wire models for the synthetic
//! patient resources returned inside a search Bundle.
//!
//! Responsibilities:
//! - Define public domain-level types for external API use
//! - Define a strict wire model for serialisation/deserialisation
//! - Provide translation helpers between domain primitives and the wire model
//!
//! Notes:
//! - `age`, `condition` and `lastVisitDate` are not base FHIR `Patient` elements; they are
//!   flattened onto the resource so a browser client can chart them without joins.

use crate::{FhirError, FhirResult};
use chrono::NaiveDate;
use nlq_types::Gender;
use serde::{Deserialize, Serialize};

// ============================================================================
// Public domain-level types
// ============================================================================

/// Purpose of a human name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameUse {
    /// Official name.
    Official,
}

impl NameUse {
    /// Convert to FHIR wire format string.
    fn to_wire(self) -> &'static str {
        match self {
            NameUse::Official => "official",
        }
    }

    /// Parse from FHIR wire format string.
    fn from_wire(s: &str) -> Option<Self> {
        match s {
            "official" => Some(NameUse::Official),
            _ => None,
        }
    }
}

/// A coded concept (FHIR `Coding`).
///
/// `system` and `code` are absent for free-text labels such as the general
/// "no specific condition" label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Coding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    pub display: String,
}

impl Coding {
    /// A coding with system, code and display all present.
    pub fn coded(system: &str, code: &str, display: &str) -> Self {
        Self {
            system: Some(system.to_string()),
            code: Some(code.to_string()),
            display: display.to_string(),
        }
    }

    /// A display-only coding.
    pub fn text(display: &str) -> Self {
        Self {
            system: None,
            code: None,
            display: display.to_string(),
        }
    }
}

/// Domain-level carrier for patient data (flat structure).
///
/// The wire format supports multiple names; this flat structure carries the first
/// (primary) name only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatientData {
    /// Logical id of the resource.
    pub id: String,

    /// Purpose of the name. Only `official` is modelled; other uses read as `None`.
    pub use_type: Option<NameUse>,

    /// Family name (surname).
    pub family: Option<String>,

    /// Given names.
    pub given: Vec<String>,

    pub gender: Option<Gender>,

    pub birth_date: Option<NaiveDate>,

    /// Age in whole years at the time the resource was produced.
    pub age: Option<u32>,

    pub condition: Option<Coding>,

    pub last_visit_date: Option<NaiveDate>,
}

// ============================================================================
// Public Patient operations
// ============================================================================

/// Patient resource operations.
///
/// This is a zero-sized type used for namespacing patient-related operations.
pub struct Patient;

impl Patient {
    /// Parse a patient resource from JSON text.
    ///
    /// This uses `serde_path_to_error` to surface a best-effort "path" (e.g. `name[0].family`)
    /// to the failing field when the JSON does not match the wire schema.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError`] if:
    /// - the JSON does not match the wire schema (unknown keys, wrong types),
    /// - resourceType is not "Patient".
    pub fn parse(json_text: &str) -> FhirResult<PatientData> {
        let deserializer = &mut serde_json::Deserializer::from_str(json_text);

        let wire = match serde_path_to_error::deserialize::<_, PatientResource>(deserializer) {
            Ok(parsed) => parsed,
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                let path = if path.is_empty() || path == "." {
                    "<root>"
                } else {
                    path.as_str()
                };
                return Err(FhirError::Translation(format!(
                    "Patient schema mismatch at {path}: {source}"
                )));
            }
        };

        Self::from_resource(wire)
    }

    /// Convert a wire resource into the flat domain type.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::InvalidInput`] if resourceType is not "Patient", or
    /// [`FhirError::Translation`] if the gender value is unknown.
    pub fn from_resource(wire: PatientResource) -> FhirResult<PatientData> {
        if wire.resource_type != "Patient" {
            return Err(FhirError::InvalidInput(format!(
                "Expected resourceType 'Patient', got '{}'",
                wire.resource_type
            )));
        }

        let gender = wire
            .gender
            .as_deref()
            .map(|g| g.parse::<Gender>().map_err(FhirError::Translation))
            .transpose()?;

        let first_name = wire.name.into_iter().next();
        let (use_type, family, given) = match first_name {
            Some(n) => (
                n.use_type.as_deref().and_then(NameUse::from_wire),
                n.family,
                n.given,
            ),
            None => (None, None, Vec::new()),
        };

        Ok(PatientData {
            id: wire.id,
            use_type,
            family,
            given,
            gender,
            birth_date: wire.birth_date,
            age: wire.age,
            condition: wire.condition,
            last_visit_date: wire.last_visit_date,
        })
    }

    /// Build the wire resource for a flat domain patient.
    pub fn to_resource(data: &PatientData) -> PatientResource {
        let name = if data.use_type.is_some() || data.family.is_some() || !data.given.is_empty()
        {
            vec![HumanNameWire {
                use_type: data.use_type.map(|u| u.to_wire().to_string()),
                family: data.family.clone(),
                given: data.given.clone(),
            }]
        } else {
            vec![]
        };

        PatientResource {
            resource_type: "Patient".to_string(),
            id: data.id.clone(),
            name,
            gender: data.gender.map(|g| g.as_str().to_string()),
            birth_date: data.birth_date,
            age: data.age,
            condition: data.condition.clone(),
            last_visit_date: data.last_visit_date,
        }
    }

    /// Render a patient resource as JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError`] if serialisation fails.
    pub fn render(data: &PatientData) -> FhirResult<String> {
        serde_json::to_string(&Self::to_resource(data))
            .map_err(|e| FhirError::Translation(format!("Failed to serialise patient: {e}")))
    }
}

// ============================================================================
// Wire types
// ============================================================================

/// Wire representation of a patient resource.
///
/// This is the exact structure that is serialised into a Bundle entry.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PatientResource {
    #[serde(rename = "resourceType")]
    pub resource_type: String,

    pub id: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    name: Vec<HumanNameWire>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    #[serde(rename = "birthDate", default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Coding>,

    #[serde(
        rename = "lastVisitDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_visit_date: Option<NaiveDate>,
}

/// Wire representation of a human name.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct HumanNameWire {
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    use_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    family: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    given: Vec<String>,
}
