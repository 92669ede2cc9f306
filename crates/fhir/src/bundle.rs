//! FHIR `Bundle` envelope for search results.

use crate::patient::PatientResource;
use serde::{Deserialize, Serialize};

/// Bundle type. Only the search flavour is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleType {
    Searchset,
}

/// A single entry of a search Bundle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleEntry {
    pub resource: PatientResource,
}

/// Wire representation of a `searchset` Bundle of patients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    #[serde(rename = "resourceType")]
    pub resource_type: String,

    #[serde(rename = "type")]
    pub bundle_type: BundleType,

    /// Number of matches, independent of how many entries are included.
    pub total: u64,

    #[serde(default)]
    pub entry: Vec<BundleEntry>,
}

impl Bundle {
    /// Wrap resources in a searchset Bundle whose `total` is the number of resources.
    pub fn searchset(resources: Vec<PatientResource>) -> Self {
        Self {
            resource_type: "Bundle".to_string(),
            bundle_type: BundleType::Searchset,
            total: resources.len() as u64,
            entry: resources
                .into_iter()
                .map(|resource| BundleEntry { resource })
                .collect(),
        }
    }

    /// A searchset Bundle carrying only a total, as returned for `_summary=count`.
    pub fn count_only(total: u64) -> Self {
        Self {
            resource_type: "Bundle".to_string(),
            bundle_type: BundleType::Searchset,
            total,
            entry: Vec::new(),
        }
    }

    pub fn resources(&self) -> impl Iterator<Item = &PatientResource> {
        self.entry.iter().map(|e| &e.resource)
    }
}
