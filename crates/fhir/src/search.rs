//! FHIR search request model.
//!
//! A [`SearchRequest`] is an ordered list of `name=value` parameters against one
//! resource type. Parameters may repeat (two `birthdate` bounds form a range), so they
//! are kept as a list rather than a map.

use chrono::NaiveDate;
use serde::Serialize;
use url::form_urlencoded;

/// Comparison prefix for ordered search values (dates, numbers).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchPrefix {
    Gt,
    Ge,
    Le,
}

impl SearchPrefix {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchPrefix::Gt => "gt",
            SearchPrefix::Ge => "ge",
            SearchPrefix::Le => "le",
        }
    }
}

/// One `name=value` search parameter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchParam {
    pub name: String,
    pub value: String,
}

/// An ordered FHIR search against a single resource type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(into = "SearchRequestWire")]
pub struct SearchRequest {
    resource_type: String,
    parameters: Vec<SearchParam>,
}

impl SearchRequest {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            parameters: Vec::new(),
        }
    }

    /// Append a raw parameter.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parameters.push(SearchParam {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Append a date parameter with a comparison prefix, e.g. `birthdate=le1975-10-17`.
    pub fn push_date(&mut self, name: impl Into<String>, prefix: SearchPrefix, date: NaiveDate) {
        self.push(
            name,
            format!("{}{}", prefix.as_str(), date.format("%Y-%m-%d")),
        );
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn parameters(&self) -> &[SearchParam] {
        &self.parameters
    }

    /// All values supplied for `name`, in order.
    pub fn values(&self, name: &str) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|p| p.name == name)
            .map(|p| p.value.as_str())
            .collect()
    }

    /// Relative search URL with form-urlencoded parameters.
    ///
    /// With no parameters this is just the resource type.
    pub fn url(&self) -> String {
        if self.parameters.is_empty() {
            return self.resource_type.clone();
        }
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for p in &self.parameters {
            serializer.append_pair(&p.name, &p.value);
        }
        format!("{}?{}", self.resource_type, serializer.finish())
    }
}

#[derive(Serialize)]
struct SearchRequestWire {
    #[serde(rename = "resourceType")]
    resource_type: String,
    parameters: Vec<SearchParam>,
    url: String,
}

impl From<SearchRequest> for SearchRequestWire {
    fn from(req: SearchRequest) -> Self {
        let url = req.url();
        Self {
            resource_type: req.resource_type,
            parameters: req.parameters,
            url,
        }
    }
}
