//! Translation of a [`FilterSet`] into the equivalent FHIR search request.
//!
//! Age predicates become `birthdate` bounds relative to `today`:
//! a person is older than `v` exactly when born on or before `today - (v + 1) years`,
//! and younger than `v` exactly when born after `today - v years`.

use crate::constants::RECENT_MODIFIER_DAYS;
use crate::generator::years_before;
use crate::intent::{Action, AgeFilter, FilterSet, Modifier};
use chrono::{Duration, NaiveDate};
use fhir::{SearchPrefix, SearchRequest, ICD10_CM_SYSTEM};

/// Build the FHIR search that corresponds to `filters`, evaluated on `today`.
pub fn to_search(filters: &FilterSet, today: NaiveDate) -> SearchRequest {
    let mut search = SearchRequest::new(filters.resource_type());

    if let Some(age) = filters.age {
        match age {
            AgeFilter::Gt(v) => {
                search.push_date(
                    "birthdate",
                    SearchPrefix::Le,
                    years_before(today, v.saturating_add(1)),
                );
            }
            AgeFilter::Lt(v) => {
                search.push_date("birthdate", SearchPrefix::Gt, years_before(today, v));
            }
            AgeFilter::Range { min, max } => {
                search.push_date("birthdate", SearchPrefix::Le, years_before(today, min));
                search.push_date(
                    "birthdate",
                    SearchPrefix::Gt,
                    years_before(today, max.saturating_add(1)),
                );
            }
        }
    }

    if let Some(gender) = filters.gender {
        search.push("gender", gender.as_str());
    }

    if let Some(condition) = filters.condition {
        search.push(
            "_has:Condition:patient:code",
            format!("{ICD10_CM_SYSTEM}|{}", condition.code()),
        );
    }

    if filters.has_modifier(Modifier::Active) {
        search.push("_has:Condition:patient:clinical-status", "active");
    }

    if filters.has_modifier(Modifier::Recent) {
        search.push_date(
            "_lastUpdated",
            SearchPrefix::Ge,
            today - Duration::days(RECENT_MODIFIER_DAYS),
        );
    }

    match filters.action {
        Action::Count => search.push("_summary", "count"),
        Action::List(n) => search.push("_count", n.to_string()),
        Action::Show | Action::Find => {}
    }

    search
}
