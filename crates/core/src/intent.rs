//! Structured intent extracted from a free-text query.
//!
//! A [`FilterSet`] is immutable once built. Every predicate is optional; an empty
//! filter set matches every patient.

use crate::constants::{GENERAL_CONDITION_LABEL, MAX_AGE, RESOURCE_TYPE};
use crate::generator::Record;
use nlq_types::Gender;
use std::fmt;
use std::ops::RangeInclusive;

/// What the caller asked the service to do with the matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Action {
    #[default]
    Show,
    Find,
    /// Only the number of matches is wanted.
    Count,
    /// An explicit number of results was requested ("List 3 patients ...").
    List(u32),
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Show => "show",
            Action::Find => "find",
            Action::Count => "count",
            Action::List(_) => "list",
        }
    }

    pub fn limit(self) -> Option<u32> {
        match self {
            Action::List(n) => Some(n),
            _ => None,
        }
    }
}

/// Age predicate. Range bounds are inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgeFilter {
    Gt(u32),
    Lt(u32),
    Range { min: u32, max: u32 },
}

impl AgeFilter {
    /// Build a range, ordering the bounds.
    pub fn range(a: u32, b: u32) -> Self {
        AgeFilter::Range {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn operator(&self) -> &'static str {
        match self {
            AgeFilter::Gt(_) => "gt",
            AgeFilter::Lt(_) => "lt",
            AgeFilter::Range { .. } => "range",
        }
    }

    pub fn contains(&self, age: u32) -> bool {
        match *self {
            AgeFilter::Gt(v) => age > v,
            AgeFilter::Lt(v) => age < v,
            AgeFilter::Range { min, max } => (min..=max).contains(&age),
        }
    }

    /// The ages in `0..=MAX_AGE` that satisfy the predicate, or `None` if there are none.
    pub fn admissible(&self) -> Option<RangeInclusive<u32>> {
        let (lo, hi) = match *self {
            AgeFilter::Gt(v) => (v.checked_add(1)?, MAX_AGE),
            AgeFilter::Lt(v) => (0, v.checked_sub(1)?.min(MAX_AGE)),
            AgeFilter::Range { min, max } => (min, max.min(MAX_AGE)),
        };
        (lo <= hi).then_some(lo..=hi)
    }
}

impl fmt::Display for AgeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgeFilter::Gt(v) => write!(f, "age > {v}"),
            AgeFilter::Lt(v) => write!(f, "age < {v}"),
            AgeFilter::Range { min, max } => write!(f, "{min} <= age <= {max}"),
        }
    }
}

/// The fixed condition vocabulary, with ICD-10-CM codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Condition {
    Diabetes,
    Hypertension,
    Depression,
    HeartDisease,
    Asthma,
    Copd,
}

impl Condition {
    /// Vocabulary order; earlier entries win when a query names several.
    pub const ALL: [Condition; 6] = [
        Condition::Diabetes,
        Condition::Hypertension,
        Condition::Depression,
        Condition::HeartDisease,
        Condition::Asthma,
        Condition::Copd,
    ];

    /// Short canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Condition::Diabetes => "diabetes",
            Condition::Hypertension => "hypertension",
            Condition::Depression => "depression",
            Condition::HeartDisease => "heart disease",
            Condition::Asthma => "asthma",
            Condition::Copd => "copd",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Condition::Diabetes => "E11.9",
            Condition::Hypertension => "I10",
            Condition::Depression => "F32.9",
            Condition::HeartDisease => "I25.9",
            Condition::Asthma => "J45.9",
            Condition::Copd => "J44.1",
        }
    }

    /// Canonical display label.
    pub fn display(self) -> &'static str {
        match self {
            Condition::Diabetes => "Type 2 diabetes mellitus",
            Condition::Hypertension => "Essential hypertension",
            Condition::Depression => "Major depressive disorder",
            Condition::HeartDisease => "Chronic ischemic heart disease",
            Condition::Asthma => "Asthma",
            Condition::Copd => "Chronic obstructive pulmonary disease",
        }
    }

    /// Regex alternation of the keywords that name this condition.
    pub(crate) fn pattern(self) -> &'static str {
        match self {
            Condition::Diabetes => r"\b(?:diabetes|diabetics?)\b",
            Condition::Hypertension => {
                r"\b(?:hypertension|hypertensive|high\s+blood\s+pressure)\b"
            }
            Condition::Depression => r"\b(?:depression|depressed)\b",
            Condition::HeartDisease => r"\bheart\s+disease\b",
            Condition::Asthma => r"\b(?:asthma|asthmatics?)\b",
            Condition::Copd => r"\b(?:copd|chronic\s+obstructive\s+pulmonary\s+disease)\b",
        }
    }
}

/// Label for an optional condition, falling back to the general label.
pub fn condition_label(condition: Option<Condition>) -> &'static str {
    condition.map_or(GENERAL_CONDITION_LABEL, Condition::display)
}

/// Qualifier words that shape the FHIR search but not record generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Modifier {
    All,
    Active,
    Recent,
}

impl Modifier {
    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::All => "all",
            Modifier::Active => "active",
            Modifier::Recent => "recent",
        }
    }
}

/// The structured predicates derived from one query.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FilterSet {
    pub action: Action,
    pub age: Option<AgeFilter>,
    pub gender: Option<Gender>,
    pub condition: Option<Condition>,
    pub modifiers: Vec<Modifier>,
}

impl FilterSet {
    pub fn resource_type(&self) -> &'static str {
        RESOURCE_TYPE
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    /// True when no predicate is present.
    pub fn is_unfiltered(&self) -> bool {
        self.age.is_none() && self.gender.is_none() && self.condition.is_none()
    }

    /// Whether `record` satisfies every predicate present in this filter set.
    pub fn is_satisfied_by(&self, record: &Record) -> bool {
        self.age.map_or(true, |f| f.contains(record.age))
            && self.gender.map_or(true, |g| g == record.gender)
            && self.condition.map_or(true, |c| record.condition == Some(c))
    }
}
