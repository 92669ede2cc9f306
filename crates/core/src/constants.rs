//! Constants used throughout the NLQ core crate.

/// The only resource type queries are answered against.
pub const RESOURCE_TYPE: &str = "Patient";

/// Default REST bind address.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:5050";

/// Default lower bound on the number of generated records.
pub const DEFAULT_MIN_RECORDS: usize = 5;

/// Default upper bound on the number of generated records.
pub const DEFAULT_MAX_RECORDS: usize = 15;

/// Default cap applied to "list N patients" requests.
pub const DEFAULT_MAX_LIST: usize = 100;

/// Ages are preferably drawn from this band when the filter allows it.
pub const TYPICAL_AGE_MIN: u32 = 25;
pub const TYPICAL_AGE_MAX: u32 = 85;

/// Hard upper bound on any generated age.
pub const MAX_AGE: u32 = 120;

/// Last visit dates fall within this many days before today.
pub const RECENT_VISIT_DAYS: i64 = 365;

/// Window used by the `recent` modifier when translating to a FHIR search.
pub const RECENT_MODIFIER_DAYS: i64 = 30;

/// Condition label used when the query names no condition.
pub const GENERAL_CONDITION_LABEL: &str = "General health review";

/// Sample queries offered to clients.
pub const EXAMPLE_QUERIES: &[&str] = &[
    "Show me all diabetic patients over 50",
    "Find female patients with hypertension",
    "List patients under 30 with depression",
    "Show male patients with heart disease over 65",
    "Get all active asthma patients",
];
