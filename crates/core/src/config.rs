//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services.
//! Request handling never reads process-wide environment variables, which keeps behaviour
//! consistent across threads and test harnesses.

use crate::constants::{DEFAULT_MAX_LIST, DEFAULT_MAX_RECORDS, DEFAULT_MIN_RECORDS};
use crate::{QueryError, QueryResult};
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Core configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoreConfig {
    min_records: usize,
    max_records: usize,
    max_list: usize,
    seed: Option<u64>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidConfig`] if `min_records > max_records` or
    /// `max_list` is zero.
    pub fn new(
        min_records: usize,
        max_records: usize,
        max_list: usize,
        seed: Option<u64>,
    ) -> QueryResult<Self> {
        if min_records > max_records {
            return Err(QueryError::InvalidConfig(format!(
                "min_records ({min_records}) cannot exceed max_records ({max_records})"
            )));
        }
        if max_list == 0 {
            return Err(QueryError::InvalidConfig(
                "max_list must be at least 1".into(),
            ));
        }

        Ok(Self {
            min_records,
            max_records,
            max_list,
            seed,
        })
    }

    /// Build a config from raw (optional) environment values, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidConfig`] if a value does not parse or the combination
    /// is invalid.
    pub fn from_env_values(
        min_records: Option<String>,
        max_records: Option<String>,
        max_list: Option<String>,
        seed: Option<String>,
    ) -> QueryResult<Self> {
        Self::new(
            parse_env_value("NLQ_MIN_RECORDS", min_records)?.unwrap_or(DEFAULT_MIN_RECORDS),
            parse_env_value("NLQ_MAX_RECORDS", max_records)?.unwrap_or(DEFAULT_MAX_RECORDS),
            parse_env_value("NLQ_MAX_LIST", max_list)?.unwrap_or(DEFAULT_MAX_LIST),
            parse_env_value("NLQ_SEED", seed)?,
        )
    }

    /// Same as [`CoreConfig::from_env_values`], reading the process environment.
    pub fn from_env() -> QueryResult<Self> {
        Self::from_env_values(
            std::env::var("NLQ_MIN_RECORDS").ok(),
            std::env::var("NLQ_MAX_RECORDS").ok(),
            std::env::var("NLQ_MAX_LIST").ok(),
            std::env::var("NLQ_SEED").ok(),
        )
    }

    /// Returns a copy with the rng seed replaced.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn record_count(&self) -> RangeInclusive<usize> {
        self.min_records..=self.max_records
    }

    pub fn max_list(&self) -> usize {
        self.max_list
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            min_records: DEFAULT_MIN_RECORDS,
            max_records: DEFAULT_MAX_RECORDS,
            max_list: DEFAULT_MAX_LIST,
            seed: None,
        }
    }
}

/// Parse an optional string value.
///
/// `None` or empty/whitespace yields `Ok(None)` so the caller can apply its default.
pub fn parse_env_value<T: FromStr>(name: &str, value: Option<String>) -> QueryResult<Option<T>> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    value
        .map(|v| {
            v.parse::<T>()
                .map_err(|_| QueryError::InvalidConfig(format!("{name} has invalid value '{v}'")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = CoreConfig::from_env_values(None, None, None, None).expect("defaults are valid");
        assert_eq!(cfg, CoreConfig::default());
        assert_eq!(cfg.record_count(), 5..=15);
        assert_eq!(cfg.max_list(), 100);
        assert_eq!(cfg.seed(), None);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let cfg = CoreConfig::from_env_values(Some("  ".into()), None, None, Some("".into()))
            .expect("blank values fall back");
        assert_eq!(cfg, CoreConfig::default());
    }

    #[test]
    fn parses_explicit_values() {
        let cfg = CoreConfig::from_env_values(
            Some("1".into()),
            Some(" 3 ".into()),
            Some("10".into()),
            Some("42".into()),
        )
        .expect("valid values");
        assert_eq!(cfg.record_count(), 1..=3);
        assert_eq!(cfg.max_list(), 10);
        assert_eq!(cfg.seed(), Some(42));
    }

    #[test]
    fn rejects_unparseable_values() {
        let err = CoreConfig::from_env_values(Some("five".into()), None, None, None)
            .expect_err("non-numeric rejected");
        match err {
            QueryError::InvalidConfig(msg) => {
                assert!(msg.contains("NLQ_MIN_RECORDS"));
                assert!(msg.contains("five"));
            }
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn rejects_inverted_record_range() {
        let err = CoreConfig::new(10, 2, 100, None).expect_err("min > max rejected");
        assert!(matches!(err, QueryError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_zero_list_cap() {
        assert!(CoreConfig::new(1, 2, 0, None).is_err());
    }

    #[test]
    fn with_seed_overrides() {
        let cfg = CoreConfig::default().with_seed(Some(9));
        assert_eq!(cfg.seed(), Some(9));
    }
}
