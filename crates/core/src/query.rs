//! Query service: validation, extraction, search translation and record generation.

use crate::config::CoreConfig;
use crate::extract::IntentExtractor;
use crate::generator::{MockRecordGenerator, Record};
use crate::intent::{Action, AgeFilter, FilterSet};
use crate::search::to_search;
use crate::QueryResult;
use api_shared::{AgeFilterRes, ConditionRes, ExtractedIntent, QueryRes};
use chrono::{NaiveDate, Utc};
use fhir::{Bundle, Patient, SearchRequest, ICD10_CM_SYSTEM};
use nlq_types::NonEmptyText;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// Everything produced for one query.
#[derive(Clone, Debug)]
pub struct ResultSet {
    pub query: NonEmptyText,
    pub filters: FilterSet,
    pub search: SearchRequest,
    pub records: Vec<Record>,
}

impl ResultSet {
    /// The records as a FHIR `searchset` Bundle.
    ///
    /// A `count` action yields a total-only Bundle, as FHIR does for `_summary=count`.
    pub fn bundle(&self) -> Bundle {
        if self.filters.action == Action::Count {
            return Bundle::count_only(self.records.len() as u64);
        }
        Bundle::searchset(
            self.records
                .iter()
                .map(|r| Patient::to_resource(&r.to_patient_data()))
                .collect(),
        )
    }

    pub fn to_response(&self) -> QueryRes {
        QueryRes {
            original_query: self.query.to_string(),
            extracted_intent: intent_to_wire(&self.filters),
            fhir_query: self.search.clone(),
            fhir_response: self.bundle(),
        }
    }
}

/// Wire view of a filter set.
pub fn intent_to_wire(filters: &FilterSet) -> ExtractedIntent {
    ExtractedIntent {
        action: filters.action.as_str().to_string(),
        limit: filters.action.limit(),
        resource_type: filters.resource_type().to_string(),
        conditions: filters
            .condition
            .map(|c| ConditionRes {
                name: c.name().to_string(),
                code: c.code().to_string(),
                display: c.display().to_string(),
                system: ICD10_CM_SYSTEM.to_string(),
            })
            .into_iter()
            .collect(),
        age_filter: filters.age.map(|age| {
            let (value, min, max) = match age {
                AgeFilter::Gt(v) | AgeFilter::Lt(v) => (Some(v), None, None),
                AgeFilter::Range { min, max } => (None, Some(min), Some(max)),
            };
            AgeFilterRes {
                operator: age.operator().to_string(),
                value,
                min,
                max,
            }
        }),
        gender: filters.gender.map(|g| g.as_str().to_string()),
        modifiers: filters
            .modifiers
            .iter()
            .map(|m| m.as_str().to_string())
            .collect(),
    }
}

/// Stateless query pipeline. Cheap to clone; holds only immutable configuration.
#[derive(Clone)]
pub struct QueryService {
    cfg: Arc<CoreConfig>,
    extractor: IntentExtractor,
}

impl QueryService {
    /// # Errors
    ///
    /// Returns [`crate::QueryError::Pattern`] if the extractor's patterns fail to compile.
    pub fn new(cfg: Arc<CoreConfig>) -> QueryResult<Self> {
        Ok(Self {
            cfg,
            extractor: IntentExtractor::new()?,
        })
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    /// Validate `raw` and extract its filter set, without generating records.
    ///
    /// # Errors
    ///
    /// Returns [`crate::QueryError::InvalidQuery`] for empty or whitespace-only text.
    pub fn extract(&self, raw: &str) -> QueryResult<FilterSet> {
        let query = NonEmptyText::new(raw)?;
        Ok(self.extractor.extract(query.as_str()))
    }

    /// Run the full pipeline for `raw` as of today.
    ///
    /// The rng is seeded from the configured seed when present, otherwise from entropy.
    ///
    /// # Errors
    ///
    /// Returns [`crate::QueryError::InvalidQuery`] for empty or whitespace-only text;
    /// no extraction is attempted in that case.
    pub fn process(&self, raw: &str) -> QueryResult<ResultSet> {
        let mut rng = match self.cfg.seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.process_with(raw, &mut rng, Utc::now().date_naive())
    }

    /// Run the full pipeline with an explicit rng and reference date.
    ///
    /// # Errors
    ///
    /// See [`QueryService::process`].
    pub fn process_with<R: Rng + ?Sized>(
        &self,
        raw: &str,
        rng: &mut R,
        today: NaiveDate,
    ) -> QueryResult<ResultSet> {
        let query = match NonEmptyText::new(raw) {
            Ok(q) => q,
            Err(e) => {
                tracing::warn!("rejected query: {}", e);
                return Err(e.into());
            }
        };

        let filters = self.extractor.extract(query.as_str());
        tracing::debug!(
            action = filters.action.as_str(),
            age = ?filters.age,
            gender = ?filters.gender,
            condition = ?filters.condition,
            "extracted intent"
        );

        let search = to_search(&filters, today);
        let records = MockRecordGenerator::new(&self.cfg, today).generate(&filters, rng);
        tracing::info!(total = records.len(), url = %search.url(), "generated records");

        Ok(ResultSet {
            query,
            filters,
            search,
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{Condition, Modifier};
    use crate::QueryError;
    use nlq_types::{Gender, TextError};

    fn service() -> QueryService {
        QueryService::new(Arc::new(CoreConfig::default())).expect("service builds")
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).expect("valid date")
    }

    fn run(text: &str, seed: u64) -> ResultSet {
        service()
            .process_with(text, &mut StdRng::seed_from_u64(seed), today())
            .expect("query processes")
    }

    #[test]
    fn empty_query_is_a_validation_failure() {
        for text in ["", "   ", "\n\t"] {
            let err = service()
                .process_with(text, &mut StdRng::seed_from_u64(0), today())
                .expect_err("blank query rejected");
            assert!(err.is_validation());
            match err {
                QueryError::InvalidQuery(TextError::Empty) => {}
                other => panic!("expected InvalidQuery(Empty), got {other:?}"),
            }
        }
        assert!(service().extract("").is_err());
    }

    #[test]
    fn diabetic_patients_over_fifty() {
        for seed in 0..25 {
            let result = run("Show me all diabetic patients over 50", seed);
            assert_eq!(result.filters.action, Action::Show);
            assert_eq!(result.filters.condition, Some(Condition::Diabetes));
            assert_eq!(result.filters.age, Some(AgeFilter::Gt(50)));
            assert!(!result.records.is_empty());
            for record in &result.records {
                assert!(record.age > 50);
                assert_eq!(record.condition_label(), "Type 2 diabetes mellitus");
            }
        }
    }

    #[test]
    fn trailing_time_range_keeps_age_comparison() {
        for seed in 0..10 {
            let result = run(
                "Show diabetic patients over 50 seen in the last 1-2 years",
                seed,
            );
            assert_eq!(result.filters.age, Some(AgeFilter::Gt(50)));
            assert!(result.records.iter().all(|r| r.age > 50));
        }
    }

    #[test]
    fn impossible_age_yields_no_records() {
        let result = run("patients over 1000", 1);
        assert_eq!(result.filters.age, Some(AgeFilter::Gt(1000)));
        assert!(result.records.is_empty());
        assert_eq!(result.bundle().total, 0);
    }

    #[test]
    fn long_query_is_accepted() {
        let text = format!("Show me all diabetic patients over 50 {}", "x".repeat(2100));
        let result = run(&text, 2);
        assert_eq!(result.filters.age, Some(AgeFilter::Gt(50)));
        assert_eq!(result.filters.condition, Some(Condition::Diabetes));
    }

    #[test]
    fn female_patients_with_hypertension() {
        for seed in 0..25 {
            let result = run("Find female patients with hypertension", seed);
            assert_eq!(result.filters.gender, Some(Gender::Female));
            assert_eq!(result.filters.condition, Some(Condition::Hypertension));
            assert_eq!(result.filters.age, None);
            assert!(result.records.iter().all(|r| r.gender == Gender::Female));
        }
    }

    #[test]
    fn active_asthma_patients_vary_freely() {
        let mut genders = std::collections::HashSet::new();
        let mut ages = std::collections::HashSet::new();
        for seed in 0..25 {
            let result = run("Get all active asthma patients", seed);
            assert_eq!(result.filters.condition, Some(Condition::Asthma));
            assert!(result.filters.has_modifier(Modifier::Active));
            for record in &result.records {
                assert_eq!(record.condition, Some(Condition::Asthma));
                genders.insert(record.gender);
                ages.insert(record.age);
            }
        }
        assert_eq!(genders.len(), 2);
        assert!(ages.len() > 1);
    }

    #[test]
    fn response_shape_matches_contract() {
        let result = run("Show me all diabetic patients over 50", 3);
        let json = serde_json::to_value(result.to_response()).expect("serialise response");

        assert_eq!(json["original_query"], "Show me all diabetic patients over 50");
        let intent = &json["extracted_intent"];
        assert_eq!(intent["action"], "show");
        assert_eq!(intent["resource_type"], "Patient");
        assert_eq!(intent["age_filter"]["operator"], "gt");
        assert_eq!(intent["age_filter"]["value"], 50);
        assert_eq!(intent["conditions"][0]["name"], "diabetes");
        assert_eq!(intent["conditions"][0]["code"], "E11.9");
        assert_eq!(intent["conditions"][0]["display"], "Type 2 diabetes mellitus");
        assert!(intent.get("gender").is_none());

        let bundle = &json["fhir_response"];
        assert_eq!(bundle["resourceType"], "Bundle");
        let entries = bundle["entry"].as_array().expect("entry array");
        assert_eq!(bundle["total"], entries.len());
        for entry in entries {
            assert!(entry["resource"]["age"].as_u64().expect("age") > 50);
            assert_eq!(
                entry["resource"]["condition"]["display"],
                "Type 2 diabetes mellitus"
            );
        }

        assert_eq!(json["fhir_query"]["resourceType"], "Patient");
        assert!(json["fhir_query"]["url"]
            .as_str()
            .expect("url")
            .starts_with("Patient?birthdate=le1975-10-17"));
    }

    #[test]
    fn list_three_patients() {
        let result = run("List 3 patients under 30 with depression", 1);
        assert_eq!(result.filters.action, Action::List(3));
        assert_eq!(result.records.len(), 3);
        assert!(result.records.iter().all(|r| r.age < 30));

        let intent = result.to_response().extracted_intent;
        assert_eq!(intent.action, "list");
        assert_eq!(intent.limit, Some(3));
    }

    #[test]
    fn count_action_returns_total_only() {
        let result = run("How many patients have copd", 1);
        let bundle = result.bundle();
        assert_eq!(bundle.total, result.records.len() as u64);
        assert!(bundle.entry.is_empty());
    }

    #[test]
    fn range_age_filter_on_the_wire() {
        let result = run("patients between 40 and 49", 1);
        let age = result
            .to_response()
            .extracted_intent
            .age_filter
            .expect("age filter present");
        assert_eq!(age.operator, "range");
        assert_eq!((age.value, age.min, age.max), (None, Some(40), Some(49)));
    }

    #[test]
    fn configured_seed_makes_process_repeatable() {
        let cfg = Arc::new(CoreConfig::default().with_seed(Some(77)));
        let service = QueryService::new(cfg).expect("service builds");
        assert_eq!(service.config().seed(), Some(77));
        let a = service.process("Find male patients").expect("processes");
        let b = service.process("Find male patients").expect("processes");
        assert_eq!(a.records, b.records);
    }

    #[test]
    fn unmatched_text_still_produces_records() {
        let result = run("hello there", 5);
        assert!(result.filters.is_unfiltered());
        assert!(!result.records.is_empty());
        assert_eq!(result.search.url(), "Patient");
    }
}
