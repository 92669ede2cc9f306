//! Synthetic patient records that satisfy a [`FilterSet`].
//!
//! The generator owns no randomness: callers pass an [`Rng`], so a seeded
//! [`rand::rngs::StdRng`] gives reproducible output. Record counts and identities vary
//! with the rng; predicate satisfaction never does.

use crate::config::CoreConfig;
use crate::constants::{MAX_AGE, RECENT_VISIT_DAYS, TYPICAL_AGE_MAX, TYPICAL_AGE_MIN};
use crate::intent::{condition_label, Action, Condition, FilterSet};
use chrono::{Duration, Months, NaiveDate};
use fhir::{Coding, NameUse, PatientData, ICD10_CM_SYSTEM};
use nlq_types::Gender;
use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::RangeInclusive;

const MALE_GIVEN_NAMES: &[&str] = &[
    "John", "Michael", "David", "Chris", "Robert", "James", "Daniel", "Thomas", "Ahmed", "Luis",
];
const FEMALE_GIVEN_NAMES: &[&str] = &[
    "Jane", "Sarah", "Lisa", "Amanda", "Jennifer", "Emily", "Maria", "Aisha", "Grace", "Mei",
];
const FAMILY_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez",
];

/// A synthetic patient. Never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    /// Canonical UUID (32 lowercase hex characters).
    pub id: String,
    pub given: String,
    pub family: String,
    pub age: u32,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    /// `None` means no specific condition; see [`Record::condition_label`].
    pub condition: Option<Condition>,
    pub last_visit_date: NaiveDate,
}

impl Record {
    pub fn name(&self) -> String {
        format!("{} {}", self.given, self.family)
    }

    pub fn condition_label(&self) -> &'static str {
        condition_label(self.condition)
    }

    /// FHIR patient view of this record.
    pub fn to_patient_data(&self) -> PatientData {
        let condition = match self.condition {
            Some(c) => Coding::coded(ICD10_CM_SYSTEM, c.code(), c.display()),
            None => Coding::text(self.condition_label()),
        };

        PatientData {
            id: self.id.clone(),
            use_type: Some(NameUse::Official),
            family: Some(self.family.clone()),
            given: vec![self.given.clone()],
            gender: Some(self.gender),
            birth_date: Some(self.birth_date),
            age: Some(self.age),
            condition: Some(condition),
            last_visit_date: Some(self.last_visit_date),
        }
    }
}

/// Builds record lists for filter sets.
#[derive(Clone, Debug)]
pub struct MockRecordGenerator {
    today: NaiveDate,
    record_count: RangeInclusive<usize>,
    max_list: usize,
}

impl MockRecordGenerator {
    /// A generator whose dates are relative to `today`.
    pub fn new(cfg: &CoreConfig, today: NaiveDate) -> Self {
        Self {
            today,
            record_count: cfg.record_count(),
            max_list: cfg.max_list(),
        }
    }

    /// Generate records that each satisfy every predicate in `filters`.
    ///
    /// `List(n)` yields exactly `n` records (capped by the configured list maximum);
    /// any other action yields a count drawn from the configured range. If the age
    /// predicate admits no human age (for example "under 0") the result is empty.
    pub fn generate<R: Rng + ?Sized>(&self, filters: &FilterSet, rng: &mut R) -> Vec<Record> {
        let Some(ages) = age_bounds(filters) else {
            tracing::debug!("age filter admits no ages, generating no records");
            return Vec::new();
        };

        let count = match filters.action {
            Action::List(n) => (n as usize).min(self.max_list),
            _ => rng.gen_range(self.record_count.clone()),
        };

        (0..count)
            .map(|_| {
                let record = self.record(filters, ages.clone(), rng);
                debug_assert!(filters.is_satisfied_by(&record));
                record
            })
            .collect()
    }

    fn record<R: Rng + ?Sized>(
        &self,
        filters: &FilterSet,
        ages: RangeInclusive<u32>,
        rng: &mut R,
    ) -> Record {
        let age = rng.gen_range(ages);
        let gender = filters
            .gender
            .unwrap_or_else(|| Gender::ALL[rng.gen_range(0..Gender::ALL.len())]);

        let given_names = match gender {
            Gender::Male => MALE_GIVEN_NAMES,
            Gender::Female => FEMALE_GIVEN_NAMES,
        };
        let given = given_names.choose(rng).copied().unwrap_or("Alex");
        let family = FAMILY_NAMES.choose(rng).copied().unwrap_or("Doe");

        let birth_date = self.birth_date_for_age(age, rng);
        let last_visit = self.today - Duration::days(rng.gen_range(0..=RECENT_VISIT_DAYS));

        Record {
            id: uuid::Builder::from_random_bytes(rng.gen())
                .into_uuid()
                .simple()
                .to_string(),
            given: given.to_string(),
            family: family.to_string(),
            age,
            gender,
            birth_date,
            condition: filters.condition,
            last_visit_date: last_visit.max(birth_date),
        }
    }

    /// A birth date on which a person is exactly `age` years old as of `today`.
    fn birth_date_for_age<R: Rng + ?Sized>(&self, age: u32, rng: &mut R) -> NaiveDate {
        let latest = years_before(self.today, age);
        let earliest = years_before(self.today, age + 1) + Duration::days(1);
        let span = (latest - earliest).num_days().max(0);
        latest - Duration::days(rng.gen_range(0..=span))
    }
}

pub(crate) fn years_before(date: NaiveDate, years: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(years.saturating_mul(12)))
        .unwrap_or(NaiveDate::MIN)
}

/// Ages to sample from: the typical band when the filter allows it, otherwise
/// whatever the filter admits.
fn age_bounds(filters: &FilterSet) -> Option<RangeInclusive<u32>> {
    let admissible = match filters.age {
        Some(filter) => filter.admissible()?,
        None => 0..=MAX_AGE,
    };

    let lo = (*admissible.start()).max(TYPICAL_AGE_MIN);
    let hi = (*admissible.end()).min(TYPICAL_AGE_MAX);
    if lo <= hi {
        Some(lo..=hi)
    } else {
        Some(admissible)
    }
}
