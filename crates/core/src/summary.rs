//! Display aggregates over a record list: gender counts and an age histogram.
//!
//! Works on any slice, including an empty one, and makes no assumption about which
//! predicates produced it.

use crate::generator::Record;
use nlq_types::Gender;
use std::collections::BTreeMap;

/// Width of an age bucket, in years.
pub const AGE_BUCKET_YEARS: u32 = 10;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResultSummary {
    pub total: usize,
    pub male: usize,
    pub female: usize,
    /// Bucket start age -> number of records.
    pub age_buckets: BTreeMap<u32, usize>,
}

impl ResultSummary {
    pub fn from_records(records: &[Record]) -> Self {
        let mut summary = ResultSummary {
            total: records.len(),
            ..ResultSummary::default()
        };

        for record in records {
            match record.gender {
                Gender::Male => summary.male += 1,
                Gender::Female => summary.female += 1,
            }
            let bucket = record.age / AGE_BUCKET_YEARS * AGE_BUCKET_YEARS;
            *summary.age_buckets.entry(bucket).or_default() += 1;
        }

        summary
    }

    /// Buckets as `("50-59", count)` pairs in ascending age order.
    pub fn labelled_buckets(&self) -> Vec<(String, usize)> {
        self.age_buckets
            .iter()
            .map(|(start, count)| {
                (
                    format!("{start}-{}", start + AGE_BUCKET_YEARS - 1),
                    *count,
                )
            })
            .collect()
    }

    /// Mean age, or `None` for an empty list.
    pub fn mean_age(records: &[Record]) -> Option<f64> {
        if records.is_empty() {
            return None;
        }
        let sum: u64 = records.iter().map(|r| u64::from(r.age)).sum();
        Some(sum as f64 / records.len() as f64)
    }
}
