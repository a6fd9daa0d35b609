//! Cross-tabulation of period buckets
//!
//! Each bucket re-filters the full record collection to its own date range,
//! so enrichments stay independent of each other and of the bucketing pass.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::period::StatPeriod;

/// Where a classifier's count is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierGroup {
    /// `byStatus.<name>`; statuses are mutually exclusive
    Status,
    /// `byType.<name>`; types are mutually exclusive
    Type,
    /// top-level field `<name>`
    Flag,
}

/// Named predicate over a record
pub struct Classifier<'a, T> {
    pub group: ClassifierGroup,
    pub name: &'static str,
    predicate: Box<dyn Fn(&T) -> bool + Send + Sync + 'a>,
}

impl<'a, T> Classifier<'a, T> {
    pub fn new(
        group: ClassifierGroup,
        name: &'static str,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'a,
    ) -> Self {
        Self {
            group,
            name,
            predicate: Box::new(predicate),
        }
    }

    pub fn status(name: &'static str, predicate: impl Fn(&T) -> bool + Send + Sync + 'a) -> Self {
        Self::new(ClassifierGroup::Status, name, predicate)
    }

    pub fn kind(name: &'static str, predicate: impl Fn(&T) -> bool + Send + Sync + 'a) -> Self {
        Self::new(ClassifierGroup::Type, name, predicate)
    }

    pub fn flag(name: &'static str, predicate: impl Fn(&T) -> bool + Send + Sync + 'a) -> Self {
        Self::new(ClassifierGroup::Flag, name, predicate)
    }

    pub fn matches(&self, record: &T) -> bool {
        (self.predicate)(record)
    }
}

/// A [`StatPeriod`] widened with cross-tabulation counts
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedStat {
    #[serde(flatten)]
    pub period: StatPeriod,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub by_status: BTreeMap<&'static str, u64>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub by_type: BTreeMap<&'static str, u64>,
    #[serde(flatten)]
    pub flags: BTreeMap<&'static str, u64>,
    #[serde(flatten)]
    pub rates: BTreeMap<&'static str, f64>,
}

impl EnrichedStat {
    fn new(period: StatPeriod) -> Self {
        Self {
            period,
            by_status: BTreeMap::new(),
            by_type: BTreeMap::new(),
            flags: BTreeMap::new(),
            rates: BTreeMap::new(),
        }
    }

    /// Count of a classifier, `0` when it was never requested
    pub fn count_of(&self, group: ClassifierGroup, name: &str) -> u64 {
        let map = match group {
            ClassifierGroup::Status => &self.by_status,
            ClassifierGroup::Type => &self.by_type,
            ClassifierGroup::Flag => &self.flags,
        };
        map.get(name).copied().unwrap_or(0)
    }

    /// Attach `numerator / count` under `name`
    pub fn with_rate(mut self, name: &'static str, numerator: u64) -> Self {
        self.rates
            .insert(name, conversion_rate(numerator, self.period.count));
        self
    }
}

/// `converted / total`, `0.0` when `total` is zero
pub fn conversion_rate(converted: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    converted as f64 / total as f64
}

/// Attach one count per classifier to every bucket
///
/// Buckets keep their order; every classifier appears in every bucket.
pub fn enrich_with_cross_tab<T, F>(
    buckets: Vec<StatPeriod>,
    records: &[T],
    extract: F,
    classifiers: &[Classifier<'_, T>],
) -> Vec<EnrichedStat>
where
    F: Fn(&T) -> Option<DateTime<Utc>>,
{
    buckets
        .into_iter()
        .map(|bucket| {
            let in_bucket: Vec<&T> = records
                .iter()
                .filter(|&r| extract(r).is_some_and(|dt| bucket.contains(dt.date_naive())))
                .collect();

            let mut stat = EnrichedStat::new(bucket);
            for classifier in classifiers {
                let n = in_bucket.iter().filter(|&&r| classifier.matches(r)).count() as u64;
                let map = match classifier.group {
                    ClassifierGroup::Status => &mut stat.by_status,
                    ClassifierGroup::Type => &mut stat.by_type,
                    ClassifierGroup::Flag => &mut stat.flags,
                };
                *map.entry(classifier.name).or_insert(0) += n;
            }
            stat
        })
        .collect()
}
