//! Statistics aggregation
//!
//! Fetched records are bucketed into calendar periods ([`aggregator`]), then
//! each bucket is cross-tabulated by status/type ([`enrich`]). [`reports`]
//! wires the domain records to both steps.
//!
//! Everything here is synchronous and pure given a reference date; records
//! without a usable date are skipped, never reported as errors.

pub mod aggregator;
pub mod enrich;
pub mod period;
pub mod reports;

pub use aggregator::{
    bucket_by_period, generate_monthly_stats, generate_monthly_stats_at, generate_weekly_stats,
    generate_weekly_stats_at, generate_yearly_stats, generate_yearly_stats_at,
};
pub use enrich::{Classifier, ClassifierGroup, EnrichedStat, conversion_rate, enrich_with_cross_tab};
pub use period::{Granularity, MAX_LOOKBACK, StatPeriod, normalize_lookback, week_key};
