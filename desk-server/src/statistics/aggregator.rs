//! Period bucketing
//!
//! `generate_*_stats` produce `lookback` consecutive buckets ending with the
//! period that contains today (UTC), oldest first. The `_at` variants take
//! the reference date explicitly.

use chrono::{DateTime, NaiveDate, Utc};

use super::period::{Granularity, StatPeriod, normalize_lookback};
use crate::utils::time::today_utc;

/// Bucket `records` into `lookback` periods ending with the one containing `today`
///
/// `extract` returns `None` for records without a usable date; those are
/// never counted. A non-positive `lookback` falls back to the granularity
/// default; larger values are capped at [`MAX_LOOKBACK`](super::period::MAX_LOOKBACK).
pub fn bucket_by_period<T, F>(
    records: &[T],
    extract: F,
    lookback: i64,
    granularity: Granularity,
    today: NaiveDate,
) -> Vec<StatPeriod>
where
    F: Fn(&T) -> Option<DateTime<Utc>>,
{
    let lookback = normalize_lookback(lookback, granularity) as usize;

    let mut buckets = Vec::with_capacity(lookback);
    let mut cursor = StatPeriod::containing(today, granularity);
    while let Some(bucket) = cursor {
        if buckets.len() == lookback {
            break;
        }
        cursor = bucket.previous();
        buckets.push(bucket);
    }
    buckets.reverse();

    let dates: Vec<NaiveDate> = records
        .iter()
        .filter_map(|r| extract(r).map(|dt| dt.date_naive()))
        .collect();

    for bucket in &mut buckets {
        bucket.count = dates.iter().filter(|d| bucket.contains(**d)).count() as u64;
    }

    if dates.len() < records.len() {
        tracing::debug!(
            skipped = records.len() - dates.len(),
            granularity = granularity.as_str(),
            "Records without a usable date excluded from statistics"
        );
    }

    buckets
}

pub fn generate_weekly_stats<T, F>(records: &[T], extract: F, weeks: i64) -> Vec<StatPeriod>
where
    F: Fn(&T) -> Option<DateTime<Utc>>,
{
    generate_weekly_stats_at(records, extract, weeks, today_utc())
}

pub fn generate_weekly_stats_at<T, F>(
    records: &[T],
    extract: F,
    weeks: i64,
    today: NaiveDate,
) -> Vec<StatPeriod>
where
    F: Fn(&T) -> Option<DateTime<Utc>>,
{
    bucket_by_period(records, extract, weeks, Granularity::Week, today)
}

pub fn generate_monthly_stats<T, F>(records: &[T], extract: F, months: i64) -> Vec<StatPeriod>
where
    F: Fn(&T) -> Option<DateTime<Utc>>,
{
    generate_monthly_stats_at(records, extract, months, today_utc())
}

pub fn generate_monthly_stats_at<T, F>(
    records: &[T],
    extract: F,
    months: i64,
    today: NaiveDate,
) -> Vec<StatPeriod>
where
    F: Fn(&T) -> Option<DateTime<Utc>>,
{
    bucket_by_period(records, extract, months, Granularity::Month, today)
}

pub fn generate_yearly_stats<T, F>(records: &[T], extract: F, years: i64) -> Vec<StatPeriod>
where
    F: Fn(&T) -> Option<DateTime<Utc>>,
{
    generate_yearly_stats_at(records, extract, years, today_utc())
}

pub fn generate_yearly_stats_at<T, F>(
    records: &[T],
    extract: F,
    years: i64,
    today: NaiveDate,
) -> Vec<StatPeriod>
where
    F: Fn(&T) -> Option<DateTime<Utc>>,
{
    bucket_by_period(records, extract, years, Granularity::Year, today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::period::MAX_LOOKBACK;
    use chrono::{Datelike, Months, TimeZone};

    #[derive(Debug)]
    struct Rec {
        at: Option<DateTime<Utc>>,
    }

    fn at(y: i32, m: u32, d: u32) -> Rec {
        Rec {
            at: Some(Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn assert_contiguous(buckets: &[StatPeriod]) {
        for pair in buckets.windows(2) {
            assert!(pair[0].start_date <= pair[0].end_date);
            assert_eq!(pair[0].end_date.succ_opt().unwrap(), pair[1].start_date);
        }
    }

    #[test]
    fn test_exact_bucket_count_for_every_granularity() {
        let today = date(2024, 7, 15);
        for n in 1..=30 {
            let w = generate_weekly_stats_at::<Rec, _>(&[], |r| r.at, n, today);
            let m = generate_monthly_stats_at::<Rec, _>(&[], |r| r.at, n, today);
            let y = generate_yearly_stats_at::<Rec, _>(&[], |r| r.at, n, today);
            assert_eq!(w.len(), n as usize);
            assert_eq!(m.len(), n as usize);
            assert_eq!(y.len(), n as usize);
            assert_contiguous(&w);
            assert_contiguous(&m);
            assert_contiguous(&y);
            // newest bucket holds today
            assert!(w.last().unwrap().contains(today));
            assert!(m.last().unwrap().contains(today));
            assert!(y.last().unwrap().contains(today));
        }
    }

    #[test]
    fn test_non_positive_lookback_uses_defaults() {
        let today = date(2024, 7, 15);
        assert_eq!(generate_weekly_stats_at::<Rec, _>(&[], |r| r.at, 0, today).len(), 12);
        assert_eq!(generate_monthly_stats_at::<Rec, _>(&[], |r| r.at, -4, today).len(), 12);
        assert_eq!(generate_yearly_stats_at::<Rec, _>(&[], |r| r.at, 0, today).len(), 3);
    }

    #[test]
    fn test_oversized_lookback_is_capped() {
        let today = date(2024, 6, 1);
        let cap = MAX_LOOKBACK as usize;

        let years = generate_yearly_stats_at::<Rec, _>(&[], |r| r.at, 600_000, today);
        assert_eq!(years.len(), cap);
        assert_eq!(years[0].period, (2024 - MAX_LOOKBACK as i32 + 1).to_string());
        assert_contiguous(&years);

        let weeks = generate_weekly_stats_at::<Rec, _>(&[], |r| r.at, i64::MAX, today);
        assert_eq!(weeks.len(), cap);
        assert_contiguous(&weeks);
    }

    #[test]
    fn test_twelve_months_over_fifteen_records() {
        let today = date(2024, 12, 10);
        // one record per month going back 0..=13 months, plus one 15 months back
        let mut records: Vec<Rec> = (0..14)
            .map(|i| {
                let d = date(2024, 12, 5).checked_sub_months(Months::new(i)).unwrap();
                at(d.year(), d.month(), d.day())
            })
            .collect();
        records.push(at(2023, 9, 5)); // 15 months back

        let buckets = generate_monthly_stats_at(&records, |r| r.at, 12, today);
        assert_eq!(buckets.len(), 12);
        assert_eq!(buckets[0].period, "Jan 2024");
        assert_eq!(buckets[11].period, "Dec 2024");

        let total: u64 = buckets.iter().map(|b| b.count).sum();
        assert!(total <= 14);
        assert_eq!(total, 12);
        assert!(buckets.iter().all(|b| b.count == 1));
        assert!(
            !buckets
                .iter()
                .any(|b| b.contains(date(2023, 9, 5)))
        );
    }

    #[test]
    fn test_missing_dates_excluded() {
        let today = date(2024, 3, 20);
        let records = vec![at(2024, 3, 1), Rec { at: None }, at(2024, 2, 29), Rec { at: None }];

        let buckets = generate_monthly_stats_at(&records, |r| r.at, 2, today);
        assert_eq!(buckets[0].count, 1);
        assert_eq!(buckets[1].count, 1);
        let total: u64 = buckets.iter().map(|b| b.count).sum();
        assert!(total <= records.len() as u64);
    }

    #[test]
    fn test_sum_equals_len_when_all_in_range() {
        let today = date(2024, 3, 20);
        let records = vec![
            at(2024, 3, 18), // Monday of the current ISO week
            at(2024, 3, 17), // Sunday of the previous week
            at(2024, 3, 11),
            at(2024, 3, 20),
        ];

        let buckets = generate_weekly_stats_at(&records, |r| r.at, 2, today);
        let total: u64 = buckets.iter().map(|b| b.count).sum();
        assert_eq!(total, records.len() as u64);
        assert_eq!(buckets[1].count, 2);
        assert_eq!(buckets[1].period, "Week 12");
        assert_eq!(buckets[1].key(), "2024-W12");
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let today = date(2024, 6, 1);
        let records = vec![
            Rec { at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()) },
            Rec { at: Some(Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap()) },
            Rec { at: Some(Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap()) },
        ];

        let buckets = generate_yearly_stats_at(&records, |r| r.at, 2, today);
        assert_eq!(buckets[0].period, "2023");
        assert_eq!(buckets[0].count, 1);
        assert_eq!(buckets[1].count, 2);
    }
}
