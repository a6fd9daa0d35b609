//! Calendar periods

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Bucket size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Week,
    #[default]
    Month,
    Year,
}

impl Granularity {
    /// Number of buckets produced when the caller gives no usable lookback
    pub fn default_lookback(&self) -> u32 {
        match self {
            Self::Week | Self::Month => 12,
            Self::Year => 3,
        }
    }

    /// Lenient parse for query strings; unknown values yield `None`
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "week" | "weekly" => Some(Self::Week),
            "month" | "monthly" => Some(Self::Month),
            "year" | "yearly" => Some(Self::Year),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

/// Largest number of buckets a single call produces
pub const MAX_LOOKBACK: u32 = 520;

/// Coerce a requested lookback to a bucket count in `1..=MAX_LOOKBACK`
///
/// Non-positive values fall back to the granularity default.
pub fn normalize_lookback(requested: i64, granularity: Granularity) -> u32 {
    if requested <= 0 {
        return granularity.default_lookback();
    }
    u32::try_from(requested).map_or(MAX_LOOKBACK, |n| n.min(MAX_LOOKBACK))
}

/// One time bucket
///
/// `start_date..=end_date` is inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatPeriod {
    pub period: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub count: u64,
    pub year: i32,
    #[serde(skip)]
    pub granularity: Granularity,
}

impl StatPeriod {
    /// Empty bucket of the period containing `date`
    pub fn containing(date: NaiveDate, granularity: Granularity) -> Option<Self> {
        match granularity {
            Granularity::Week => {
                let start = date.checked_sub_signed(Duration::days(i64::from(
                    date.weekday().num_days_from_monday(),
                )))?;
                let end = start.checked_add_signed(Duration::days(6))?;
                let iso = date.iso_week();
                Some(Self::new(format!("Week {}", iso.week()), start, end, iso.year(), granularity))
            }
            Granularity::Month => {
                let start = date.with_day(1)?;
                let end = start.checked_add_months(Months::new(1))?.pred_opt()?;
                Some(Self::new(start.format("%b %Y").to_string(), start, end, start.year(), granularity))
            }
            Granularity::Year => {
                let start = NaiveDate::from_ymd_opt(date.year(), 1, 1)?;
                let end = NaiveDate::from_ymd_opt(date.year(), 12, 31)?;
                Some(Self::new(date.year().to_string(), start, end, date.year(), granularity))
            }
        }
    }

    fn new(
        period: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
        year: i32,
        granularity: Granularity,
    ) -> Self {
        Self {
            period,
            start_date,
            end_date,
            count: 0,
            year,
            granularity,
        }
    }

    /// The bucket immediately before this one
    pub fn previous(&self) -> Option<Self> {
        Self::containing(self.start_date.pred_opt()?, self.granularity)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Sortable key: `2024-W05`, `2024-01` or `2024`
    pub fn key(&self) -> String {
        match self.granularity {
            Granularity::Week => week_key(&self.period, self.year)
                .unwrap_or_else(|| self.start_date.format("%G-W%V").to_string()),
            Granularity::Month => self.start_date.format("%Y-%m").to_string(),
            Granularity::Year => self.year.to_string(),
        }
    }
}

/// `"Week 5"` + 2024 → `"2024-W05"`
///
/// Returns `None` when the label is not a week label or the number is not an
/// ISO week (1–53).
pub fn week_key(label: &str, year: i32) -> Option<String> {
    let label = label.trim();
    let (prefix, number) = label.split_at_checked(4)?;
    if !prefix.eq_ignore_ascii_case("week") {
        return None;
    }
    let week: u32 = number.trim().parse().ok()?;
    if !(1..=53).contains(&week) {
        return None;
    }
    Some(format!("{year}-W{week:02}"))
}
