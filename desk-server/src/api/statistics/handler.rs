//! Statistics API Handlers

use axum::Json;
use axum::extract::{Extension, Query, State};
use serde::{Deserialize, Serialize};
use shared::ApiResponse;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::{FindAllQuery, RecordPage};
use crate::statistics::reports;
use crate::statistics::{EnrichedStat, Granularity};
use crate::utils::time::today_utc;
use crate::utils::{AppResult, ok};

// ============================================================================
// Query Parameters
// ============================================================================

/// Both fields are free-form; anything unusable falls back to defaults
#[derive(Debug, Default, Deserialize)]
pub struct StatisticsQuery {
    pub period: Option<String>,
    pub lookback: Option<String>,
}

impl StatisticsQuery {
    /// `(granularity, lookback)`; lookback `0` means "granularity default"
    ///
    /// Defaults and the upper cap are applied later by
    /// [`normalize_lookback`](crate::statistics::normalize_lookback).
    pub fn resolve(&self) -> (Granularity, i64) {
        let granularity = self
            .period
            .as_deref()
            .and_then(Granularity::parse)
            .unwrap_or_default();
        let lookback = self
            .lookback
            .as_deref()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .unwrap_or(0);
        (granularity, lookback)
    }
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResponse {
    pub granularity: Granularity,
    pub periods: Vec<EnrichedStat>,
    /// Records counted across all periods
    pub total: u64,
    /// Records fetched for aggregation
    pub sampled: u64,
    /// Whether the fetch limit cut the record set short
    pub truncated: bool,
}

impl StatisticsResponse {
    fn new<T>(granularity: Granularity, periods: Vec<EnrichedStat>, page: &RecordPage<T>) -> Self {
        let sampled = page.data.len() as u64;
        Self {
            granularity,
            total: periods.iter().map(|p| p.period.count).sum(),
            periods,
            sampled,
            truncated: page.total > sampled,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewStats {
    pub customers: u64,
    pub active_customers: u64,
    pub requests: u64,
    /// Requests whose status is `converted`; the per-period `converted`
    /// figure instead counts requests linked to a customer
    pub requests_with_converted_status: u64,
    pub appointments: u64,
    pub scheduled_appointments: u64,
}

// ============================================================================
// Handlers
// ============================================================================

fn fetch_query(state: &ServerState) -> FindAllQuery {
    FindAllQuery::with_limit(state.config.stats_fetch_limit)
}

/// GET /api/statistics/customers
pub async fn customers(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<StatisticsQuery>,
) -> AppResult<Json<ApiResponse<StatisticsResponse>>> {
    let (granularity, lookback) = query.resolve();
    tracing::info!(
        user_id = current_user.id,
        granularity = granularity.as_str(),
        lookback,
        "Building customer statistics"
    );

    let page = state.db.customers.find_all(fetch_query(&state)).await?;
    let periods = reports::customer_stats(&page.data, granularity, lookback, today_utc());

    Ok(ok(StatisticsResponse::new(granularity, periods, &page)))
}

/// GET /api/statistics/requests
pub async fn requests(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<StatisticsQuery>,
) -> AppResult<Json<ApiResponse<StatisticsResponse>>> {
    let (granularity, lookback) = query.resolve();
    tracing::info!(
        user_id = current_user.id,
        granularity = granularity.as_str(),
        lookback,
        "Building request statistics"
    );

    let page = state.db.requests.find_all(fetch_query(&state)).await?;
    let periods = reports::request_stats(&page.data, granularity, lookback, today_utc());

    Ok(ok(StatisticsResponse::new(granularity, periods, &page)))
}

/// GET /api/statistics/appointments
pub async fn appointments(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<StatisticsQuery>,
) -> AppResult<Json<ApiResponse<StatisticsResponse>>> {
    let (granularity, lookback) = query.resolve();
    tracing::info!(
        user_id = current_user.id,
        granularity = granularity.as_str(),
        lookback,
        "Building appointment statistics"
    );

    let page = state.db.appointments.find_all(fetch_query(&state)).await?;
    let periods = reports::appointment_stats(&page.data, granularity, lookback, today_utc());

    Ok(ok(StatisticsResponse::new(granularity, periods, &page)))
}

/// GET /api/statistics/overview - 各类记录总数
pub async fn overview(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<OverviewStats>>> {
    let db = &state.db;
    let stats = OverviewStats {
        customers: db.customers.count(None).await?,
        active_customers: db.customers.count(Some("active")).await?,
        requests: db.requests.count(None).await?,
        requests_with_converted_status: db.requests.count(Some("converted")).await?,
        appointments: db.appointments.count(None).await?,
        scheduled_appointments: db.appointments.count(Some("scheduled")).await?,
    };
    Ok(ok(stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(period: Option<&str>, lookback: Option<&str>) -> StatisticsQuery {
        StatisticsQuery {
            period: period.map(String::from),
            lookback: lookback.map(String::from),
        }
    }

    #[test]
    fn test_resolve_defaults() {
        assert_eq!(query(None, None).resolve(), (Granularity::Month, 0));
        assert_eq!(query(Some("fortnight"), Some("abc")).resolve(), (Granularity::Month, 0));
    }

    #[test]
    fn test_resolve_values() {
        assert_eq!(query(Some("week"), Some(" 8 ")).resolve(), (Granularity::Week, 8));
        assert_eq!(query(Some("year"), Some("-2")).resolve(), (Granularity::Year, -2));
        assert_eq!(query(Some("month"), Some("99999")).resolve(), (Granularity::Month, 99999));
    }
}
