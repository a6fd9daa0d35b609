//! Statistics API 模块 (数据统计)
//!
//! | 路径 | 权限 |
//! |------|------|
//! | /api/statistics/customers | statistics:view 或 customers:view |
//! | /api/statistics/requests | statistics:view 或 requests:view |
//! | /api/statistics/appointments | statistics:view 或 appointments:view |
//! | /api/statistics/overview | statistics:view |

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::{require_any_permission, require_permission};
use crate::core::ServerState;

pub use handler::{OverviewStats, StatisticsQuery, StatisticsResponse};

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new().nest("/api/statistics", routes(state))
}

fn routes(state: &ServerState) -> Router<ServerState> {
    let customers = Router::new()
        .route("/customers", get(handler::customers))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_any_permission(&["statistics:view", "customers:view"]),
        ));

    let requests = Router::new()
        .route("/requests", get(handler::requests))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_any_permission(&["statistics:view", "requests:view"]),
        ));

    let appointments = Router::new()
        .route("/appointments", get(handler::appointments))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_any_permission(&["statistics:view", "appointments:view"]),
        ));

    let overview = Router::new()
        .route("/overview", get(handler::overview))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("statistics:view"),
        ));

    customers.merge(requests).merge(appointments).merge(overview)
}
