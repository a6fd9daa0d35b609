//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`permissions`] - 权限目录与权限自检
//! - [`statistics`] - 统计看板

pub mod health;
pub mod permissions;
pub mod statistics;

use axum::{Router, middleware};

use crate::auth::require_auth;
use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResult, ok};

/// Build the API router (without state)
///
/// JWT 认证中间件在 Router 级别应用，`require_auth` 内部会跳过公共路由；
/// 各模块的权限中间件在其内部运行。
pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(permissions::router())
        .merge(statistics::router(state))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
}
