//! Permissions API 模块
//!
//! 所有已登录用户可用；只返回调用者自己的判定结果。

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/permissions", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::catalog))
        .route("/me", get(handler::mine))
        .route("/check", post(handler::check))
}
