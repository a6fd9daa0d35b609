//! Permissions API Handlers

use axum::Json;
use axum::extract::{Extension, State};
use serde::{Deserialize, Serialize};
use shared::ApiResponse;

use crate::auth::CurrentUser;
use crate::auth::permissions::{ADMIN_ONLY_PERMISSIONS, ALL_PERMISSIONS};
use crate::core::ServerState;
use crate::db::PermissionSet;
use crate::utils::ok;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionCatalog {
    pub permissions: &'static [&'static str],
    pub admin_only: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckMode {
    #[default]
    Any,
    All,
}

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub permissions: Vec<String>,
    #[serde(default)]
    pub mode: CheckMode,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub granted: bool,
}

/// GET /api/permissions - 可配置权限目录
pub async fn catalog() -> Json<ApiResponse<PermissionCatalog>> {
    ok(PermissionCatalog {
        permissions: ALL_PERMISSIONS,
        admin_only: ADMIN_ONLY_PERMISSIONS,
    })
}

/// GET /api/permissions/me - 当前用户的有效权限
///
/// 与权限判定同一规则：管理员返回 `all`，停用或未知用户返回空集。
pub async fn mine(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Json<ApiResponse<PermissionSet>> {
    ok(state.permissions.effective_permissions(current_user.id).await)
}

/// POST /api/permissions/check - 判定当前用户是否拥有给定权限
pub async fn check(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CheckRequest>,
) -> Json<ApiResponse<CheckResponse>> {
    let evaluator = &state.permissions;
    let granted = match payload.mode {
        CheckMode::Any => {
            evaluator
                .check_user_has_any_permission(current_user.id, payload.permissions.as_slice())
                .await
        }
        CheckMode::All => {
            evaluator
                .check_user_has_all_permissions(current_user.id, payload.permissions.as_slice())
                .await
        }
    };

    tracing::debug!(
        user_id = current_user.id,
        mode = ?payload.mode,
        requested = payload.permissions.len(),
        granted,
        "Permission self-check"
    );

    ok(CheckResponse { granted })
}
