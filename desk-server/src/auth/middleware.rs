//! 认证中间件
//!
//! 为 JWT 认证和授权提供 Axum 中间件

use std::future::Future;
use std::pin::Pin;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::AppError;
use crate::auth::CurrentUser;
use crate::auth::extractor::authenticate;
use crate::core::ServerState;

type MiddlewareFuture = Pin<Box<dyn Future<Output = Result<Response, AppError>> + Send>>;

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT。
/// 验证成功后将 [`CurrentUser`] 注入请求扩展。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径
/// - `/api/health`
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 Unauthorized |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 | 401 InvalidToken |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // 允许 CORS 预检的 OPTIONS 请求 (跳过认证)
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // 非 API 路由与公共 API 跳过认证
    if !path.starts_with("/api/") || path == "/api/health" {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let user = authenticate(&state.jwt_service, auth_header, req.uri())?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// 权限检查中间件 - 要求特定权限
///
/// 权限判定交给 [`PermissionEvaluator`](crate::auth::PermissionEvaluator)，
/// 查询失败一律拒绝，拒绝事件由其记录。需配合 `from_fn_with_state` 使用：
///
/// ```ignore
/// Router::new()
///     .route("/overview", get(handler::overview))
///     .layer(middleware::from_fn_with_state(state.clone(), require_permission("statistics:view")));
/// ```
///
/// # 错误
///
/// 无权限返回 403 Forbidden
pub fn require_permission(
    permission: &'static str,
) -> impl Fn(State<ServerState>, Request, Next) -> MiddlewareFuture + Clone + Send + Sync + 'static
{
    move |State(state): State<ServerState>, req: Request, next: Next| {
        Box::pin(async move {
            let user_id = req.current_user()?.id;

            if !state
                .permissions
                .check_user_permission(user_id, permission)
                .await
            {
                return Err(AppError::forbidden(format!(
                    "Permission denied: {}",
                    permission
                )));
            }

            Ok(next.run(req).await)
        })
    }
}

/// 权限检查中间件 - 满足任一权限即可
pub fn require_any_permission(
    permissions: &'static [&'static str],
) -> impl Fn(State<ServerState>, Request, Next) -> MiddlewareFuture + Clone + Send + Sync + 'static
{
    move |State(state): State<ServerState>, req: Request, next: Next| {
        Box::pin(async move {
            let user_id = req.current_user()?.id;

            if !state
                .permissions
                .check_user_has_any_permission(user_id, permissions)
                .await
            {
                return Err(AppError::forbidden(format!(
                    "Permission denied: one of {}",
                    permissions.join(", ")
                )));
            }

            Ok(next.run(req).await)
        })
    }
}

/// 从请求中提取 CurrentUser 的扩展方法
pub trait CurrentUserExt {
    /// 从请求扩展中获取 CurrentUser
    ///
    /// # 错误
    ///
    /// 未认证返回 401 Unauthorized
    fn current_user(&self) -> Result<&CurrentUser, AppError>;
}

impl CurrentUserExt for Request {
    fn current_user(&self) -> Result<&CurrentUser, AppError> {
        self.extensions()
            .get::<CurrentUser>()
            .ok_or(AppError::unauthorized())
    }
}
