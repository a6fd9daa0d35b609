//! 认证授权模块
//!
//! 提供 JWT 认证、权限判定和中间件：
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentUser`] - 当前用户上下文
//! - [`PermissionEvaluator`] - 权限判定 (fail-closed)
//! - [`require_auth`] - 认证中间件
//! - [`require_permission`] / [`require_any_permission`] - 权限检查中间件

pub mod evaluator;
pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod permissions;

pub use evaluator::{PermissionEvaluator, parse_user_id};
pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{CurrentUserExt, require_any_permission, require_auth, require_permission};
