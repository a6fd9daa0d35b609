use std::sync::Arc;

use crate::auth::{JwtService, PermissionEvaluator};
use crate::core::{Config, Result};
use crate::db::DbService;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，每个请求克隆一份。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | db | 记录存储 |
/// | jwt_service | JWT 认证服务 |
/// | permissions | 权限判定 (基于 db.users) |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub db: DbService,
    pub jwt_service: Arc<JwtService>,
    pub permissions: PermissionEvaluator,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    pub fn new(config: Config, db: DbService) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let permissions = PermissionEvaluator::new(db.users.clone());

        Self {
            config: Arc::new(config),
            db,
            jwt_service,
            permissions,
        }
    }

    /// 初始化服务器状态：按配置加载初始数据
    pub fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::open(config.seed_file.as_deref())?;
        Ok(Self::new(config.clone(), db))
    }
}
