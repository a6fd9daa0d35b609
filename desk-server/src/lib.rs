//! Desk Server - 客户/服务请求/预约管理后端
//!
//! # 架构概述
//!
//! - **统计** (`statistics`): 按周/月/年分桶，并按状态/类型交叉统计
//! - **认证** (`auth`): JWT 认证 + 权限判定 (失败即拒绝)
//! - **数据** (`db`): 内存记录存储，可从 JSON 种子文件加载
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! desk-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── auth/          # JWT 认证、权限
//! ├── api/           # HTTP 路由和处理器
//! ├── statistics/    # 统计聚合
//! ├── db/            # 记录存储
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod statistics;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService, PermissionEvaluator};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境: 加载 .env 并初始化日志
///
/// 日志参数直接读环境变量，此时 [`Config`] 尚未加载。
pub fn setup_environment() {
    // .env 不存在时忽略
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_json = std::env::var("LOG_JSON").is_ok_and(|v| v == "true" || v == "1");
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_json, log_dir.as_deref());
}

pub fn print_banner() {
    println!(
        r#"
    ____            __
   / __ \___  _____/ /__
  / / / / _ \/ ___/ //_/
 / /_/ /  __(__  ) ,<
/_____/\___/____/_/|_|
    "#
    );
}
