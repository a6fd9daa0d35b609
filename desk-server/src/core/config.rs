use std::path::PathBuf;

use crate::auth::{JwtConfig, JwtError};
use crate::db::repository::DEFAULT_FETCH_LIMIT;

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 日志格式 |
/// | LOG_DIR | - | 日志目录 (存在时写入滚动文件) |
/// | SEED_FILE | - | 初始数据 JSON 文件 |
/// | STATS_FETCH_LIMIT | 1000 | 统计时单次读取的最大记录数 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | JWT_SECRET | - | JWT 密钥 (生产环境必填) |
///
/// # 示例
///
/// ```ignore
/// HTTP_PORT=8080 SEED_FILE=./seed.json cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    /// 初始数据文件
    pub seed_file: Option<PathBuf>,
    /// 统计接口读取记录的上限
    pub stats_fetch_limit: usize,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    /// JWT 认证配置
    pub jwt: JwtConfig,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值。仅 JWT 配置可能失败。
    pub fn from_env() -> Result<Self, JwtError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let jwt = JwtConfig::from_env(environment == "production")?;

        Ok(Self {
            http_port: env_parse("HTTP_PORT").unwrap_or(3000),
            environment,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_parse("LOG_JSON").unwrap_or(false),
            log_dir: std::env::var("LOG_DIR").ok(),
            seed_file: std::env::var("SEED_FILE").ok().map(PathBuf::from),
            stats_fetch_limit: env_parse("STATS_FETCH_LIMIT")
                .filter(|n: &usize| *n > 0)
                .unwrap_or(DEFAULT_FETCH_LIMIT),
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS").unwrap_or(30000),
            jwt,
        })
    }

    /// 测试用配置：固定 JWT 密钥，不读取环境变量
    pub fn for_testing(jwt_secret: impl Into<String>) -> Self {
        Self {
            http_port: 0,
            environment: "test".into(),
            log_level: "debug".into(),
            log_json: false,
            log_dir: None,
            seed_file: None,
            stats_fetch_limit: DEFAULT_FETCH_LIMIT,
            request_timeout_ms: 30000,
            jwt: JwtConfig::new(jwt_secret),
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
