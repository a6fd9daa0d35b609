use thiserror::Error;

use crate::auth::JwtError;
use crate::db::RepoError;

/// 启动与运行期错误 (请求级错误见 [`AppError`](crate::AppError))
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(#[from] JwtError),

    #[error("数据初始化失败: {0}")]
    Storage(#[from] RepoError),

    #[error("网络错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("服务启动失败: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
