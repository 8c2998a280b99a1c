//! bcrypt 密码哈希
//!
//! bcrypt 是 CPU 密集操作，统一放到 tokio 的阻塞线程池里执行。

use crate::error::AppError;

pub use bcrypt::DEFAULT_COST;

/// bcrypt 允许的最低代价，仅用于测试与种子数据
pub const MIN_COST: u32 = 4;

/// 计算密码哈希（带随机盐）
pub async fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("密码哈希任务失败: {}", e)))?
        .map_err(AppError::from)
}

/// 校验密码与已存哈希是否匹配
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("密码校验任务失败: {}", e)))?
        .map_err(AppError::from)
}
