use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, RuntimeErr};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::config::Config;

/// 默认数据库连接串（由 review-path 解析文件位置）
pub fn default_database_url() -> Result<String, String> {
    let db_path = review_path::get_db_path()?;
    path_to_sqlite_url(&db_path)
}

/// 将文件路径转换为 sqlite 连接 URL
pub fn path_to_sqlite_url(path: &Path) -> Result<String, String> {
    // 使用 `url` crate 安全地构建连接字符串
    let db_url = Url::from_file_path(path)
        .map_err(|_| format!("Invalid database path: {}", path.display()))?;
    Ok(format!("sqlite:{}?mode=rwc", db_url.path()))
}

fn is_memory_url(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// 从 sqlite URL 中取出文件路径，非文件数据库返回 None
fn sqlite_file_path(database_url: &str) -> Option<PathBuf> {
    if is_memory_url(database_url) {
        return None;
    }
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    (!path.is_empty()).then(|| PathBuf::from(path))
}

/// 确保数据库所在目录存在
fn ensure_db_dir_exists(database_url: &str) -> Result<(), String> {
    if let Some(parent) = sqlite_file_path(database_url)
        .as_deref()
        .and_then(Path::parent)
    {
        fs::create_dir_all(parent).map_err(|e| format!("无法创建数据库目录: {}", e))?;
    }
    Ok(())
}

/// Establish a SeaORM database connection.
pub async fn establish_connection(config: &Config) -> Result<DatabaseConnection, DbErr> {
    // 1. 确保数据库所在的目录存在
    ensure_db_dir_exists(&config.database_url).map_err(|e| DbErr::Conn(RuntimeErr::Internal(e)))?;

    // 2. 内存数据库每个连接都是独立的库，只能使用单连接
    let max_connections = if is_memory_url(&config.database_url) {
        1
    } else {
        config.db_max_connections.max(1)
    };

    // 3. 设置连接选项
    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    log::info!(
        "连接数据库: {}（连接池上限 {}）",
        config.database_url,
        max_connections
    );

    // 4. 连接数据库
    Database::connect(options).await
}

/// 关闭数据库连接
pub async fn close_connection(conn: DatabaseConnection) -> Result<(), DbErr> {
    conn.close().await?;
    Ok(())
}
