use std::str::FromStr;
use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(level: &str) -> Result<Self, Self::Err> {
        match level.to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            "off" => Ok(LogLevel::Off),
            other => Err(format!("无效的日志级别: {}", other)),
        }
    }
}

/// 初始化 env_logger
///
/// `level` 作为默认级别，`RUST_LOG` 存在时以其为准。
/// 重复调用是无害的（例如测试里多次初始化）。
pub fn init_logger(level: LogLevel) {
    let _ = env_logger::Builder::new()
        .filter_level(level.level_filter())
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
}

/// 在配置加载之前初始化日志，级别取自 `LOG_LEVEL`
pub fn init_logger_from_env() {
    let level = std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(LogLevel::Info);
    init_logger(level);
}

/// 请求日志中间件：`METHOD path -> status (ms)`
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    log::info!(
        "{} {} -> {} ({} ms)",
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}
