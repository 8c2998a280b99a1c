//! 运行配置
//!
//! 全部来自环境变量，缺省值会记录到日志中。

use std::{env, fmt::Display, str::FromStr};

use log::{info, warn};
use thiserror::Error;

use crate::database::connection::default_database_url;
use crate::utils::logs::LogLevel;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("SESSION_SECRET must be at least {min} bytes long")]
    SecretTooShort { min: usize },

    #[error("cannot resolve default database location: {0}")]
    DataDir(String),
}

/// `SESSION_SECRET` 的最小长度（Key::derive_from 的要求）
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub session_secret: Option<String>,
    pub cookie_secure: bool,
    pub cors_origin: Option<String>,
    pub bcrypt_cost: u32,
    pub log_level: LogLevel,
}

impl Config {
    /// 从进程环境变量加载
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 通过任意查找函数加载，便于测试
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = match non_empty(&lookup, "DATABASE_URL") {
            Some(url) => url,
            None => {
                let url = default_database_url().map_err(ConfigError::DataDir)?;
                info!("DATABASE_URL not set, using default: {url}");
                url
            }
        };

        let session_secret = non_empty(&lookup, "SESSION_SECRET");
        match &session_secret {
            Some(secret) if secret.len() < MIN_SECRET_LEN => {
                return Err(ConfigError::SecretTooShort {
                    min: MIN_SECRET_LEN,
                });
            }
            Some(_) => {}
            None => warn!("SESSION_SECRET not set, sessions will not survive a restart"),
        }

        Ok(Self {
            host: try_load(&lookup, "HOST", "0.0.0.0")?,
            port: try_load(&lookup, "PORT", "5555")?,
            database_url,
            db_max_connections: try_load(&lookup, "DB_MAX_CONNECTIONS", "5")?,
            session_secret,
            cookie_secure: try_load(&lookup, "COOKIE_SECURE", "false")?,
            cors_origin: non_empty(&lookup, "CORS_ORIGIN"),
            bcrypt_cost: try_load(&lookup, "BCRYPT_COST", "12")?,
            log_level: try_load(&lookup, "LOG_LEVEL", "info")?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn try_load<F, T>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let value = non_empty(lookup, key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key,
            value: value.clone(),
            reason: e.to_string(),
        }
    })
}
