use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sea_orm::DatabaseConnection;

use crate::config::Config;
use crate::session::session_key;

/// 每个请求共享的上下文：连接池、Cookie 签名密钥与配置
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub key: Key,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        let key = session_key(config.session_secret.as_deref());
        Self {
            db,
            key,
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}
