use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// 凭据错误或未登录
    #[error("{0}")]
    Authentication(&'static str),

    /// 不是资源的所有者
    #[error("Unauthorized")]
    Authorization,

    #[error("Not found")]
    NotFound,

    /// 分数越界或请求格式错误
    #[error("{0}")]
    Validation(String),

    /// 唯一约束或外键约束失败
    #[error("{0}")]
    Integrity(String),

    #[error("Database error: {0}")]
    Database(DbErr),

    #[error("Password hashing error: {0}")]
    Password(#[from] bcrypt::BcryptError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Authorization => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::Integrity(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_)
            | AppError::Password(_)
            | AppError::Io(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg))
            | Some(SqlErr::ForeignKeyConstraintViolation(msg)) => AppError::Integrity(msg),
            _ => match err {
                // 实体层校验（before_save）以 Custom 形式抛出
                DbErr::Custom(msg) => AppError::Validation(msg),
                other => AppError::Database(other),
            },
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Validation(msg) | AppError::Integrity(msg) => json!({ "errors": [msg] }),
            AppError::Database(_)
            | AppError::Password(_)
            | AppError::Io(_)
            | AppError::Internal(_) => {
                log::error!("{}", self);
                json!({ "error": "Internal server error" })
            }
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
