use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::cookie::SignedCookieJar;

use crate::database::dto::{NewReview, ReviewPage, ReviewPatch, ReviewQuery, ReviewView};
use crate::database::service;
use crate::error::AppError;
use crate::session::session_user;
use crate::state::AppState;

/// GET /reviews
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ReviewQuery>, QueryRejection>,
) -> Result<Json<ReviewPage>, AppError> {
    let Query(query) = query?;
    Ok(Json(service::list_reviews(&state.db, &query).await?))
}

/// POST /reviews
pub async fn create(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    payload: Result<Json<NewReview>, JsonRejection>,
) -> Result<(StatusCode, Json<ReviewView>), AppError> {
    let user_id = service::require_session(session_user(&jar))?;
    let Json(review) = payload?;

    let view = service::create_review(&state.db, user_id, review).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// PATCH /reviews/{id}
///
/// 请求体在存在性与所有权检查之后才解析
pub async fn update(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<ReviewPatch>, JsonRejection>,
) -> Result<Json<ReviewView>, AppError> {
    let Path(id) = path.map_err(|_| AppError::NotFound)?;
    let review = service::owned_review(&state.db, id, session_user(&jar)).await?;
    let Json(patch) = payload?;

    Ok(Json(service::update_review(&state.db, review, patch).await?))
}

/// DELETE /reviews/{id}
pub async fn remove(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    path: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = path.map_err(|_| AppError::NotFound)?;
    let review = service::owned_review(&state.db, id, session_user(&jar)).await?;

    service::delete_review(&state.db, review).await?;
    Ok(StatusCode::NO_CONTENT)
}
