use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use axum_extra::extract::cookie::SignedCookieJar;

use crate::database::dto::{LoginRequest, UserView};
use crate::database::service;
use crate::error::AppError;
use crate::session::{end_session, session_user, start_session};
use crate::state::AppState;

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(SignedCookieJar, Json<UserView>), AppError> {
    let Json(credentials) = payload?;
    let user = service::login(&state.db, &credentials.name, &credentials.password).await?;

    let jar = start_session(jar, user.id, state.config.cookie_secure);
    Ok((jar, Json(UserView::from(user))))
}

/// DELETE /logout
pub async fn logout(jar: SignedCookieJar) -> (StatusCode, SignedCookieJar) {
    (StatusCode::NO_CONTENT, end_session(jar))
}

/// GET /check_session
pub async fn check_session(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Json<UserView>, AppError> {
    let user = service::current_user(&state.db, session_user(&jar)).await?;
    Ok(Json(UserView::from(user)))
}
