use std::time::Duration;

use axum::{
    Router,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    middleware,
    routing::{delete, get, patch, post},
};
use tower_http::cors::CorsLayer;

use crate::state::AppState;
use crate::utils::logs::log_requests;

pub mod auth;
pub mod reviews;

/// 组装全部路由
pub fn create_app(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/login", post(auth::login))
        .route("/logout", delete(auth::logout))
        .route("/check_session", get(auth::check_session))
        .route("/reviews", get(reviews::list).post(reviews::create))
        .route("/reviews/{id}", patch(reviews::update).delete(reviews::remove))
        .layer(middleware::from_fn(log_requests));

    if let Some(cors) = state.config.cors_origin.as_deref().and_then(cors_layer) {
        router = router.layer(cors);
    }

    router.with_state(state)
}

/// 允许携带 Cookie 的跨域访问，只放行配置的单一来源
fn cors_layer(origin: &str) -> Option<CorsLayer> {
    let origin = match HeaderValue::from_str(origin) {
        Ok(origin) => origin,
        Err(e) => {
            log::warn!("CORS_ORIGIN 无效，已忽略: {}", e);
            return None;
        }
    };

    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([CONTENT_TYPE])
            .max_age(Duration::from_secs(60 * 60)),
    )
}
