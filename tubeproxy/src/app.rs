use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer
};

use crate::config::Config;
use crate::handlers::{api, redirect};
use crate::rate_limit::{self, RateLimiter};
use crate::state::AppState;

pub fn router(state: AppState, config: &Config) -> Router {
    let limiter = Arc::new(RateLimiter::new(
        config.rate_limit_max,
        config.rate_limit_window,
        config.trust_proxy_headers
    ));

    let api = Router::new()
        .route("/info", get(api::info))
        .route("/download", get(api::download))
        .route("/health", get(api::health))
        .layer(middleware::from_fn_with_state(limiter, rate_limit::enforce));

    let static_files = ServeDir::new(&config.static_dir)
        .fallback(ServeFile::new(config.static_dir.join("index.html")));

    Router::new()
        .nest("/api", api)
        .route("/r", get(redirect::redirect))
        .fallback_service(static_files)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Router used in simple mode: every request is redirected.
pub fn redirect_only_router() -> Router {
    Router::new()
        .fallback(redirect::redirect)
        .layer(TraceLayer::new_for_http())
}
