use axum::{
    http::{StatusCode, Uri, header::LOCATION},
    response::IntoResponse
};

/// Where every redirect points.
pub const REDIRECT_TARGET: &str = "https://www.youtube.com/";

pub async fn redirect(uri: Uri) -> impl IntoResponse {
    tracing::info!(path = %uri, "redirecting to {}", REDIRECT_TARGET);
    (StatusCode::FOUND, [(LOCATION, REDIRECT_TARGET)])
}
