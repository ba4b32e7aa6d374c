use axum::{
    body::Body,
    extract::{Query, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Json, Response}
};
use serde::{Deserialize, Serialize};
use tokio_stream::StreamExt;

use crate::download::{BEST_FORMAT_ID, DownloadPlan};
use crate::error::AppError;
use crate::formats::{PresentedFormat, present_formats};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InfoQuery {
    url: Option<String>
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    url: Option<String>,
    format: Option<String>
}

#[derive(Debug, Serialize)]
pub struct InfoResponse {
    title: String,
    thumbnail: Option<String>,
    uploader: Option<String>,
    duration: Option<String>,
    formats: Vec<PresentedFormat>
}

fn required_url(url: Option<String>) -> Result<String, AppError> {
    url.map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::bad_request("Missing url parameter"))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[tracing::instrument(skip(state))]
pub async fn info(
    State(state): State<AppState>,
    Query(query): Query<InfoQuery>
) -> Result<Json<InfoResponse>, AppError> {
    let url = required_url(query.url)?;

    let info = state
        .tool
        .video_info(&url)
        .await
        .map_err(|e| AppError::internal(format!("Failed to fetch info for {url}: {e}")))?;

    let formats = present_formats(&info.formats);
    tracing::info!("Found {} formats for {}", formats.len(), info.title);

    Ok(Json(InfoResponse {
        thumbnail: info.best_thumbnail().map(String::from),
        uploader: info.uploader_name().map(String::from),
        duration: info.duration_string.clone(),
        title: info.title,
        formats
    }))
}

#[tracing::instrument(skip(state))]
pub async fn download(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>
) -> Result<Response, AppError> {
    let url = required_url(query.url)?;
    let format_id = query
        .format
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| BEST_FORMAT_ID.to_string());

    let info = state
        .tool
        .video_info(&url)
        .await
        .map_err(|e| AppError::internal(format!("Failed to fetch info for {url}: {e}")))?;

    let plan = DownloadPlan::new(&info, &format_id);

    let mut media = state
        .tool
        .stream(&url, &plan.options)
        .map_err(|e| AppError::internal(format!("Failed to start download of {url}: {e}")))?;

    // Headers are only committed once yt-dlp has produced its first bytes.
    let first = match media.next().await {
        Some(Ok(chunk)) => chunk,
        Some(Err(e)) => {
            return Err(AppError::internal(format!("Download of {url} failed: {e}")));
        }
        None => {
            return Err(AppError::internal(format!("Download of {url} produced no data")));
        }
    };

    tracing::info!(
        filename = %plan.filename,
        format = %format_id,
        content_length = ?plan.content_length,
        "Streaming download"
    );

    let body = async_stream::stream! {
        yield Ok::<_, std::io::Error>(first);

        while let Some(chunk) = media.next().await {
            match chunk {
                Ok(bytes) => yield Ok(bytes),
                Err(e) => {
                    tracing::error!(url = %url, "Download stream ended early: {}", e);
                    break;
                }
            }
        }
    };

    let disposition = HeaderValue::from_str(&plan.content_disposition())
        .map_err(|e| AppError::internal(format!("Invalid Content-Disposition: {e}")))?;

    let mut response = Body::from_stream(body).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(plan.kind.content_type()));
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    if let Some(length) = plan.content_length {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    }

    Ok(response)
}
