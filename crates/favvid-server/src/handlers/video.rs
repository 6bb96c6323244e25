use crate::error::{AppError, Result};
use crate::model::{CreateVideoRequest, DeleteVideoResponse, UpdateVideoRequest};
use crate::state::AppState;
use crate::stream::ndjson_response;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use favvid_core::{NewVideo, VideoBookmark, VideoPatch};
use tracing::{debug, info};

pub async fn list_videos_handler(State(state): State<AppState>) -> Result<Json<Vec<VideoBookmark>>> {
    let videos = state.repository().list().await?;
    Ok(Json(videos))
}

/// Streams every video as newline-delimited JSON.
///
/// The collection is read once up front; videos written while the response
/// is streaming are not part of it.
pub async fn stream_videos_handler(State(state): State<AppState>) -> Result<Response> {
    let videos = state.repository().list().await?;
    Ok(ndjson_response(videos))
}

pub async fn create_video_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateVideoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<VideoBookmark>)> {
    let Json(request) = payload?;
    let video = NewVideo::try_from(request)?;

    let created = state.repository().create(video).await?;
    info!(id = %created.id, "video created");

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_video_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<VideoBookmark>> {
    let repository = state.repository();
    let id = repository.parse_id(&id)?;

    repository
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(id.to_string()))
}

pub async fn update_video_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    payload: std::result::Result<Json<UpdateVideoRequest>, JsonRejection>,
) -> Result<Json<VideoBookmark>> {
    let repository = state.repository();
    let id = repository.parse_id(&id)?;
    let Json(request) = payload?;
    let patch = VideoPatch::try_from(request)?;
    if patch.is_empty() {
        debug!(id = %id, "empty patch, only stamping updatedAt");
    }

    let updated = repository.update(&id, patch).await?;
    info!(id = %id, "video updated");

    Ok(Json(updated))
}

pub async fn delete_video_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DeleteVideoResponse>> {
    let repository = state.repository();
    let id = repository.parse_id(&id)?;

    let video = repository.delete(&id).await?;
    info!(id = %id, "video deleted");

    Ok(Json(DeleteVideoResponse {
        message: "Video Deleted",
        video,
    }))
}

pub async fn not_found_handler() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Sorry URL Not Found")
}
