//! Serves images held in the ephemeral local upload registry.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Image bytes for a `/uploads/{id}` reference.
pub async fn show(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<impl IntoResponse> {
    let upload = state
        .api()
        .uploads()
        .get(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("upload {id}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, upload.content_type.clone()),
            (header::CACHE_CONTROL, "private, max-age=3600".to_string()),
        ],
        upload.bytes.clone(),
    ))
}
