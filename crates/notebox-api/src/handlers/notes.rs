//! Note CRUD handlers.

use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::debug;

use notebox_core::ListNotesRequest;

use crate::error::ApiError;
use crate::services::{CreateNoteInput, UploadedFile};
use crate::AppState;

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::BadRequest(format!("Invalid form data: {}", err.body_text()))
    }
}

/// Collect every part of the creation form before classifying it.
async fn read_create_form(mut multipart: Multipart) -> Result<CreateNoteInput, ApiError> {
    let mut input = CreateNoteInput::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "content" => input.content = Some(field.text().await.map_err(multipart_error)?),
            "link" => input.link = Some(field.text().await.map_err(multipart_error)?),
            "tags" => input.tags = Some(field.text().await.map_err(multipart_error)?),
            "files" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(multipart_error)?;
                input.files.push(UploadedFile {
                    file_name,
                    content_type,
                    data,
                });
            }
            other => debug!(subsystem = "api", field = %other, "Ignoring unknown form field"),
        }
    }

    Ok(input)
}

/// `POST /api/notes`
pub async fn create_note(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let input = read_create_form(multipart).await?;
    let created = state.notes.create(input).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "count": created.len(),
        "notes": created,
    })))
}

/// `GET /api/notes?limit=&offset=&search=`
pub async fn list_notes(
    State(state): State<AppState>,
    query: Result<Query<ListNotesRequest>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(req) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let page = state.notes.list(req).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "notes": page.notes,
        "total": page.total,
        "limit": page.limit,
        "offset": page.offset,
    })))
}

/// `GET /api/notes/:id`
pub async fn get_note(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let note = state.notes.get(id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "note": note,
    })))
}

/// `DELETE /api/notes/:id`
pub async fn delete_note(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    state.notes.delete(id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Note deleted successfully"
    })))
}
