//! Uploaded file downloads.

use axum::body::Body;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use tokio_util::io::ReaderStream;

use crate::error::ApiError;
use crate::AppState;

/// Quote a file name for `Content-Disposition`, dropping characters that
/// cannot appear inside a quoted header value.
fn content_disposition(file_name: &str) -> String {
    let quoted: String = file_name
        .chars()
        .filter(|c| *c != '"' && !c.is_control())
        .collect();
    format!("attachment; filename=\"{}\"", quoted)
}

/// `GET /files/:filename`
pub async fn serve_file(
    State(state): State<AppState>,
    file_name: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(file_name) = file_name.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let served = state.notes.open_file(&file_name).await?;

    let content_type = HeaderValue::from_str(&served.mime_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let disposition = HeaderValue::from_str(&content_disposition(&file_name))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    let body = Body::from_stream(ReaderStream::new(served.blob.reader));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, served.blob.len)
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(body)
        .map_err(|e| ApiError::Internal(notebox_core::Error::Internal(e.to_string())))
}
