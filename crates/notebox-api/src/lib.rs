//! notebox-api - HTTP API for the notebox note service.
//!
//! Routes:
//! - `POST /api/notes`, `GET /api/notes`
//! - `GET /api/notes/:id`, `DELETE /api/notes/:id`
//! - `GET /files/:filename`
//! - `GET /api/health`
//! - `GET /` and `/static/*` for the client UI

pub mod config;
pub mod error;
pub mod handlers;
pub mod services;

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use uuid::Uuid;

use notebox_db::{Database, FilesystemBlobStore};

pub use config::ServerConfig;
pub use error::ApiError;
pub use services::NoteService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub notes: NoteService,
    /// Directory holding the client UI bundle.
    pub static_dir: Arc<PathBuf>,
}

impl AppState {
    /// Wire the note service to the SQLite store and the blob directory.
    pub fn new(db: Database, blobs: FilesystemBlobStore, config: &ServerConfig) -> Self {
        let notes = NoteService::new(Arc::new(db.notes.clone()), Arc::new(blobs))
            .with_max_file_bytes(config.max_upload_bytes);
        Self {
            db,
            notes,
            static_dir: Arc::new(config.static_dir.clone()),
        }
    }
}

#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Build the application router.
///
/// `max_request_bytes` bounds a whole request body; the per-file limit is
/// enforced by the note service.
pub fn router(state: AppState, max_request_bytes: usize) -> Router {
    let static_files = ServeDir::new(state.static_dir.as_path());

    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/api/notes",
            get(handlers::list_notes).post(handlers::create_note),
        )
        .route(
            "/api/notes/:id",
            get(handlers::get_note).delete(handlers::delete_note),
        )
        .route("/api/health", get(handlers::health_check))
        .route("/files/:filename", get(handlers::serve_file))
        .nest_service("/static", static_files)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        // Any origin: the server is meant for devices on the local network
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_request_bytes))
        .with_state(state)
}
