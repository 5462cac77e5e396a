//! Client UI entry point.

use axum::extract::State;
use axum::response::Html;
use tracing::warn;

use crate::AppState;

const PLACEHOLDER_INDEX: &str =
    "<h1>Note Taking App</h1><p>Please create static/index.html</p>";

/// `GET /`: the bundled `index.html`, or a placeholder when there is none.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let path = state.static_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html),
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(subsystem = "api", path = %path.display(), error = %e, "Could not read index.html");
            }
            Html(PLACEHOLDER_INDEX.to_string())
        }
    }
}
