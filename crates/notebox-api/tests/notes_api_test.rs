//! End-to-end tests for the HTTP API.
//!
//! Each test spawns the full router on an ephemeral port, backed by a SQLite
//! file and blob directory inside a temp dir.

use std::path::PathBuf;

use notebox_api::{router, AppState, ServerConfig};
use notebox_db::{Database, FilesystemBlobStore};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::Value;
use tempfile::TempDir;

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    upload_dir: PathBuf,
    static_dir: PathBuf,
    _dir: TempDir,
}

impl TestServer {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create(&self, form: Form) -> reqwest::Response {
        self.client
            .post(self.url("/api/notes"))
            .multipart(form)
            .send()
            .await
            .expect("request failed")
    }

    async fn create_ok(&self, form: Form) -> Value {
        let response = self.create(form).await;
        assert_eq!(response.status(), StatusCode::OK);
        response.json().await.unwrap()
    }

    async fn get_json(&self, path: &str) -> (StatusCode, Value) {
        let response = self.client.get(self.url(path)).send().await.unwrap();
        let status = response.status();
        (status, response.json().await.unwrap())
    }

    fn blob_count(&self) -> usize {
        std::fs::read_dir(&self.upload_dir).unwrap().count()
    }
}

async fn spawn_test_server() -> TestServer {
    spawn_test_server_with_limit(ServerConfig::default().max_upload_bytes).await
}

async fn spawn_test_server_with_limit(max_upload_bytes: usize) -> TestServer {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = ServerConfig {
        database_url: format!("sqlite://{}", dir.path().join("notes.db").display()),
        upload_dir: dir.path().join("uploads"),
        static_dir: dir.path().join("static"),
        max_upload_bytes,
        ..ServerConfig::default()
    };

    let db = Database::connect(&config.database_url).await.unwrap();
    db.migrate().await.unwrap();
    let blobs = FilesystemBlobStore::new(&config.upload_dir);
    blobs.validate().await.unwrap();
    std::fs::create_dir_all(&config.static_dir).unwrap();

    let app = router(
        AppState::new(db, blobs, &config),
        config.max_request_bytes,
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{}", addr),
        client: reqwest::Client::new(),
        upload_dir: config.upload_dir,
        static_dir: config.static_dir,
        _dir: dir,
    }
}

fn text_form(content: &str) -> Form {
    Form::new().text("content", content.to_string())
}

fn file_part(name: &str, data: &[u8]) -> Part {
    Part::bytes(data.to_vec()).file_name(name.to_string())
}

#[tokio::test]
async fn test_create_and_get_text_note() {
    let server = spawn_test_server().await;

    let body = server.create_ok(text_form("hello")).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 1);
    assert_eq!(body["notes"][0]["note_type"], "text");
    assert_eq!(body["notes"][0]["message"], "Note saved successfully");

    let id = body["notes"][0]["id"].as_i64().unwrap();
    let (status, body) = server.get_json(&format!("/api/notes/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["note"]["note_type"], "text");
    assert_eq!(body["note"]["content"], "hello");
    assert_eq!(body["note"]["created_at"], body["note"]["updated_at"]);
}

#[tokio::test]
async fn test_create_link_note() {
    let server = spawn_test_server().await;

    let body = server
        .create_ok(Form::new().text("link", "http://example.com"))
        .await;
    assert_eq!(body["notes"][0]["message"], "Link saved successfully");

    let id = body["notes"][0]["id"].as_i64().unwrap();
    let (_, body) = server.get_json(&format!("/api/notes/{}", id)).await;
    assert_eq!(body["note"]["note_type"], "link");
    assert_eq!(body["note"]["content"], "http://example.com");
}

#[tokio::test]
async fn test_upload_file_and_download_it() {
    let server = spawn_test_server().await;

    let body = server
        .create_ok(Form::new().part("files", file_part("a.txt", b"hi")))
        .await;
    assert_eq!(body["notes"][0]["note_type"], "file");
    assert_eq!(body["notes"][0]["file_name"], "a.txt");
    assert_eq!(body["notes"][0]["message"], "File uploaded successfully");

    let id = body["notes"][0]["id"].as_i64().unwrap();
    let (_, body) = server.get_json(&format!("/api/notes/{}", id)).await;
    let note = &body["note"];
    assert_eq!(note["file_name"], "a.txt");
    assert!(note["mime_type"].as_str().unwrap().starts_with("text/plain"));

    let file_path = note["file_path"].as_str().unwrap();
    let blob_name = file_path.strip_prefix("uploads/").unwrap();
    assert_eq!(
        std::fs::read(server.upload_dir.join(blob_name)).unwrap(),
        b"hi"
    );

    let response = server
        .client
        .get(server.url(&format!("/files/{}", blob_name)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert!(response.headers()["content-disposition"]
        .to_str()
        .unwrap()
        .contains(blob_name));
    assert_eq!(response.bytes().await.unwrap().as_ref(), b"hi");
}

#[tokio::test]
async fn test_upload_multiple_files_with_caption_and_tags() {
    let server = spawn_test_server().await;

    let form = Form::new()
        .text("content", "scans")
        .text("tags", "paperwork")
        .part("files", file_part("one.txt", b"1"))
        .part("files", file_part("two.txt", b"2"));
    let body = server.create_ok(form).await;
    assert_eq!(body["count"], 2);
    assert_eq!(server.blob_count(), 2);

    let (_, body) = server.get_json("/api/notes?search=paperwork").await;
    let notes = body["notes"].as_array().unwrap();
    assert_eq!(notes.len(), 2);
    assert!(notes.iter().all(|n| n["content"] == "scans"));
}

#[tokio::test]
async fn test_create_with_nothing_is_bad_request() {
    let server = spawn_test_server().await;

    let response = server.create(Form::new().text("tags", "lonely")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "No content, link, or files provided");
}

#[tokio::test]
async fn test_create_without_multipart_is_bad_request() {
    let server = spawn_test_server().await;

    let response = server
        .client
        .post(server.url("/api/notes"))
        .json(&serde_json::json!({"content": "hello"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_oversized_upload_is_rejected_without_side_effects() {
    let server = spawn_test_server_with_limit(16).await;

    let response = server
        .create(Form::new().part("files", file_part("big.bin", &[0u8; 17])))
        .await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("big.bin"));

    let (_, health) = server.get_json("/api/health").await;
    assert_eq!(health["note_count"], 0);
    assert_eq!(server.blob_count(), 0);
}

#[tokio::test]
async fn test_delete_removes_note_and_blob() {
    let server = spawn_test_server().await;

    let body = server
        .create_ok(Form::new().part("files", file_part("a.txt", b"hi")))
        .await;
    let id = body["notes"][0]["id"].as_i64().unwrap();
    assert_eq!(server.blob_count(), 1);

    let response = server
        .client
        .delete(server.url(&format!("/api/notes/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Note deleted successfully");

    assert_eq!(server.blob_count(), 0);
    let (status, _) = server.get_json(&format!("/api/notes/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, list) = server.get_json("/api/notes").await;
    assert!(list["notes"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_missing_note_is_not_found() {
    let server = spawn_test_server().await;

    let response = server
        .client
        .delete(server.url("/api/notes/12345"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Note not found");
}

#[tokio::test]
async fn test_get_with_non_numeric_id_is_bad_request() {
    let server = spawn_test_server().await;
    let response = server
        .client
        .get(server.url("/api/notes/abc"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_by_tag() {
    let server = spawn_test_server().await;

    server
        .create_ok(
            Form::new()
                .text("content", "quarterly numbers")
                .text("tags", "finance,q3"),
        )
        .await;
    server.create_ok(text_form("shopping list")).await;

    let (status, body) = server.get_json("/api/notes?search=finance").await;
    assert_eq!(status, StatusCode::OK);
    let notes = body["notes"].as_array().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["content"], "quarterly numbers");
    assert_eq!(body["total"], 2);

    let (_, body) = server.get_json("/api/notes?search=absent").await;
    assert!(body["notes"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_pagination_newest_first() {
    let server = spawn_test_server().await;

    for content in ["oldest", "middle", "newest"] {
        server.create_ok(text_form(content)).await;
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let (status, body) = server.get_json("/api/notes?limit=1&offset=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["total"], 3);
    assert_eq!(body["limit"], 1);
    assert_eq!(body["offset"], 1);
    let notes = body["notes"].as_array().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["content"], "middle");

    let (_, body) = server.get_json("/api/notes").await;
    assert_eq!(body["limit"], 100);
    assert_eq!(body["offset"], 0);
    assert_eq!(body["notes"][0]["content"], "newest");
}

#[tokio::test]
async fn test_list_with_negative_limit_is_bad_request() {
    let server = spawn_test_server().await;
    let (status, _) = server.get_json("/api/notes?limit=-5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_file_traversal_is_rejected() {
    let server = spawn_test_server().await;

    // Encoded slashes keep the client from normalising the path; the router
    // decodes them into a single `filename` segment.
    let response = server
        .client
        .get(server.url("/files/..%2F..%2Fetc%2Fpasswd"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid filename");
}

#[tokio::test]
async fn test_dot_file_names_are_rejected() {
    let server = spawn_test_server().await;
    std::fs::write(server.upload_dir.join(".a.txt.tmp"), b"half").unwrap();

    let (status, body) = server.get_json("/files/.a.txt.tmp").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid filename");
}

#[tokio::test]
async fn test_upload_keeps_unusual_extension() {
    let server = spawn_test_server().await;

    let body = server
        .create_ok(Form::new().part("files", file_part("backup.tar-gz", b"zz")))
        .await;
    let id = body["notes"][0]["id"].as_i64().unwrap();
    let (_, body) = server.get_json(&format!("/api/notes/{}", id)).await;

    let file_path = body["note"]["file_path"].as_str().unwrap();
    assert!(file_path.starts_with("uploads/"));
    assert!(file_path.ends_with(".tar-gz"));

    let blob_name = file_path.strip_prefix("uploads/").unwrap();
    let response = server
        .client
        .get(server.url(&format!("/files/{}", blob_name)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.bytes().await.unwrap().as_ref(), b"zz");
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let server = spawn_test_server().await;
    let (status, body) = server.get_json("/files/nothing-here.txt").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "File not found");
}

#[tokio::test]
async fn test_health() {
    let server = spawn_test_server().await;
    server.create_ok(text_form("one")).await;

    let (status, body) = server.get_json("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["note_count"], 1);
    assert!(chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_index_placeholder_and_bundle() {
    let server = spawn_test_server().await;

    let html = server
        .client
        .get(server.url("/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("Note Taking App"));

    std::fs::write(server.static_dir.join("index.html"), "<h1>Notes UI</h1>").unwrap();
    std::fs::write(server.static_dir.join("app.js"), "console.log(1);").unwrap();

    let html = server
        .client
        .get(server.url("/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(html, "<h1>Notes UI</h1>");

    let response = server
        .client
        .get(server.url("/static/app.js"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "console.log(1);");
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let server = spawn_test_server().await;
    let response = server
        .client
        .get(server.url("/api/health"))
        .send()
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}
