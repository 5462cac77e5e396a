//! Note creation, listing, lookup, deletion, and file serving.
//!
//! Creation classifies the request in a fixed order, first match wins:
//! files (when the first file has a name), then `link`, then `content`.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use tracing::{debug, info, warn};

use notebox_core::{
    defaults, detect_content_type, guess_mime_from_name, is_safe_blob_name, storage_name_for,
    BlobReader, BlobStore, CreatedNote, Error, ListNotesRequest, ListNotesResponse, NewNote, Note,
    NoteRepository, NoteType, Result,
};

/// One uploaded file from a creation request.
#[derive(Debug, Clone, Default)]
pub struct UploadedFile {
    /// Client-supplied file name.
    pub file_name: Option<String>,
    /// Client-supplied content type.
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadedFile {
    fn name(&self) -> Option<&str> {
        self.file_name.as_deref().filter(|n| !n.is_empty())
    }
}

/// A note creation request, as collected from the form.
#[derive(Debug, Clone, Default)]
pub struct CreateNoteInput {
    pub content: Option<String>,
    pub link: Option<String>,
    pub tags: Option<String>,
    pub files: Vec<UploadedFile>,
}

/// A blob opened for download.
#[derive(Debug)]
pub struct ServedFile {
    pub blob: BlobReader,
    pub mime_type: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Note operations over a metadata store and a blob store.
#[derive(Clone)]
pub struct NoteService {
    notes: Arc<dyn NoteRepository>,
    blobs: Arc<dyn BlobStore>,
    max_file_bytes: usize,
}

impl NoteService {
    pub fn new(notes: Arc<dyn NoteRepository>, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            notes,
            blobs,
            max_file_bytes: defaults::MAX_UPLOAD_BYTES,
        }
    }

    /// Override the per-file upload limit.
    pub fn with_max_file_bytes(mut self, max_file_bytes: usize) -> Self {
        self.max_file_bytes = max_file_bytes;
        self
    }

    /// Create one note per file, or a single link or text note.
    pub async fn create(&self, input: CreateNoteInput) -> Result<Vec<CreatedNote>> {
        let content = non_empty(input.content);
        let link = non_empty(input.link);
        let tags = non_empty(input.tags);

        if input.files.first().and_then(UploadedFile::name).is_some() {
            return self.create_file_notes(input.files, content, tags).await;
        }

        if let Some(link) = link {
            let id = self.notes.insert(NewNote::link(link, tags)).await?;
            info!(subsystem = "service", op = "create", note_id = id, note_type = "link", "Link saved");
            return Ok(vec![CreatedNote {
                id,
                note_type: NoteType::Link,
                file_name: None,
                message: "Link saved successfully".to_string(),
            }]);
        }

        if let Some(content) = content {
            let id = self.notes.insert(NewNote::text(content, tags)).await?;
            info!(subsystem = "service", op = "create", note_id = id, note_type = "text", "Note saved");
            return Ok(vec![CreatedNote {
                id,
                note_type: NoteType::Text,
                file_name: None,
                message: "Note saved successfully".to_string(),
            }]);
        }

        Err(Error::InvalidInput(
            "No content, link, or files provided".to_string(),
        ))
    }

    /// Store each named file as its own note.
    ///
    /// Files are handled in order and independently: if one is rejected, the
    /// notes created for earlier files stay.
    async fn create_file_notes(
        &self,
        files: Vec<UploadedFile>,
        caption: Option<String>,
        tags: Option<String>,
    ) -> Result<Vec<CreatedNote>> {
        let mut created = Vec::with_capacity(files.len());

        for file in &files {
            let Some(file_name) = file.name() else {
                debug!(subsystem = "service", op = "create", "Skipping unnamed file part");
                continue;
            };

            if file.data.len() > self.max_file_bytes {
                return Err(Error::PayloadTooLarge(format!(
                    "File {} is too large (max {}MB)",
                    file_name,
                    self.max_file_bytes / (1024 * 1024)
                )));
            }

            let start = Instant::now();
            let blob_name = storage_name_for(file_name);
            self.blobs.write(&blob_name, &file.data).await?;

            let mime_type = detect_content_type(file_name, &file.data, file.content_type.as_deref());
            let file_path = format!("{}/{}", defaults::BLOB_PATH_PREFIX, blob_name);

            let id = match self
                .notes
                .insert(NewNote::file(
                    file_name,
                    file_path,
                    mime_type,
                    caption.clone(),
                    tags.clone(),
                ))
                .await
            {
                Ok(id) => id,
                Err(e) => {
                    // The blob has no record pointing at it; drop it.
                    if let Err(cleanup) = self.blobs.delete(&blob_name).await {
                        warn!(blob_name = %blob_name, error = %cleanup, "Could not remove orphaned blob");
                    }
                    return Err(e);
                }
            };

            info!(
                subsystem = "service",
                op = "create",
                note_id = id,
                note_type = "file",
                blob_name = %blob_name,
                size_bytes = file.data.len(),
                duration_ms = start.elapsed().as_millis() as u64,
                "File uploaded"
            );
            created.push(CreatedNote {
                id,
                note_type: NoteType::File,
                file_name: Some(file_name.to_string()),
                message: "File uploaded successfully".to_string(),
            });
        }

        Ok(created)
    }

    /// Newest-first notes, or search results when a search term is given.
    ///
    /// Search applies `limit` but not `offset`. `total` always counts every note.
    pub async fn list(&self, req: ListNotesRequest) -> Result<ListNotesResponse> {
        if req.limit < 0 {
            return Err(Error::InvalidInput("limit must not be negative".to_string()));
        }
        if req.offset < 0 {
            return Err(Error::InvalidInput("offset must not be negative".to_string()));
        }
        let limit = req.limit.min(defaults::PAGE_LIMIT_MAX);

        let notes = match req.search_term() {
            Some(term) => self.notes.search(term, limit).await?,
            None => self.notes.list(limit, req.offset).await?,
        };
        let total = self.notes.count().await?;

        Ok(ListNotesResponse {
            notes,
            total,
            limit: req.limit,
            offset: req.offset,
        })
    }

    pub async fn get(&self, id: i64) -> Result<Note> {
        self.notes.fetch(id).await?.ok_or(Error::NoteNotFound(id))
    }

    /// Delete a note and, best effort, its blob.
    ///
    /// A blob that cannot be removed is logged and left behind; the record is
    /// deleted regardless.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let note = self.get(id).await?;

        if let Some(blob_name) = note.blob_name() {
            if let Err(e) = self.blobs.delete(blob_name).await {
                warn!(
                    subsystem = "service",
                    op = "delete",
                    note_id = id,
                    blob_name = %blob_name,
                    error = %e,
                    "Could not delete file"
                );
            }
        }

        if !self.notes.delete(id).await? {
            return Err(Error::NoteNotFound(id));
        }
        info!(subsystem = "service", op = "delete", note_id = id, "Note deleted");
        Ok(())
    }

    /// Open a stored blob by its name for download.
    pub async fn open_file(&self, file_name: &str) -> Result<ServedFile> {
        if !is_safe_blob_name(file_name) {
            warn!(subsystem = "service", op = "serve_file", file_name = %file_name, "Rejected unsafe file name");
            return Err(Error::InvalidInput("Invalid filename".to_string()));
        }

        let blob = self.blobs.open(file_name).await?;
        let mime_type = guess_mime_from_name(file_name)
            .unwrap_or(defaults::FALLBACK_MIME)
            .to_string();

        Ok(ServedFile { blob, mime_type })
    }

    /// Total number of notes.
    pub async fn note_count(&self) -> Result<i64> {
        self.notes.count().await
    }
}
