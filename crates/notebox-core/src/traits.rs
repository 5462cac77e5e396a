//! Storage traits implemented by `notebox-db`.

use async_trait::async_trait;
use tokio::io::AsyncRead;

use crate::{NewNote, Note, Result};

/// Persistent store for note metadata.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert a new note and return its id.
    async fn insert(&self, note: NewNote) -> Result<i64>;

    /// Fetch a note by id.
    async fn fetch(&self, id: i64) -> Result<Option<Note>>;

    /// Newest-first page of all notes.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Note>>;

    /// Newest-first notes whose content, tags, or file name contain `term`.
    async fn search(&self, term: &str, limit: i64) -> Result<Vec<Note>>;

    /// Total number of notes.
    async fn count(&self) -> Result<i64>;

    /// Delete a note. Returns false if no row was removed.
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// An open blob ready to be streamed.
pub struct BlobReader {
    pub reader: Box<dyn AsyncRead + Send + Unpin>,
    pub len: u64,
}

impl std::fmt::Debug for BlobReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobReader").field("len", &self.len).finish()
    }
}

/// Storage for uploaded file bytes, addressed by generated names.
///
/// Names are single path components; implementations reject anything else.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write `data` under `name`, replacing nothing (names are unique).
    async fn write(&self, name: &str, data: &[u8]) -> Result<()>;

    /// Open a blob for reading. Missing blobs are `Error::NotFound`.
    async fn open(&self, name: &str) -> Result<BlobReader>;

    /// Remove a blob. Removing a missing blob succeeds.
    async fn delete(&self, name: &str) -> Result<()>;

    /// Check whether a blob exists.
    async fn exists(&self, name: &str) -> Result<bool>;
}
