//! Note data model.

use serde::{Deserialize, Serialize};

use crate::defaults;

// =============================================================================
// NOTE TYPES
// =============================================================================

/// Kind of a note, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteType {
    /// Free text
    Text,
    /// A URL stored in `content`
    Link,
    /// An uploaded file stored in the blob directory
    File,
}

impl NoteType {
    /// The value stored in the `note_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Link => "link",
            Self::File => "file",
        }
    }
}

impl std::fmt::Display for NoteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NoteType {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "link" => Ok(Self::Link),
            "file" => Ok(Self::File),
            _ => Err(format!("Invalid note type: {}", s)),
        }
    }
}

/// A persisted note record.
///
/// `created_at` and `updated_at` are UTC RFC 3339 strings, so ordering them
/// lexically orders them in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub note_type: NoteType,
    pub content: Option<String>,
    pub file_name: Option<String>,
    pub file_path: Option<String>,
    pub mime_type: Option<String>,
    pub tags: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Note {
    /// Name of the stored blob, taken from the last component of `file_path`.
    pub fn blob_name(&self) -> Option<&str> {
        self.file_path
            .as_deref()
            .and_then(|p| p.rsplit(['/', '\\']).next())
            .filter(|name| !name.is_empty())
    }
}

/// Values for a note about to be inserted. Ids and timestamps come from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub note_type: NoteType,
    pub content: Option<String>,
    pub file_name: Option<String>,
    pub file_path: Option<String>,
    pub mime_type: Option<String>,
    pub tags: Option<String>,
}

impl NewNote {
    pub fn text(content: impl Into<String>, tags: Option<String>) -> Self {
        Self {
            note_type: NoteType::Text,
            content: Some(content.into()),
            file_name: None,
            file_path: None,
            mime_type: None,
            tags,
        }
    }

    pub fn link(url: impl Into<String>, tags: Option<String>) -> Self {
        Self {
            note_type: NoteType::Link,
            content: Some(url.into()),
            file_name: None,
            file_path: None,
            mime_type: None,
            tags,
        }
    }

    /// A file note; `caption` ends up in `content`.
    pub fn file(
        file_name: impl Into<String>,
        file_path: impl Into<String>,
        mime_type: impl Into<String>,
        caption: Option<String>,
        tags: Option<String>,
    ) -> Self {
        Self {
            note_type: NoteType::File,
            content: caption,
            file_name: Some(file_name.into()),
            file_path: Some(file_path.into()),
            mime_type: Some(mime_type.into()),
            tags,
        }
    }
}

/// Summary returned for each note created by a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedNote {
    pub id: i64,
    pub note_type: NoteType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub message: String,
}

// =============================================================================
// LISTING
// =============================================================================

/// Paging and filter parameters for listing notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListNotesRequest {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    #[serde(default)]
    pub search: Option<String>,
}

fn default_limit() -> i64 {
    defaults::PAGE_LIMIT
}

impl Default for ListNotesRequest {
    fn default() -> Self {
        Self {
            limit: defaults::PAGE_LIMIT,
            offset: defaults::PAGE_OFFSET,
            search: None,
        }
    }
}

impl ListNotesRequest {
    /// The search term, if one was given and is not blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }
}

/// A page of notes plus the unfiltered note count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListNotesResponse {
    pub notes: Vec<Note>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}
