//! Service layer for business logic.

pub mod note_service;

pub use note_service::{CreateNoteInput, NoteService, ServedFile, UploadedFile};
