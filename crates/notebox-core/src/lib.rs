//! # notebox-core
//!
//! Core types, traits, and abstractions for the notebox note service.
//!
//! This crate provides the note data model, the storage traits implemented
//! by `notebox-db`, the shared error type, and the file-name and MIME helpers
//! used on the upload and download paths.

pub mod defaults;
pub mod error;
pub mod file_safety;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use file_safety::{
    detect_content_type, file_extension, guess_mime_from_name, is_safe_blob_name,
    storage_name_for,
};
pub use models::*;
pub use traits::*;
