//! File name safety and content type detection for uploads and downloads.
//!
//! Blob names are generated server-side (`{uuid}{ext}`), so a name arriving
//! from a client is only ever valid as a single path component.

use uuid::Uuid;

use crate::defaults::FALLBACK_MIME;

/// Returns true if `name` is usable as a blob name inside the blob directory.
///
/// Rejects empty names, path separators, parent-directory sequences and NUL.
/// Leading dots are rejected too: the blob directory keeps its temp and
/// health-check files under dot names.
pub fn is_safe_blob_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains("..")
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}

/// Extension of the last path component of `file_name`, with its leading dot.
///
/// `"report.final.pdf"` gives `".pdf"`; dotfiles, trailing dots, and names
/// without an extension give `""`. An extension containing NUL is dropped.
pub fn file_extension(file_name: &str) -> &str {
    let name = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    match name.rfind('.') {
        Some(i) if i > 0 && i + 1 < name.len() && !name[i..].contains('\0') => &name[i..],
        _ => "",
    }
}

/// Generate a fresh blob name for an upload: `{uuid-v4}{original extension}`.
pub fn storage_name_for(file_name: &str) -> String {
    format!("{}{}", Uuid::new_v4(), file_extension(file_name))
}

/// Guess a content type from a file name's extension.
pub fn guess_mime_from_name(file_name: &str) -> Option<&'static str> {
    mime_guess::from_path(file_name).first_raw()
}

/// Pick the content type recorded for an upload.
///
/// Order: the client-supplied type, then the file name extension, then magic
/// bytes, then `application/octet-stream`.
pub fn detect_content_type(file_name: &str, data: &[u8], claimed: Option<&str>) -> String {
    if let Some(claimed) = claimed.map(str::trim).filter(|c| !c.is_empty()) {
        return claimed.to_string();
    }

    if let Some(mime) = guess_mime_from_name(file_name) {
        return mime.to_string();
    }

    if let Some(kind) = infer::get(data) {
        return kind.mime_type().to_string();
    }

    FALLBACK_MIME.to_string()
}
