//! Centralized default constants for notebox.
//!
//! Every crate references these instead of defining its own magic numbers.

// =============================================================================
// UPLOADS
// =============================================================================

/// Maximum size of a single uploaded file (50 MiB).
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Maximum size of a whole request body (512 MiB), so several files fit in one form.
pub const MAX_REQUEST_BYTES: usize = 512 * 1024 * 1024;

/// Prefix recorded in `file_path` for stored blobs.
pub const BLOB_PATH_PREFIX: &str = "uploads";

/// Content type used when nothing better can be detected.
pub const FALLBACK_MIME: &str = "application/octet-stream";

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for note listing and search.
pub const PAGE_LIMIT: i64 = 100;

/// Upper bound applied to any requested page size.
pub const PAGE_LIMIT_MAX: i64 = 1000;

/// Default page offset.
pub const PAGE_OFFSET: i64 = 0;

// =============================================================================
// SERVER
// =============================================================================

/// Default bind host (all interfaces, for LAN access).
pub const SERVER_HOST: &str = "0.0.0.0";

/// Default bind port.
pub const SERVER_PORT: u16 = 8000;

/// Default SQLite location.
pub const DATABASE_URL: &str = "sqlite://data/notes.db";

/// Default blob directory.
pub const UPLOAD_DIR: &str = "uploads";

/// Default client UI directory.
pub const STATIC_DIR: &str = "static";
