//! # notebox-db
//!
//! SQLite persistence layer for notebox.
//!
//! This crate provides:
//! - Connection pool management
//! - The `notes` table repository
//! - A filesystem blob store for uploaded bytes
//!
//! ## Example
//!
//! ```rust,ignore
//! use notebox_db::{Database, NewNote, NoteRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite://data/notes.db").await?;
//!     db.migrate().await?;
//!
//!     let id = db.notes.insert(NewNote::text("Hello, world!", None)).await?;
//!     println!("Created note: {}", id);
//!     Ok(())
//! }
//! ```
pub mod blob_store;
pub mod notes;
pub mod pool;

// Re-export core types
pub use notebox_core::*;

pub use blob_store::FilesystemBlobStore;
pub use notes::{timestamp_now, SqliteNoteRepository};
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};

/// Escape LIKE wildcard characters (`%`, `_`, `\`) in user input.
///
/// Use with `ESCAPE '\'`.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Combined database context.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::SqlitePool,
    /// Note repository for CRUD operations.
    pub notes: SqliteNoteRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self {
            notes: SqliteNoteRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::SqlitePool {
        &self.pool
    }
}
