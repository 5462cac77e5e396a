//! HTTP handlers.

pub mod files;
pub mod health;
pub mod notes;
pub mod ui;

pub use files::serve_file;
pub use health::health_check;
pub use notes::{create_note, delete_note, get_note, list_notes};
pub use ui::index;
