//! Server configuration from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `8000` |
//! | `DATABASE_URL` | `sqlite://data/notes.db` |
//! | `UPLOAD_DIR` | `uploads` |
//! | `STATIC_DIR` | `static` |
//! | `MAX_UPLOAD_BYTES` | 50 MiB |
//! | `MAX_REQUEST_BYTES` | 512 MiB |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use notebox_core::{defaults, Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub upload_dir: PathBuf,
    pub static_dir: PathBuf,
    /// Per-file upload limit.
    pub max_upload_bytes: usize,
    /// Whole request body limit.
    pub max_request_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::SERVER_HOST.to_string(),
            port: defaults::SERVER_PORT,
            database_url: defaults::DATABASE_URL.to_string(),
            upload_dir: PathBuf::from(defaults::UPLOAD_DIR),
            static_dir: PathBuf::from(defaults::STATIC_DIR),
            max_upload_bytes: defaults::MAX_UPLOAD_BYTES,
            max_request_bytes: defaults::MAX_REQUEST_BYTES,
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fallback = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Self {
            host: get("HOST").unwrap_or(fallback.host),
            port: parse_or(get("PORT"), "PORT", fallback.port)?,
            database_url: get("DATABASE_URL").unwrap_or(fallback.database_url),
            upload_dir: get("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(fallback.upload_dir),
            static_dir: get("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(fallback.static_dir),
            max_upload_bytes: parse_or(
                get("MAX_UPLOAD_BYTES"),
                "MAX_UPLOAD_BYTES",
                fallback.max_upload_bytes,
            )?,
            max_request_bytes: parse_or(
                get("MAX_REQUEST_BYTES"),
                "MAX_REQUEST_BYTES",
                fallback.max_request_bytes,
            )?,
        };

        if config.max_request_bytes < config.max_upload_bytes {
            return Err(Error::Config(format!(
                "MAX_REQUEST_BYTES ({}) must be at least MAX_UPLOAD_BYTES ({})",
                config.max_request_bytes, config.max_upload_bytes
            )));
        }
        Ok(config)
    }

    /// Address to bind the listener to.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config(format!("Invalid HOST/PORT {}:{}: {}", self.host, self.port, e)))
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("{} must be a number, got {:?}: {}", key, raw, e))),
    }
}
