//! Server state and configuration.

use std::path::PathBuf;

/// Default request body limit (10 MiB).
pub const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Default listen address.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:3000")
    pub listen_addr: String,
    /// Directory where uploads are stored while they are decoded
    pub upload_dir: PathBuf,
    /// Maximum request body size in bytes, multipart framing included
    pub max_file_size: usize,
    /// Accepted MIME type prefixes (e.g., "image/")
    pub allowed_mime_prefixes: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            upload_dir: std::env::temp_dir(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_mime_prefixes: vec!["image/".to_string()],
        }
    }
}

impl ServerConfig {
    /// Whether an upload with this MIME type may be stored.
    pub fn accepts_mime(&self, mime: &str) -> bool {
        let mime = mime.trim().to_ascii_lowercase();
        self.allowed_mime_prefixes
            .iter()
            .any(|prefix| mime.starts_with(&prefix.to_ascii_lowercase()))
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }
}
