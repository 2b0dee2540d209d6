//! # brailleart server
//!
//! Runs the HTTP service that converts uploaded images to Braille text.
//!
//! ## Usage
//!
//! ```bash
//! # Listen on the default 0.0.0.0:3000, storing uploads in the temp dir
//! brailleart
//!
//! # Custom address, upload directory and 5 MiB limit
//! brailleart --listen 127.0.0.1:8080 --upload-dir /var/tmp/brailleart --max-file-size 5242880
//!
//! # Accept only PNG and JPEG uploads
//! brailleart --allow-mime image/png --allow-mime image/jpeg
//! ```
//!
//! Every flag except `--allow-mime` can also come from a `BRAILLEART_*`
//! environment variable. `RUST_LOG` controls log filtering.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use brailleart::{
    BrailleError,
    server::{self, DEFAULT_LISTEN_ADDR, DEFAULT_MAX_FILE_SIZE, ServerConfig},
};

/// brailleart - Render uploaded images as Braille text over HTTP
#[derive(Parser, Debug)]
#[command(name = "brailleart")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "BRAILLEART_LISTEN", default_value = DEFAULT_LISTEN_ADDR)]
    listen: String,

    /// Directory for temporary upload files (defaults to the system temp dir)
    #[arg(long, env = "BRAILLEART_UPLOAD_DIR", value_name = "DIR")]
    upload_dir: Option<PathBuf>,

    /// Maximum request body size in bytes
    #[arg(long, env = "BRAILLEART_MAX_FILE_SIZE", default_value_t = DEFAULT_MAX_FILE_SIZE)]
    max_file_size: usize,

    /// Accepted MIME type prefix (repeatable)
    #[arg(long = "allow-mime", value_name = "PREFIX", default_value = "image/")]
    allow_mime: Vec<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> ServerConfig {
        let defaults = ServerConfig::default();
        ServerConfig {
            listen_addr: self.listen,
            upload_dir: self.upload_dir.unwrap_or(defaults.upload_dir),
            max_file_size: self.max_file_size,
            allowed_mime_prefixes: self.allow_mime,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "brailleart=debug,tower_http=debug"
    } else {
        "brailleart=info,tower_http=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), BrailleError> {
    tracing::info!("brailleart version {}", env!("CARGO_PKG_VERSION"));
    server::serve(cli.into_config()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["brailleart"]).unwrap();
        let config = cli.into_config();
        assert_eq!(config.allowed_mime_prefixes, vec!["image/".to_string()]);
        assert_eq!(config.max_file_size, DEFAULT_MAX_FILE_SIZE);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "brailleart",
            "--listen",
            "127.0.0.1:9000",
            "--upload-dir",
            "/srv/uploads",
            "--max-file-size",
            "1024",
            "--allow-mime",
            "image/png",
            "--allow-mime",
            "image/gif",
        ])
        .unwrap();
        let config = cli.into_config();
        assert_eq!(config.listen_addr, "127.0.0.1:9000");
        assert_eq!(config.upload_dir, PathBuf::from("/srv/uploads"));
        assert_eq!(config.max_file_size, 1024);
        assert_eq!(
            config.allowed_mime_prefixes,
            vec!["image/png".to_string(), "image/gif".to_string()]
        );
    }
}
