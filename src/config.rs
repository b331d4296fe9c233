//! Configuration loading and defaults.
//!
//! Configuration is resolved in order of precedence (highest wins):
//!
//! 1. **Environment variables** — `BLOCKSIG_LISTEN`, `BLOCKSIG_LOG_FILE`
//! 2. **Config file** — path via `--config <path>`, or `blocksig.toml` in CWD
//! 3. **Compiled defaults** — see each field's default value below
//!
//! The TOML file mirrors the struct hierarchy:
//!
//! ```toml
//! [server]
//! listen = "0.0.0.0:8080"
//! shutdown_grace_secs = 5
//! max_upload_bytes = 1073741824  # 1 GiB
//!
//! [hash]
//! workers = 30
//!
//! [logging]
//! level = "info"
//! file = "/var/log/blocksig.log"  # optional, stdout when omitted
//! ```

use serde::Deserialize;
use std::path::Path;

/// Block sizes are supplied in MiB at the CLI and HTTP boundaries.
pub const BYTES_PER_MIB: u64 = 1024 * 1024;

/// Largest accepted block size in MiB.
pub const MAX_BLOCK_SIZE_MIB: u64 = 2047;

/// Top-level configuration, deserialized from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub hash: HashConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind (default `0.0.0.0:8080`).
    #[serde(default = "default_listen")]
    pub listen: String,
    /// Seconds granted to in-flight requests after a shutdown signal
    /// (default 5). Exceeding it makes shutdown exit non-zero.
    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,
    /// Maximum accepted upload body in bytes (default 1 GiB).
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

/// Hashing engine settings.
#[derive(Debug, Clone, Deserialize)]
pub struct HashConfig {
    /// Upper bound on concurrently hashing worker threads (default 30).
    #[serde(default = "default_workers")]
    pub workers: usize,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// tracing filter level (default `info`). Overridden by `RUST_LOG` env var.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Append log output to this file instead of stdout. Override with
    /// `BLOCKSIG_LOG_FILE`.
    pub file: Option<String>,
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}
fn default_shutdown_grace_secs() -> u64 {
    5
}
fn default_max_upload_bytes() -> usize {
    1024 * 1024 * 1024 // 1 GiB
}
fn default_workers() -> usize {
    30
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            shutdown_grace_secs: default_shutdown_grace_secs(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration with the precedence chain: env vars > file > defaults.
    ///
    /// If `path` is `Some`, reads that file (panics on failure). Otherwise
    /// looks for `blocksig.toml` in the current directory, falling back to
    /// compiled defaults.
    ///
    /// # Panics
    ///
    /// Panics when an explicitly given file is unreadable or unparsable, and
    /// when the resolved worker count is zero.
    pub fn load(path: Option<&str>) -> Self {
        let mut config: Config = if let Some(p) = path {
            let content = std::fs::read_to_string(p)
                .unwrap_or_else(|e| panic!("Failed to read config file {p}: {e}"));
            toml::from_str(&content)
                .unwrap_or_else(|e| panic!("Failed to parse config file {p}: {e}"))
        } else if Path::new("blocksig.toml").exists() {
            let content =
                std::fs::read_to_string("blocksig.toml").expect("Failed to read blocksig.toml");
            toml::from_str(&content).expect("Failed to parse blocksig.toml")
        } else {
            Config::default()
        };

        // Env var overrides
        if let Ok(listen) = std::env::var("BLOCKSIG_LISTEN") {
            config.server.listen = listen;
        }
        if let Ok(file) = std::env::var("BLOCKSIG_LOG_FILE") {
            config.logging.file = Some(file);
        }

        assert!(config.hash.workers > 0, "hash.workers must be non-zero");

        config
    }
}
