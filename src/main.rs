#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # blocksig
//!
//! Block-level SHA-256 signature tool.
//!
//! The input is split into fixed-size blocks and each block is hashed
//! independently across a bounded pool of worker threads. The result is one
//! lowercase hex digest per block, in block order: change a byte anywhere
//! and exactly one digest moves.
//!
//! ## Subcommands
//!
//! - `blocksig hash -i <file> -o <file> [-b <MiB>]` — sign a file on disk
//! - `blocksig serve [--listen <addr>]` — expose the engine over HTTP
//!
//! ## API surface
//!
//! | Method | Path         | Description                                 |
//! |--------|--------------|---------------------------------------------|
//! | POST   | `/signature` | Multipart upload, returns per-block digests |
//!
//! ## Architecture
//!
//! ```text
//! main.rs        — entry point, clap subcommands, tracing init, exit codes
//! config.rs      — TOML + env-var configuration
//! state.rs       — shared handler state
//! server.rs      — router assembly, serve loop, graceful shutdown
//! sign.rs        — file mode driver
//! signature.rs   — digest sequence container + line codec
//! routes/
//!   signature.rs — POST /signature (multipart upload)
//! engine/
//!   geometry.rs  — block count / blocks-per-worker arithmetic
//!   stream.rs    — ReadAt abstraction (files, byte slices)
//!   hasher.rs    — per-work-item sequential block hashing
//!   scheduler.rs — work-item carving, scoped workers, failure gating
//!   failure.rs   — BlockFailure and the shared failure log
//! ```

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use blocksig::config::{Config, MAX_BLOCK_SIZE_MIB};
use blocksig::state::AppState;
use blocksig::{server, sign};

/// Block-level SHA-256 signatures for files and uploads.
#[derive(Parser)]
#[command(name = "blocksig", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hash a file and write its block signature.
    Hash {
        /// File to hash.
        #[arg(short, long)]
        input: PathBuf,
        /// Where to write the signature (one hex digest per line).
        #[arg(short, long)]
        output: PathBuf,
        /// Block size in MiB.
        #[arg(
            short,
            long,
            default_value_t = 1,
            value_parser = clap::value_parser!(u64).range(1..=MAX_BLOCK_SIZE_MIB)
        )]
        block_size: u64,
        /// Path to TOML config file.
        #[arg(long)]
        config: Option<String>,
    },
    /// Serve the signature endpoint over HTTP.
    Serve {
        /// Socket address to bind, overriding the config file.
        #[arg(long)]
        listen: Option<String>,
        /// Path to TOML config file.
        #[arg(long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Hash {
            input,
            output,
            block_size,
            config,
        } => {
            let config = Config::load(config.as_deref());
            init_tracing(&config);
            info!("blocksig v{} starting", env!("CARGO_PKG_VERSION"));

            if sign::sign_file(&input, &output, block_size, config.hash.workers).is_err() {
                std::process::exit(1);
            }
            info!("Done");
        }
        Commands::Serve { listen, config } => {
            let mut config = Config::load(config.as_deref());
            if let Some(listen) = listen {
                config.server.listen = listen;
            }
            init_tracing(&config);
            info!("blocksig v{} starting", env!("CARGO_PKG_VERSION"));

            if let Err(e) = server::run(AppState::new(config)).await {
                error!("Server error: {e}");
                std::process::exit(1);
            }
            info!("Goodbye");
        }
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` overrides the configured
/// level. With a log file configured, output is appended there; if the file
/// cannot be opened, logging falls back to stdout.
fn init_tracing(config: &Config) {
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.level.clone());
    let builder = tracing_subscriber::fmt().with_env_filter(log_filter);

    if let Some(path) = config.logging.file.as_deref() {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder.with_writer(Arc::new(file)).with_ansi(false).init();
                return;
            }
            Err(e) => eprintln!("Failed to open log file {path}: {e}, logging to stdout"),
        }
    }
    builder.init();
}
