#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]

//! blocksig library — block-level SHA-256 signatures.
//!
//! The building blocks:
//! - `engine` — parallel block-hashing core (geometry, streams, scheduler)
//! - `signature` — digest sequence container and line-oriented codec
//! - `config` — configuration loading
//! - `routes` — HTTP route handlers
//! - `server` — router assembly, serve loop, graceful shutdown
//! - `sign` — file mode driver
//! - `state` — shared handler state

pub mod config;
pub mod engine;
pub mod routes;
pub mod server;
pub mod sign;
pub mod signature;
pub mod state;

pub use config::Config;
pub use engine::failure::BlockFailure;
pub use engine::scheduler::compute_signature;
pub use engine::stream::ReadAt;
pub use signature::Signature;
pub use state::AppState;
