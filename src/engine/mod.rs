//! Parallel block-hashing engine.
//!
//! A stream of known length is split into fixed-size blocks, each hashed
//! independently with SHA-256. Contiguous runs of blocks (work items) fan
//! out to scoped worker threads; digests land in disjoint slices of one
//! result buffer; failures funnel through a shared log and the lowest-block
//! one is reported. Transport layers (CLI, HTTP) adapt streams and block
//! sizes to the engine.

pub mod failure;
pub mod geometry;
pub(crate) mod hasher;
pub mod scheduler;
pub mod stream;
