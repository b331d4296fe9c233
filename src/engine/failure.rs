//! Failure capture for concurrent block hashing.
//!
//! Workers record failures as they happen; the scheduler polls [`FailureLog::is_empty`]
//! to stop carving new work items. The check is racy on purpose: a failure
//! recorded between the check and the spawn costs at most one extra work
//! item, never a wrong digest.

use std::error::Error;
use std::fmt;
use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A hashing failure pinned to the block where it occurred.
#[derive(Debug)]
pub struct BlockFailure {
    block: u64,
    source: io::Error,
}

impl BlockFailure {
    pub(crate) fn new(block: u64, source: io::Error) -> Self {
        Self { block, source }
    }

    /// Index of the block that could not be hashed.
    pub fn block(&self) -> u64 {
        self.block
    }

    /// Kind of the underlying I/O error.
    pub fn kind(&self) -> io::ErrorKind {
        self.source.kind()
    }
}

impl fmt::Display for BlockFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block {}: {}", self.block, self.source)
    }
}

impl Error for BlockFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Append-only list of failures shared by all workers of one run.
#[derive(Debug, Default)]
pub(crate) struct FailureLog {
    entries: Mutex<Vec<BlockFailure>>,
}

impl FailureLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, failure: BlockFailure) {
        self.lock().push(failure);
    }

    /// True when no failure has been recorded yet. Best effort: the answer
    /// may be stale by the time the caller acts on it.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Consume the log, surfacing the failure with the lowest block index.
    pub fn into_first(self) -> Option<BlockFailure> {
        self.entries
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .into_iter()
            .min_by_key(BlockFailure::block)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<BlockFailure>> {
        // A panicking worker cannot leave a half-written entry; take the
        // guard even if poisoned.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(block: u64) -> BlockFailure {
        BlockFailure::new(block, io::Error::other("boom"))
    }

    #[test]
    fn test_empty_log() {
        let log = FailureLog::new();
        assert!(log.is_empty());
        assert!(log.into_first().is_none());
    }

    #[test]
    fn test_record_flips_is_empty() {
        let log = FailureLog::new();
        log.record(failure(3));
        assert!(!log.is_empty());
    }

    #[test]
    fn test_into_first_picks_lowest_block() {
        let log = FailureLog::new();
        log.record(failure(5));
        log.record(failure(2));
        log.record(failure(9));
        assert_eq!(log.into_first().unwrap().block(), 2);
    }

    #[test]
    fn test_display_names_block() {
        let f = failure(7);
        assert_eq!(f.to_string(), "block 7: boom");
    }

    #[test]
    fn test_source_preserved() {
        use std::error::Error;
        let f = failure(0);
        assert!(f.source().is_some());
    }
}
