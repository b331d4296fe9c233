//! Work-item carving and scoped worker dispatch.
//!
//! The digest buffer is split into disjoint `&mut` sub-slices, one per work
//! item, so overlapping writes are unrepresentable. Workers run inside a
//! [`std::thread::scope`]; the scope join is the end-of-run barrier.

use std::mem;
use std::thread;

use tracing::debug;

use super::failure::{BlockFailure, FailureLog};
use super::geometry::block_count;
use super::hasher::hash_blocks;
use super::stream::ReadAt;
use crate::signature::Signature;

/// A contiguous run of blocks assigned to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkItem {
    /// First block of the run.
    pub start_block: u64,
    /// Number of blocks in the run.
    pub block_count: u64,
}

/// Hash all blocks of `stream` concurrently, returning the signature and,
/// if any block could not be read, the failure with the lowest block index.
///
/// The signature always has one slot per block. Scheduling stops at the
/// first observed failure, so on error the slots of work items that never
/// ran are left empty; treat a returned failure as "result may be
/// incomplete". Workers already dispatched run to completion either way.
///
/// # Panics
///
/// Panics if `block_size` is zero, or if `blocks_per_worker` is zero while
/// the stream has blocks to hash.
pub fn compute_signature<S>(
    stream: &S,
    size: u64,
    block_size: u64,
    blocks_per_worker: u64,
) -> (Signature, Option<BlockFailure>)
where
    S: ReadAt + Sync + ?Sized,
{
    let total_blocks = block_count(size, block_size);
    assert!(
        blocks_per_worker > 0 || total_blocks == 0,
        "blocks_per_worker must be non-zero"
    );

    let mut batch = blocks_per_worker;
    if batch > total_blocks && total_blocks > 0 {
        debug!(
            blocks_per_worker = batch,
            total_blocks, "One work item covers the whole stream"
        );
        batch = total_blocks;
    }

    let mut digests = vec![String::new(); total_blocks as usize];
    let failures = FailureLog::new();

    thread::scope(|scope| {
        let mut slots: &mut [String] = &mut digests;
        let mut next_block: u64 = 0;

        while !slots.is_empty() && failures.is_empty() {
            let take = batch.min(slots.len() as u64);
            if take < batch {
                debug!(remaining = take, "Shrinking final work item");
            }

            let (head, rest) = mem::take(&mut slots).split_at_mut(take as usize);
            slots = rest;

            let item = WorkItem {
                start_block: next_block,
                block_count: take,
            };
            next_block += take;

            let failures = &failures;
            scope.spawn(move || {
                if let Err(failure) = hash_blocks(stream, block_size, item, head) {
                    failures.record(failure);
                }
            });
        }
    });

    (Signature::from_digests(digests), failures.into_first())
}
