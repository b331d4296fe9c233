//! Block geometry arithmetic.
//!
//! Pure functions mapping stream length and block size to block counts and
//! per-worker batch sizes. No I/O, no state.

/// Number of blocks needed to cover `size` bytes at `block_size` bytes per
/// block. The final block may be shorter than `block_size`.
///
/// # Panics
///
/// Panics if `block_size` is zero. Block sizes are validated at the CLI and
/// HTTP boundaries before the engine is reached.
pub fn block_count(size: u64, block_size: u64) -> u64 {
    assert!(block_size > 0, "block_size must be non-zero");
    size.div_ceil(block_size)
}

/// Blocks assigned to each work item so that the number of spawned workers
/// never exceeds `worker_target`.
///
/// # Panics
///
/// Panics if `worker_target` is zero. Worker counts are validated at config
/// load.
pub fn blocks_per_worker(total_blocks: u64, worker_target: usize) -> u64 {
    assert!(worker_target > 0, "worker_target must be non-zero");
    total_blocks.div_ceil(worker_target as u64) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_count_exact_multiple() {
        assert_eq!(block_count(8, 4), 2);
        assert_eq!(block_count(4096, 1024), 4);
    }

    #[test]
    fn test_block_count_partial_final_block() {
        assert_eq!(block_count(9, 4), 3);
        assert_eq!(block_count(1, 1024 * 1024), 1);
    }

    #[test]
    fn test_block_count_empty_stream() {
        assert_eq!(block_count(0, 4), 0);
    }

    #[test]
    #[should_panic(expected = "block_size must be non-zero")]
    fn test_block_count_zero_block_size_panics() {
        block_count(8, 0);
    }

    #[test]
    fn test_blocks_per_worker_bounds_worker_count() {
        // ceil(total / batch) is the number of work items actually spawned;
        // it must never exceed the worker target.
        for total in [1u64, 7, 29, 30, 31, 100, 1000, 65537] {
            for target in [1usize, 2, 30, 64] {
                let batch = blocks_per_worker(total, target);
                let workers = total.div_ceil(batch);
                assert!(
                    workers <= target as u64,
                    "total={total} target={target} batch={batch} workers={workers}"
                );
            }
        }
    }

    #[test]
    fn test_blocks_per_worker_small_inputs() {
        // 100 blocks over 30 workers: ceil(100/30) + 1 = 5 blocks each.
        assert_eq!(blocks_per_worker(100, 30), 5);
        // No blocks still yields a usable (positive) batch size.
        assert_eq!(blocks_per_worker(0, 30), 1);
        // Single worker takes everything in one item.
        assert_eq!(blocks_per_worker(12, 1), 13);
    }

    #[test]
    #[should_panic(expected = "worker_target must be non-zero")]
    fn test_blocks_per_worker_zero_target_panics() {
        blocks_per_worker(8, 0);
    }
}
