//! File mode: hash a file on disk and write its block signature.

use std::fs::File;
use std::io;
use std::path::Path;

use tracing::{error, info};

use crate::config::BYTES_PER_MIB;
use crate::engine::geometry::{block_count, blocks_per_worker};
use crate::engine::scheduler::compute_signature;

/// Hash `input` with `block_size_mib` MiB blocks across at most `workers`
/// concurrent workers, writing one digest per line to `output`.
///
/// Failures are logged where they occur; the caller only maps the returned
/// error to a process exit code.
pub fn sign_file(
    input: &Path,
    output: &Path,
    block_size_mib: u64,
    workers: usize,
) -> io::Result<()> {
    let block_size = block_size_mib * BYTES_PER_MIB;

    let file = File::open(input).map_err(|e| {
        error!("Unable to read input file: {e}");
        e
    })?;
    let size = file
        .metadata()
        .map_err(|e| {
            error!("Unable to read input file: {e}");
            e
        })?
        .len();

    let total_blocks = block_count(size, block_size);
    let batch = blocks_per_worker(total_blocks, workers);
    info!(
        input = %input.display(),
        size,
        total_blocks,
        block_size_mib,
        "Hashing"
    );

    let (signature, failure) = compute_signature(&file, size, block_size, batch);
    if let Some(failure) = failure {
        error!("Unable to hash input file: {failure}");
        return Err(io::Error::other(failure));
    }

    signature.write_file(output).map_err(|e| {
        error!("Unable to write output file: {e}");
        e
    })?;

    info!(output = %output.display(), blocks = signature.len(), "Signature written");
    Ok(())
}
