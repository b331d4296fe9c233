//! Sequential block hashing for one work item.
//!
//! Each block is streamed through a fixed 64 KiB buffer, never loaded whole.
//! The SHA-256 state is reset between blocks so digests stay independent.

use sha2::{Digest, Sha256};
use std::io;
use tracing::warn;

use super::failure::BlockFailure;
use super::scheduler::WorkItem;
use super::stream::ReadAt;

const BUF_SIZE: usize = 64 * 1024; // 64 KiB

/// Hash every block in `item`, writing lowercase hex digests into `digests`,
/// one slot per block in block order.
///
/// Stops at the first failing block. Digests written before the failure stay
/// in place.
pub(crate) fn hash_blocks<S>(
    stream: &S,
    block_size: u64,
    item: WorkItem,
    digests: &mut [String],
) -> Result<(), BlockFailure>
where
    S: ReadAt + ?Sized,
{
    debug_assert_eq!(digests.len() as u64, item.block_count);

    let buf_len = BUF_SIZE.min(usize::try_from(block_size).unwrap_or(BUF_SIZE));
    let mut buf = vec![0u8; buf_len];
    let mut hasher = Sha256::new();

    for (slot, block) in digests.iter_mut().zip(item.start_block..) {
        hash_one_block(stream, block_size, block, &mut hasher, &mut buf)
            .map_err(|e| BlockFailure::new(block, e))?;
        *slot = hex::encode(hasher.finalize_reset());
    }
    Ok(())
}

/// Feed one block's byte range into `hasher`. The final block of a stream is
/// naturally short; a block that yields no bytes at all means the stream and
/// the computed geometry disagree, which is reported rather than hashed as
/// empty.
fn hash_one_block<S>(
    stream: &S,
    block_size: u64,
    block: u64,
    hasher: &mut Sha256,
    buf: &mut [u8],
) -> io::Result<()>
where
    S: ReadAt + ?Sized,
{
    let mut offset = block * block_size;
    let mut remaining = block_size;
    let mut total: u64 = 0;

    while remaining > 0 {
        let want = buf.len().min(usize::try_from(remaining).unwrap_or(buf.len()));
        let n = match stream.read_at(&mut buf[..want], offset) {
            Ok(0) => break, // end of stream
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
        offset += n as u64;
        remaining -= n as u64;
        total += n as u64;
    }

    if total == 0 {
        warn!(block, "Block range produced no data");
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "block range yielded no data",
        ));
    }
    Ok(())
}

/// Lowercase hex encoding (local stand-in for the `hex` crate).
pub(crate) mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().fold(
            String::with_capacity(bytes.as_ref().len() * 2),
            |mut s, b| {
                use std::fmt::Write;
                let _ = write!(s, "{b:02x}");
                s
            },
        )
    }
}
