//! Random-access byte sources.
//!
//! The engine reads blocks by absolute offset so concurrent workers can share
//! one handle without seeking or locking. Files use positioned reads
//! (`pread(2)`); in-memory buffers index directly.

use std::fs::File;
use std::io;
use std::os::unix::fs::FileExt;

/// A byte source readable at arbitrary offsets.
///
/// Hashing workers share a single `&S` and issue reads at disjoint offsets,
/// overlapping in time, so implementations must not keep per-call cursor
/// state.
pub trait ReadAt {
    /// Read up to `buf.len()` bytes starting at `offset`, returning how many
    /// were read. Returns `Ok(0)` at or past end of stream.
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize>;
}

impl ReadAt for File {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        FileExt::read_at(self, buf, offset)
    }
}

impl ReadAt for [u8] {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        let Ok(start) = usize::try_from(offset) else {
            return Ok(0);
        };
        if start >= self.len() {
            return Ok(0);
        }
        let n = buf.len().min(self.len() - start);
        buf[..n].copy_from_slice(&self[start..start + n]);
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_read_within_bounds() {
        let data = b"hello world";
        let mut buf = [0u8; 5];
        let n = data[..].read_at(&mut buf, 6).unwrap();
        assert_eq!(n, 5);
        assert_eq!(&buf, b"world");
    }

    #[test]
    fn test_slice_read_truncated_at_end() {
        let data = b"hello";
        let mut buf = [0u8; 8];
        let n = data[..].read_at(&mut buf, 3).unwrap();
        assert_eq!(n, 2);
        assert_eq!(&buf[..n], b"lo");
    }

    #[test]
    fn test_slice_read_past_end_returns_zero() {
        let data = b"hello";
        let mut buf = [0u8; 4];
        assert_eq!(data[..].read_at(&mut buf, 5).unwrap(), 0);
        assert_eq!(data[..].read_at(&mut buf, 999).unwrap(), 0);
    }

    #[test]
    fn test_slice_read_empty_buffer() {
        let data = b"hello";
        let mut buf = [0u8; 0];
        assert_eq!(data[..].read_at(&mut buf, 2).unwrap(), 0);
    }

    #[test]
    fn test_file_read_at_offset() {
        use std::io::Write;
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"0123456789").unwrap();
        tmp.flush().unwrap();

        let file = File::open(tmp.path()).unwrap();
        let mut buf = [0u8; 4];
        let n = ReadAt::read_at(&file, &mut buf, 3).unwrap();
        assert_eq!(n, 4);
        assert_eq!(&buf, b"3456");
    }
}
