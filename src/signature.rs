//! Ordered per-block digest sequence and its on-disk text form.
//!
//! A signature file is UTF-8 text with one lowercase hex SHA-256 digest per
//! line, in block order, newline-terminated. No header, no metadata: the
//! block size that produced it is not recoverable from the file.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::Serialize;

/// Hex length of one SHA-256 digest.
const DIGEST_HEX_LEN: usize = 64;

/// An ordered sequence of lowercase hex SHA-256 digests, one per block.
///
/// Serializes to JSON as a bare array of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Signature {
    digests: Vec<String>,
}

impl Signature {
    pub(crate) fn from_digests(digests: Vec<String>) -> Self {
        Self { digests }
    }

    /// Number of blocks covered.
    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    /// Digest of `block`, if the signature covers it. Empty string for a
    /// block whose work item never ran.
    pub fn get(&self, block: u64) -> Option<&str> {
        usize::try_from(block)
            .ok()
            .and_then(|i| self.digests.get(i))
            .map(String::as_str)
    }

    pub fn digests(&self) -> &[String] {
        &self.digests
    }

    /// Write the line format: one digest per line, newline-terminated.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for digest in &self.digests {
            writeln!(writer, "{digest}")?;
        }
        Ok(())
    }

    pub fn write_file(&self, path: &Path) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_to(&mut out)?;
        out.flush()
    }

    /// Parse the line format, rejecting anything that is not a lowercase hex
    /// SHA-256 digest per line.
    pub fn read_from<R: Read>(reader: R) -> io::Result<Self> {
        let mut digests = Vec::new();
        for line in BufReader::new(reader).lines() {
            let line = line?;
            if !is_hex_digest(&line) {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("invalid digest line: {line:?}"),
                ));
            }
            digests.push(line);
        }
        Ok(Self { digests })
    }

    pub fn read_file(path: &Path) -> io::Result<Self> {
        Self::read_from(File::open(path)?)
    }
}

fn is_hex_digest(line: &str) -> bool {
    line.len() == DIGEST_HEX_LEN
        && line
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGEST_A: &str = "36bbe50ed96841d10443bcb670d6554f0a34b761be67ec9c4a8ad2c0c44ca42c";
    const DIGEST_B: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    fn two_block_signature() -> Signature {
        Signature::from_digests(vec![DIGEST_A.to_string(), DIGEST_B.to_string()])
    }

    #[test]
    fn test_write_one_digest_per_line() {
        let mut out = Vec::new();
        two_block_signature().write_to(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("{DIGEST_A}\n{DIGEST_B}\n")
        );
    }

    #[test]
    fn test_read_back_written_file() {
        let mut out = Vec::new();
        let signature = two_block_signature();
        signature.write_to(&mut out).unwrap();
        let parsed = Signature::read_from(&out[..]).unwrap();
        assert_eq!(parsed, signature);
    }

    #[test]
    fn test_read_rejects_uppercase_hex() {
        let line = DIGEST_A.to_uppercase();
        let err = Signature::read_from(format!("{line}\n").as_bytes()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_read_rejects_short_lines() {
        let err = Signature::read_from(&b"deadbeef\n"[..]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_read_rejects_blank_line() {
        let body = format!("{DIGEST_A}\n\n{DIGEST_B}\n");
        assert!(Signature::read_from(body.as_bytes()).is_err());
    }

    #[test]
    fn test_empty_file_is_empty_signature() {
        let signature = Signature::read_from(&b""[..]).unwrap();
        assert!(signature.is_empty());
    }

    #[test]
    fn test_serializes_as_bare_array() {
        let json = serde_json::to_string(&two_block_signature()).unwrap();
        assert_eq!(json, format!("[\"{DIGEST_A}\",\"{DIGEST_B}\"]"));
    }

    #[test]
    fn test_get_by_block() {
        let signature = two_block_signature();
        assert_eq!(signature.get(1), Some(DIGEST_B));
        assert_eq!(signature.get(2), None);
        assert_eq!(signature.digests(), [DIGEST_A, DIGEST_B]);
    }
}
