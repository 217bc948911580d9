//! Signature byte ranges.
//!
//! The `ByteRange` entry lists `[offset length ...]` pairs of the file bytes
//! covered by the signature. A conforming signature covers the whole file
//! except the hex string holding `Contents`:
//!
//! `[0 before_contents after_contents remaining]`

use super::types::DigestAlgorithm;
use crate::error::{Error, Result};
use sha2::{Digest, Sha256, Sha384, Sha512};

/// Validated byte ranges of a signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteRange {
    ranges: Vec<(u64, u64)>,
}

impl ByteRange {
    /// Build from the integers of a `ByteRange` array.
    ///
    /// The array must have an even, non-zero length; offsets and lengths
    /// must be non-negative and ranges ascending without overlap.
    pub fn from_integers(values: &[i64]) -> Result<Self> {
        if values.is_empty() || values.len() % 2 != 0 {
            return Err(Error::ByteRange(format!(
                "expected an even number of integers, got {}",
                values.len()
            )));
        }
        if let Some(neg) = values.iter().find(|v| **v < 0) {
            return Err(Error::ByteRange(format!("negative value {}", neg)));
        }

        let ranges: Vec<(u64, u64)> = values.chunks(2).map(|c| (c[0] as u64, c[1] as u64)).collect();
        for pair in ranges.windows(2) {
            let (offset, len) = pair[0];
            let next = pair[1].0;
            if offset + len > next {
                return Err(Error::ByteRange(format!(
                    "range at {} (length {}) overlaps range starting at {}",
                    offset, len, next
                )));
            }
        }
        Ok(Self { ranges })
    }

    /// The (offset, length) pairs.
    pub fn ranges(&self) -> &[(u64, u64)] {
        &self.ranges
    }

    /// Number of signed bytes.
    pub fn signed_len(&self) -> u64 {
        self.ranges.iter().map(|(_, len)| len).sum()
    }

    /// End offset of the last range.
    pub fn end(&self) -> u64 {
        self.ranges.last().map(|(offset, len)| offset + len).unwrap_or(0)
    }

    /// Check that the ranges start at 0, end at `file_len` and leave exactly
    /// one gap (the signature contents).
    pub fn covers_whole_document(&self, file_len: u64) -> bool {
        self.ranges.len() == 2 && self.ranges[0].0 == 0 && self.end() == file_len
    }

    /// Unsigned gap between the first two ranges, as (offset, length).
    pub fn excluded_gap(&self) -> Option<(u64, u64)> {
        if self.ranges.len() < 2 {
            return None;
        }
        let start = self.ranges[0].0 + self.ranges[0].1;
        Some((start, self.ranges[1].0 - start))
    }

    /// Concatenate the signed bytes of a file.
    pub fn signed_content(&self, file: &[u8]) -> Result<Vec<u8>> {
        if self.end() > file.len() as u64 {
            return Err(Error::ByteRange(format!(
                "ranges end at {} beyond file size {}",
                self.end(),
                file.len()
            )));
        }
        let mut signed = Vec::with_capacity(self.signed_len() as usize);
        for (offset, len) in &self.ranges {
            let start = *offset as usize;
            signed.extend_from_slice(&file[start..start + *len as usize]);
        }
        Ok(signed)
    }

    /// Digest of the signed bytes.
    pub fn digest(&self, file: &[u8], algorithm: DigestAlgorithm) -> Result<Vec<u8>> {
        let content = self.signed_content(file)?;
        match algorithm {
            DigestAlgorithm::Sha256 => Ok(Sha256::digest(&content).to_vec()),
            DigestAlgorithm::Sha384 => Ok(Sha384::digest(&content).to_vec()),
            DigestAlgorithm::Sha512 => Ok(Sha512::digest(&content).to_vec()),
            #[cfg(feature = "sha1-digest")]
            DigestAlgorithm::Sha1 => Ok(sha1::Sha1::digest(&content).to_vec()),
            other => Err(Error::Unsupported(format!("{} digest", other.name()))),
        }
    }

    /// Integers for a `ByteRange` array.
    pub fn to_integers(&self) -> Vec<i64> {
        self.ranges
            .iter()
            .flat_map(|(offset, len)| [*offset as i64, *len as i64])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let br = ByteRange::from_integers(&[0, 100, 150, 50]).unwrap();
        assert_eq!(br.ranges(), &[(0, 100), (150, 50)]);
        assert_eq!(br.signed_len(), 150);
        assert!(br.covers_whole_document(200));
        assert!(!br.covers_whole_document(300));
        assert_eq!(br.excluded_gap(), Some((100, 50)));
        assert_eq!(br.to_integers(), vec![0, 100, 150, 50]);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(ByteRange::from_integers(&[]).is_err());
        assert!(ByteRange::from_integers(&[0, 10, 20]).is_err());
        assert!(ByteRange::from_integers(&[0, -1, 20, 5]).is_err());
        assert!(ByteRange::from_integers(&[0, 30, 20, 5]).is_err());
    }

    #[test]
    fn test_not_starting_at_zero() {
        let br = ByteRange::from_integers(&[10, 90, 150, 50]).unwrap();
        assert!(!br.covers_whole_document(200));
    }

    #[test]
    fn test_signed_content() {
        let file = b"AAABBBCCC";
        let br = ByteRange::from_integers(&[0, 3, 6, 3]).unwrap();
        assert_eq!(br.signed_content(file).unwrap(), b"AAACCC");

        let too_long = ByteRange::from_integers(&[0, 3, 6, 10]).unwrap();
        assert!(too_long.signed_content(file).is_err());
    }

    #[test]
    fn test_digest_sha256() {
        let file = b"abc<sig>";
        let br = ByteRange::from_integers(&[0, 3, 8, 0]).unwrap();
        let digest = br.digest(file, DigestAlgorithm::Sha256).unwrap();
        assert_eq!(digest, Sha256::digest(b"abc").to_vec());
        assert_eq!(br.digest(file, DigestAlgorithm::Sha512).unwrap().len(), 64);
        assert!(br.digest(file, DigestAlgorithm::Ripemd160).is_err());
    }
}
