//! Envelope layout.
//!
//! A sealed save is a single flat byte string:
//!
//! ```text
//! offset 0        : version (1 byte)
//! offset 1..17    : IV (16 bytes)
//! offset 17..n-32 : ciphertext (multiple of 16 bytes once padded)
//! offset n-32..n  : HMAC-SHA256 over bytes 0..n-32
//! ```

use crate::error::{CryptoError, Result};

/// The only envelope version this crate writes or accepts.
pub const ENVELOPE_VERSION: u8 = 1;

/// Length of the CBC initialization vector.
pub const IV_LEN: usize = 16;

/// Length of the HMAC-SHA256 tag.
pub const MAC_LEN: usize = 32;

/// Version byte plus IV.
pub const HEADER_LEN: usize = 1 + IV_LEN;

/// Smallest byte string that can possibly be an envelope.
pub const MIN_ENVELOPE_LEN: usize = HEADER_LEN + MAC_LEN;

/// A borrowed, length-checked view over envelope bytes.
///
/// Parsing only validates the length. The MAC, the version and the
/// padding are checked by [`crate::cipher::decrypt`], in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeRef<'a> {
    bytes: &'a [u8],
}

impl<'a> EnvelopeRef<'a> {
    /// Split `bytes` into envelope sections.
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() < MIN_ENVELOPE_LEN {
            return Err(CryptoError::Truncated {
                len: bytes.len(),
                min: MIN_ENVELOPE_LEN,
            });
        }
        Ok(Self { bytes })
    }

    /// The version byte.
    pub fn version(&self) -> u8 {
        self.bytes[0]
    }

    /// The initialization vector.
    pub fn iv(&self) -> &'a [u8] {
        &self.bytes[1..HEADER_LEN]
    }

    /// The ciphertext between header and tag.
    pub fn ciphertext(&self) -> &'a [u8] {
        &self.bytes[HEADER_LEN..self.mac_offset()]
    }

    /// Everything the MAC covers: version, IV and ciphertext.
    pub fn body(&self) -> &'a [u8] {
        &self.bytes[..self.mac_offset()]
    }

    /// The trailing authentication tag.
    pub fn mac(&self) -> &'a [u8] {
        &self.bytes[self.mac_offset()..]
    }

    /// Total envelope length.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false: a parsed envelope is at least [`MIN_ENVELOPE_LEN`] bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn mac_offset(&self) -> usize {
        self.bytes.len() - MAC_LEN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_short_input() {
        for len in [0, 1, HEADER_LEN, MIN_ENVELOPE_LEN - 1] {
            let bytes = vec![0u8; len];
            match EnvelopeRef::parse(&bytes) {
                Err(CryptoError::Truncated { len: got, min }) => {
                    assert_eq!(got, len);
                    assert_eq!(min, 49);
                }
                other => panic!("expected Truncated for len {}, got {:?}", len, other),
            }
        }
    }

    #[test]
    fn test_sections() {
        let mut bytes = vec![ENVELOPE_VERSION];
        bytes.extend_from_slice(&[0xaa; IV_LEN]);
        bytes.extend_from_slice(&[0xbb; 32]);
        bytes.extend_from_slice(&[0xcc; MAC_LEN]);

        let env = EnvelopeRef::parse(&bytes).unwrap();
        assert_eq!(env.version(), 1);
        assert_eq!(env.iv(), &[0xaa; IV_LEN]);
        assert_eq!(env.ciphertext(), &[0xbb; 32]);
        assert_eq!(env.mac(), &[0xcc; MAC_LEN]);
        assert_eq!(env.body().len(), 1 + IV_LEN + 32);
        assert_eq!(env.len(), bytes.len());
    }

    #[test]
    fn test_minimum_envelope_has_empty_ciphertext() {
        let bytes = vec![0u8; MIN_ENVELOPE_LEN];
        let env = EnvelopeRef::parse(&bytes).unwrap();
        assert!(env.ciphertext().is_empty());
        assert!(!env.is_empty());
    }
}
