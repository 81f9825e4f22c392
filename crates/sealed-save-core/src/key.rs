//! Master key material and subkey derivation.
//!
//! A single 256-bit master key is hashed with two distinct labels to obtain
//! the AES key and the HMAC key:
//!
//! ```text
//! cipher_key = SHA-256(master || "AES_KEY")
//! mac_key    = SHA-256(master || "HMAC_KEY")
//! ```
//!
//! Neither subkey is ever persisted; both are recomputed on demand.

use std::fmt;

use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::cipher::constant_time_eq;
use crate::error::{CryptoError, Result};

/// Length in bytes of the master key and of each subkey.
pub const KEY_LEN: usize = 32;

/// Domain-separation label for the cipher key.
pub const CIPHER_KEY_LABEL: &[u8] = b"AES_KEY";

/// Domain-separation label for the MAC key.
pub const MAC_KEY_LABEL: &[u8] = b"HMAC_KEY";

/// A 256-bit master key.
///
/// The buffer is zeroed when the value is dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey([u8; KEY_LEN]);

impl MasterKey {
    /// Generate a new random key from the thread-local CSPRNG.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let mut bytes = [0u8; KEY_LEN];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Create from a slice, rejecting anything that is not exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKey(bytes.len()))?;
        Ok(Self(arr))
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Derive the cipher and MAC subkeys.
    pub fn derive(&self) -> SubKeys {
        derive_subkeys(self)
    }

    /// Short non-secret identifier for log lines.
    ///
    /// First four bytes of `SHA-256(master)`, hex encoded.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0);
        hex::encode(&digest[..4])
    }
}

impl PartialEq for MasterKey {
    fn eq(&self, other: &Self) -> bool {
        constant_time_eq(&self.0, &other.0)
    }
}

impl Eq for MasterKey {}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MasterKey(fp:{})", self.fingerprint())
    }
}

/// Subkeys derived from a [`MasterKey`].
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SubKeys {
    cipher_key: [u8; KEY_LEN],
    mac_key: [u8; KEY_LEN],
}

impl SubKeys {
    /// AES-256 key.
    pub fn cipher_key(&self) -> &[u8; KEY_LEN] {
        &self.cipher_key
    }

    /// HMAC-SHA256 key.
    pub fn mac_key(&self) -> &[u8; KEY_LEN] {
        &self.mac_key
    }
}

impl fmt::Debug for SubKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SubKeys(..)")
    }
}

/// Derive the cipher and MAC subkeys from a master key.
pub fn derive_subkeys(master: &MasterKey) -> SubKeys {
    SubKeys {
        cipher_key: labelled_hash(master.as_bytes(), CIPHER_KEY_LABEL),
        mac_key: labelled_hash(master.as_bytes(), MAC_KEY_LABEL),
    }
}

fn labelled_hash(master: &[u8; KEY_LEN], label: &[u8]) -> [u8; KEY_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(master);
    hasher.update(label);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivation_deterministic() {
        let master = MasterKey::from_bytes([0x42; 32]);
        let a = master.derive();
        let b = derive_subkeys(&master);

        assert_eq!(a.cipher_key(), b.cipher_key());
        assert_eq!(a.mac_key(), b.mac_key());
    }

    #[test]
    fn test_subkeys_are_independent() {
        let keys = MasterKey::generate().derive();
        assert_ne!(keys.cipher_key(), keys.mac_key());
    }

    #[test]
    fn test_distinct_masters_distinct_subkeys() {
        let k1 = MasterKey::generate();
        let k2 = MasterKey::generate();
        assert_ne!(k1, k2);

        let s1 = k1.derive();
        let s2 = k2.derive();
        assert_ne!(s1.cipher_key(), s2.cipher_key());
        assert_ne!(s1.mac_key(), s2.mac_key());
    }

    #[test]
    fn test_zero_master_known_answer() {
        let keys = MasterKey::from_bytes([0u8; 32]).derive();
        assert_eq!(
            hex::encode(keys.cipher_key()),
            "97988ade15ab9dd4bada0e1b1ee52168a79dd44f68078f0af9d38ced39c17519"
        );
        assert_eq!(
            hex::encode(keys.mac_key()),
            "2040aef35611ef1e65f7a98d501dca3659a161415512b0f3dd04b56a8089aff3"
        );
    }

    #[test]
    fn test_from_slice_rejects_wrong_length() {
        assert!(matches!(
            MasterKey::from_slice(&[0u8; 31]),
            Err(CryptoError::InvalidKey(31))
        ));
        assert!(matches!(
            MasterKey::from_slice(&[0u8; 33]),
            Err(CryptoError::InvalidKey(33))
        ));
        assert!(MasterKey::from_slice(&[7u8; 32]).is_ok());
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let master = MasterKey::from_bytes([0xab; 32]);
        let rendered = format!("{:?}", master);
        assert!(!rendered.contains(&hex::encode([0xab; 32])));
        assert!(rendered.starts_with("MasterKey(fp:"));
    }

    #[test]
    fn test_zeroize_clears_buffer() {
        let mut master = MasterKey::from_bytes([0x11; 32]);
        master.zeroize();
        assert_eq!(master.as_bytes(), &[0u8; 32]);
    }
}
