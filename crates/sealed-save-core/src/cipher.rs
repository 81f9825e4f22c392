//! Authenticated envelope encryption.
//!
//! Encrypt-then-MAC over AES-256-CBC with PKCS#7 padding and HMAC-SHA256.
//! Opening an envelope checks, in order: length, MAC (constant time),
//! version, padding. Ciphertext is never decrypted before its MAC verifies.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

use crate::envelope::{EnvelopeRef, ENVELOPE_VERSION, HEADER_LEN, IV_LEN, MAC_LEN};
use crate::error::{CryptoError, Result};
use crate::key::{MasterKey, KEY_LEN};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;
type HmacSha256 = Hmac<Sha256>;

/// Seal `plaintext` under `master` with a fresh random IV.
pub fn encrypt(plaintext: &[u8], master: &MasterKey) -> Result<Vec<u8>> {
    let mut iv = [0u8; IV_LEN];
    rand::thread_rng().fill_bytes(&mut iv);
    encrypt_with_iv(plaintext, master, &iv)
}

/// Seal `plaintext` under `master` with a caller-chosen IV.
///
/// Reusing an IV under the same key leaks plaintext structure. Outside of
/// known-answer tests, use [`encrypt`].
pub fn encrypt_with_iv(plaintext: &[u8], master: &MasterKey, iv: &[u8; IV_LEN]) -> Result<Vec<u8>> {
    let keys = master.derive();

    let ciphertext = Aes256CbcEnc::new_from_slices(keys.cipher_key(), iv)
        .map_err(|_| CryptoError::InvalidKey(KEY_LEN))?
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut out = Vec::with_capacity(HEADER_LEN + ciphertext.len() + MAC_LEN);
    out.push(ENVELOPE_VERSION);
    out.extend_from_slice(iv);
    out.extend_from_slice(&ciphertext);

    let tag = compute_mac(keys.mac_key(), &out)?;
    out.extend_from_slice(&tag);
    Ok(out)
}

/// Authenticate and open an envelope produced by [`encrypt`].
pub fn decrypt(envelope: &[u8], master: &MasterKey) -> Result<Vec<u8>> {
    let env = EnvelopeRef::parse(envelope)?;
    let keys = master.derive();

    let expected = compute_mac(keys.mac_key(), env.body())?;
    if !constant_time_eq(&expected, env.mac()) {
        return Err(CryptoError::Authentication);
    }

    if env.version() != ENVELOPE_VERSION {
        return Err(CryptoError::UnsupportedVersion(env.version()));
    }

    Aes256CbcDec::new_from_slices(keys.cipher_key(), env.iv())
        .map_err(|_| CryptoError::InvalidKey(KEY_LEN))?
        .decrypt_padded_vec_mut::<Pkcs7>(env.ciphertext())
        .map_err(|_| CryptoError::Padding)
}

/// Compare two byte strings without early exit on the first difference.
///
/// Every byte pair is visited and the XOR differences are OR-folded, so the
/// running time depends only on the length.
#[inline(never)]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

fn compute_mac(key: &[u8; KEY_LEN], data: &[u8]) -> Result<[u8; MAC_LEN]> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key)
        .map_err(|_| CryptoError::InvalidKey(key.len()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().into())
}
