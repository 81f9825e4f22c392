//! # Sealed Save Core
//!
//! Pure primitives for sealed-save: master keys, subkey derivation, and the
//! authenticated envelope that wraps every save file.
//!
//! This crate contains no I/O. It is pure computation over key material and
//! byte buffers.
//!
//! ## Key Types
//!
//! - [`MasterKey`] - The 256-bit root secret, zeroed on drop
//! - [`SubKeys`] - Cipher and MAC keys derived from a master key
//! - [`EnvelopeRef`] - Borrowed view over a length-checked envelope
//!
//! ## Envelope Format
//!
//! ```text
//! [1 byte version=1][16 bytes IV][N bytes AES-256-CBC ciphertext][32 bytes HMAC-SHA256]
//! ```
//!
//! The MAC covers everything preceding it and is verified before any
//! decryption is attempted. See the [`cipher`] module.

pub mod cipher;
pub mod envelope;
pub mod error;
pub mod key;

pub use cipher::{constant_time_eq, decrypt, encrypt, encrypt_with_iv};
pub use envelope::{EnvelopeRef, ENVELOPE_VERSION, IV_LEN, MAC_LEN, MIN_ENVELOPE_LEN};
pub use error::{CryptoError, ErrorKind, Result};
pub use key::{derive_subkeys, MasterKey, SubKeys, CIPHER_KEY_LABEL, KEY_LEN, MAC_KEY_LABEL};
