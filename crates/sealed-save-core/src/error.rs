//! Error types for sealed-save core.

use thiserror::Error;

/// Coarse failure taxonomy shared by every crate in the workspace.
///
/// Call sites that only need to decide what to do (discard, retry on next
/// mutation, report) match on this rather than on the concrete error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or wrong-length key material.
    Key,
    /// Envelope too short to be well formed.
    Integrity,
    /// MAC mismatch: tampering or corruption.
    Authentication,
    /// Envelope written by an unsupported format version.
    Version,
    /// Padding or deserialization failure after authentication.
    DataCorrupt,
    /// Filesystem failure on read, write, rename or delete.
    Io,
}

/// Errors raised while sealing or opening an envelope.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid key length: expected 32 bytes, got {0}")]
    InvalidKey(usize),

    #[error("envelope truncated: {len} bytes, need at least {min}")]
    Truncated { len: usize, min: usize },

    #[error("envelope authentication failed")]
    Authentication,

    #[error("unsupported envelope version: {0}")]
    UnsupportedVersion(u8),

    #[error("invalid block padding")]
    Padding,
}

impl CryptoError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CryptoError::InvalidKey(_) => ErrorKind::Key,
            CryptoError::Truncated { .. } => ErrorKind::Integrity,
            CryptoError::Authentication => ErrorKind::Authentication,
            CryptoError::UnsupportedVersion(_) => ErrorKind::Version,
            CryptoError::Padding => ErrorKind::DataCorrupt,
        }
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
