//! Error types for save and load operations.

use sealed_save_core::{CryptoError, ErrorKind};
use sealed_save_store::StoreError;
use thiserror::Error;

/// Errors that can occur while saving or loading state.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Envelope could not be sealed or opened.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Filesystem or preference store failure.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// State could not be serialized.
    #[error("state encoding error: {0}")]
    Encode(String),

    /// Authenticated plaintext did not deserialize into the state type.
    #[error("state decoding error: {0}")]
    Decode(String),

    /// Authenticated plaintext decoded to null.
    #[error("saved state decoded to an empty value")]
    EmptyState,
}

impl SaveError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SaveError::Crypto(e) => e.kind(),
            SaveError::Store(e) => e.kind(),
            SaveError::Encode(_) | SaveError::Decode(_) | SaveError::EmptyState => {
                ErrorKind::DataCorrupt
            }
        }
    }

    /// Whether the save file was read but its content is unusable.
    ///
    /// False for filesystem failures, where the file itself may be fine.
    pub fn is_content_error(&self) -> bool {
        matches!(
            self,
            SaveError::Crypto(_) | SaveError::Decode(_) | SaveError::EmptyState
        )
    }
}

/// Result type for save and load operations.
pub type Result<T> = std::result::Result<T, SaveError>;
