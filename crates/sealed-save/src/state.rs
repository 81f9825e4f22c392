//! The saved state contract and its byte encodings.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, SaveError};

/// A value that can be sealed to disk.
///
/// The state's shape is entirely the host's business. It only has to
/// round-trip through serde and have a sensible default for first runs and
/// discarded saves.
pub trait SaveState: Serialize + DeserializeOwned + Default {
    /// Post-construction setup.
    ///
    /// Runs after every fresh creation and every successful load, before the
    /// state is handed to the host. Types with nothing to rebuild keep the
    /// default no-op.
    fn initialize(&mut self) {}
}

/// A default state with [`SaveState::initialize`] already applied.
pub fn fresh_state<S: SaveState>() -> S {
    let mut state = S::default();
    state.initialize();
    state
}

/// Plaintext encoding used inside the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateCodec {
    /// JSON via serde_json.
    #[default]
    Json,
    /// CBOR via ciborium.
    Cbor,
}

impl StateCodec {
    /// Serialize `state`.
    pub fn encode<S: Serialize>(&self, state: &S) -> Result<Vec<u8>> {
        match self {
            StateCodec::Json => {
                serde_json::to_vec(state).map_err(|e| SaveError::Encode(e.to_string()))
            }
            StateCodec::Cbor => {
                let mut buf = Vec::new();
                ciborium::into_writer(state, &mut buf)
                    .map_err(|e| SaveError::Encode(e.to_string()))?;
                Ok(buf)
            }
        }
    }

    /// Deserialize a state, reporting an encoded null as [`SaveError::EmptyState`].
    pub fn decode<S: DeserializeOwned>(&self, bytes: &[u8]) -> Result<S> {
        let decoded: Option<S> = match self {
            StateCodec::Json => {
                serde_json::from_slice(bytes).map_err(|e| SaveError::Decode(e.to_string()))?
            }
            StateCodec::Cbor => {
                ciborium::from_reader(bytes).map_err(|e| SaveError::Decode(e.to_string()))?
            }
        };
        decoded.ok_or(SaveError::EmptyState)
    }
}
