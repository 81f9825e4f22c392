//! Proptest generators for property-based testing.

use proptest::prelude::*;

use sealed_save_core::{MasterKey, IV_LEN};

use crate::fixtures::GameProgress;

/// Generate a random master key.
pub fn master_key() -> impl Strategy<Value = MasterKey> {
    any::<[u8; 32]>().prop_map(MasterKey::from_bytes)
}

/// Generate a random IV.
pub fn iv() -> impl Strategy<Value = [u8; IV_LEN]> {
    any::<[u8; IV_LEN]>()
}

/// Generate plaintext bytes of at most `max_len`.
pub fn plaintext(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate an item identifier.
pub fn item_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,15}".prop_map(String::from)
}

impl Arbitrary for GameProgress {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            any::<u64>(),
            1u32..=100u32,
            prop::collection::vec(item_name(), 0..8),
            any::<Option<u16>>(),
        )
            .prop_map(|(coins, level, unlocked, best_lap_ms)| GameProgress {
                coins,
                level,
                unlocked,
                best_lap_ms,
                initialized: false,
            })
            .boxed()
    }
}
