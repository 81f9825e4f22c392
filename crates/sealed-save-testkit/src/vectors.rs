//! Golden test vectors for key derivation and the save envelope.
//!
//! Any implementation that reads or writes save files must reproduce these
//! bytes exactly. Envelope vectors use a fixed IV so the output is
//! deterministic.

use sealed_save_core::{decrypt, derive_subkeys, encrypt_with_iv, MasterKey, IV_LEN};

/// IV used by every envelope vector.
pub const VECTOR_IV: [u8; IV_LEN] = [0x24; IV_LEN];

/// Master key `00 01 02 .. 1f`.
pub const COUNTING_KEY: [u8; 32] = {
    let mut key = [0u8; 32];
    let mut i = 0;
    while i < 32 {
        key[i] = i as u8;
        i += 1;
    }
    key
};

/// A subkey derivation vector.
#[derive(Debug, Clone)]
pub struct DerivationVector {
    pub name: &'static str,
    pub master: [u8; 32],
    /// Expected SHA-256(master || "AES_KEY"), hex.
    pub cipher_key: &'static str,
    /// Expected SHA-256(master || "HMAC_KEY"), hex.
    pub mac_key: &'static str,
}

/// An envelope vector: `plaintext` sealed under `master` with [`VECTOR_IV`].
#[derive(Debug, Clone)]
pub struct EnvelopeVector {
    pub name: &'static str,
    pub master: [u8; 32],
    pub plaintext: &'static [u8],
    /// Expected envelope bytes, hex.
    pub envelope: &'static str,
}

/// A stored-key encoding vector.
#[derive(Debug, Clone)]
pub struct KeyEncodingVector {
    pub master: [u8; 32],
    /// Expected standard base64 with padding.
    pub base64: &'static str,
}

pub fn derivation_vectors() -> Vec<DerivationVector> {
    vec![
        DerivationVector {
            name: "zero master",
            master: [0x00; 32],
            cipher_key: "97988ade15ab9dd4bada0e1b1ee52168a79dd44f68078f0af9d38ced39c17519",
            mac_key: "2040aef35611ef1e65f7a98d501dca3659a161415512b0f3dd04b56a8089aff3",
        },
        DerivationVector {
            name: "0x42 master",
            master: [0x42; 32],
            cipher_key: "c36b07c6d1b5f404fa93ead1bfe682f8a77ae4f08bcb2d52fb3ced61d849abfd",
            mac_key: "5f76e1463f0964e42bc27c22e7d582be2e650e762158235033fccd018cf74fc5",
        },
        DerivationVector {
            name: "counting master",
            master: COUNTING_KEY,
            cipher_key: "d0bd869afa96d358d8f670ae970b32dea511eff531653343eafbd4ecb9179ff7",
            mac_key: "5d9e1d44347facc76dde28e84da7f78d824c8f9b11048c8a325ad05621c393a4",
        },
    ]
}

pub fn envelope_vectors() -> Vec<EnvelopeVector> {
    vec![
        EnvelopeVector {
            name: "empty plaintext",
            master: [0x42; 32],
            plaintext: b"",
            envelope: "0124242424242424242424242424242424\
                       b15698e7bb4f3260e2fad8fafb9265cd\
                       ad83b625b3ace8f26eb393b1950caa8fbb1cd382601f53846ab2dcc1d7c94191",
        },
        EnvelopeVector {
            name: "hello",
            master: [0x42; 32],
            plaintext: b"hello",
            envelope: "0124242424242424242424242424242424\
                       f0e76c2ca22e2b8749e36a2508c06e46\
                       6e9610521b322ff3f2ca060083796465b4bbeff90aa60c117389cd9d57eb5e52",
        },
        EnvelopeVector {
            name: "json state",
            master: [0x42; 32],
            plaintext: br#"{"coins":250,"level":3}"#,
            envelope: "0124242424242424242424242424242424\
                       ff0da8ae4a8a889f9a75bbc9b366f1c6aab58cf63d9ec9d3f47e3896b46a7ddc\
                       78a10d1513cd70f48743a21bd91c896f74d30b13f0ab9d6d17e7967186253531",
        },
    ]
}

pub fn key_encoding_vectors() -> Vec<KeyEncodingVector> {
    vec![
        KeyEncodingVector {
            master: [0x42; 32],
            base64: "QkJCQkJCQkJCQkJCQkJCQkJCQkJCQkJCQkJCQkJCQkI=",
        },
        KeyEncodingVector {
            master: COUNTING_KEY,
            base64: "AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8=",
        },
    ]
}

/// Check every derivation and envelope vector.
///
/// Returns `(name, matches, actual_hex)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    let mut results = Vec::new();

    for v in derivation_vectors() {
        let keys = derive_subkeys(&MasterKey::from_bytes(v.master));
        let cipher_hex = hex::encode(keys.cipher_key());
        let mac_hex = hex::encode(keys.mac_key());
        let matches = cipher_hex == v.cipher_key && mac_hex == v.mac_key;
        results.push((v.name.to_string(), matches, format!("{}:{}", cipher_hex, mac_hex)));
    }

    for v in envelope_vectors() {
        let actual = encrypt_with_iv(v.plaintext, &MasterKey::from_bytes(v.master), &VECTOR_IV)
            .map(hex::encode)
            .unwrap_or_else(|e| format!("error: {}", e));
        let matches = actual == v.envelope;
        results.push((v.name.to_string(), matches, actual));
    }

    results
}

/// Decrypt the hex envelope of `vector`.
pub fn open_vector(vector: &EnvelopeVector) -> Option<Vec<u8>> {
    let bytes = hex::decode(vector.envelope).ok()?;
    decrypt(&bytes, &MasterKey::from_bytes(vector.master)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_match() {
        for (name, matches, actual) in verify_all_vectors() {
            assert!(matches, "vector '{}' mismatch, got {}", name, actual);
        }
    }

    #[test]
    fn test_envelope_vectors_decrypt() {
        for v in envelope_vectors() {
            assert_eq!(open_vector(&v).as_deref(), Some(v.plaintext), "{}", v.name);
        }
    }

    #[test]
    fn test_envelope_vector_lengths() {
        for v in envelope_vectors() {
            let bytes = hex::decode(v.envelope).unwrap();
            let padded = (v.plaintext.len() / 16 + 1) * 16;
            assert_eq!(bytes.len(), 1 + 16 + padded + 32, "{}", v.name);
        }
    }

    #[test]
    fn test_vectors_reject_other_key() {
        let v = &envelope_vectors()[1];
        let bytes = hex::decode(v.envelope).unwrap();
        assert!(decrypt(&bytes, &MasterKey::from_bytes([0x43; 32])).is_err());
    }

    #[test]
    fn test_stored_key_vectors_load() {
        use sealed_save::store::{
            MasterKeyStore, MemoryPreferences, PreferenceStore, DEFAULT_KEY_NAME,
        };

        for v in key_encoding_vectors() {
            let prefs = MemoryPreferences::new();
            prefs.set_string(DEFAULT_KEY_NAME, v.base64).unwrap();
            let mut keys = MasterKeyStore::new(prefs, DEFAULT_KEY_NAME);
            assert_eq!(keys.get_or_create(), &MasterKey::from_bytes(v.master));
        }
    }

    #[test]
    fn test_counting_key() {
        assert_eq!(COUNTING_KEY[0], 0);
        assert_eq!(COUNTING_KEY[31], 31);
    }
}
