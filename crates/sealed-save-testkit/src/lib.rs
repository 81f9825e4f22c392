//! # Sealed Save Testkit
//!
//! Testing utilities for Sealed Save.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Fixed subkeys and envelopes every implementation must reproduce
//! - **Generators**: Proptest strategies for keys, plaintexts and states
//! - **Fixtures**: A temp save directory, shared preferences and recording collaborators
//!
//! ## Golden Vectors
//!
//! ```rust
//! use sealed_save_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, actual) in verify_all_vectors() {
//!     assert!(matches, "{}: {}", name, actual);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use sealed_save_testkit::{generators::master_key, GameProgress};
//!
//! proptest! {
//!     #[test]
//!     fn state_survives_sealing(state in any::<GameProgress>(), key in master_key()) {
//!         // ...
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use sealed_save_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let mut saves = fixture.manager();
//! saves.load_or_create();
//! saves.save_now().unwrap();
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{init_tracing, GameProgress, RecordingEconomy, RecordingScenes, TestFixture};
pub use generators::{master_key, plaintext};
pub use vectors::{derivation_vectors, envelope_vectors, verify_all_vectors, VECTOR_IV};
