//! Utility functions and helpers
//!
//! Hashing, Ed25519 signing, base58 text and record encoding used
//! throughout the wallet.

pub mod crypto;
pub mod serialization;

pub use crypto::{
    base58_decode, base58_encode, current_timestamp, ed25519_public_key, ed25519_sign,
    ed25519_verify, new_seed, sha256_digest, sha256d_digest, SEED_LEN,
};

pub use serialization::{deserialize, serialize};
