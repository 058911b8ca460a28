//! Keys, signing and address resolution
//!
//! Named Ed25519 keypairs live in the wallet database. The [`Wallets`]
//! collection resolves names to addresses for the staging engine and signs
//! transaction inputs.

pub mod signer;
#[allow(clippy::module_inception)]
pub mod wallet;
pub mod wallets;

pub use signer::Signer;
pub use wallet::Wallet;
pub use wallets::{AddressEntry, Wallets, CREDIT_KEYS_TREE, FACTOID_KEYS_TREE};
