//! # Staging Wallet - Named Transactions Built Step by Step
//!
//! A wallet-side engine for assembling factoid transactions across many
//! separate invocations. Here's what I need to remember when I come back:
//!
//! ## What It Does
//! - **Staging**: a transaction is created under a name, then inputs,
//!   outputs and entry credit outputs are added one command at a time
//! - **Fees**: the fee depends only on the transaction's shape and is folded
//!   into one input, so settling and unsettling it round-trips exactly
//! - **Signing**: only balanced, unsigned transactions are signed; every
//!   input gets an Ed25519 signature from the key store
//! - **Compose**: signed transactions encode to a JSON-RPC submission payload
//! - **Keys**: named factoid and entry credit addresses, generated or imported
//!
//! ## How the Code Is Organized
//! - `core/`: amounts, addresses, the staged transaction, codec, fees and the stager
//! - `storage/`: the sled database and the staging store
//! - `wallet/`: keypairs, the named key store, the signer interface
//! - `config/`: defaults, TOML file and environment overrides
//! - `utils/`: hashing, signing and serialization helpers
//! - `cli/`: the command definitions used by `main.rs`
//!
//! ## Where to Start
//! 1. `main.rs` for the commands
//! 2. `core/staging.rs` for how each command touches the store
//! 3. `core/transaction.rs` for the rules a staged transaction enforces

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod storage;
pub mod utils;
pub mod wallet;

#[cfg(test)]
pub mod test_utils;

pub use cli::{AddressKindArg, Command, Opt};
pub use config::Config;
pub use core::{
    AddressKind, AddressResolver, Amount, CreditAddress, FeeCalculator, FeeMode, FeePolicy,
    LiteralResolver, StagedTransaction, TransactionReport, TransactionStager, TxState,
    ValueAddress, FACTOSHIS_PER_FACTOID,
};
pub use error::{Result, WalletError};
pub use storage::{StagingStore, WalletDb};
pub use utils::{current_timestamp, sha256_digest, sha256d_digest};
pub use wallet::{AddressEntry, Signer, Wallet, Wallets};
