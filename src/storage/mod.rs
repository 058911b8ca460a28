//! Durable wallet state
//!
//! One sled database holds the staged transactions and the named keys, each
//! in its own tree. [`WalletDb`] opens the database and hands out the stores.

pub mod staging_store;
pub mod wallet_db;

pub use staging_store::{StagingStore, STAGED_TRANSACTIONS_TREE};
pub use wallet_db::WalletDb;
