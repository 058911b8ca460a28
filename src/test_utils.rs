//! Test utilities for staging tests

use crate::core::address::AddressKind;
use crate::core::fees::{FeeCalculator, FeeMode};
use crate::core::staging::TransactionStager;
use crate::error::{Result, WalletError};
use crate::storage::WalletDb;
use tempfile::TempDir;

/// Fee used by staging tests unless a test picks its own
pub const TEST_FEE: u64 = 10;

/// Create a temporary directory for testing
pub fn create_temp_dir() -> Result<TempDir> {
    tempfile::tempdir().map_err(|e| WalletError::Io(e.to_string()))
}

/// Create a wallet database in temporary storage
pub fn create_test_wallet_db() -> Result<(WalletDb, TempDir)> {
    let temp_dir = create_temp_dir()?;
    let db = WalletDb::open(temp_dir.path().join("test_wallet"))?;
    Ok((db, temp_dir))
}

/// Create a stager over a fresh database with a fixed fee of [`TEST_FEE`]
pub fn create_test_stager() -> Result<(WalletDb, TransactionStager, TempDir)> {
    let (db, temp_dir) = create_test_wallet_db()?;
    let fees = FeeCalculator::new(&FeeMode::Fixed { amount: TEST_FEE })?;
    let stager = TransactionStager::new(db.staging_store().clone(), fees);
    Ok((db, stager, temp_dir))
}

/// Generate `count` named factoid addresses (`fct0`, `fct1`, ...)
pub fn create_test_addresses(db: &WalletDb, count: usize) -> Result<Vec<String>> {
    let mut addresses = Vec::new();
    for i in 0..count {
        let address = db
            .wallets()
            .create_wallet(AddressKind::Factoid, &format!("fct{i}"))?;
        addresses.push(address);
    }
    Ok(addresses)
}
