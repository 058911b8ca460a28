use crate::core::amount::Amount;
use crate::core::fees::{estimate_transaction_size, FeePolicy};
use crate::core::transaction::StagedTransaction;
use crate::error::{Result, WalletError};
use log::debug;

/// Entry credits charged per started KiB of encoded transaction
pub const CREDITS_PER_KIB: u64 = 10;
/// Entry credits charged per signature (one per input)
pub const CREDITS_PER_SIGNATURE: u64 = 10;

/// Prices a transaction in entry credits and converts at the factoid/credit rate
#[derive(Debug, Clone)]
pub struct CreditRateFeeCalculator {
    /// Factoshis paid per entry credit
    pub factoshis_per_credit: u64,
}

impl CreditRateFeeCalculator {
    pub fn new(factoshis_per_credit: u64) -> Result<Self> {
        if factoshis_per_credit == 0 {
            return Err(WalletError::Config(
                "Factoshis per credit cannot be zero".to_string(),
            ));
        }
        Ok(Self {
            factoshis_per_credit,
        })
    }

    pub fn credits_for(&self, tx: &StagedTransaction) -> u64 {
        let shape = tx.shape();
        let size = estimate_transaction_size(shape) as u64;
        let kib = size.div_ceil(1024);
        CREDITS_PER_KIB * kib + CREDITS_PER_SIGNATURE * shape.inputs as u64
    }
}

impl FeePolicy for CreditRateFeeCalculator {
    fn compute_fee(&self, tx: &StagedTransaction) -> Result<Amount> {
        let credits = self.credits_for(tx);
        let fee = Amount::new(self.factoshis_per_credit).checked_mul(credits)?;
        debug!(
            "Fee for {}: {credits} credits at {} = {fee}",
            tx.get_name(),
            self.factoshis_per_credit
        );
        Ok(fee)
    }
}
