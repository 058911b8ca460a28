use crate::core::amount::Amount;
use crate::core::fees::FeePolicy;
use crate::core::transaction::StagedTransaction;
use crate::error::Result;
use log::debug;

/// Charges the same fee for every transaction, whatever its shape
#[derive(Debug, Clone)]
pub struct FixedFeeCalculator {
    /// Fixed fee amount in factoshis
    pub fee_amount: Amount,
}

impl FixedFeeCalculator {
    pub fn new(fee_amount: u64) -> Self {
        Self {
            fee_amount: Amount::new(fee_amount),
        }
    }

    pub fn get_fee_amount(&self) -> Amount {
        self.fee_amount
    }
}

impl FeePolicy for FixedFeeCalculator {
    fn compute_fee(&self, tx: &StagedTransaction) -> Result<Amount> {
        debug!("Using fixed fee {} for {}", self.fee_amount, tx.get_name());
        Ok(self.fee_amount)
    }
}
