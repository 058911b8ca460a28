//! Fee calculation for staged transactions
//!
//! The fee is a pure function of a transaction's shape (how many inputs,
//! outputs and entry credit outputs it has), never of its amounts. Adding
//! the fee to an input therefore leaves the fee unchanged, and subtracting
//! it again restores the input exactly.
//!
//! Two policies are available:
//! - Fixed: a constant amount
//! - Credit rate: entry credits for size and signatures, converted at a
//!   configured factoshi-per-credit rate

pub mod fixed;
pub mod rate;

pub use fixed::FixedFeeCalculator;
pub use rate::CreditRateFeeCalculator;

use crate::core::address::KEY_LEN;
use crate::core::amount::Amount;
use crate::core::codec::{MAX_VARINT_LEN, SIGNATURE_BLOCK_LEN, TIMESTAMP_LEN};
use crate::core::transaction::{StagedTransaction, TransactionShape};
use crate::error::Result;
use log::info;
use serde::{Deserialize, Serialize};

/// Computes the fee a staged transaction must carry
pub trait FeePolicy {
    fn compute_fee(&self, tx: &StagedTransaction) -> Result<Amount>;
}

/// Fee calculation mode, as written in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FeeMode {
    Fixed { amount: u64 },
    CreditRate { factoshis_per_credit: u64 },
}

impl Default for FeeMode {
    fn default() -> Self {
        FeeMode::CreditRate {
            factoshis_per_credit: DEFAULT_FACTOSHIS_PER_CREDIT,
        }
    }
}

/// Default exchange rate used when none is configured
pub const DEFAULT_FACTOSHIS_PER_CREDIT: u64 = 1_000;

/// Upper bound on encoded size for the given shape.
///
/// Amounts are counted at the widest varint so the estimate does not move
/// when an amount changes.
pub fn estimate_transaction_size(shape: TransactionShape) -> usize {
    let header = 1 + TIMESTAMP_LEN + 3;
    let entry = MAX_VARINT_LEN + KEY_LEN;

    header
        + shape.inputs * (entry + SIGNATURE_BLOCK_LEN)
        + shape.outputs * entry
        + shape.ec_outputs * entry
}

/// Fee calculator selected by [`FeeMode`]
#[derive(Debug, Clone)]
pub enum FeeCalculator {
    Fixed(FixedFeeCalculator),
    CreditRate(CreditRateFeeCalculator),
}

impl FeeCalculator {
    pub fn new(mode: &FeeMode) -> Result<Self> {
        let calculator = match mode {
            FeeMode::Fixed { amount } => {
                info!("Using fixed fee of {amount} factoshis");
                FeeCalculator::Fixed(FixedFeeCalculator::new(*amount))
            }
            FeeMode::CreditRate {
                factoshis_per_credit,
            } => {
                info!("Using credit-rate fee at {factoshis_per_credit} factoshis per credit");
                FeeCalculator::CreditRate(CreditRateFeeCalculator::new(*factoshis_per_credit)?)
            }
        };
        Ok(calculator)
    }

    pub fn get_config_summary(&self) -> String {
        match self {
            FeeCalculator::Fixed(calculator) => {
                format!("Fixed fee: {} factoshis", calculator.get_fee_amount())
            }
            FeeCalculator::CreditRate(calculator) => format!(
                "Credit rate fee: {} factoshis per credit",
                calculator.factoshis_per_credit
            ),
        }
    }
}

impl FeePolicy for FeeCalculator {
    fn compute_fee(&self, tx: &StagedTransaction) -> Result<Amount> {
        match self {
            FeeCalculator::Fixed(calculator) => calculator.compute_fee(tx),
            FeeCalculator::CreditRate(calculator) => calculator.compute_fee(tx),
        }
    }
}
