// The staged transaction is the mutable record a user builds up across many
// CLI invocations before it is signed and composed for submission.
// All cross-field rules (no mutation after signing, one fee settlement,
// exact balance before signing) are enforced here so every caller gets them.
// The fee has no entry of its own: settling it inflates one input, so a
// signable transaction has inputs exactly equal to its outputs.

use crate::core::address::{CreditAddress, ValueAddress, KEY_LEN};
use crate::core::amount::Amount;
use crate::error::{Result, WalletError};
use serde::{Deserialize, Serialize};
use std::fmt;

// Funds consumed from a wallet-held factoid address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct InputEntry {
    address: ValueAddress,
    amount: Amount,
}

impl InputEntry {
    pub fn new(address: ValueAddress, amount: Amount) -> InputEntry {
        InputEntry { address, amount }
    }

    pub fn get_address(&self) -> &ValueAddress {
        &self.address
    }

    pub fn get_amount(&self) -> Amount {
        self.amount
    }
}

// Funds sent to a destination factoid address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct OutputEntry {
    address: ValueAddress,
    amount: Amount,
}

impl OutputEntry {
    pub fn new(address: ValueAddress, amount: Amount) -> OutputEntry {
        OutputEntry { address, amount }
    }

    pub fn get_address(&self) -> &ValueAddress {
        &self.address
    }

    pub fn get_amount(&self) -> Amount {
        self.amount
    }
}

// Funds converted to entry credits at a destination credit address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct ECOutputEntry {
    address: CreditAddress,
    amount: Amount,
}

impl ECOutputEntry {
    pub fn new(address: CreditAddress, amount: Amount) -> ECOutputEntry {
        ECOutputEntry { address, amount }
    }

    pub fn get_address(&self) -> &CreditAddress {
        &self.address
    }

    pub fn get_amount(&self) -> Amount {
        self.amount
    }
}

/// One Ed25519 signature over the transaction, produced for one input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct InputSignature {
    public_key: [u8; KEY_LEN],
    signature: Vec<u8>,
}

impl InputSignature {
    pub const SIGNATURE_LEN: usize = 64;

    pub fn new(public_key: [u8; KEY_LEN], signature: Vec<u8>) -> Result<InputSignature> {
        if signature.len() != Self::SIGNATURE_LEN {
            return Err(WalletError::Crypto(format!(
                "Signature must be {} bytes, got {}",
                Self::SIGNATURE_LEN,
                signature.len()
            )));
        }
        Ok(InputSignature {
            public_key,
            signature,
        })
    }

    pub fn get_public_key(&self) -> &[u8; KEY_LEN] {
        &self.public_key
    }

    pub fn get_signature(&self) -> &[u8] {
        self.signature.as_slice()
    }
}

/// Lifecycle state; `Composed` is a read of a `Signed` record and is never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    Open,
    Signed,
}

impl fmt::Display for TxState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxState::Open => write!(f, "open"),
            TxState::Signed => write!(f, "signed"),
        }
    }
}

/// Entry counts that determine the size of the encoded transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionShape {
    pub inputs: usize,
    pub outputs: usize,
    pub ec_outputs: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct StagedTransaction {
    name: String,
    timestamp: u64, // milliseconds since the epoch, fixed at creation
    inputs: Vec<InputEntry>,
    outputs: Vec<OutputEntry>,
    ec_outputs: Vec<ECOutputEntry>,
    settled_fee: Option<Amount>, // what AddFee folded in, until SubFee takes it out
    signed: bool,
    signatures: Vec<InputSignature>,
}

impl StagedTransaction {
    pub fn new(name: &str, timestamp: u64) -> StagedTransaction {
        StagedTransaction {
            name: name.to_string(),
            timestamp,
            inputs: vec![],
            outputs: vec![],
            ec_outputs: vec![],
            settled_fee: None,
            signed: false,
            signatures: vec![],
        }
    }

    pub fn get_name(&self) -> &str {
        self.name.as_str()
    }

    pub fn get_timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn get_inputs(&self) -> &[InputEntry] {
        self.inputs.as_slice()
    }

    pub fn get_outputs(&self) -> &[OutputEntry] {
        self.outputs.as_slice()
    }

    pub fn get_ec_outputs(&self) -> &[ECOutputEntry] {
        self.ec_outputs.as_slice()
    }

    pub fn get_signatures(&self) -> &[InputSignature] {
        self.signatures.as_slice()
    }

    pub fn is_fee_settled(&self) -> bool {
        self.settled_fee.is_some()
    }

    pub fn get_settled_fee(&self) -> Option<Amount> {
        self.settled_fee
    }

    pub fn is_signed(&self) -> bool {
        self.signed
    }

    pub fn state(&self) -> TxState {
        if self.signed {
            TxState::Signed
        } else {
            TxState::Open
        }
    }

    pub fn shape(&self) -> TransactionShape {
        TransactionShape {
            inputs: self.inputs.len(),
            outputs: self.outputs.len(),
            ec_outputs: self.ec_outputs.len(),
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.signed {
            return Err(WalletError::SignedTransaction(self.name.clone()));
        }
        Ok(())
    }

    pub fn add_input(&mut self, address: ValueAddress, amount: Amount) -> Result<()> {
        self.ensure_open()?;
        self.inputs.push(InputEntry::new(address, amount));
        Ok(())
    }

    pub fn add_output(&mut self, address: ValueAddress, amount: Amount) -> Result<()> {
        self.ensure_open()?;
        self.outputs.push(OutputEntry::new(address, amount));
        Ok(())
    }

    pub fn add_ec_output(&mut self, address: CreditAddress, amount: Amount) -> Result<()> {
        self.ensure_open()?;
        self.ec_outputs.push(ECOutputEntry::new(address, amount));
        Ok(())
    }

    pub fn get_input_value(&self) -> Result<Amount> {
        Amount::sum(self.inputs.iter().map(InputEntry::get_amount))
    }

    // Factoid outputs plus entry credit outputs
    pub fn get_output_value(&self) -> Result<Amount> {
        let outputs = Amount::sum(self.outputs.iter().map(OutputEntry::get_amount))?;
        let ec_outputs = Amount::sum(self.ec_outputs.iter().map(ECOutputEntry::get_amount))?;
        outputs.checked_add(ec_outputs)
    }

    /// `inputs - (outputs + ec_outputs)`: positive is excess input, negative is a deficit
    pub fn balance_difference(&self) -> Result<i128> {
        let inputs = self.get_input_value()?;
        let spent = self.get_output_value()?;
        Ok(i128::from(inputs.factoshis()) - i128::from(spent.factoshis()))
    }

    fn input_position(&self, address: &ValueAddress) -> Result<usize> {
        self.inputs
            .iter()
            .position(|input| input.get_address() == address)
            .ok_or_else(|| WalletError::InputNotFound {
                name: self.name.clone(),
                address: address.to_string(),
            })
    }

    /// Fold the fee into the first input spending from `address`
    pub fn add_fee_to_input(&mut self, address: &ValueAddress, fee: Amount) -> Result<()> {
        self.ensure_open()?;
        if self.settled_fee.is_some() {
            return Err(WalletError::AlreadySettled(self.name.clone()));
        }
        let idx = self.input_position(address)?;
        self.inputs[idx].amount = self.inputs[idx].amount.checked_add(fee)?;
        self.settled_fee = Some(fee);
        Ok(())
    }

    /// Take the fee back out of the first input spending from `address`.
    ///
    /// A settled fee is removed at the amount it was added with, even if the
    /// shape has changed since; `fee` only applies when nothing is settled.
    /// Returns the amount removed.
    pub fn sub_fee_from_input(&mut self, address: &ValueAddress, fee: Amount) -> Result<Amount> {
        self.ensure_open()?;
        let idx = self.input_position(address)?;
        let fee = self.settled_fee.unwrap_or(fee);
        let current = self.inputs[idx].amount;
        let reduced = current
            .checked_sub(fee)
            .ok_or_else(|| WalletError::InsufficientAmount {
                name: self.name.clone(),
                address: address.to_string(),
                amount: current.factoshis(),
                fee: fee.factoshis(),
            })?;
        self.inputs[idx].amount = reduced;
        self.settled_fee = None;
        Ok(fee)
    }

    /// Everything signing needs, checked in order: unsigned, has inputs,
    /// has outputs, inputs equal outputs exactly. `fee` is the currently owed
    /// fee and only goes into the error report.
    pub fn check_signable(&self, fee: Amount) -> Result<()> {
        if self.signed {
            return Err(WalletError::AlreadySigned(self.name.clone()));
        }
        if self.inputs.is_empty() {
            return Err(WalletError::IncompleteTransaction {
                name: self.name.clone(),
                reason: "no inputs".to_string(),
            });
        }
        if self.outputs.is_empty() && self.ec_outputs.is_empty() {
            return Err(WalletError::IncompleteTransaction {
                name: self.name.clone(),
                reason: "no outputs or entry credit outputs".to_string(),
            });
        }

        let difference = self.balance_difference()?;
        if difference != 0 {
            return Err(WalletError::UnbalancedTransaction {
                name: self.name.clone(),
                difference,
                fee: fee.factoshis(),
            });
        }
        Ok(())
    }

    /// Attach one signature per input and freeze the transaction
    pub fn apply_signatures(&mut self, signatures: Vec<InputSignature>) -> Result<()> {
        if self.signed {
            return Err(WalletError::AlreadySigned(self.name.clone()));
        }
        if signatures.len() != self.inputs.len() {
            return Err(WalletError::Crypto(format!(
                "Expected {} signatures for transaction {}, got {}",
                self.inputs.len(),
                self.name,
                signatures.len()
            )));
        }
        self.signatures = signatures;
        self.signed = true;
        Ok(())
    }
}
