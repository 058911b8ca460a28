//! The staging engine
//!
//! [`TransactionStager`] drives every named-transaction operation through
//! the staging store. Each operation is one atomic read-modify-write, so a
//! rejected step leaves the stored entry exactly as it was.

use crate::core::address::AddressResolver;
use crate::core::amount::Amount;
use crate::core::codec::{compose_payload, signing_message};
use crate::core::fees::{FeeCalculator, FeePolicy};
use crate::core::transaction::{StagedTransaction, TxState};
use crate::error::Result;
use crate::storage::StagingStore;
use crate::wallet::Signer;
use log::{debug, info};

/// Snapshot of an entry together with the fee it currently owes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReport {
    pub transaction: StagedTransaction,
    pub state: TxState,
    /// Fee the current shape owes
    pub fee: Amount,
    /// `inputs - (outputs + ec_outputs)`; zero when ready to sign
    pub difference: i128,
}

pub struct TransactionStager {
    store: StagingStore,
    fees: FeeCalculator,
}

impl TransactionStager {
    pub fn new(store: StagingStore, fees: FeeCalculator) -> TransactionStager {
        TransactionStager { store, fees }
    }

    pub fn get_fee_calculator(&self) -> &FeeCalculator {
        &self.fees
    }

    pub fn new_transaction(&self, name: &str) -> Result<StagedTransaction> {
        let tx = self.store.create(name)?;
        info!("New transaction {name}");
        Ok(tx)
    }

    pub fn remove_transaction(&self, name: &str) -> Result<()> {
        self.store.delete(name)?;
        info!("Removed transaction {name}");
        Ok(())
    }

    pub fn list_transactions(&self) -> Result<Vec<String>> {
        self.store.list()
    }

    pub fn get_transaction(&self, name: &str) -> Result<StagedTransaction> {
        self.store.get(name)
    }

    pub fn describe_transaction(&self, name: &str) -> Result<TransactionReport> {
        let transaction = self.store.get(name)?;
        let fee = self.fees.compute_fee(&transaction)?;
        let difference = transaction.balance_difference()?;
        Ok(TransactionReport {
            state: transaction.state(),
            transaction,
            fee,
            difference,
        })
    }

    pub fn add_input<R: AddressResolver>(
        &self,
        resolver: &R,
        name: &str,
        address: &str,
        amount: Amount,
    ) -> Result<StagedTransaction> {
        let address = resolver.resolve_value_address(address)?;
        let (tx, _) = self
            .store
            .update(name, |tx| tx.add_input(address, amount))?;
        debug!("Added input {address} ({amount}) to {name}");
        Ok(tx)
    }

    pub fn add_output<R: AddressResolver>(
        &self,
        resolver: &R,
        name: &str,
        address: &str,
        amount: Amount,
    ) -> Result<StagedTransaction> {
        let address = resolver.resolve_value_address(address)?;
        let (tx, _) = self
            .store
            .update(name, |tx| tx.add_output(address, amount))?;
        debug!("Added output {address} ({amount}) to {name}");
        Ok(tx)
    }

    pub fn add_ec_output<R: AddressResolver>(
        &self,
        resolver: &R,
        name: &str,
        address: &str,
        amount: Amount,
    ) -> Result<StagedTransaction> {
        let address = resolver.resolve_credit_address(address)?;
        let (tx, _) = self
            .store
            .update(name, |tx| tx.add_ec_output(address, amount))?;
        debug!("Added entry credit output {address} ({amount}) to {name}");
        Ok(tx)
    }

    /// Fee owed by the entry's current shape
    pub fn compute_fee(&self, name: &str) -> Result<Amount> {
        let tx = self.store.get(name)?;
        self.fees.compute_fee(&tx)
    }

    /// Settle the fee against the first input spending from `address`;
    /// returns the fee that was added
    pub fn add_fee<R: AddressResolver>(
        &self,
        resolver: &R,
        name: &str,
        address: &str,
    ) -> Result<Amount> {
        let address = resolver.resolve_value_address(address)?;
        let (_, fee) = self.store.update(name, |tx| {
            // I price the fee from the shape as it is right now, inside the update
            let fee = self.fees.compute_fee(tx)?;
            tx.add_fee_to_input(&address, fee)?;
            Ok(fee)
        })?;
        info!("Added fee {fee} to input {address} of {name}");
        Ok(fee)
    }

    /// Inverse of [`add_fee`](Self::add_fee); returns the fee that was removed.
    ///
    /// A settled fee comes out at the amount it went in with, so sub then
    /// add re-prices the fee after the shape has changed.
    pub fn sub_fee<R: AddressResolver>(
        &self,
        resolver: &R,
        name: &str,
        address: &str,
    ) -> Result<Amount> {
        let address = resolver.resolve_value_address(address)?;
        let (_, fee) = self.store.update(name, |tx| {
            let owed = self.fees.compute_fee(tx)?;
            tx.sub_fee_from_input(&address, owed)
        })?;
        info!("Subtracted fee {fee} from input {address} of {name}");
        Ok(fee)
    }

    /// Validate, sign every input and freeze the entry.
    ///
    /// Signing happens on the working copy; if any input cannot be signed
    /// the stored entry is untouched.
    pub fn sign<S: Signer>(&self, signer: &S, name: &str) -> Result<StagedTransaction> {
        let (tx, _) = self.store.update(name, |tx| {
            // The fee is already inside the inputs; it is computed here only
            // so an imbalance report can show what is owed
            let fee = self.fees.compute_fee(tx)?;
            tx.check_signable(fee)?;

            // Every input signs the same message: the encoding without signatures
            let message = signing_message(tx);
            let signatures = tx
                .get_inputs()
                .iter()
                .map(|input| signer.sign(input.get_address(), &message))
                .collect::<Result<Vec<_>>>()?;
            tx.apply_signatures(signatures)
        })?;
        info!(
            "Signed transaction {name} with {} input signature(s)",
            tx.get_signatures().len()
        );
        Ok(tx)
    }

    /// Submission payload for a signed entry. Reads only; repeat calls
    /// return identical bytes.
    pub fn compose(&self, name: &str) -> Result<Vec<u8>> {
        let tx = self.store.get(name)?;
        let payload = compose_payload(&tx)?;
        debug!("Composed {name}: {} bytes", payload.len());
        Ok(payload)
    }
}
