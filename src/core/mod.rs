//! Transaction staging core
//!
//! This module contains the value types (amounts, addresses), the staged
//! transaction aggregate, the wire codec, fee policies and the staging
//! engine that ties them to the store.

pub mod address;
pub mod amount;
pub mod codec;
pub mod fees;
pub mod staging;
pub mod transaction;

pub use address::{AddressKind, AddressResolver, CreditAddress, LiteralResolver, ValueAddress};
pub use amount::{Amount, FACTOSHIS_PER_FACTOID};
pub use codec::{compose_payload, encode_transaction, signing_message};
pub use fees::{FeeCalculator, FeeMode, FeePolicy};
pub use staging::{TransactionReport, TransactionStager};
pub use transaction::{
    ECOutputEntry, InputEntry, InputSignature, OutputEntry, StagedTransaction, TxState,
};
