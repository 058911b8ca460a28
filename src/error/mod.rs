//! Error handling for the staging wallet
//!
//! Every operation in the crate reports failures through [`WalletError`].
//! Staging errors carry the transaction name, the address or the numbers
//! involved so the caller can correct the input and try again.

use std::fmt;

/// Result type alias for wallet operations
pub type Result<T> = std::result::Result<T, WalletError>;

/// Error types for staging, signing and storage operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// A staged transaction with this name already exists
    DuplicateName(String),
    /// No staged transaction with this name
    NotFound(String),
    /// Transaction names must not be blank
    InvalidName(String),
    /// Address text could not be resolved to the required kind
    InvalidAddress(String),
    /// Amount text was negative, unparsable or out of range
    InvalidAmount(String),
    /// Amount arithmetic overflowed
    AmountOverflow,
    /// Mutation attempted on a signed transaction
    SignedTransaction(String),
    /// No input of the transaction matches the address
    InputNotFound { name: String, address: String },
    /// The fee has already been folded into an input
    AlreadySettled(String),
    /// Subtracting the fee would take the input below zero
    InsufficientAmount {
        name: String,
        address: String,
        amount: u64,
        fee: u64,
    },
    /// Inputs do not equal outputs; positive difference is excess input.
    /// `fee` is the fee the current shape owes, for the caller's adjustment
    UnbalancedTransaction {
        name: String,
        difference: i128,
        fee: u64,
    },
    /// Transaction is missing inputs or outputs
    IncompleteTransaction { name: String, reason: String },
    /// Transaction has already been signed
    AlreadySigned(String),
    /// Compose attempted before signing
    NotSigned(String),
    /// A key with this name is already stored
    DuplicateKeyName(String),
    /// No stored key for this name or address
    KeyNotFound(String),
    /// Cryptographic operation errors
    Crypto(String),
    /// Database-related errors
    Database(String),
    /// Serialization/deserialization errors
    Serialization(String),
    /// File I/O errors
    Io(String),
    /// Configuration errors
    Config(String),
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletError::DuplicateName(name) => {
                write!(f, "Transaction {name} already exists")
            }
            WalletError::NotFound(name) => write!(f, "Transaction {name} not found"),
            WalletError::InvalidName(name) => write!(f, "Invalid transaction name: {name:?}"),
            WalletError::InvalidAddress(addr) => write!(f, "Invalid address: {addr}"),
            WalletError::InvalidAmount(msg) => write!(f, "Invalid amount: {msg}"),
            WalletError::AmountOverflow => write!(f, "Amount overflow"),
            WalletError::SignedTransaction(name) => {
                write!(f, "Transaction {name} is signed and cannot be modified")
            }
            WalletError::InputNotFound { name, address } => {
                write!(f, "Transaction {name} has no input from {address}")
            }
            WalletError::AlreadySettled(name) => {
                write!(f, "Fee for transaction {name} has already been added")
            }
            WalletError::InsufficientAmount {
                name,
                address,
                amount,
                fee,
            } => write!(
                f,
                "Input {address} of transaction {name} holds {amount}, cannot cover fee {fee}"
            ),
            WalletError::UnbalancedTransaction {
                name,
                difference,
                fee,
            } => {
                if *difference > 0 {
                    write!(
                        f,
                        "Transaction {name} is unbalanced: inputs exceed outputs by {difference} (fee owed {fee})"
                    )
                } else {
                    write!(
                        f,
                        "Transaction {name} is unbalanced: inputs are short of outputs by {} (fee owed {fee})",
                        difference.unsigned_abs()
                    )
                }
            }
            WalletError::IncompleteTransaction { name, reason } => {
                write!(f, "Transaction {name} is incomplete: {reason}")
            }
            WalletError::AlreadySigned(name) => {
                write!(f, "Transaction {name} has already been signed")
            }
            WalletError::NotSigned(name) => write!(f, "Transaction {name} is not signed"),
            WalletError::DuplicateKeyName(name) => {
                write!(f, "An address named {name} already exists")
            }
            WalletError::KeyNotFound(what) => write!(f, "No key found for {what}"),
            WalletError::Crypto(msg) => write!(f, "Cryptographic error: {msg}"),
            WalletError::Database(msg) => write!(f, "Database error: {msg}"),
            WalletError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            WalletError::Io(msg) => write!(f, "I/O error: {msg}"),
            WalletError::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for WalletError {}

impl From<std::io::Error> for WalletError {
    fn from(err: std::io::Error) -> Self {
        WalletError::Io(err.to_string())
    }
}

impl From<sled::Error> for WalletError {
    fn from(err: sled::Error) -> Self {
        WalletError::Database(err.to_string())
    }
}

impl From<bincode::error::EncodeError> for WalletError {
    fn from(err: bincode::error::EncodeError) -> Self {
        WalletError::Serialization(err.to_string())
    }
}

impl From<bincode::error::DecodeError> for WalletError {
    fn from(err: bincode::error::DecodeError) -> Self {
        WalletError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for WalletError {
    fn from(err: serde_json::Error) -> Self {
        WalletError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for WalletError {
    fn from(err: toml::de::Error) -> Self {
        WalletError::Config(err.to_string())
    }
}
