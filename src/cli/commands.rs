use clap::{Parser, Subcommand};
use crate::core::address::AddressKind;
use crate::core::amount::Amount;
use std::path::PathBuf;
use std::str::FromStr;

/// Address kind as typed on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressKindArg(pub AddressKind);

impl FromStr for AddressKindArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fct" => Ok(AddressKindArg(AddressKind::Factoid)),
            "ec" => Ok(AddressKindArg(AddressKind::EntryCredit)),
            _ => Err(format!("Invalid address kind: {s}. Valid options: fct, ec")),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "staging-wallet", about = "Stage, sign and compose factoid transactions")]
pub struct Opt {
    #[arg(
        long = "wallet",
        global = true,
        help = "Wallet database directory (overrides configuration)"
    )]
    pub wallet: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(name = "newtx", about = "Start a new named transaction")]
    NewTx {
        #[arg(help = "Transaction name")]
        name: String,
    },
    #[command(name = "rmtx", about = "Discard a staged transaction")]
    RmTx {
        #[arg(help = "Transaction name")]
        name: String,
    },
    #[command(name = "listtxs", about = "List staged transaction names")]
    ListTxs,
    #[command(name = "gettx", about = "Show a staged transaction and its fee status")]
    GetTx {
        #[arg(help = "Transaction name")]
        name: String,
    },
    #[command(name = "addtxinput", about = "Add an input to a transaction")]
    AddTxInput {
        #[arg(help = "Transaction name")]
        name: String,
        #[arg(help = "Factoid address or address name")]
        address: String,
        #[arg(allow_hyphen_values = true, help = "Amount in factoshis")]
        amount: Amount,
    },
    #[command(name = "addtxoutput", about = "Add an output to a transaction")]
    AddTxOutput {
        #[arg(help = "Transaction name")]
        name: String,
        #[arg(help = "Factoid address or address name")]
        address: String,
        #[arg(allow_hyphen_values = true, help = "Amount in factoshis")]
        amount: Amount,
    },
    #[command(
        name = "addtxecoutput",
        about = "Add an entry credit output to a transaction"
    )]
    AddTxEcOutput {
        #[arg(help = "Transaction name")]
        name: String,
        #[arg(help = "Entry credit address or address name")]
        address: String,
        #[arg(allow_hyphen_values = true, help = "Amount in factoshis")]
        amount: Amount,
    },
    #[command(name = "addtxfee", about = "Pay the transaction fee from an input")]
    AddTxFee {
        #[arg(help = "Transaction name")]
        name: String,
        #[arg(help = "Input address or address name")]
        address: String,
    },
    #[command(name = "subtxfee", about = "Take the transaction fee back out of an input")]
    SubTxFee {
        #[arg(help = "Transaction name")]
        name: String,
        #[arg(help = "Input address or address name")]
        address: String,
    },
    #[command(name = "signtx", about = "Sign a balanced transaction")]
    SignTx {
        #[arg(help = "Transaction name")]
        name: String,
    },
    #[command(name = "composetx", about = "Print the submission payload of a signed transaction")]
    ComposeTx {
        #[arg(help = "Transaction name")]
        name: String,
    },
    #[command(
        name = "generateaddress",
        visible_alias = "newaddress",
        about = "Generate a new named address"
    )]
    GenerateAddress {
        #[arg(help = "Address kind: fct or ec")]
        kind: AddressKindArg,
        #[arg(help = "Name for the new address")]
        name: String,
    },
    #[command(name = "importaddress", about = "Import a secret key under a name")]
    ImportAddress {
        #[arg(help = "Name for the imported address")]
        name: String,
        #[arg(help = "Secret key (Fs... or Es...)")]
        secret: String,
    },
    #[command(name = "getaddresses", about = "List named addresses held by the wallet")]
    GetAddresses,
    #[command(name = "feestatus", about = "Show the configured fee policy")]
    FeeStatus,
}
