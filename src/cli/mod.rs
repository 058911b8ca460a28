//! Command-line interface
//!
//! One clap subcommand per wallet operation.

pub mod commands;

pub use commands::{AddressKindArg, Command, Opt};
