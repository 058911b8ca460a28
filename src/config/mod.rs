//! Configuration management
//!
//! Settings come from built-in defaults, an optional TOML file and
//! environment overrides, in that order.

pub mod settings;

pub use settings::{parse_fee_mode, Config};
