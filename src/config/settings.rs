use crate::core::fees::FeeMode;
use crate::error::{Result, WalletError};
use log::debug;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

static DEFAULT_WALLET_DIR: &str = "wallet_data";

pub const CONFIG_PATH_KEY: &str = "STAGING_WALLET_CONFIG";
pub const WALLET_PATH_KEY: &str = "STAGING_WALLET_PATH";
pub const FEE_KEY: &str = "STAGING_WALLET_FEE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    wallet_path: PathBuf,
    fee_mode: FeeMode,
}

/// On-disk form; every field optional so a file can override just one
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    wallet_path: Option<PathBuf>,
    fee: Option<FeeMode>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            wallet_path: PathBuf::from(DEFAULT_WALLET_DIR),
            fee_mode: FeeMode::default(),
        }
    }
}

impl Config {
    /// Defaults, then the file named by `STAGING_WALLET_CONFIG`, then the
    /// `STAGING_WALLET_PATH` / `STAGING_WALLET_FEE` overrides
    pub fn load() -> Result<Config> {
        Self::load_with(|key| env::var(key).ok())
    }

    pub fn load_with<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_PATH_KEY) {
            Some(path) => {
                debug!("Reading configuration from {path}");
                let text = fs::read_to_string(&path).map_err(|e| {
                    WalletError::Config(format!("Failed to read config file {path}: {e}"))
                })?;
                Self::from_toml_str(&text)?
            }
            None => Config::default(),
        };

        if let Some(path) = lookup(WALLET_PATH_KEY) {
            config.wallet_path = PathBuf::from(path);
        }
        if let Some(fee) = lookup(FEE_KEY) {
            config.fee_mode = parse_fee_mode(&fee)?;
        }
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Config> {
        let file: ConfigFile = toml::from_str(text)?;
        let defaults = Config::default();
        Ok(Config {
            wallet_path: file.wallet_path.unwrap_or(defaults.wallet_path),
            fee_mode: file.fee.unwrap_or(defaults.fee_mode),
        })
    }

    pub fn get_wallet_path(&self) -> &PathBuf {
        &self.wallet_path
    }

    pub fn get_fee_mode(&self) -> &FeeMode {
        &self.fee_mode
    }

    pub fn with_wallet_path(mut self, path: PathBuf) -> Config {
        self.wallet_path = path;
        self
    }
}

/// `fixed:<factoshis>` or `rate:<factoshis per credit>`
pub fn parse_fee_mode(text: &str) -> Result<FeeMode> {
    let (mode, value) = text
        .trim()
        .split_once(':')
        .ok_or_else(|| WalletError::Config(format!("Fee setting {text:?} is not mode:value")))?;
    let value: u64 = value
        .trim()
        .parse()
        .map_err(|e| WalletError::Config(format!("Fee value in {text:?}: {e}")))?;

    match mode.trim() {
        "fixed" => Ok(FeeMode::Fixed { amount: value }),
        "rate" => Ok(FeeMode::CreditRate {
            factoshis_per_credit: value,
        }),
        other => Err(WalletError::Config(format!(
            "Unknown fee mode {other:?}, expected fixed or rate"
        ))),
    }
}
