use crate::core::address::{
    decode_prefixed, AddressKind, AddressResolver, CreditAddress, ValueAddress,
};
use crate::core::transaction::InputSignature;
use crate::error::{Result, WalletError};
use crate::utils::{deserialize, serialize};
use crate::wallet::{Signer, Wallet};
use log::info;
use sled::{Db, Tree};
use std::sync::{Arc, Mutex};

pub const FACTOID_KEYS_TREE: &str = "factoid_keys";
pub const CREDIT_KEYS_TREE: &str = "credit_keys";

/// A stored key as listed to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressEntry {
    pub name: String,
    pub kind: AddressKind,
    pub address: String,
}

/// Named keypairs held in the wallet database, one tree per address kind.
/// Names are unique across both kinds.
#[derive(Clone)]
pub struct Wallets {
    factoid_keys: Tree,
    credit_keys: Tree,
    write_lock: Arc<Mutex<()>>,
}

impl Wallets {
    pub fn open(db: &Db) -> Result<Wallets> {
        let factoid_keys = db.open_tree(FACTOID_KEYS_TREE).map_err(|e| {
            WalletError::Database(format!("Failed to open factoid key tree: {e}"))
        })?;
        let credit_keys = db
            .open_tree(CREDIT_KEYS_TREE)
            .map_err(|e| WalletError::Database(format!("Failed to open credit key tree: {e}")))?;
        Ok(Wallets {
            factoid_keys,
            credit_keys,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn tree(&self, kind: AddressKind) -> &Tree {
        match kind {
            AddressKind::Factoid => &self.factoid_keys,
            AddressKind::EntryCredit => &self.credit_keys,
        }
    }

    /// Generate a fresh keypair under `name` and return its address
    pub fn create_wallet(&self, kind: AddressKind, name: &str) -> Result<String> {
        let wallet = Wallet::new()?;
        self.insert(kind, name, &wallet)?;
        let address = wallet.address_text(kind);
        info!("Generated {kind} address {name}: {address}");
        Ok(address)
    }

    /// Import an `Fs...` or `Es...` secret key under `name`
    pub fn import_secret(&self, name: &str, secret: &str) -> Result<(AddressKind, String)> {
        let (kind, wallet) = Wallet::from_secret_text(secret)?;
        self.insert(kind, name, &wallet)?;
        let address = wallet.address_text(kind);
        info!("Imported {kind} address {name}: {address}");
        Ok((kind, address))
    }

    fn insert(&self, kind: AddressKind, name: &str, wallet: &Wallet) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WalletError::InvalidName(name.to_string()));
        }

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| WalletError::Database("Key store lock poisoned".to_string()))?;

        // I check the other kind's tree first so a bare name never means two keys
        let other = match kind {
            AddressKind::Factoid => AddressKind::EntryCredit,
            AddressKind::EntryCredit => AddressKind::Factoid,
        };
        if self.tree(other).contains_key(name)? {
            return Err(WalletError::DuplicateKeyName(name.to_string()));
        }

        let bytes = serialize(wallet)?;
        self.tree(kind)
            .compare_and_swap(name, None as Option<&[u8]>, Some(bytes))?
            .map_err(|_| WalletError::DuplicateKeyName(name.to_string()))?;
        self.tree(kind).flush()?;
        Ok(())
    }

    fn load(&self, kind: AddressKind, name: &str) -> Result<Option<Wallet>> {
        match self.tree(kind).get(name)? {
            Some(bytes) => Ok(Some(deserialize(bytes.as_ref())?)),
            None => Ok(None),
        }
    }

    /// Every stored address, factoid addresses first, each kind in name order
    pub fn get_addresses(&self) -> Result<Vec<AddressEntry>> {
        let mut entries = vec![];
        for kind in [AddressKind::Factoid, AddressKind::EntryCredit] {
            for item in self.tree(kind).iter() {
                let (key, value) = item?;
                let wallet: Wallet = deserialize(value.as_ref())?;
                entries.push(AddressEntry {
                    name: String::from_utf8_lossy(key.as_ref()).to_string(),
                    kind,
                    address: wallet.address_text(kind),
                });
            }
        }
        Ok(entries)
    }

    fn find_factoid_wallet(&self, address: &ValueAddress) -> Result<Option<Wallet>> {
        // linear scan; keys are stored by name, not by address
        for item in self.factoid_keys.iter() {
            let (_, value) = item?;
            let wallet: Wallet = deserialize(value.as_ref())?;
            if wallet.factoid_address() == *address {
                return Ok(Some(wallet));
            }
        }
        Ok(None)
    }
}

/// Literal addresses resolve directly; anything that is not address text is
/// looked up as a key name.
impl AddressResolver for Wallets {
    fn resolve_value_address(&self, text: &str) -> Result<ValueAddress> {
        let text = text.trim();
        // Anything that decodes as address text is taken literally, even if
        // a key happens to share the name
        if decode_prefixed(text).is_ok() {
            return text.parse();
        }
        if let Some(wallet) = self.load(AddressKind::Factoid, text)? {
            return Ok(wallet.factoid_address());
        }
        if self.credit_keys.contains_key(text)? {
            return Err(WalletError::InvalidAddress(format!(
                "{text} names an entry credit address, a factoid address is required"
            )));
        }
        Err(WalletError::InvalidAddress(format!(
            "{text} is neither a factoid address nor a known name"
        )))
    }

    fn resolve_credit_address(&self, text: &str) -> Result<CreditAddress> {
        let text = text.trim();
        if decode_prefixed(text).is_ok() {
            return text.parse();
        }
        if let Some(wallet) = self.load(AddressKind::EntryCredit, text)? {
            return Ok(wallet.credit_address());
        }
        if self.factoid_keys.contains_key(text)? {
            return Err(WalletError::InvalidAddress(format!(
                "{text} names a factoid address, an entry credit address is required"
            )));
        }
        Err(WalletError::InvalidAddress(format!(
            "{text} is neither an entry credit address nor a known name"
        )))
    }
}

impl Signer for Wallets {
    fn sign(&self, address: &ValueAddress, message: &[u8]) -> Result<InputSignature> {
        let wallet = self
            .find_factoid_wallet(address)?
            .ok_or_else(|| WalletError::KeyNotFound(address.to_string()))?;
        let signature = wallet.sign(message)?;
        InputSignature::new(*wallet.get_public_key(), signature)
    }
}
