use crate::core::address::{
    decode_prefixed, encode_prefixed, AddressKind, CreditAddress, ValueAddress,
    CREDIT_SECRET_PREFIX, FACTOID_SECRET_PREFIX, KEY_LEN,
};
use crate::error::{Result, WalletError};
use crate::utils::{ed25519_public_key, ed25519_sign, new_seed, SEED_LEN};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// One Ed25519 keypair held by the wallet; the seed is wiped on drop
#[derive(Serialize, Deserialize, bincode::Encode, bincode::Decode, Zeroize, ZeroizeOnDrop)]
pub struct Wallet {
    seed: [u8; SEED_LEN],
    public_key: [u8; KEY_LEN],
}

impl Wallet {
    pub fn new() -> Result<Wallet> {
        let mut seed = new_seed()?;
        let wallet = Wallet::from_seed(&seed);
        seed.zeroize();
        wallet
    }

    pub fn from_seed(seed: &[u8; SEED_LEN]) -> Result<Wallet> {
        let public_key = ed25519_public_key(seed)?;
        Ok(Wallet {
            seed: *seed,
            public_key,
        })
    }

    /// Import a human-readable secret key (`Fs...` or `Es...`)
    pub fn from_secret_text(text: &str) -> Result<(AddressKind, Wallet)> {
        let (prefix, mut seed) = decode_prefixed(text.trim()).map_err(|_| {
            WalletError::InvalidAddress("not a valid Fs or Es private key".to_string())
        })?;
        let kind = match prefix {
            FACTOID_SECRET_PREFIX => AddressKind::Factoid,
            CREDIT_SECRET_PREFIX => AddressKind::EntryCredit,
            _ => {
                seed.zeroize();
                return Err(WalletError::InvalidAddress(
                    "not a valid Fs or Es private key".to_string(),
                ));
            }
        };
        let wallet = Wallet::from_seed(&seed);
        seed.zeroize();
        Ok((kind, wallet?))
    }

    pub fn get_public_key(&self) -> &[u8; KEY_LEN] {
        &self.public_key
    }

    pub fn factoid_address(&self) -> ValueAddress {
        ValueAddress::from_public_key(&self.public_key)
    }

    pub fn credit_address(&self) -> CreditAddress {
        CreditAddress::from_public_key(&self.public_key)
    }

    pub fn address_text(&self, kind: AddressKind) -> String {
        match kind {
            AddressKind::Factoid => self.factoid_address().to_string(),
            AddressKind::EntryCredit => self.credit_address().to_string(),
        }
    }

    pub fn secret_text(&self, kind: AddressKind) -> String {
        let prefix = match kind {
            AddressKind::Factoid => FACTOID_SECRET_PREFIX,
            AddressKind::EntryCredit => CREDIT_SECRET_PREFIX,
        };
        encode_prefixed(prefix, &self.seed)
    }

    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        ed25519_sign(&self.seed, message)
    }
}
