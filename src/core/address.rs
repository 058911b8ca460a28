//! Address references
//!
//! Two disjoint address kinds exist:
//! - [`ValueAddress`] (`FA...`): holds spendable factoids, usable as an input or output.
//!   The 32 bytes are the RCD hash `sha256d(0x01 || public_key)`.
//! - [`CreditAddress`] (`EC...`): holds entry credits, usable only as an EC output.
//!   The 32 bytes are the Ed25519 public key itself.
//!
//! Human-readable form is `base58(prefix || key || checksum)` where the
//! checksum is the first four bytes of `sha256d(prefix || key)`.

use crate::error::{Result, WalletError};
use crate::utils::{base58_decode, base58_encode, sha256d_digest};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const KEY_LEN: usize = 32;
pub const PREFIX_LEN: usize = 2;
pub const CHECKSUM_LEN: usize = 4;

/// RCD type 1: a single Ed25519 signature
pub const RCD_TYPE_1: u8 = 0x01;

pub const FACTOID_PUBLIC_PREFIX: [u8; PREFIX_LEN] = [0x5f, 0xb1];
pub const CREDIT_PUBLIC_PREFIX: [u8; PREFIX_LEN] = [0x59, 0x2a];
pub const FACTOID_SECRET_PREFIX: [u8; PREFIX_LEN] = [0x64, 0x78];
pub const CREDIT_SECRET_PREFIX: [u8; PREFIX_LEN] = [0x5d, 0xb6];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressKind {
    Factoid,
    EntryCredit,
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressKind::Factoid => write!(f, "fct"),
            AddressKind::EntryCredit => write!(f, "ec"),
        }
    }
}

/// Encode a prefixed 32-byte key in base58check form
pub fn encode_prefixed(prefix: [u8; PREFIX_LEN], key: &[u8; KEY_LEN]) -> String {
    let mut payload = Vec::with_capacity(PREFIX_LEN + KEY_LEN + CHECKSUM_LEN);
    payload.extend_from_slice(&prefix);
    payload.extend_from_slice(key);
    let checksum = sha256d_digest(payload.as_slice());
    payload.extend_from_slice(&checksum[..CHECKSUM_LEN]);
    base58_encode(payload.as_slice())
}

/// Decode base58check text into its prefix and key, verifying length and checksum
pub fn decode_prefixed(text: &str) -> Result<([u8; PREFIX_LEN], [u8; KEY_LEN])> {
    let payload = base58_decode(text)?;
    if payload.len() != PREFIX_LEN + KEY_LEN + CHECKSUM_LEN {
        return Err(WalletError::InvalidAddress(format!(
            "{text}: wrong length {}",
            payload.len()
        )));
    }

    let (body, checksum) = payload.split_at(PREFIX_LEN + KEY_LEN);
    if sha256d_digest(body)[..CHECKSUM_LEN] != *checksum {
        return Err(WalletError::InvalidAddress(format!("{text}: bad checksum")));
    }

    let mut prefix = [0u8; PREFIX_LEN];
    prefix.copy_from_slice(&body[..PREFIX_LEN]);
    let mut key = [0u8; KEY_LEN];
    key.copy_from_slice(&body[PREFIX_LEN..]);
    Ok((prefix, key))
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    bincode::Encode,
    bincode::Decode,
)]
pub struct ValueAddress([u8; KEY_LEN]);

impl ValueAddress {
    pub fn from_rcd_hash(rcd_hash: [u8; KEY_LEN]) -> ValueAddress {
        ValueAddress(rcd_hash)
    }

    pub fn from_public_key(public_key: &[u8; KEY_LEN]) -> ValueAddress {
        let mut hash = [0u8; KEY_LEN];
        hash.copy_from_slice(&sha256d_digest(&rcd_bytes(public_key)));
        ValueAddress(hash)
    }

    pub fn rcd_hash(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

/// Type 1 RCD: the RCD type byte followed by the public key
pub fn rcd_bytes(public_key: &[u8; KEY_LEN]) -> Vec<u8> {
    let mut rcd = Vec::with_capacity(1 + KEY_LEN);
    rcd.push(RCD_TYPE_1);
    rcd.extend_from_slice(public_key);
    rcd
}

impl fmt::Display for ValueAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", encode_prefixed(FACTOID_PUBLIC_PREFIX, &self.0))
    }
}

impl FromStr for ValueAddress {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self> {
        match decode_prefixed(s)? {
            (FACTOID_PUBLIC_PREFIX, key) => Ok(ValueAddress(key)),
            (CREDIT_PUBLIC_PREFIX, _) => Err(WalletError::InvalidAddress(format!(
                "{s} is an entry credit address, a factoid address is required"
            ))),
            _ => Err(WalletError::InvalidAddress(format!(
                "{s} is not a factoid address"
            ))),
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    bincode::Encode,
    bincode::Decode,
)]
pub struct CreditAddress([u8; KEY_LEN]);

impl CreditAddress {
    pub fn from_public_key(public_key: &[u8; KEY_LEN]) -> CreditAddress {
        CreditAddress(*public_key)
    }

    pub fn public_key(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Display for CreditAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", encode_prefixed(CREDIT_PUBLIC_PREFIX, &self.0))
    }
}

impl FromStr for CreditAddress {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self> {
        match decode_prefixed(s)? {
            (CREDIT_PUBLIC_PREFIX, key) => Ok(CreditAddress(key)),
            (FACTOID_PUBLIC_PREFIX, _) => Err(WalletError::InvalidAddress(format!(
                "{s} is a factoid address, an entry credit address is required"
            ))),
            _ => Err(WalletError::InvalidAddress(format!(
                "{s} is not an entry credit address"
            ))),
        }
    }
}

/// Resolves user-supplied text (a literal address or a wallet name) to an address
pub trait AddressResolver {
    fn resolve_value_address(&self, text: &str) -> Result<ValueAddress>;

    fn resolve_credit_address(&self, text: &str) -> Result<CreditAddress>;
}

/// Resolver that only accepts literal address text
pub struct LiteralResolver;

impl AddressResolver for LiteralResolver {
    fn resolve_value_address(&self, text: &str) -> Result<ValueAddress> {
        text.trim().parse()
    }

    fn resolve_credit_address(&self, text: &str) -> Result<CreditAddress> {
        text.trim().parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_addresses() -> (ValueAddress, CreditAddress) {
        let public_key = crate::utils::ed25519_public_key(&[7u8; 32]).unwrap();
        (
            ValueAddress::from_public_key(&public_key),
            CreditAddress::from_public_key(&public_key),
        )
    }

    #[test]
    fn test_human_readable_prefixes() {
        let (fct, ec) = sample_addresses();
        let fct_text = fct.to_string();
        let ec_text = ec.to_string();
        assert!(fct_text.starts_with("FA"));
        assert!(ec_text.starts_with("EC"));
        assert_eq!(fct_text.len(), 52);
        assert_eq!(ec_text.len(), 52);
        assert_eq!(
            encode_prefixed(FACTOID_SECRET_PREFIX, &[7u8; 32])[..2].to_string(),
            "Fs"
        );
        assert_eq!(
            encode_prefixed(CREDIT_SECRET_PREFIX, &[7u8; 32])[..2].to_string(),
            "Es"
        );
    }

    #[test]
    fn test_parse_display_agree() {
        let (fct, ec) = sample_addresses();
        assert_eq!(fct.to_string().parse::<ValueAddress>().unwrap(), fct);
        assert_eq!(ec.to_string().parse::<CreditAddress>().unwrap(), ec);
    }

    #[test]
    fn test_value_address_hashes_rcd() {
        let public_key = crate::utils::ed25519_public_key(&[7u8; 32]).unwrap();
        let fct = ValueAddress::from_public_key(&public_key);
        assert_eq!(
            fct.rcd_hash().to_vec(),
            sha256d_digest(&rcd_bytes(&public_key))
        );
        assert_ne!(fct.rcd_hash(), &public_key);
    }

    #[test]
    fn test_kinds_are_not_interchangeable() {
        let (fct, ec) = sample_addresses();
        assert!(matches!(
            ec.to_string().parse::<ValueAddress>(),
            Err(WalletError::InvalidAddress(ref msg)) if msg.contains("entry credit")
        ));
        assert!(matches!(
            fct.to_string().parse::<CreditAddress>(),
            Err(WalletError::InvalidAddress(ref msg)) if msg.contains("factoid address")
        ));
    }

    #[test]
    fn test_bad_checksum_rejected() {
        let (fct, _) = sample_addresses();
        let mut tampered = fct.to_string();
        let last = tampered.pop().unwrap();
        tampered.pop();
        tampered.push(if last == 'D' { 'E' } else { 'D' });
        assert!(tampered.parse::<ValueAddress>().is_err());
        assert!("FA".parse::<ValueAddress>().is_err());
    }

    #[test]
    fn test_literal_resolver() {
        let (fct, ec) = sample_addresses();
        let resolver = LiteralResolver;
        assert_eq!(resolver.resolve_value_address(&fct.to_string()).unwrap(), fct);
        assert_eq!(resolver.resolve_credit_address(&ec.to_string()).unwrap(), ec);
        assert!(resolver.resolve_credit_address(&fct.to_string()).is_err());
        assert!(resolver.resolve_value_address("alice").is_err());
    }
}
