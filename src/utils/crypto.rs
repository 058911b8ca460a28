use ring::digest::{Context, SHA256};
use ring::rand::{SecureRandom, SystemRandom};
use ring::signature::{Ed25519KeyPair, KeyPair, UnparsedPublicKey, ED25519};

use crate::error::{Result, WalletError};
use std::time::{SystemTime, UNIX_EPOCH};

/// Length of an Ed25519 seed (the secret part of a wallet key)
pub const SEED_LEN: usize = 32;

/// Only the low 48 bits of the timestamp go on the wire
const MAX_TIMESTAMP_MILLIS: u128 = (1 << 48) - 1;

pub fn current_timestamp() -> Result<u64> {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| WalletError::Crypto(format!("System time error: {e}")))?
        .as_millis();

    if millis > MAX_TIMESTAMP_MILLIS {
        return Err(WalletError::Crypto("Timestamp overflow".to_string()));
    }

    Ok(millis as u64)
}

pub fn sha256_digest(data: &[u8]) -> Vec<u8> {
    let mut context = Context::new(&SHA256);
    context.update(data);
    let digest = context.finish();
    digest.as_ref().to_vec()
}

pub fn sha256d_digest(data: &[u8]) -> Vec<u8> {
    sha256_digest(sha256_digest(data).as_slice())
}

pub fn base58_encode(data: &[u8]) -> String {
    bs58::encode(data).into_string()
}

pub fn base58_decode(data: &str) -> Result<Vec<u8>> {
    bs58::decode(data)
        .into_vec()
        .map_err(|e| WalletError::InvalidAddress(format!("Invalid base58 encoding: {e}")))
}

pub fn new_seed() -> Result<[u8; SEED_LEN]> {
    let rng = SystemRandom::new();
    let mut seed = [0u8; SEED_LEN];
    rng.fill(&mut seed)
        .map_err(|e| WalletError::Crypto(format!("Failed to generate key seed: {e}")))?;
    Ok(seed)
}

fn key_pair_from_seed(seed: &[u8]) -> Result<Ed25519KeyPair> {
    Ed25519KeyPair::from_seed_unchecked(seed)
        .map_err(|e| WalletError::Crypto(format!("Invalid Ed25519 seed: {e}")))
}

pub fn ed25519_public_key(seed: &[u8]) -> Result<[u8; 32]> {
    let key_pair = key_pair_from_seed(seed)?;
    let mut public_key = [0u8; 32];
    public_key.copy_from_slice(key_pair.public_key().as_ref());
    Ok(public_key)
}

pub fn ed25519_sign(seed: &[u8], message: &[u8]) -> Result<Vec<u8>> {
    let key_pair = key_pair_from_seed(seed)?;
    Ok(key_pair.sign(message).as_ref().to_vec())
}

pub fn ed25519_verify(public_key: &[u8], signature: &[u8], message: &[u8]) -> bool {
    UnparsedPublicKey::new(&ED25519, public_key)
        .verify(message, signature)
        .is_ok()
}
