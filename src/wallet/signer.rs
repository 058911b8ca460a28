use crate::core::address::ValueAddress;
use crate::core::transaction::InputSignature;
use crate::error::Result;

/// Produces the signature that authorises spending from one input address
pub trait Signer {
    fn sign(&self, address: &ValueAddress, message: &[u8]) -> Result<InputSignature>;
}
