// Storage encoding for records kept in sled trees (bincode 2, standard config)
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Encode a record for storage
pub fn serialize<T: Serialize + bincode::Encode>(data: &T) -> Result<Vec<u8>> {
    Ok(bincode::encode_to_vec(data, bincode::config::standard())?)
}

/// Decode a stored record, rejecting trailing bytes
pub fn deserialize<T>(bytes: &[u8]) -> Result<T>
where
    T: for<'de> Deserialize<'de> + bincode::Decode<()>,
{
    let (data, read) = bincode::decode_from_slice(bytes, bincode::config::standard())?;
    if read != bytes.len() {
        return Err(crate::error::WalletError::Serialization(format!(
            "Trailing bytes after record: read {read} of {}",
            bytes.len()
        )));
    }
    Ok(data)
}
