//! Wire encoding for staged transactions
//!
//! Layout, in order:
//! - version (varint)
//! - timestamp (6 bytes, big-endian milliseconds)
//! - input, output and entry credit output counts (varint each)
//! - each input / output as `varint(amount) || rcd_hash`
//! - each entry credit output as `varint(amount) || public_key`
//! - full form only: one `0x01 || public_key || signature` block per input
//!
//! The signing message is the layout without the signature blocks.

use crate::core::address::{KEY_LEN, RCD_TYPE_1};
use crate::core::transaction::{InputSignature, StagedTransaction};
use crate::error::{Result, WalletError};
use data_encoding::HEXLOWER;
use serde::Serialize;

pub const TRANSACTION_VERSION: u64 = 2;
pub const TIMESTAMP_LEN: usize = 6;
pub const MAX_VARINT_LEN: usize = 10;

/// RCD type byte + public key + signature
pub const SIGNATURE_BLOCK_LEN: usize = 1 + KEY_LEN + InputSignature::SIGNATURE_LEN;

const SUBMIT_METHOD: &str = "factoid-submit";

/// Big-endian base-128; every byte but the last has the high bit set
pub fn encode_varint(value: u64, out: &mut Vec<u8>) {
    let mut groups = [0u8; MAX_VARINT_LEN];
    let mut len = 0;
    let mut rest = value;
    loop {
        groups[len] = (rest & 0x7f) as u8;
        len += 1;
        rest >>= 7;
        if rest == 0 {
            break;
        }
    }
    for i in (0..len).rev() {
        let continuation = if i > 0 { 0x80 } else { 0x00 };
        out.push(groups[i] | continuation);
    }
}

fn encode_body(tx: &StagedTransaction, out: &mut Vec<u8>) {
    encode_varint(TRANSACTION_VERSION, out);
    out.extend_from_slice(&tx.get_timestamp().to_be_bytes()[8 - TIMESTAMP_LEN..]);

    encode_varint(tx.get_inputs().len() as u64, out);
    encode_varint(tx.get_outputs().len() as u64, out);
    encode_varint(tx.get_ec_outputs().len() as u64, out);

    for input in tx.get_inputs() {
        encode_varint(input.get_amount().factoshis(), out);
        out.extend_from_slice(input.get_address().rcd_hash());
    }
    for output in tx.get_outputs() {
        encode_varint(output.get_amount().factoshis(), out);
        out.extend_from_slice(output.get_address().rcd_hash());
    }
    for ec_output in tx.get_ec_outputs() {
        encode_varint(ec_output.get_amount().factoshis(), out);
        out.extend_from_slice(ec_output.get_address().public_key());
    }
}

/// The bytes each input signs
pub fn signing_message(tx: &StagedTransaction) -> Vec<u8> {
    let mut out = Vec::new();
    encode_body(tx, &mut out);
    out
}

/// Full encoding including signature blocks; requires a signed transaction
pub fn encode_transaction(tx: &StagedTransaction) -> Result<Vec<u8>> {
    if !tx.is_signed() {
        return Err(WalletError::NotSigned(tx.get_name().to_string()));
    }

    let mut out = signing_message(tx);
    for signature in tx.get_signatures() {
        out.push(RCD_TYPE_1);
        out.extend_from_slice(signature.get_public_key());
        out.extend_from_slice(signature.get_signature());
    }
    Ok(out)
}

#[derive(Serialize)]
struct SubmitParams {
    transaction: String,
}

#[derive(Serialize)]
struct SubmitRequest<'a> {
    jsonrpc: &'a str,
    id: u32,
    method: &'a str,
    params: SubmitParams,
}

/// JSON-RPC submission envelope carrying the hex-encoded transaction
pub fn compose_payload(tx: &StagedTransaction) -> Result<Vec<u8>> {
    let encoded = encode_transaction(tx)?;
    let request = SubmitRequest {
        jsonrpc: "2.0",
        id: 0,
        method: SUBMIT_METHOD,
        params: SubmitParams {
            transaction: HEXLOWER.encode(&encoded),
        },
    };
    Ok(serde_json::to_vec(&request)?)
}
