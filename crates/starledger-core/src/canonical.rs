//! Canonical CBOR encoding for deterministic serialization.
//!
//! Follows RFC 8949 Core Deterministic Encoding for the subset of CBOR the
//! ledger needs:
//! - Map keys are small unsigned integers, sorted ascending
//! - Integers use the smallest valid encoding
//! - Definite lengths only
//! - No floats
//!
//! The same logical block always produces the same bytes, and therefore the
//! same hash, on every platform. Payloads are decoded with `ciborium` and
//! re-encoded; anything that does not round-trip byte for byte is rejected.

use bytes::Bytes;
use ciborium::value::Value;

use crate::block::{OwnershipRecord, Payload};
use crate::error::DecodeError;
use crate::types::BlockHash;

/// Domain separation prefix for block content hashes.
pub const BLOCK_DOMAIN: &[u8] = b"starledger/block/v1";

/// Block content field keys.
mod block_keys {
    pub const HEIGHT: u64 = 0;
    pub const TIMESTAMP: u64 = 1;
    pub const PREVIOUS_HASH: u64 = 2;
    pub const PAYLOAD: u64 = 3;
}

/// Payload field keys.
mod payload_keys {
    pub const KIND: u64 = 0;
    pub const ADDRESS: u64 = 1;
    pub const MESSAGE: u64 = 2;
    pub const SIGNATURE: u64 = 3;
    pub const STAR: u64 = 4;
}

/// Payload kind discriminators.
mod kinds {
    pub const GENESIS: u64 = 0;
    pub const OWNERSHIP: u64 = 1;
}

/// The CBOR items canonical encoding is defined over.
enum Item<'a> {
    Uint(u64),
    Int(i64),
    Bytes(&'a [u8]),
    Text(&'a str),
    Null,
    Map(Vec<(u64, Item<'a>)>),
}

/// Encode the content of a block: every field except its own hash.
pub fn canonical_block_bytes(
    height: u64,
    timestamp: i64,
    previous_hash: Option<&BlockHash>,
    payload: &[u8],
) -> Vec<u8> {
    let item = Item::Map(vec![
        (block_keys::HEIGHT, Item::Uint(height)),
        (block_keys::TIMESTAMP, Item::Int(timestamp)),
        (
            block_keys::PREVIOUS_HASH,
            previous_hash.map_or(Item::Null, |h| Item::Bytes(&h.0)),
        ),
        (block_keys::PAYLOAD, Item::Bytes(payload)),
    ]);
    encode(&item)
}

/// The exact bytes fed to Blake3 for a block hash: `BLOCK_DOMAIN || content`.
pub fn block_hash_input(
    height: u64,
    timestamp: i64,
    previous_hash: Option<&BlockHash>,
    payload: &[u8],
) -> Vec<u8> {
    let mut buf = BLOCK_DOMAIN.to_vec();
    buf.extend_from_slice(&canonical_block_bytes(
        height,
        timestamp,
        previous_hash,
        payload,
    ));
    buf
}

/// Encode a payload to canonical bytes.
pub fn encode_payload(payload: &Payload) -> Vec<u8> {
    let item = match payload {
        Payload::Genesis => Item::Map(vec![(payload_keys::KIND, Item::Uint(kinds::GENESIS))]),
        Payload::Ownership(record) => Item::Map(vec![
            (payload_keys::KIND, Item::Uint(kinds::OWNERSHIP)),
            (payload_keys::ADDRESS, Item::Text(&record.address)),
            (payload_keys::MESSAGE, Item::Text(&record.message)),
            (payload_keys::SIGNATURE, Item::Text(&record.signature)),
            (payload_keys::STAR, Item::Bytes(&record.star)),
        ]),
    };
    encode(&item)
}

/// Decode a payload from canonical bytes.
pub fn decode_payload(bytes: &[u8]) -> Result<Payload, DecodeError> {
    let mut reader = bytes;
    let value: Value =
        ciborium::from_reader(&mut reader).map_err(|e| DecodeError::Cbor(e.to_string()))?;
    if !reader.is_empty() {
        return Err(DecodeError::TrailingBytes(reader.len()));
    }

    let payload = value_to_payload(&value)?;

    // Duplicate keys, oversized integers and unsorted maps all decode fine
    // but would hash differently; only the canonical form is accepted.
    if encode_payload(&payload) != bytes {
        return Err(DecodeError::NonCanonical);
    }
    Ok(payload)
}

fn value_to_payload(value: &Value) -> Result<Payload, DecodeError> {
    let map = match value {
        Value::Map(m) => m,
        _ => return Err(DecodeError::Malformed("expected map".into())),
    };

    let get = |key: u64| lookup(map, key);

    let kind = match get(payload_keys::KIND) {
        Some(Value::Integer(i)) => u64::try_from(*i)
            .map_err(|_| DecodeError::Malformed("negative kind".into()))?,
        _ => return Err(DecodeError::Malformed("missing kind".into())),
    };

    match kind {
        kinds::GENESIS => Ok(Payload::Genesis),
        kinds::OWNERSHIP => {
            let text = |key: u64, name: &str| -> Result<String, DecodeError> {
                match get(key) {
                    Some(Value::Text(s)) => Ok(s.clone()),
                    _ => Err(DecodeError::Malformed(format!("invalid {}", name))),
                }
            };
            let star = match get(payload_keys::STAR) {
                Some(Value::Bytes(b)) => Bytes::copy_from_slice(b),
                _ => return Err(DecodeError::Malformed("invalid star".into())),
            };
            Ok(Payload::Ownership(OwnershipRecord {
                address: text(payload_keys::ADDRESS, "address")?,
                message: text(payload_keys::MESSAGE, "message")?,
                signature: text(payload_keys::SIGNATURE, "signature")?,
                star,
            }))
        }
        other => Err(DecodeError::UnknownKind(other)),
    }
}

fn lookup(map: &[(Value, Value)], key: u64) -> Option<&Value> {
    map.iter()
        .find(|(k, _)| matches!(k, Value::Integer(i) if u64::try_from(*i).ok() == Some(key)))
        .map(|(_, v)| v)
}

fn encode(item: &Item<'_>) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_item(&mut buf, item);
    buf
}

fn encode_item(buf: &mut Vec<u8>, item: &Item<'_>) {
    match item {
        Item::Uint(n) => encode_head(buf, 0, *n),
        Item::Int(n) if *n >= 0 => encode_head(buf, 0, *n as u64),
        // CBOR encodes -1 as 0, -2 as 1, etc.
        Item::Int(n) => encode_head(buf, 1, (-1 - *n) as u64),
        Item::Bytes(b) => {
            encode_head(buf, 2, b.len() as u64);
            buf.extend_from_slice(b);
        }
        Item::Text(s) => {
            encode_head(buf, 3, s.len() as u64);
            buf.extend_from_slice(s.as_bytes());
        }
        Item::Null => buf.push(0xf6),
        Item::Map(entries) => {
            // For unsigned keys in shortest form, numeric order is the
            // encoded-byte order required by deterministic encoding.
            let mut sorted: Vec<&(u64, Item<'_>)> = entries.iter().collect();
            sorted.sort_by_key(|(k, _)| *k);
            encode_head(buf, 5, sorted.len() as u64);
            for (key, value) in sorted {
                encode_head(buf, 0, *key);
                encode_item(buf, value);
            }
        }
    }
}

/// Write a major type and argument in the shortest form.
fn encode_head(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    match n {
        0..=23 => buf.push(mt | n as u8),
        24..=0xff => {
            buf.push(mt | 24);
            buf.push(n as u8);
        }
        0x100..=0xffff => {
            buf.push(mt | 25);
            buf.extend_from_slice(&(n as u16).to_be_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            buf.push(mt | 26);
            buf.extend_from_slice(&(n as u32).to_be_bytes());
        }
        _ => {
            buf.push(mt | 27);
            buf.extend_from_slice(&n.to_be_bytes());
        }
    }
}
