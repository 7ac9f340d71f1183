//! Golden test vectors for deterministic verification.
//!
//! Each vector pins the canonical bytes of a block's content. Any encoder
//! that disagrees with these bytes produces different block hashes.

use bytes::Bytes;
use serde::Serialize;
use starledger_core::{canonical_block_bytes, Block, BlockHash, OwnershipRecord, Payload};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Block height.
    pub height: u64,
    /// Unix seconds.
    pub timestamp: i64,
    /// Fill byte for the previous hash, or `None` for no predecessor.
    pub previous_fill: Option<u8>,
    /// The payload carried by the block, if any.
    pub payload: Option<Payload>,
    /// Expected canonical content bytes (hex).
    pub expected_content: &'static str,
}

impl GoldenVector {
    /// The previous hash this vector links to.
    pub fn previous_hash(&self) -> Option<BlockHash> {
        self.previous_fill.map(|b| BlockHash::from_bytes([b; 32]))
    }
}

/// The ownership record used by the ownership vectors.
pub fn sample_record() -> OwnershipRecord {
    OwnershipRecord {
        address: "ab".to_string(),
        message: "ab:1736870400:starRegistry".to_string(),
        signature: "cd".to_string(),
        star: Bytes::from_static(b"{}"),
    }
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "Genesis block",
            height: 0,
            timestamp: 1736870400, // 2025-01-14T16:00:00Z
            previous_fill: None,
            payload: Some(Payload::Genesis),
            expected_content: "a40000011a67868a0002f60343a10000",
        },
        GoldenVector {
            name: "Ownership block",
            height: 1,
            timestamp: 1736870460,
            previous_fill: Some(0xaa),
            payload: Some(Payload::Ownership(sample_record())),
            expected_content: concat!(
                "a40001011a67868a3c025820",
                "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
                "03582c",
                "a500010162616202781a61623a31373336383730343030",
                "3a7374617252656769737472790362636404427b7d",
            ),
        },
        GoldenVector {
            name: "Negative timestamp with empty payload",
            height: 2,
            timestamp: -1,
            previous_fill: Some(0x11),
            payload: None,
            expected_content: concat!(
                "a400020120025820",
                "1111111111111111111111111111111111111111111111111111111111111111",
                "0340",
            ),
        },
    ]
}

/// Build and finalize the block described by a vector.
pub fn generate_block_from_vector(vector: &GoldenVector) -> Block {
    let mut block = match &vector.payload {
        Some(payload) => Block::create(payload),
        None => {
            let mut block = Block::genesis();
            block.payload = Bytes::new();
            block
        }
    };
    block
        .finalize(vector.height, vector.previous_hash(), vector.timestamp)
        .expect("fresh block is not finalized");
    block
}

/// Canonical content bytes of the block described by a vector.
pub fn content_bytes(vector: &GoldenVector) -> Vec<u8> {
    let block = generate_block_from_vector(vector);
    canonical_block_bytes(
        block.height,
        block.timestamp,
        block.previous_hash.as_ref(),
        &block.payload,
    )
}

/// One line of a vector report.
#[derive(Debug, Clone, Serialize)]
pub struct VectorReport {
    pub name: String,
    pub matches: bool,
    pub content: String,
    pub hash: String,
}

/// Check every vector against its expected bytes.
pub fn verify_all_vectors() -> Vec<VectorReport> {
    all_vectors()
        .iter()
        .map(|v| {
            let content = hex::encode(content_bytes(v));
            VectorReport {
                name: v.name.to_string(),
                matches: content == v.expected_content,
                hash: generate_block_from_vector(v).hash.to_hex(),
                content,
            }
        })
        .collect()
}

/// The vector report as pretty JSON, for sharing with other implementations.
pub fn vectors_json() -> serde_json::Result<String> {
    serde_json::to_string_pretty(&verify_all_vectors())
}
