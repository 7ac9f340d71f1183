//! Block: the unit of data in the ledger.
//!
//! A block is created with its linkage fields unset, finalized exactly once
//! by the chain that accepts it, and never mutated afterwards. Its hash
//! commits to height, timestamp, previous hash and the encoded payload.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::canonical::{block_hash_input, decode_payload, encode_payload};
use crate::error::{BlockError, DecodeError};
use crate::types::BlockHash;

/// A proof-of-ownership claim over a star.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipRecord {
    /// The claimant's address.
    pub address: String,

    /// The challenge message the claimant signed.
    pub message: String,

    /// The claimant's signature over `message`.
    pub signature: String,

    /// Star metadata, stored and returned verbatim.
    pub star: Bytes,
}

/// What a block carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    /// Marker for the first block of a chain.
    Genesis,
    /// An ownership claim.
    Ownership(OwnershipRecord),
}

impl Payload {
    /// The ownership record, if this is one.
    pub fn as_ownership(&self) -> Option<&OwnershipRecord> {
        match self {
            Payload::Ownership(record) => Some(record),
            Payload::Genesis => None,
        }
    }
}

/// A block in the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the chain (0 = genesis).
    pub height: u64,

    /// Unix seconds, assigned by the chain at insertion.
    pub timestamp: i64,

    /// Hash of the block at `height - 1`. `None` for genesis.
    pub previous_hash: Option<BlockHash>,

    /// Content hash. `BlockHash::ZERO` until finalized.
    pub hash: BlockHash,

    /// Canonical encoding of a [`Payload`].
    pub payload: Bytes,
}

impl Block {
    /// Create an unfinalized block carrying `payload`.
    pub fn create(payload: &Payload) -> Self {
        Self {
            height: 0,
            timestamp: 0,
            previous_hash: None,
            hash: BlockHash::ZERO,
            payload: Bytes::from(encode_payload(payload)),
        }
    }

    /// Create an unfinalized genesis block.
    pub fn genesis() -> Self {
        Self::create(&Payload::Genesis)
    }

    /// Create an unfinalized block for an ownership claim.
    pub fn ownership(record: OwnershipRecord) -> Self {
        Self::create(&Payload::Ownership(record))
    }

    /// Set the linkage fields, then compute and set the hash.
    ///
    /// The hash is computed strictly after the other fields are assigned, so
    /// it commits to all of them. Fails if the block was already finalized.
    pub fn finalize(
        &mut self,
        height: u64,
        previous_hash: Option<BlockHash>,
        timestamp: i64,
    ) -> Result<(), BlockError> {
        if self.is_finalized() {
            return Err(BlockError::AlreadyFinalized);
        }

        self.height = height;
        self.previous_hash = previous_hash;
        self.timestamp = timestamp;
        self.hash = self.compute_hash();

        debug!(height, hash = %self.hash, "finalized block");
        Ok(())
    }

    /// Recompute the content hash from the current field values.
    pub fn compute_hash(&self) -> BlockHash {
        BlockHash::digest(&block_hash_input(
            self.height,
            self.timestamp,
            self.previous_hash.as_ref(),
            &self.payload,
        ))
    }

    /// Check that the stored hash matches the block's content.
    ///
    /// Detects tampering with this block only; linkage is checked by the chain.
    pub fn validate(&self) -> bool {
        !self.hash.is_zero() && self.hash == self.compute_hash()
    }

    /// Decode the stored payload.
    pub fn decode_payload(&self) -> Result<Payload, DecodeError> {
        decode_payload(&self.payload)
    }

    /// Whether a hash has been assigned.
    pub fn is_finalized(&self) -> bool {
        !self.hash.is_zero()
    }

    /// Whether this block sits at the genesis position.
    pub fn is_genesis(&self) -> bool {
        self.height == 0 && self.previous_hash.is_none()
    }
}
