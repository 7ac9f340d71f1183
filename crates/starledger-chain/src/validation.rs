//! Whole-chain validation.
//!
//! Walks every block after genesis and reports every violation found, in
//! block order. Nothing here mutates or short-circuits.

use starledger_core::{Block, BlockHash};
use thiserror::Error;

/// A single finding from whole-chain validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainViolation {
    /// The block's stored hash does not match its content.
    #[error("Invalid block {hash}")]
    InvalidBlock { height: u64, hash: BlockHash },

    /// The block's previous hash does not name its predecessor.
    #[error(
        "Invalid link: block {hash} has previous hash {} but predecessor hash is {predecessor_hash}",
        fmt_previous(previous_hash)
    )]
    BrokenLink {
        height: u64,
        hash: BlockHash,
        previous_hash: Option<BlockHash>,
        predecessor_hash: BlockHash,
    },

    /// The block's height field disagrees with its position.
    #[error("Block at position {position} claims height {height}")]
    HeightMismatch { position: u64, height: u64 },
}

fn fmt_previous(previous_hash: &Option<BlockHash>) -> String {
    previous_hash.map_or_else(|| "<none>".to_string(), |h| h.to_hex())
}

/// Validate an ordered run of blocks.
///
/// Position 0 is genesis and has no predecessor to check. For every later
/// block the block's own hash must verify and its predecessor, looked up by
/// `previous_hash`, must be the block directly before it.
pub fn validate_blocks(blocks: &[Block]) -> Vec<ChainViolation> {
    let mut violations = Vec::new();

    for (position, block) in blocks.iter().enumerate().skip(1) {
        let position = position as u64;

        if block.height != position {
            violations.push(ChainViolation::HeightMismatch {
                position,
                height: block.height,
            });
        }

        if !block.validate() {
            violations.push(ChainViolation::InvalidBlock {
                height: position,
                hash: block.hash,
            });
        }

        let predecessor = &blocks[position as usize - 1];
        if block.previous_hash != Some(predecessor.hash) {
            violations.push(ChainViolation::BrokenLink {
                height: position,
                hash: block.hash,
                previous_hash: block.previous_hash,
                predecessor_hash: predecessor.hash,
            });
        }
    }

    violations
}
