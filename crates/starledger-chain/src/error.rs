//! Error types for the chain.

use starledger_core::BlockHash;
use thiserror::Error;

use crate::validation::ChainViolation;

/// Errors that can occur when appending a block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppendError {
    /// The block could not be finalized or failed its own hash check.
    /// The chain is unchanged.
    #[error("invalid block: {reason}")]
    InvalidBlock { reason: String },

    /// Whole-chain validation failed after the block was appended.
    ///
    /// This is an internal invariant violation, not a caller error. The
    /// block remains appended.
    #[error("chain corrupted after appending block {hash} ({} violations)", violations.len())]
    ChainCorrupted {
        hash: BlockHash,
        violations: Vec<ChainViolation>,
    },
}

/// Result type for chain operations.
pub type Result<T> = std::result::Result<T, AppendError>;
