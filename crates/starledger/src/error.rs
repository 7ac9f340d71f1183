//! Error types for the registry.

use starledger_chain::AppendError;
use starledger_core::MalformedInputError;
use thiserror::Error;

/// Errors that can occur when submitting an ownership claim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The message has no numeric time component.
    #[error("malformed challenge message: {0}")]
    MalformedMessage(String),

    /// The challenge is older than the configured window.
    #[error("challenge expired {elapsed}s after issue (window is {window}s)")]
    ChallengeExpired { elapsed: i64, window: i64 },

    /// The challenge claims to be issued further ahead of the registry clock
    /// than the tolerated skew.
    #[error("challenge issued {ahead}s in the future (tolerated skew is {skew}s)")]
    ChallengeFromFuture { ahead: i64, skew: i64 },

    /// The signature does not prove ownership of the address.
    #[error("signature does not match address {address}")]
    SignatureInvalid { address: String },

    /// The address or signature could not be parsed at all.
    #[error("malformed input: {0}")]
    MalformedInput(#[from] MalformedInputError),

    /// The chain refused the block.
    #[error("append failed: {0}")]
    AppendFailed(#[from] AppendError),
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, SubmitError>;
