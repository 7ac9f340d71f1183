//! Error types for the Star Ledger core.

use thiserror::Error;

/// Failure to decode a block payload from its stored bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("payload is not valid CBOR: {0}")]
    Cbor(String),

    #[error("payload has {0} trailing bytes")]
    TrailingBytes(usize),

    #[error("payload is not canonically encoded")]
    NonCanonical,

    #[error("unknown payload kind: {0}")]
    UnknownKind(u64),

    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// Errors raised by block lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    #[error("block is already finalized")]
    AlreadyFinalized,
}

/// Input to signature verification that is not even structurally valid.
///
/// Well-formed input that simply fails verification is reported as
/// `Ok(false)` by [`crate::SignatureVerifier`], never as this error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedInputError {
    #[error("malformed address: {0}")]
    Address(String),

    #[error("malformed signature: {0}")]
    Signature(String),
}
