//! # Star Ledger Core
//!
//! Pure primitives for the Star Ledger: blocks, canonical encoding, and
//! signature verification.
//!
//! This crate contains no chain state and no I/O. It is pure computation
//! over hashed, encoded data.
//!
//! ## Key Types
//!
//! - [`Block`] - A hash-committed unit of data, finalized once by a chain
//! - [`BlockHash`] - Content hash (Blake3 over canonical bytes)
//! - [`Payload`] - Genesis marker or an [`OwnershipRecord`]
//! - [`SignatureVerifier`] - Checks a claimant's signature against an address
//! - [`Clock`] - Source of Unix seconds
//!
//! ## Canonicalization
//!
//! Block content and payloads are encoded as deterministic CBOR. See the
//! [`canonical`] module.

pub mod block;
pub mod canonical;
pub mod clock;
pub mod crypto;
pub mod error;
pub mod types;
pub mod verifier;

pub use block::{Block, OwnershipRecord, Payload};
pub use canonical::{canonical_block_bytes, decode_payload, encode_payload, BLOCK_DOMAIN};
pub use clock::{Clock, ManualClock, SystemClock};
pub use crypto::{Ed25519PublicKey, Ed25519Signature, Keypair};
pub use error::{BlockError, DecodeError, MalformedInputError};
pub use types::BlockHash;
pub use verifier::{Ed25519Verifier, SignatureVerifier};
