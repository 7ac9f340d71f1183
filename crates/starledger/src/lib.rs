//! # Star Ledger
//!
//! A single-node, append-only registry of star ownership claims. Each claim
//! is proven with a signed, time-stamped challenge and recorded as a block in
//! a hash-linked chain.
//!
//! ## Overview
//!
//! - **Blocks**: Hash-committed units of data, immutable once chained
//! - **Chain**: Ordered blocks, each linked to its predecessor's hash
//! - **Ownership flow**: Challenge, signature, block
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use starledger::{Chain, OwnershipFlow};
//! use starledger::core::Keypair;
//!
//! let chain = Arc::new(Chain::new());
//! let flow = OwnershipFlow::ed25519(Arc::clone(&chain));
//!
//! // The claimant signs the challenge on their side.
//! let keypair = Keypair::generate();
//! let address = keypair.address();
//! let message = flow.request_challenge(&address);
//! let signature = keypair.sign_message(&message);
//!
//! let block = flow
//!     .submit(&address, &message, &signature, b"{\"ra\":\"16h 29m 1.0s\"}".to_vec())
//!     .unwrap();
//!
//! assert_eq!(block.height, 1);
//! assert!(chain.validate_chain().is_ok());
//! ```
//!
//! ## Re-exports
//!
//! - `starledger::core` - Blocks, hashes, signatures, clocks
//! - `starledger::chain` - The chain and its validation

pub mod config;
pub mod error;
pub mod flow;

// Re-export component crates
pub use starledger_chain as chain;
pub use starledger_core as core;

pub use config::{
    RegistryConfig, DEFAULT_CHALLENGE_WINDOW, DEFAULT_MAX_CLOCK_SKEW, DEFAULT_REGISTRY_TAG,
};
pub use error::{Result, SubmitError};
pub use flow::OwnershipFlow;

// Re-export commonly used types
pub use starledger_chain::{AppendError, Chain, ChainViolation};
pub use starledger_core::{
    Block, BlockHash, Clock, DecodeError, Ed25519Verifier, Keypair, ManualClock, OwnershipRecord,
    Payload, SignatureVerifier, SystemClock,
};
