//! # Star Ledger Chain
//!
//! The in-memory, append-only chain of blocks. Owns insertion, linkage and
//! whole-chain validation, and answers lookups by hash, height and owner.
//!
//! ## Key Types
//!
//! - [`Chain`] - The ordered block sequence behind a single lock
//! - [`AppendError`] - Why an append was refused
//! - [`ChainViolation`] - One finding from whole-chain validation
//!
//! ## Design Notes
//!
//! - **Derived height**: height is always `len - 1`, never stored separately
//! - **Atomic append**: the whole append protocol runs under one write guard
//! - **Complete reports**: validation never stops at the first violation

pub mod chain;
pub mod error;
pub mod validation;

pub use chain::Chain;
pub use error::{AppendError, Result};
pub use validation::{validate_blocks, ChainViolation};
