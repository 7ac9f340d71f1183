//! # Star Ledger Testkit
//!
//! Testing utilities for the Star Ledger.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known blocks with expected canonical bytes
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: A chain, flow and manual clock wired together
//!
//! ## Golden Vectors
//!
//! ```rust
//! use starledger_testkit::vectors::verify_all_vectors;
//!
//! for report in verify_all_vectors() {
//!     assert!(report.matches, "{}: {}", report.name, report.content);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use starledger_testkit::generators::{block_from_params, BlockParams};
//!
//! proptest! {
//!     #[test]
//!     fn block_hash_is_deterministic(params: BlockParams) {
//!         let b1 = block_from_params(&params);
//!         let b2 = block_from_params(&params);
//!         prop_assert_eq!(b1.hash, b2.hash);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use starledger_testkit::fixtures::{Claimant, TestFixture};
//!
//! let fixture = TestFixture::new();
//! let claimant = Claimant::with_seed([1; 32]);
//! let block = fixture.claim(&claimant, b"sirius").unwrap();
//! assert_eq!(block.height, 1);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_claimants, Claimant, TestFixture, FIXTURE_EPOCH};
pub use generators::{block_from_params, BlockParams};
pub use vectors::{all_vectors, generate_block_from_vector, verify_all_vectors, GoldenVector};
