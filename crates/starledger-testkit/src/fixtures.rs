//! Test fixtures and helpers.
//!
//! Common setup code for integration tests. Everything runs on a
//! [`ManualClock`] so challenge expiry can be driven explicitly.

use std::sync::Arc;

use bytes::Bytes;
use starledger::{Block, Chain, OwnershipFlow, RegistryConfig, Result};
use starledger_core::{Ed25519Verifier, Keypair, ManualClock};

/// 2025-01-14T16:00:00Z.
pub const FIXTURE_EPOCH: i64 = 1_736_870_400;

/// A party holding a deterministic keypair.
#[derive(Debug)]
pub struct Claimant {
    pub keypair: Keypair,
}

impl Claimant {
    /// Create a claimant with a random keypair.
    pub fn new() -> Self {
        Self {
            keypair: Keypair::generate(),
        }
    }

    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            keypair: Keypair::from_seed(&seed),
        }
    }

    /// The claimant's address.
    pub fn address(&self) -> String {
        self.keypair.address()
    }

    /// Sign a challenge message.
    pub fn sign(&self, message: &str) -> String {
        self.keypair.sign_message(message)
    }
}

impl Default for Claimant {
    fn default() -> Self {
        Self::new()
    }
}

/// A chain and ownership flow sharing one manual clock.
pub struct TestFixture {
    pub clock: Arc<ManualClock>,
    pub chain: Arc<Chain>,
    pub flow: OwnershipFlow,
}

impl TestFixture {
    /// Create a fixture with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a fixture with a custom configuration.
    pub fn with_config(config: RegistryConfig) -> Self {
        let clock = Arc::new(ManualClock::new(FIXTURE_EPOCH));
        // Genesis on a manual clock cannot fail.
        let chain = Arc::new(Chain::with_clock(clock.clone()).expect("genesis"));
        let flow = OwnershipFlow::with_clock(
            Arc::clone(&chain),
            Ed25519Verifier,
            clock.clone(),
            config,
        );
        Self { clock, chain, flow }
    }

    /// Move the clock forward.
    pub fn advance(&self, secs: i64) {
        self.clock.advance(secs);
    }

    /// Request a challenge for `claimant` and return it with its signature.
    pub fn signed_challenge(&self, claimant: &Claimant) -> (String, String) {
        let message = self.flow.request_challenge(&claimant.address());
        let signature = claimant.sign(&message);
        (message, signature)
    }

    /// Run the whole flow for `claimant` without any delay.
    pub fn claim(&self, claimant: &Claimant, star: &[u8]) -> Result<Block> {
        let (message, signature) = self.signed_challenge(claimant);
        self.flow.submit(
            &claimant.address(),
            &message,
            &signature,
            Bytes::copy_from_slice(star),
        )
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple claimants for multi-party tests.
pub fn multi_party_claimants(count: usize) -> Vec<Claimant> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            seed[1] = (i >> 8) as u8;
            Claimant::with_seed(seed)
        })
        .collect()
}
