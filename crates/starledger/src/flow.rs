//! The proof-of-ownership flow.
//!
//! A claimant asks for a challenge, signs it with the key behind their
//! address, and submits the signature together with the star. The timestamp
//! embedded in the challenge is the only anti-replay anchor: nothing about
//! issued challenges is remembered. A challenge is accepted from at most
//! `max_clock_skew` before its issue time until `challenge_window` after it.

use std::sync::Arc;

use bytes::Bytes;
use starledger_chain::Chain;
use starledger_core::{
    Block, Clock, Ed25519Verifier, OwnershipRecord, SignatureVerifier, SystemClock,
};
use tracing::{debug, info, warn};

use crate::config::RegistryConfig;
use crate::error::{Result, SubmitError};

/// Issues challenges and turns verified claims into blocks.
pub struct OwnershipFlow<V: SignatureVerifier = Ed25519Verifier> {
    chain: Arc<Chain>,
    verifier: V,
    clock: Arc<dyn Clock>,
    config: RegistryConfig,
}

impl<V: SignatureVerifier> OwnershipFlow<V> {
    /// Create a flow over `chain` using the system clock.
    pub fn new(chain: Arc<Chain>, verifier: V, config: RegistryConfig) -> Self {
        Self::with_clock(chain, verifier, Arc::new(SystemClock), config)
    }

    /// Create a flow that reads time from `clock`.
    pub fn with_clock(
        chain: Arc<Chain>,
        verifier: V,
        clock: Arc<dyn Clock>,
        config: RegistryConfig,
    ) -> Self {
        Self {
            chain,
            verifier,
            clock,
            config,
        }
    }

    /// The chain this flow appends to.
    pub fn chain(&self) -> &Arc<Chain> {
        &self.chain
    }

    /// The active configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Challenge
    // ─────────────────────────────────────────────────────────────────────────

    /// Produce the message `address` must sign: `<address>:<now>:<tag>`.
    pub fn request_challenge(&self, address: &str) -> String {
        let now = self.clock.now_secs();
        debug!(address, issued_at = now, "issued challenge");
        format!("{}:{}:{}", address, now, self.config.registry_tag)
    }

    /// Seconds left before `message` expires.
    pub fn challenge_time_remaining(&self, message: &str) -> Result<i64> {
        let issued_at = parse_issued_at(message)?;
        let elapsed = self.elapsed_checked(issued_at)?;
        Ok(self.config.window_secs() - elapsed.max(0))
    }

    fn elapsed_checked(&self, issued_at: i64) -> Result<i64> {
        let elapsed = self.clock.now_secs().saturating_sub(issued_at);
        let skew = self.config.skew_secs();
        if elapsed < 0 && elapsed.saturating_neg() > skew {
            return Err(SubmitError::ChallengeFromFuture {
                ahead: elapsed.saturating_neg(),
                skew,
            });
        }
        let window = self.config.window_secs();
        if elapsed > window {
            return Err(SubmitError::ChallengeExpired { elapsed, window });
        }
        Ok(elapsed)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Submission
    // ─────────────────────────────────────────────────────────────────────────

    /// Verify a signed challenge and record the claim on the chain.
    pub fn submit(
        &self,
        address: &str,
        message: &str,
        signature: &str,
        star: impl Into<Bytes>,
    ) -> Result<Block> {
        let issued_at = parse_issued_at(message).map_err(|e| {
            warn!(address, error = %e, "rejected claim");
            e
        })?;

        if let Err(e) = self.elapsed_checked(issued_at) {
            warn!(address, error = %e, "rejected claim");
            return Err(e);
        }

        match self.verifier.verify(message, address, signature) {
            Ok(true) => {}
            Ok(false) => {
                warn!(address, "rejected claim: signature does not verify");
                return Err(SubmitError::SignatureInvalid {
                    address: address.to_string(),
                });
            }
            Err(e) => {
                warn!(address, error = %e, "rejected claim: malformed input");
                return Err(e.into());
            }
        }

        let block = self.chain.append(Block::ownership(OwnershipRecord {
            address: address.to_string(),
            message: message.to_string(),
            signature: signature.to_string(),
            star: star.into(),
        }))?;

        info!(address, height = block.height, hash = %block.hash, "registered star");
        Ok(block)
    }

    /// Stars registered to `address`, in registration order.
    pub fn stars_of(&self, address: &str) -> Vec<Bytes> {
        self.chain.get_stars_by_address(address)
    }
}

impl OwnershipFlow<Ed25519Verifier> {
    /// A flow with the default verifier and configuration.
    pub fn ed25519(chain: Arc<Chain>) -> Self {
        Self::new(chain, Ed25519Verifier, RegistryConfig::default())
    }
}

/// Extract the issue time: the second `:`-separated component.
fn parse_issued_at(message: &str) -> Result<i64> {
    let field = message.split(':').nth(1).ok_or_else(|| {
        SubmitError::MalformedMessage(format!("no time field in {:?}", message))
    })?;
    field.trim().parse::<i64>().map_err(|_| {
        SubmitError::MalformedMessage(format!("time field {:?} is not a number", field))
    })
}
