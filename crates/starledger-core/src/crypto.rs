//! Cryptographic primitives for the Star Ledger.
//!
//! Wraps Ed25519 signing with strong types. A claimant's address is the hex
//! encoding of their Ed25519 public key; signatures travel as hex strings.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::MalformedInputError;

/// A 32-byte Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ed25519PublicKey(pub [u8; 32]);

impl Ed25519PublicKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string. This is the claimant's address.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse an address.
    pub fn from_address(address: &str) -> Result<Self, MalformedInputError> {
        let bytes = hex::decode(address.trim())
            .map_err(|e| MalformedInputError::Address(e.to_string()))?;
        let arr: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| {
            MalformedInputError::Address(format!("expected 32 bytes, got {}", b.len()))
        })?;
        Ok(Self(arr))
    }

    /// Check a signature over a message.
    ///
    /// Returns false both for a bad signature and for key bytes that are not
    /// a valid curve point.
    pub fn verifies(&self, message: &[u8], signature: &Ed25519Signature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.0) else {
            return false;
        };
        let sig = Signature::from_bytes(&signature.0);
        verifying_key.verify(message, &sig).is_ok()
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Pub({})", &self.to_hex()[..16])
    }
}

impl From<[u8; 32]> for Ed25519PublicKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// A 64-byte Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ed25519Signature(pub [u8; 64]);

impl Ed25519Signature {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a hex-encoded signature.
    pub fn from_hex(s: &str) -> Result<Self, MalformedInputError> {
        let bytes =
            hex::decode(s.trim()).map_err(|e| MalformedInputError::Signature(e.to_string()))?;
        let arr: [u8; 64] = bytes.try_into().map_err(|b: Vec<u8>| {
            MalformedInputError::Signature(format!("expected 64 bytes, got {}", b.len()))
        })?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Sig({}...)", &self.to_hex()[..16])
    }
}

impl From<[u8; 64]> for Ed25519Signature {
    fn from(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }
}

/// A claimant keypair.
///
/// The registry itself never holds one; claimants sign challenges on their
/// side. It lives here so clients and tests share one signing scheme.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            signing_key: SigningKey::generate(&mut rng),
        }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Get the public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// The address this keypair signs for.
    pub fn address(&self) -> String {
        self.public_key().to_hex()
    }

    /// Sign raw bytes.
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        Ed25519Signature(self.signing_key.sign(message).to_bytes())
    }

    /// Sign a challenge message, returning the hex signature a claimant submits.
    pub fn sign_message(&self, message: &str) -> String {
        self.sign(message.as_bytes()).to_hex()
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({:?})", self.public_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypair_sign_verify() {
        let keypair = Keypair::generate();
        let signature = keypair.sign(b"hello world");

        assert!(keypair.public_key().verifies(b"hello world", &signature));
        assert!(!keypair.public_key().verifies(b"hello worlD", &signature));
    }

    #[test]
    fn test_keypair_deterministic_from_seed() {
        let kp1 = Keypair::from_seed(&[0x42; 32]);
        let kp2 = Keypair::from_seed(&[0x42; 32]);
        assert_eq!(kp1.address(), kp2.address());
        // Ed25519 signatures are deterministic.
        assert_eq!(kp1.sign_message("m"), kp2.sign_message("m"));
    }

    #[test]
    fn test_address_roundtrip() {
        let keypair = Keypair::generate();
        let parsed = Ed25519PublicKey::from_address(&keypair.address()).unwrap();
        assert_eq!(parsed, keypair.public_key());
    }

    #[test]
    fn test_address_wrong_length() {
        let err = Ed25519PublicKey::from_address("abcd").unwrap_err();
        assert!(matches!(err, MalformedInputError::Address(_)));
    }

    #[test]
    fn test_signature_not_hex() {
        let err = Ed25519Signature::from_hex("not-hex").unwrap_err();
        assert!(matches!(err, MalformedInputError::Signature(_)));
    }
}
