//! Signature verification for ownership claims.

use crate::crypto::{Ed25519PublicKey, Ed25519Signature};
use crate::error::MalformedInputError;

/// Checks that `signature` over `message` was produced by the key behind `address`.
///
/// Implementations are stateless and must not panic. Input that cannot even
/// be parsed (bad encoding, wrong length) is a [`MalformedInputError`];
/// everything else that fails to verify is `Ok(false)`.
pub trait SignatureVerifier: Send + Sync {
    fn verify(
        &self,
        message: &str,
        address: &str,
        signature: &str,
    ) -> Result<bool, MalformedInputError>;
}

/// Verifier for hex Ed25519 addresses and hex Ed25519 signatures over the
/// UTF-8 bytes of the message.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(
        &self,
        message: &str,
        address: &str,
        signature: &str,
    ) -> Result<bool, MalformedInputError> {
        let public_key = Ed25519PublicKey::from_address(address)?;
        let signature = Ed25519Signature::from_hex(signature)?;
        Ok(public_key.verifies(message.as_bytes(), &signature))
    }
}

impl<V: SignatureVerifier + ?Sized> SignatureVerifier for std::sync::Arc<V> {
    fn verify(
        &self,
        message: &str,
        address: &str,
        signature: &str,
    ) -> Result<bool, MalformedInputError> {
        (**self).verify(message, address, signature)
    }
}
