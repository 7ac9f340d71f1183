//! Strong type definitions for the Star Ledger.
//!
//! Identifiers are newtypes so a block hash can never be confused with a
//! public key or a signature at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte block hash, computed as Blake3 over the block's canonical content.
///
/// `BlockHash::ZERO` marks a block that has not been finalized yet.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockHash(pub [u8; 32]);

impl BlockHash {
    /// Hash arbitrary bytes with Blake3.
    pub fn digest(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Create a new BlockHash from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| hex::FromHexError::InvalidStringLength)?;
        Ok(Self(arr))
    }

    /// Whether this is the unset sentinel.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// The zero hash (unset sentinel).
    pub const ZERO: Self = Self([0u8; 32]);
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl AsRef<[u8]> for BlockHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for BlockHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for BlockHash {
    type Error = std::array::TryFromSliceError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; 32] = slice.try_into()?;
        Ok(Self(arr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_hash_hex_roundtrip() {
        let hash = BlockHash::from_bytes([0x42; 32]);
        let recovered = BlockHash::from_hex(&hash.to_hex()).unwrap();
        assert_eq!(hash, recovered);
    }

    #[test]
    fn test_block_hash_rejects_short_hex() {
        assert!(BlockHash::from_hex("abcd").is_err());
        assert!(BlockHash::from_hex("zz").is_err());
    }

    #[test]
    fn test_block_hash_display_is_full_hex() {
        let hash = BlockHash::from_bytes([0xab; 32]);
        assert_eq!(format!("{}", hash), "ab".repeat(32));
    }

    #[test]
    fn test_block_hash_debug() {
        let hash = BlockHash::from_bytes([0xcd; 32]);
        assert_eq!(format!("{:?}", hash), "BlockHash(cdcdcdcdcdcdcdcd)");
    }

    #[test]
    fn test_zero_sentinel() {
        assert!(BlockHash::ZERO.is_zero());
        assert!(!BlockHash::digest(b"x").is_zero());
    }
}
