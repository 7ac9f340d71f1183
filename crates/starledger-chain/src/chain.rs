//! Chain: the ordered, append-only sequence of blocks.
//!
//! All state sits behind a single `RwLock`. `append` holds the write guard
//! for the whole protocol (height, link, hash, validate, push, full-chain
//! check), so concurrent appends are serialized and readers never observe a
//! half-linked block. Height is always derived from the vector length.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bytes::Bytes;
use starledger_core::{Block, BlockHash, Clock, Payload, SystemClock};
use tracing::{error, info};

use crate::error::{AppendError, Result};
use crate::validation::{validate_blocks, ChainViolation};

/// An in-memory hash-linked chain, seeded with a genesis block.
pub struct Chain {
    blocks: RwLock<Vec<Block>>,
    clock: Arc<dyn Clock>,
}

impl Chain {
    /// Create a chain on the system clock.
    ///
    /// # Panics
    ///
    /// Panics if the genesis block cannot be appended. Genesis carries no
    /// signature or time check, so this means the process cannot start.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock)).expect("genesis insertion must not fail")
    }

    /// Create a chain that timestamps blocks with `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Result<Self> {
        let chain = Self {
            blocks: RwLock::new(Vec::new()),
            clock,
        };
        chain.append(Block::genesis())?;
        Ok(chain)
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Block>> {
        self.blocks.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Block>> {
        self.blocks.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Append
    // ─────────────────────────────────────────────────────────────────────────

    /// Link, hash, validate and append a block.
    ///
    /// The block must not be finalized yet: the chain assigns its height,
    /// timestamp and previous hash. Returns the block as stored.
    pub fn append(&self, mut block: Block) -> Result<Block> {
        let mut blocks = self.write();

        let height = blocks.len() as u64;
        let timestamp = self.clock.now_secs();
        let previous_hash = blocks.last().map(|b| b.hash);

        block
            .finalize(height, previous_hash, timestamp)
            .map_err(|e| AppendError::InvalidBlock {
                reason: e.to_string(),
            })?;

        if !block.validate() {
            return Err(AppendError::InvalidBlock {
                reason: format!("hash {} does not match content", block.hash),
            });
        }

        blocks.push(block.clone());

        let violations = validate_blocks(&blocks);
        if !violations.is_empty() {
            error!(
                height,
                hash = %block.hash,
                violations = violations.len(),
                "chain validation failed after append"
            );
            return Err(AppendError::ChainCorrupted {
                hash: block.hash,
                violations,
            });
        }

        info!(height, hash = %block.hash, "appended block");
        Ok(block)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Height of the latest block.
    ///
    /// Genesis is appended during construction, so a chain is never observed
    /// empty and this is at least 0.
    pub fn current_height(&self) -> u64 {
        (self.read().len() as u64).saturating_sub(1)
    }

    /// Number of blocks, genesis included.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Always false once construction completes.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// The latest block.
    pub fn latest(&self) -> Option<Block> {
        self.read().last().cloned()
    }

    /// Find the first block with the given hash.
    pub fn get_by_hash(&self, hash: &BlockHash) -> Option<Block> {
        self.read().iter().find(|b| &b.hash == hash).cloned()
    }

    /// Find a block by hex-encoded hash. Unparseable input is simply not found.
    pub fn get_by_hash_hex(&self, hash: &str) -> Option<Block> {
        let hash = BlockHash::from_hex(hash).ok()?;
        self.get_by_hash(&hash)
    }

    /// Get the block at `height`.
    pub fn get_by_height(&self, height: u64) -> Option<Block> {
        let index = usize::try_from(height).ok()?;
        self.read().get(index).cloned()
    }

    /// Stars claimed by `address`, in insertion order.
    ///
    /// Blocks whose payload does not decode, and genesis, are skipped.
    pub fn get_stars_by_address(&self, address: &str) -> Vec<Bytes> {
        self.read()
            .iter()
            .skip(1)
            .filter_map(|b| match b.decode_payload() {
                Ok(Payload::Ownership(record)) if record.address == address => Some(record.star),
                _ => None,
            })
            .collect()
    }

    /// Blocks claimed by `address`, in insertion order.
    pub fn get_blocks_by_address(&self, address: &str) -> Vec<Block> {
        self.read()
            .iter()
            .skip(1)
            .filter(|b| {
                matches!(
                    b.decode_payload(),
                    Ok(Payload::Ownership(record)) if record.address == address
                )
            })
            .cloned()
            .collect()
    }

    /// A snapshot of every block.
    pub fn blocks(&self) -> Vec<Block> {
        self.read().clone()
    }

    /// Validate the whole chain, reporting every violation found.
    pub fn validate_chain(&self) -> std::result::Result<(), Vec<ChainViolation>> {
        let violations = validate_blocks(&self.read());
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Replace the block at `height` without any checks.
    #[cfg(test)]
    pub(crate) fn overwrite(&self, height: usize, block: Block) {
        self.write()[height] = block;
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain")
            .field("height", &self.current_height())
            .field("latest", &self.latest().map(|b| b.hash))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starledger_core::{ManualClock, OwnershipRecord};

    const T0: i64 = 1_736_870_400;

    fn claim(address: &str, star: &'static [u8]) -> Block {
        Block::ownership(OwnershipRecord {
            address: address.to_string(),
            message: format!("{}:{}:starRegistry", address, T0),
            signature: "sig".to_string(),
            star: Bytes::from_static(star),
        })
    }

    fn chain() -> (Chain, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(T0));
        let chain = Chain::with_clock(clock.clone()).unwrap();
        (chain, clock)
    }

    #[test]
    fn test_new_chain_has_genesis() {
        let (chain, _) = chain();
        assert_eq!(chain.current_height(), 0);
        assert_eq!(chain.len(), 1);

        let genesis = chain.get_by_height(0).unwrap();
        assert_eq!(genesis.height, 0);
        assert_eq!(genesis.previous_hash, None);
        assert_eq!(genesis.timestamp, T0);
        assert!(genesis.is_genesis());
        assert_eq!(genesis.decode_payload().unwrap(), Payload::Genesis);
        assert!(chain.validate_chain().is_ok());
    }

    #[test]
    fn test_system_clock_chain() {
        let chain = Chain::new();
        assert_eq!(chain.current_height(), 0);
        assert!(!chain.is_empty());
    }

    #[test]
    fn test_append_links_blocks() {
        let (chain, clock) = chain();
        clock.advance(5);
        let b1 = chain.append(claim("alice", b"star-1")).unwrap();
        clock.advance(5);
        let b2 = chain.append(claim("bob", b"star-2")).unwrap();

        let genesis = chain.get_by_height(0).unwrap();
        assert_eq!(b1.height, 1);
        assert_eq!(b1.timestamp, T0 + 5);
        assert_eq!(b1.previous_hash, Some(genesis.hash));
        assert_eq!(b2.height, 2);
        assert_eq!(b2.previous_hash, Some(b1.hash));
        assert_eq!(chain.current_height(), 2);
        assert!(chain.validate_chain().is_ok());
    }

    #[test]
    fn test_previous_hash_lookup_names_predecessor() {
        let (chain, _) = chain();
        for address in ["alice", "bob", "alice", "carol", "bob"] {
            chain.append(claim(address, b"star")).unwrap();
        }

        let blocks = chain.blocks();
        for h in 1..blocks.len() {
            let prev = blocks[h].previous_hash.unwrap();
            let found = chain.get_by_hash(&prev).unwrap();
            assert_eq!(found.hash, blocks[h - 1].hash);
        }
    }

    #[test]
    fn test_append_rejects_finalized_block() {
        let (chain, _) = chain();
        let appended = chain.append(claim("alice", b"s")).unwrap();

        let result = chain.append(appended);
        assert!(matches!(result, Err(AppendError::InvalidBlock { .. })));
        assert_eq!(chain.current_height(), 1);
        assert!(chain.validate_chain().is_ok());
    }

    #[test]
    fn test_append_detects_corrupted_chain() {
        let (chain, _) = chain();
        let b1 = chain.append(claim("alice", b"s")).unwrap();

        let mut forged = b1.clone();
        forged.payload = Bytes::from_static(b"forged");
        chain.overwrite(1, forged);

        let result = chain.append(claim("bob", b"t"));
        match result {
            Err(AppendError::ChainCorrupted { violations, .. }) => {
                assert_eq!(
                    violations,
                    vec![ChainViolation::InvalidBlock {
                        height: 1,
                        hash: b1.hash
                    }]
                );
            }
            other => panic!("expected ChainCorrupted, got {:?}", other),
        }
        // The block stays appended.
        assert_eq!(chain.current_height(), 2);
    }

    #[test]
    fn test_get_by_hash() {
        let (chain, _) = chain();
        let b1 = chain.append(claim("alice", b"s")).unwrap();

        assert_eq!(chain.get_by_hash(&b1.hash), Some(b1.clone()));
        assert_eq!(chain.get_by_hash_hex(&b1.hash.to_hex()), Some(b1));
        assert_eq!(chain.get_by_hash(&BlockHash::from_bytes([7; 32])), None);
        assert_eq!(chain.get_by_hash_hex("not-a-hash"), None);
    }

    #[test]
    fn test_get_by_height_out_of_range() {
        let (chain, _) = chain();
        assert!(chain.get_by_height(1).is_none());
        assert!(chain.get_by_height(u64::MAX).is_none());
    }

    #[test]
    fn test_stars_by_address_in_order() {
        let (chain, _) = chain();
        chain.append(claim("X", b"first")).unwrap();
        chain.append(claim("Y", b"other")).unwrap();
        chain.append(claim("X", b"second")).unwrap();

        assert_eq!(
            chain.get_stars_by_address("X"),
            vec![Bytes::from_static(b"first"), Bytes::from_static(b"second")]
        );
        assert_eq!(chain.get_stars_by_address("Y").len(), 1);
        assert!(chain.get_stars_by_address("Z").is_empty());

        let heights: Vec<u64> = chain
            .get_blocks_by_address("X")
            .iter()
            .map(|b| b.height)
            .collect();
        assert_eq!(heights, vec![1, 3]);
    }

    #[test]
    fn test_stars_scan_skips_undecodable_payloads() {
        let (chain, _) = chain();
        chain.append(claim("X", b"kept")).unwrap();

        let mut foreign = Block::genesis();
        foreign.payload = Bytes::from_static(b"\xff\xff");
        chain.append(foreign).unwrap();

        assert_eq!(chain.get_stars_by_address("X"), vec![Bytes::from_static(b"kept")]);
    }

    #[test]
    fn test_validate_chain_reports_tampering() {
        let (chain, _) = chain();
        chain.append(claim("alice", b"a")).unwrap();
        let b2 = chain.append(claim("bob", b"b")).unwrap();
        chain.append(claim("carol", b"c")).unwrap();

        let mut forged = b2.clone();
        forged.timestamp -= 1;
        chain.overwrite(2, forged);

        let violations = chain.validate_chain().unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].to_string(), format!("Invalid block {}", b2.hash));
    }

    #[test]
    fn test_latest() {
        let (chain, _) = chain();
        assert_eq!(chain.latest().unwrap().height, 0);
        let b1 = chain.append(claim("alice", b"s")).unwrap();
        assert_eq!(chain.latest(), Some(b1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_stay_linked() {
        let (chain, _) = chain();
        let chain = Arc::new(chain);

        let mut handles = Vec::new();
        for i in 0..32 {
            let chain = Arc::clone(&chain);
            handles.push(tokio::task::spawn_blocking(move || {
                chain.append(claim(&format!("addr-{}", i % 4), b"star"))
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(chain.current_height(), 32);
        assert!(chain.validate_chain().is_ok());
        let heights: Vec<u64> = chain.blocks().iter().map(|b| b.height).collect();
        assert_eq!(heights, (0..=32).collect::<Vec<u64>>());
    }
}
