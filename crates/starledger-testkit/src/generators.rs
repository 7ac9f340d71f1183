//! Proptest generators for property-based testing.

use bytes::Bytes;
use proptest::prelude::*;

use starledger_core::{Block, BlockHash, Keypair, OwnershipRecord, Payload};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a random BlockHash.
pub fn block_hash() -> impl Strategy<Value = BlockHash> {
    any::<[u8; 32]>().prop_map(BlockHash::from_bytes)
}

/// Generate a timestamp in Unix seconds, negative values included.
pub fn timestamp() -> impl Strategy<Value = i64> {
    -1_000_000i64..=4_102_444_800i64
}

/// Generate star bytes of specified max length.
pub fn star(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate an ownership record with arbitrary text fields.
pub fn ownership_record() -> impl Strategy<Value = OwnershipRecord> {
    (".{0,40}", ".{0,80}", "[0-9a-f]{0,128}", star(256)).prop_map(
        |(address, message, signature, star)| OwnershipRecord {
            address,
            message,
            signature,
            star: Bytes::from(star),
        },
    )
}

/// Generate a payload.
pub fn payload() -> impl Strategy<Value = Payload> {
    prop_oneof![
        1 => Just(Payload::Genesis),
        4 => ownership_record().prop_map(Payload::Ownership),
    ]
}

/// Parameters for generating a finalized block.
#[derive(Debug, Clone)]
pub struct BlockParams {
    pub height: u64,
    pub timestamp: i64,
    pub previous_hash: Option<BlockHash>,
    pub payload: Payload,
}

impl Arbitrary for BlockParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            0u64..=1_000_000u64, // height
            timestamp(),
            prop::option::of(block_hash()),
            payload(),
        )
            .prop_map(|(height, timestamp, previous_hash, payload)| BlockParams {
                height,
                timestamp,
                previous_hash,
                payload,
            })
            .boxed()
    }
}

/// Generate a finalized block from parameters.
pub fn block_from_params(params: &BlockParams) -> Block {
    let mut block = Block::create(&params.payload);
    block
        .finalize(params.height, params.previous_hash, params.timestamp)
        .expect("fresh block is not finalized");
    block
}
