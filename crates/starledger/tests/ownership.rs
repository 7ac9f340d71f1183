//! End-to-end ownership scenarios over a shared chain.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use starledger::{ChainViolation, Payload, RegistryConfig, SubmitError};
use starledger_testkit::{multi_party_claimants, Claimant, TestFixture, FIXTURE_EPOCH};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[test]
fn stars_are_listed_per_address_in_order() {
    init_tracing();
    let fixture = TestFixture::new();
    let parties = multi_party_claimants(2);
    let (x, y) = (&parties[0], &parties[1]);

    fixture.claim(x, b"s1").unwrap();
    fixture.claim(y, b"s2").unwrap();
    fixture.claim(x, b"s3").unwrap();

    assert_eq!(
        fixture.flow.stars_of(&x.address()),
        vec![Bytes::from_static(b"s1"), Bytes::from_static(b"s3")]
    );
    assert_eq!(fixture.flow.stars_of(&y.address()), vec![Bytes::from_static(b"s2")]);
    assert!(fixture.flow.stars_of("nobody").is_empty());
    assert_eq!(fixture.chain.current_height(), 3);
}

#[test]
fn chain_stays_valid_after_every_append() {
    init_tracing();
    let fixture = TestFixture::new();
    assert!(fixture.chain.validate_chain().is_ok());

    for (i, claimant) in multi_party_claimants(6).iter().enumerate() {
        fixture.advance(7);
        let block = fixture.claim(claimant, format!("star-{}", i).as_bytes()).unwrap();
        assert_eq!(block.height, i as u64 + 1);
        assert_eq!(block.timestamp, FIXTURE_EPOCH + 7 * (i as i64 + 1));
        assert!(fixture.chain.validate_chain().is_ok());
    }
}

#[test]
fn previous_hash_resolves_to_predecessor() {
    let fixture = TestFixture::new();
    for claimant in multi_party_claimants(4) {
        fixture.claim(&claimant, b"star").unwrap();
    }

    for height in 1..=fixture.chain.current_height() {
        let block = fixture.chain.get_by_height(height).unwrap();
        let previous = block.previous_hash.unwrap();
        let predecessor = fixture.chain.get_by_hash(&previous).unwrap();
        assert_eq!(predecessor.height, height - 1);
    }
    assert!(fixture.chain.get_by_height(0).unwrap().previous_hash.is_none());
}

#[test]
fn challenge_expires_after_window() {
    init_tracing();
    let fixture = TestFixture::new();
    let claimant = Claimant::with_seed([3; 32]);

    let (message, signature) = fixture.signed_challenge(&claimant);
    fixture.advance(299);
    assert!(fixture
        .flow
        .submit(&claimant.address(), &message, &signature, Bytes::from_static(b"early"))
        .is_ok());

    let (message, signature) = fixture.signed_challenge(&claimant);
    fixture.advance(301);
    let result = fixture.flow.submit(
        &claimant.address(),
        &message,
        &signature,
        Bytes::from_static(b"late"),
    );
    assert!(matches!(result, Err(SubmitError::ChallengeExpired { .. })));
    assert_eq!(fixture.chain.current_height(), 1);
}

#[test]
fn custom_window_is_honoured() {
    let fixture = TestFixture::with_config(
        RegistryConfig::default().with_challenge_window(Duration::from_secs(60)),
    );
    let claimant = Claimant::with_seed([4; 32]);

    let (message, signature) = fixture.signed_challenge(&claimant);
    fixture.advance(61);
    let result = fixture
        .flow
        .submit(&claimant.address(), &message, &signature, Bytes::new());
    assert_eq!(
        result,
        Err(SubmitError::ChallengeExpired {
            elapsed: 61,
            window: 60
        })
    );
}

#[test]
fn signature_from_another_key_is_rejected() {
    init_tracing();
    let fixture = TestFixture::new();
    let parties = multi_party_claimants(2);

    let (message, _) = fixture.signed_challenge(&parties[0]);
    let forged = parties[1].sign(&message);
    let result = fixture
        .flow
        .submit(&parties[0].address(), &message, &forged, Bytes::new());

    assert_eq!(
        result,
        Err(SubmitError::SignatureInvalid {
            address: parties[0].address()
        })
    );
    assert_eq!(fixture.chain.current_height(), 0);
}

#[test]
fn tampering_with_a_copy_is_detected() {
    let fixture = TestFixture::new();
    let block = fixture.claim(&Claimant::with_seed([5; 32]), b"polaris").unwrap();
    assert!(block.validate());

    let mut copy = block.clone();
    copy.payload = Bytes::from_static(b"forged");
    assert!(!copy.validate());

    let mut copy = block.clone();
    copy.height += 1;
    assert!(!copy.validate());

    // The stored block is untouched.
    assert!(fixture.chain.get_by_hash(&block.hash).unwrap().validate());
    assert!(fixture.chain.validate_chain().is_ok());
}

#[test]
fn stored_payload_round_trips() {
    let fixture = TestFixture::new();
    let claimant = Claimant::with_seed([6; 32]);
    let star = br#"{"dec":"-26 29 24.9","ra":"16h 29m 1.0s","story":"Antares"}"#;

    let block = fixture.claim(&claimant, star).unwrap();
    match fixture.chain.get_by_height(block.height).unwrap().decode_payload().unwrap() {
        Payload::Ownership(record) => {
            assert_eq!(record.address, claimant.address());
            assert_eq!(&record.star[..], &star[..]);
            assert!(record.message.ends_with(":starRegistry"));
        }
        other => panic!("expected ownership payload, got {:?}", other),
    }
}

#[test]
fn violations_render_readably() {
    let fixture = TestFixture::new();
    let block = fixture.claim(&Claimant::with_seed([8; 32]), b"rigel").unwrap();

    let violation = ChainViolation::InvalidBlock {
        height: block.height,
        hash: block.hash,
    };
    assert_eq!(violation.to_string(), format!("Invalid block {}", block.hash.to_hex()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submissions_produce_a_linear_chain() {
    init_tracing();
    let fixture = Arc::new(TestFixture::new());
    let parties = multi_party_claimants(16);

    let mut handles = Vec::new();
    for claimant in parties {
        let fixture = Arc::clone(&fixture);
        handles.push(tokio::task::spawn_blocking(move || {
            fixture.claim(&claimant, b"star").map(|b| b.height)
        }));
    }

    let mut heights = Vec::new();
    for handle in handles {
        heights.push(handle.await.unwrap().unwrap());
    }
    heights.sort_unstable();

    assert_eq!(heights, (1..=16).collect::<Vec<u64>>());
    assert_eq!(fixture.chain.current_height(), 16);
    assert!(fixture.chain.validate_chain().is_ok());
}
