//! Golden test vectors for cross-implementation verification.
//!
//! Every implementation of DRVC3 must produce identical:
//! - content digests (`sha256:<hex>`)
//! - personal-message bytes for a digest
//! - signer addresses for a known key
//! - a receipt signature that any EIP-191 recoverer accepts

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use drvc3::core::{personal_message, recover_personal, signing_message};
use drvc3::{
    digest, ContentDigest, IssueRequest, Issuer, IssuerConfig, Keypair, SchemaContract,
    SigningKeySource,
};
use drvc3_testkit::vectors::{address_vectors, digest_vectors, HARDHAT_ADDRESS, HARDHAT_KEY};

#[test]
fn test_digest_vectors() {
    for vector in digest_vectors() {
        assert_eq!(
            digest(vector.content).to_string(),
            vector.digest,
            "digest vector '{}'",
            vector.name
        );
        assert_eq!(ContentDigest::parse(vector.digest).unwrap(), digest(vector.content));
    }
}

#[test]
fn test_address_vectors() {
    for vector in address_vectors() {
        let keypair = Keypair::from_hex(vector.secret).unwrap();
        assert_eq!(
            keypair.address().to_checksum(),
            vector.address,
            "address vector '{}'",
            vector.name
        );
    }
}

#[test]
fn test_personal_message_for_digest() {
    let message = signing_message(&digest(b"hi"));
    let wrapped = personal_message(&message);

    let mut expected = b"\x19Ethereum Signed Message:\n71".to_vec();
    expected.extend_from_slice(
        b"sha256:8f434346648f6b96df89dda901c5176b10a6d83961dd3c1ac88b59b2dc327aa4",
    );
    assert_eq!(wrapped, expected);
}

#[test]
fn test_issued_receipt_matches_vectors() {
    let issuer = Issuer::new(
        IssuerConfig::default(),
        Arc::new(SchemaContract::drvc3().unwrap()),
        SigningKeySource::provided(Keypair::from_hex(HARDHAT_KEY).unwrap()),
    );
    let issued_at = Utc.timestamp_millis_opt(1_736_870_400_000).unwrap();
    let receipt = issuer
        .build_at(b"hi", &IssueRequest::default(), issued_at)
        .unwrap();

    let value = receipt.to_value().unwrap();
    assert_eq!(value["receipt_id"], "drvc3_1736870400000");
    assert_eq!(value["timestamp"], "2025-01-14T16:00:00.000Z");
    assert_eq!(
        value["integrity"]["hash"],
        "sha256:8f434346648f6b96df89dda901c5176b10a6d83961dd3c1ac88b59b2dc327aa4"
    );
    assert_eq!(value["integrity"]["signer_address"], HARDHAT_ADDRESS);

    let signature = receipt.integrity.signature;
    assert!(matches!(signature.v(), 27 | 28));
    let recovered = recover_personal(&receipt.signing_message(), &signature).unwrap();
    assert_eq!(recovered.to_checksum(), HARDHAT_ADDRESS);

    // RFC 6979 nonces make issuance repeatable.
    let again = issuer
        .build_at(b"hi", &IssueRequest::default(), issued_at)
        .unwrap();
    assert_eq!(again.integrity.signature, signature);
}

#[test]
fn test_recovery_accepts_zero_one_v() {
    let keypair = Keypair::from_hex(HARDHAT_KEY).unwrap();
    let message = signing_message(&digest(b"hi"));
    let mut signature = keypair.sign_personal(&message).unwrap();
    signature.0[64] -= 27;

    assert_eq!(
        recover_personal(&message, &signature).unwrap(),
        keypair.address()
    );
}
