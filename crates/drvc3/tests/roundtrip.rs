//! End-to-end issue/persist/verify behaviour.

use std::fs;
use std::sync::Arc;

use drvc3::store::{load, persist};
use drvc3::{
    IntegrityOutcome, IssueRequest, Issuer, IssuerConfig, ReceiptError, SchemaContract,
    SigningKeySource, SkipReason, ValidationError, Verifier, VerifierConfig,
};
use drvc3_testkit::generators::{content, keypair};
use drvc3_testkit::TestFixture;
use proptest::prelude::*;
use serde_json::{json, Value};

fn contract() -> Arc<SchemaContract> {
    Arc::new(SchemaContract::drvc3().unwrap())
}

fn issuer_for(fixture: &TestFixture) -> Issuer {
    Issuer::new(
        IssuerConfig::default(),
        contract(),
        SigningKeySource::provided(fixture.keypair.clone()),
    )
}

fn verifier() -> Verifier {
    Verifier::new(contract(), VerifierConfig::default())
}

#[test]
fn test_issue_persist_verify() {
    let fixture = TestFixture::new();
    let resource = fixture.write_resource("index.html", b"<h1>hello</h1>");
    let out = fixture.path("receipt.index.html.json");

    let request = IssueRequest::default().description("landing page");
    let receipt = issuer_for(&fixture).build_file(&resource, &request).unwrap();
    persist(&receipt, &out).unwrap();

    let report = verifier().verify_file(&out).unwrap();
    assert_eq!(report.receipt_id, receipt.receipt_id);
    assert_eq!(report.signer_address, fixture.address());
    assert_eq!(report.v_score, Some(95.0));
    assert!(report.integrity.is_checked());
}

#[test]
fn test_content_tamper_is_integrity_error() {
    let fixture = TestFixture::new();
    let resource = fixture.write_resource("notes.md", b"original");
    let receipt = issuer_for(&fixture)
        .build_file(&resource, &IssueRequest::default())
        .unwrap();

    fs::write(&resource, b"modified").unwrap();

    let err = verifier().verify(&receipt.to_value().unwrap()).unwrap_err();
    match err {
        ReceiptError::Integrity { expected, actual } => {
            assert_eq!(expected, drvc3::digest(b"original"));
            assert_eq!(actual, drvc3::digest(b"modified"));
        }
        other => panic!("expected integrity error, got {other:?}"),
    }
}

#[test]
fn test_deleted_resource_is_io_error() {
    let fixture = TestFixture::new();
    let resource = fixture.write_resource("gone.txt", b"bytes");
    let document = fixture.document_for(b"bytes", Some(&resource.to_string_lossy()));
    fs::remove_file(&resource).unwrap();

    assert!(matches!(
        verifier().verify(&document),
        Err(ReceiptError::Io { path, .. }) if path == resource
    ));
}

#[test]
fn test_signature_bit_flip_is_authenticity_error() {
    let fixture = TestFixture::new();
    let mut document = fixture.document_for(b"hello", None);

    let signature = document["integrity"]["signature"].as_str().unwrap().to_string();
    // Flip the low bit of the last hex digit of `s`.
    let mut chars: Vec<char> = signature.chars().collect();
    let idx = 2 + 128 - 1;
    chars[idx] = if chars[idx] == '0' { '1' } else { '0' };
    document["integrity"]["signature"] = Value::String(chars.into_iter().collect());

    let err = verifier().verify(&document).unwrap_err();
    assert!(matches!(err, ReceiptError::Authenticity(_)));
}

#[test]
fn test_claimed_signer_mismatch_names_both() {
    let fixture = TestFixture::new();
    let other = TestFixture::new();
    let mut document = fixture.document_for(b"hello", None);
    document["integrity"]["signer_address"] = json!(other.address().to_checksum());

    match verifier().verify(&document).unwrap_err() {
        ReceiptError::Authenticity(ValidationError::SignerMismatch { recovered, expected }) => {
            assert_eq!(recovered, fixture.address());
            assert_eq!(expected, other.address());
        }
        other => panic!("expected signer mismatch, got {other:?}"),
    }
}

#[test]
fn test_schema_checked_before_integrity_and_authenticity() {
    let fixture = TestFixture::new();
    let resource = fixture.write_resource("a.txt", b"a");
    let mut document = fixture.document_for(b"a", Some(&resource.to_string_lossy()));

    // Content tampered and signature broken, but the missing hash must win.
    fs::write(&resource, b"b").unwrap();
    document["integrity"]["signature"] = json!(format!("0x{}", "00".repeat(65)));
    document["integrity"].as_object_mut().unwrap().remove("hash");

    match verifier().verify(&document).unwrap_err() {
        ReceiptError::Schema(violations) => assert!(violations.touches("$/integrity")),
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn test_integrity_checked_before_authenticity() {
    let fixture = TestFixture::new();
    let resource = fixture.write_resource("a.txt", b"a");
    let mut document = fixture.document_for(b"a", Some(&resource.to_string_lossy()));

    fs::write(&resource, b"b").unwrap();
    document["integrity"]["signer_address"] = json!(TestFixture::new().address().to_checksum());

    assert!(matches!(
        verifier().verify(&document),
        Err(ReceiptError::Integrity { .. })
    ));
}

#[test]
fn test_signer_address_case_insensitive() {
    let fixture = TestFixture::new();
    let checksummed = fixture.address().to_checksum();

    for rendered in [checksummed.to_lowercase(), format!("0x{}", checksummed[2..].to_uppercase())] {
        let mut document = fixture.document_for(b"hello", None);
        document["integrity"]["signer_address"] = json!(rendered);
        let report = verifier().verify(&document).unwrap();
        assert_eq!(report.signer_address, fixture.address());
    }
}

#[test]
fn test_remote_resource_skips_integrity() {
    let fixture = TestFixture::new();
    let document = fixture.document_for(b"hello", Some("https://example.com/index.html"));

    let report = verifier().verify(&document).unwrap();
    assert_eq!(
        report.integrity,
        IntegrityOutcome::Skipped(SkipReason::NotLocal {
            url: "https://example.com/index.html".to_string()
        })
    );
}

#[test]
fn test_relative_resource_skips_integrity() {
    let fixture = TestFixture::new();
    let document = fixture.document_for(b"hello", Some("site/index.html"));

    let report = verifier().verify(&document).unwrap();
    assert!(matches!(
        report.integrity,
        IntegrityOutcome::Skipped(SkipReason::NotLocal { .. })
    ));
}

#[test]
fn test_file_uri_is_checked() {
    let fixture = TestFixture::new();
    let resource = fixture.write_resource("a.txt", b"a");
    let url = format!("file://{}", resource.to_string_lossy());
    let document = fixture.document_for(b"a", Some(&url));

    let report = verifier().verify(&document).unwrap();
    assert_eq!(report.integrity, IntegrityOutcome::Matched { path: resource });
}

#[test]
fn test_disabled_local_checks_record_skip() {
    let fixture = TestFixture::new();
    let resource = fixture.write_resource("a.txt", b"a");
    let document = fixture.document_for(b"a", Some(&resource.to_string_lossy()));
    fs::write(&resource, b"changed").unwrap();

    let verifier = Verifier::new(
        contract(),
        VerifierConfig {
            check_local_resources: false,
        },
    );
    let report = verifier.verify(&document).unwrap();
    assert_eq!(report.integrity, IntegrityOutcome::Skipped(SkipReason::Disabled));
}

#[test]
fn test_absent_score_reports_none() {
    let fixture = TestFixture::new();
    let mut document = fixture.document_for(b"hello", None);
    document.as_object_mut().unwrap().remove("validation");

    let report = verifier().verify(&document).unwrap();
    assert_eq!(report.v_score, None);
    assert!(report.to_string().contains("n/a"));
}

#[test]
fn test_not_json_is_schema_error() {
    match verifier().verify_str("receipt? what receipt").unwrap_err() {
        ReceiptError::Schema(violations) => {
            assert_eq!(violations.len(), 1);
            assert_eq!(violations.violations()[0].path, "$");
        }
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn test_persisted_form_is_stable() {
    let fixture = TestFixture::new();
    let receipt = fixture.receipt_for(b"hello", Some("https://example.com"));
    let out = fixture.path("r.json");

    persist(&receipt, &out).unwrap();
    let first = fs::read_to_string(&out).unwrap();
    persist(&drvc3::Receipt::from_value(load(&out).unwrap()).unwrap(), &out).unwrap();
    assert_eq!(fs::read_to_string(&out).unwrap(), first);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_roundtrip_any_content_any_key(kp in keypair(), bytes in content(2048)) {
        let issuer = Issuer::new(
            IssuerConfig::default(),
            contract(),
            SigningKeySource::provided(kp.clone()),
        );
        let receipt = issuer.build(&bytes, &IssueRequest::default()).unwrap();
        let report = verifier().verify(&receipt.to_value().unwrap()).unwrap();
        prop_assert_eq!(report.signer_address, kp.address());
        prop_assert_eq!(report.integrity, IntegrityOutcome::Skipped(SkipReason::NoResource));
    }
}
