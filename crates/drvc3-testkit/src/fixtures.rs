//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use drvc3_core::{
    Address, BlockState, ContentDigest, Keypair, Receipt, ReceiptBuilder, ReceiptId, Resource,
    Validation,
};
use serde_json::{Map, Value};
use tempfile::TempDir;

/// Fixed issuance time used by fixture receipts (2025-01-14T16:00:00.000Z).
pub const FIXTURE_MILLIS: i64 = 1_736_870_400_000;
pub const FIXTURE_TIMESTAMP: &str = "2025-01-14T16:00:00.000Z";

/// A test fixture with a signing key and a scratch directory.
pub struct TestFixture {
    pub keypair: Keypair,
    pub dir: TempDir,
}

impl TestFixture {
    /// Create a new test fixture with a random keypair.
    pub fn new() -> Self {
        Self::with_keypair(Keypair::generate())
    }

    /// Create with a deterministic keypair from a secret scalar.
    ///
    /// Panics on the few byte strings that are not valid secp256k1 scalars.
    pub fn with_secret(secret: [u8; 32]) -> Self {
        let keypair = Keypair::from_secret_bytes(&secret).expect("valid secp256k1 scalar");
        Self::with_keypair(keypair)
    }

    pub fn with_keypair(keypair: Keypair) -> Self {
        Self {
            keypair,
            dir: tempfile::tempdir().expect("create fixture directory"),
        }
    }

    /// The signer address.
    pub fn address(&self) -> Address {
        self.keypair.address()
    }

    /// A path inside the scratch directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a resource file into the scratch directory.
    pub fn write_resource(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, content).expect("write resource");
        path
    }

    /// A signed receipt for `content`, optionally pointing at `url`.
    pub fn receipt_for(&self, content: &[u8], url: Option<&str>) -> Receipt {
        let mut builder = ReceiptBuilder::new(
            ReceiptId::from_millis(FIXTURE_MILLIS),
            FIXTURE_TIMESTAMP,
            ContentDigest::of(content),
        )
        .issuer("github.com/acme/site")
        .event("content.publish")
        .validation(full_validation())
        .block_state(BlockState::Loose)
        .tags(vec!["#drvc3".to_string()]);

        if let Some(url) = url {
            builder = builder.resource(Resource::file(url));
        }

        builder.sign(&self.keypair).expect("sign fixture receipt")
    }

    /// A signed receipt for an existing file, recording its path.
    pub fn receipt_for_file(&self, path: &Path) -> Receipt {
        let content = fs::read(path).expect("read resource");
        self.receipt_for(&content, Some(&path.to_string_lossy()))
    }

    /// The JSON document form of [`receipt_for`](Self::receipt_for).
    pub fn document_for(&self, content: &[u8], url: Option<&str>) -> Value {
        self.receipt_for(content, url)
            .to_value()
            .expect("serialize fixture receipt")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A validation block with every check passing.
pub fn full_validation() -> Validation {
    let mut checks = Map::new();
    checks.insert("completeness".to_string(), Value::Bool(true));
    checks.insert("signed".to_string(), Value::Bool(true));
    Validation {
        v_score: Some(95.0),
        checks: Some(checks),
    }
}

/// `count` fixtures with distinct deterministic keys.
pub fn signers(count: u8) -> Vec<TestFixture> {
    (1..=count)
        .map(|i| {
            let mut secret = [0u8; 32];
            secret[31] = i;
            TestFixture::with_secret(secret)
        })
        .collect()
}
