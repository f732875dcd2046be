//! The Verifier: re-checks a persisted receipt.
//!
//! Three checks run in a fixed order and the first failure wins:
//!
//! 1. **Structural**: the raw document satisfies the schema contract.
//! 2. **Integrity**: a local resource still digests to `integrity.hash`.
//! 3. **Authenticity**: the signature recovers to `integrity.signer_address`.
//!
//! Only local resources (absolute paths and `file://` URIs) are re-digested.
//! Anything else is skipped and the skip is recorded in the report; nothing
//! is ever fetched over the network.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use drvc3_core::{validate_signer, Address, BlockState, Receipt, ReceiptId};
use drvc3_schema::{SchemaContract, SchemaViolations};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::VerifierConfig;
use crate::error::{ReceiptError, Result};
use crate::hasher::digest_file;
use crate::store;

/// Why the integrity check did not run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The receipt records no resource URL.
    NoResource,
    /// The resource is not on the local filesystem.
    NotLocal { url: String },
    /// Local checks were turned off in [`VerifierConfig`].
    Disabled,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoResource => f.write_str("no resource recorded"),
            SkipReason::NotLocal { url } => write!(f, "not a local resource: {url}"),
            SkipReason::Disabled => f.write_str("local resource checks disabled"),
        }
    }
}

/// What the integrity step did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IntegrityOutcome {
    /// The resource was re-digested and matched.
    Matched { path: PathBuf },
    /// The resource was not checked.
    Skipped(SkipReason),
}

impl IntegrityOutcome {
    pub fn is_checked(&self) -> bool {
        matches!(self, IntegrityOutcome::Matched { .. })
    }
}

impl fmt::Display for IntegrityOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityOutcome::Matched { path } => write!(f, "matched {}", path.display()),
            IntegrityOutcome::Skipped(reason) => write!(f, "skipped ({reason})"),
        }
    }
}

/// Summary of a successful verification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationReport {
    pub receipt_id: ReceiptId,
    pub signer_address: Address,
    pub block_state: BlockState,
    /// `None` when the receipt carries no score.
    pub v_score: Option<f64>,
    pub integrity: IntegrityOutcome,
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "receipt_id: {}", self.receipt_id)?;
        writeln!(f, "signer:     {}", self.signer_address)?;
        writeln!(f, "block:      {}", self.block_state)?;
        match self.v_score {
            Some(score) => writeln!(f, "v_score:    {score}")?,
            None => writeln!(f, "v_score:    n/a")?,
        }
        write!(f, "integrity:  {}", self.integrity)
    }
}

/// Verifies receipts against a shared schema contract.
pub struct Verifier {
    contract: Arc<SchemaContract>,
    config: VerifierConfig,
}

impl Verifier {
    pub fn new(contract: Arc<SchemaContract>, config: VerifierConfig) -> Self {
        Self { contract, config }
    }

    /// Verify a receipt document.
    pub fn verify(&self, document: &Value) -> Result<VerificationReport> {
        // Structural
        self.contract.validate(document).map_err(|violations| {
            warn!(count = violations.len(), "receipt failed schema validation");
            ReceiptError::Schema(violations)
        })?;

        let receipt = Receipt::from_value(document.clone())
            .map_err(|e| SchemaViolations::root(e.to_string()))?;
        debug!(receipt_id = %receipt.receipt_id, "receipt is structurally valid");

        // Integrity
        let integrity = self.check_integrity(&receipt)?;

        // Authenticity
        let signer_address = validate_signer(&receipt).map_err(|e| {
            warn!(receipt_id = %receipt.receipt_id, error = %e, "receipt failed authenticity");
            ReceiptError::Authenticity(e)
        })?;

        info!(
            receipt_id = %receipt.receipt_id,
            signer = %signer_address,
            integrity = %integrity,
            "verified receipt"
        );

        Ok(VerificationReport {
            v_score: receipt.v_score(),
            receipt_id: receipt.receipt_id,
            signer_address,
            block_state: receipt.block_state,
            integrity,
        })
    }

    /// Verify a receipt given as JSON text.
    ///
    /// Text that is not JSON at all fails the structural check.
    pub fn verify_str(&self, text: &str) -> Result<VerificationReport> {
        let document = store::parse_document(text)?;
        self.verify(&document)
    }

    /// Read and verify a persisted receipt.
    pub fn verify_file(&self, path: impl AsRef<Path>) -> Result<VerificationReport> {
        let document = store::load(path)?;
        self.verify(&document)
    }

    fn check_integrity(&self, receipt: &Receipt) -> Result<IntegrityOutcome> {
        let Some(url) = receipt.resource_url() else {
            debug!(receipt_id = %receipt.receipt_id, "no resource recorded, integrity skipped");
            return Ok(IntegrityOutcome::Skipped(SkipReason::NoResource));
        };

        let Some(path) = local_resource_path(url) else {
            warn!(
                receipt_id = %receipt.receipt_id,
                url,
                "resource is not local, integrity skipped"
            );
            return Ok(IntegrityOutcome::Skipped(SkipReason::NotLocal {
                url: url.to_string(),
            }));
        };

        if !self.config.check_local_resources {
            warn!(
                receipt_id = %receipt.receipt_id,
                "local resource checks disabled, integrity skipped"
            );
            return Ok(IntegrityOutcome::Skipped(SkipReason::Disabled));
        }

        let actual = digest_file(&path)?;
        let expected = *receipt.digest();
        if actual != expected {
            warn!(receipt_id = %receipt.receipt_id, %expected, %actual, "resource digest mismatch");
            return Err(ReceiptError::Integrity { expected, actual });
        }

        Ok(IntegrityOutcome::Matched { path })
    }
}

/// Map a resource reference onto a local path, if it names one.
///
/// Accepts absolute filesystem paths and `file://` URIs with an empty or
/// `localhost` authority. Relative paths are not local: they would resolve
/// against whatever directory the verifier happens to run in.
pub fn local_resource_path(url: &str) -> Option<PathBuf> {
    let candidate = match url.strip_prefix("file://") {
        Some(rest) => rest.strip_prefix("localhost").unwrap_or(rest),
        None => url,
    };
    let path = Path::new(candidate);
    path.is_absolute().then(|| path.to_path_buf())
}
