//! Error types for issuing and verifying receipts.

use std::io;
use std::path::PathBuf;

use drvc3_core::{ContentDigest, CoreError, ValidationError};
use drvc3_schema::SchemaViolations;
use thiserror::Error;

/// Errors that can occur while issuing or verifying a receipt.
///
/// Every variant is terminal. Nothing here is worth retrying.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// A resource or receipt file could not be read or written.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Signing configuration is missing or unusable.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The document does not satisfy the schema contract.
    #[error("{0}")]
    Schema(#[from] SchemaViolations),

    /// The stored digest does not match the resource's current content.
    #[error("integrity mismatch: receipt records {expected}, resource digests to {actual}")]
    Integrity {
        expected: ContentDigest,
        actual: ContentDigest,
    },

    /// The signature does not come from the claimed signer.
    #[error("authenticity error: {0}")]
    Authenticity(#[from] ValidationError),
}

impl ReceiptError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ReceiptError::Io {
            path: path.into(),
            source,
        }
    }

    /// Short machine-readable name of the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            ReceiptError::Io { .. } => "io",
            ReceiptError::Config(_) => "config",
            ReceiptError::Schema(_) => "schema",
            ReceiptError::Integrity { .. } => "integrity",
            ReceiptError::Authenticity(_) => "authenticity",
        }
    }
}

/// Signing-key configuration failures.
///
/// These name the environment variable involved but never its value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no signing key: environment variable {var} is not set")]
    MissingKey { var: String },

    #[error("signing key in {var} is unusable: {source}")]
    InvalidKey {
        var: String,
        #[source]
        source: CoreError,
    },
}

/// Result type for receipt operations.
pub type Result<T> = std::result::Result<T, ReceiptError>;
