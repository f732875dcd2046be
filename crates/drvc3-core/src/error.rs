//! Error types for DRVC3 Core.

use thiserror::Error;

use crate::crypto::Address;

/// Core errors that can occur while handling digests, keys and signatures.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("malformed digest: {0}")]
    MalformedDigest(String),

    #[error("invalid signing key: {0}")]
    InvalidKey(String),

    #[error("malformed address: {0}")]
    MalformedAddress(String),

    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    #[error("invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    #[error("public key recovery failed")]
    RecoveryFailed,

    #[error("signing failed")]
    SigningFailed,
}

/// Authenticity failures when checking a receipt's signature against its signer.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("bad signature: recovered {recovered}, expected {expected}")]
    SignerMismatch { recovered: Address, expected: Address },

    #[error("bad signature: cannot recover a signer for {expected}: {reason}")]
    Unrecoverable { expected: Address, reason: String },
}

impl ValidationError {
    /// The signer address the receipt claims.
    pub fn expected(&self) -> &Address {
        match self {
            ValidationError::SignerMismatch { expected, .. }
            | ValidationError::Unrecoverable { expected, .. } => expected,
        }
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
