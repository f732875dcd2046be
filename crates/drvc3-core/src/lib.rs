//! # DRVC3 Core
//!
//! Pure primitives for DRVC3 content-provenance receipts: digests, signatures,
//! and the receipt document model.
//!
//! This crate contains no I/O, no clock, no schema engine. It is pure
//! computation over the cryptographic parts of a receipt.
//!
//! ## Key Types
//!
//! - [`ContentDigest`] - SHA-256 digest of a resource, rendered `sha256:<hex>`
//! - [`Keypair`] - secp256k1 signing key (never serialized)
//! - [`Address`] - 20-byte signer identity derived from a public key
//! - [`RecoverableSignature`] - 65-byte `r || s || v` signature
//! - [`Receipt`] - The signed document binding a digest to its signer
//!
//! ## Signing
//!
//! The digest string is never signed raw. It is wrapped in the EIP-191
//! personal-message encoding first. See [`canonical`] module.

pub mod canonical;
pub mod crypto;
pub mod error;
pub mod receipt;
pub mod types;
pub mod validation;

pub use canonical::{
    personal_message, personal_message_hash, signing_message, PERSONAL_MESSAGE_PREFIX,
};
pub use crypto::{
    keccak256, recover_personal, Address, ContentDigest, Keypair, RecoverableSignature,
    HASH_ALGORITHM, SIGNATURE_METHOD,
};
pub use error::{CoreError, ValidationError};
pub use receipt::{Integrity, Receipt, ReceiptBuilder, Resource, Validation, CERTIFICATE};
pub use types::{BlockState, ReceiptId};
pub use validation::{recover_signer, validate_signer};
