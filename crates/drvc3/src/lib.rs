//! # DRVC3
//!
//! Issue and verify DRVC3 content-provenance receipts.
//!
//! ## Overview
//!
//! A receipt binds the SHA-256 digest of a resource to an EIP-191 signature
//! and descriptive metadata, so that a third party can later confirm both
//! "this exact content existed" and "this identified signer attested to it."
//!
//! - **Issuer**: digest, sign, assemble, then gate the document on the schema
//!   contract. Nothing invalid is ever returned.
//! - **Verifier**: re-run the structural, integrity and authenticity checks in
//!   that order, stopping at the first failure.
//! - **Store**: atomic persistence of the JSON form.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use drvc3::{IssueRequest, Issuer, IssuerConfig, Verifier, VerifierConfig};
//! use drvc3::schema::SchemaContract;
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let contract = Arc::new(SchemaContract::drvc3()?);
//!
//!     let issuer = Issuer::from_env(IssuerConfig::default(), contract.clone());
//!     let receipt = issuer.build_file("site/index.html", &IssueRequest::default())?;
//!     drvc3::store::persist(&receipt, "receipt.index.html.json")?;
//!
//!     let verifier = Verifier::new(contract, VerifierConfig::default());
//!     let report = verifier.verify_file("receipt.index.html.json")?;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `drvc3::core` - digests, signatures and the receipt model
//! - `drvc3::schema` - the compiled schema contract

pub mod builder;
pub mod config;
pub mod error;
pub mod hasher;
pub mod score;
pub mod store;
pub mod verifier;

// Re-export component crates
pub use drvc3_core as core;
pub use drvc3_schema as schema;

pub use builder::{IssueRequest, Issuer, DEFAULT_EVENT, DEFAULT_ISSUER};
pub use config::{IssuerConfig, SigningKeySource, VerifierConfig, DEFAULT_KEY_ENV_VAR, DEFAULT_TAGS};
pub use error::{ConfigError, ReceiptError, Result};
pub use hasher::{digest, digest_file};
pub use score::{Completeness, FixedScore, ScoreInput, ScorePolicy};
pub use verifier::{local_resource_path, IntegrityOutcome, SkipReason, VerificationReport, Verifier};

// Re-export commonly used core types
pub use drvc3_core::{
    Address, BlockState, ContentDigest, Keypair, Receipt, ReceiptId, RecoverableSignature,
    Resource, Validation, ValidationError,
};
pub use drvc3_schema::{SchemaContract, SchemaViolations, Violation};
