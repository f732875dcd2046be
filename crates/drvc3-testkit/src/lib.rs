//! # DRVC3 Testkit
//!
//! Testing utilities for DRVC3 receipts.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known keys, addresses and digests that every
//!   implementation must reproduce
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: A signer plus a scratch directory of resources
//!
//! ## Golden Vectors
//!
//! ```rust
//! use drvc3_testkit::vectors::verify_all_vectors;
//!
//! for (name, ok, detail) in verify_all_vectors() {
//!     assert!(ok, "{name}: {detail}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use drvc3_testkit::generators::{ReceiptParams, receipt_from_params};
//!
//! proptest! {
//!     #[test]
//!     fn signer_recovers(params: ReceiptParams) {
//!         let receipt = receipt_from_params(&params);
//!         prop_assert!(drvc3_core::validate_signer(&receipt).is_ok());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use drvc3_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let path = fixture.write_resource("index.html", b"<h1>hi</h1>");
//! let receipt = fixture.receipt_for_file(&path);
//! assert_eq!(receipt.signer(), &fixture.address());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{signers, TestFixture};
pub use generators::{receipt_from_params, ReceiptParams};
pub use vectors::{
    address_vectors, digest_vectors, verify_all_vectors, AddressVector, DigestVector,
    HARDHAT_ADDRESS, HARDHAT_KEY,
};
