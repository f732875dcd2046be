//! # DRVC3 Schema
//!
//! The structural contract every DRVC3 receipt must satisfy, compiled once
//! into an immutable [`SchemaContract`] and shared by the issuer and the
//! verifier.
//!
//! The schema document itself (`schemas/drvc3.schema.json`) is an external
//! contract. This crate only compiles it and reports violations as an ordered
//! list of `(path, reason)` pairs.
//!
//! ```rust
//! use drvc3_schema::SchemaContract;
//! use serde_json::json;
//!
//! let contract = SchemaContract::drvc3().unwrap();
//! let violations = contract.validate(&json!({"receipt_id": 7})).unwrap_err();
//! assert!(!violations.is_empty());
//! ```

pub mod contract;
pub mod error;

pub use contract::{
    SchemaContract, DRVC3_SCHEMA, MAX_ARRAY_MEMBERS, MAX_DEPTH, MAX_OBJECT_PROPERTIES,
};
pub use error::{ContractError, SchemaViolations, Violation};
