//! Subcommand implementations.
//!
//! Each returns `Ok(true)` on success and `Ok(false)` when it has already
//! reported a failure to the user.

pub mod create;
pub mod verify;

use std::sync::Arc;

use anyhow::{Context, Result};
use drvc3::SchemaContract;

/// Compile the bundled schema once for the whole invocation.
pub fn load_contract() -> Result<Arc<SchemaContract>> {
    let contract = SchemaContract::drvc3().context("failed to compile the bundled DRVC3 schema")?;
    Ok(Arc::new(contract))
}
