//! The `drvc3 verify` subcommand.
//!
//! Verifies each receipt on its own blocking task. Output keeps the order
//! the receipts were given in.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use drvc3::{ReceiptError, VerificationReport, Verifier, VerifierConfig};
use serde_json::json;
use tokio::task::JoinSet;

use super::load_contract;

/// Arguments for `drvc3 verify`.
#[derive(Args)]
pub struct VerifyArgs {
    /// Receipt files to verify.
    #[arg(value_name = "RECEIPT", required_unless_present = "receipt")]
    pub receipts: Vec<PathBuf>,

    /// Receipt file to verify (repeatable). Checked after any positional paths.
    #[arg(long, value_name = "PATH")]
    pub receipt: Vec<PathBuf>,

    /// Output results as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the verify command.
pub async fn execute(args: VerifyArgs) -> Result<bool> {
    let contract = load_contract()?;
    let verifier = Arc::new(Verifier::new(contract, VerifierConfig::default()));

    let paths: Vec<PathBuf> = args.receipts.into_iter().chain(args.receipt).collect();

    let mut tasks = JoinSet::new();
    for (index, path) in paths.iter().cloned().enumerate() {
        let verifier = Arc::clone(&verifier);
        tasks.spawn_blocking(move || {
            let result = verifier.verify_file(&path);
            (index, path, result)
        });
    }

    let mut results: Vec<(usize, PathBuf, Result<VerificationReport, ReceiptError>)> =
        Vec::with_capacity(paths.len());
    while let Some(joined) = tasks.join_next().await {
        results.push(joined.context("verification task panicked")?);
    }
    results.sort_by_key(|(index, _, _)| *index);

    let passed = results.iter().all(|(_, _, result)| result.is_ok());

    if args.json {
        let entries: Vec<_> = results
            .iter()
            .map(|(_, path, result)| match result {
                Ok(report) => json!({
                    "path": path,
                    "passed": true,
                    "report": report,
                }),
                Err(e) => json!({
                    "path": path,
                    "passed": false,
                    "error": { "kind": e.kind(), "message": e.to_string() },
                }),
            })
            .collect();
        let output = json!({ "passed": passed, "receipts": entries });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for (_, path, result) in &results {
            match result {
                Ok(report) => {
                    println!("[PASS] {}", path.display());
                    for line in report.to_string().lines() {
                        println!("  {line}");
                    }
                }
                Err(e) => {
                    println!("[FAIL] {}", path.display());
                    println!("  {}: {e}", e.kind());
                    if let ReceiptError::Schema(violations) = e {
                        for violation in violations.iter() {
                            println!("    - {violation}");
                        }
                    }
                }
            }
        }

        println!();
        if passed {
            println!("Verification PASSED");
        } else {
            println!("Verification FAILED");
        }
    }

    Ok(passed)
}
