//! The `drvc3 create` subcommand.
//!
//! Digests a file, signs it and writes the receipt next to the caller.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use drvc3::store::{default_output_path, persist};
use drvc3::{IssueRequest, Issuer, IssuerConfig, Resource, DEFAULT_EVENT, DEFAULT_ISSUER};
use tracing::info;

use super::load_contract;

/// Arguments for `drvc3 create`.
#[derive(Args)]
pub struct CreateArgs {
    /// File to issue a receipt for.
    #[arg(long, value_name = "PATH")]
    pub file: PathBuf,

    /// Issuer identifier recorded in the receipt.
    #[arg(long, default_value = DEFAULT_ISSUER)]
    pub issuer: String,

    /// Event name recorded in the receipt.
    #[arg(long, default_value = DEFAULT_EVENT)]
    pub event: String,

    /// Free-text description.
    #[arg(long)]
    pub description: Option<String>,

    /// Mark the receipt canonical (`blocked`) instead of a draft (`loose`).
    #[arg(long)]
    pub block: bool,

    /// Output path [default: receipt.<file-name>.json].
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Source branch the file came from.
    #[arg(long)]
    pub branch: Option<String>,

    /// Commit the file came from.
    #[arg(long)]
    pub commit_hash: Option<String>,

    /// Tag to attach (repeatable). Replaces the default tags.
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,
}

/// Execute the create command.
pub fn execute(args: CreateArgs) -> Result<bool> {
    let contract = load_contract()?;
    let issuer = Issuer::from_env(IssuerConfig::default(), contract);

    let mut request = IssueRequest::new(args.issuer, args.event).block(args.block);
    if let Some(description) = args.description {
        request = request.description(description);
    }
    if args.branch.is_some() || args.commit_hash.is_some() {
        request = request.resource(Resource {
            branch: args.branch,
            commit_hash: args.commit_hash,
            ..Resource::default()
        });
    }
    if !args.tags.is_empty() {
        request = request.tags(args.tags);
    }

    let receipt = issuer
        .build_file(&args.file, &request)
        .with_context(|| format!("failed to issue a receipt for {}", args.file.display()))?;

    let out = args.out.unwrap_or_else(|| default_output_path(&args.file));
    persist(&receipt, &out).with_context(|| format!("failed to write {}", out.display()))?;

    info!(receipt_id = %receipt.receipt_id, out = %out.display(), "receipt written");
    println!("Receipt written to {}", out.display());
    println!("  receipt_id: {}", receipt.receipt_id);
    println!("  hash:       {}", receipt.digest());
    println!("  signer:     {}", receipt.signer());
    println!("  block:      {}", receipt.block_state);

    Ok(true)
}
