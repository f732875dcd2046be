//! The Issuer: turns resource bytes into a signed, schema-conformant receipt.
//!
//! Each step can fail on its own: digest, key resolution, signing, then the
//! schema gate over the fully assembled document. A receipt is only handed
//! back once it has passed the gate.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use drvc3_core::{BlockState, Receipt, ReceiptBuilder, ReceiptId, Resource};
use drvc3_schema::{SchemaContract, SchemaViolations};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::{IssuerConfig, SigningKeySource};
use crate::error::{ConfigError, ReceiptError, Result};
use crate::hasher::{digest, read_resource};
use crate::score::{Completeness, ScoreInput, ScorePolicy};

/// Default issuer recorded when a request names none.
pub const DEFAULT_ISSUER: &str = "github.com/your-org/your-repo";

/// Default event recorded when a request names none.
pub const DEFAULT_EVENT: &str = "content.publish";

/// Caller-supplied metadata for one receipt.
#[derive(Debug, Clone)]
pub struct IssueRequest {
    pub issuer: String,
    pub event: String,
    pub description: Option<String>,
    /// Mark the receipt canonical (`blocked`) rather than a draft (`loose`).
    pub block: bool,
    pub resource: Option<Resource>,
    pub replay_instructions: Option<Map<String, Value>>,
    /// Overrides the configured default tags.
    pub tags: Option<Vec<String>>,
}

impl Default for IssueRequest {
    fn default() -> Self {
        Self {
            issuer: DEFAULT_ISSUER.to_string(),
            event: DEFAULT_EVENT.to_string(),
            description: None,
            block: false,
            resource: None,
            replay_instructions: None,
            tags: None,
        }
    }
}

impl IssueRequest {
    pub fn new(issuer: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            event: event.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn block(mut self, block: bool) -> Self {
        self.block = block;
        self
    }

    pub fn resource(mut self, resource: Resource) -> Self {
        self.resource = Some(resource);
        self
    }

    pub fn replay_instructions(mut self, instructions: Map<String, Value>) -> Self {
        self.replay_instructions = Some(instructions);
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }
}

/// Issues receipts.
///
/// Holds no mutable state; one issuer can serve any number of requests.
pub struct Issuer {
    config: IssuerConfig,
    contract: Arc<SchemaContract>,
    key_source: SigningKeySource,
    policy: Box<dyn ScorePolicy>,
}

impl Issuer {
    /// Create an issuer with an explicit key source.
    pub fn new(
        config: IssuerConfig,
        contract: Arc<SchemaContract>,
        key_source: SigningKeySource,
    ) -> Self {
        Self {
            config,
            contract,
            key_source,
            policy: Box::new(Completeness::default()),
        }
    }

    /// Create an issuer that reads its key from the configured environment variable.
    pub fn from_env(config: IssuerConfig, contract: Arc<SchemaContract>) -> Self {
        let key_source = SigningKeySource::from_env(&config);
        Self::new(config, contract, key_source)
    }

    /// Replace the scoring policy.
    pub fn with_policy(mut self, policy: impl ScorePolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Issue a receipt for in-memory content, stamped with the current time.
    pub fn build(&self, content: &[u8], request: &IssueRequest) -> Result<Receipt> {
        self.build_at(content, request, Utc::now())
    }

    /// Issue a receipt for in-memory content at a given issuance time.
    pub fn build_at(
        &self,
        content: &[u8],
        request: &IssueRequest,
        issued_at: DateTime<Utc>,
    ) -> Result<Receipt> {
        let digest = digest(content);
        debug!(%digest, len = content.len(), "computed content digest");

        let keypair = self.key_source.resolve()?;

        let resource = request.resource.clone();
        let validation = self.policy.assess(&ScoreInput {
            issuer: &request.issuer,
            event: &request.event,
            description: request.description.as_deref(),
            resource: resource.as_ref(),
        });

        let tags = request.tags.clone().unwrap_or_else(|| self.config.tags.clone());

        let mut builder = ReceiptBuilder::new(
            ReceiptId::from_millis(issued_at.timestamp_millis()),
            issued_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            digest,
        )
        .issuer(request.issuer.clone())
        .event(request.event.clone())
        .description(request.description.clone())
        .validation(validation)
        .block_state(BlockState::from_flag(request.block))
        .certificate(self.config.certificate.clone())
        .tags(tags);

        if let Some(resource) = resource {
            builder = builder.resource(resource);
        }
        if let Some(instructions) = request.replay_instructions.clone() {
            builder = builder.replay_instructions(instructions);
        }

        let receipt = builder
            .sign(&keypair)
            .map_err(|source| ConfigError::InvalidKey {
                var: self.key_label(),
                source,
            })?;

        self.check_contract(&receipt)?;

        info!(
            receipt_id = %receipt.receipt_id,
            signer = %receipt.signer(),
            block_state = %receipt.block_state,
            "issued receipt"
        );
        Ok(receipt)
    }

    /// Issue a receipt for a file.
    ///
    /// The recorded resource points at the file's absolute path with the
    /// configured resource type, unless the request already names them.
    /// Any `branch` or `commit_hash` on the request is kept.
    pub fn build_file(&self, path: impl AsRef<Path>, request: &IssueRequest) -> Result<Receipt> {
        let path = path.as_ref();
        let content = read_resource(path)?;

        let mut resource = request.resource.clone().unwrap_or_default();
        if resource.url.is_none() {
            let absolute = fs::canonicalize(path).map_err(|e| ReceiptError::io(path, e))?;
            resource.url = Some(absolute.to_string_lossy().into_owned());
        }
        if resource.kind.is_none() {
            resource.kind = Some(self.config.resource_type.clone());
        }

        let request = request.clone().resource(resource);
        self.build(&content, &request)
    }

    fn check_contract(&self, receipt: &Receipt) -> Result<()> {
        let document = receipt
            .to_value()
            .map_err(|e| SchemaViolations::root(e.to_string()))?;
        self.contract.validate(&document).map_err(|violations| {
            debug!(count = violations.len(), "assembled receipt rejected by schema");
            ReceiptError::Schema(violations)
        })
    }

    fn key_label(&self) -> String {
        match &self.key_source {
            SigningKeySource::Env { var } => var.clone(),
            SigningKeySource::Provided(_) => "provided key".to_string(),
        }
    }
}
