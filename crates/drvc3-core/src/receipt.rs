//! Receipt: the signed document binding a content digest to its signer.
//!
//! A receipt is immutable once issued. It is created once, persisted as JSON,
//! and thereafter only read and re-checked.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::canonical::signing_message;
use crate::crypto::{
    Address, ContentDigest, Keypair, RecoverableSignature, HASH_ALGORITHM, SIGNATURE_METHOD,
};
use crate::error::Result;
use crate::types::{BlockState, ReceiptId};

/// The format-version tag every receipt carries.
pub const CERTIFICATE: &str = "DRVC3 v1.0";

/// Descriptor of the attested resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Filesystem path or URI of the resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_hash: Option<String>,
}

impl Resource {
    /// A local file resource.
    pub fn file(url: impl Into<String>) -> Self {
        Self {
            kind: Some("file".to_string()),
            url: Some(url.into()),
            branch: None,
            commit_hash: None,
        }
    }
}

/// The integrity block: digest, signature and claimed signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Integrity {
    /// Always [`HASH_ALGORITHM`].
    pub hash_algorithm: String,
    pub hash: ContentDigest,
    /// Always [`SIGNATURE_METHOD`].
    pub signature_method: String,
    pub signature: RecoverableSignature,
    pub signer_address: Address,
}

/// Optional quality block: a numeric score and named checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Validation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v_score: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checks: Option<Map<String, Value>>,
}

/// A complete receipt document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Receipt {
    pub receipt_id: ReceiptId,
    pub issuer: String,
    pub event: String,
    /// Issuance time, RFC 3339 UTC with millisecond precision.
    pub timestamp: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Resource>,

    pub integrity: Integrity,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<Validation>,

    pub block_state: BlockState,
    pub certificate: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replay_instructions: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Receipt {
    /// The attested content digest.
    pub fn digest(&self) -> &ContentDigest {
        &self.integrity.hash
    }

    /// The signer address the receipt claims.
    pub fn signer(&self) -> &Address {
        &self.integrity.signer_address
    }

    /// The bytes the signature covers (before personal-message wrapping).
    pub fn signing_message(&self) -> Vec<u8> {
        signing_message(&self.integrity.hash)
    }

    /// The validation score, if one is recorded.
    pub fn v_score(&self) -> Option<f64> {
        self.validation.as_ref().and_then(|v| v.v_score)
    }

    /// The resource URL, if one is recorded.
    pub fn resource_url(&self) -> Option<&str> {
        self.resource.as_ref().and_then(|r| r.url.as_deref())
    }

    /// Convert to a JSON value (the form the schema contract checks).
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// Decode from a JSON value.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    /// Pretty-printed JSON (the persisted form).
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Builder for assembling and signing receipts.
pub struct ReceiptBuilder {
    receipt_id: ReceiptId,
    timestamp: String,
    digest: ContentDigest,
    issuer: String,
    event: String,
    description: Option<String>,
    resource: Option<Resource>,
    validation: Option<Validation>,
    block_state: BlockState,
    certificate: String,
    replay_instructions: Option<Map<String, Value>>,
    tags: Option<Vec<String>>,
}

impl ReceiptBuilder {
    /// Start building a receipt for a digest issued at `timestamp`.
    pub fn new(receipt_id: ReceiptId, timestamp: impl Into<String>, digest: ContentDigest) -> Self {
        Self {
            receipt_id,
            timestamp: timestamp.into(),
            digest,
            issuer: String::new(),
            event: String::new(),
            description: None,
            resource: None,
            validation: None,
            block_state: BlockState::Loose,
            certificate: CERTIFICATE.to_string(),
            replay_instructions: None,
            tags: None,
        }
    }

    /// Set the issuer.
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Set the event name.
    pub fn event(mut self, event: impl Into<String>) -> Self {
        self.event = event.into();
        self
    }

    /// Set the optional description.
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Attach a resource descriptor.
    pub fn resource(mut self, resource: Resource) -> Self {
        self.resource = Some(resource);
        self
    }

    /// Attach a validation block.
    pub fn validation(mut self, validation: Validation) -> Self {
        self.validation = Some(validation);
        self
    }

    /// Set the block state.
    pub fn block_state(mut self, state: BlockState) -> Self {
        self.block_state = state;
        self
    }

    /// Override the certificate tag.
    pub fn certificate(mut self, certificate: impl Into<String>) -> Self {
        self.certificate = certificate.into();
        self
    }

    /// Attach free-form replay instructions.
    pub fn replay_instructions(mut self, instructions: Map<String, Value>) -> Self {
        self.replay_instructions = Some(instructions);
        self
    }

    /// Set the tags.
    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Sign the digest and assemble the receipt.
    pub fn sign(self, keypair: &Keypair) -> Result<Receipt> {
        let signature = keypair.sign_personal(&signing_message(&self.digest))?;

        Ok(Receipt {
            receipt_id: self.receipt_id,
            issuer: self.issuer,
            event: self.event,
            timestamp: self.timestamp,
            description: self.description,
            resource: self.resource,
            integrity: Integrity {
                hash_algorithm: HASH_ALGORITHM.to_string(),
                hash: self.digest,
                signature_method: SIGNATURE_METHOD.to_string(),
                signature,
                signer_address: keypair.address(),
            },
            validation: self.validation,
            block_state: self.block_state,
            certificate: self.certificate,
            replay_instructions: self.replay_instructions,
            tags: self.tags,
        })
    }
}
