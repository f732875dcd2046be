//! Canonical message construction for receipt signatures.
//!
//! The message actually signed is the digest string wrapped in the EIP-191
//! "personal message" encoding:
//!
//! ```text
//! 0x19 || "Ethereum Signed Message:\n" || decimal(len(message)) || message
//! ```
//!
//! and hashed with Keccak-256. The prefix keeps a receipt signature from
//! being valid as any other kind of secp256k1-signed payload, such as a
//! transaction.
//!
//! **CRITICAL**: This encoding is FROZEN. Changes break all existing signatures.

use crate::crypto::{keccak256, ContentDigest};

/// Domain separation prefix for personal messages (version byte 0x45, "E").
pub const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n";

/// Wrap `message` in the length-prefixed personal-message encoding.
pub fn personal_message(message: &[u8]) -> Vec<u8> {
    let len = message.len().to_string();
    let mut msg = Vec::with_capacity(PERSONAL_MESSAGE_PREFIX.len() + len.len() + message.len());
    msg.extend_from_slice(PERSONAL_MESSAGE_PREFIX);
    msg.extend_from_slice(len.as_bytes());
    msg.extend_from_slice(message);
    msg
}

/// Keccak-256 of the personal-message encoding: the prehash that is signed.
pub fn personal_message_hash(message: &[u8]) -> [u8; 32] {
    keccak256(&personal_message(message))
}

/// The bytes handed to the signer for a receipt: the UTF-8 digest string.
///
/// Both issuance and verification go through this function, so the digest is
/// always signed in its `sha256:<hex>` rendering, never as raw bytes.
pub fn signing_message(digest: &ContentDigest) -> Vec<u8> {
    digest.to_string().into_bytes()
}
