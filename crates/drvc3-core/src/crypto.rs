//! Cryptographic primitives: SHA-256 content digests and EIP-191 secp256k1 signatures.
//!
//! Wraps sha2, sha3 (Keccak-256) and k256 with strong types.

use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use sha3::Keccak256;
use std::fmt;
use std::str::FromStr;

use crate::canonical::personal_message_hash;
use crate::error::{CoreError, Result};

/// The only supported content hash algorithm tag.
pub const HASH_ALGORITHM: &str = "sha256";

/// The only supported signature scheme tag.
pub const SIGNATURE_METHOD: &str = "eip191";

/// Compute Keccak-256 (the pre-standard SHA-3 variant used for addresses).
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// A SHA-256 digest of resource content, rendered as `sha256:<hex>`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest(pub [u8; 32]);

impl ContentDigest {
    /// Compute the SHA-256 digest of the given bytes.
    pub fn of(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex digest without the algorithm tag.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a `sha256:<hex>` digest string.
    pub fn parse(s: &str) -> Result<Self> {
        let (algorithm, digest) = s
            .split_once(':')
            .ok_or_else(|| CoreError::MalformedDigest(format!("missing algorithm tag in {s:?}")))?;
        if algorithm != HASH_ALGORITHM {
            return Err(CoreError::UnsupportedAlgorithm(algorithm.to_string()));
        }
        if digest.len() != 64 || !digest.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(CoreError::MalformedDigest(format!(
                "expected 64 lowercase hex characters, got {digest:?}"
            )));
        }
        let bytes = hex::decode(digest).map_err(|e| CoreError::MalformedDigest(e.to_string()))?;
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", HASH_ALGORITHM, self.to_hex())
    }
}

impl fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sha256({}...)", &self.to_hex()[..8])
    }
}

impl FromStr for ContentDigest {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for ContentDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ContentDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// A 20-byte signer address: the tail of Keccak-256 over the uncompressed public key.
///
/// Equality is on the raw bytes, so two renderings that differ only in letter
/// casing compare equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// Derive the address of a secp256k1 public key.
    pub fn from_verifying_key(key: &VerifyingKey) -> Self {
        let point = key.as_affine().to_encoded_point(false);
        // Skip the 0x04 SEC1 tag.
        let hash = keccak256(&point.as_bytes()[1..]);
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&hash[12..]);
        Self(arr)
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Lowercase `0x`-prefixed hex.
    pub fn to_lower_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// EIP-55 mixed-case checksum rendering.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = keccak256(lower.as_bytes());
        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }

    /// Parse a `0x`-prefixed 40-character hex address in any letter casing.
    pub fn parse(s: &str) -> Result<Self> {
        let digits = strip_hex_prefix(s);
        if digits.len() != 40 {
            return Err(CoreError::MalformedAddress(format!(
                "expected 40 hex characters, got {}",
                digits.len()
            )));
        }
        let bytes = hex::decode(digits).map_err(|e| CoreError::MalformedAddress(e.to_string()))?;
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl FromStr for Address {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// A 65-byte `r || s || v` secp256k1 signature.
///
/// Decoding only checks the length. Whether `r`, `s` and `v` are usable is
/// decided at recovery time, so a corrupted signature still loads and then
/// fails authenticity rather than parsing.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RecoverableSignature(pub [u8; 65]);

impl RecoverableSignature {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 65]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    /// The trailing recovery byte.
    pub const fn v(&self) -> u8 {
        self.0[64]
    }

    /// `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse `0x`-prefixed (or bare) hex.
    pub fn parse(s: &str) -> Result<Self> {
        let bytes = hex::decode(strip_hex_prefix(s))
            .map_err(|e| CoreError::MalformedSignature(e.to_string()))?;
        let arr: [u8; 65] = bytes.try_into().map_err(|b: Vec<u8>| {
            CoreError::MalformedSignature(format!("expected 65 bytes, got {}", b.len()))
        })?;
        Ok(Self(arr))
    }

    fn recovery_id(&self) -> Result<RecoveryId> {
        let v = self.v();
        let normalized = match v {
            0 | 1 => v,
            27 | 28 => v - 27,
            other => return Err(CoreError::InvalidRecoveryId(other)),
        };
        RecoveryId::from_byte(normalized).ok_or(CoreError::InvalidRecoveryId(v))
    }
}

impl fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sig({}...)", &hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for RecoverableSignature {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for RecoverableSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for RecoverableSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// A secp256k1 keypair for signing receipts.
///
/// Key material is supplied per invocation and never serialized. `Debug`
/// shows only the derived address.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let signing_key = SigningKey::random(&mut rng);
        Self { signing_key }
    }

    /// Create from a 32-byte secret scalar.
    pub fn from_secret_bytes(secret: &[u8; 32]) -> Result<Self> {
        let signing_key =
            SigningKey::from_slice(secret).map_err(|e| CoreError::InvalidKey(e.to_string()))?;
        Ok(Self { signing_key })
    }

    /// Parse a `0x`-prefixed or bare 64-character hex secret.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(strip_hex_prefix(s.trim()))
            .map_err(|e| CoreError::InvalidKey(e.to_string()))?;
        let secret: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| {
            CoreError::InvalidKey(format!("expected 32 bytes, got {}", b.len()))
        })?;
        Self::from_secret_bytes(&secret)
    }

    /// The signer address for this key.
    pub fn address(&self) -> Address {
        Address::from_verifying_key(self.signing_key.verifying_key())
    }

    /// Sign `message` using the EIP-191 personal-message encoding.
    pub fn sign_personal(&self, message: &[u8]) -> Result<RecoverableSignature> {
        let prehash = personal_message_hash(message);
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(&prehash)
            .map_err(|_| CoreError::SigningFailed)?;

        let mut bytes = [0u8; 65];
        bytes[..64].copy_from_slice(&signature.to_bytes());
        bytes[64] = 27 + recovery_id.to_byte();
        Ok(RecoverableSignature(bytes))
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({:?})", self.address())
    }
}

/// Recover the signer address of an EIP-191 personal-message signature.
pub fn recover_personal(message: &[u8], signature: &RecoverableSignature) -> Result<Address> {
    let prehash = personal_message_hash(message);
    let recovery_id = signature.recovery_id()?;
    let sig = EcdsaSignature::from_slice(&signature.0[..64])
        .map_err(|e| CoreError::MalformedSignature(e.to_string()))?;
    let key = VerifyingKey::recover_from_prehash(&prehash, &sig, recovery_id)
        .map_err(|_| CoreError::RecoveryFailed)?;
    Ok(Address::from_verifying_key(&key))
}
