//! Golden test vectors for deterministic verification.
//!
//! Keys and addresses are widely published development accounts, so any
//! EIP-191 implementation can cross-check them. Digests are plain SHA-256.

use drvc3_core::{personal_message, signing_message, ContentDigest, Keypair};

/// A known signing key and the address it must derive.
#[derive(Debug, Clone)]
pub struct AddressVector {
    pub name: &'static str,
    /// Secret scalar as hex (with or without `0x`).
    pub secret: &'static str,
    /// EIP-55 checksummed address.
    pub address: &'static str,
}

/// A known input and its digest string.
#[derive(Debug, Clone)]
pub struct DigestVector {
    pub name: &'static str,
    pub content: &'static [u8],
    pub digest: &'static str,
}

/// The Hardhat/Anvil default account #0, used as the stock signing key in tests.
pub const HARDHAT_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const HARDHAT_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// Get all address vectors.
pub fn address_vectors() -> Vec<AddressVector> {
    vec![
        AddressVector {
            name: "secret one",
            secret: "0x0000000000000000000000000000000000000000000000000000000000000001",
            address: "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf",
        },
        AddressVector {
            name: "secret two",
            secret: "0000000000000000000000000000000000000000000000000000000000000002",
            address: "0x2B5AD5c4795c026514f8317c7a215E218DcCD6cF",
        },
        AddressVector {
            name: "hardhat account 0",
            secret: HARDHAT_KEY,
            address: HARDHAT_ADDRESS,
        },
        AddressVector {
            name: "hardhat account 1",
            secret: "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
            address: "0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
        },
    ]
}

/// Get all digest vectors.
pub fn digest_vectors() -> Vec<DigestVector> {
    vec![
        DigestVector {
            name: "empty",
            content: b"",
            digest: "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
        },
        DigestVector {
            name: "hi",
            content: b"hi",
            digest: "sha256:8f434346648f6b96df89dda901c5176b10a6d83961dd3c1ac88b59b2dc327aa4",
        },
        DigestVector {
            name: "abc",
            content: b"abc",
            digest: "sha256:ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
        },
        DigestVector {
            name: "line with newline",
            content: b"hello world\n",
            digest: "sha256:a948904f2f0f479b8f8197694b30184b0d2ed1c1cd2a1ec0fb85d299a192a447",
        },
        DigestVector {
            name: "html fragment",
            content: b"<h1>DRVC3</h1>",
            digest: "sha256:3caeeef11bfa2c45e1128cd544215aaf605dc868d1a581ad0a3acb766ffad214",
        },
    ]
}

/// The exact bytes hashed for signing the digest of `content`, as hex.
pub fn personal_message_hex(content: &[u8]) -> String {
    hex::encode(personal_message(&signing_message(&ContentDigest::of(content))))
}

/// Check every vector against this implementation.
///
/// Returns `(name, matches, detail)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    let addresses = address_vectors().into_iter().map(|v| {
        let derived = Keypair::from_hex(v.secret)
            .map(|kp| kp.address().to_checksum())
            .unwrap_or_else(|e| format!("error: {e}"));
        (v.name.to_string(), derived == v.address, derived)
    });

    let digests = digest_vectors().into_iter().map(|v| {
        let derived = ContentDigest::of(v.content).to_string();
        (v.name.to_string(), derived == v.digest, derived)
    });

    addresses.chain(digests).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_match() {
        for (name, matches, detail) in verify_all_vectors() {
            assert!(matches, "vector '{name}' produced {detail}");
        }
    }

    #[test]
    fn test_personal_message_bytes() {
        let hex = personal_message_hex(b"hi");
        // "\x19Ethereum Signed Message:\n71sha256:"
        assert!(hex.starts_with(
            "19457468657265756d205369676e6564204d6573736167653a0a3731736861323536"
        ));
        assert!(hex.ends_with(&hex::encode(
            "8f434346648f6b96df89dda901c5176b10a6d83961dd3c1ac88b59b2dc327aa4"
        )));
    }

    #[test]
    fn test_signing_is_deterministic() {
        let kp = Keypair::from_hex(HARDHAT_KEY).unwrap();
        let message = signing_message(&ContentDigest::of(b"hi"));
        assert_eq!(
            kp.sign_personal(&message).unwrap(),
            kp.sign_personal(&message).unwrap()
        );
    }
}
