//! Receipt authenticity: recover the signer and compare it with the claim.

use crate::crypto::{recover_personal, Address};
use crate::error::{CoreError, ValidationError};
use crate::receipt::Receipt;

/// Recover the address that produced the receipt's signature.
///
/// Applies the same personal-message prefixing used at signing time.
pub fn recover_signer(receipt: &Receipt) -> Result<Address, CoreError> {
    recover_personal(&receipt.signing_message(), &receipt.integrity.signature)
}

/// Require that the signature recovers to exactly `signer_address`.
///
/// Addresses compare on their bytes, so the letter casing of the stored
/// address does not matter. Returns the recovered address.
pub fn validate_signer(receipt: &Receipt) -> Result<Address, ValidationError> {
    let expected = *receipt.signer();

    let recovered = recover_signer(receipt).map_err(|e| ValidationError::Unrecoverable {
        expected,
        reason: e.to_string(),
    })?;

    if recovered != expected {
        return Err(ValidationError::SignerMismatch {
            recovered,
            expected,
        });
    }

    Ok(recovered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{ContentDigest, Keypair, RecoverableSignature};
    use crate::receipt::ReceiptBuilder;
    use crate::types::ReceiptId;

    fn make_test_keypair() -> Keypair {
        Keypair::from_secret_bytes(&[0x42; 32]).unwrap()
    }

    fn make_receipt(keypair: &Keypair, content: &[u8]) -> Receipt {
        ReceiptBuilder::new(
            ReceiptId::from_millis(1_736_870_400_000),
            "2025-01-14T16:00:00.000Z",
            ContentDigest::of(content),
        )
        .issuer("issuer")
        .event("content.publish")
        .sign(keypair)
        .unwrap()
    }

    #[test]
    fn test_valid_signer() {
        let keypair = make_test_keypair();
        let receipt = make_receipt(&keypair, b"hello");
        assert_eq!(validate_signer(&receipt).unwrap(), keypair.address());
    }

    #[test]
    fn test_wrong_claimed_signer() {
        let keypair = make_test_keypair();
        let mut receipt = make_receipt(&keypair, b"hello");
        receipt.integrity.signer_address = Keypair::generate().address();

        let result = validate_signer(&receipt);
        assert!(matches!(
            result,
            Err(ValidationError::SignerMismatch { recovered, .. }) if recovered == keypair.address()
        ));
    }

    #[test]
    fn test_digest_swapped() {
        let keypair = make_test_keypair();
        let mut receipt = make_receipt(&keypair, b"hello");
        receipt.integrity.hash = ContentDigest::of(b"tampered");

        assert!(matches!(
            validate_signer(&receipt),
            Err(ValidationError::SignerMismatch { .. }) | Err(ValidationError::Unrecoverable { .. })
        ));
    }

    #[test]
    fn test_garbage_signature() {
        let keypair = make_test_keypair();
        let mut receipt = make_receipt(&keypair, b"hello");
        receipt.integrity.signature = RecoverableSignature::from_bytes([0xff; 65]);

        let result = validate_signer(&receipt);
        assert!(matches!(result, Err(ValidationError::Unrecoverable { .. })));
        assert_eq!(result.unwrap_err().expected(), &keypair.address());
    }

    #[test]
    fn test_every_signature_bit_flip_fails() {
        let keypair = make_test_keypair();
        let receipt = make_receipt(&keypair, b"hello");

        for byte in 0..65 {
            for bit in 0..8 {
                let mut tampered = receipt.clone();
                tampered.integrity.signature.0[byte] ^= 1 << bit;
                assert!(
                    validate_signer(&tampered).is_err(),
                    "flip of byte {byte} bit {bit} still verified"
                );
            }
        }
    }
}
