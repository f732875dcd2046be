//! Proptest generators for property-based testing.

use proptest::prelude::*;

use drvc3_core::{
    Address, BlockState, ContentDigest, Keypair, Receipt, ReceiptBuilder, ReceiptId, Resource,
};

/// Generate a random keypair.
///
/// Not every 32-byte string is a valid secp256k1 scalar; those are skipped.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_filter_map("not a valid secp256k1 scalar", |secret| {
        Keypair::from_secret_bytes(&secret).ok()
    })
}

/// Generate a random address.
pub fn address() -> impl Strategy<Value = Address> {
    any::<[u8; 20]>().prop_map(Address::from_bytes)
}

/// Generate a random digest.
pub fn digest() -> impl Strategy<Value = ContentDigest> {
    any::<[u8; 32]>().prop_map(ContentDigest::from_bytes)
}

/// Generate content bytes of at most `max_len` bytes.
pub fn content(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate a block state.
pub fn block_state() -> impl Strategy<Value = BlockState> {
    prop_oneof![Just(BlockState::Loose), Just(BlockState::Blocked)]
}

/// Generate an issuer identifier.
pub fn issuer() -> impl Strategy<Value = String> {
    "[a-z]{3,10}\\.[a-z]{2,4}/[a-z0-9-]{1,16}/[a-z0-9-]{1,16}".prop_map(String::from)
}

/// Generate an event name.
pub fn event() -> impl Strategy<Value = String> {
    "[a-z]{3,10}\\.[a-z]{3,10}".prop_map(String::from)
}

/// Generate a Unix timestamp in milliseconds between 2000 and 2100.
pub fn millis() -> impl Strategy<Value = i64> {
    946_684_800_000i64..=4_102_444_800_000i64
}

/// Parameters for generating a receipt.
#[derive(Debug, Clone)]
pub struct ReceiptParams {
    pub keypair: Keypair,
    pub content: Vec<u8>,
    pub issuer: String,
    pub event: String,
    pub description: Option<String>,
    pub block_state: BlockState,
    pub url: Option<String>,
}

impl Arbitrary for ReceiptParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            keypair(),
            content(1000),
            issuer(),
            event(),
            proptest::option::of("[ -~]{1,40}"),
            block_state(),
            proptest::option::of("https://[a-z]{3,12}\\.com/[a-z]{1,12}"),
        )
            .prop_map(
                |(keypair, content, issuer, event, description, block_state, url)| ReceiptParams {
                    keypair,
                    content,
                    issuer,
                    event,
                    description,
                    block_state,
                    url,
                },
            )
            .boxed()
    }
}

/// Generate a receipt from parameters, issued at a fixed instant.
pub fn receipt_from_params(params: &ReceiptParams) -> Receipt {
    let mut builder = ReceiptBuilder::new(
        ReceiptId::from_millis(crate::fixtures::FIXTURE_MILLIS),
        crate::fixtures::FIXTURE_TIMESTAMP,
        ContentDigest::of(&params.content),
    )
    .issuer(params.issuer.clone())
    .event(params.event.clone())
    .description(params.description.clone())
    .block_state(params.block_state);

    if let Some(url) = &params.url {
        builder = builder.resource(Resource {
            kind: Some("url".to_string()),
            url: Some(url.clone()),
            branch: None,
            commit_hash: None,
        });
    }

    builder
        .sign(&params.keypair)
        .expect("signing with a valid key cannot fail")
}

#[cfg(test)]
mod tests {
    use drvc3_core::validate_signer;

    use super::*;

    proptest! {
        #[test]
        fn test_generated_receipts_verify(params: ReceiptParams) {
            let receipt = receipt_from_params(&params);
            prop_assert_eq!(validate_signer(&receipt).unwrap(), params.keypair.address());
        }

        #[test]
        fn test_signing_is_deterministic(params: ReceiptParams) {
            let r1 = receipt_from_params(&params);
            let r2 = receipt_from_params(&params);
            prop_assert_eq!(r1.integrity.signature, r2.integrity.signature);
        }

        #[test]
        fn test_different_content_different_digest(
            c1 in content(100),
            c2 in content(100),
        ) {
            prop_assume!(c1 != c2);
            prop_assert_ne!(ContentDigest::of(&c1), ContentDigest::of(&c2));
        }
    }
}
