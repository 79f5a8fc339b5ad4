//! Property test strategies for Warden types
//!
//! Strategies draw key seeds from a small range so generated policies are
//! reproducible and shrink towards simple keys.
//!
//! # Example
//!
//! ```rust
//! use proptest::prelude::*;
//! use warden_testkit::strategies::arb_account_key;
//!
//! proptest! {
//!     #[test]
//!     fn key_type_is_known(key in arb_account_key()) {
//!         prop_assert!(key.key_type().as_u8() <= 5);
//!     }
//! }
//! ```

use proptest::prelude::*;

// Re-export proptest for convenience
pub use proptest;

use crate::keys::KeyTestFixture;
use warden_core::{AccountKey, PublicKey, WeightedPublicKey};

/// Strategy for deterministic public keys
pub fn arb_public_key() -> impl Strategy<Value = PublicKey> {
    (0u32..10_000)
        .prop_map(|seed| KeyTestFixture::from_seed_string(&format!("arb-{seed}")).public_key())
}

/// Strategy for weighted multisig policies with unique keys and a threshold
/// between 1 and the total weight
pub fn arb_weighted_multisig() -> impl Strategy<Value = AccountKey> {
    proptest::collection::btree_map(0u32..10_000, 1u32..=5, 1..=10)
        .prop_flat_map(|entries| {
            let keys: Vec<WeightedPublicKey> = entries
                .into_iter()
                .map(|(seed, weight)| {
                    let key = KeyTestFixture::from_seed_string(&format!("arb-{seed}"));
                    WeightedPublicKey::new(weight, key.public_key())
                })
                .collect();
            let total: u32 = keys.iter().map(|k| k.weight).sum();
            (Just(keys), 1..=total)
        })
        .prop_filter_map("unique multisig keys", |(keys, threshold)| {
            AccountKey::weighted_multisig(threshold, keys).ok()
        })
}

/// Strategy for any non role-based key except `Fail`
pub fn arb_leaf_key() -> impl Strategy<Value = AccountKey> {
    prop_oneof![
        Just(AccountKey::Nil),
        Just(AccountKey::Legacy),
        arb_public_key().prop_map(AccountKey::public),
        arb_weighted_multisig(),
    ]
}

/// Strategy for every variant except `Fail`, whose equality is never
/// reflexive
pub fn arb_account_key() -> impl Strategy<Value = AccountKey> {
    prop_oneof![
        3 => arb_leaf_key(),
        1 => (arb_leaf_key(), arb_leaf_key(), arb_leaf_key()).prop_filter_map(
            "role-based slots",
            |(tx, update, fee)| AccountKey::role_based(tx, update, fee).ok()
        ),
    ]
}
