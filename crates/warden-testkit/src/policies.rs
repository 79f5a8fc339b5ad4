//! Account key fixtures

use crate::keys::{helpers::test_keys_seeded, KeyTestFixture};
use warden_core::{AccountKey, PublicKey, WeightedPublicKey};

/// Weighted multisig policy together with the keys that can sign for it
#[derive(Debug, Clone)]
pub struct MultiSigFixture {
    signers: Vec<KeyTestFixture>,
    policy: AccountKey,
}

impl MultiSigFixture {
    /// `num_keys` unit-weight keys with the given threshold
    pub fn uniform(num_keys: usize, threshold: u32) -> Self {
        Self::weighted(&vec![1; num_keys], threshold)
    }

    /// One key per entry of `weights`
    pub fn weighted(weights: &[u32], threshold: u32) -> Self {
        let signers = test_keys_seeded(weights.len(), "multisig");
        let keys = signers
            .iter()
            .zip(weights)
            .map(|(signer, weight)| WeightedPublicKey::new(*weight, signer.public_key()))
            .collect();
        let policy = match AccountKey::weighted_multisig(threshold, keys) {
            Ok(policy) => policy,
            Err(e) => panic!("invalid multisig fixture: {e}"),
        };
        Self { signers, policy }
    }

    /// The multisig policy
    pub fn policy(&self) -> &AccountKey {
        &self.policy
    }

    /// Public keys of the first `count` signers, in stored order
    pub fn valid_keys(&self, count: usize) -> Vec<PublicKey> {
        self.signers
            .iter()
            .take(count)
            .map(KeyTestFixture::public_key)
            .collect()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.signers.len()
    }

    /// Returns true when the fixture has no keys
    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }
}

/// Role-based key with a public transaction key, a 2-of-2 update key and a
/// public fee-payer key
pub fn sample_role_based() -> AccountKey {
    let tx = KeyTestFixture::from_seed_string("role-transaction");
    let update_a = KeyTestFixture::from_seed_string("role-update-a");
    let update_b = KeyTestFixture::from_seed_string("role-update-b");
    let fee = KeyTestFixture::from_seed_string("role-fee-payer");

    let update = AccountKey::weighted_multisig(
        2,
        vec![
            WeightedPublicKey::new(1, update_a.public_key()),
            WeightedPublicKey::new(1, update_b.public_key()),
        ],
    );
    let built = update.and_then(|update| {
        AccountKey::role_based(
            AccountKey::public(tx.public_key()),
            update,
            AccountKey::public(fee.public_key()),
        )
    });
    match built {
        Ok(key) => key,
        Err(e) => panic!("invalid role-based fixture: {e}"),
    }
}

/// One named instance of every variant
pub fn sample_keys() -> Vec<(&'static str, AccountKey)> {
    vec![
        ("Nil", AccountKey::Nil),
        ("Legacy", AccountKey::Legacy),
        (
            "Public",
            AccountKey::public(KeyTestFixture::from_seed_string("public").public_key()),
        ),
        ("Fail", AccountKey::Fail),
        (
            "WeightedMultiSig",
            MultiSigFixture::uniform(4, 3).policy().clone(),
        ),
        ("RoleBased", sample_role_based()),
    ]
}
