//! Key test helpers and utilities
//!
//! Deterministic Ed25519 keys for account-key tests. Keys come from fixed
//! seeds so every run sees the same public keys and addresses.

use ed25519_dalek::{Signer, SigningKey};
use warden_core::{Address, PublicKey};

/// Key test fixture for consistent test key generation
#[derive(Debug, Clone)]
pub struct KeyTestFixture {
    signing_key: SigningKey,
    public_key: PublicKey,
}

impl KeyTestFixture {
    /// Create a new key fixture with deterministic generation from a seed
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        let public_key = PublicKey::from(signing_key.verifying_key());
        Self {
            signing_key,
            public_key,
        }
    }

    /// Create a key fixture from a seed string
    pub fn from_seed_string(seed: &str) -> Self {
        Self::from_seed(blake3::hash(seed.as_bytes()).as_bytes())
    }

    /// Get the signing key
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    /// Get the public key
    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    /// Address owned by this key under the legacy rule
    pub fn address(&self) -> Address {
        self.public_key.address()
    }

    /// Sign a message with this key
    pub fn sign(&self, message: &[u8]) -> ed25519_dalek::Signature {
        self.signing_key.sign(message)
    }
}

/// Builder for creating multiple test keys with consistent configuration
#[derive(Debug)]
pub struct KeySetBuilder {
    count: usize,
    base_seed: Option<String>,
}

impl KeySetBuilder {
    /// Create a new key set builder
    pub fn new(count: usize) -> Self {
        Self {
            count,
            base_seed: None,
        }
    }

    /// Set a base seed for deterministic key generation
    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.base_seed = Some(seed.into());
        self
    }

    /// Build the set of keys
    pub fn build(self) -> Vec<KeyTestFixture> {
        let base = self.base_seed.as_deref().unwrap_or("key-seed");
        (0..self.count)
            .map(|i| KeyTestFixture::from_seed_string(&format!("{base}-{i}")))
            .collect()
    }
}

/// Common test key creation helpers
pub mod helpers {
    use super::*;

    /// Create a single test key with default configuration
    pub fn test_key() -> KeyTestFixture {
        KeyTestFixture::from_seed_string("test-key-default")
    }

    /// Create N test keys with sequential seeding
    pub fn test_keys(count: usize) -> Vec<KeyTestFixture> {
        KeySetBuilder::new(count).build()
    }

    /// Create test keys with a specific base seed
    pub fn test_keys_seeded(count: usize, base_seed: &str) -> Vec<KeyTestFixture> {
        KeySetBuilder::new(count).with_seed(base_seed).build()
    }

    /// Public keys of `count` keys that belong to no fixture policy
    pub fn stray_public_keys(count: usize) -> Vec<PublicKey> {
        test_keys_seeded(count, "stray")
            .iter()
            .map(KeyTestFixture::public_key)
            .collect()
    }
}
