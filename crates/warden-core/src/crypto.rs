//! Key material carried by account keys
//!
//! Public keys are Ed25519 verifying keys whose canonical encoding is the
//! 32-byte compressed point. Account addresses are the right-most 20 bytes of
//! the BLAKE3 hash of that encoding.

use crate::{Result, WardenError};
use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Length of a canonical public key encoding
pub const PUBLIC_KEY_LENGTH: usize = ed25519_dalek::PUBLIC_KEY_LENGTH;

/// Length of an account address
pub const ADDRESS_LENGTH: usize = 20;

/// Ed25519 public key attached to an account key or recovered from a signature
#[derive(Clone, Copy)]
pub struct PublicKey(VerifyingKey);

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for PublicKey {}

impl std::hash::Hash for PublicKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl PublicKey {
    /// Parse a key from its 32-byte compressed encoding
    pub fn from_bytes(bytes: &[u8; PUBLIC_KEY_LENGTH]) -> Result<Self> {
        VerifyingKey::from_bytes(bytes)
            .map(Self)
            .map_err(|e| WardenError::decode(format!("invalid public key point: {e}")))
    }

    /// Parse a key from a slice, rejecting any length other than 32
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: &[u8; PUBLIC_KEY_LENGTH] = bytes.try_into().map_err(|_| {
            WardenError::decode(format!(
                "public key must be {PUBLIC_KEY_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })?;
        Self::from_bytes(array)
    }

    /// Parse a key from hex, with or without a `0x` prefix
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; PUBLIC_KEY_LENGTH];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| WardenError::decode(format!("invalid public key hex: {e}")))?;
        Self::from_bytes(&bytes)
    }

    /// Canonical point encoding
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        self.0.as_bytes()
    }

    /// `0x`-prefixed hex of the canonical encoding
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.as_bytes()))
    }

    /// Underlying verifying key, for signature checks done by callers
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.0
    }

    /// Address of the account this key controls under the legacy rule
    pub fn address(&self) -> Address {
        Address::from_public_key(self)
    }
}

impl From<VerifyingKey> for PublicKey {
    fn from(key: VerifyingKey) -> Self {
        Self(key)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// 20-byte account address
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(pub [u8; ADDRESS_LENGTH]);

impl Address {
    /// Construct from raw bytes
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Derive the address owned by a public key
    pub fn from_public_key(key: &PublicKey) -> Self {
        let digest = blake3::hash(key.as_bytes());
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes.copy_from_slice(&digest.as_bytes()[32 - ADDRESS_LENGTH..]);
        Self(bytes)
    }

    /// Get the raw bytes
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address(0x{})", hex::encode(self.0))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::SigningKey;

    fn key(seed: u8) -> PublicKey {
        PublicKey::from(SigningKey::from_bytes(&[seed; 32]).verifying_key())
    }

    #[test]
    fn test_hex_roundtrip_accepts_both_prefix_forms() {
        let pk = key(1);
        let hex = pk.to_hex();
        assert!(hex.starts_with("0x"));
        assert_eq!(PublicKey::from_hex(&hex).unwrap(), pk);
        assert_eq!(PublicKey::from_hex(&hex[2..]).unwrap(), pk);
    }

    #[test]
    fn test_from_slice_rejects_wrong_length() {
        let err = PublicKey::from_slice(&[1u8; 31]).unwrap_err();
        assert!(matches!(err, WardenError::Decode { .. }));
    }

    #[test]
    fn test_address_is_deterministic_and_key_specific() {
        assert_eq!(key(1).address(), key(1).address());
        assert_ne!(key(1).address(), key(2).address());
    }

    #[test]
    fn test_address_is_hash_suffix() {
        let pk = key(5);
        let digest = blake3::hash(pk.as_bytes());
        assert_eq!(&pk.address().as_bytes()[..], &digest.as_bytes()[12..]);
    }
}
