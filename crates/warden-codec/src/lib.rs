//! Warden codec: account key wire formats
//!
//! Two encodings of [`AccountKey`], both led by the variant discriminant so a
//! decoder dispatches on the first element before reading the payload:
//!
//! - [`binary`]: DAG-CBOR arrays, the canonical format for storage and
//!   signing payloads
//! - [`json`]: `{"keyType", "key"}` envelopes for RPC and tooling
//!
//! Unknown discriminants surface as [`warden_core::WardenError::UnsupportedKeyType`].
//! Truncated, over-length or structurally inconsistent payloads surface as
//! [`warden_core::WardenError::Decode`]. Decoding never panics on untrusted input.

pub mod binary;
pub mod json;

pub use binary::{decode, encode};
pub use json::{from_json, from_json_value, to_json, to_json_value};

use warden_core::{AccountKey, Result};

/// Encoding of account keys to and from bytes
pub trait AccountKeyCodec {
    /// Short codec name used in logs
    fn name(&self) -> &'static str;

    /// Encode a key
    fn encode(&self, key: &AccountKey) -> Result<Vec<u8>>;

    /// Decode a key
    fn decode(&self, bytes: &[u8]) -> Result<AccountKey>;
}

/// DAG-CBOR codec
#[derive(Debug, Clone, Copy, Default)]
pub struct DagCborCodec;

impl AccountKeyCodec for DagCborCodec {
    fn name(&self) -> &'static str {
        "dag-cbor"
    }

    fn encode(&self, key: &AccountKey) -> Result<Vec<u8>> {
        binary::encode(key)
    }

    fn decode(&self, bytes: &[u8]) -> Result<AccountKey> {
        binary::decode(bytes)
    }
}

/// JSON codec producing UTF-8 envelopes
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl AccountKeyCodec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode(&self, key: &AccountKey) -> Result<Vec<u8>> {
        json::to_json(key).map(String::into_bytes)
    }

    fn decode(&self, bytes: &[u8]) -> Result<AccountKey> {
        json::from_json_slice(bytes)
    }
}
