//! DAG-CBOR account key encoding
//!
//! Every key encodes as a definite-length CBOR array whose first element is
//! the variant discriminant:
//!
//! | Variant | Encoding |
//! |---|---|
//! | Nil, Legacy, Fail | `[tag]` |
//! | Public | `[2, bytes(32)]` |
//! | WeightedMultiSig | `[4, threshold, [[weight, bytes(32)], ...]]` |
//! | RoleBased | `[5, [blob, blob, blob]]` |
//!
//! Role-based blobs are complete encodings of the transaction, account-update
//! and fee-payer keys, in that order.

use serde::de::{self, Expected, IgnoredAny, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_bytes::ByteBuf;
use std::fmt;
use warden_core::{
    AccountKey, AccountKeyType, PublicKey, Result, RoleType, WardenError, WeightedPublicKey,
};

/// Encode a key to DAG-CBOR
pub fn encode(key: &AccountKey) -> Result<Vec<u8>> {
    let wire = WireKey::from_key(key)?;
    serde_ipld_dagcbor::to_vec(&wire)
        .map_err(|e| WardenError::encode(format!("Failed to serialize to DAG-CBOR: {e}")))
}

/// Decode a key from DAG-CBOR
pub fn decode(bytes: &[u8]) -> Result<AccountKey> {
    let result = read_wire(bytes).and_then(WireKey::into_key);
    if let Err(error) = &result {
        tracing::debug!(len = bytes.len(), %error, "account key DAG-CBOR decode failed");
    }
    result
}

fn read_wire(bytes: &[u8]) -> Result<WireKey> {
    serde_ipld_dagcbor::from_slice(bytes)
        .map_err(|e| WardenError::decode(format!("DAG-CBOR: {e}")))
}

/// Account key as laid out on the wire, before payload validation
#[derive(Debug)]
enum WireKey {
    Nil,
    Legacy,
    Public(ByteBuf),
    Fail,
    WeightedMultiSig {
        threshold: u32,
        keys: Vec<(u32, ByteBuf)>,
    },
    RoleBased(Vec<ByteBuf>),
    Unsupported(u64),
}

impl WireKey {
    fn from_key(key: &AccountKey) -> Result<Self> {
        Ok(match key {
            AccountKey::Nil => WireKey::Nil,
            AccountKey::Legacy => WireKey::Legacy,
            AccountKey::Public(public) => WireKey::Public(key_bytes(public)),
            AccountKey::Fail => WireKey::Fail,
            AccountKey::WeightedMultiSig(multisig) => WireKey::WeightedMultiSig {
                threshold: multisig.threshold(),
                keys: multisig
                    .keys()
                    .iter()
                    .map(|k| (k.weight, key_bytes(&k.key)))
                    .collect(),
            },
            AccountKey::RoleBased(roles) => WireKey::RoleBased(
                roles
                    .iter()
                    .map(|(_, slot)| encode(slot).map(ByteBuf::from))
                    .collect::<Result<_>>()?,
            ),
        })
    }

    fn into_key(self) -> Result<AccountKey> {
        match self {
            WireKey::Nil => Ok(AccountKey::Nil),
            WireKey::Legacy => Ok(AccountKey::Legacy),
            WireKey::Public(bytes) => PublicKey::from_slice(&bytes).map(AccountKey::Public),
            WireKey::Fail => Ok(AccountKey::Fail),
            WireKey::WeightedMultiSig { threshold, keys } => {
                let keys = keys
                    .into_iter()
                    .map(|(weight, bytes)| {
                        PublicKey::from_slice(&bytes).map(|key| WeightedPublicKey::new(weight, key))
                    })
                    .collect::<Result<Vec<_>>>()?;
                AccountKey::weighted_multisig(threshold, keys).map_err(structural)
            }
            WireKey::RoleBased(blobs) => {
                let [transaction, account_update, fee_payer]: [ByteBuf; 3] =
                    blobs.try_into().map_err(|blobs: Vec<ByteBuf>| {
                        WardenError::decode(format!(
                            "role-based key needs 3 roles, got {}",
                            blobs.len()
                        ))
                    })?;
                AccountKey::role_based(
                    decode_role(&transaction, RoleType::Transaction)?,
                    decode_role(&account_update, RoleType::AccountUpdate)?,
                    decode_role(&fee_payer, RoleType::FeePayer)?,
                )
                .map_err(structural)
            }
            WireKey::Unsupported(discriminant) => {
                Err(WardenError::unsupported_key_type(discriminant))
            }
        }
    }

    fn tag(&self) -> u64 {
        let key_type = match self {
            WireKey::Nil => AccountKeyType::Nil,
            WireKey::Legacy => AccountKeyType::Legacy,
            WireKey::Public(_) => AccountKeyType::Public,
            WireKey::Fail => AccountKeyType::Fail,
            WireKey::WeightedMultiSig { .. } => AccountKeyType::WeightedMultiSig,
            WireKey::RoleBased(_) => AccountKeyType::RoleBased,
            WireKey::Unsupported(discriminant) => return *discriminant,
        };
        u64::from(key_type.as_u8())
    }
}

// Nested role-based keys are refused before their payload is decoded, which
// bounds decode recursion to one level.
fn decode_role(blob: &[u8], role: RoleType) -> Result<AccountKey> {
    let wire = read_wire(blob)?;
    if matches!(wire, WireKey::RoleBased(_)) {
        return Err(WardenError::decode(format!(
            "{role} slot holds a nested role-based key"
        )));
    }
    wire.into_key()
}

fn key_bytes(key: &PublicKey) -> ByteBuf {
    ByteBuf::from(key.as_bytes().to_vec())
}

fn structural(error: WardenError) -> WardenError {
    match error {
        WardenError::InvalidKey { message } => WardenError::decode(message),
        other => other,
    }
}

impl Serialize for WireKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let len = match self {
            WireKey::Nil | WireKey::Legacy | WireKey::Fail | WireKey::Unsupported(_) => 1,
            WireKey::Public(_) | WireKey::RoleBased(_) => 2,
            WireKey::WeightedMultiSig { .. } => 3,
        };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.tag())?;
        match self {
            WireKey::Public(bytes) => seq.serialize_element(bytes)?,
            WireKey::WeightedMultiSig { threshold, keys } => {
                seq.serialize_element(threshold)?;
                seq.serialize_element(keys)?;
            }
            WireKey::RoleBased(blobs) => seq.serialize_element(blobs)?,
            WireKey::Nil | WireKey::Legacy | WireKey::Fail | WireKey::Unsupported(_) => {}
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for WireKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_seq(WireKeyVisitor)
    }
}

struct WireKeyVisitor;

impl<'de> Visitor<'de> for WireKeyVisitor {
    type Value = WireKey;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a discriminant-tagged account key array")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<WireKey, A::Error> {
        let discriminant: u64 = next_field(&mut seq, 0, &self)?;
        let Ok(key_type) = AccountKeyType::try_from(discriminant) else {
            // Unknown variants are reported by discriminant, so the payload
            // is skipped rather than interpreted.
            while seq.next_element::<IgnoredAny>()?.is_some() {}
            return Ok(WireKey::Unsupported(discriminant));
        };

        let wire = match key_type {
            AccountKeyType::Nil => WireKey::Nil,
            AccountKeyType::Legacy => WireKey::Legacy,
            AccountKeyType::Fail => WireKey::Fail,
            AccountKeyType::Public => WireKey::Public(next_field(&mut seq, 1, &self)?),
            AccountKeyType::WeightedMultiSig => WireKey::WeightedMultiSig {
                threshold: next_field(&mut seq, 1, &self)?,
                keys: next_field(&mut seq, 2, &self)?,
            },
            AccountKeyType::RoleBased => WireKey::RoleBased(next_field(&mut seq, 1, &self)?),
        };

        if seq.next_element::<IgnoredAny>()?.is_some() {
            return Err(de::Error::custom(format!(
                "unexpected trailing payload in {key_type}"
            )));
        }
        Ok(wire)
    }
}

fn next_field<'de, A, T>(
    seq: &mut A,
    index: usize,
    expected: &dyn Expected,
) -> std::result::Result<T, A::Error>
where
    A: SeqAccess<'de>,
    T: Deserialize<'de>,
{
    seq.next_element()?
        .ok_or_else(|| de::Error::invalid_length(index, expected))
}
