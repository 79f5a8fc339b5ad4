//! JSON account key encoding
//!
//! Keys are wrapped in a `{"keyType": n, "key": payload}` envelope. The
//! payload is `{}` for Nil, Legacy and Fail, a hex string for Public, a
//! `{"threshold", "keys"}` object for WeightedMultiSig and an array of three
//! envelopes for RoleBased.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use warden_core::{AccountKey, AccountKeyType, Result, WardenError, WeightedPublicKey};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct Envelope {
    key_type: u64,
    key: Value,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct MultiSigPayload {
    threshold: u32,
    keys: Vec<WeightedPublicKey>,
}

/// Convert a key to its JSON envelope
pub fn to_json_value(key: &AccountKey) -> Result<Value> {
    to_value(&envelope(key)?)
}

/// Serialize a key to a JSON string
pub fn to_json(key: &AccountKey) -> Result<String> {
    serde_json::to_string(&envelope(key)?)
        .map_err(|e| WardenError::encode(format!("Failed to serialize to JSON: {e}")))
}

/// Parse a key from a JSON envelope value
pub fn from_json_value(value: Value) -> Result<AccountKey> {
    let result = serde_json::from_value(value)
        .map_err(|e| WardenError::decode(format!("JSON envelope: {e}")))
        .and_then(|envelope: Envelope| from_envelope(envelope, true));
    log_failure(result)
}

/// Parse a key from a JSON string
pub fn from_json(json: &str) -> Result<AccountKey> {
    from_json_slice(json.as_bytes())
}

pub(crate) fn from_json_slice(bytes: &[u8]) -> Result<AccountKey> {
    let result = serde_json::from_slice(bytes)
        .map_err(|e| WardenError::decode(format!("JSON envelope: {e}")))
        .and_then(|envelope: Envelope| from_envelope(envelope, true));
    log_failure(result)
}

fn log_failure(result: Result<AccountKey>) -> Result<AccountKey> {
    if let Err(error) = &result {
        tracing::debug!(%error, "account key JSON decode failed");
    }
    result
}

fn envelope(key: &AccountKey) -> Result<Envelope> {
    let payload = match key {
        AccountKey::Nil | AccountKey::Legacy | AccountKey::Fail => {
            Value::Object(serde_json::Map::new())
        }
        AccountKey::Public(public) => to_value(public)?,
        AccountKey::WeightedMultiSig(multisig) => to_value(&MultiSigPayload {
            threshold: multisig.threshold(),
            keys: multisig.keys().to_vec(),
        })?,
        AccountKey::RoleBased(roles) => Value::Array(
            roles
                .iter()
                .map(|(_, slot)| to_json_value(slot))
                .collect::<Result<_>>()?,
        ),
    };
    Ok(Envelope {
        key_type: u64::from(key.key_type().as_u8()),
        key: payload,
    })
}

fn from_envelope(envelope: Envelope, allow_roles: bool) -> Result<AccountKey> {
    let key_type = AccountKeyType::try_from(envelope.key_type)?;
    match key_type {
        AccountKeyType::Nil => sentinel(&envelope.key, key_type, AccountKey::Nil),
        AccountKeyType::Legacy => sentinel(&envelope.key, key_type, AccountKey::Legacy),
        AccountKeyType::Fail => sentinel(&envelope.key, key_type, AccountKey::Fail),
        AccountKeyType::Public => from_payload(envelope.key, key_type).map(AccountKey::Public),
        AccountKeyType::WeightedMultiSig => {
            let payload: MultiSigPayload = from_payload(envelope.key, key_type)?;
            AccountKey::weighted_multisig(payload.threshold, payload.keys).map_err(structural)
        }
        AccountKeyType::RoleBased if !allow_roles => Err(WardenError::decode(
            "role-based key cannot be nested inside a role slot",
        )),
        AccountKeyType::RoleBased => {
            let roles: Vec<Envelope> = from_payload(envelope.key, key_type)?;
            let [transaction, account_update, fee_payer]: [Envelope; 3] =
                roles.try_into().map_err(|roles: Vec<Envelope>| {
                    WardenError::decode(format!(
                        "role-based key needs 3 roles, got {}",
                        roles.len()
                    ))
                })?;
            AccountKey::role_based(
                from_envelope(transaction, false)?,
                from_envelope(account_update, false)?,
                from_envelope(fee_payer, false)?,
            )
            .map_err(structural)
        }
    }
}

fn sentinel(payload: &Value, key_type: AccountKeyType, key: AccountKey) -> Result<AccountKey> {
    match payload {
        Value::Object(map) if map.is_empty() => Ok(key),
        _ => Err(WardenError::decode(format!(
            "{key_type} payload must be an empty object"
        ))),
    }
}

fn from_payload<T: DeserializeOwned>(payload: Value, key_type: AccountKeyType) -> Result<T> {
    serde_json::from_value(payload)
        .map_err(|e| WardenError::decode(format!("{key_type} payload: {e}")))
}

fn to_value<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|e| WardenError::encode(format!("Failed to serialize to JSON: {e}")))
}

fn structural(error: WardenError) -> WardenError {
    match error {
        WardenError::InvalidKey { message } => WardenError::decode(message),
        other => other,
    }
}
