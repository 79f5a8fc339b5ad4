//! Account key variants
//!
//! [`AccountKey`] is the closed set of authorization policies an account can
//! carry. Values are immutable: an account-key update builds a new value (see
//! [`AccountKey::apply_update`]) instead of editing one in place.
//!
//! ## Equality
//!
//! `AccountKey` implements neither `PartialEq` nor `Eq`. Structural
//! comparison goes through [`AccountKey::equal`], which is **not reflexive**:
//! a `Fail` key compares unequal to everything, itself included. Use
//! [`AccountKey::is_deactivated`] to detect the deactivation marker.

use crate::{AccountKeyType, PublicKey, Result, RoleType, WardenError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Authorization policy attached to an account
#[derive(Debug, Clone)]
pub enum AccountKey {
    /// Defers to the chain's default scheme; only meaningful as an update placeholder
    Nil,
    /// Authorized when the signer's derived address is the account address
    Legacy,
    /// Authorized by exactly this key
    Public(PublicKey),
    /// Never authorizes anything
    Fail,
    /// Authorized when matched signer weights reach the threshold
    WeightedMultiSig(WeightedMultiSig),
    /// Per-role delegation
    RoleBased(RoleBasedKey),
}

impl AccountKey {
    /// Build a single public key policy
    pub fn public(key: PublicKey) -> Self {
        AccountKey::Public(key)
    }

    /// Build a weighted multisig policy, see [`WeightedMultiSig::new`]
    pub fn weighted_multisig(threshold: u32, keys: Vec<WeightedPublicKey>) -> Result<Self> {
        WeightedMultiSig::new(threshold, keys).map(AccountKey::WeightedMultiSig)
    }

    /// Build a role-based policy, see [`RoleBasedKey::new`]
    pub fn role_based(
        transaction: AccountKey,
        account_update: AccountKey,
        fee_payer: AccountKey,
    ) -> Result<Self> {
        RoleBasedKey::new(transaction, account_update, fee_payer).map(AccountKey::RoleBased)
    }

    /// Discriminant of this variant
    pub fn key_type(&self) -> AccountKeyType {
        match self {
            AccountKey::Nil => AccountKeyType::Nil,
            AccountKey::Legacy => AccountKeyType::Legacy,
            AccountKey::Public(_) => AccountKeyType::Public,
            AccountKey::Fail => AccountKeyType::Fail,
            AccountKey::WeightedMultiSig(_) => AccountKeyType::WeightedMultiSig,
            AccountKey::RoleBased(_) => AccountKeyType::RoleBased,
        }
    }

    /// Returns true for keys that contain other account keys
    pub fn is_composite(&self) -> bool {
        matches!(self, AccountKey::RoleBased(_))
    }

    /// Returns true for the `Nil` placeholder
    pub fn is_nil(&self) -> bool {
        matches!(self, AccountKey::Nil)
    }

    /// Returns true for the `Fail` deactivation marker.
    ///
    /// Only the top-level variant is inspected; a role-based key with a `Fail`
    /// slot is deactivated for that role alone.
    pub fn is_deactivated(&self) -> bool {
        matches!(self, AccountKey::Fail)
    }

    /// Structural equality between account keys.
    ///
    /// Not reflexive: `Fail` is unequal to every key, including itself, and a
    /// role-based key containing a `Fail` slot is therefore unequal too.
    pub fn equal(&self, other: &AccountKey) -> bool {
        match (self, other) {
            (AccountKey::Nil, AccountKey::Nil) => true,
            (AccountKey::Legacy, AccountKey::Legacy) => true,
            (AccountKey::Public(a), AccountKey::Public(b)) => a == b,
            (AccountKey::Fail, _) | (_, AccountKey::Fail) => false,
            (AccountKey::WeightedMultiSig(a), AccountKey::WeightedMultiSig(b)) => a.equal(b),
            (AccountKey::RoleBased(a), AccountKey::RoleBased(b)) => a.equal(b),
            _ => false,
        }
    }
}

/// Public key carrying a multisig weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightedPublicKey {
    /// Contribution of this signer towards the threshold
    pub weight: u32,
    /// Signer key
    pub key: PublicKey,
}

impl WeightedPublicKey {
    /// Pair a key with its weight
    pub fn new(weight: u32, key: PublicKey) -> Self {
        Self { weight, key }
    }
}

/// Threshold policy over an ordered list of unique weighted keys
#[derive(Debug, Clone)]
pub struct WeightedMultiSig {
    threshold: u32,
    keys: Vec<WeightedPublicKey>,
}

impl WeightedMultiSig {
    /// Create a multisig policy.
    ///
    /// Rejects a zero threshold and duplicate keys. A policy whose weights sum
    /// below the threshold is constructible but can never validate; see
    /// [`WeightedMultiSig::is_satisfiable`].
    pub fn new(threshold: u32, keys: Vec<WeightedPublicKey>) -> Result<Self> {
        if threshold == 0 {
            return Err(WardenError::invalid_key("multisig threshold must be positive"));
        }
        let mut seen = HashSet::with_capacity(keys.len());
        for weighted in &keys {
            if !seen.insert(weighted.key) {
                return Err(WardenError::invalid_key(format!(
                    "duplicate multisig key {}",
                    weighted.key
                )));
            }
        }
        Ok(Self { threshold, keys })
    }

    /// Minimum matched weight for acceptance
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Weighted keys in stored order
    pub fn keys(&self) -> &[WeightedPublicKey] {
        &self.keys
    }

    /// Sum of all weights, widened so it cannot overflow
    pub fn total_weight(&self) -> u64 {
        self.keys.iter().map(|k| u64::from(k.weight)).sum()
    }

    /// Returns true when signing with every key would reach the threshold
    pub fn is_satisfiable(&self) -> bool {
        self.total_weight() >= u64::from(self.threshold)
    }

    /// Weight of a stored key, if present
    pub fn weight_of(&self, key: &PublicKey) -> Option<u32> {
        self.keys.iter().find(|k| &k.key == key).map(|k| k.weight)
    }

    fn equal(&self, other: &WeightedMultiSig) -> bool {
        self.threshold == other.threshold && self.keys == other.keys
    }
}

/// Three account keys, one per [`RoleType`]
#[derive(Debug, Clone)]
pub struct RoleBasedKey {
    slots: Box<[AccountKey; 3]>,
}

impl RoleBasedKey {
    /// Create a role-based key; no slot may itself be role-based
    pub fn new(
        transaction: AccountKey,
        account_update: AccountKey,
        fee_payer: AccountKey,
    ) -> Result<Self> {
        let slots = [transaction, account_update, fee_payer];
        if let Some(role) = RoleType::ALL
            .into_iter()
            .find(|role| slots[role.index()].is_composite())
        {
            return Err(WardenError::invalid_key(format!(
                "role-based key cannot nest a role-based key in the {role} slot"
            )));
        }
        Ok(Self {
            slots: Box::new(slots),
        })
    }

    /// Key delegated to a role
    pub fn get(&self, role: RoleType) -> &AccountKey {
        &self.slots[role.index()]
    }

    /// Slots in role order
    pub fn iter(&self) -> impl Iterator<Item = (RoleType, &AccountKey)> {
        RoleType::ALL.into_iter().map(move |role| (role, self.get(role)))
    }

    fn equal(&self, other: &RoleBasedKey) -> bool {
        RoleType::ALL
            .into_iter()
            .all(|role| self.get(role).equal(other.get(role)))
    }
}
