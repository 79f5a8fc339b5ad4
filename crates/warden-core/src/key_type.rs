//! Discriminant registry, signing roles and fork rules

use crate::{Result, WardenError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable discriminant of each account key variant.
///
/// The numeric values are part of the wire format and must never be
/// renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum AccountKeyType {
    /// Placeholder deferring to the chain default
    Nil = 0,
    /// Signer address must equal the account address
    Legacy = 1,
    /// Single public key
    Public = 2,
    /// Deactivated account, never validates
    Fail = 3,
    /// Threshold over weighted public keys
    WeightedMultiSig = 4,
    /// Per-role delegation to non role-based keys
    RoleBased = 5,
}

impl AccountKeyType {
    /// Every variant in discriminant order
    pub const ALL: [AccountKeyType; 6] = [
        AccountKeyType::Nil,
        AccountKeyType::Legacy,
        AccountKeyType::Public,
        AccountKeyType::Fail,
        AccountKeyType::WeightedMultiSig,
        AccountKeyType::RoleBased,
    ];

    /// Discriminant as written on the wire
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Variants that carry no key material
    pub const fn is_sentinel(self) -> bool {
        matches!(
            self,
            AccountKeyType::Nil | AccountKeyType::Legacy | AccountKeyType::Fail
        )
    }
}

impl TryFrom<u64> for AccountKeyType {
    type Error = WardenError;

    fn try_from(value: u64) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| u64::from(t.as_u8()) == value)
            .ok_or_else(|| WardenError::unsupported_key_type(value))
    }
}

impl fmt::Display for AccountKeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccountKeyType::Nil => "AccountKeyNil",
            AccountKeyType::Legacy => "AccountKeyLegacy",
            AccountKeyType::Public => "AccountKeyPublic",
            AccountKeyType::Fail => "AccountKeyFail",
            AccountKeyType::WeightedMultiSig => "AccountKeyWeightedMultiSig",
            AccountKeyType::RoleBased => "AccountKeyRoleBased",
        };
        f.write_str(name)
    }
}

/// Action a signature set is checked for.
///
/// The order is the fixed slot order of role-based keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleType {
    /// Sending a transaction
    Transaction = 0,
    /// Replacing the account key
    AccountUpdate = 1,
    /// Paying fees on behalf of another sender
    FeePayer = 2,
}

impl RoleType {
    /// Roles in slot order
    pub const ALL: [RoleType; 3] = [
        RoleType::Transaction,
        RoleType::AccountUpdate,
        RoleType::FeePayer,
    ];

    /// Slot index inside a role-based key
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for RoleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleType::Transaction => write!(f, "transaction"),
            RoleType::AccountUpdate => write!(f, "account-update"),
            RoleType::FeePayer => write!(f, "fee-payer"),
        }
    }
}

/// Signature validation rule in force for the action under check.
///
/// Carried explicitly on every validation call so historical actions can be
/// replayed under the rule that applied at their height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForkRule {
    /// Stray and surplus multisig signatures are ignored
    PreHardening,
    /// Stray or surplus multisig signatures reject the action
    PostHardening,
}

impl ForkRule {
    /// Map the chain's fork-activation flag onto a rule
    pub const fn from_activation(is_fork_active: bool) -> Self {
        if is_fork_active {
            ForkRule::PostHardening
        } else {
            ForkRule::PreHardening
        }
    }

    /// Returns true under the hardened rule
    pub const fn is_hardened(self) -> bool {
        matches!(self, ForkRule::PostHardening)
    }
}
