//! Installation and update rules for account keys

use crate::{AccountKey, KeyLimits, Result, RoleBasedKey, RoleType, WardenError, WeightedMultiSig};
use std::collections::HashSet;

impl AccountKey {
    /// Check that this key may be installed on an account.
    ///
    /// `Nil` is never installable, and neither is a role-based key with a
    /// `Nil` slot. Multisig policies must be non-empty, within
    /// `limits.max_multisig_keys`, carry only positive weights and be
    /// satisfiable.
    pub fn check_installable(&self, limits: &KeyLimits) -> Result<()> {
        match self {
            AccountKey::Nil => Err(WardenError::invalid_key(
                "AccountKeyNil cannot be installed on an account",
            )),
            AccountKey::Legacy | AccountKey::Public(_) | AccountKey::Fail => Ok(()),
            AccountKey::WeightedMultiSig(multisig) => check_multisig(multisig, limits),
            AccountKey::RoleBased(roles) => {
                for (role, key) in roles.iter() {
                    key.check_installable(limits).map_err(|e| {
                        WardenError::invalid_key(format!("{role} slot: {e}"))
                    })?;
                }
                Ok(())
            }
        }
    }

    /// Produce the key that replaces `self` after an account-key update.
    ///
    /// A `Nil` slot inside a role-based update keeps the current key's slot
    /// for that role, which requires the current key to be role-based.
    /// Every other update must be installable and replaces the whole value.
    pub fn apply_update(&self, update: &AccountKey, limits: &KeyLimits) -> Result<AccountKey> {
        let AccountKey::RoleBased(new_roles) = update else {
            update.check_installable(limits)?;
            return Ok(update.clone());
        };

        let current = match self {
            AccountKey::RoleBased(current) => Some(current),
            _ => None,
        };
        let resolve = |role: RoleType| -> Result<AccountKey> {
            let slot = new_roles.get(role);
            if !slot.is_nil() {
                slot.check_installable(limits)
                    .map_err(|e| WardenError::invalid_key(format!("{role} slot: {e}")))?;
                return Ok(slot.clone());
            }
            current.map(|c| c.get(role).clone()).ok_or_else(|| {
                WardenError::invalid_key(format!(
                    "{role} slot is Nil but the current {} has no role to keep",
                    self.key_type()
                ))
            })
        };

        RoleBasedKey::new(
            resolve(RoleType::Transaction)?,
            resolve(RoleType::AccountUpdate)?,
            resolve(RoleType::FeePayer)?,
        )
        .map(AccountKey::RoleBased)
    }
}

fn check_multisig(multisig: &WeightedMultiSig, limits: &KeyLimits) -> Result<()> {
    let keys = multisig.keys();
    if keys.is_empty() {
        return Err(WardenError::invalid_key("multisig key list is empty"));
    }
    if keys.len() > limits.max_multisig_keys {
        return Err(WardenError::invalid_key(format!(
            "multisig has {} keys, limit is {}",
            keys.len(),
            limits.max_multisig_keys
        )));
    }
    if keys.iter().any(|k| k.weight == 0) {
        return Err(WardenError::invalid_key("multisig key weight must be positive"));
    }
    let mut seen = HashSet::with_capacity(keys.len());
    if !keys.iter().all(|k| seen.insert(k.key)) {
        return Err(WardenError::invalid_key("multisig keys must be unique"));
    }
    if !multisig.is_satisfiable() {
        return Err(WardenError::invalid_key(format!(
            "multisig threshold {} exceeds total weight {}",
            multisig.threshold(),
            multisig.total_weight()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PublicKey, WeightedPublicKey};
    use ed25519_dalek::SigningKey;

    fn key(seed: u8) -> PublicKey {
        PublicKey::from(SigningKey::from_bytes(&[seed; 32]).verifying_key())
    }

    fn multisig(threshold: u32, weights: &[u32]) -> AccountKey {
        let keys = weights
            .iter()
            .enumerate()
            .map(|(i, w)| WeightedPublicKey::new(*w, key(i as u8 + 1)))
            .collect();
        AccountKey::weighted_multisig(threshold, keys).unwrap()
    }

    #[test]
    fn test_sentinel_installability() {
        let limits = KeyLimits::default();
        assert!(AccountKey::Nil.check_installable(&limits).is_err());
        assert!(AccountKey::Legacy.check_installable(&limits).is_ok());
        assert!(AccountKey::Fail.check_installable(&limits).is_ok());
        assert!(AccountKey::public(key(1)).check_installable(&limits).is_ok());
    }

    #[test]
    fn test_multisig_installability() {
        let limits = KeyLimits::default();
        assert!(multisig(2, &[1, 1]).check_installable(&limits).is_ok());
        assert!(multisig(3, &[1, 1]).check_installable(&limits).is_err());
        assert!(multisig(1, &[1, 0]).check_installable(&limits).is_err());
        assert!(multisig(1, &[1; 11]).check_installable(&limits).is_err());
        assert!(AccountKey::weighted_multisig(1, vec![])
            .unwrap()
            .check_installable(&limits)
            .is_err());
    }

    #[test]
    fn test_role_based_with_nil_slot_is_not_installable() {
        let policy =
            AccountKey::role_based(AccountKey::public(key(1)), AccountKey::Nil, AccountKey::Legacy)
                .unwrap();
        let err = policy.check_installable(&KeyLimits::default()).unwrap_err();
        assert!(err.to_string().contains("account-update"));
    }

    #[test]
    fn test_update_keeps_nil_slots_of_role_based_key() {
        let limits = KeyLimits::default();
        let current = AccountKey::role_based(
            AccountKey::public(key(1)),
            AccountKey::public(key(2)),
            AccountKey::public(key(3)),
        )
        .unwrap();
        let update = AccountKey::role_based(
            AccountKey::Nil,
            AccountKey::public(key(9)),
            AccountKey::Nil,
        )
        .unwrap();

        let next = current.apply_update(&update, &limits).unwrap();
        let expected = AccountKey::role_based(
            AccountKey::public(key(1)),
            AccountKey::public(key(9)),
            AccountKey::public(key(3)),
        )
        .unwrap();
        assert!(next.equal(&expected));
    }

    #[test]
    fn test_update_rejects_nil_slot_without_role_based_current() {
        let update =
            AccountKey::role_based(AccountKey::Nil, AccountKey::Legacy, AccountKey::Legacy)
                .unwrap();
        assert!(AccountKey::Legacy
            .apply_update(&update, &KeyLimits::default())
            .is_err());
    }

    #[test]
    fn test_update_replaces_wholesale() {
        let limits = KeyLimits::default();
        let next = multisig(1, &[1, 1])
            .apply_update(&AccountKey::public(key(4)), &limits)
            .unwrap();
        assert!(next.equal(&AccountKey::public(key(4))));
        assert!(AccountKey::Legacy
            .apply_update(&AccountKey::Nil, &limits)
            .is_err());
        assert!(AccountKey::Legacy
            .apply_update(&AccountKey::Fail, &limits)
            .unwrap()
            .is_deactivated());
    }
}
