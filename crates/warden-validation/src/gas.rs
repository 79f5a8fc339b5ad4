//! Gas accounting for signature validation and account creation

use warden_core::{AccountKey, ForkRule, GasSchedule, Result, RoleType, WardenError};

/// Extra validation gas for `valid_sig_count` signatures.
///
/// The first signature is covered by the base transaction cost; each further
/// one costs `per_key_gas`. A zero count can only come from a rejected
/// validation and is refused.
pub fn signature_gas(valid_sig_count: u32, per_key_gas: u64) -> Result<u64> {
    let extra = valid_sig_count.checked_sub(1).ok_or_else(|| {
        WardenError::pricing_contract("signature gas requested for zero valid signatures")
    })?;
    u64::from(extra).checked_mul(per_key_gas).ok_or_else(|| {
        WardenError::gas_overflow(format!(
            "{extra} extra signatures at {per_key_gas} gas each"
        ))
    })
}

/// Validation gas charged for an accepted signer set.
///
/// Single-key variants charge the schedule's default. Multisig keys charge
/// per stored key before hardening and per matched signature after it.
pub fn validation_gas(
    key: &AccountKey,
    role: RoleType,
    valid_sig_count: u32,
    rule: ForkRule,
    schedule: &GasSchedule,
) -> Result<u64> {
    if valid_sig_count == 0 {
        return Err(WardenError::pricing_contract(format!(
            "validation gas requested for a rejected {} key",
            key.key_type()
        )));
    }
    match key {
        AccountKey::Nil | AccountKey::Legacy | AccountKey::Public(_) | AccountKey::Fail => {
            Ok(schedule.validation_gas_default)
        }
        AccountKey::WeightedMultiSig(multisig) => {
            let priced = match rule {
                ForkRule::PreHardening => u32::try_from(multisig.keys().len())
                    .map_err(|_| WardenError::gas_overflow("multisig key count exceeds u32"))?,
                ForkRule::PostHardening => valid_sig_count,
            };
            signature_gas(priced, schedule.validation_gas_per_key)
        }
        AccountKey::RoleBased(roles) => {
            validation_gas(roles.get(role), role, valid_sig_count, rule, schedule)
        }
    }
}

/// Gas charged for installing `key` on a new account
pub fn account_creation_gas(key: &AccountKey, schedule: &GasSchedule) -> Result<u64> {
    match key {
        AccountKey::Nil | AccountKey::Legacy | AccountKey::Fail => {
            Ok(schedule.account_creation_gas_default)
        }
        AccountKey::Public(_) => Ok(schedule.account_creation_gas_per_key),
        AccountKey::WeightedMultiSig(multisig) => u64::try_from(multisig.keys().len())
            .ok()
            .and_then(|n| n.checked_mul(schedule.account_creation_gas_per_key))
            .ok_or_else(|| {
                WardenError::gas_overflow(format!(
                    "creation gas for {} multisig keys",
                    multisig.keys().len()
                ))
            }),
        AccountKey::RoleBased(roles) => roles.iter().try_fold(0u64, |total, (role, slot)| {
            let slot_gas = account_creation_gas(slot, schedule)?;
            total.checked_add(slot_gas).ok_or_else(|| {
                WardenError::gas_overflow(format!("creation gas overflow at {role} slot"))
            })
        }),
    }
}
