//! Signature validation against account keys
//!
//! The engine decides whether the public keys recovered from a transaction's
//! signatures satisfy an account key for a given role. It never verifies
//! signatures; recovery happens upstream.

use std::collections::HashSet;
use tracing::{debug, warn};
use warden_core::{
    AccountKey, Address, ForkRule, PublicKey, Result, RoleType, WardenError, WeightedMultiSig,
};

/// Outcome of validating a signer set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validation {
    /// Whether the signer set satisfies the key
    pub accepted: bool,
    /// Number of recovered signatures that matched the key. Reported on
    /// rejection too; gas accounting only consumes it after acceptance.
    pub valid_sig_count: u32,
}

impl Validation {
    /// Accepted outcome
    pub const fn accept(valid_sig_count: u32) -> Self {
        Self {
            accepted: true,
            valid_sig_count,
        }
    }

    /// Rejected outcome
    pub const fn reject(valid_sig_count: u32) -> Self {
        Self {
            accepted: false,
            valid_sig_count,
        }
    }

    /// Valid signature count of an accepted validation, or the invalid-signer
    /// error
    pub fn ensure_accepted(self) -> Result<u32> {
        if self.accepted {
            Ok(self.valid_sig_count)
        } else {
            Err(WardenError::invalid_signer(format!(
                "signer set rejected ({} matching signatures)",
                self.valid_sig_count
            )))
        }
    }
}

/// Validate recovered signer keys against `key` for `role`.
///
/// `from` is the account address, consulted only by the legacy rule.
/// `rule` selects pre- or post-hardening multisig semantics.
pub fn validate(
    key: &AccountKey,
    role: RoleType,
    recovered: &[PublicKey],
    from: &Address,
    rule: ForkRule,
) -> Validation {
    let validation = match key {
        AccountKey::Nil => {
            warn!(%role, "validation against a nil account key");
            Validation::reject(0)
        }
        AccountKey::Legacy => validate_legacy(recovered, from),
        AccountKey::Public(stored) => validate_public(stored, recovered),
        AccountKey::Fail => Validation::reject(0),
        AccountKey::WeightedMultiSig(multisig) => validate_multisig(multisig, recovered, rule),
        AccountKey::RoleBased(roles) => {
            return validate(roles.get(role), role, recovered, from, rule);
        }
    };

    if validation.accepted {
        debug!(
            key_type = %key.key_type(),
            %role,
            valid_sig_count = validation.valid_sig_count,
            "signer set accepted"
        );
    }
    validation
}

fn validate_legacy(recovered: &[PublicKey], from: &Address) -> Validation {
    match recovered {
        [signer] if signer.address() == *from => Validation::accept(1),
        _ => Validation::reject(0),
    }
}

fn validate_public(stored: &PublicKey, recovered: &[PublicKey]) -> Validation {
    match recovered {
        [signer] if signer == stored => Validation::accept(1),
        _ => Validation::reject(0),
    }
}

fn validate_multisig(
    multisig: &WeightedMultiSig,
    recovered: &[PublicKey],
    rule: ForkRule,
) -> Validation {
    let mut seen = HashSet::with_capacity(recovered.len());
    let mut matched: usize = 0;
    let mut strays: usize = 0;
    let mut weight: u64 = 0;

    for key in recovered {
        if !seen.insert(key) {
            continue;
        }
        match multisig.weight_of(key) {
            Some(w) => {
                matched += 1;
                weight = weight.saturating_add(u64::from(w));
            }
            None => strays += 1,
        }
    }

    let valid_sig_count = u32::try_from(matched).unwrap_or(u32::MAX);

    if rule.is_hardened() {
        // Duplicates count towards the limit.
        if recovered.len() > multisig.keys().len() {
            warn!(
                signatures = recovered.len(),
                keys = multisig.keys().len(),
                "more signatures than multisig keys"
            );
            return Validation::reject(valid_sig_count);
        }
        if strays > 0 {
            warn!(strays, valid_sig_count, "stray signatures on multisig account");
            return Validation::reject(valid_sig_count);
        }
    }

    if weight < u64::from(multisig.threshold()) {
        debug!(
            weight,
            threshold = multisig.threshold(),
            "multisig threshold not reached"
        );
        return Validation::reject(valid_sig_count);
    }
    Validation::accept(valid_sig_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use warden_testkit::{helpers::stray_public_keys, KeyTestFixture, MultiSigFixture};

    const PRE: ForkRule = ForkRule::PreHardening;
    const POST: ForkRule = ForkRule::PostHardening;

    fn any_address() -> Address {
        Address::new([0u8; 20])
    }

    #[test]
    fn test_ensure_accepted() {
        assert_eq!(Validation::accept(2).ensure_accepted().unwrap(), 2);
        assert_matches!(
            Validation::reject(1).ensure_accepted(),
            Err(WardenError::InvalidSigner { .. })
        );
    }

    #[test]
    fn test_fail_rejects_everything() {
        let signer = KeyTestFixture::from_seed_string("fail").public_key();
        for rule in [PRE, POST] {
            let result = validate(
                &AccountKey::Fail,
                RoleType::Transaction,
                &[signer],
                &signer.address(),
                rule,
            );
            assert_eq!(result, Validation::reject(0));
        }
    }

    #[test]
    fn test_multisig_weights_are_summed() {
        let fixture = MultiSigFixture::weighted(&[2, 1, 1], 3);
        let keys = fixture.valid_keys(3);
        let heavy_and_light = [keys[0], keys[1]];
        let result = validate(
            fixture.policy(),
            RoleType::Transaction,
            &heavy_and_light,
            &any_address(),
            POST,
        );
        assert_eq!(result, Validation::accept(2));

        let both_light = [keys[1], keys[2]];
        let result = validate(
            fixture.policy(),
            RoleType::Transaction,
            &both_light,
            &any_address(),
            POST,
        );
        assert_eq!(result, Validation::reject(2));
    }

    #[test]
    fn test_rejection_reports_matched_count() {
        let fixture = MultiSigFixture::uniform(6, 3);
        let mut recovered = fixture.valid_keys(3);
        recovered.extend(stray_public_keys(1));
        let result = validate(
            fixture.policy(),
            RoleType::Transaction,
            &recovered,
            &any_address(),
            POST,
        );
        assert_eq!(result, Validation::reject(3));
    }
}
