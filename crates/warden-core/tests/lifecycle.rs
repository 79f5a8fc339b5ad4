//! Installation and update of account keys built from shared fixtures

use assert_matches::assert_matches;
use warden_core::{AccountKey, KeyLimits, RoleType, WardenError};
use warden_testkit::{helpers::test_keys, sample_keys, sample_role_based, MultiSigFixture};

#[test]
fn every_sample_except_nil_is_installable() {
    let limits = KeyLimits::default();
    for (name, key) in sample_keys() {
        let result = key.check_installable(&limits);
        if key.is_nil() {
            assert_matches!(result, Err(WardenError::InvalidKey { .. }), "{name}");
        } else {
            assert!(result.is_ok(), "{name}: {result:?}");
        }
    }
}

#[test]
fn multisig_limit_is_enforced() {
    let limits = KeyLimits {
        max_multisig_keys: 3,
    };
    assert!(MultiSigFixture::uniform(3, 2).policy().check_installable(&limits).is_ok());
    assert_matches!(
        MultiSigFixture::uniform(4, 2).policy().check_installable(&limits),
        Err(WardenError::InvalidKey { .. })
    );
}

#[test]
fn unsatisfiable_multisig_is_not_installable() {
    let fixture = MultiSigFixture::weighted(&[1, 1], 3);
    assert_matches!(
        fixture.policy().check_installable(&KeyLimits::default()),
        Err(WardenError::InvalidKey { .. })
    );
}

#[test]
fn partial_role_update_keeps_unchanged_slots() {
    let current = sample_role_based();
    let replacement = AccountKey::public(test_keys(1)[0].public_key());
    let update = AccountKey::role_based(AccountKey::Nil, replacement.clone(), AccountKey::Nil)
        .unwrap();

    let updated = current.apply_update(&update, &KeyLimits::default()).unwrap();
    let (AccountKey::RoleBased(before), AccountKey::RoleBased(after)) = (&current, &updated)
    else {
        panic!("role-based update must stay role-based");
    };
    assert!(after.get(RoleType::Transaction).equal(before.get(RoleType::Transaction)));
    assert!(after.get(RoleType::AccountUpdate).equal(&replacement));
    assert!(after.get(RoleType::FeePayer).equal(before.get(RoleType::FeePayer)));
}

#[test]
fn partial_role_update_needs_role_based_current_key() {
    let update = AccountKey::role_based(AccountKey::Nil, AccountKey::Legacy, AccountKey::Legacy)
        .unwrap();
    assert_matches!(
        AccountKey::Legacy.apply_update(&update, &KeyLimits::default()),
        Err(WardenError::InvalidKey { .. })
    );
}

#[test]
fn whole_key_update_replaces_value() {
    let current = sample_role_based();
    let updated = current
        .apply_update(&AccountKey::Fail, &KeyLimits::default())
        .unwrap();
    assert!(updated.is_deactivated());
}
