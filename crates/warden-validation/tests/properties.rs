//! Relations between the pre- and post-hardening rules

use proptest::prelude::*;
use warden_core::{Address, ForkRule, GasSchedule, RoleType};
use warden_testkit::{helpers::stray_public_keys, MultiSigFixture};
use warden_validation::{validate, validation_gas};

fn signer_mix() -> impl Strategy<Value = (usize, u32, Vec<usize>, usize)> {
    (1usize..=10).prop_flat_map(|keys| {
        (
            Just(keys),
            1..=keys as u32,
            proptest::collection::vec(0..keys, 0..=12),
            0usize..=3,
        )
    })
}

proptest! {
    #[test]
    fn hardening_only_removes_acceptance((keys, threshold, picks, strays) in signer_mix()) {
        let fixture = MultiSigFixture::uniform(keys, threshold);
        let valid = fixture.valid_keys(keys);
        let mut recovered: Vec<_> = picks.iter().map(|&i| valid[i]).collect();
        recovered.extend(stray_public_keys(strays));
        let from = Address::default();

        let pre = validate(fixture.policy(), RoleType::Transaction, &recovered, &from, ForkRule::PreHardening);
        let post = validate(fixture.policy(), RoleType::Transaction, &recovered, &from, ForkRule::PostHardening);

        prop_assert!(!post.accepted || pre.accepted);
        prop_assert_eq!(pre.valid_sig_count, post.valid_sig_count);

        if post.accepted {
            let schedule = GasSchedule::default();
            let pre_gas = validation_gas(fixture.policy(), RoleType::Transaction, pre.valid_sig_count, ForkRule::PreHardening, &schedule).unwrap();
            let post_gas = validation_gas(fixture.policy(), RoleType::Transaction, post.valid_sig_count, ForkRule::PostHardening, &schedule).unwrap();
            prop_assert!(post_gas <= pre_gas);
        }
    }
}
