//! End-to-end authorization and account creation pricing

use assert_matches::assert_matches;
use warden_codec::{encode, JsonCodec};
use warden_core::{
    AccountKey, ChainParams, ForkRule, GasSchedule, HardeningSchedule, RoleType, WardenError,
};
use warden_testkit::{
    helpers::stray_public_keys, init_test_tracing, sample_role_based, KeyTestFixture,
    MultiSigFixture,
};
use warden_validation::{
    account_creation_gas, authorize, AuthorizationRequest, Authorizer,
};

#[test]
fn authorizes_and_prices_multisig() {
    init_test_tracing();
    let m = MultiSigFixture::uniform(6, 3);
    let encoded = encode(m.policy()).unwrap();
    let recovered = m.valid_keys(4);
    let from = KeyTestFixture::from_seed_string("account").address();
    let schedule = GasSchedule::default();

    let request = AuthorizationRequest {
        encoded_key: &encoded,
        recovered: &recovered,
        from: &from,
        role: RoleType::Transaction,
    };

    let post = authorize(request, ForkRule::PostHardening, &schedule).unwrap();
    assert_eq!(post.valid_sig_count, 4);
    assert_eq!(post.extra_gas, 3 * schedule.validation_gas_per_key);
    assert!(post.key.equal(m.policy()));

    let pre = authorize(request, ForkRule::PreHardening, &schedule).unwrap();
    assert_eq!(pre.extra_gas, 5 * schedule.validation_gas_per_key);
}

#[test]
fn rejected_signers_surface_invalid_signer() {
    let m = MultiSigFixture::uniform(6, 3);
    let encoded = encode(m.policy()).unwrap();
    let mut recovered = m.valid_keys(3);
    recovered.extend(stray_public_keys(1));
    let from = KeyTestFixture::from_seed_string("account").address();
    let request = AuthorizationRequest {
        encoded_key: &encoded,
        recovered: &recovered,
        from: &from,
        role: RoleType::Transaction,
    };

    let authorizer = Authorizer::new(GasSchedule::default());
    assert!(authorizer.authorize(request, ForkRule::PreHardening).is_ok());
    assert_matches!(
        authorizer.authorize(request, ForkRule::PostHardening),
        Err(WardenError::InvalidSigner { .. })
    );
}

#[test]
fn malformed_key_bytes_surface_decode_errors() {
    let signer = KeyTestFixture::from_seed_string("signer");
    let recovered = [signer.public_key()];
    let from = signer.address();
    let authorizer = Authorizer::new(GasSchedule::default());

    let request = |encoded_key: &'static [u8]| AuthorizationRequest {
        encoded_key,
        recovered: &recovered,
        from: &from,
        role: RoleType::Transaction,
    };
    assert_matches!(
        authorizer.authorize(request(&[0x81, 0x08]), ForkRule::PostHardening),
        Err(WardenError::UnsupportedKeyType { discriminant: 8 })
    );
    assert_matches!(
        authorizer.authorize(request(&[0x82, 0x02]), ForkRule::PostHardening),
        Err(WardenError::Decode { .. })
    );
}

#[test]
fn hardening_schedule_selects_rule_by_height() {
    let m = MultiSigFixture::uniform(6, 3);
    let encoded = encode(m.policy()).unwrap();
    let mut recovered = m.valid_keys(6);
    recovered.extend(m.valid_keys(2));
    let from = KeyTestFixture::from_seed_string("account").address();
    let request = AuthorizationRequest {
        encoded_key: &encoded,
        recovered: &recovered,
        from: &from,
        role: RoleType::Transaction,
    };

    let params = ChainParams {
        hardening: HardeningSchedule::at(100),
        ..ChainParams::default()
    };
    let authorizer = Authorizer::from_params(&params);
    assert!(authorizer.authorize_at(request, 99).is_ok());
    assert_matches!(
        authorizer.authorize_at(request, 100),
        Err(WardenError::InvalidSigner { .. })
    );
}

#[test]
fn json_codec_authorizer() {
    let signer = KeyTestFixture::from_seed_string("json-signer");
    let key = AccountKey::public(signer.public_key());
    let encoded = warden_codec::to_json(&key).unwrap().into_bytes();
    let recovered = [signer.public_key()];
    let from = signer.address();

    let authorizer = Authorizer::with_codec(JsonCodec, GasSchedule::default());
    let authorization = authorizer
        .authorize(
            AuthorizationRequest {
                encoded_key: &encoded,
                recovered: &recovered,
                from: &from,
                role: RoleType::FeePayer,
            },
            ForkRule::PostHardening,
        )
        .unwrap();
    assert_eq!(authorization.valid_sig_count, 1);
    assert_eq!(authorization.extra_gas, 0);
}

#[test]
fn creation_gas_per_variant() {
    let schedule = GasSchedule::default();
    let per_key = schedule.account_creation_gas_per_key;
    let public = AccountKey::public(KeyTestFixture::from_seed_string("creation").public_key());

    assert_eq!(account_creation_gas(&AccountKey::Legacy, &schedule).unwrap(), 0);
    assert_eq!(account_creation_gas(&public, &schedule).unwrap(), per_key);
    assert_eq!(
        account_creation_gas(MultiSigFixture::uniform(4, 2).policy(), &schedule).unwrap(),
        4 * per_key
    );
    // public + 2-key multisig + public
    assert_eq!(
        account_creation_gas(&sample_role_based(), &schedule).unwrap(),
        4 * per_key
    );
}

#[test]
fn creation_gas_overflow_is_reported() {
    let schedule = GasSchedule {
        account_creation_gas_per_key: u64::MAX,
        ..GasSchedule::default()
    };
    assert_matches!(
        account_creation_gas(MultiSigFixture::uniform(2, 1).policy(), &schedule),
        Err(WardenError::GasOverflow { .. })
    );
    assert_matches!(
        account_creation_gas(&sample_role_based(), &schedule),
        Err(WardenError::GasOverflow { .. })
    );
}
