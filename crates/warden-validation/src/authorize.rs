//! Decode, validate and price in one call

use crate::engine::validate;
use crate::gas::validation_gas;
use tracing::debug;
use warden_codec::{AccountKeyCodec, DagCborCodec};
use warden_core::{
    AccountKey, Address, ChainParams, ForkRule, GasSchedule, HardeningSchedule, PublicKey,
    Result, RoleType,
};

/// Inputs supplied by the transaction pipeline
#[derive(Debug, Clone, Copy)]
pub struct AuthorizationRequest<'a> {
    /// Account key bytes as stored with the account
    pub encoded_key: &'a [u8],
    /// Public keys recovered from the transaction signatures
    pub recovered: &'a [PublicKey],
    /// Sender account address
    pub from: &'a Address,
    /// Role the signatures act in
    pub role: RoleType,
}

/// Accepted signer set and its price
#[derive(Debug, Clone)]
pub struct Authorization {
    /// Decoded account key
    pub key: AccountKey,
    /// Matching signatures counted by validation
    pub valid_sig_count: u32,
    /// Validation gas on top of the base transaction cost
    pub extra_gas: u64,
}

/// Account key authorizer bound to a codec and gas schedule
#[derive(Debug, Clone)]
pub struct Authorizer<C = DagCborCodec> {
    codec: C,
    gas: GasSchedule,
    hardening: HardeningSchedule,
}

impl Authorizer<DagCborCodec> {
    /// Authorizer over DAG-CBOR keys, never hardened unless a schedule is set
    pub fn new(gas: GasSchedule) -> Self {
        Self::with_codec(DagCborCodec, gas)
    }

    /// Authorizer taking gas and hardening from chain parameters
    pub fn from_params(params: &ChainParams) -> Self {
        Self::new(params.gas.clone()).with_hardening(params.hardening.clone())
    }
}

impl<C: AccountKeyCodec> Authorizer<C> {
    /// Authorizer over an arbitrary key codec
    pub fn with_codec(codec: C, gas: GasSchedule) -> Self {
        Self {
            codec,
            gas,
            hardening: HardeningSchedule::default(),
        }
    }

    /// Replace the hardening schedule used by [`Authorizer::authorize_at`]
    pub fn with_hardening(mut self, hardening: HardeningSchedule) -> Self {
        self.hardening = hardening;
        self
    }

    /// Gas schedule in use
    pub fn gas(&self) -> &GasSchedule {
        &self.gas
    }

    /// Decode the stored key, validate the signer set under `rule` and price
    /// the accepted validation
    pub fn authorize(
        &self,
        request: AuthorizationRequest<'_>,
        rule: ForkRule,
    ) -> Result<Authorization> {
        let key = self.codec.decode(request.encoded_key)?;
        let valid_sig_count = validate(
            &key,
            request.role,
            request.recovered,
            request.from,
            rule,
        )
        .ensure_accepted()?;
        let extra_gas = validation_gas(&key, request.role, valid_sig_count, rule, &self.gas)?;

        debug!(
            codec = self.codec.name(),
            key_type = %key.key_type(),
            role = %request.role,
            valid_sig_count,
            extra_gas,
            "authorized"
        );
        Ok(Authorization {
            key,
            valid_sig_count,
            extra_gas,
        })
    }

    /// [`Authorizer::authorize`] under the rule in force at `block_height`
    pub fn authorize_at(
        &self,
        request: AuthorizationRequest<'_>,
        block_height: u64,
    ) -> Result<Authorization> {
        self.authorize(request, self.hardening.rule_at(block_height))
    }
}

/// Authorize a DAG-CBOR encoded key with `schedule`
pub fn authorize(
    request: AuthorizationRequest<'_>,
    rule: ForkRule,
    schedule: &GasSchedule,
) -> Result<Authorization> {
    Authorizer::new(schedule.clone()).authorize(request, rule)
}
