//! Chain parameters consumed by account-key validation and pricing
//!
//! Parameters load from TOML, then accept `WARDEN_`-prefixed environment
//! overrides, then get validated. Every field has a default so an empty file
//! is a valid configuration.

use crate::{ForkRule, Result, WardenError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "WARDEN_";

/// Per-key gas charged for multisig validation beyond the first signature
pub const TX_VALIDATION_GAS_PER_KEY: u64 = 15_000;

/// Per-key gas charged when a key is installed on an account
pub const TX_ACCOUNT_CREATION_GAS_PER_KEY: u64 = 20_000;

/// Default maximum number of keys in a weighted multisig policy
pub const MAX_NUM_KEYS_FOR_MULTISIG: usize = 10;

/// Core trait for Warden configuration types
pub trait WardenConfig: Clone + Default + Send + Sync + 'static {
    /// Load configuration from a file
    fn load_from_file(path: &Path) -> Result<Self>;

    /// Merge with environment variables
    fn merge_with_env(&mut self) -> Result<()>;

    /// Validate the configuration
    fn validate(&self) -> Result<()>;
}

/// Gas constants for account keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GasSchedule {
    /// Charged per matched signature after the first
    pub validation_gas_per_key: u64,
    /// Charged per installed key
    pub account_creation_gas_per_key: u64,
    /// Validation charge for single-key variants
    pub validation_gas_default: u64,
    /// Installation charge for variants without key material
    pub account_creation_gas_default: u64,
}

impl Default for GasSchedule {
    fn default() -> Self {
        Self {
            validation_gas_per_key: TX_VALIDATION_GAS_PER_KEY,
            account_creation_gas_per_key: TX_ACCOUNT_CREATION_GAS_PER_KEY,
            validation_gas_default: 0,
            account_creation_gas_default: 0,
        }
    }
}

/// Activation of the hardened multisig validation rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HardeningSchedule {
    /// First block height validated under the hardened rule; `None` keeps the
    /// historical rule forever
    pub activation_height: Option<u64>,
}

impl HardeningSchedule {
    /// Schedule activating at `height`
    pub fn at(height: u64) -> Self {
        Self {
            activation_height: Some(height),
        }
    }

    /// Rule in force for an action included at `block_height`
    pub fn rule_at(&self, block_height: u64) -> ForkRule {
        let active = self
            .activation_height
            .is_some_and(|activation| block_height >= activation);
        ForkRule::from_activation(active)
    }
}

/// Protocol limits on installable keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeyLimits {
    /// Maximum number of weighted keys in one multisig policy
    pub max_multisig_keys: usize,
}

impl Default for KeyLimits {
    fn default() -> Self {
        Self {
            max_multisig_keys: MAX_NUM_KEYS_FOR_MULTISIG,
        }
    }
}

/// All account-key chain parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChainParams {
    /// Gas constants
    pub gas: GasSchedule,
    /// Hardened-rule activation
    pub hardening: HardeningSchedule,
    /// Installation limits
    pub limits: KeyLimits,
}

impl ChainParams {
    /// Parse parameters from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides from an iterator of environment-style pairs.
    ///
    /// Keys without the [`ENV_PREFIX`] are ignored; unknown prefixed keys are
    /// an error so typos do not silently fall back to defaults.
    pub fn merge_with_vars<I, K, V>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let Some(name) = key.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let value = value.as_ref();
            match name {
                "VALIDATION_GAS_PER_KEY" => {
                    self.gas.validation_gas_per_key = parse_var(name, value)?;
                }
                "ACCOUNT_CREATION_GAS_PER_KEY" => {
                    self.gas.account_creation_gas_per_key = parse_var(name, value)?;
                }
                "VALIDATION_GAS_DEFAULT" => {
                    self.gas.validation_gas_default = parse_var(name, value)?;
                }
                "ACCOUNT_CREATION_GAS_DEFAULT" => {
                    self.gas.account_creation_gas_default = parse_var(name, value)?;
                }
                "HARDENING_ACTIVATION_HEIGHT" => {
                    self.hardening.activation_height = if value.is_empty() {
                        None
                    } else {
                        Some(parse_var(name, value)?)
                    };
                }
                "MAX_MULTISIG_KEYS" => {
                    self.limits.max_multisig_keys = parse_var(name, value)?;
                }
                other => {
                    return Err(WardenError::config(format!(
                        "unknown override {ENV_PREFIX}{other}"
                    )));
                }
            }
            tracing::debug!(key = name, value, "applied chain parameter override");
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| WardenError::config(format!("{ENV_PREFIX}{name}={value}: {e}")))
}

impl WardenConfig for ChainParams {
    fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            WardenError::config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    fn merge_with_env(&mut self) -> Result<()> {
        self.merge_with_vars(std::env::vars())
    }

    fn validate(&self) -> Result<()> {
        let max_keys = self.limits.max_multisig_keys;
        if max_keys == 0 {
            return Err(WardenError::config("max_multisig_keys must be at least 1"));
        }
        let max_keys = u64::try_from(max_keys)
            .map_err(|_| WardenError::config("max_multisig_keys does not fit in u64"))?;
        for (name, per_key) in [
            ("validation_gas_per_key", self.gas.validation_gas_per_key),
            (
                "account_creation_gas_per_key",
                self.gas.account_creation_gas_per_key,
            ),
        ] {
            if per_key.checked_mul(max_keys).is_none() {
                return Err(WardenError::config(format!(
                    "{name} overflows u64 for {max_keys} keys"
                )));
            }
        }
        Ok(())
    }
}
