//! Warden core: account key model
//!
//! This crate defines the closed set of account-key policies, the discriminant
//! registry used by the wire codecs, the key material they carry, the unified
//! error type, and the chain parameters that drive validation and pricing.
//!
//! Everything here is a pure value type. Nothing holds shared state, so every
//! type is `Send + Sync` and safe to use from any number of threads.

/// Account key variants and structural equality
pub mod account_key;
/// Chain parameters: gas constants, hardening schedule, key limits
pub mod config;
/// Public keys and account addresses
pub mod crypto;
/// Unified error handling
pub mod errors;
/// Installation and update rules
pub mod install;
/// Discriminants, roles and fork rules
pub mod key_type;

pub use account_key::{AccountKey, RoleBasedKey, WeightedMultiSig, WeightedPublicKey};
pub use config::{ChainParams, GasSchedule, HardeningSchedule, KeyLimits, WardenConfig};
pub use crypto::{Address, PublicKey, ADDRESS_LENGTH, PUBLIC_KEY_LENGTH};
pub use errors::{Result, WardenError};
pub use key_type::{AccountKeyType, ForkRule, RoleType};
