//! Warden validation: signer acceptance and gas pricing
//!
//! [`validate`] decides whether recovered signer keys satisfy an account key
//! for a role. The gas functions price what an accepted validation reports.
//! [`Authorizer`] chains decoding, validation and pricing for the transaction
//! pipeline.
//!
//! Every function is pure; the fork rule is passed in on each call.

/// Decode-validate-price pipeline
pub mod authorize;
/// Validation engine
pub mod engine;
/// Gas accounting
pub mod gas;

pub use authorize::{authorize, Authorization, AuthorizationRequest, Authorizer};
pub use engine::{validate, Validation};
pub use gas::{account_creation_gas, signature_gas, validation_gas};

pub use warden_core::{Result, WardenError};
