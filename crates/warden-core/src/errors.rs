//! Unified error system for Warden
//!
//! Every crate in the workspace returns this error type. Variants map onto the
//! failure classes of account-key handling: malformed policies, unknown
//! discriminants, codec failures, rejected signer sets and gas pricing misuse.

use serde::{Deserialize, Serialize};

/// Unified error type for all Warden operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum WardenError {
    /// Account key violates a construction, installation or update rule
    #[error("Invalid account key: {message}")]
    InvalidKey {
        /// Error message describing the violated rule
        message: String,
    },

    /// Encoded key carries a discriminant outside the known variant set
    #[error("Unsupported account key type: {discriminant}")]
    UnsupportedKeyType {
        /// The discriminant found at the head of the encoding
        discriminant: u64,
    },

    /// Encoded payload is truncated, over-length or structurally inconsistent
    #[error("Decode error: {message}")]
    Decode {
        /// Error message describing the malformed payload
        message: String,
    },

    /// Serializer failed to produce an encoding
    #[error("Encode error: {message}")]
    Encode {
        /// Error message describing the serializer failure
        message: String,
    },

    /// Recovered signers do not satisfy the account key
    #[error("Invalid signer: {message}")]
    InvalidSigner {
        /// Error message describing the rejected signer set
        message: String,
    },

    /// Gas was priced for a signature count no accepted validation produces
    #[error("Pricing contract violation: {message}")]
    PricingContract {
        /// Error message describing the violation
        message: String,
    },

    /// Gas arithmetic exceeded u64
    #[error("Gas overflow: {message}")]
    GasOverflow {
        /// Error message describing the overflowing computation
        message: String,
    },

    /// Chain parameters could not be loaded or are inconsistent
    #[error("Config error: {message}")]
    Config {
        /// Error message describing the configuration problem
        message: String,
    },
}

impl WardenError {
    /// Create an invalid key error
    pub fn invalid_key(message: impl Into<String>) -> Self {
        Self::InvalidKey {
            message: message.into(),
        }
    }

    /// Create an unsupported key type error
    pub fn unsupported_key_type(discriminant: u64) -> Self {
        Self::UnsupportedKeyType { discriminant }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an encode error
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode {
            message: message.into(),
        }
    }

    /// Create an invalid signer error
    pub fn invalid_signer(message: impl Into<String>) -> Self {
        Self::InvalidSigner {
            message: message.into(),
        }
    }

    /// Create a pricing contract violation error
    pub fn pricing_contract(message: impl Into<String>) -> Self {
        Self::PricingContract {
            message: message.into(),
        }
    }

    /// Create a gas overflow error
    pub fn gas_overflow(message: impl Into<String>) -> Self {
        Self::GasOverflow {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Standard Result type for Warden operations
pub type Result<T> = std::result::Result<T, WardenError>;

impl From<std::io::Error> for WardenError {
    fn from(err: std::io::Error) -> Self {
        Self::config(err.to_string())
    }
}

impl From<toml::de::Error> for WardenError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("Invalid TOML: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = WardenError::invalid_key("threshold must be positive");
        assert!(matches!(err, WardenError::InvalidKey { .. }));
        assert_eq!(
            err.to_string(),
            "Invalid account key: threshold must be positive"
        );
    }

    #[test]
    fn test_unsupported_key_type_display() {
        let err = WardenError::unsupported_key_type(9);
        assert_eq!(err.to_string(), "Unsupported account key type: 9");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "params.toml");
        let err = WardenError::from(io_err);
        assert!(matches!(err, WardenError::Config { .. }));
    }
}
