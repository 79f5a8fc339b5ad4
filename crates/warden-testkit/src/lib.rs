//! Warden Testing Infrastructure
//!
//! Deterministic keys, account-key fixtures and proptest strategies shared by
//! the test suites of every Warden crate.
//!
//! # Usage
//!
//! Add this to your crate's `Cargo.toml` dev-dependencies:
//! ```toml
//! [dev-dependencies]
//! warden-testkit = { path = "../warden-testkit" }
//! ```
//!
//! Then in your tests:
//! ```rust,no_run
//! use warden_testkit::*;
//!
//! #[test]
//! fn my_test() {
//!     init_test_tracing();
//!     let fixture = MultiSigFixture::uniform(6, 3);
//!     let signers = fixture.valid_keys(3);
//!     // ... test logic
//! }
//! ```

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

pub mod keys;
pub mod policies;
pub mod strategies;

pub use keys::{helpers, KeySetBuilder, KeyTestFixture};
pub use policies::{sample_keys, sample_role_based, MultiSigFixture};

/// Install a test-writer tracing subscriber once per process.
///
/// Filtering follows `RUST_LOG`; repeated calls are no-ops.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
