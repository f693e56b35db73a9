//! Harness shell around the test input descriptor.
//!
//! ## Modules
//!
//! - `interfaces` - Collaborator traits (sign-in, results writer) and their errors
//! - `results` - Results file model
//! - `runner` - Silent-then-password loop over the input accounts
//!
//! ## Design
//!
//! The harness is synchronous. An executor wrapping an async authentication library blocks inside its trait
//! methods. Passwords flow from the descriptor straight into
//! [`SignInExecutor::acquire_token_by_password`] and are never logged or written to results.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod interfaces;
pub mod results;
pub mod runner;

pub use interfaces::{
    HarnessError, JsonResultsWriter, ResultsError, ResultsWriter, SignInError, SignInExecutor, SignInOutcome,
    SignInRequest,
};
pub use results::{CacheExecutorAccountResult, CacheExecutorResults};
pub use runner::{execute, run_accounts};
