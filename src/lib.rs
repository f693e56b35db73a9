#![forbid(unsafe_code)]
//! Cache-compatibility test harness shell
//!
//! A cache-compatibility test signs in with one authentication library, lets it write a token cache, then
//! checks that a different library (or a different version) can read that cache silently. Every harness in the
//! chain is driven by the same JSON test input. This crate wraps the pure loader in `cachecompat_core` with
//! the pieces around it: reading the input file, rendering load errors, the per-account sign-in loop, the
//! results file, and the `cachecompat` CLI.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `harness`
//!   modules enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a programming error, use `.expect("INVARIANT: reason")` with
//!   a clear explanation.

pub mod cli;
pub mod diagnostics;
pub mod harness;
pub mod input;

pub use cachecompat_core::{
    AccountDescriptor, LoadError, LoadOptions, Password, StorageType, TestInputDescriptor, UpnPolicy, UsersPolicy,
    keys, load, load_with,
};

pub use diagnostics::InputDiagnostic;
pub use harness::{CacheExecutorResults, SignInExecutor, execute};
pub use input::{FsInputSource, InputError, load_input_file};
