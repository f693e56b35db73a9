#![forbid(unsafe_code)]
//! Load and validate the input descriptor of a cache-compatibility test run.
//!
//! A cache-compatibility test checks that a token cache written by one authentication library can be read by
//! another. Each harness run is driven by a small JSON file naming the scope to request, the cache artifact to
//! read or write, the results file to produce, and the lab accounts to sign in as. This crate turns that file's
//! text into an immutable [`TestInputDescriptor`] or fails with a [`LoadError`].
//!
//! ## Notes
//!
//! - This is a pure crate: **no IO**, no global state. Reading the input file, signing in, touching the cache
//!   artifact, and writing results all belong to the caller.
//! - Serialized keys (`Scope`, `CacheFilePath`, `LabUserDatas`, ...) live in the [`keys`] registry; in-memory
//!   names never leak into the wire form.
//! - Whether `LabUserDatas` may be absent or empty, and how strictly `Upn` is checked, is chosen through
//!   [`LoadOptions`]. The default requires `LabUserDatas` to be present and accepts an empty array.
//!
//! ## Examples
//! ```rust
//! use cachecompat_core::{LoadOptions, UsersPolicy, load_with};
//!
//! let raw = r#"{"Scope":"User.Read","CacheFilePath":"cache.bin","ResultsFilePath":"results.json"}"#;
//! assert!(cachecompat_core::load(raw).is_err());
//!
//! let options = LoadOptions::new().with_users(UsersPolicy::Optional);
//! let descriptor = load_with(raw, &options).unwrap();
//! assert!(descriptor.users().is_empty());
//! ```

mod descriptor;
mod error;
pub mod keys;
mod loader;
mod policy;
mod storage;
mod validate;

pub use descriptor::{AccountDescriptor, Password, TestInputDescriptor};
pub use error::{Absence, ErrorKind, LoadError};
pub use loader::{load, load_with};
pub use policy::{LoadOptions, UpnPolicy, UsersPolicy};
pub use storage::StorageType;
pub use validate::is_well_formed_upn;
