//! Harness I/O boundary interfaces
//!
//! This module defines trait-based abstractions for the collaborators the harness drives but does not own:
//! - Sign-in (silent acquisition from the cache artifact, username/password fallback)
//! - Results persistence
//!
//! Each authentication library under test supplies its own [`SignInExecutor`]. The harness only hands it the
//! values from the test input; it never performs network calls or touches the cache artifact itself.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use cachecompat_core::{AccountDescriptor, Password, StorageType, TestInputDescriptor};
use thiserror::Error;

use super::results::CacheExecutorResults;

/// Errors reported by a sign-in executor
#[derive(Debug, Error)]
pub enum SignInError {
    /// No usable token in the cache; the harness falls back to username/password.
    #[error("user interaction required: {0}")]
    UiRequired(String),

    #[error("sign-in failed: {0}")]
    Failed(String),
}

/// Errors from persisting results
#[derive(Debug, Error)]
pub enum ResultsError {
    #[error("failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Errors that abort a harness run
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("sign-in for '{upn}' failed: {source}")]
    SignIn {
        upn: String,
        #[source]
        source: SignInError,
    },

    #[error("failed to write results to '{}': {source}", .path.display())]
    ResultsWrite {
        path: PathBuf,
        #[source]
        source: ResultsError,
    },
}

// ============================================================================
// Sign-in Interface
// ============================================================================

/// Everything an executor needs to acquire a token for one account.
///
/// The password is deliberately not part of the request; it is passed only to
/// [`SignInExecutor::acquire_token_by_password`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignInRequest<'a> {
    pub scope: &'a str,
    pub authority: &'a str,
    pub client_id: &'a str,
    pub upn: &'a str,
    /// The cache artifact the executor's token cache must be bound to.
    pub cache_path: &'a Path,
    /// Cache formats to read and write; `None` means the executor's default.
    pub storage_type: Option<StorageType>,
}

impl<'a> SignInRequest<'a> {
    pub fn new(descriptor: &'a TestInputDescriptor, account: &'a AccountDescriptor) -> Self {
        SignInRequest {
            scope: descriptor.scope(),
            authority: account.authority(),
            client_id: account.client_id(),
            upn: account.upn(),
            cache_path: descriptor.cache_path(),
            storage_type: descriptor.storage_type(),
        }
    }
}

/// A token acquired by an executor.
#[derive(Clone, PartialEq, Eq)]
pub struct SignInOutcome {
    /// Username of the account the token was issued to.
    pub username: String,
    pub access_token: String,
}

impl SignInOutcome {
    pub fn new(username: impl Into<String>, access_token: impl Into<String>) -> Self {
        SignInOutcome {
            username: username.into(),
            access_token: access_token.into(),
        }
    }

    pub fn has_access_token(&self) -> bool {
        !self.access_token.trim().is_empty()
    }
}

impl fmt::Debug for SignInOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignInOutcome")
            .field("username", &self.username)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Acquire tokens with the authentication library under test.
pub trait SignInExecutor {
    /// Acquire a token from the cache artifact without credentials.
    ///
    /// Return [`SignInError::UiRequired`] when the cache holds nothing usable for the account.
    fn acquire_token_silent(&mut self, request: &SignInRequest<'_>) -> Result<SignInOutcome, SignInError>;

    /// Acquire a token with the account's credentials, populating the cache artifact.
    fn acquire_token_by_password(
        &mut self,
        request: &SignInRequest<'_>,
        password: &Password,
    ) -> Result<SignInOutcome, SignInError>;
}

// ============================================================================
// Results Writer Interface
// ============================================================================

/// Persist the outcome of a run.
pub trait ResultsWriter {
    fn write_results(&self, path: &Path, results: &CacheExecutorResults) -> Result<(), ResultsError>;
}

/// Writes results as pretty-printed JSON, creating parent directories as needed.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonResultsWriter;

impl ResultsWriter for JsonResultsWriter {
    fn write_results(&self, path: &Path, results: &CacheExecutorResults) -> Result<(), ResultsError> {
        let json = serde_json::to_string_pretty(results)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_debug_redacts_token() {
        let outcome = SignInOutcome::new("a@b.com", "eyJ0eXAiOiJKV1Qi");
        let debug = format!("{:?}", outcome);
        assert!(debug.contains("a@b.com"));
        assert!(!debug.contains("eyJ0"));
    }

    #[test]
    fn test_whitespace_token_is_no_token() {
        assert!(!SignInOutcome::new("a@b.com", "  \t").has_access_token());
        assert!(SignInOutcome::new("a@b.com", "t").has_access_token());
    }

    #[test]
    fn test_request_carries_descriptor_values() {
        let account =
            AccountDescriptor::new("a@b.com", "secret", "https://login.example.com/t", "cid").unwrap();
        let descriptor =
            TestInputDescriptor::new("User.Read", "caches/v3.bin", "r.json", vec![account]).unwrap();
        let request = SignInRequest::new(&descriptor, &descriptor.users()[0]);
        assert_eq!(request.scope, "User.Read");
        assert_eq!(request.upn, "a@b.com");
        assert_eq!(request.client_id, "cid");
        assert_eq!(request.authority, "https://login.example.com/t");
        assert_eq!(request.cache_path, Path::new("caches/v3.bin"));
        assert_eq!(request.storage_type, None);
        assert!(!format!("{:?}", request).contains("secret"));
    }

    #[test]
    fn test_request_carries_storage_type() {
        let descriptor = TestInputDescriptor::new("User.Read", "caches/v3.bin", "r.json", vec![])
            .unwrap()
            .with_storage_type(StorageType::MSAL_V2 | StorageType::MSAL_V3);
        let account =
            AccountDescriptor::new("a@b.com", "secret", "https://login.example.com/t", "cid").unwrap();
        let request = SignInRequest::new(&descriptor, &account);
        assert_eq!(request.storage_type, Some(StorageType::MSAL_V2 | StorageType::MSAL_V3));
    }

    #[test]
    fn test_json_writer_creates_parent_dirs() {
        let dir = std::env::temp_dir().join(format!("cachecompat_writer_{}", std::process::id()));
        let path = dir.join("nested").join("results.json");
        JsonResultsWriter
            .write_results(&path, &CacheExecutorResults::error("boom"))
            .unwrap();
        let written = fs::read_to_string(&path).unwrap();
        let _ = fs::remove_dir_all(&dir);
        assert!(written.contains("\"IsError\": true"));
    }
}
