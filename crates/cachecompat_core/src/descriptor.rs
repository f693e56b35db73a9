//! Descriptor entities.
//!
//! A [`TestInputDescriptor`] owns its accounts by value. Fields are private and only exposed through
//! accessors, so a descriptor cannot change after it has been loaded or constructed.

use std::fmt;
use std::path::Path;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::LoadError;
use crate::keys::{self, FieldId, TextField};
use crate::policy::UpnPolicy;
use crate::storage::StorageType;
use crate::validate;

/// A plaintext sign-in credential.
///
/// `Debug` and `Display` print `<redacted>`, so accounts can be logged with `?account` safely. The value is
/// only reachable through [`Password::expose`].
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Password(String);

impl Password {
    pub fn new(value: impl Into<String>) -> Self {
        Password(value.into())
    }

    /// The plaintext credential, for handing to a sign-in executor.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

impl fmt::Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

impl Serialize for Password {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// One lab account to sign in as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDescriptor {
    upn: String,
    password: Password,
    authority: String,
    client_id: String,
}

impl AccountDescriptor {
    /// Build an account, applying the same rules as the loader (lenient UPN policy).
    ///
    /// ## Errors
    /// - `MissingField` if `upn`, `authority` or `client_id` is empty.
    /// - `TypeMismatch` if `authority` is not an absolute URL with a host.
    pub fn new(
        upn: impl Into<String>,
        password: impl Into<String>,
        authority: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Result<Self, LoadError> {
        let account = AccountDescriptor {
            upn: upn.into(),
            password: Password::new(password),
            authority: authority.into(),
            client_id: client_id.into(),
        };
        for (field, value) in [
            (TextField::Upn, account.upn.as_str()),
            (TextField::Password, account.password.expose()),
            (TextField::Authority, account.authority.as_str()),
            (TextField::ClientId, account.client_id.as_str()),
        ] {
            validate::check_text(field.rule(), field.key(), value)?;
        }
        validate::check_upn(TextField::Upn.key(), &account.upn, UpnPolicy::Lenient)?;
        Ok(account)
    }

    /// Assemble an account whose values the loader has already validated.
    pub(crate) fn from_validated(upn: &str, password: &str, authority: &str, client_id: &str) -> Self {
        AccountDescriptor {
            upn: upn.to_string(),
            password: Password::new(password),
            authority: authority.to_string(),
            client_id: client_id.to_string(),
        }
    }

    pub fn upn(&self) -> &str {
        &self.upn
    }

    pub fn password(&self) -> &Password {
        &self.password
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

impl Serialize for AccountDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("AccountDescriptor", 4)?;
        s.serialize_field(keys::key(FieldId::Upn), &self.upn)?;
        s.serialize_field(keys::key(FieldId::Password), &self.password)?;
        s.serialize_field(keys::key(FieldId::Authority), &self.authority)?;
        s.serialize_field(keys::key(FieldId::ClientId), &self.client_id)?;
        s.end()
    }
}

/// Configuration of one cache-compatibility test run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestInputDescriptor {
    scope: String,
    cache_file_path: String,
    results_file_path: String,
    storage_type: Option<StorageType>,
    users: Vec<AccountDescriptor>,
}

impl TestInputDescriptor {
    /// Build a descriptor from already-constructed accounts.
    ///
    /// Used by generators that write input files for other harnesses. The scope and both paths must be
    /// non-empty; paths are not checked for existence.
    pub fn new(
        scope: impl Into<String>,
        cache_file_path: impl Into<String>,
        results_file_path: impl Into<String>,
        users: Vec<AccountDescriptor>,
    ) -> Result<Self, LoadError> {
        let descriptor = TestInputDescriptor {
            scope: scope.into(),
            cache_file_path: cache_file_path.into(),
            results_file_path: results_file_path.into(),
            storage_type: None,
            users,
        };
        for (field, value) in [
            (TextField::Scope, descriptor.scope.as_str()),
            (TextField::CacheFilePath, descriptor.cache_file_path.as_str()),
            (TextField::ResultsFilePath, descriptor.results_file_path.as_str()),
        ] {
            validate::check_text(field.rule(), field.key(), value)?;
        }
        Ok(descriptor)
    }

    pub(crate) fn from_validated(
        scope: &str,
        cache_file_path: &str,
        results_file_path: &str,
        storage_type: Option<StorageType>,
        users: Vec<AccountDescriptor>,
    ) -> Self {
        TestInputDescriptor {
            scope: scope.to_string(),
            cache_file_path: cache_file_path.to_string(),
            results_file_path: results_file_path.to_string(),
            storage_type,
            users,
        }
    }

    /// Select the cache formats the executor binds to.
    pub fn with_storage_type(mut self, storage_type: StorageType) -> Self {
        self.storage_type = Some(storage_type);
        self
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// The cache artifact path exactly as written in the input.
    pub fn cache_file_path(&self) -> &str {
        &self.cache_file_path
    }

    pub fn cache_path(&self) -> &Path {
        Path::new(&self.cache_file_path)
    }

    /// The results path exactly as written in the input.
    pub fn results_file_path(&self) -> &str {
        &self.results_file_path
    }

    pub fn results_path(&self) -> &Path {
        Path::new(&self.results_file_path)
    }

    /// Cache formats to bind to; `None` leaves the choice to the executor.
    pub fn storage_type(&self) -> Option<StorageType> {
        self.storage_type
    }

    /// Accounts in source order.
    pub fn users(&self) -> &[AccountDescriptor] {
        &self.users
    }

    /// Render the descriptor in its wire form.
    ///
    /// The output contains plaintext passwords; it is meant for input files, never for logs.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Like [`to_json`](Self::to_json), pretty-printed.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for TestInputDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.storage_type.is_some() { 5 } else { 4 };
        let mut s = serializer.serialize_struct("TestInputDescriptor", len)?;
        s.serialize_field(keys::key(FieldId::Scope), &self.scope)?;
        s.serialize_field(keys::key(FieldId::CacheFilePath), &self.cache_file_path)?;
        s.serialize_field(keys::key(FieldId::ResultsFilePath), &self.results_file_path)?;
        match self.storage_type {
            Some(storage_type) => s.serialize_field(keys::key(FieldId::StorageType), &storage_type.bits())?,
            None => s.skip_field(keys::key(FieldId::StorageType))?,
        }
        s.serialize_field(keys::key(FieldId::LabUserDatas), &self.users)?;
        s.end()
    }
}
