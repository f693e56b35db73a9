//! Wire vocabulary for the test input contract.
//!
//! Every field of [`TestInputDescriptor`](crate::TestInputDescriptor) and
//! [`AccountDescriptor`](crate::AccountDescriptor) has exactly one entry in [`FIELDS`], which maps the stable
//! [`FieldId`] to its serialized key, its Rust field name, the entity that owns it, and the validation rule the
//! loader applies to it. The loader and the serializer both read keys from this table.
//!
//! ## Notes
//! - Keys are the interoperability contract with generators written in other languages. They are PascalCase and
//!   lookup via [`from_key`] is **case-sensitive**.
//! - This module is vocabulary only. It does not parse input.
//!
//! ## Examples
//! ```rust
//! use cachecompat_core::keys::{self, FieldId};
//!
//! assert_eq!(keys::key(FieldId::CacheFilePath), "CacheFilePath");
//! assert_eq!(keys::from_key("LabUserDatas"), Some(FieldId::LabUserDatas));
//! assert_eq!(keys::from_key("scope"), None);
//! ```

use std::fmt;

/// Entity that owns a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    /// The root test input descriptor.
    Descriptor,
    /// One entry of `LabUserDatas`.
    Account,
}

/// Validation rule applied to a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Requirement {
    /// A JSON string checked by a [`TextRule`].
    Text(TextRule),
    /// Optional cache-format flags; see [`StorageType`](crate::StorageType).
    StorageFlags,
    /// An array of account objects. Presence is governed by [`UsersPolicy`](crate::UsersPolicy).
    Accounts,
}

/// Rule for a string-valued field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextRule {
    /// Present, a string, and non-empty.
    NonEmpty,
    /// Present and a string; the empty string is accepted.
    Present,
    /// Present, non-empty, and an absolute URL with a host.
    Url,
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Requirement::Text(TextRule::NonEmpty) => "non-empty",
            Requirement::Text(TextRule::Present) => "present",
            Requirement::Text(TextRule::Url) => "url",
            Requirement::StorageFlags => "storage-flags",
            Requirement::Accounts => "accounts",
        };
        f.write_str(name)
    }
}

/// Stable identifier for contract fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    // Descriptor
    Scope,
    CacheFilePath,
    ResultsFilePath,
    StorageType,
    LabUserDatas,

    // Account
    Upn,
    Password,
    Authority,
    ClientId,
}

/// The string-valued subset of [`FieldId`].
///
/// The loader and the validating constructors go through this type, so string rules are only ever applied to
/// fields that hold strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Scope,
    CacheFilePath,
    ResultsFilePath,
    Upn,
    Password,
    Authority,
    ClientId,
}

impl TextField {
    pub const fn id(self) -> FieldId {
        match self {
            TextField::Scope => FieldId::Scope,
            TextField::CacheFilePath => FieldId::CacheFilePath,
            TextField::ResultsFilePath => FieldId::ResultsFilePath,
            TextField::Upn => FieldId::Upn,
            TextField::Password => FieldId::Password,
            TextField::Authority => FieldId::Authority,
            TextField::ClientId => FieldId::ClientId,
        }
    }

    pub const fn rule(self) -> TextRule {
        match self {
            TextField::Password => TextRule::Present,
            TextField::Authority => TextRule::Url,
            TextField::Scope
            | TextField::CacheFilePath
            | TextField::ResultsFilePath
            | TextField::Upn
            | TextField::ClientId => TextRule::NonEmpty,
        }
    }

    pub fn key(self) -> &'static str {
        key(self.id())
    }
}

/// Metadata for a contract field.
#[derive(Debug, Clone, Copy)]
pub struct FieldInfo {
    pub id: FieldId,
    /// Serialized key, e.g. `"ClientId"`.
    pub key: &'static str,
    /// In-memory field name, e.g. `"client_id"`.
    pub rust_name: &'static str,
    pub entity: Entity,
    pub requirement: Requirement,
    /// Whether the value is a credential that must never reach logs or results.
    pub sensitive: bool,
}

/// Registry of all contract fields, in validation order.
pub const FIELDS: &[FieldInfo] = &[
    // Descriptor
    text(TextField::Scope, "Scope", "scope", Entity::Descriptor),
    text(TextField::CacheFilePath, "CacheFilePath", "cache_file_path", Entity::Descriptor),
    text(TextField::ResultsFilePath, "ResultsFilePath", "results_file_path", Entity::Descriptor),
    info(
        FieldId::StorageType,
        "StorageType",
        "storage_type",
        Entity::Descriptor,
        Requirement::StorageFlags,
    ),
    info(FieldId::LabUserDatas, "LabUserDatas", "users", Entity::Descriptor, Requirement::Accounts),
    // Account
    text(TextField::Upn, "Upn", "upn", Entity::Account),
    FieldInfo {
        sensitive: true,
        ..text(TextField::Password, "Password", "password", Entity::Account)
    },
    text(TextField::Authority, "Authority", "authority", Entity::Account),
    text(TextField::ClientId, "ClientId", "client_id", Entity::Account),
];

/// Pseudo-field name used when the document itself has the wrong shape.
pub const ROOT: &str = "<root>";

/// Return the serialized key for a field.
pub fn key(id: FieldId) -> &'static str {
    info_for(id).key
}

/// Return the validation rule for a field.
pub fn requirement(id: FieldId) -> Requirement {
    info_for(id).requirement
}

/// Return the full metadata entry for a field.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: FieldId) -> &'static FieldInfo {
    FIELDS
        .iter()
        .find(|f| f.id == id)
        .expect("INVARIANT: every FieldId has a registry entry")
}

/// Resolve a serialized key to its field.
///
/// ## Notes
/// - Matching is **case-sensitive**: `"upn"` does not resolve.
pub fn from_key(s: &str) -> Option<FieldId> {
    FIELDS.iter().find(|f| f.key == s).map(|f| f.id)
}

/// Iterate the fields owned by `entity`, in validation order.
pub fn fields_of(entity: Entity) -> impl Iterator<Item = &'static FieldInfo> {
    FIELDS.iter().filter(move |f| f.entity == entity)
}

/// Build the path of a field inside one account, e.g. `LabUserDatas[2].ClientId`.
pub fn account_path(index: usize, id: FieldId) -> String {
    format!("{}[{}].{}", key(FieldId::LabUserDatas), index, key(id))
}

/// Build the path of one account entry, e.g. `LabUserDatas[2]`.
pub fn account_entry_path(index: usize) -> String {
    format!("{}[{}]", key(FieldId::LabUserDatas), index)
}

const fn info(
    id: FieldId,
    key: &'static str,
    rust_name: &'static str,
    entity: Entity,
    requirement: Requirement,
) -> FieldInfo {
    FieldInfo {
        id,
        key,
        rust_name,
        entity,
        requirement,
        sensitive: false,
    }
}

const fn text(field: TextField, key: &'static str, rust_name: &'static str, entity: Entity) -> FieldInfo {
    info(field.id(), key, rust_name, entity, Requirement::Text(field.rule()))
}
