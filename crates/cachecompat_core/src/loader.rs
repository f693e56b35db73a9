//! Raw text to [`TestInputDescriptor`].
//!
//! Parsing happens in two steps: the text is parsed into a generic JSON value (syntax errors become
//! `MalformedInput` with a position), then fields are pulled out by their registry keys and checked in
//! registry order. The first failing field is reported.

use serde_json::{Map, Value};

use crate::descriptor::{AccountDescriptor, TestInputDescriptor};
use crate::error::LoadError;
use crate::keys::{self, FieldId, TextField};
use crate::policy::{LoadOptions, UsersPolicy};
use crate::storage::StorageType;
use crate::validate;

type Object = Map<String, Value>;

/// Load a descriptor with the default [`LoadOptions`].
///
/// ## Examples
/// ```rust
/// let raw = r#"{"Scope":"User.Read","CacheFilePath":"/tmp/cache.bin","ResultsFilePath":"/tmp/results.json",
///     "LabUserDatas":[{"Upn":"a@b.com","Password":"p","Authority":"https://login.example.com/tenant","ClientId":"cid"}]}"#;
/// let descriptor = cachecompat_core::load(raw).unwrap();
/// assert_eq!(descriptor.scope(), "User.Read");
/// assert_eq!(descriptor.users()[0].upn(), "a@b.com");
/// ```
pub fn load(raw: &str) -> Result<TestInputDescriptor, LoadError> {
    load_with(raw, &LoadOptions::default())
}

/// Load a descriptor under an explicit policy.
///
/// ## Errors
/// - `MalformedInput` when `raw` is not valid JSON.
/// - `MissingField` when a required field is absent, `null`, or empty where non-empty is required.
/// - `TypeMismatch` when a field has the wrong JSON type, the root is not an object, an `Authority` is not a
///   URL, or (under [`UpnPolicy::Strict`](crate::UpnPolicy::Strict)) a `Upn` is not `local@domain`.
#[tracing::instrument(skip_all, fields(input_len = raw.len()))]
pub fn load_with(raw: &str, options: &LoadOptions) -> Result<TestInputDescriptor, LoadError> {
    let document: Value = serde_json::from_str(raw).map_err(|e| LoadError::from_json(&e))?;
    let Value::Object(root) = &document else {
        return Err(LoadError::mismatch(keys::ROOT, "object", type_name(&document)));
    };

    let scope = top_level_string(root, TextField::Scope)?;
    let cache_file_path = top_level_string(root, TextField::CacheFilePath)?;
    let results_file_path = top_level_string(root, TextField::ResultsFilePath)?;
    let storage_type = storage_type(root)?;
    let users = accounts(root, options)?;

    tracing::debug!(accounts = users.len(), users_policy = %options.users, "test input loaded");
    Ok(TestInputDescriptor::from_validated(
        scope,
        cache_file_path,
        results_file_path,
        storage_type,
        users,
    ))
}

fn top_level_string(root: &Object, text: TextField) -> Result<&str, LoadError> {
    string_field(root, text, text.key())
}

/// Read a string field and apply its rule. `field` is the path reported on failure.
fn string_field<'a>(object: &'a Object, text: TextField, field: &str) -> Result<&'a str, LoadError> {
    match object.get(text.key()) {
        None | Some(Value::Null) => Err(LoadError::absent(field)),
        Some(Value::String(value)) => {
            validate::check_text(text.rule(), field, value)?;
            Ok(value)
        }
        Some(other) => Err(LoadError::mismatch(field, "string", type_name(other))),
    }
}

/// `StorageType` is optional; absent or `null` leaves the format to the executor.
fn storage_type(root: &Object) -> Result<Option<StorageType>, LoadError> {
    let field = keys::key(FieldId::StorageType);
    match root.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => number
            .as_u64()
            .and_then(StorageType::from_wire)
            .map(Some)
            .ok_or_else(|| LoadError::mismatch(field, StorageType::EXPECTED, number.to_string())),
        Some(other) => Err(LoadError::mismatch(field, StorageType::EXPECTED, type_name(other))),
    }
}

fn accounts(root: &Object, options: &LoadOptions) -> Result<Vec<AccountDescriptor>, LoadError> {
    let field = keys::key(FieldId::LabUserDatas);
    let entries = match root.get(field) {
        None | Some(Value::Null) => {
            if options.users == UsersPolicy::Optional {
                return Ok(Vec::new());
            }
            return Err(LoadError::absent(field));
        }
        Some(Value::Array(entries)) => entries,
        Some(other) => return Err(LoadError::mismatch(field, "array", type_name(other))),
    };

    if entries.is_empty() && options.users == UsersPolicy::NonEmpty {
        return Err(LoadError::empty(field));
    }

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| account(index, entry, options))
        .collect()
}

fn account(index: usize, entry: &Value, options: &LoadOptions) -> Result<AccountDescriptor, LoadError> {
    let Value::Object(object) = entry else {
        return Err(LoadError::mismatch(
            keys::account_entry_path(index),
            "object",
            type_name(entry),
        ));
    };

    let path = |text: TextField| keys::account_path(index, text.id());

    let upn_path = path(TextField::Upn);
    let upn = string_field(object, TextField::Upn, &upn_path)?;
    validate::check_upn(&upn_path, upn, options.upn)?;

    let password = string_field(object, TextField::Password, &path(TextField::Password))?;
    let authority = string_field(object, TextField::Authority, &path(TextField::Authority))?;
    let client_id = string_field(object, TextField::ClientId, &path(TextField::ClientId))?;

    Ok(AccountDescriptor::from_validated(upn, password, authority, client_id))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
