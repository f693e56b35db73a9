//! Value rules shared by the loader and the validating constructors.

use url::Url;

use crate::error::LoadError;
use crate::keys::TextRule;
use crate::policy::UpnPolicy;

/// Apply a string rule to a value found at `field`.
pub(crate) fn check_text(rule: TextRule, field: &str, value: &str) -> Result<(), LoadError> {
    match rule {
        TextRule::Present => Ok(()),
        TextRule::NonEmpty => non_empty(field, value),
        TextRule::Url => {
            non_empty(field, value)?;
            check_url(field, value)
        }
    }
}

/// Apply the UPN policy on top of the non-empty rule.
pub(crate) fn check_upn(field: &str, value: &str, policy: UpnPolicy) -> Result<(), LoadError> {
    if policy == UpnPolicy::Strict && !is_well_formed_upn(value) {
        return Err(LoadError::mismatch(
            field,
            "user principal name (local@domain)",
            format!("'{}'", value),
        ));
    }
    Ok(())
}

/// Whether `value` has the `local@domain` shape of a user principal name.
///
/// Exactly one `@`, non-empty on both sides, no whitespace anywhere. This is a shape check only; it does not
/// validate the domain.
///
/// ## Examples
/// ```rust
/// use cachecompat_core::is_well_formed_upn;
///
/// assert!(is_well_formed_upn("idlab@msidlab4.onmicrosoft.com"));
/// assert!(!is_well_formed_upn("idlab"));
/// assert!(!is_well_formed_upn("a@b@c"));
/// ```
pub fn is_well_formed_upn(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

fn non_empty(field: &str, value: &str) -> Result<(), LoadError> {
    if value.is_empty() {
        return Err(LoadError::empty(field));
    }
    Ok(())
}

fn check_url(field: &str, value: &str) -> Result<(), LoadError> {
    match Url::parse(value) {
        Ok(url) if url.has_host() => Ok(()),
        Ok(_) => Err(LoadError::mismatch(field, "URL", "URL without a host")),
        Err(e) => Err(LoadError::mismatch(field, "URL", format!("malformed URL ({})", e))),
    }
}
