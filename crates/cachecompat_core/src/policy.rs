//! Load policy.
//!
//! The contract leaves two decisions to the harness: whether `LabUserDatas` may be absent or empty, and how
//! strictly `Upn` values are checked. Both are explicit here so a harness documents its choice in code.

use std::fmt;
use std::str::FromStr;

/// How `LabUserDatas` presence and emptiness are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UsersPolicy {
    /// The key must be present. An empty array is accepted.
    #[default]
    Required,
    /// An absent key loads as an empty account list.
    Optional,
    /// The key must be present and hold at least one account.
    NonEmpty,
}

impl UsersPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            UsersPolicy::Required => "required",
            UsersPolicy::Optional => "optional",
            UsersPolicy::NonEmpty => "non-empty",
        }
    }
}

impl fmt::Display for UsersPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UsersPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "required" => Ok(UsersPolicy::Required),
            "optional" => Ok(UsersPolicy::Optional),
            "non-empty" => Ok(UsersPolicy::NonEmpty),
            other => Err(format!(
                "unknown users policy '{}' (expected required, optional or non-empty)",
                other
            )),
        }
    }
}

/// How `Upn` values are checked beyond being non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpnPolicy {
    /// Any non-empty string.
    #[default]
    Lenient,
    /// Must look like `local@domain`; see [`is_well_formed_upn`](crate::is_well_formed_upn).
    Strict,
}

/// Options for [`load_with`](crate::load_with).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub users: UsersPolicy,
    pub upn: UpnPolicy,
}

impl LoadOptions {
    /// Create options with the default policy: `LabUserDatas` required (empty allowed), lenient UPNs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `LabUserDatas` policy
    pub fn with_users(mut self, users: UsersPolicy) -> Self {
        self.users = users;
        self
    }

    /// Set the `Upn` policy
    pub fn with_upn(mut self, upn: UpnPolicy) -> Self {
        self.upn = upn;
        self
    }
}
