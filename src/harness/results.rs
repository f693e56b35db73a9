//! Results file model.
//!
//! One [`CacheExecutorAccountResult`] per input account, in input order, wrapped in a
//! [`CacheExecutorResults`] that also records whether the run aborted. The wire keys are PascalCase so the
//! orchestrating process can read results from every harness implementation alike.

use serde::{Deserialize, Serialize};

/// Outcome of signing in one lab account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CacheExecutorAccountResult {
    /// The `Upn` from the test input.
    pub lab_user_upn: String,
    /// Username on the acquired token; empty when no token was obtained.
    pub signed_in_user_upn: String,
    /// Whether the token came from the cache artifact (silent acquisition).
    pub is_auth_result_from_cache: bool,
}

impl CacheExecutorAccountResult {
    pub fn new(
        lab_user_upn: impl Into<String>,
        signed_in_user_upn: impl Into<String>,
        is_auth_result_from_cache: bool,
    ) -> Self {
        CacheExecutorAccountResult {
            lab_user_upn: lab_user_upn.into(),
            signed_in_user_upn: signed_in_user_upn.into(),
            is_auth_result_from_cache,
        }
    }
}

/// Content of the results file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CacheExecutorResults {
    pub is_error: bool,
    #[serde(default)]
    pub error_message: String,
    #[serde(default)]
    pub account_results: Vec<CacheExecutorAccountResult>,
}

impl CacheExecutorResults {
    pub fn success(account_results: Vec<CacheExecutorAccountResult>) -> Self {
        CacheExecutorResults {
            is_error: false,
            error_message: String::new(),
            account_results,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        CacheExecutorResults {
            is_error: true,
            error_message: message.into(),
            account_results: Vec::new(),
        }
    }

    /// Number of accounts whose token came from the cache.
    pub fn from_cache_count(&self) -> usize {
        self.account_results
            .iter()
            .filter(|r| r.is_auth_result_from_cache)
            .count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_results_wire_format() {
        let results = CacheExecutorResults::success(vec![
            CacheExecutorAccountResult::new("a@b.com", "a@b.com", true),
            CacheExecutorAccountResult::new("c@d.com", "", false),
        ]);
        insta::assert_snapshot!(serde_json::to_string_pretty(&results).unwrap(), @r#"
        {
          "IsError": false,
          "ErrorMessage": "",
          "AccountResults": [
            {
              "LabUserUpn": "a@b.com",
              "SignedInUserUpn": "a@b.com",
              "IsAuthResultFromCache": true
            },
            {
              "LabUserUpn": "c@d.com",
              "SignedInUserUpn": "",
              "IsAuthResultFromCache": false
            }
          ]
        }
        "#);
    }

    #[test]
    fn test_error_results_have_no_accounts() {
        let results = CacheExecutorResults::error("sign-in failed");
        assert!(results.is_error);
        assert_eq!(results.error_message, "sign-in failed");
        assert!(results.account_results.is_empty());
    }

    #[test]
    fn test_reads_results_without_optional_fields() {
        let results: CacheExecutorResults = serde_json::from_str(r#"{"IsError": true}"#).unwrap();
        assert_eq!(results, CacheExecutorResults::error(""));
    }

    #[test]
    fn test_from_cache_count() {
        let results = CacheExecutorResults::success(vec![
            CacheExecutorAccountResult::new("a@b.com", "a@b.com", true),
            CacheExecutorAccountResult::new("c@d.com", "c@d.com", false),
            CacheExecutorAccountResult::new("e@f.com", "e@f.com", true),
        ]);
        assert_eq!(results.from_cache_count(), 2);
    }
}
