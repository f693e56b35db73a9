//! Per-account execution loop.
//!
//! For every account, in input order:
//! 1. Acquire silently from the cache artifact. Success means the cache written by the other implementation
//!    was consumed correctly.
//! 2. On [`SignInError::UiRequired`], sign in with the account's password instead, which populates the cache
//!    for the next implementation in the chain.
//!
//! Any other executor error aborts the run. [`execute`] turns that into an error results file so the
//! orchestrator always finds one at `ResultsFilePath`.

use cachecompat_core::{AccountDescriptor, TestInputDescriptor};

use super::interfaces::{HarnessError, ResultsWriter, SignInError, SignInExecutor, SignInRequest};
use super::results::{CacheExecutorAccountResult, CacheExecutorResults};

/// Run every account through `executor` and collect one result per account, in input order.
#[tracing::instrument(skip_all, fields(accounts = descriptor.users().len(), scope = descriptor.scope()))]
pub fn run_accounts(
    descriptor: &TestInputDescriptor,
    executor: &mut dyn SignInExecutor,
) -> Result<Vec<CacheExecutorAccountResult>, HarnessError> {
    descriptor
        .users()
        .iter()
        .map(|account| run_account(descriptor, account, executor))
        .collect()
}

fn run_account(
    descriptor: &TestInputDescriptor,
    account: &AccountDescriptor,
    executor: &mut dyn SignInExecutor,
) -> Result<CacheExecutorAccountResult, HarnessError> {
    let request = SignInRequest::new(descriptor, account);
    let sign_in_failed = |source| HarnessError::SignIn {
        upn: account.upn().to_string(),
        source,
    };

    match executor.acquire_token_silent(&request) {
        Ok(outcome) => {
            tracing::info!(upn = account.upn(), username = %outcome.username, "got token from the cache");
            return Ok(CacheExecutorAccountResult::new(account.upn(), outcome.username, true));
        }
        Err(SignInError::UiRequired(reason)) => {
            tracing::debug!(upn = account.upn(), %reason, "cache miss, falling back to password sign-in");
        }
        Err(e) => return Err(sign_in_failed(e)),
    }

    let outcome = executor
        .acquire_token_by_password(&request, account.password())
        .map_err(sign_in_failed)?;

    if !outcome.has_access_token() {
        tracing::warn!(upn = account.upn(), "password sign-in returned no access token");
        return Ok(CacheExecutorAccountResult::new(account.upn(), "", false));
    }

    tracing::info!(upn = account.upn(), username = %outcome.username, "got token without the cache");
    Ok(CacheExecutorAccountResult::new(account.upn(), outcome.username, false))
}

/// Run the accounts and always write a results file at the descriptor's results path.
///
/// ## Errors
/// - `ResultsWrite` if the results file cannot be written. Sign-in failures are not returned; they are
///   recorded in the results file with `IsError` set.
#[tracing::instrument(skip_all, fields(results = %descriptor.results_path().display()))]
pub fn execute(
    descriptor: &TestInputDescriptor,
    executor: &mut dyn SignInExecutor,
    writer: &dyn ResultsWriter,
) -> Result<CacheExecutorResults, HarnessError> {
    let results = match run_accounts(descriptor, executor) {
        Ok(account_results) => CacheExecutorResults::success(account_results),
        Err(e) => {
            tracing::error!(error = %e, "harness run aborted");
            CacheExecutorResults::error(e.to_string())
        }
    };

    writer
        .write_results(descriptor.results_path(), &results)
        .map_err(|source| HarnessError::ResultsWrite {
            path: descriptor.results_path().to_path_buf(),
            source,
        })?;

    tracing::info!(
        accounts = results.account_results.len(),
        from_cache = results.from_cache_count(),
        is_error = results.is_error,
        "results written"
    );
    Ok(results)
}
