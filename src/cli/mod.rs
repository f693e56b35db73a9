//! CLI module for cachecompat
//!
//! ## Commands
//!
//! - `check <file>` - Load and validate a test input file
//! - `show <file>` - Print what a test input asks the harness to do (never the passwords)
//! - `keys` - Print the field-to-key registry of the input contract
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use cachecompat_core::{LoadOptions, UpnPolicy, UsersPolicy};
use clap::{Args, Parser, Subcommand};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Validate and inspect token-cache compatibility test inputs
#[derive(Parser, Debug)]
#[command(name = "cachecompat")]
#[command(version = VERSION)]
#[command(about = "Validate and inspect token-cache compatibility test inputs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load and validate a test input file
    Check {
        /// Test input file (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Print the scope, paths and accounts of a test input file
    Show {
        /// Test input file (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Print the serialized key of every input field
    Keys,
}

/// Load policy flags shared by the commands that read an input file.
#[derive(Args, Debug, Clone)]
pub struct PolicyArgs {
    /// LabUserDatas policy: required, optional or non-empty
    #[arg(long = "users", value_name = "POLICY", default_value = "required")]
    pub users: UsersPolicy,

    /// Reject Upn values that are not of the form local@domain
    #[arg(long = "strict-upn")]
    pub strict_upn: bool,
}

impl PolicyArgs {
    pub fn options(&self) -> LoadOptions {
        let upn = if self.strict_upn {
            UpnPolicy::Strict
        } else {
            UpnPolicy::Lenient
        };
        LoadOptions::new().with_users(self.users).with_upn(upn)
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Check { file, policy } => commands::check_file(&file, &policy.options()),
        Command::Show { file, policy } => commands::show_file(&file, &policy.options()),
        Command::Keys => commands::print_keys(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::try_parse_from(["cachecompat", "check", "input.json"]).unwrap();
        if let Command::Check { file, policy } = cli.command {
            assert_eq!(file, PathBuf::from("input.json"));
            assert_eq!(policy.options(), LoadOptions::default());
        } else {
            panic!("Expected Check command");
        }
    }

    #[test]
    fn test_cli_parse_policy_flags() {
        let cli = Cli::try_parse_from([
            "cachecompat",
            "show",
            "input.json",
            "--users",
            "non-empty",
            "--strict-upn",
        ])
        .unwrap();
        if let Command::Show { policy, .. } = cli.command {
            let options = policy.options();
            assert_eq!(options.users, UsersPolicy::NonEmpty);
            assert_eq!(options.upn, UpnPolicy::Strict);
        } else {
            panic!("Expected Show command");
        }
    }

    #[test]
    fn test_cli_rejects_unknown_users_policy() {
        let result = Cli::try_parse_from(["cachecompat", "check", "input.json", "--users", "sometimes"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_keys() {
        let cli = Cli::try_parse_from(["cachecompat", "keys"]).unwrap();
        assert!(matches!(cli.command, Command::Keys));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["cachecompat"]).is_err());
    }
}
