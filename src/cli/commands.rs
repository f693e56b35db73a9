//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fmt::Write as _;
use std::path::Path;

use cachecompat_core::keys::{self, Entity};
use cachecompat_core::{LoadOptions, TestInputDescriptor};

use super::{CliError, CliResult, ExitCode};
use crate::diagnostics::{self, InputDiagnostic};
use crate::input::{self, FsInputSource, InputError};

/// Load a test input file, turning failures into a rendered diagnostic.
fn load_file(path: &Path, options: &LoadOptions) -> CliResult<TestInputDescriptor> {
    input::load_input_file(&FsInputSource, path, options).map_err(|e| match e {
        InputError::Load { path, raw, source } => {
            let diagnostic = InputDiagnostic::new(&path, &raw, &source);
            CliError::failure(diagnostics::render(&diagnostic).trim_end())
        }
        io @ InputError::Io { .. } => CliError::failure(format!("Error: {}", io)),
    })
}

/// Validate a test input file.
pub fn check_file(path: &Path, options: &LoadOptions) -> CliResult<ExitCode> {
    let descriptor = load_file(path, options)?;
    println!("ok: {} ({} account(s))", path.display(), descriptor.users().len());
    Ok(ExitCode::SUCCESS)
}

/// Print what a test input file asks the harness to do.
pub fn show_file(path: &Path, options: &LoadOptions) -> CliResult<ExitCode> {
    let descriptor = load_file(path, options)?;
    print!("{}", summary(&descriptor));
    Ok(ExitCode::SUCCESS)
}

/// Print the field-to-key registry.
pub fn print_keys() -> CliResult<ExitCode> {
    print!("{}", keys_table());
    Ok(ExitCode::SUCCESS)
}

/// Human-readable summary of a descriptor. Passwords are never included.
pub fn summary(descriptor: &TestInputDescriptor) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(out, "scope:        {}", descriptor.scope());
    let _ = writeln!(out, "cache file:   {}", descriptor.cache_file_path());
    let _ = writeln!(out, "results file: {}", descriptor.results_file_path());
    match descriptor.storage_type() {
        Some(storage_type) => {
            let _ = writeln!(out, "storage:      {}", storage_type);
        }
        None => {
            let _ = writeln!(out, "storage:      (executor default)");
        }
    }
    if descriptor.users().is_empty() {
        let _ = writeln!(out, "accounts:     (none)");
        return out;
    }
    let _ = writeln!(out, "accounts:");
    for (index, account) in descriptor.users().iter().enumerate() {
        let _ = writeln!(
            out,
            "  [{}] {} (client {}) via {}",
            index,
            account.upn(),
            account.client_id(),
            account.authority()
        );
    }
    out
}

/// The registry rendered as an aligned table.
pub fn keys_table() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<16} {:<18} {:<10} RULE", "KEY", "FIELD", "ENTITY");
    for entity in [Entity::Descriptor, Entity::Account] {
        for info in keys::fields_of(entity) {
            let entity_name = match info.entity {
                Entity::Descriptor => "descriptor",
                Entity::Account => "account",
            };
            let _ = writeln!(
                out,
                "{:<16} {:<18} {:<10} {}{}",
                info.key,
                info.rust_name,
                entity_name,
                info.requirement,
                if info.sensitive { " (sensitive)" } else { "" }
            );
        }
    }
    out
}
