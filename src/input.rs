//! Test input file reading.
//!
//! The core loader only accepts text. This module is the file-reader collaborator: it resolves nothing and
//! validates nothing about the path, it just reads it and hands the text to
//! [`cachecompat_core::load_with`]. Reading goes through the [`InputSource`] trait so harness tests can supply
//! input without touching the filesystem.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use cachecompat_core::{LoadError, LoadOptions, TestInputDescriptor};
use thiserror::Error;

/// Errors from reading and loading a test input file.
#[derive(Error)]
pub enum InputError {
    #[error("failed to read test input '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file was read but its content was rejected. `raw` is kept for diagnostics.
    #[error("invalid test input '{}': {source}", .path.display())]
    Load {
        path: PathBuf,
        raw: String,
        #[source]
        source: LoadError,
    },
}

// `raw` holds plaintext passwords, so Debug only reports its size
impl fmt::Debug for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Io { path, source } => f
                .debug_struct("Io")
                .field("path", path)
                .field("source", source)
                .finish(),
            InputError::Load { path, raw, source } => f
                .debug_struct("Load")
                .field("path", path)
                .field("raw", &format_args!("<{} bytes>", raw.len()))
                .field("source", source)
                .finish(),
        }
    }
}

/// Supplies the raw text of an input file.
pub trait InputSource {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// Reads input files from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsInputSource;

impl InputSource for FsInputSource {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

/// Read `path` through `source` and load it under `options`.
pub fn load_input_file(
    source: &dyn InputSource,
    path: &Path,
    options: &LoadOptions,
) -> Result<TestInputDescriptor, InputError> {
    let raw = source.read_to_string(path).map_err(|e| InputError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    match cachecompat_core::load_with(&raw, options) {
        Ok(descriptor) => {
            tracing::info!(
                path = %path.display(),
                accounts = descriptor.users().len(),
                "loaded test input"
            );
            Ok(descriptor)
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), kind = %e.kind(), "rejected test input");
            Err(InputError::Load {
                path: path.to_path_buf(),
                raw,
                source: e,
            })
        }
    }
}
