//! Error types for the module runtime.
//!
//! The expected outcomes of load/unload operations (already loaded, not
//! found, already unloaded) are **status values**, not errors; see
//! [`LoadStatus`](crate::registry::LoadStatus) and friends. The variants
//! here are reserved for conditions that indicate a misconfigured
//! deployment rather than normal runtime traffic.

use std::path::PathBuf;

use thiserror::Error;

/// Hard failures of the module runtime.
#[derive(Error, Debug)]
pub enum ModuleError {
    /// The module root (or a pack root) could not be scanned. Fatal at
    /// startup: the host module directory is required.
    #[error("failed to scan module directory {path}: {source}")]
    Discovery {
        /// Directory that could not be read.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// A discovered source unit has no registered handler factory, so
    /// the loader cannot produce a conforming handler for it. Aborts
    /// the one registry mutation; nothing is inserted.
    #[error("'{key}' does not resolve to a registered module factory")]
    NotAHandler {
        /// Canonical key of the offending unit.
        key: String,
    },

    /// Hot loading was requested while `debug` is off. Hot mode is a
    /// development-only capability.
    #[error("hot loading is disabled outside debug mode")]
    HotDisabled,
}

/// Result type for module runtime operations.
pub type ModuleResult<T> = Result<T, ModuleError>;
