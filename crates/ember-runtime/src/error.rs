//! Runtime error types.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while bringing up or running the bot.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration loading failed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Module discovery or loading failed.
    #[error("Module error: {0}")]
    Module(#[from] ember_modules::ModuleError),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
