//! Ember Runtime - Orchestration layer for the Ember bot framework.
//!
//! This crate provides:
//! - Layered configuration loading (`ConfigLoader`, `EmberConfig`)
//! - Logging initialization from configuration
//! - Runtime assembly (`BotRuntime`): registry, dispatcher and the
//!   protocol-client entry point
//!
//! ```ignore
//! use ember_runtime::BotRuntime;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runtime = BotRuntime::from_env()?;
//!
//!     // A protocol client feeds raw messages in:
//!     // runtime.handle_message(raw, sender, channel).await;
//!
//!     runtime.run_until_shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

pub use config::{ConfigError, ConfigLoader, ConfigResult, EmberConfig, load_config};
pub use error::{RuntimeError, RuntimeResult};
pub use runtime::BotRuntime;

// Re-export tracing for use by module crates.
pub use tracing;
pub use tracing_subscriber;
