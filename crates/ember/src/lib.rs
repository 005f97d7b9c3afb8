//! # Ember
//!
//! A modular, hot-reloadable chat bot framework for Rust.
//!
//! ## Overview
//!
//! Ember turns raw chat messages into classified events and fans them
//! out over an ordered registry of modules. Modules are small handler
//! objects implementing the capabilities they care about; everything
//! else (discovery, loading, ordering, command gating) is the
//! framework's job.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌────────────┐     ┌──────────────────────────┐
//! │   Protocol   │────▶│ Dispatcher │────▶│ Module "Basic"           │
//! │    client    │     │ (classify, │────▶│ Module "Manager"         │
//! └──────────────┘     │   gate)    │────▶│ Module ...               │
//!                      └────────────┘     └──────────────────────────┘
//! ```
//!
//! - **Runtime**: configuration, logging, registry assembly
//! - **Registry**: ordered, keyed set of live modules; priority
//!   modules trail the traversal
//! - **Dispatcher**: classifies each event once, applies the command
//!   gates, honors the stop sentinel
//! - **Modules**: handler objects, loadable and hot-reloadable at
//!   runtime in debug mode
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ember::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runtime = BotRuntime::from_env()?;
//!
//!     // A protocol client feeds messages in:
//!     // runtime.handle_message(raw, sender, channel).await;
//!
//!     runtime.run_until_shutdown().await;
//!     Ok(())
//! }
//! ```

pub use ember_core as core;
pub use ember_modules as modules;
pub use ember_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use ember::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use ember_runtime::{BotRuntime, ConfigLoader, EmberConfig};

    // Event model - what handlers receive
    pub use ember_core::{Channel, ChatEvent, EventClass, ParsedMessage, Sender};

    // Module system - for writing handlers
    pub use ember_modules::{
        CommandMessageHandler, Flow, MODULE_FACTORIES, Module, ModuleContext,
        PlainMessageHandler, PrivateMessageHandler,
    };

    // Registry operations - for managing modules at runtime
    pub use ember_modules::{
        LoadOptions, LoadStatus, ModuleRegistry, ReloadStatus, UnloadStatus,
    };

    // Command declarations
    pub use ember_modules::{CommandSpec, CommandTable};

    // Logging macros
    pub use ember_runtime::tracing::{debug, error, info, trace, warn};
}
