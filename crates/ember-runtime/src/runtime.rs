//! Runtime orchestration.
//!
//! [`BotRuntime`] wires the pieces together: it loads configuration,
//! initializes logging, brings up the module registry with every
//! statically registered factory bound, and exposes the single entry
//! point a protocol client needs: [`handle_message`].
//!
//! [`handle_message`]: BotRuntime::handle_message

use std::sync::Arc;

use tracing::{debug, info};

use ember_core::{Channel, ChatEvent, Sender};
use ember_modules::{EventDispatcher, ModuleFactory, ModuleLoader, ModuleRegistry};

use crate::config::EmberConfig;
use crate::error::RuntimeResult;
use crate::logging;

/// The assembled bot: configuration, registry and dispatcher.
pub struct BotRuntime {
    config: EmberConfig,
    registry: Arc<ModuleRegistry>,
    dispatcher: EventDispatcher,
}

impl BotRuntime {
    /// Builds a runtime from configuration.
    ///
    /// Initializes logging, binds every statically registered module
    /// factory and performs the initial bulk load. A missing module
    /// directory is fatal here; the process should not come up half
    /// configured.
    pub fn new(config: EmberConfig) -> RuntimeResult<Self> {
        logging::init_from_config(&config.logging);

        let loader = ModuleLoader::new(&config.modules.directory, config.debug);
        loader.bind_registered();

        let registry = Arc::new(ModuleRegistry::new(loader, config.modules.priority.clone()));
        let loaded = registry.load_all()?;
        info!(
            count = loaded,
            debug_mode = config.debug,
            directory = %config.modules.directory.display(),
            "Runtime ready"
        );

        let dispatcher = EventDispatcher::new(
            Arc::clone(&registry),
            config.command_table(),
            config.bot.admins.clone(),
        );

        Ok(Self {
            config,
            registry,
            dispatcher,
        })
    }

    /// Loads configuration from the default locations and builds the
    /// runtime from it.
    pub fn from_env() -> RuntimeResult<Self> {
        Self::new(crate::config::load_config()?)
    }

    /// The live module registry.
    pub fn registry(&self) -> &Arc<ModuleRegistry> {
        &self.registry
    }

    /// The event dispatcher.
    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    /// The configuration the runtime was built from.
    pub fn config(&self) -> &EmberConfig {
        &self.config
    }

    /// Binds (or hot-swaps) a module factory.
    pub fn bind(&self, key: &str, factory: ModuleFactory) {
        self.registry.bind(key, factory);
    }

    /// Registers an extension pack and loads the modules it ships.
    pub fn load_pack(
        &self,
        name: impl Into<String>,
        root: impl Into<std::path::PathBuf>,
    ) -> RuntimeResult<usize> {
        Ok(self.registry.load_pack(name, root)?)
    }

    /// Entry point for protocol clients: one raw message in, fully
    /// dispatched event out.
    ///
    /// Messages from the bot's own configured id are dropped here, so
    /// the bot never reacts to its own output.
    pub async fn handle_message(&self, raw: &str, sender: Sender, channel: Arc<dyn Channel>) {
        if !self.config.bot.id.is_empty() && sender.id == self.config.bot.id {
            debug!("Ignoring own message");
            return;
        }

        let event = ChatEvent::new(raw, sender, channel);
        self.dispatcher.dispatch(&event).await;
    }

    /// Blocks until Ctrl+C.
    ///
    /// Protocol clients typically drive [`handle_message`] from their
    /// own tasks and park the main task here.
    ///
    /// [`handle_message`]: Self::handle_message
    pub async fn run_until_shutdown(&self) {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
        }
    }
}
