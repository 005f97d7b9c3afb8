//! Runtime module administration over chat.

use std::sync::Arc;
use std::time::SystemTime;

use async_trait::async_trait;
use linkme::distributed_slice;
use tracing::warn;

use ember_core::ChatEvent;

use crate::loader::{FactoryEntry, MODULE_FACTORIES};
use crate::module::{CommandMessageHandler, Flow, Module, ModuleContext};
use crate::registry::{LoadOptions, LoadStatus, ReloadStatus, UnloadStatus};

const SYNTAX: &str = "Syntax: `module [load|unload|reload|time|loaded] [Module]`";
const DEBUG_ONLY: &str = "Unloading and reloading modules requires debug mode.";

/// Handles the admin-only `module` command: load, unload, reload,
/// load-time query and the loaded listing.
pub struct Manager;

impl Manager {
    fn module() -> Arc<dyn Module> {
        Arc::new(Manager)
    }

    async fn load(&self, ctx: &ModuleContext, name: &str) {
        let opts = LoadOptions::hot(ctx.registry().is_debug());
        match ctx.registry().load(name, opts) {
            Ok(LoadStatus::Loaded) => {
                ctx.reply(&format!("Module `{name}` loaded successfully.")).await;
            }
            Ok(LoadStatus::AlreadyLoaded) => {
                ctx.reply(&format!("The Module `{name}` is already loaded.")).await;
            }
            Ok(LoadStatus::NotFound) => {
                ctx.reply(&format!("The Module `{name}` was not found.")).await;
            }
            Err(err) => {
                warn!(module = %name, error = %err, "Load failed");
                ctx.reply(&format!("Failed to load `{name}`: {err}")).await;
            }
        }
    }

    async fn unload(&self, ctx: &ModuleContext, name: &str) {
        match ctx.registry().unload(name) {
            UnloadStatus::Unloaded => {
                ctx.reply(&format!("Module `{name}` unloaded successfully.")).await;
            }
            UnloadStatus::AlreadyUnloaded => {
                ctx.reply(&format!("The Module `{name}` is not loaded.")).await;
            }
        }
    }

    async fn reload(&self, ctx: &ModuleContext, name: &str) {
        let opts = LoadOptions::hot(true);
        match ctx.registry().reload(name, opts) {
            Ok(ReloadStatus::Reloaded) => {
                ctx.reply(&format!("Module `{name}` reloaded successfully.")).await;
            }
            Ok(ReloadStatus::AlreadyUnloaded) => {
                ctx.reply(&format!("The Module `{name}` is not loaded.")).await;
            }
            Ok(ReloadStatus::NotFound) => {
                ctx.reply(&format!(
                    "The Module `{name}` was unloaded but its source is gone."
                ))
                .await;
            }
            Err(err) => {
                warn!(module = %name, error = %err, "Reload failed");
                ctx.reply(&format!("Failed to reload `{name}`: {err}")).await;
            }
        }
    }

    async fn time(&self, ctx: &ModuleContext, name: &str) {
        match ctx.registry().time_loaded(name) {
            Some(loaded_at) => {
                let secs = SystemTime::now()
                    .duration_since(loaded_at)
                    .map(|d| d.as_secs())
                    .unwrap_or(0);
                ctx.reply(&format!("The Module `{name}` has been loaded for {secs}s."))
                    .await;
            }
            None => {
                ctx.reply(&format!("The Module `{name}` is not loaded.")).await;
            }
        }
    }

    async fn loaded(&self, ctx: &ModuleContext) {
        let keys = ctx.registry().list();
        ctx.reply(&format!(
            "{} modules loaded: {}",
            keys.len(),
            keys.join(", ")
        ))
        .await;
    }
}

#[distributed_slice(MODULE_FACTORIES)]
static MANAGER: FactoryEntry = FactoryEntry {
    key: "Manager",
    factory: Manager::module,
};

#[async_trait]
impl CommandMessageHandler for Manager {
    async fn on_command_message(&self, ctx: &ModuleContext, event: &ChatEvent) -> Flow {
        if event.message.command != "module" {
            return Flow::Continue;
        }

        let args = &event.message.arguments;
        let Some(action) = args.first() else {
            ctx.reply(SYNTAX).await;
            return Flow::Stop;
        };

        match (action.as_str(), args.get(1)) {
            ("loaded", _) => self.loaded(ctx).await,
            ("load", Some(name)) => self.load(ctx, name).await,
            ("time", Some(name)) => self.time(ctx, name).await,
            ("unload", Some(_)) | ("reload", Some(_)) if !ctx.registry().is_debug() => {
                ctx.reply(DEBUG_ONLY).await;
            }
            ("unload", Some(name)) => self.unload(ctx, name).await,
            ("reload", Some(name)) if name == "all" => {
                for key in ctx.registry().list() {
                    self.reload(ctx, &key).await;
                }
            }
            ("reload", Some(name)) => self.reload(ctx, name).await,
            _ => ctx.reply(SYNTAX).await,
        }

        Flow::Stop
    }
}

impl Module for Manager {
    fn as_command(&self) -> Option<&dyn CommandMessageHandler> {
        Some(self)
    }
}
