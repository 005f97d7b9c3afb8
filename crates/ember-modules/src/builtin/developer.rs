//! Diagnostics for bot operators.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use linkme::distributed_slice;

use ember_core::ChatEvent;

use crate::loader::{FactoryEntry, MODULE_FACTORIES};
use crate::module::{CommandMessageHandler, Flow, Module, ModuleContext};

const SYNTAX: &str = "Syntax: `dev [modules|uptime]`";

/// Handles the admin-only `dev` command.
///
/// A fresh instance is constructed per (re)load, so the uptime it
/// reports is the age of the current instance, not of the process.
pub struct Developer {
    started: Instant,
}

impl Developer {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    fn module() -> Arc<dyn Module> {
        Arc::new(Developer::new())
    }
}

impl Default for Developer {
    fn default() -> Self {
        Self::new()
    }
}

#[distributed_slice(MODULE_FACTORIES)]
static DEVELOPER: FactoryEntry = FactoryEntry {
    key: "Developer",
    factory: Developer::module,
};

#[async_trait]
impl CommandMessageHandler for Developer {
    async fn on_command_message(&self, ctx: &ModuleContext, event: &ChatEvent) -> Flow {
        if event.message.command != "dev" {
            return Flow::Continue;
        }

        match event.message.arguments.first().map(String::as_str) {
            Some("modules") => {
                let keys = ctx.registry().list();
                ctx.reply(&format!(
                    "{} modules loaded: {}",
                    keys.len(),
                    keys.join(", ")
                ))
                .await;
            }
            Some("uptime") => {
                ctx.reply(&format!("Up for {}s.", self.started.elapsed().as_secs()))
                    .await;
            }
            _ => ctx.reply(SYNTAX).await,
        }

        Flow::Stop
    }
}

impl Module for Developer {
    fn as_command(&self) -> Option<&dyn CommandMessageHandler> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use ember_core::{Channel, Sender};

    use crate::loader::ModuleLoader;
    use crate::registry::ModuleRegistry;

    struct RecordingChannel {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Channel for RecordingChannel {
        async fn send(&self, text: &str) {
            self.sent.lock().unwrap().push(text.to_string());
        }
    }

    struct Nop;
    impl Module for Nop {}

    #[tokio::test]
    async fn test_modules_listing() {
        let registry = Arc::new(ModuleRegistry::new(
            ModuleLoader::new("modules", false),
            Vec::new(),
        ));
        registry.set("Basic", Arc::new(Nop));
        registry.set("Developer", Arc::new(Nop));

        let channel = Arc::new(RecordingChannel {
            sent: Mutex::new(Vec::new()),
        });
        let ctx = ModuleContext::new(registry, Arc::<RecordingChannel>::clone(&channel));
        let event = ChatEvent::new("!dev modules", Sender::new("admin"), Arc::<RecordingChannel>::clone(&channel));

        let flow = Developer::new().on_command_message(&ctx, &event).await;

        assert_eq!(flow, Flow::Stop);
        assert_eq!(
            *channel.sent.lock().unwrap(),
            vec!["2 modules loaded: Basic, Developer".to_string()]
        );
    }

    #[tokio::test]
    async fn test_unknown_subcommand_gets_syntax() {
        let registry = Arc::new(ModuleRegistry::new(
            ModuleLoader::new("modules", false),
            Vec::new(),
        ));
        let channel = Arc::new(RecordingChannel {
            sent: Mutex::new(Vec::new()),
        });
        let ctx = ModuleContext::new(registry, Arc::<RecordingChannel>::clone(&channel));
        let event = ChatEvent::new("!dev bogus", Sender::new("admin"), Arc::<RecordingChannel>::clone(&channel));

        Developer::new().on_command_message(&ctx, &event).await;

        assert_eq!(*channel.sent.lock().unwrap(), vec![SYNTAX.to_string()]);
    }
}
