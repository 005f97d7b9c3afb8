//! Everyday user-facing commands.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use linkme::distributed_slice;

use ember_core::ChatEvent;

use crate::loader::{FactoryEntry, MODULE_FACTORIES};
use crate::module::{CommandMessageHandler, Flow, Module, ModuleContext};

/// Handles `say`, `info`, `version` and `time`.
pub struct Basic;

impl Basic {
    fn module() -> Arc<dyn Module> {
        Arc::new(Basic)
    }
}

#[distributed_slice(MODULE_FACTORIES)]
static BASIC: FactoryEntry = FactoryEntry {
    key: "Basic",
    factory: Basic::module,
};

#[async_trait]
impl CommandMessageHandler for Basic {
    async fn on_command_message(&self, ctx: &ModuleContext, event: &ChatEvent) -> Flow {
        match event.message.command.as_str() {
            "say" => {
                // Echo the remainder with its original casing intact.
                ctx.reply(&event.message.message).await;
            }
            "info" => {
                ctx.reply(&format!(
                    "Ember {} - a modular chat bot. {} modules loaded.",
                    env!("CARGO_PKG_VERSION"),
                    ctx.registry().len()
                ))
                .await;
            }
            "version" => {
                ctx.reply(&format!("Ember version {}", env!("CARGO_PKG_VERSION")))
                    .await;
            }
            "time" => {
                ctx.reply(&format!(
                    "Current time: {}",
                    Local::now().format("%Y-%m-%d %H:%M:%S")
                ))
                .await;
            }
            _ => return Flow::Continue,
        }
        Flow::Stop
    }
}

impl Module for Basic {
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

    fn context(channel: Arc<RecordingChannel>) -> ModuleContext {
        let registry = Arc::new(ModuleRegistry::new(
            ModuleLoader::new("modules", false),
            Vec::new(),
        ));
        ModuleContext::new(registry, channel)
    }

    #[tokio::test]
    async fn test_say_echoes_original_casing() {
        let channel = Arc::new(RecordingChannel {
            sent: Mutex::new(Vec::new()),
        });
        let ctx = context(Arc::<RecordingChannel>::clone(&channel));
        let event = ChatEvent::new(
            "!say Hello World",
            Sender::new("u1"),
            Arc::<RecordingChannel>::clone(&channel),
        );

        let flow = Basic.on_command_message(&ctx, &event).await;

        assert_eq!(flow, Flow::Stop);
        assert_eq!(*channel.sent.lock().unwrap(), vec!["Hello World"]);
    }

    #[tokio::test]
    async fn test_unknown_command_passes_through() {
        let channel = Arc::new(RecordingChannel {
            sent: Mutex::new(Vec::new()),
        });
        let ctx = context(Arc::<RecordingChannel>::clone(&channel));
        let event = ChatEvent::new(
            "!roll 2d6",
            Sender::new("u1"),
            Arc::<RecordingChannel>::clone(&channel),
        );

        let flow = Basic.on_command_message(&ctx, &event).await;

        assert_eq!(flow, Flow::Continue);
        assert!(channel.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_version_mentions_crate_version() {
        let channel = Arc::new(RecordingChannel {
            sent: Mutex::new(Vec::new()),
        });
        let ctx = context(Arc::<RecordingChannel>::clone(&channel));
        let event = ChatEvent::new(
            "!version",
            Sender::new("u1"),
            Arc::<RecordingChannel>::clone(&channel),
        );

        Basic.on_command_message(&ctx, &event).await;

        let sent = channel.sent.lock().unwrap();
        assert!(sent[0].contains(env!("CARGO_PKG_VERSION")));
    }
}
