//! Event classification and fan-out.
//!
//! The dispatcher receives one raw event at a time from the protocol
//! client, classifies it exactly once (private message, recognized
//! command, or plain channel message), applies the permission and
//! arity gates for commands, and then invokes the matching capability
//! on every registered module in registry order.
//!
//! Two rules shape the traversal:
//!
//! - A module lacking the requested capability is skipped silently.
//! - A module returning [`Flow::Stop`] halts the traversal; no later
//!   module sees the event.
//!
//! The traversal iterates a snapshot taken when dispatch begins, so a
//! handler that loads, unloads or reloads modules mid-event only
//! affects the next event.

use std::sync::Arc;

use tracing::{debug, warn};

use ember_core::{ChatEvent, EventClass, Sender};

use crate::command::CommandTable;
use crate::module::{Flow, ModuleContext};
use crate::registry::ModuleRegistry;

/// Notice sent when a non-administrator invokes an admin command.
const PERMISSION_DENIED: &str = "You are not an administrator of this bot.";

/// Routes classified events to module capabilities.
pub struct EventDispatcher {
    registry: Arc<ModuleRegistry>,
    commands: CommandTable,
    admins: Vec<String>,
}

impl EventDispatcher {
    /// Creates a dispatcher over a registry.
    ///
    /// `admins` is the authorized set consulted by the permission gate:
    /// a sender passes when their id, or any of their group ids, is in
    /// the list.
    pub fn new(registry: Arc<ModuleRegistry>, commands: CommandTable, admins: Vec<String>) -> Self {
        Self {
            registry,
            commands,
            admins,
        }
    }

    /// The registry this dispatcher traverses.
    pub fn registry(&self) -> &Arc<ModuleRegistry> {
        &self.registry
    }

    /// Classifies an event. Order matters: the private flag wins over
    /// everything, then prefix + known command name, else plain.
    pub fn classify(&self, event: &ChatEvent) -> EventClass {
        if event.private {
            return EventClass::Private;
        }

        let msg = &event.message;
        if msg.command_code == Some(self.commands.prefix) && self.commands.contains(&msg.command) {
            return EventClass::Command(msg.command.clone());
        }

        EventClass::Plain
    }

    /// Dispatches one event to all registered modules.
    ///
    /// For commands, the permission gate and the arity gate run first;
    /// a failed gate replies to the originating channel and no module
    /// is invoked at all.
    pub async fn dispatch(&self, event: &ChatEvent) {
        let class = self.classify(event);

        if let EventClass::Command(name) = &class {
            // `classify` only returns names present in the table.
            let Some(spec) = self.commands.get(name) else {
                return;
            };

            if spec.admin && !self.is_authorized(&event.sender) {
                warn!(command = %name, sender = %event.sender.id, "Admin command refused");
                event.reply(PERMISSION_DENIED).await;
                return;
            }

            if event.message.arguments.len() < spec.params {
                debug!(
                    command = %name,
                    given = event.message.arguments.len(),
                    required = spec.params,
                    "Too few arguments"
                );
                event.reply(&self.commands.syntax_notice(name)).await;
                return;
            }
        }

        let ctx = ModuleContext::new(Arc::clone(&self.registry), Arc::clone(&event.channel));

        for (key, handler) in self.registry.snapshot() {
            let flow = match &class {
                EventClass::Plain => match handler.as_plain() {
                    Some(h) => h.on_plain_message(&ctx, event).await,
                    None => continue,
                },
                EventClass::Command(_) => match handler.as_command() {
                    Some(h) => h.on_command_message(&ctx, event).await,
                    None => continue,
                },
                EventClass::Private => match handler.as_private() {
                    Some(h) => h.on_private_message(&ctx, event).await,
                    None => continue,
                },
            };

            if flow == Flow::Stop {
                debug!(module = %key, "Stop sentinel returned, halting dispatch");
                break;
            }
        }
    }

    /// Dispatches a programmer-defined capability by name.
    ///
    /// Modules answer through [`Module::call`](crate::Module::call); a
    /// `None` answer means the module does not implement the capability
    /// and is skipped, exactly like a missing `as_*` accessor.
    pub async fn dispatch_named(&self, capability: &str, event: &ChatEvent) {
        let ctx = ModuleContext::new(Arc::clone(&self.registry), Arc::clone(&event.channel));

        for (key, handler) in self.registry.snapshot() {
            match handler.call(capability, &ctx, event).await {
                Some(Flow::Stop) => {
                    debug!(module = %key, capability, "Stop sentinel returned, halting dispatch");
                    break;
                }
                Some(Flow::Continue) | None => {}
            }
        }
    }

    fn is_authorized(&self, sender: &Sender) -> bool {
        self.admins.iter().any(|admin| {
            admin == &sender.id || sender.groups.iter().any(|group| group == admin)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use ember_core::Channel;

    use crate::command::CommandSpec;
    use crate::loader::ModuleLoader;
    use crate::module::{
        CommandMessageHandler, Module, PlainMessageHandler, PrivateMessageHandler,
    };

    struct RecordingChannel {
        private: bool,
        sent: Mutex<Vec<String>>,
    }

    impl RecordingChannel {
        fn public() -> Arc<Self> {
            Arc::new(Self {
                private: false,
                sent: Mutex::new(Vec::new()),
            })
        }

        fn private() -> Arc<Self> {
            Arc::new(Self {
                private: true,
                sent: Mutex::new(Vec::new()),
            })
        }

        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Channel for RecordingChannel {
        async fn send(&self, text: &str) {
            self.sent.lock().unwrap().push(text.to_string());
        }

        fn is_private(&self) -> bool {
            self.private
        }
    }

    /// Counts invocations; returns Stop when `stop` is set.
    struct Counting {
        calls: Arc<AtomicUsize>,
        stop: bool,
    }

    #[async_trait]
    impl PlainMessageHandler for Counting {
        async fn on_plain_message(&self, _ctx: &ModuleContext, _event: &ChatEvent) -> Flow {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.stop { Flow::Stop } else { Flow::Continue }
        }
    }

    #[async_trait]
    impl CommandMessageHandler for Counting {
        async fn on_command_message(&self, _ctx: &ModuleContext, _event: &ChatEvent) -> Flow {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.stop { Flow::Stop } else { Flow::Continue }
        }
    }

    impl Module for Counting {
        fn as_plain(&self) -> Option<&dyn PlainMessageHandler> {
            Some(self)
        }

        fn as_command(&self) -> Option<&dyn CommandMessageHandler> {
            Some(self)
        }
    }

    /// Only handles private messages.
    struct PrivateOnly {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PrivateMessageHandler for PrivateOnly {
        async fn on_private_message(&self, _ctx: &ModuleContext, _event: &ChatEvent) -> Flow {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Flow::Continue
        }
    }

    impl Module for PrivateOnly {
        fn as_private(&self) -> Option<&dyn PrivateMessageHandler> {
            Some(self)
        }
    }

    fn empty_registry() -> Arc<ModuleRegistry> {
        // Dispatcher tests register modules programmatically; the module
        // directory is never scanned.
        Arc::new(ModuleRegistry::new(
            ModuleLoader::new("modules", true),
            Vec::new(),
        ))
    }

    fn table() -> CommandTable {
        CommandTable::new('!')
            .with_command("say", CommandSpec::new(1, "Say [Message]"))
            .with_command("dev", CommandSpec::new(0, "Dev [Modules|Uptime]").admin())
    }

    fn event(raw: &str, channel: Arc<RecordingChannel>) -> ChatEvent {
        ChatEvent::new(raw, Sender::new("user"), channel)
    }

    #[tokio::test]
    async fn test_classify_command() {
        let dispatcher = EventDispatcher::new(empty_registry(), table(), Vec::new());

        let ev = event("!say hello", RecordingChannel::public());
        assert_eq!(dispatcher.classify(&ev), EventClass::Command("say".to_string()));

        let ev = event("!unknown hello", RecordingChannel::public());
        assert_eq!(dispatcher.classify(&ev), EventClass::Plain);

        let ev = event("just chatting", RecordingChannel::public());
        assert_eq!(dispatcher.classify(&ev), EventClass::Plain);

        let ev = event("!say hello", RecordingChannel::private());
        assert_eq!(dispatcher.classify(&ev), EventClass::Private);
    }

    #[tokio::test]
    async fn test_stop_sentinel_short_circuits() {
        let registry = empty_registry();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let third = Arc::new(AtomicUsize::new(0));

        registry.set(
            "H1",
            Arc::new(Counting {
                calls: Arc::clone(&first),
                stop: false,
            }),
        );
        registry.set(
            "H2",
            Arc::new(Counting {
                calls: Arc::clone(&second),
                stop: true,
            }),
        );
        registry.set(
            "H3",
            Arc::new(Counting {
                calls: Arc::clone(&third),
                stop: false,
            }),
        );

        let dispatcher = EventDispatcher::new(registry, table(), Vec::new());
        dispatcher
            .dispatch(&event("just chatting", RecordingChannel::public()))
            .await;

        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);
        assert_eq!(third.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_capability_is_skipped() {
        let registry = empty_registry();
        let private_calls = Arc::new(AtomicUsize::new(0));

        // Counting has no private capability; PrivateOnly does.
        registry.set(
            "Chat",
            Arc::new(Counting {
                calls: Arc::new(AtomicUsize::new(0)),
                stop: false,
            }),
        );
        registry.set(
            "Dm",
            Arc::new(PrivateOnly {
                calls: Arc::clone(&private_calls),
            }),
        );

        let dispatcher = EventDispatcher::new(registry, table(), Vec::new());
        dispatcher
            .dispatch(&event("hello", RecordingChannel::private()))
            .await;

        assert_eq!(private_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_admin_command_gated() {
        let registry = empty_registry();
        let calls = Arc::new(AtomicUsize::new(0));
        registry.set(
            "Dev",
            Arc::new(Counting {
                calls: Arc::clone(&calls),
                stop: false,
            }),
        );

        let dispatcher =
            EventDispatcher::new(registry, table(), vec!["admin-id".to_string()]);

        let channel = RecordingChannel::public();
        dispatcher.dispatch(&event("!dev", Arc::clone(&channel))).await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(channel.sent(), vec![PERMISSION_DENIED.to_string()]);
    }

    #[tokio::test]
    async fn test_admin_passes_via_group_membership() {
        let registry = empty_registry();
        let calls = Arc::new(AtomicUsize::new(0));
        registry.set(
            "Dev",
            Arc::new(Counting {
                calls: Arc::clone(&calls),
                stop: false,
            }),
        );

        let dispatcher =
            EventDispatcher::new(registry, table(), vec!["staff".to_string()]);

        let channel = RecordingChannel::public();
        let ev = ChatEvent::new(
            "!dev",
            Sender::new("user").with_group("staff"),
            channel,
        );
        dispatcher.dispatch(&ev).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_arity_gate_replies_with_syntax() {
        let registry = empty_registry();
        let calls = Arc::new(AtomicUsize::new(0));
        registry.set(
            "Basic",
            Arc::new(Counting {
                calls: Arc::clone(&calls),
                stop: false,
            }),
        );

        let dispatcher = EventDispatcher::new(registry, table(), Vec::new());

        let channel = RecordingChannel::public();
        dispatcher.dispatch(&event("!say", Arc::clone(&channel))).await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            channel.sent(),
            vec!["Not enough parameters given. Syntax: `!Say [Message]`".to_string()]
        );
    }

    #[tokio::test]
    async fn test_mutation_mid_dispatch_affects_next_event_only() {
        /// Removes `victim` from the registry, then continues.
        struct Saboteur {
            victim: &'static str,
        }

        #[async_trait]
        impl PlainMessageHandler for Saboteur {
            async fn on_plain_message(&self, ctx: &ModuleContext, _event: &ChatEvent) -> Flow {
                ctx.registry().remove(self.victim);
                Flow::Continue
            }
        }

        impl Module for Saboteur {
            fn as_plain(&self) -> Option<&dyn PlainMessageHandler> {
                Some(self)
            }
        }

        let registry = empty_registry();
        let calls = Arc::new(AtomicUsize::new(0));
        registry.set("Saboteur", Arc::new(Saboteur { victim: "Victim" }));
        registry.set(
            "Victim",
            Arc::new(Counting {
                calls: Arc::clone(&calls),
                stop: false,
            }),
        );

        let dispatcher = EventDispatcher::new(registry, table(), Vec::new());

        // In-flight traversal still reaches the removed module.
        dispatcher
            .dispatch(&event("hello", RecordingChannel::public()))
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // The next dispatch no longer sees it.
        dispatcher
            .dispatch(&event("hello", RecordingChannel::public()))
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_named_capability_dispatch() {
        struct Greeter {
            calls: Arc<AtomicUsize>,
        }

        impl Module for Greeter {
            fn call<'a>(
                &'a self,
                name: &'a str,
                _ctx: &'a ModuleContext,
                _event: &'a ChatEvent,
            ) -> futures::future::BoxFuture<'a, Option<Flow>> {
                Box::pin(async move {
                    if name == "greet" {
                        self.calls.fetch_add(1, Ordering::SeqCst);
                        Some(Flow::Continue)
                    } else {
                        None
                    }
                })
            }
        }

        let registry = empty_registry();
        let calls = Arc::new(AtomicUsize::new(0));
        registry.set(
            "Greeter",
            Arc::new(Greeter {
                calls: Arc::clone(&calls),
            }),
        );
        // A module with no custom capabilities is skipped without error.
        registry.set(
            "Mute",
            Arc::new(Counting {
                calls: Arc::new(AtomicUsize::new(0)),
                stop: false,
            }),
        );

        let dispatcher = EventDispatcher::new(registry, table(), Vec::new());
        let ev = event("hello", RecordingChannel::public());

        dispatcher.dispatch_named("greet", &ev).await;
        dispatcher.dispatch_named("unknown", &ev).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
