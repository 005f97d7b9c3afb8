//! The module capability set.
//!
//! A module is a polymorphic extension object that implements whichever
//! subset of the capability traits it cares about. The dispatcher asks
//! for each capability through the `as_*` accessors on [`Module`] and
//! silently skips modules that return `None`: one narrow trait per
//! capability instead of a single monolithic interface.
//!
//! Any capability method may return [`Flow::Stop`] to halt the
//! remaining traversal for the current event.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use ember_core::{Channel, ChatEvent};

use crate::registry::ModuleRegistry;

/// Return value of every capability method.
///
/// [`Flow::Stop`] is the reserved sentinel that halts further traversal
/// during dispatch; no later module receives the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    /// Let the remaining modules see the event.
    #[default]
    Continue,
    /// Halt dispatch; all work for this event is done.
    Stop,
}

/// Capability: plain channel messages.
#[async_trait]
pub trait PlainMessageHandler: Send + Sync {
    async fn on_plain_message(&self, ctx: &ModuleContext, event: &ChatEvent) -> Flow;
}

/// Capability: recognized commands (after the permission and arity
/// gates have already passed).
#[async_trait]
pub trait CommandMessageHandler: Send + Sync {
    async fn on_command_message(&self, ctx: &ModuleContext, event: &ChatEvent) -> Flow;
}

/// Capability: private / direct messages.
#[async_trait]
pub trait PrivateMessageHandler: Send + Sync {
    async fn on_private_message(&self, ctx: &ModuleContext, event: &ChatEvent) -> Flow;
}

/// A loadable extension object.
///
/// Implementations override the `as_*` accessors for the capabilities
/// they provide; the defaults advertise nothing, and the dispatcher
/// skips a module for any capability it does not expose.
///
/// # Custom capabilities
///
/// Beyond the three built-in capabilities, a module may answer to
/// arbitrary named capabilities via [`call`](Module::call). This is how
/// one module invokes another through the same dispatch mechanism: the
/// dispatcher checks for the capability by name at call time, and a
/// `None` answer means "not implemented here".
pub trait Module: Send + Sync {
    /// Plain-message capability, if implemented.
    fn as_plain(&self) -> Option<&dyn PlainMessageHandler> {
        None
    }

    /// Command-message capability, if implemented.
    fn as_command(&self) -> Option<&dyn CommandMessageHandler> {
        None
    }

    /// Private-message capability, if implemented.
    fn as_private(&self) -> Option<&dyn PrivateMessageHandler> {
        None
    }

    /// Invokes a programmer-defined capability by name.
    ///
    /// Returns `None` when this module does not implement `name`; the
    /// dispatcher treats that exactly like a missing `as_*` accessor.
    fn call<'a>(
        &'a self,
        name: &'a str,
        ctx: &'a ModuleContext,
        event: &'a ChatEvent,
    ) -> BoxFuture<'a, Option<Flow>> {
        let _ = (name, ctx, event);
        Box::pin(async { None })
    }
}

/// Context handed to every capability invocation.
///
/// Replaces the process-wide singletons of older bot designs: the
/// registry and the originating channel are threaded explicitly, so a
/// module can reply and can trigger load/unload/reload of other modules
/// from inside a dispatch.
#[derive(Clone)]
pub struct ModuleContext {
    registry: Arc<ModuleRegistry>,
    channel: Arc<dyn Channel>,
}

impl ModuleContext {
    /// Creates a context for one dispatch traversal.
    pub fn new(registry: Arc<ModuleRegistry>, channel: Arc<dyn Channel>) -> Self {
        Self { registry, channel }
    }

    /// The registry this dispatch is running against.
    ///
    /// Mutations made through it (load/unload/reload) take effect with
    /// the next dispatch, never the in-flight one.
    pub fn registry(&self) -> &Arc<ModuleRegistry> {
        &self.registry
    }

    /// Handle to the channel the event came from.
    pub fn channel(&self) -> &Arc<dyn Channel> {
        &self.channel
    }

    /// Sends a message to the originating channel.
    pub async fn reply(&self, text: &str) {
        self.channel.send(text).await;
    }
}
