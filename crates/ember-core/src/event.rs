//! The chat event model.
//!
//! A protocol client (Discord, IRC, a test harness...) turns whatever it
//! receives from the wire into a [`ChatEvent`] and hands it to the
//! dispatcher. The event is read-only from the modules' point of view;
//! the only way back out is the opaque [`Channel`] handle it carries.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::message::ParsedMessage;

/// Identity of the user a message came from.
///
/// `groups` holds whatever group/role identifiers the protocol client
/// knows about the sender; the permission gate accepts a sender when
/// either the id itself or any group id appears in the authorized set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sender {
    /// Protocol-level user id.
    pub id: String,
    /// Group / role memberships of the sender.
    pub groups: Vec<String>,
}

impl Sender {
    /// Creates a sender with no group memberships.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            groups: Vec::new(),
        }
    }

    /// Adds a group membership (builder pattern).
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group.into());
        self
    }
}

/// Opaque handle to the channel a message originated from.
///
/// Owned by the protocol client; the module runtime only ever calls
/// [`send`](Channel::send) on it. Gate failures (missing permission,
/// too few arguments) and module replies all go through here.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Sends a message back to the originating channel.
    async fn send(&self, text: &str);

    /// Whether this channel is a private / direct conversation.
    fn is_private(&self) -> bool {
        false
    }
}

/// How an incoming event is routed to module capabilities.
///
/// Classification happens once per raw event, before any module runs;
/// each variant maps to exactly one capability method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventClass {
    /// A private / direct message (also covers call and recipient-add
    /// system events from protocols that report them as private).
    Private,
    /// A recognized command; the payload is the lower-cased command name.
    Command(String),
    /// Anything else posted in a channel.
    Plain,
}

/// One incoming chat message, parsed and ready for dispatch.
#[derive(Clone)]
pub struct ChatEvent {
    /// Parsed form of the raw text.
    pub message: ParsedMessage,
    /// Who sent it.
    pub sender: Sender,
    /// Whether the protocol client flagged this as a private message.
    pub private: bool,
    /// Handle back to the originating channel.
    pub channel: Arc<dyn Channel>,
}

impl ChatEvent {
    /// Builds an event from raw text and the protocol-client handles.
    ///
    /// The text is parsed exactly once here; modules and the dispatcher
    /// all share the resulting [`ParsedMessage`].
    pub fn new(raw: &str, sender: Sender, channel: Arc<dyn Channel>) -> Self {
        let private = channel.is_private();
        Self {
            message: ParsedMessage::parse(raw),
            sender,
            private,
            channel,
        }
    }

    /// The full original text.
    pub fn raw(&self) -> &str {
        &self.message.raw
    }

    /// Sends a reply to the originating channel.
    pub async fn reply(&self, text: &str) {
        self.channel.send(text).await;
    }
}

impl fmt::Debug for ChatEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatEvent")
            .field("message", &self.message)
            .field("sender", &self.sender)
            .field("private", &self.private)
            .finish_non_exhaustive()
    }
}
