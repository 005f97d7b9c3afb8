//! # Ember Core
//!
//! Foundation types for the Ember bot framework.
//!
//! This layer contains everything the module runtime and the protocol
//! client both need to agree on, and nothing else:
//!
//! - The chat event model ([`ChatEvent`], [`Sender`], [`Channel`])
//! - Raw message parsing ([`ParsedMessage`])
//! - Event classification ([`EventClass`])
//! - Key normalization ([`inflect::camelize`])
//!
//! Higher layers (module registry, dispatcher, runtime) live in
//! `ember-modules` and `ember-runtime`.

pub mod event;
pub mod inflect;
pub mod message;

pub use event::{Channel, ChatEvent, EventClass, Sender};
pub use message::ParsedMessage;
