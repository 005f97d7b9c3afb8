//! # Ember Modules
//!
//! The module engine of the Ember bot framework.
//!
//! This crate provides everything between a raw chat event and the
//! handler code that answers it:
//!
//! - **Discovery**: [`PathScanner`] maps source units on disk to
//!   canonical module keys
//! - **Loading**: [`ModuleLoader`] binds keys to registered factories
//!   and mints per-instance identities; swapping a factory is the
//!   hot-reload mechanism
//! - **Registry**: [`ModuleRegistry`] keeps the ordered, keyed set of
//!   live modules, with priority modules trailing the traversal
//! - **Dispatch**: [`EventDispatcher`] classifies each event once and
//!   fans it out capability by capability, honoring the
//!   [`Flow::Stop`] sentinel
//!
//! Built-in modules ([`Basic`], [`Manager`], [`Developer`]) register
//! their factories through the [`MODULE_FACTORIES`] distributed slice.

pub mod builtin;
pub mod command;
pub mod dispatcher;
pub mod error;
pub mod loader;
pub mod module;
pub mod registry;
pub mod scanner;

pub use builtin::{Basic, Developer, Manager};
pub use command::{CommandSpec, CommandTable};
pub use dispatcher::EventDispatcher;
pub use error::{ModuleError, ModuleResult};
pub use loader::{FactoryEntry, MODULE_FACTORIES, ModuleFactory, ModuleLoader, PackRoot};
pub use module::{
    CommandMessageHandler, Flow, Module, ModuleContext, PlainMessageHandler,
    PrivateMessageHandler,
};
pub use registry::{
    LoadOptions, LoadStatus, LoadedModule, ModuleRegistry, ReloadStatus, UnloadStatus,
};
pub use scanner::{HandlerUnit, ModuleOrigin, PathScanner};
