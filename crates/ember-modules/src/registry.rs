//! The module registry.
//!
//! An ordered, keyed collection of live handler entries. The registry
//! owns structural mutation (load/unload/reload/set/remove), key lookup
//! and the traversal order the dispatcher follows.
//!
//! # Priority placement
//!
//! Two ordered key sequences are maintained: the regular sequence and a
//! priority tail. A key named in the configured priority list always
//! lands in the tail; everything else appends to the regular sequence.
//! [`list`](ModuleRegistry::list) concatenates the two, so priority
//! modules trail all non-priority modules while preserving their own
//! relative load order. Cross-cutting modules registered as priority
//! are guaranteed the last word on every event.
//!
//! # Mutation during dispatch
//!
//! All operations take `&self`; interior state sits behind a
//! `parking_lot::RwLock` that is never held across an `.await`. The
//! dispatcher iterates a snapshot taken at the start of each dispatch,
//! so a handler reloading its neighbours mid-traversal only affects the
//! **next** event.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::RwLock;
use tracing::{debug, info};

use ember_core::inflect::camelize;

use crate::error::ModuleResult;
use crate::loader::ModuleLoader;
use crate::module::Module;
use crate::scanner::ModuleOrigin;

/// A live, registered handler entry.
#[derive(Clone)]
pub struct LoadedModule {
    /// Canonical registry key.
    pub key: String,
    /// The handler object itself.
    pub handler: Arc<dyn Module>,
    /// When this entry was last (re)loaded.
    pub loaded_at: SystemTime,
    /// Process-unique identity; fresh on every hot load, stable otherwise.
    pub identity: String,
    /// Whether this entry came through the hot path.
    pub hot: bool,
    /// Root the entry was loaded from.
    pub origin: ModuleOrigin,
}

/// Outcome of a load operation. All variants are normal results, not
/// errors; callers typically translate them into a chat reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// The module is now registered.
    Loaded,
    /// The key was already present; the registry is unchanged.
    AlreadyLoaded,
    /// No source unit exists for the key; the registry is unchanged.
    NotFound,
}

/// Outcome of an unload operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnloadStatus {
    /// The entry was removed.
    Unloaded,
    /// The key was absent; nothing changed.
    AlreadyUnloaded,
}

/// Outcome of a reload operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadStatus {
    /// A fresh instance replaced the old entry.
    Reloaded,
    /// The key was not loaded; no load was attempted.
    AlreadyUnloaded,
    /// The entry was unloaded but its source unit has disappeared.
    NotFound,
}

/// Options for load and reload.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Request the hot path (refused outside debug).
    pub hot: bool,
    /// Resolve the key inside the named extension pack instead of the
    /// host module directory.
    pub pack: Option<String>,
}

impl LoadOptions {
    /// Options for a hot or stable load from the host directory.
    pub fn hot(hot: bool) -> Self {
        Self { hot, pack: None }
    }

    /// Resolves the key inside the named pack.
    pub fn with_pack(mut self, name: impl Into<String>) -> Self {
        self.pack = Some(name.into());
        self
    }
}

#[derive(Default)]
struct OrderedState {
    modules: HashMap<String, LoadedModule>,
    regular: Vec<String>,
    priority_tail: Vec<String>,
}

impl OrderedState {
    fn drop_key(&mut self, key: &str) {
        self.modules.remove(key);
        self.regular.retain(|k| k != key);
        self.priority_tail.retain(|k| k != key);
    }
}

/// Ordered, keyed collection of loaded modules.
pub struct ModuleRegistry {
    loader: ModuleLoader,
    priority: Vec<String>,
    state: RwLock<OrderedState>,
}

impl ModuleRegistry {
    /// Creates an empty registry.
    ///
    /// `priorities` is the configured priority list; keys are camelized
    /// on the way in. Call [`load_all`](Self::load_all) to perform the
    /// initial bulk scan.
    pub fn new(loader: ModuleLoader, priorities: Vec<String>) -> Self {
        Self {
            loader,
            priority: priorities.iter().map(|k| camelize(k)).collect(),
            state: RwLock::new(OrderedState::default()),
        }
    }

    /// Whether the loader permits hot loading.
    pub fn is_debug(&self) -> bool {
        self.loader.is_debug()
    }

    /// Scans the host directory and every registered pack, loading each
    /// discovered unit. Returns the number of modules newly loaded.
    ///
    /// Discovery failure is propagated untouched: a missing module
    /// root is a deployment error and the process should fail fast.
    pub fn load_all(&self) -> ModuleResult<usize> {
        let hot = self.loader.is_debug();
        let mut loaded = 0;
        for unit in self.loader.discover()? {
            let opts = LoadOptions {
                hot,
                pack: match &unit.origin {
                    ModuleOrigin::Host => None,
                    ModuleOrigin::Pack(name) => Some(name.clone()),
                },
            };
            if self.load(&unit.source_key, opts)? == LoadStatus::Loaded {
                loaded += 1;
            }
        }
        info!(count = loaded, "Modules loaded");
        Ok(loaded)
    }

    /// Registers an extension pack and loads every module it ships.
    pub fn load_pack(
        &self,
        name: impl Into<String>,
        root: impl Into<std::path::PathBuf>,
    ) -> ModuleResult<usize> {
        let name = name.into();
        let root = root.into();
        self.loader.register_pack(name.clone(), root.clone());

        let hot = self.loader.is_debug();
        let mut loaded = 0;
        for unit in crate::scanner::PathScanner.scan_pack(&name, &root)? {
            let opts = LoadOptions {
                hot,
                pack: Some(name.clone()),
            };
            if self.load(&unit.source_key, opts)? == LoadStatus::Loaded {
                loaded += 1;
            }
        }
        Ok(loaded)
    }

    /// Binds (or hot-swaps) a module factory on the underlying loader.
    pub fn bind(&self, key: &str, factory: crate::loader::ModuleFactory) {
        self.loader.bind(key, factory);
    }

    /// Loads a module by key.
    ///
    /// The key is camelized first. Loading an already-present key is a
    /// no-op reported as [`LoadStatus::AlreadyLoaded`]; a key with no
    /// source unit on disk reports [`LoadStatus::NotFound`]. A fatal
    /// loader error (no bound factory, hot outside debug) leaves the
    /// registry exactly as it was.
    pub fn load(&self, key: &str, opts: LoadOptions) -> ModuleResult<LoadStatus> {
        let key = camelize(key);
        let mut state = self.state.write();

        if state.modules.contains_key(&key) {
            return Ok(LoadStatus::AlreadyLoaded);
        }
        let Some(unit) = self.loader.resolve(&key, opts.pack.as_deref()) else {
            return Ok(LoadStatus::NotFound);
        };

        let module = self.loader.load(&unit, opts.hot)?;
        self.place(&mut state, module);
        info!(module = %key, "Module loaded");
        Ok(LoadStatus::Loaded)
    }

    /// Unloads a module. Removing an absent key is a distinct no-op;
    /// other entries keep their relative order either way.
    pub fn unload(&self, key: &str) -> UnloadStatus {
        let key = camelize(key);
        let mut state = self.state.write();

        if !state.modules.contains_key(&key) {
            return UnloadStatus::AlreadyUnloaded;
        }
        state.drop_key(&key);
        info!(module = %key, "Module unloaded");
        UnloadStatus::Unloaded
    }

    /// Reloads a module: a fresh instance replaces the old entry and the
    /// key moves to the end of its sequence, as if unloaded then loaded.
    ///
    /// An absent key short-circuits with
    /// [`ReloadStatus::AlreadyUnloaded`] and no load is attempted. A
    /// pack-originated entry resolves from its pack again unless `opts`
    /// overrides it. The new instance is constructed **before** the old
    /// one is dropped, so a fatal load error leaves the previous entry
    /// in place.
    pub fn reload(&self, key: &str, opts: LoadOptions) -> ModuleResult<ReloadStatus> {
        let key = camelize(key);
        let mut state = self.state.write();

        let Some(existing) = state.modules.get(&key) else {
            return Ok(ReloadStatus::AlreadyUnloaded);
        };

        let mut pack = opts.pack;
        if pack.is_none() {
            if let ModuleOrigin::Pack(name) = &existing.origin {
                pack = Some(name.clone());
            }
        }

        let Some(unit) = self.loader.resolve(&key, pack.as_deref()) else {
            // The unload half still applies when the source has gone away.
            state.drop_key(&key);
            return Ok(ReloadStatus::NotFound);
        };

        let module = self.loader.load(&unit, opts.hot)?;
        state.drop_key(&key);
        self.place(&mut state, module);
        info!(module = %key, "Module reloaded");
        Ok(ReloadStatus::Reloaded)
    }

    /// Directly registers a handler, bypassing the loader.
    ///
    /// Used for programmatic registration. The entry is still subject
    /// to the priority-placement rule; conformance to the capability
    /// set is carried by the `Arc<dyn Module>` type itself. Setting a
    /// key that is already present replaces the handler in place.
    pub fn set(&self, key: &str, handler: Arc<dyn Module>) {
        let key = camelize(key);
        let mut state = self.state.write();

        let module = LoadedModule {
            key: key.clone(),
            handler,
            loaded_at: SystemTime::now(),
            identity: format!("registered::{key}"),
            hot: false,
            origin: ModuleOrigin::Host,
        };

        if let Some(existing) = state.modules.get_mut(&key) {
            *existing = module;
            debug!(module = %key, "Module replaced in place");
        } else {
            self.place(&mut state, module);
            debug!(module = %key, "Module registered directly");
        }
    }

    /// Returns the handler registered under `key`, if any.
    pub fn get(&self, key: &str) -> Option<Arc<dyn Module>> {
        let key = camelize(key);
        self.state
            .read()
            .modules
            .get(&key)
            .map(|m| Arc::clone(&m.handler))
    }

    /// Whether `key` is currently loaded.
    pub fn has(&self, key: &str) -> bool {
        let key = camelize(key);
        self.state.read().modules.contains_key(&key)
    }

    /// Drops an entry if present. Always returns `true`; removing an
    /// absent key is not an error.
    pub fn remove(&self, key: &str) -> bool {
        let key = camelize(key);
        self.state.write().drop_key(&key);
        true
    }

    /// Keys in dispatch traversal order: the regular sequence followed
    /// by the priority tail.
    pub fn list(&self) -> Vec<String> {
        let state = self.state.read();
        state
            .regular
            .iter()
            .chain(state.priority_tail.iter())
            .cloned()
            .collect()
    }

    /// Number of loaded modules.
    pub fn len(&self) -> usize {
        self.state.read().modules.len()
    }

    /// Whether nothing is loaded.
    pub fn is_empty(&self) -> bool {
        self.state.read().modules.is_empty()
    }

    /// When `key` was last (re)loaded, or `None` if unknown.
    pub fn time_loaded(&self, key: &str) -> Option<SystemTime> {
        let key = camelize(key);
        self.state.read().modules.get(&key).map(|m| m.loaded_at)
    }

    /// Whether `key` came through the hot path. `None` (not `false`)
    /// when the key is unknown.
    pub fn is_hot_loaded(&self, key: &str) -> Option<bool> {
        let key = camelize(key);
        self.state.read().modules.get(&key).map(|m| m.hot)
    }

    /// The process-unique identity of `key`'s current instance.
    pub fn identity(&self, key: &str) -> Option<String> {
        let key = camelize(key);
        self.state
            .read()
            .modules
            .get(&key)
            .map(|m| m.identity.clone())
    }

    /// Which root `key` was loaded from.
    pub fn origin(&self, key: &str) -> Option<ModuleOrigin> {
        let key = camelize(key);
        self.state.read().modules.get(&key).map(|m| m.origin.clone())
    }

    /// A stable snapshot of the traversal, taken under a brief read
    /// lock. The dispatcher iterates this, not the live structure.
    pub fn snapshot(&self) -> Vec<(String, Arc<dyn Module>)> {
        let state = self.state.read();
        state
            .regular
            .iter()
            .chain(state.priority_tail.iter())
            .filter_map(|key| {
                state
                    .modules
                    .get(key)
                    .map(|m| (key.clone(), Arc::clone(&m.handler)))
            })
            .collect()
    }

    fn place(&self, state: &mut OrderedState, module: LoadedModule) {
        let key = module.key.clone();
        state.modules.insert(key.clone(), module);
        if self.priority.contains(&key) {
            state.priority_tail.push(key);
        } else {
            state.regular.push(key);
        }
    }
}
