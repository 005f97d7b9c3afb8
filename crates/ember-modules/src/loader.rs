//! Module instantiation.
//!
//! Handlers are compiled into the host process, so "loading" a module
//! means binding a discovered source unit to a registered constructor
//! and invoking it. The loader keeps the factory map; hot reload is a
//! factory swap: [`bind`](ModuleLoader::bind) an updated constructor
//! under the same key, reload, and the fresh instance atomically
//! replaces the old one in the registry. No identity-renaming trick is
//! needed, but each hot load still mints a process-unique synthetic
//! identity so reloaded instances stay distinguishable in diagnostics.
//!
//! Factories can be contributed two ways:
//!
//! - statically, via the [`MODULE_FACTORIES`] distributed slice (the
//!   built-in modules register themselves this way);
//! - programmatically, via [`ModuleLoader::bind`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use linkme::distributed_slice;
use parking_lot::RwLock;
use tracing::{debug, info};

use ember_core::inflect::camelize;

use crate::error::{ModuleError, ModuleResult};
use crate::module::Module;
use crate::registry::LoadedModule;
use crate::scanner::{HandlerUnit, ModuleOrigin, PathScanner};

/// Constructor for one module. Called on every (re)load.
pub type ModuleFactory = fn() -> Arc<dyn Module>;

/// One statically registered module constructor.
pub struct FactoryEntry {
    /// Canonical key the factory answers to.
    pub key: &'static str,
    /// The constructor itself.
    pub factory: ModuleFactory,
}

/// Registry of statically contributed module factories.
/// Each crate that ships modules contributes entries here.
#[distributed_slice]
pub static MODULE_FACTORIES: [FactoryEntry];

/// A registered extension pack root.
#[derive(Debug, Clone)]
pub struct PackRoot {
    /// Pack name, used as the [`ModuleOrigin::Pack`] tag.
    pub name: String,
    /// Directory scanned for this pack's source units.
    pub root: PathBuf,
}

/// Produces live, independently identified handler instances.
pub struct ModuleLoader {
    module_dir: PathBuf,
    packs: RwLock<Vec<PackRoot>>,
    factories: RwLock<HashMap<String, ModuleFactory>>,
    debug: bool,
}

impl ModuleLoader {
    /// Creates a loader over the host module directory.
    ///
    /// `debug` gates hot mode: when false the loader refuses hot loads
    /// entirely and every module binds its stable identity.
    pub fn new(module_dir: impl Into<PathBuf>, debug: bool) -> Self {
        Self {
            module_dir: module_dir.into(),
            packs: RwLock::new(Vec::new()),
            factories: RwLock::new(HashMap::new()),
            debug,
        }
    }

    /// Whether hot loading is permitted.
    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// The host module directory.
    pub fn module_dir(&self) -> &Path {
        &self.module_dir
    }

    /// Binds (or swaps) the factory for a key.
    ///
    /// Swapping an existing binding is the hot-reload mechanism: the
    /// next load of that key constructs from the new factory.
    pub fn bind(&self, key: &str, factory: ModuleFactory) {
        let key = camelize(key);
        debug!(module = %key, "Factory bound");
        self.factories.write().insert(key, factory);
    }

    /// Binds every factory contributed through [`MODULE_FACTORIES`].
    pub fn bind_registered(&self) {
        let mut factories = self.factories.write();
        for entry in MODULE_FACTORIES.iter() {
            factories.insert(camelize(entry.key), entry.factory);
        }
    }

    /// Registers an extension pack root for discovery and resolution.
    pub fn register_pack(&self, name: impl Into<String>, root: impl Into<PathBuf>) {
        let pack = PackRoot {
            name: name.into(),
            root: root.into(),
        };
        info!(pack = %pack.name, root = %pack.root.display(), "Extension pack registered");
        self.packs.write().push(pack);
    }

    /// Currently registered pack roots.
    pub fn packs(&self) -> Vec<PackRoot> {
        self.packs.read().clone()
    }

    /// Resolves a canonical key to a source unit on disk.
    ///
    /// With `pack = None` the host module directory is consulted;
    /// otherwise the named pack's root. A unit matches when its file
    /// stem camelizes to `key`, so `ModuleTest` resolves both
    /// `ModuleTest.rs` and `module_test.rs`. Returns `None` when no
    /// such file exists; the caller reports that as a `NotFound`
    /// status, not an error.
    pub fn resolve(&self, key: &str, pack: Option<&str>) -> Option<HandlerUnit> {
        let scanner = PathScanner;
        let units = match pack {
            None => scanner.scan(&self.module_dir).ok()?,
            Some(name) => {
                let packs = self.packs.read();
                let entry = packs.iter().find(|p| p.name == name)?;
                scanner.scan_pack(&entry.name, &entry.root).ok()?
            }
        };
        units.into_iter().find(|u| u.source_key == key)
    }

    /// Scans the host directory plus every registered pack.
    pub fn discover(&self) -> ModuleResult<Vec<HandlerUnit>> {
        let scanner = PathScanner;
        let mut units = scanner.scan(&self.module_dir)?;
        for pack in self.packs.read().iter() {
            units.extend(scanner.scan_pack(&pack.name, &pack.root)?);
        }
        Ok(units)
    }

    /// Instantiates the handler for a discovered unit.
    ///
    /// In stable mode the unit binds its canonical identity
    /// (`modules::{Key}`), constant across the process lifetime. In hot
    /// mode a fresh synthetic identity (`{Key}_{token}`) is minted per
    /// load so two loads of the same logical module never share one.
    ///
    /// # Errors
    ///
    /// [`ModuleError::HotDisabled`] when `hot` is requested outside
    /// debug; [`ModuleError::NotAHandler`] when no factory is bound for
    /// the unit's key. Either way nothing is registered.
    pub fn load(&self, unit: &HandlerUnit, hot: bool) -> ModuleResult<LoadedModule> {
        if hot && !self.debug {
            return Err(ModuleError::HotDisabled);
        }

        let factory = self
            .factories
            .read()
            .get(&unit.source_key)
            .copied()
            .ok_or_else(|| ModuleError::NotAHandler {
                key: unit.source_key.clone(),
            })?;

        let handler = factory();
        let identity = if hot {
            format!("{}_{:016x}", unit.source_key, rand::random::<u64>())
        } else {
            format!("modules::{}", unit.source_key)
        };

        debug!(module = %unit.source_key, identity = %identity, hot, "Module instantiated");

        Ok(LoadedModule {
            key: unit.source_key.clone(),
            handler,
            loaded_at: SystemTime::now(),
            identity,
            hot,
            origin: unit.origin.clone(),
        })
    }
}
