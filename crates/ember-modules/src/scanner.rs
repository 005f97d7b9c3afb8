//! Discovery of candidate module source units.
//!
//! The scanner turns a directory into a list of [`HandlerUnit`]s: one
//! per regular file with the recognized source suffix, dotfiles and
//! subdirectories ignored. Scans are stateless (every call re-reads
//! the directory) and all-or-nothing: an unreadable root fails before
//! a single unit is produced.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::trace;

use ember_core::inflect::camelize;

use crate::error::{ModuleError, ModuleResult};

/// File suffix a source unit must carry to be considered.
pub const SOURCE_SUFFIX: &str = ".rs";

/// Where a handler unit was discovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleOrigin {
    /// The application's own module directory.
    Host,
    /// A loaded extension pack, by name.
    Pack(String),
}

/// One loadable extension candidate, produced fresh on every scan.
#[derive(Debug, Clone)]
pub struct HandlerUnit {
    /// Stable logical name: the file stem, camelized.
    pub source_key: String,
    /// Filesystem location of the source unit.
    pub origin_path: PathBuf,
    /// Root this unit came from.
    pub origin: ModuleOrigin,
}

/// Enumerates module source units on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathScanner;

impl PathScanner {
    /// Scans the host module directory.
    pub fn scan(&self, root: &Path) -> ModuleResult<Vec<HandlerUnit>> {
        self.scan_with(root, ModuleOrigin::Host)
    }

    /// Scans an extension pack's module directory, tagging every unit
    /// with the pack's name.
    pub fn scan_pack(&self, name: &str, root: &Path) -> ModuleResult<Vec<HandlerUnit>> {
        self.scan_with(root, ModuleOrigin::Pack(name.to_string()))
    }

    fn scan_with(&self, root: &Path, origin: ModuleOrigin) -> ModuleResult<Vec<HandlerUnit>> {
        let discovery = |source| ModuleError::Discovery {
            path: root.to_path_buf(),
            source,
        };

        let mut units = Vec::new();
        for entry in fs::read_dir(root).map_err(discovery)? {
            let entry = entry.map_err(discovery)?;
            if !entry.file_type().map_err(discovery)?.is_file() {
                continue;
            }

            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            let Some(stem) = name.strip_suffix(SOURCE_SUFFIX) else {
                continue;
            };

            let unit = HandlerUnit {
                source_key: camelize(stem),
                origin_path: entry.path(),
                origin: origin.clone(),
            };
            trace!(key = %unit.source_key, path = %unit.origin_path.display(), "Discovered module unit");
            units.push(unit);
        }

        // Directory iteration order is filesystem-dependent; normalize so
        // bulk loads are deterministic.
        units.sort_by(|a, b| a.source_key.cmp(&b.source_key));
        Ok(units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "").unwrap();
    }

    #[test]
    fn test_scan_filters_and_camelizes() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "basic.rs");
        touch(dir.path(), "module_test.rs");
        touch(dir.path(), ".hidden.rs");
        touch(dir.path(), "notes.txt");
        fs::create_dir(dir.path().join("subdir")).unwrap();

        let units = PathScanner.scan(dir.path()).unwrap();
        let keys: Vec<&str> = units.iter().map(|u| u.source_key.as_str()).collect();
        assert_eq!(keys, vec!["Basic", "ModuleTest"]);
        assert!(units.iter().all(|u| u.origin == ModuleOrigin::Host));
    }

    #[test]
    fn test_scan_missing_root_fails_without_yielding() {
        let result = PathScanner.scan(Path::new("/nonexistent/module/root"));
        assert!(matches!(result, Err(ModuleError::Discovery { .. })));
    }

    #[test]
    fn test_scan_pack_tags_origin() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "call_magic.rs");

        let units = PathScanner.scan_pack("CallMagic", dir.path()).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].source_key, "CallMagic");
        assert_eq!(units[0].origin, ModuleOrigin::Pack("CallMagic".to_string()));
    }

    #[test]
    fn test_scan_is_restartable() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "basic.rs");

        let scanner = PathScanner;
        assert_eq!(scanner.scan(dir.path()).unwrap().len(), 1);
        touch(dir.path(), "extra.rs");
        assert_eq!(scanner.scan(dir.path()).unwrap().len(), 2);
    }
}
