//! Configuration loader using figment.
//!
//! Sources are layered, later overriding earlier:
//!
//! 1. Built-in defaults
//! 2. Programmatic overrides merged via [`ConfigLoader::merge`]
//! 3. Profile-specific config file (`ember.{profile}.toml`)
//! 4. Main config file (`ember.toml` / `config.toml`)
//! 5. Environment variables (`EMBER_*`)
//!
//! Environment variables use the `EMBER_` prefix with `__` as the
//! nesting separator: `EMBER_LOGGING__LEVEL=debug` maps to
//! `logging.level = "debug"`, `EMBER_MODULES__DIRECTORY=./mods` to
//! `modules.directory = "./mods"`.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use tracing::{debug, info, trace};

use super::error::{ConfigError, ConfigResult};
use super::schema::EmberConfig;

/// Base file names searched in each search path.
const BASE_NAMES: &[&str] = &["ember.toml", "config.toml"];

/// Configuration profile for environment-specific settings.
#[derive(Debug, Clone, Default)]
pub enum Profile {
    /// Development profile (default).
    #[default]
    Development,
    /// Production profile.
    Production,
    /// Custom profile name.
    Custom(String),
}

impl Profile {
    /// Returns the profile name as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Reads `EMBER_PROFILE`, defaulting to development.
    pub fn from_env() -> Self {
        std::env::var("EMBER_PROFILE")
            .map(|p| Self::parse(&p))
            .unwrap_or_default()
    }

    fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            _ => Self::Custom(name.to_string()),
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Figment-based multi-source configuration loader.
///
/// ```rust,ignore
/// let config = ConfigLoader::new()
///     .profile("production")
///     .search_path("/etc/ember")
///     .load()?;
/// ```
pub struct ConfigLoader {
    figment: Figment,
    profile: Profile,
    search_paths: Vec<PathBuf>,
    load_env: bool,
    config_file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader with defaults: profile from the environment,
    /// environment variables enabled, standard search paths.
    pub fn new() -> Self {
        Self {
            figment: Figment::new(),
            profile: Profile::from_env(),
            search_paths: Vec::new(),
            load_env: true,
            config_file: None,
        }
    }

    /// Sets the configuration profile.
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Profile::parse(&profile.into());
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Loads one specific configuration file, bypassing the search.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Disables the environment variable layer.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Merges configuration programmatically, below the file layers.
    pub fn merge(mut self, config: EmberConfig) -> Self {
        self.figment = self.figment.merge(Serialized::defaults(config));
        self
    }

    /// Loads and returns the configuration.
    pub fn load(self) -> ConfigResult<EmberConfig> {
        let profile = self.profile.clone();
        let figment = self.build_figment()?;

        let config: EmberConfig = figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        debug!(
            profile = %profile,
            debug_mode = config.debug,
            "Configuration loaded"
        );

        Ok(config)
    }

    fn build_figment(mut self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(EmberConfig::default()));

        let user_figment = std::mem::take(&mut self.figment);
        figment = figment.merge(user_figment);

        if let Some(path) = &self.config_file {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.clone()));
            }
            info!(path = %path.display(), "Loading configuration file");
            figment = figment.merge(Toml::file(path));
        } else {
            figment = self.search_config_files(figment);
        }

        if self.load_env {
            trace!("Loading environment variables with EMBER_ prefix");
            figment = figment.merge(
                Env::prefixed("EMBER_")
                    .split("__")
                    .map(|key| key.as_str().replace("__", ".").into()),
            );
        }

        Ok(figment)
    }

    fn resolve_search_paths(&self) -> Vec<PathBuf> {
        if !self.search_paths.is_empty() {
            return self.search_paths.clone();
        }

        let mut paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd);
        }
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("ember"));
        }
        paths
    }

    /// Walks `search_paths × base_names`; the profile-specific variant
    /// of each base file is merged first so the base file overrides it
    /// only where both define a key. The first path containing a base
    /// file ends the search.
    fn search_config_files(&self, mut figment: Figment) -> Figment {
        for search_path in self.resolve_search_paths() {
            for base_name in BASE_NAMES {
                let stem = base_name.trim_end_matches(".toml");
                let profile_path =
                    search_path.join(format!("{stem}.{}.toml", self.profile.as_str()));
                if profile_path.exists() {
                    info!(path = %profile_path.display(), "Loading profile configuration file");
                    figment = figment.merge(Toml::file(profile_path));
                }

                let base_path = search_path.join(base_name);
                if base_path.exists() {
                    info!(path = %base_path.display(), "Loading configuration file");
                    return figment.merge(Toml::file(base_path));
                }
            }
        }
        figment
    }
}
