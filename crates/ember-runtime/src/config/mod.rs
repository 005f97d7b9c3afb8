//! Configuration loading and schema.

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile};
pub use schema::{
    BotConfig, CommandConfig, EmberConfig, LogFormat, LogLevel, LoggingConfig, ModulesConfig,
};

/// Loads configuration from the default locations.
pub fn load_config() -> ConfigResult<EmberConfig> {
    ConfigLoader::new().load()
}
