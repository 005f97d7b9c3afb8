//! Configuration schema definitions.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use ember_modules::{CommandSpec, CommandTable};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmberConfig {
    /// Debug mode. Gates hot module loading and the unload/reload
    /// chat commands.
    #[serde(default = "default_debug")]
    pub debug: bool,

    /// The bot's own identity.
    #[serde(default)]
    pub bot: BotConfig,

    /// Command recognition settings.
    #[serde(default)]
    pub command: CommandConfig,

    /// Declared chat commands, keyed by name. Entries here extend and
    /// override the stock set.
    #[serde(default = "default_commands")]
    pub commands: HashMap<String, CommandSpec>,

    /// Module discovery settings.
    #[serde(default)]
    pub modules: ModulesConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for EmberConfig {
    fn default() -> Self {
        Self {
            debug: default_debug(),
            bot: BotConfig::default(),
            command: CommandConfig::default(),
            commands: default_commands(),
            modules: ModulesConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl EmberConfig {
    /// Assembles the dispatch-ready command table from the prefix and
    /// the declared commands.
    pub fn command_table(&self) -> CommandTable {
        CommandTable {
            prefix: self.command.prefix,
            commands: self.commands.clone(),
        }
    }
}

fn default_debug() -> bool {
    true
}

/// The stock command set. Deployments override or extend it through
/// `[commands.<name>]` tables.
fn default_commands() -> HashMap<String, CommandSpec> {
    CommandTable::default()
        .with_command("say", CommandSpec::new(1, "Say [Message]"))
        .with_command("info", CommandSpec::new(0, "Info"))
        .with_command("version", CommandSpec::new(0, "Version"))
        .with_command("time", CommandSpec::new(0, "Time"))
        .with_command(
            "module",
            CommandSpec::new(1, "Module [Load|Unload|Reload|Time|Loaded] [Module]").admin(),
        )
        .with_command("dev", CommandSpec::new(1, "Dev [Modules|Uptime]").admin())
        .commands
}

/// Command recognition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandConfig {
    /// Single character a command message must start with.
    #[serde(default = "default_prefix")]
    pub prefix: char,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
        }
    }
}

fn default_prefix() -> char {
    '!'
}

/// The bot's own identity and its operators.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BotConfig {
    /// Protocol-level id of the bot's own account. Messages from this
    /// id are dropped before dispatch so the bot never answers itself.
    #[serde(default)]
    pub id: String,

    /// Human-readable name.
    #[serde(default)]
    pub name: String,

    /// User and group ids allowed to run admin commands.
    #[serde(default)]
    pub admins: Vec<String>,
}

/// Module discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModulesConfig {
    /// Host directory scanned for module source units.
    #[serde(default = "default_module_dir")]
    pub directory: PathBuf,

    /// Module keys placed at the tail of the dispatch traversal, in
    /// their own relative load order.
    #[serde(default)]
    pub priority: Vec<String>,
}

impl Default for ModulesConfig {
    fn default() -> Self {
        Self {
            directory: default_module_dir(),
            priority: Vec::new(),
        }
    }
}

fn default_module_dir() -> PathBuf {
    PathBuf::from("modules")
}

/// Log level for configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Returns the level as a filter directive fragment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line, abbreviated.
    #[default]
    Compact,
    /// Multi-line, human-oriented.
    Pretty,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Global level.
    #[serde(default)]
    pub level: LogLevel,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Per-module level overrides, e.g. `ember_modules = "debug"`.
    #[serde(default)]
    pub filters: HashMap<String, LogLevel>,
}
