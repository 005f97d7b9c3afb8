//! The configured command table.
//!
//! Commands are declared in configuration, not in code: each entry
//! names its minimum parameter count, a human-readable syntax line and
//! whether it is restricted to administrators. The dispatcher consults
//! this table when classifying events and when producing the
//! user-facing syntax notice.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Declaration of one chat command.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CommandSpec {
    /// Minimum number of whitespace-delimited arguments required.
    #[serde(default)]
    pub params: usize,
    /// Help text shown when too few arguments are given.
    #[serde(default)]
    pub syntax: String,
    /// Restrict to the configured authorized set.
    #[serde(default)]
    pub admin: bool,
}

impl CommandSpec {
    /// A command with the given arity and syntax line.
    pub fn new(params: usize, syntax: impl Into<String>) -> Self {
        Self {
            params,
            syntax: syntax.into(),
            admin: false,
        }
    }

    /// Marks the command admin-only (builder pattern).
    pub fn admin(mut self) -> Self {
        self.admin = true;
        self
    }
}

/// All declared commands plus the prefix character that introduces them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandTable {
    /// Single character a command message must start with.
    #[serde(default = "default_prefix")]
    pub prefix: char,
    /// Command declarations, keyed by lower-cased name.
    #[serde(default)]
    pub commands: HashMap<String, CommandSpec>,
}

fn default_prefix() -> char {
    '!'
}

impl Default for CommandTable {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            commands: HashMap::new(),
        }
    }
}

impl CommandTable {
    /// An empty table with the given prefix.
    pub fn new(prefix: char) -> Self {
        Self {
            prefix,
            commands: HashMap::new(),
        }
    }

    /// Declares a command (builder pattern). Names are stored lower-cased
    /// to match the parser's output.
    pub fn with_command(mut self, name: impl Into<String>, spec: CommandSpec) -> Self {
        self.commands.insert(name.into().to_lowercase(), spec);
        self
    }

    /// Looks up a command by its lower-cased name.
    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.get(name)
    }

    /// Whether `name` is a declared command.
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// The notice sent when a command is invoked with too few arguments.
    pub fn syntax_notice(&self, name: &str) -> String {
        match self.get(name) {
            Some(spec) => format!(
                "Not enough parameters given. Syntax: `{}{}`",
                self.prefix, spec.syntax
            ),
            None => format!("Unknown command `{name}`."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_notice_includes_prefix() {
        let table = CommandTable::new('!').with_command("say", CommandSpec::new(1, "Say [Message]"));
        assert_eq!(
            table.syntax_notice("say"),
            "Not enough parameters given. Syntax: `!Say [Message]`"
        );
    }

    #[test]
    fn test_with_command_lowercases_name() {
        let table = CommandTable::new('!').with_command("Say", CommandSpec::new(1, "Say [Message]"));
        assert!(table.contains("say"));
        assert!(!table.contains("Say"));
    }

    #[test]
    fn test_admin_builder() {
        let spec = CommandSpec::new(1, "Module [...]").admin();
        assert!(spec.admin);
    }
}
