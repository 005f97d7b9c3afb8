//! Raw message parsing.
//!
//! Every incoming line of chat is split once, up front, into the pieces
//! the dispatcher and the modules care about. Parsing never fails: text
//! that does not look like a command simply yields an empty command name
//! and the classifier treats it as a plain message.

/// The parsed form of one raw chat message.
///
/// # Example
///
/// ```
/// use ember_core::ParsedMessage;
///
/// let msg = ParsedMessage::parse("!say Hello World");
/// assert_eq!(msg.command_code, Some('!'));
/// assert_eq!(msg.command, "say");
/// assert_eq!(msg.message, "Hello World");
/// assert_eq!(msg.arguments, vec!["hello", "world"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedMessage {
    /// The full original text, untouched.
    pub raw: String,
    /// First character of the lead token, if any.
    pub command_code: Option<char>,
    /// Lead token minus its first character, lower-cased.
    pub command: String,
    /// Everything after the first space, original casing preserved.
    pub message: String,
    /// Whitespace-delimited tokens of `message`, lower-cased.
    pub arguments: Vec<String>,
}

impl ParsedMessage {
    /// Splits `raw` on the first space into a lead token and a remainder.
    ///
    /// The lead token's first character becomes [`command_code`], the rest
    /// of it (lower-cased) becomes [`command`]. The remainder keeps its
    /// casing in [`message`] while [`arguments`] holds its lower-cased
    /// tokens. An empty input yields an all-empty message.
    ///
    /// [`command_code`]: Self::command_code
    /// [`command`]: Self::command
    /// [`message`]: Self::message
    /// [`arguments`]: Self::arguments
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self {
                raw: raw.to_string(),
                ..Self::default()
            };
        }

        let (lead, remainder) = match trimmed.split_once(' ') {
            Some((lead, rest)) => (lead, rest),
            None => (trimmed, ""),
        };

        let mut chars = lead.chars();
        let command_code = chars.next();
        let command = chars.as_str().to_lowercase();

        let arguments = remainder
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();

        Self {
            raw: raw.to_string(),
            command_code,
            command,
            message: remainder.to_string(),
            arguments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_with_arguments() {
        let msg = ParsedMessage::parse("!dev param1 param2 param3");
        assert_eq!(msg.command_code, Some('!'));
        assert_eq!(msg.command, "dev");
        assert_eq!(msg.message, "param1 param2 param3");
        assert_eq!(msg.arguments, vec!["param1", "param2", "param3"]);
    }

    #[test]
    fn test_parse_bare_command() {
        let msg = ParsedMessage::parse("!dev");
        assert_eq!(msg.command_code, Some('!'));
        assert_eq!(msg.command, "dev");
        assert_eq!(msg.message, "");
        assert!(msg.arguments.is_empty());
    }

    #[test]
    fn test_parse_preserves_message_casing() {
        let msg = ParsedMessage::parse("!say Hello World");
        assert_eq!(msg.message, "Hello World");
        assert_eq!(msg.arguments, vec!["hello", "world"]);
    }

    #[test]
    fn test_parse_lowercases_command() {
        let msg = ParsedMessage::parse("!SAY hi");
        assert_eq!(msg.command, "say");
    }

    #[test]
    fn test_parse_plain_text() {
        let msg = ParsedMessage::parse("hello there");
        assert_eq!(msg.command_code, Some('h'));
        assert_eq!(msg.command, "ello");
        assert_eq!(msg.message, "there");
    }

    #[test]
    fn test_parse_empty() {
        let msg = ParsedMessage::parse("");
        assert_eq!(msg.command_code, None);
        assert_eq!(msg.command, "");
        assert!(msg.arguments.is_empty());
    }

    #[test]
    fn test_parse_whitespace_only() {
        let msg = ParsedMessage::parse("   ");
        assert_eq!(msg.command_code, None);
        assert!(msg.arguments.is_empty());
    }

    #[test]
    fn test_parse_keeps_raw() {
        let msg = ParsedMessage::parse("  !say hi  ");
        assert_eq!(msg.raw, "  !say hi  ");
        assert_eq!(msg.command, "say");
    }
}
