//! Splitting input lines into a command name and an argument remainder.
//!
//! Command names may themselves contain the delimiter (`"log level"`), so the
//! leading run of tokens is matched longest-first against the registry.

use super::{CommandRegistry, ConsoleError, RegisteredCommand};

/// Result of resolving an input line.
#[derive(Debug)]
pub struct Resolution<'r, 'l> {
    /// The matched command.
    pub command: &'r RegisteredCommand,
    /// The argument remainder (empty if the whole line is the name).
    pub arguments: &'l str,
}

/// Split a line into tokens by a single delimiter character.
///
/// Consecutive delimiters produce empty tokens; no quoting is applied.
///
/// # Examples
///
/// ```
/// use bevy_command_console::core::tokenize;
///
/// assert_eq!(tokenize("log level verbose", ' '), vec!["log", "level", "verbose"]);
/// assert_eq!(tokenize("a  b", ' '), vec!["a", "", "b"]);
/// assert!(tokenize("", ' ').is_empty());
/// ```
pub fn tokenize(input: &str, delimiter: char) -> Vec<&str> {
    if input.is_empty() {
        return Vec::new();
    }
    input.split(delimiter).collect()
}

/// Resolve a line to the longest registered command name it starts with.
///
/// For `N` tokens, candidates `tokens[0..i]` are tried for `i = N` down to
/// `0`; the first hit wins and the remainder is `tokens[i..N]` rejoined with
/// the delimiter.
///
/// # Examples
///
/// ```
/// use bevy_command_console::core::{resolve, Command, RegistryBuilder};
///
/// let mut builder = RegistryBuilder::new();
/// builder
///     .add(Command::procedure("log", |m: String| m))
///     .add(Command::procedure("log level", |l: String| l));
/// let registry = builder.build();
///
/// let resolved = resolve(&registry, "log level verbose", ' ').unwrap();
/// assert_eq!(resolved.command.name(), "log level");
/// assert_eq!(resolved.arguments, "verbose");
/// ```
pub fn resolve<'r, 'l>(
    registry: &'r CommandRegistry,
    line: &'l str,
    delimiter: char,
) -> Result<Resolution<'r, 'l>, ConsoleError> {
    // Byte offsets of every delimiter; token i ends at splits[i].
    let splits: Vec<usize> = line.match_indices(delimiter).map(|(i, _)| i).collect();
    let token_count = if line.is_empty() { 0 } else { splits.len() + 1 };
    let width = delimiter.len_utf8();

    for i in (0..=token_count).rev() {
        let (candidate, arguments) = if i == token_count {
            (line, "")
        } else if i == 0 {
            ("", line)
        } else {
            let end = splits[i - 1];
            (&line[..end], &line[end + width..])
        };

        if let Some(command) = registry.get(candidate) {
            return Ok(Resolution { command, arguments });
        }
    }

    Err(ConsoleError::CommandNotFound(line.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Command, RegistryBuilder};

    fn registry(names: &[&str]) -> CommandRegistry {
        let mut builder = RegistryBuilder::new();
        for name in names {
            builder.add(Command::procedure(*name, |_rest: String| {}));
        }
        builder.build()
    }

    #[test]
    fn test_tokenize_simple() {
        assert_eq!(tokenize("echo hello world", ' '), vec!["echo", "hello", "world"]);
        assert_eq!(tokenize("quit", ' '), vec!["quit"]);
        assert_eq!(tokenize("a,b", ','), vec!["a", "b"]);
    }

    #[test]
    fn test_tokenize_preserves_empty_tokens() {
        assert_eq!(tokenize("say  hi ", ' '), vec!["say", "", "hi", ""]);
    }

    #[test]
    fn test_resolve_single_token() {
        let registry = registry(&["quit"]);
        let resolved = resolve(&registry, "quit", ' ').unwrap();
        assert_eq!(resolved.command.name(), "quit");
        assert_eq!(resolved.arguments, "");
    }

    #[test]
    fn test_resolve_longest_prefix_wins() {
        let registry = registry(&["log", "log level"]);

        let resolved = resolve(&registry, "log level verbose", ' ').unwrap();
        assert_eq!(resolved.command.name(), "log level");
        assert_eq!(resolved.arguments, "verbose");

        let resolved = resolve(&registry, "log hello world", ' ').unwrap();
        assert_eq!(resolved.command.name(), "log");
        assert_eq!(resolved.arguments, "hello world");

        let resolved = resolve(&registry, "log level", ' ').unwrap();
        assert_eq!(resolved.command.name(), "log level");
        assert_eq!(resolved.arguments, "");
    }

    #[test]
    fn test_resolve_keeps_remainder_verbatim() {
        let registry = registry(&["say"]);
        let resolved = resolve(&registry, "say  spaced   out", ' ').unwrap();
        assert_eq!(resolved.arguments, " spaced   out");
    }

    #[test]
    fn test_resolve_not_found() {
        let registry = registry(&["log"]);
        assert_eq!(
            resolve(&registry, "lo level", ' ').unwrap_err(),
            ConsoleError::CommandNotFound("lo level".into())
        );
        assert!(resolve(&registry, "", ' ').is_err());
    }

    #[test]
    fn test_resolve_multibyte_delimiter() {
        let registry = registry(&["a→b"]);
        let resolved = resolve(&registry, "a→b→c", '→').unwrap();
        assert_eq!(resolved.command.name(), "a→b");
        assert_eq!(resolved.arguments, "c");
    }
}
