//! Error types for registration and dispatch.

use thiserror::Error;

use super::ParameterKind;

/// Failure to register a single command.
///
/// A registration error only aborts the offending command. The registry build
/// continues with the remaining commands of every provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// Command names must contain at least one character.
    #[error("command name must not be empty")]
    EmptyName,
    /// A command with the same name was already registered.
    #[error("duplicate command name '{0}'")]
    DuplicateName(String),
    /// A settable parameter has a type that cannot be parsed from text.
    #[error("command '{command}': parameter {index} of type `{type_name}` cannot be set from the console")]
    UnsupportedParameter {
        command: String,
        index: usize,
        type_name: &'static str,
    },
}

/// Failure while resolving or invoking a submitted line.
///
/// Every variant is contained by the dispatcher and turned into a history
/// entry; none of them ever escapes [`Console::submit`](super::Console::submit).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConsoleError {
    /// No leading run of tokens matches a registered command.
    #[error("unknown command: '{0}'")]
    CommandNotFound(String),
    /// Fewer argument tokens than declared parameters.
    #[error("not enough arguments (expected {expected}, got {actual})")]
    NotEnoughArguments { expected: usize, actual: usize },
    /// More argument tokens than declared parameters.
    #[error("too many arguments (expected {expected}, got {actual})")]
    TooManyArguments { expected: usize, actual: usize },
    /// A token could not be converted to its declared kind.
    #[error("cannot parse '{token}' as {kind}: {reason}")]
    Parse {
        token: String,
        kind: ParameterKind,
        reason: String,
    },
    /// An `Object` parameter was used as settable input.
    #[error("values of type `{0}` cannot be parsed from console input")]
    UnsupportedParameter(&'static str),
    /// The bound command logic failed or panicked.
    #[error("{0}")]
    Invocation(String),
}

impl ConsoleError {
    /// Create a parse error.
    pub fn parse(token: impl Into<String>, kind: ParameterKind, reason: impl Into<String>) -> Self {
        ConsoleError::Parse {
            token: token.into(),
            kind,
            reason: reason.into(),
        }
    }

    /// Check if this is an argument count error.
    pub fn is_argument_count(&self) -> bool {
        matches!(
            self,
            ConsoleError::NotEnoughArguments { .. } | ConsoleError::TooManyArguments { .. }
        )
    }
}
