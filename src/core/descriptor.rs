//! Immutable command metadata.

use super::{ConsoleValue, DeclaredType, ParameterKind};

/// Describes one declared parameter (or the value type of a value command).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterDescriptor {
    declared: DeclaredType,
    kind: ParameterKind,
}

impl ParameterDescriptor {
    /// Create a descriptor for a declared type, deducing its kind.
    pub fn new(declared: DeclaredType) -> Self {
        Self {
            kind: ParameterKind::deduce(&declared),
            declared,
        }
    }

    /// Create a descriptor for a Rust type.
    pub fn of<T: ConsoleValue>() -> Self {
        Self::new(T::declared_type())
    }

    /// Get the declared type tag.
    #[inline]
    pub fn declared_type(&self) -> &DeclaredType {
        &self.declared
    }

    /// Get the deduced kind.
    #[inline]
    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    /// Render this parameter for a usage string.
    pub fn usage(&self) -> String {
        match self.declared.members() {
            Some(members) => format!("<{}>", members.join("|")),
            None => format!("<{}>", self.kind),
        }
    }
}

/// Metadata for a registered command (stored in the registry).
///
/// The invoker is stored alongside but separately, see
/// [`RegisteredCommand`](super::RegisteredCommand).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub(crate) name: Box<str>,
    pub(crate) description: Box<str>,
    pub(crate) usage: Box<str>,
    pub(crate) parameters: Vec<ParameterDescriptor>,
}

impl CommandDescriptor {
    /// Get the command name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the description.
    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Get the usage string.
    #[inline]
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Get the declared parameters in order.
    #[inline]
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    /// One-line help text: `name usage - description`.
    pub fn help_line(&self) -> String {
        let mut line = self.name.to_string();
        if !self.usage.is_empty() {
            line.push(' ');
            line.push_str(&self.usage);
        }
        if !self.description.is_empty() {
            line.push_str(" - ");
            line.push_str(&self.description);
        }
        line
    }
}

/// Synthesize a usage string from parameter kinds.
pub(crate) fn procedure_usage(parameters: &[ParameterDescriptor]) -> String {
    parameters
        .iter()
        .map(ParameterDescriptor::usage)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Synthesize a usage string for a value command.
pub(crate) fn value_usage(parameter: &ParameterDescriptor, settable: bool) -> String {
    if settable {
        format!("[{}]", parameter.usage())
    } else {
        format!("{} (read-only)", parameter.usage())
    }
}
