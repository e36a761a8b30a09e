//! Command registry built once from providers.
//!
//! Ordered storage keyed by name: iteration is stable (sorted), which is what
//! autocompletion needs.

use std::collections::BTreeMap;
use std::ops::Bound;

use bevy::log::{debug, error, info};

use super::{
    Command, CommandDescriptor, Invoker, ParameterKind, RegistrationError, HISTORY_LOG_TARGET,
};

/// A module that supplies console commands.
///
/// Providers are collected by the [`Console`](super::Console) and asked to
/// register their commands exactly once, when the registry is first used.
///
/// Closures taking a `&mut RegistryBuilder` are providers too.
///
/// # Examples
///
/// ```
/// use bevy_command_console::core::{Command, CommandProvider, RegistryBuilder};
///
/// struct AudioCommands;
///
/// impl CommandProvider for AudioCommands {
///     fn register_commands(&self, builder: &mut RegistryBuilder) {
///         builder.add(Command::procedure("mute", || "muted").description("Mute all audio"));
///     }
/// }
/// ```
pub trait CommandProvider: Send + Sync + 'static {
    /// Name used in log messages.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Register this provider's commands.
    fn register_commands(&self, builder: &mut RegistryBuilder);
}

impl<F> CommandProvider for F
where
    F: Fn(&mut RegistryBuilder) + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        "closure"
    }

    fn register_commands(&self, builder: &mut RegistryBuilder) {
        self(builder)
    }
}

/// A descriptor together with its bound invoker.
#[derive(Debug)]
pub struct RegisteredCommand {
    descriptor: CommandDescriptor,
    invoker: Invoker,
}

impl RegisteredCommand {
    /// Get the descriptor.
    #[inline]
    pub fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    /// Get the invoker.
    #[inline]
    pub fn invoker(&self) -> &Invoker {
        &self.invoker
    }

    /// Get the command name.
    #[inline]
    pub fn name(&self) -> &str {
        self.descriptor.name()
    }
}

/// Collects commands while the registry is being built.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    commands: BTreeMap<Box<str>, RegisteredCommand>,
    failures: Vec<RegistrationError>,
}

impl RegistryBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command, logging and recording any failure.
    ///
    /// A failure only affects this command; the builder stays usable.
    pub fn add(&mut self, cmd: Command) -> &mut Self {
        if let Err(e) = self.try_add(cmd) {
            // The plugin records failures in the history itself.
            error!(target: HISTORY_LOG_TARGET, "Console: Failed to register command: {}", e);
            self.failures.push(e);
        }
        self
    }

    /// Register a command, returning the failure instead of recording it.
    ///
    /// Duplicate names are rejected; the first registration wins.
    pub fn try_add(&mut self, cmd: Command) -> Result<(), RegistrationError> {
        if cmd.name().is_empty() {
            return Err(RegistrationError::EmptyName);
        }

        if self.commands.contains_key(cmd.name()) {
            return Err(RegistrationError::DuplicateName(cmd.name().to_string()));
        }

        // Procedure parameters are always input; a value's type is input only
        // when it has a setter.
        let settable = match cmd.invoker() {
            Invoker::Procedure(_) => true,
            Invoker::Value { set, .. } => set.is_some(),
        };
        if settable {
            if let Some((index, param)) = cmd
                .parameters()
                .iter()
                .enumerate()
                .find(|(_, p)| p.kind() == ParameterKind::Object)
            {
                return Err(RegistrationError::UnsupportedParameter {
                    command: cmd.name().to_string(),
                    index,
                    type_name: param.declared_type().name(),
                });
            }
        }

        let (descriptor, invoker) = cmd.split();
        debug!("Console: Registered '{}' {}", descriptor.name(), descriptor.usage());
        self.commands.insert(
            descriptor.name.clone(),
            RegisteredCommand { descriptor, invoker },
        );
        Ok(())
    }

    /// Get the failures recorded so far.
    pub fn failures(&self) -> &[RegistrationError] {
        &self.failures
    }

    /// Finish building.
    pub fn build(self) -> CommandRegistry {
        CommandRegistry {
            commands: self.commands,
            failures: self.failures,
        }
    }
}

/// Immutable catalog of all registered commands.
///
/// # Examples
///
/// ```
/// use bevy_command_console::core::{Command, RegistryBuilder};
///
/// let mut builder = RegistryBuilder::new();
/// builder
///     .add(Command::procedure("log", |msg: String| msg))
///     .add(Command::value("fps", || 60u32));
///
/// let registry = builder.build();
/// assert!(registry.contains("log"));
/// assert_eq!(registry.names().collect::<Vec<_>>(), vec!["fps", "log"]);
/// assert_eq!(registry.value_names().collect::<Vec<_>>(), vec!["fps"]);
/// ```
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<Box<str>, RegisteredCommand>,
    failures: Vec<RegistrationError>,
}

impl CommandRegistry {
    /// Build a registry from a set of providers.
    pub fn build<'a>(providers: impl IntoIterator<Item = &'a dyn CommandProvider>) -> Self {
        let mut builder = RegistryBuilder::new();
        for provider in providers {
            let before = builder.commands.len();
            provider.register_commands(&mut builder);
            debug!(
                "Console: Provider '{}' registered {} commands",
                provider.name(),
                builder.commands.len() - before
            );
        }

        let registry = builder.build();
        info!(
            "Console: Registered {} commands ({} failed)",
            registry.len(),
            registry.failures.len()
        );
        registry
    }

    /// Look up a command by exact name.
    pub fn get(&self, name: &str) -> Option<&RegisteredCommand> {
        self.commands.get(name)
    }

    /// Check if a command exists.
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Get the number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Iterate over all command names in stable (sorted) order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(|k| k.as_ref())
    }

    /// Iterate over the names of value commands.
    pub fn value_names(&self) -> impl Iterator<Item = &str> {
        self.commands
            .iter()
            .filter(|(_, cmd)| cmd.invoker.is_value())
            .map(|(k, _)| k.as_ref())
    }

    /// Iterate over all descriptors in name order.
    pub fn descriptors(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.commands.values().map(|cmd| &cmd.descriptor)
    }

    /// Names starting with `prefix`, in sorted order.
    pub fn completions<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> {
        self.commands
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .map(|(k, _)| k.as_ref())
            .take_while(move |name| name.starts_with(prefix))
    }

    /// Registration failures encountered while building.
    pub fn failures(&self) -> &[RegistrationError] {
        &self.failures
    }
}
