//! The console context object.
//!
//! [`Console`] owns the registry, the history and the parser configuration,
//! and is the single entry point for submitting lines. Inside a Bevy app it
//! lives as a resource; it works equally well standalone.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use bevy::log::{debug, warn};
use bevy::prelude::Resource;

use crate::config::ConsoleConfig;

use super::{
    dispatch, resolve, ArgumentParser, BuiltinCommands, CommandProvider, CommandRegistry,
    EntryKind, HistoryLog, Outcome,
};

/// Upper bound on deferred lines drained after one submission.
///
/// Stops scripts that `exec` themselves from running forever.
pub const MAX_DEFERRED_PER_SUBMIT: usize = 1024;

/// Cloneable handle for command logic that needs to talk back to the console.
///
/// Commands cannot borrow the console they run in; lines submitted here are
/// queued and run, in order, once the current submission has completed.
#[derive(Clone, Default)]
pub struct ConsoleHandle {
    pending: Arc<Mutex<VecDeque<String>>>,
    exit_requested: Arc<AtomicBool>,
}

impl ConsoleHandle {
    fn pending(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a line to be submitted after the current dispatch.
    pub fn submit_deferred(&self, line: impl Into<String>) {
        self.pending().push_back(line.into());
    }

    /// Ask the host application to exit.
    pub fn request_exit(&self) {
        self.exit_requested.store(true, Ordering::Release);
    }

    /// Number of queued lines.
    pub fn pending_len(&self) -> usize {
        self.pending().len()
    }

    fn pop(&self) -> Option<String> {
        self.pending().pop_front()
    }
}

impl std::fmt::Debug for ConsoleHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleHandle")
            .field("pending", &self.pending_len())
            .field("exit_requested", &self.exit_requested.load(Ordering::Acquire))
            .finish()
    }
}

/// Command registry, history and submission in one place.
///
/// # Examples
///
/// ```
/// use bevy_command_console::prelude::*;
///
/// let mut console = Console::new(ConsoleConfig::default());
/// console.add_provider(|builder: &mut RegistryBuilder| {
///     builder.add(Command::procedure("add", |a: i32, b: i32| a + b));
/// });
///
/// assert!(console.submit("add 2 3"));
/// assert_eq!(console.latest_result().as_deref(), Some("add(2, 3) = 5"));
///
/// assert!(!console.submit("nope"));
/// ```
#[derive(Resource)]
pub struct Console {
    config: ConsoleConfig,
    parser: ArgumentParser,
    providers: Vec<Box<dyn CommandProvider>>,
    registry: Arc<OnceLock<CommandRegistry>>,
    history: HistoryLog,
    handle: ConsoleHandle,
}

impl Default for Console {
    fn default() -> Self {
        Self::new(ConsoleConfig::default())
    }
}

impl Console {
    /// Create a console. Built-in commands are added unless disabled.
    pub fn new(config: ConsoleConfig) -> Self {
        let mut console = Self {
            parser: ArgumentParser::new(config.delimiter),
            history: HistoryLog::new(config.log_history),
            providers: Vec::new(),
            registry: Arc::new(OnceLock::new()),
            handle: ConsoleHandle::default(),
            config,
        };

        if console.config.builtins {
            let builtins = BuiltinCommands::new(
                console.history.clone(),
                console.handle.clone(),
                Arc::downgrade(&console.registry),
            );
            console.add_provider(builtins);
        }
        console
    }

    /// Add a command provider.
    ///
    /// Returns `false` (and logs a warning) once the registry has been built.
    pub fn add_provider(&mut self, provider: impl CommandProvider) -> bool {
        if self.registry.get().is_some() {
            warn!(
                "Console: Provider '{}' added after the registry was built; ignored",
                provider.name()
            );
            return false;
        }
        self.providers.push(Box::new(provider));
        true
    }

    /// Get the registry, building it on first use.
    pub fn registry(&self) -> &CommandRegistry {
        self.registry
            .get_or_init(|| CommandRegistry::build(self.providers.iter().map(|p| p.as_ref())))
    }

    /// Check if the registry has been built.
    pub fn is_built(&self) -> bool {
        self.registry.get().is_some()
    }

    /// Submit a line.
    ///
    /// Returns `true` if a command was resolved, whether or not it then
    /// succeeded. Lines deferred by commands run before this returns.
    pub fn submit(&self, line: &str) -> bool {
        let found = self.submit_one(line);

        let mut drained = 0;
        while let Some(deferred) = self.handle.pop() {
            if drained == MAX_DEFERRED_PER_SUBMIT {
                let dropped = 1 + self.handle.pending_len();
                self.handle.pending().clear();
                self.history.push(
                    EntryKind::Error,
                    format!("Too many deferred commands; dropped {}", dropped),
                );
                break;
            }
            self.submit_one(&deferred);
            drained += 1;
        }
        found
    }

    fn submit_one(&self, line: &str) -> bool {
        self.history.record_submission(line);

        let trimmed = line.trim();
        let registry = self.registry();
        let resolution = match resolve(registry, trimmed, self.config.delimiter) {
            Ok(resolution) => resolution,
            Err(_) => {
                self.history
                    .push(EntryKind::Warning, format!("Unknown command: '{}'", trimmed));
                return false;
            }
        };

        let name = resolution.command.name();
        debug!("Console: Dispatching '{}' with '{}'", name, resolution.arguments);

        match dispatch(resolution.command, resolution.arguments, &self.parser) {
            Ok(Outcome::Result(text)) => self.history.push(EntryKind::Result, text),
            Ok(Outcome::Completed) => {}
            Ok(Outcome::ReadOnly) => self
                .history
                .push(EntryKind::Warning, format!("'{}' is read-only", name)),
            Err(e) => self.history.push(EntryKind::Error, format!("{}: {}", name, e)),
        }
        true
    }

    /// Get the history log.
    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Get a handle for deferred submission and exit requests.
    pub fn handle(&self) -> ConsoleHandle {
        self.handle.clone()
    }

    /// Get the configuration.
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// All command names in stable order.
    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.registry().names()
    }

    /// Names of value commands.
    pub fn value_command_names(&self) -> impl Iterator<Item = &str> {
        self.registry().value_names()
    }

    /// Command names starting with `prefix`.
    pub fn completions<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> {
        self.registry().completions(prefix)
    }

    /// The most recently submitted line.
    pub fn last_command(&self) -> Option<String> {
        self.history.last_command()
    }

    /// The most recent result text.
    pub fn latest_result(&self) -> Option<String> {
        self.history.latest_result()
    }

    /// Take a pending exit request, resetting it.
    pub fn take_exit_request(&self) -> bool {
        self.handle.exit_requested.swap(false, Ordering::AcqRel)
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("config", &self.config)
            .field("providers", &self.providers.len())
            .field("built", &self.is_built())
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicI32;

    use super::*;
    use crate::core::{Command, HistoryEntry, RegistryBuilder};

    fn bare() -> Console {
        Console::new(ConsoleConfig::default().with_builtins(false).with_log_history(false))
    }

    fn kinds(entries: &[HistoryEntry]) -> Vec<EntryKind> {
        entries.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_zero_argument_command() {
        let mut console = bare();
        console.add_provider(|b: &mut RegistryBuilder| {
            b.add(Command::procedure("ping", || "pong"));
            b.add(Command::procedure("noop", || {}));
        });

        assert!(console.submit("noop"));
        assert_eq!(kinds(&console.history().entries()), vec![EntryKind::Submit]);

        assert!(console.submit("ping"));
        let entries = console.history().entries();
        assert_eq!(
            kinds(&entries),
            vec![EntryKind::Submit, EntryKind::Submit, EntryKind::Result]
        );
        assert_eq!(entries[2].text, "ping() = pong");
    }

    #[test]
    fn test_unknown_command_warns() {
        let console = bare();
        assert!(!console.submit("launch rockets"));

        let entries = console.history().entries();
        assert_eq!(kinds(&entries), vec![EntryKind::Submit, EntryKind::Warning]);
        assert_eq!(entries[0].text, "launch rockets");
        assert_eq!(entries[1].text, "Unknown command: 'launch rockets'");
    }

    #[test]
    fn test_empty_line() {
        let console = bare();
        assert!(!console.submit("   "));
        assert_eq!(
            kinds(&console.history().entries()),
            vec![EntryKind::Submit, EntryKind::Warning]
        );
    }

    #[test]
    fn test_failed_invocation_is_found() {
        let mut console = bare();
        console.add_provider(|b: &mut RegistryBuilder| {
            b.add(Command::procedure("add", |a: i32, b: i32| a + b));
        });

        assert!(console.submit("add 1"));
        assert!(console.submit("add one two"));
        let entries = console.history().entries();
        assert_eq!(entries[1].kind, EntryKind::Error);
        assert!(entries[1].text.starts_with("add: "));
        assert_eq!(entries[3].kind, EntryKind::Error);
        assert!(console.latest_result().is_none());
    }

    #[test]
    fn test_read_only_value() {
        let mut console = bare();
        console.add_provider(|b: &mut RegistryBuilder| {
            b.add(Command::value("fps", || 60u32));
        });

        assert!(console.submit("fps 30"));
        let entries = console.history().entries();
        assert_eq!(kinds(&entries), vec![EntryKind::Submit, EntryKind::Warning]);
        assert_eq!(entries[1].text, "'fps' is read-only");

        console.submit("fps");
        assert_eq!(console.latest_result().as_deref(), Some("fps = 60"));
    }

    #[test]
    fn test_deferred_lines_run_in_order() {
        let mut console = bare();
        let handle = console.handle();
        let counter = Arc::new(AtomicI32::new(0));

        let c = counter.clone();
        console.add_provider(move |b: &mut RegistryBuilder| {
            let h = handle.clone();
            b.add(Command::procedure("twice", move || {
                h.submit_deferred("bump");
                h.submit_deferred("bump");
            }));
            let c = c.clone();
            b.add(Command::procedure("bump", move || {
                c.fetch_add(1, Ordering::SeqCst);
            }));
        });

        assert!(console.submit("twice"));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(console.history().commands(), vec!["twice", "bump", "bump"]);
    }

    #[test]
    fn test_deferred_loop_is_bounded() {
        let mut console = bare();
        let handle = console.handle();
        console.add_provider(move |b: &mut RegistryBuilder| {
            let h = handle.clone();
            b.add(Command::procedure("again", move || h.submit_deferred("again")));
        });

        assert!(console.submit("again"));
        assert_eq!(console.history().commands().len(), MAX_DEFERRED_PER_SUBMIT + 1);
        let last = console.history().entries().pop().unwrap();
        assert_eq!(last.kind, EntryKind::Error);
        assert_eq!(console.handle().pending_len(), 0);
    }

    #[test]
    fn test_provider_after_build_rejected() {
        let mut console = bare();
        assert!(console.add_provider(|b: &mut RegistryBuilder| {
            b.add(Command::procedure("a", || {}));
        }));
        assert!(console.registry().contains("a"));

        assert!(!console.add_provider(|b: &mut RegistryBuilder| {
            b.add(Command::procedure("b", || {}));
        }));
        assert!(!console.registry().contains("b"));
    }

    #[test]
    fn test_custom_delimiter() {
        let mut console =
            Console::new(ConsoleConfig::default().with_delimiter(',').with_builtins(false));
        console.add_provider(|b: &mut RegistryBuilder| {
            b.add(Command::procedure("say", |msg: String| msg));
        });

        assert!(console.submit("say,hello,world"));
        assert_eq!(
            console.latest_result().as_deref(),
            Some("say(hello,world) = hello,world")
        );
    }

    #[test]
    fn test_exit_request() {
        let console = bare();
        assert!(!console.take_exit_request());
        console.handle().request_exit();
        assert!(console.take_exit_request());
        assert!(!console.take_exit_request());
    }
}
