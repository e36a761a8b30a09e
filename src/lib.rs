//! A runtime command console for Bevy.
//!
//! - **Typed commands**: plain Rust functions become console commands, their
//!   parameter types drive argument parsing
//! - **Value commands**: readable (and optionally writable) values
//! - **Longest-prefix resolution**: command names may contain spaces
//! - **History**: every submission and outcome is recorded with a timestamp
//!
//! # Features
//!
//! - `persist` (default): RON persistence of [`ConsoleConfig`]
//! - `log-capture`: mirror application WARN/ERROR logs into the history
//! - `terminal`: stdin/stdout backend for dedicated servers
//! - `full`: Enable persist + log-capture
//!
//! # Quick Start
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_command_console::prelude::*;
//! use bevy_command_console::Command;
//!
//! fn spawn(kind: String, count: u32) -> String {
//!     format!("spawned {} {}", count, kind)
//! }
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(ConsolePlugin::default())
//!         .add_console_commands(|builder: &mut RegistryBuilder| {
//!             builder.add(command!(spawn).description("Spawn some enemies"));
//!             builder.add(Command::value("fps", || 60u32));
//!         })
//!         .run();
//! }
//! ```

use std::sync::mpsc::{self, Receiver};
use std::sync::{Mutex, PoisonError};

use bevy::prelude::*;

pub mod config;
pub mod core;

// Re-export core types at crate root for convenience
pub use config::ConsoleConfig;
pub use crate::core::{
    ArgValue, Command, CommandArgs, CommandDescriptor, CommandOutput, CommandProvider,
    CommandRegistry, Console, ConsoleClearEvent, ConsoleEntryEvent, ConsoleError,
    ConsoleEventsPlugin, ConsoleHandle, ConsoleInputEvent, ConsoleSubmittedEvent, ConsoleValue,
    DeclaredType, EntryKind, HistoryEntry, HistoryLog, ParameterKind, RegistrationError,
    RegistryBuilder,
};

// Log capture (feature-gated)
#[cfg(feature = "log-capture")]
pub mod logging;

// Terminal backend (feature-gated)
#[cfg(feature = "terminal")]
pub mod terminal;

// Persistence module (feature-gated)
#[cfg(feature = "persist")]
pub mod persist;

#[cfg(feature = "persist")]
pub use persist::{ConfigError, DEFAULT_CONFIG_FILE};

#[cfg(feature = "terminal")]
pub use terminal::{TerminalConfig, TerminalPlugin};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::core::{
        Command, CommandArgs, CommandProvider, Console, ConsoleClearEvent, ConsoleEntryEvent,
        ConsoleHandle, ConsoleInputEvent, ConsoleSubmittedEvent, ConsoleValue, EntryKind,
        HistoryEntry, RegistryBuilder,
    };
    pub use crate::{command, console_enum, ConsoleAppExt, ConsoleConfig, ConsolePlugin};
}

/// Main console plugin.
///
/// Inserts the [`Console`] resource and the console messages, builds the
/// registry at `Startup` and submits every [`ConsoleInputEvent`].
///
/// # Configuration
///
/// ```ignore
/// ConsolePlugin::new(ConsoleConfig::default().with_delimiter(','))
/// ```
#[derive(Default)]
pub struct ConsolePlugin {
    pub config: ConsoleConfig,
}

impl ConsolePlugin {
    /// Create the plugin with a configuration.
    pub fn new(config: ConsoleConfig) -> Self {
        Self { config }
    }

    /// Create the plugin from a RON config file, falling back to defaults.
    #[cfg(feature = "persist")]
    pub fn from_config_file(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(ConsoleConfig::load_or_default(path))
    }
}

impl Plugin for ConsolePlugin {
    fn build(&self, app: &mut App) {
        let console = Console::new(self.config.clone());
        let receiver = forward_history(console.history());

        app.insert_resource(console)
            .insert_resource(HistoryNotifications(Mutex::new(receiver)))
            .add_plugins(crate::core::ConsoleEventsPlugin);

        app.add_systems(Startup, build_registry);

        // 1. process_console_input: submit input lines
        // 2. send_history_messages: turn history notifications into messages
        // 3. handle_exit_request: honor `quit`
        app.add_systems(
            Update,
            (process_console_input, send_history_messages, handle_exit_request).chain(),
        );

        // Terminal backend (feature-gated)
        #[cfg(feature = "terminal")]
        {
            app.add_plugins(terminal::TerminalPlugin::default());
        }
    }
}

/// Registering command providers on an [`App`].
pub trait ConsoleAppExt {
    /// Add a command provider to the [`Console`].
    ///
    /// Must be called after [`ConsolePlugin`] is added and before the app
    /// starts running.
    fn add_console_commands(&mut self, provider: impl CommandProvider) -> &mut Self;
}

impl ConsoleAppExt for App {
    fn add_console_commands(&mut self, provider: impl CommandProvider) -> &mut Self {
        match self.world_mut().get_resource_mut::<Console>() {
            Some(mut console) => {
                console.add_provider(provider);
            }
            None => error!(
                "Console: Cannot add provider '{}' before ConsolePlugin",
                provider.name()
            ),
        }
        self
    }
}

/// What the history observers report to the app.
enum HistoryNotification {
    Submitted(String),
    Entry(HistoryEntry),
    Cleared,
}

#[derive(Resource)]
struct HistoryNotifications(Mutex<Receiver<HistoryNotification>>);

/// Subscribe to the history, feeding a channel drained by [`send_history_messages`].
fn forward_history(history: &HistoryLog) -> Receiver<HistoryNotification> {
    let (sender, receiver) = mpsc::channel();

    let tx = sender.clone();
    history.on_submission(move |line| {
        let _ = tx.send(HistoryNotification::Submitted(line.to_string()));
    });
    let tx = sender.clone();
    history.on_entry(move |entry| {
        let _ = tx.send(HistoryNotification::Entry(entry.clone()));
    });
    history.on_clear(move || {
        let _ = sender.send(HistoryNotification::Cleared);
    });

    receiver
}

/// Build the registry once all providers have been added.
fn build_registry(console: Res<Console>) {
    let registry = console.registry();
    for failure in registry.failures() {
        console
            .history()
            .push(EntryKind::Error, format!("Registration failed: {}", failure));
    }
}

/// System that submits every input line to the console.
fn process_console_input(mut input_events: MessageReader<ConsoleInputEvent>, console: Res<Console>) {
    for event in input_events.read() {
        console.submit(&event.command);
    }
}

fn send_history_messages(
    notifications: Res<HistoryNotifications>,
    mut submitted: MessageWriter<ConsoleSubmittedEvent>,
    mut entries: MessageWriter<ConsoleEntryEvent>,
    mut cleared: MessageWriter<ConsoleClearEvent>,
) {
    let rx = notifications.0.lock().unwrap_or_else(PoisonError::into_inner);
    for notification in rx.try_iter() {
        match notification {
            HistoryNotification::Submitted(line) => {
                submitted.write(ConsoleSubmittedEvent { line });
            }
            HistoryNotification::Entry(entry) => {
                entries.write(ConsoleEntryEvent { entry });
            }
            HistoryNotification::Cleared => {
                cleared.write(ConsoleClearEvent);
            }
        }
    }
}

fn handle_exit_request(console: Res<Console>, mut exit: MessageWriter<AppExit>) {
    if console.take_exit_request() {
        info!("Console: Exit requested");
        exit.write(AppExit::Success);
    }
}
