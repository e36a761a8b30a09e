//! Core console types, usable without an `App`.
//!
//! This module provides the fundamental building blocks:
//! - [`Console`] - Registry, history and submission in one context object
//! - [`Command`] - Typed procedures and value commands
//! - [`CommandRegistry`] - Catalog of commands built once from providers
//! - [`resolve`] - Longest-prefix command resolution
//! - [`dispatch`] - Argument parsing and invocation inside a failure boundary
//! - [`HistoryLog`] - Timestamped session history with observers
//! - Messages for communication between layers

mod builtin;
mod command;
mod console;
mod descriptor;
mod dispatcher;
mod error;
mod events;
mod history;
mod parser;
mod registry;
mod resolver;
mod value;

pub use builtin::{utc_clock, BuiltinCommands};
pub use command::{
    Command, CommandArgs, CommandOutput, IntoProcedure, Invoker, ProcedureFn, ValueGetter,
    ValueSetter,
};
pub use console::{Console, ConsoleHandle, MAX_DEFERRED_PER_SUBMIT};
pub use descriptor::{CommandDescriptor, ParameterDescriptor};
pub use dispatcher::{dispatch, Outcome};
pub use error::{ConsoleError, RegistrationError};
pub use events::{
    ConsoleClearEvent, ConsoleEntryEvent, ConsoleEventsPlugin, ConsoleInputEvent,
    ConsoleSubmittedEvent,
};
pub use history::{EntryKind, HistoryEntry, HistoryLog, ObserverId, HISTORY_LOG_TARGET};
pub use parser::{ArgumentParser, ParameterKind};
pub use registry::{CommandProvider, CommandRegistry, RegisteredCommand, RegistryBuilder};
pub use resolver::{resolve, tokenize, Resolution};
pub use value::{ArgValue, ConsoleValue, DeclaredType, TypeShape};
