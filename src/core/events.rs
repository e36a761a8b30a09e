//! Console messages for communication between the console and front-ends.
//!
//! - Front-end -> console: [`ConsoleInputEvent`]
//! - Console -> front-end: [`ConsoleEntryEvent`], [`ConsoleSubmittedEvent`],
//!   [`ConsoleClearEvent`]

use bevy::prelude::*;

use super::{EntryKind, HistoryEntry};

/// Message sent when a line is submitted to the console.
///
/// # Examples
///
/// ```ignore
/// fn submit_command(mut events: MessageWriter<ConsoleInputEvent>) {
///     events.write(ConsoleInputEvent::new("log hello"));
/// }
/// ```
#[derive(Message, Debug, Clone)]
pub struct ConsoleInputEvent {
    /// The raw line to submit.
    pub command: String,
}

impl ConsoleInputEvent {
    /// Create a new input event.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

/// Message sent for every new history entry.
#[derive(Message, Debug, Clone)]
pub struct ConsoleEntryEvent {
    pub entry: HistoryEntry,
}

impl ConsoleEntryEvent {
    /// Get the entry kind.
    pub fn kind(&self) -> EntryKind {
        self.entry.kind
    }

    /// Get the entry text.
    pub fn text(&self) -> &str {
        &self.entry.text
    }
}

/// Message sent for every submitted line, before its entries.
#[derive(Message, Debug, Clone)]
pub struct ConsoleSubmittedEvent {
    pub line: String,
}

/// Message sent when the history has been cleared.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct ConsoleClearEvent;

/// Plugin that registers all console messages.
pub struct ConsoleEventsPlugin;

impl Plugin for ConsoleEventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ConsoleInputEvent>()
            .add_message::<ConsoleEntryEvent>()
            .add_message::<ConsoleSubmittedEvent>()
            .add_message::<ConsoleClearEvent>();
    }
}
