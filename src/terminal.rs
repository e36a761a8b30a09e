//! Terminal backend for headless/dedicated server console.
//!
//! Lines read from stdin are submitted to the console; history entries are
//! written to stdout.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use bevy::prelude::*;

use crate::core::{ConsoleEntryEvent, ConsoleInputEvent, EntryKind};

/// Plugin that adds terminal (stdin/stdout) console support.
#[derive(Default)]
pub struct TerminalPlugin {
    pub config: TerminalConfig,
}

impl Plugin for TerminalPlugin {
    fn build(&self, app: &mut App) {
        let (sender, receiver) = mpsc::channel();
        let _handle = spawn_stdin_reader(sender);

        app.insert_resource(StdinReceiver(Mutex::new(receiver)))
            .insert_resource(self.config.clone())
            .add_systems(Update, (read_stdin, write_stdout));
    }
}

/// Configuration for terminal behavior.
#[derive(Resource, Debug, Clone, Default)]
pub struct TerminalConfig {
    /// Whether to use colored output (ANSI escape codes).
    pub colored: bool,
    /// Print `Submit` entries too. Input typed into the terminal is already
    /// visible, so this is off by default.
    pub echo_submissions: bool,
}

#[derive(Resource)]
struct StdinReceiver(Mutex<Receiver<String>>);

fn spawn_stdin_reader(sender: Sender<String>) -> JoinHandle<()> {
    thread::spawn(move || {
        let stdin = io::stdin();
        let handle = stdin.lock();

        for line in handle.lines().map_while(Result::ok) {
            let text = line.trim();
            if !text.is_empty() && sender.send(text.to_string()).is_err() {
                break;
            }
        }
    })
}

fn read_stdin(receiver: Res<StdinReceiver>, mut events: MessageWriter<ConsoleInputEvent>) {
    let rx = receiver.0.lock().unwrap_or_else(PoisonError::into_inner);
    while let Ok(line) = rx.try_recv() {
        events.write(ConsoleInputEvent::new(line));
    }
}

fn write_stdout(mut events: MessageReader<ConsoleEntryEvent>, config: Res<TerminalConfig>) {
    let mut stdout = io::stdout().lock();
    for event in events.read() {
        if event.kind() == EntryKind::Submit && !config.echo_submissions {
            continue;
        }
        let _ = writeln!(stdout, "{}", render(event, config.colored));
    }
    let _ = stdout.flush();
}

fn render(event: &ConsoleEntryEvent, colored: bool) -> String {
    let text = match event.kind() {
        EntryKind::Submit => format!("> {}", event.text()),
        _ => event.text().to_string(),
    };
    if !colored {
        return text;
    }
    let color = match event.kind() {
        EntryKind::Submit => "\x1b[36m",
        EntryKind::Result => "\x1b[32m",
        EntryKind::Warning => "\x1b[33m",
        EntryKind::Error => "\x1b[31m",
    };
    format!("{}{}\x1b[0m", color, text)
}
