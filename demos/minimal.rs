//! Minimal headless console example.
//!
//! Demonstrates using bevy_command_console programmatically without any UI.
//! Useful for testing or custom UI implementations.
//!
//! Run with: `cargo run --example minimal`

use std::sync::{Arc, Mutex};

use bevy::prelude::*;
use bevy_command_console::prelude::*;
use bevy_command_console::Command;

console_enum! {
    #[derive(Debug, Clone, Copy)]
    enum Difficulty {
        Easy,
        Normal,
        Hard,
    }
}

fn greet(name: String) -> String {
    format!("Hello, {}!", name)
}

fn main() {
    let gravity = Arc::new(Mutex::new(9.81f32));
    let difficulty = Arc::new(Mutex::new(Difficulty::Normal));

    App::new()
        .add_plugins(MinimalPlugins)
        .add_plugins(ConsolePlugin::new(ConsoleConfig::default().with_log_history(false)))
        .add_console_commands(move |builder: &mut RegistryBuilder| {
            builder.add(command!(greet).description("Greet someone"));

            let (get, set) = (gravity.clone(), gravity.clone());
            builder.add(
                Command::value_mut(
                    "gravity",
                    move || *get.lock().unwrap(),
                    move |v: f32| *set.lock().unwrap() = v,
                )
                .description("World gravity"),
            );

            let (get, set) = (difficulty.clone(), difficulty.clone());
            builder.add(Command::value_mut(
                "difficulty",
                move || *get.lock().unwrap(),
                move |v: Difficulty| *set.lock().unwrap() = v,
            ));

            builder.add(
                Command::procedure("teleport", |to: Vec3| format!("teleported to {}", to))
                    .description("Move the player"),
            );
        })
        .add_systems(Update, print_entries)
        .add_systems(Update, send_test_commands.run_if(run_once))
        .run();
}

/// Send some test commands programmatically.
fn send_test_commands(mut events: MessageWriter<ConsoleInputEvent>) {
    println!("\n--- Sending test commands ---");

    for line in [
        "gravity",
        "gravity 1.62",
        "greet Developer",
        "difficulty Hard",
        "difficulty",
        "teleport 1,2,3",
        "teleport nowhere",
        "help greet",
        "launch rockets",
        "quit",
    ] {
        events.write(ConsoleInputEvent::new(line));
    }
}

/// Print every history entry.
fn print_entries(mut events: MessageReader<ConsoleEntryEvent>) {
    for event in events.read() {
        let prefix = match event.kind() {
            EntryKind::Submit => "[$]",
            EntryKind::Result => "[>]",
            EntryKind::Warning => "[WARN]",
            EntryKind::Error => "[ERROR]",
        };
        println!("{} {}", prefix, event.text());
    }
}
