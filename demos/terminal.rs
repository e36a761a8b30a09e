//! Terminal console example.
//!
//! Demonstrates using bevy_command_console with stdin/stdout for headless
//! applications like dedicated servers.
//!
//! Run with: `cargo run --example terminal --features terminal`
//!
//! Commands:
//! - `commands` - List available commands
//! - `help <name>` - Show usage of a command
//! - `sv maxplayers` - Query the player limit
//! - `sv maxplayers 16` - Set the player limit
//! - `status` - Show server status
//! - `say <message>` - Broadcast a message
//! - `quit` - Exit the application

use std::sync::{Arc, Mutex};

use bevy::prelude::*;
use bevy_command_console::prelude::*;
use bevy_command_console::Command;
use bevy_command_console::TerminalConfig;

#[derive(Debug)]
struct ServerState {
    hostname: String,
    max_players: u8,
}

fn main() {
    println!("=== Terminal Console Example ===");
    println!("Type commands and press Enter. Type 'quit' to exit.");
    println!();

    // Ensure output is flushed before starting the app
    use std::io::Write;
    let _ = std::io::stdout().flush();

    let state = Arc::new(Mutex::new(ServerState {
        hostname: "My Server".to_string(),
        max_players: 32,
    }));

    App::new()
        .add_plugins(MinimalPlugins)
        .add_plugins(ConsolePlugin::new(ConsoleConfig::default().with_log_history(false)))
        .insert_resource(TerminalConfig {
            colored: true,
            echo_submissions: false,
        })
        .add_console_commands(move |builder: &mut RegistryBuilder| {
            let (get, set) = (state.clone(), state.clone());
            builder.add(
                Command::value_mut(
                    "sv maxplayers",
                    move || get.lock().unwrap().max_players,
                    move |v: u8| set.lock().unwrap().max_players = v,
                )
                .description("Maximum number of players"),
            );

            let (get, set) = (state.clone(), state.clone());
            builder.add(
                Command::value_mut(
                    "sv hostname",
                    move || get.lock().unwrap().hostname.clone(),
                    move |v: String| set.lock().unwrap().hostname = v,
                )
                .description("Server name"),
            );

            let status = state.clone();
            builder.add(
                Command::procedure("status", move || {
                    let state = status.lock().unwrap();
                    format!("{} ({} slots)", state.hostname, state.max_players)
                })
                .description("Show server status"),
            );

            builder.add(
                Command::procedure("say", |message: String| format!("[SERVER] {}", message))
                    .description("Broadcast a message"),
            );
        })
        .run();
}
