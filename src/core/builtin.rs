//! Commands every console ships with.

use std::fs;
use std::sync::{OnceLock, Weak};
use std::time::{SystemTime, UNIX_EPOCH};

use bevy::log::info;

use super::{Command, CommandProvider, CommandRegistry, ConsoleHandle, HistoryLog, RegistryBuilder};

/// Provider for `clear`, `quit`, `log`, `time`, `help`, `commands` and `exec`.
///
/// Added by [`Console::new`](super::Console::new) unless
/// `ConsoleConfig::builtins` is off.
pub struct BuiltinCommands {
    history: HistoryLog,
    handle: ConsoleHandle,
    registry: Weak<OnceLock<CommandRegistry>>,
}

impl BuiltinCommands {
    pub(crate) fn new(
        history: HistoryLog,
        handle: ConsoleHandle,
        registry: Weak<OnceLock<CommandRegistry>>,
    ) -> Self {
        Self {
            history,
            handle,
            registry,
        }
    }
}

impl CommandProvider for BuiltinCommands {
    fn name(&self) -> &str {
        "builtin"
    }

    fn register_commands(&self, builder: &mut RegistryBuilder) {
        let history = self.history.clone();
        builder.add(
            Command::procedure("clear", move || history.clear())
                .description("Clear the console history"),
        );

        let handle = self.handle.clone();
        builder.add(
            Command::procedure("quit", move || handle.request_exit())
                .description("Exit the application"),
        );

        builder.add(
            Command::procedure("log", |message: String| message)
                .description("Echo a message"),
        );

        builder.add(
            Command::value("time", || utc_clock(SystemTime::now()))
                .description("Current UTC time"),
        );

        let registry = self.registry.clone();
        builder.add(
            Command::procedure("help", move |name: String| {
                with_registry(&registry, |registry| {
                    registry
                        .get(&name)
                        .map(|cmd| cmd.descriptor().help_line())
                        .ok_or_else(|| format!("unknown command '{}'", name))
                })
            })
            .description("Show usage and description of a command"),
        );

        let registry = self.registry.clone();
        builder.add(
            Command::procedure("commands", move || {
                with_registry(&registry, |registry| {
                    Ok(registry.names().collect::<Vec<_>>().join(", "))
                })
            })
            .description("List all commands"),
        );

        let handle = self.handle.clone();
        builder.add(
            Command::procedure("exec", move |path: String| exec(&handle, &path))
                .description("Run each line of a file as a command"),
        );
    }
}

fn with_registry<T>(
    registry: &Weak<OnceLock<CommandRegistry>>,
    f: impl FnOnce(&CommandRegistry) -> Result<T, String>,
) -> Result<T, String> {
    let registry = registry.upgrade().ok_or("console was dropped")?;
    let registry = registry.get().ok_or("registry is not built")?;
    f(registry)
}

/// Queue the commands in a script file.
///
/// Blank lines and lines starting with `//` or `#` are skipped.
fn exec(handle: &ConsoleHandle, path: &str) -> Result<String, String> {
    let contents =
        fs::read_to_string(path).map_err(|e| format!("cannot read '{}': {}", path, e))?;

    info!("Console: Executing '{}'", path);
    let mut count = 0;
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") || line.starts_with('#') {
            continue;
        }
        handle.submit_deferred(line);
        count += 1;
    }
    Ok(format!("queued {} commands", count))
}

/// Format the time of day as `HH:MM:SS` in UTC.
pub fn utc_clock(time: SystemTime) -> String {
    let secs = time
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
        % 86_400;
    format!("{:02}:{:02}:{:02}", secs / 3600, secs % 3600 / 60, secs % 60)
}
