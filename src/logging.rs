//! Mirroring application log events into the console history.
//!
//! Install with [`LogPlugin::custom_layer`](bevy::log::LogPlugin::custom_layer):
//!
//! ```ignore
//! App::new().add_plugins(DefaultPlugins.set(LogPlugin {
//!     custom_layer: bevy_command_console::logging::custom_log_layer,
//!     ..default()
//! }));
//! ```

use std::sync::mpsc;

use bevy::log::{BoxedLayer, Level};
use bevy::prelude::*;
use tracing::Subscriber;
use tracing_subscriber::field::Visit;
use tracing_subscriber::Layer;

use crate::core::{Console, EntryKind, HISTORY_LOG_TARGET};

/// A function that captures WARN and ERROR log events into the console
/// history, for use as [`LogPlugin::custom_layer`](bevy::log::LogPlugin::custom_layer).
pub fn custom_log_layer(app: &mut App) -> Option<BoxedLayer> {
    Some(Box::new(create_custom_log_layer(app)))
}

fn create_custom_log_layer(app: &mut App) -> LogCaptureLayer {
    let (sender, receiver) = mpsc::channel();
    app.insert_non_send_resource(CapturedLogEvents(receiver));
    app.add_systems(PostUpdate, transfer_log_events);

    LogCaptureLayer { sender }
}

/// A captured log event.
#[derive(Debug, Clone, PartialEq)]
struct CapturedLog {
    message: String,
    target: &'static str,
    level: Level,
}

impl CapturedLog {
    fn entry_kind(&self) -> EntryKind {
        if self.level == Level::ERROR {
            EntryKind::Error
        } else {
            EntryKind::Warning
        }
    }
}

/// Holds captured events until [`transfer_log_events`] runs.
struct CapturedLogEvents(mpsc::Receiver<CapturedLog>);

/// Appends captured events to the console history.
fn transfer_log_events(receiver: NonSend<CapturedLogEvents>, console: Option<Res<Console>>) {
    let Some(console) = console else {
        return;
    };
    for log in receiver.0.try_iter() {
        console
            .history()
            .push(log.entry_kind(), format!("{}: {}", log.target, log.message));
    }
}

/// A [`Layer`] that forwards WARN and ERROR events to [`CapturedLogEvents`].
///
/// Events with the history target are skipped, they already are history.
struct LogCaptureLayer {
    sender: mpsc::Sender<CapturedLog>,
}

impl<S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>> Layer<S>
    for LogCaptureLayer
{
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        if *metadata.level() > Level::WARN || metadata.target() == HISTORY_LOG_TARGET {
            return;
        }

        let mut message = None;
        event.record(&mut LogEventVisitor(&mut message));
        if let Some(message) = message {
            let _ = self.sender.send(CapturedLog {
                message,
                target: metadata.target(),
                level: *metadata.level(),
            });
        }
    }
}

/// A [`Visit`]or that extracts the `message` field.
struct LogEventVisitor<'a>(&'a mut Option<String>);

impl Visit for LogEventVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.0 = Some(format!("{value:?}"));
        }
    }
}
