//! Argument parsing and invocation inside a failure boundary.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use bevy::log::debug;

use super::{tokenize, ArgumentParser, CommandArgs, ConsoleError, Invoker, RegisteredCommand};

/// Successful outcome of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Text to record as a result entry.
    Result(String),
    /// Completed with nothing to report.
    Completed,
    /// Argument text was given to a value command without a setter.
    ReadOnly,
}

/// Invoke a resolved command with its argument remainder.
///
/// Parsing and the bound logic both run inside the boundary: errors and
/// panics come back as `Err` and never unwind past this function.
pub fn dispatch(
    command: &RegisteredCommand,
    arguments: &str,
    parser: &ArgumentParser,
) -> Result<Outcome, ConsoleError> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| invoke(command, arguments, parser)));

    match result {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            debug!("Console: Command '{}' panicked: {}", command.name(), message);
            Err(ConsoleError::Invocation(format!("panicked: {}", message)))
        }
    }
}

fn invoke(
    command: &RegisteredCommand,
    arguments: &str,
    parser: &ArgumentParser,
) -> Result<Outcome, ConsoleError> {
    let name = command.name();
    let tokens = tokenize(arguments, parser.delimiter());

    match command.invoker() {
        Invoker::Procedure(call) => {
            let params = command.descriptor().parameters();
            // Procedures without parameters ignore any argument text.
            let values = if params.is_empty() {
                Vec::new()
            } else {
                parser.parse_arguments(params, &tokens)?
            };
            let args = CommandArgs::new(arguments, values);

            match call(&args)? {
                Some(text) if !text.is_empty() => Ok(Outcome::Result(format!(
                    "{}({}) = {}",
                    name,
                    args.display(),
                    text
                ))),
                _ => Ok(Outcome::Completed),
            }
        }
        Invoker::Value { get, .. } if tokens.is_empty() => {
            Ok(Outcome::Result(format!("{} = {}", name, get())))
        }
        Invoker::Value { set: None, .. } => Ok(Outcome::ReadOnly),
        Invoker::Value { set: Some(set), .. } => {
            // Setters take exactly one token; a String value does not consume
            // the rest of the line.
            if tokens.len() > 1 {
                return Err(ConsoleError::TooManyArguments {
                    expected: 1,
                    actual: tokens.len(),
                });
            }
            let param = command
                .descriptor()
                .parameters()
                .first()
                .ok_or(ConsoleError::NotEnoughArguments { expected: 1, actual: 0 })?;
            set(parser.parse(param, tokens[0])?)?;
            Ok(Outcome::Completed)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
