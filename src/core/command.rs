//! Console commands and their bound invokers.
//!
//! A [`Command`] is built from a typed closure (a procedure) or a getter and
//! optional setter (a value), then handed to a
//! [`RegistryBuilder`](super::RegistryBuilder).

use std::fmt::Display;

use bevy::math::{Rect, Vec2, Vec3};

use super::descriptor::{procedure_usage, value_usage};
use super::{ArgValue, CommandDescriptor, ConsoleError, ConsoleValue, ParameterDescriptor};

/// Parsed arguments passed to a procedure.
#[derive(Debug, Clone)]
pub struct CommandArgs<'a> {
    /// The raw argument remainder.
    raw: &'a str,
    /// Parsed values, one per declared parameter.
    values: Vec<ArgValue>,
}

impl<'a> CommandArgs<'a> {
    /// Create new command args from the raw remainder and parsed values.
    pub fn new(raw: &'a str, values: Vec<ArgValue>) -> Self {
        Self { raw, values }
    }

    /// Get the raw argument text.
    #[inline]
    pub fn raw(&self) -> &str {
        self.raw
    }

    /// Get the number of arguments.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no arguments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get an argument by index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&ArgValue> {
        self.values.get(index)
    }

    /// Convert an argument to a concrete type.
    pub fn typed<T: ConsoleValue>(&self, index: usize) -> Result<T, ConsoleError> {
        let value = self.values.get(index).ok_or(ConsoleError::NotEnoughArguments {
            expected: index + 1,
            actual: self.values.len(),
        })?;

        T::from_arg(value.clone()).ok_or_else(|| {
            let declared = T::declared_type();
            ConsoleError::parse(
                value.to_string(),
                ParameterDescriptor::new(declared).kind(),
                format!("out of range for `{}`", declared.name()),
            )
        })
    }

    /// Iterate over arguments.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &ArgValue> {
        self.values.iter()
    }

    /// Render the arguments as `a, b, c`.
    pub fn display(&self) -> String {
        self.values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Type alias for procedure bodies.
///
/// Returns the text to record as a result, if any.
pub type ProcedureFn = Box<dyn Fn(&CommandArgs<'_>) -> Result<Option<String>, ConsoleError> + Send + Sync>;

/// Type alias for value getters.
pub type ValueGetter = Box<dyn Fn() -> String + Send + Sync>;

/// Type alias for value setters.
pub type ValueSetter = Box<dyn Fn(ArgValue) -> Result<(), ConsoleError> + Send + Sync>;

/// The executable unit bound to a command descriptor.
pub enum Invoker {
    /// A procedure taking the declared parameters.
    Procedure(ProcedureFn),
    /// A readable, optionally writable, value.
    Value {
        get: ValueGetter,
        set: Option<ValueSetter>,
    },
}

impl Invoker {
    /// Check if this is a value invoker.
    pub fn is_value(&self) -> bool {
        matches!(self, Invoker::Value { .. })
    }

    /// Check if this is a value invoker with a setter.
    pub fn is_settable(&self) -> bool {
        matches!(self, Invoker::Value { set: Some(_), .. })
    }
}

impl std::fmt::Debug for Invoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Invoker::Procedure(_) => f.write_str("Procedure"),
            Invoker::Value { set, .. } => f
                .debug_struct("Value")
                .field("settable", &set.is_some())
                .finish_non_exhaustive(),
        }
    }
}

/// Conversion of a procedure's return value into an optional result text.
pub trait CommandOutput {
    /// Convert into the text to record, or an invocation error.
    fn into_output(self) -> Result<Option<String>, ConsoleError>;
}

impl CommandOutput for () {
    fn into_output(self) -> Result<Option<String>, ConsoleError> {
        Ok(None)
    }
}

impl CommandOutput for &'static str {
    fn into_output(self) -> Result<Option<String>, ConsoleError> {
        Ok(Some(self.to_string()))
    }
}

impl<T: CommandOutput> CommandOutput for Option<T> {
    fn into_output(self) -> Result<Option<String>, ConsoleError> {
        match self {
            Some(value) => value.into_output(),
            None => Ok(None),
        }
    }
}

impl<T: CommandOutput, E: Display> CommandOutput for Result<T, E> {
    fn into_output(self) -> Result<Option<String>, ConsoleError> {
        match self {
            Ok(value) => value.into_output(),
            Err(e) => Err(ConsoleError::Invocation(e.to_string())),
        }
    }
}

macro_rules! impl_command_output {
    ($($ty:ty),*) => {$(
        impl CommandOutput for $ty {
            fn into_output(self) -> Result<Option<String>, ConsoleError> {
                Ok(Some(ConsoleValue::format(&self)))
            }
        }
    )*};
}

impl_command_output!(
    String, bool, f32, f64, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, Vec2, Vec3, Rect
);

/// Functions that can be bound as procedures.
///
/// Implemented for every `Fn(T1, .., Tn) -> R` with up to eight parameters,
/// where each `Ti` is a [`ConsoleValue`] and `R` a [`CommandOutput`]. The
/// parameter list is taken from the signature.
pub trait IntoProcedure<Marker>: Send + Sync + 'static {
    /// Descriptors for the function's parameters, in declaration order.
    fn parameters() -> Vec<ParameterDescriptor>;

    /// Box the function as a procedure body.
    fn into_procedure(self) -> ProcedureFn;
}

macro_rules! impl_into_procedure {
    ($($param:ident),*) => {
        impl<Func, Out, $($param,)*> IntoProcedure<fn($($param,)*) -> Out> for Func
        where
            Func: Fn($($param),*) -> Out + Send + Sync + 'static,
            Out: CommandOutput,
            $($param: ConsoleValue,)*
        {
            fn parameters() -> Vec<ParameterDescriptor> {
                vec![$(ParameterDescriptor::of::<$param>()),*]
            }

            #[allow(non_snake_case, unused_mut, unused_variables, unused_assignments)]
            fn into_procedure(self) -> ProcedureFn {
                Box::new(move |args: &CommandArgs<'_>| {
                    let mut index = 0;
                    $(
                        let $param = args.typed::<$param>(index)?;
                        index += 1;
                    )*
                    (self)($($param),*).into_output()
                })
            }
        }
    };
}

impl_into_procedure!();
impl_into_procedure!(A);
impl_into_procedure!(A, B);
impl_into_procedure!(A, B, C);
impl_into_procedure!(A, B, C, D);
impl_into_procedure!(A, B, C, D, E);
impl_into_procedure!(A, B, C, D, E, F);
impl_into_procedure!(A, B, C, D, E, F, G);
impl_into_procedure!(A, B, C, D, E, F, G, H);

/// A console command ready to be registered.
///
/// # Examples
///
/// ```
/// use bevy_command_console::core::Command;
///
/// let log = Command::procedure("log", |message: String| message)
///     .description("Echo a message");
///
/// let time = Command::value("uptime", || 42u64)
///     .description("Seconds since startup");
///
/// assert_eq!(log.name(), "log");
/// assert_eq!(time.parameters().len(), 1);
/// ```
pub struct Command {
    name: Box<str>,
    description: Box<str>,
    usage: Option<Box<str>>,
    parameters: Vec<ParameterDescriptor>,
    invoker: Invoker,
}

impl Command {
    /// Create a procedure command from a typed function.
    pub fn procedure<F, Marker>(name: impl Into<Box<str>>, func: F) -> Self
    where
        F: IntoProcedure<Marker>,
    {
        Self {
            name: name.into(),
            description: "".into(),
            usage: None,
            parameters: F::parameters(),
            invoker: Invoker::Procedure(func.into_procedure()),
        }
    }

    /// Create a read-only value command.
    pub fn value<T, G>(name: impl Into<Box<str>>, getter: G) -> Self
    where
        T: ConsoleValue,
        G: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: "".into(),
            usage: None,
            parameters: vec![ParameterDescriptor::of::<T>()],
            invoker: Invoker::Value {
                get: Box::new(move || getter().format()),
                set: None,
            },
        }
    }

    /// Create a readable and writable value command.
    pub fn value_mut<T, G, S>(name: impl Into<Box<str>>, getter: G, setter: S) -> Self
    where
        T: ConsoleValue,
        G: Fn() -> T + Send + Sync + 'static,
        S: Fn(T) + Send + Sync + 'static,
    {
        let set: ValueSetter = Box::new(move |value: ArgValue| {
            let args = CommandArgs::new("", vec![value]);
            setter(args.typed::<T>(0)?);
            Ok(())
        });

        Self {
            name: name.into(),
            description: "".into(),
            usage: None,
            parameters: vec![ParameterDescriptor::of::<T>()],
            invoker: Invoker::Value {
                get: Box::new(move || getter().format()),
                set: Some(set),
            },
        }
    }

    /// Set the description.
    pub fn description(mut self, desc: impl Into<Box<str>>) -> Self {
        self.description = desc.into();
        self
    }

    /// Set an explicit usage string instead of the synthesized one.
    pub fn usage(mut self, usage: impl Into<Box<str>>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    /// Get the command name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the declared parameters.
    #[inline]
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    /// Get the bound invoker.
    #[inline]
    pub fn invoker(&self) -> &Invoker {
        &self.invoker
    }

    /// Split the command into its descriptor and invoker.
    ///
    /// The usage string is synthesized here if none was given.
    pub fn split(self) -> (CommandDescriptor, Invoker) {
        let usage = match self.usage {
            Some(usage) => usage,
            None => match &self.invoker {
                Invoker::Procedure(_) => procedure_usage(&self.parameters).into(),
                Invoker::Value { set, .. } => match self.parameters.first() {
                    Some(param) => value_usage(param, set.is_some()).into(),
                    None => "".into(),
                },
            },
        };

        (
            CommandDescriptor {
                name: self.name,
                description: self.description,
                usage,
                parameters: self.parameters,
            },
            self.invoker,
        )
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("invoker", &self.invoker)
            .finish_non_exhaustive()
    }
}

/// Create a procedure [`Command`] named after the function identifier.
///
/// # Examples
///
/// ```
/// use bevy_command_console::command;
///
/// fn greet(name: String) -> String {
///     format!("Hello, {}!", name)
/// }
///
/// let cmd = command!(greet);
/// assert_eq!(cmd.name(), "greet");
/// ```
#[macro_export]
macro_rules! command {
    ($func:ident) => {
        $crate::core::Command::procedure(stringify!($func), $func)
    };
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::core::ParameterKind;

    fn call(cmd: &Command, values: Vec<ArgValue>) -> Result<Option<String>, ConsoleError> {
        match cmd.invoker() {
            Invoker::Procedure(f) => f(&CommandArgs::new("", values)),
            Invoker::Value { .. } => panic!("not a procedure"),
        }
    }

    #[test]
    fn test_command_args_typed() {
        let args = CommandArgs::new("5 hello", vec![ArgValue::Integer(5), ArgValue::String("hello".into())]);
        assert_eq!(args.len(), 2);
        assert_eq!(args.raw(), "5 hello");
        assert_eq!(args.typed::<i32>(0).unwrap(), 5);
        assert_eq!(args.typed::<String>(1).unwrap(), "hello");
        assert!(args.typed::<i32>(2).is_err());
        assert_eq!(args.display(), "5, hello");
    }

    #[test]
    fn test_command_args_out_of_range() {
        let args = CommandArgs::new("300", vec![ArgValue::Integer(300)]);
        let err = args.typed::<u8>(0).unwrap_err();
        assert_eq!(err.to_string(), "cannot parse '300' as Integer: out of range for `u8`");
    }

    #[test]
    fn test_procedure_parameters_from_signature() {
        let cmd = Command::procedure("cmd", |_n: i32, _msg: String| {});
        let kinds: Vec<_> = cmd.parameters().iter().map(|p| p.kind()).collect();
        assert_eq!(kinds, vec![ParameterKind::Integer, ParameterKind::String]);
    }

    #[test]
    fn test_procedure_invocation() {
        let received = Arc::new(Mutex::new(None));
        let sink = received.clone();
        let cmd = Command::procedure("cmd", move |n: i32, msg: String| {
            *sink.lock().unwrap() = Some((n, msg));
        });

        let out = call(&cmd, vec![ArgValue::Integer(5), ArgValue::String("hello world".into())]);
        assert_eq!(out, Ok(None));
        assert_eq!(*received.lock().unwrap(), Some((5, "hello world".to_string())));
    }

    #[test]
    fn test_procedure_outputs() {
        let echo = Command::procedure("echo", |s: String| s);
        assert_eq!(call(&echo, vec![ArgValue::String("hi".into())]), Ok(Some("hi".into())));

        let add = Command::procedure("add", |a: i32, b: i32| a + b);
        assert_eq!(call(&add, vec![ArgValue::Integer(2), ArgValue::Integer(3)]), Ok(Some("5".into())));

        let fails = Command::procedure("fails", || -> Result<(), String> { Err("boom".into()) });
        assert_eq!(call(&fails, vec![]), Err(ConsoleError::Invocation("boom".into())));

        let nothing = Command::procedure("nothing", || None::<String>);
        assert_eq!(call(&nothing, vec![]), Ok(None));
    }

    #[test]
    fn test_value_command() {
        let volume = Arc::new(Mutex::new(0.5f32));
        let (get, set) = (volume.clone(), volume.clone());
        let cmd = Command::value_mut("volume", move || *get.lock().unwrap(), move |v: f32| {
            *set.lock().unwrap() = v;
        });

        match cmd.invoker() {
            Invoker::Value { get, set: Some(set) } => {
                assert_eq!(get(), "0.5");
                set(ArgValue::Float(0.75)).unwrap();
                assert_eq!(get(), "0.75");
                assert!(set(ArgValue::Boolean(true)).is_err());
            }
            other => panic!("unexpected invoker {:?}", other),
        }
        assert_eq!(*volume.lock().unwrap(), 0.75);
    }

    #[test]
    fn test_split_synthesizes_usage() {
        let (descriptor, invoker) = Command::procedure("cmd", |_n: i32, _msg: String| {}).split();
        assert_eq!(descriptor.usage(), "<Integer> <String>");
        assert!(!invoker.is_value());

        let (descriptor, invoker) = Command::value("time", || "12:00".to_string()).split();
        assert_eq!(descriptor.usage(), "<String> (read-only)");
        assert!(invoker.is_value());
        assert!(!invoker.is_settable());

        let (descriptor, _) = Command::procedure("quit", || {})
            .usage("quit")
            .description("Exit")
            .split();
        assert_eq!(descriptor.usage(), "quit");
        assert_eq!(descriptor.description(), "Exit");
    }

    #[test]
    fn test_command_macro_uses_identifier() {
        fn shout(text: String) -> String {
            text.to_uppercase()
        }

        let cmd = crate::command!(shout);
        assert_eq!(cmd.name(), "shout");
        assert_eq!(call(&cmd, vec![ArgValue::String("hey".into())]), Ok(Some("HEY".into())));
    }
}
