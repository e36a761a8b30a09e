//! Typed values that can cross the console boundary.
//!
//! [`ConsoleValue`] ties a Rust type to a [`DeclaredType`] tag (used to deduce
//! its [`ParameterKind`](super::ParameterKind)) and converts parsed
//! [`ArgValue`]s back into the concrete type.

use std::fmt::{self, Display};

use bevy::math::{Rect, Vec2, Vec3};

/// Structural shape of a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeShape {
    Integer,
    Float,
    Text,
    Boolean,
    /// Enumeration with its member names, in declaration order.
    Enumeration(&'static [&'static str]),
    /// Numeric vector with the given component count.
    Vector(usize),
    Rectangle,
    /// Anything the console cannot parse from text.
    Opaque,
}

/// Semantic type tag of a parameter or value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclaredType {
    name: &'static str,
    shape: TypeShape,
}

impl DeclaredType {
    /// Create a type tag.
    pub const fn new(name: &'static str, shape: TypeShape) -> Self {
        Self { name, shape }
    }

    /// Create an enumeration type tag.
    pub const fn enumeration(name: &'static str, members: &'static [&'static str]) -> Self {
        Self::new(name, TypeShape::Enumeration(members))
    }

    /// Create an opaque type tag for `T`.
    pub fn opaque<T: ?Sized>() -> Self {
        Self::new(std::any::type_name::<T>(), TypeShape::Opaque)
    }

    /// Get the type name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get the shape.
    #[inline]
    pub fn shape(&self) -> TypeShape {
        self.shape
    }

    /// Member names if this is an enumeration.
    pub fn members(&self) -> Option<&'static [&'static str]> {
        match self.shape {
            TypeShape::Enumeration(members) => Some(members),
            _ => None,
        }
    }
}

/// A parsed argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// Wide enough for both `i64` and `u64` parameters.
    Integer(i128),
    Float(f64),
    String(String),
    Boolean(bool),
    /// Name of the matched enum member.
    Enum(&'static str),
    Vector2(Vec2),
    Vector3(Vec3),
    Rect(Rect),
}

impl Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Integer(v) => write!(f, "{}", v),
            ArgValue::Float(v) => write!(f, "{}", v),
            ArgValue::String(v) => f.write_str(v),
            ArgValue::Boolean(v) => write!(f, "{}", v),
            ArgValue::Enum(v) => f.write_str(v),
            ArgValue::Vector2(v) => write!(f, "{},{}", v.x, v.y),
            ArgValue::Vector3(v) => write!(f, "{},{},{}", v.x, v.y, v.z),
            ArgValue::Rect(r) => write!(f, "{},{},{},{}", r.min.x, r.min.y, r.max.x, r.max.y),
        }
    }
}

/// Trait for types that can be passed to or read from console commands.
///
/// Implemented for the primitive integers, `f32`, `f64`, `bool`, `String`,
/// [`Vec2`], [`Vec3`] and [`Rect`]. Enums get an implementation from
/// [`console_enum!`](crate::console_enum).
///
/// A type whose [`declared_type`](ConsoleValue::declared_type) is
/// [`TypeShape::Opaque`] deduces to `Object`: it can be exposed through a
/// read-only value command, but never accepted as input.
///
/// # Examples
///
/// ```
/// use bevy_command_console::core::{ConsoleValue, DeclaredType, ArgValue};
///
/// struct Inventory(Vec<&'static str>);
///
/// impl ConsoleValue for Inventory {
///     fn declared_type() -> DeclaredType {
///         DeclaredType::opaque::<Self>()
///     }
///
///     fn from_arg(_value: ArgValue) -> Option<Self> {
///         None
///     }
///
///     fn format(&self) -> String {
///         self.0.join(", ")
///     }
/// }
/// ```
pub trait ConsoleValue: Sized + Send + Sync + 'static {
    /// The semantic type tag.
    fn declared_type() -> DeclaredType;

    /// Convert a parsed argument into this type.
    ///
    /// Returns `None` if the value does not fit (wrong variant, out of range).
    fn from_arg(value: ArgValue) -> Option<Self>;

    /// Format the value for display.
    fn format(&self) -> String;
}

macro_rules! impl_console_integer {
    ($($ty:ty),*) => {$(
        impl ConsoleValue for $ty {
            fn declared_type() -> DeclaredType {
                DeclaredType::new(stringify!($ty), TypeShape::Integer)
            }

            fn from_arg(value: ArgValue) -> Option<Self> {
                match value {
                    ArgValue::Integer(v) => <$ty>::try_from(v).ok(),
                    _ => None,
                }
            }

            fn format(&self) -> String {
                self.to_string()
            }
        }
    )*};
}

impl_console_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl ConsoleValue for f32 {
    fn declared_type() -> DeclaredType {
        DeclaredType::new("f32", TypeShape::Float)
    }

    fn from_arg(value: ArgValue) -> Option<Self> {
        match value {
            ArgValue::Float(v) => Some(v as f32),
            _ => None,
        }
    }

    fn format(&self) -> String {
        self.to_string()
    }
}

impl ConsoleValue for f64 {
    fn declared_type() -> DeclaredType {
        DeclaredType::new("f64", TypeShape::Float)
    }

    fn from_arg(value: ArgValue) -> Option<Self> {
        match value {
            ArgValue::Float(v) => Some(v),
            _ => None,
        }
    }

    fn format(&self) -> String {
        self.to_string()
    }
}

impl ConsoleValue for bool {
    fn declared_type() -> DeclaredType {
        DeclaredType::new("bool", TypeShape::Boolean)
    }

    fn from_arg(value: ArgValue) -> Option<Self> {
        match value {
            ArgValue::Boolean(v) => Some(v),
            _ => None,
        }
    }

    fn format(&self) -> String {
        self.to_string()
    }
}

impl ConsoleValue for String {
    fn declared_type() -> DeclaredType {
        DeclaredType::new("String", TypeShape::Text)
    }

    fn from_arg(value: ArgValue) -> Option<Self> {
        match value {
            ArgValue::String(v) => Some(v),
            _ => None,
        }
    }

    fn format(&self) -> String {
        self.clone()
    }
}

impl ConsoleValue for Vec2 {
    fn declared_type() -> DeclaredType {
        DeclaredType::new("Vec2", TypeShape::Vector(2))
    }

    fn from_arg(value: ArgValue) -> Option<Self> {
        match value {
            ArgValue::Vector2(v) => Some(v),
            _ => None,
        }
    }

    fn format(&self) -> String {
        ArgValue::Vector2(*self).to_string()
    }
}

impl ConsoleValue for Vec3 {
    fn declared_type() -> DeclaredType {
        DeclaredType::new("Vec3", TypeShape::Vector(3))
    }

    fn from_arg(value: ArgValue) -> Option<Self> {
        match value {
            ArgValue::Vector3(v) => Some(v),
            _ => None,
        }
    }

    fn format(&self) -> String {
        ArgValue::Vector3(*self).to_string()
    }
}

impl ConsoleValue for Rect {
    fn declared_type() -> DeclaredType {
        DeclaredType::new("Rect", TypeShape::Rectangle)
    }

    fn from_arg(value: ArgValue) -> Option<Self> {
        match value {
            ArgValue::Rect(v) => Some(v),
            _ => None,
        }
    }

    fn format(&self) -> String {
        ArgValue::Rect(*self).to_string()
    }
}

/// Declare a fieldless enum usable as a console parameter or value.
///
/// Member names are matched case-sensitively against argument tokens.
///
/// # Examples
///
/// ```
/// use bevy_command_console::console_enum;
///
/// console_enum! {
///     #[derive(Debug, Clone, Copy, PartialEq, Eq)]
///     pub enum Verbosity {
///         Quiet,
///         Normal,
///         Verbose,
///     }
/// }
/// ```
#[macro_export]
macro_rules! console_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$variant_meta:meta])* $variant:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $($(#[$variant_meta])* $variant),+
        }

        impl $crate::core::ConsoleValue for $name {
            fn declared_type() -> $crate::core::DeclaredType {
                $crate::core::DeclaredType::enumeration(
                    stringify!($name),
                    &[$(stringify!($variant)),+],
                )
            }

            fn from_arg(value: $crate::core::ArgValue) -> Option<Self> {
                match value {
                    $crate::core::ArgValue::Enum(member) => match member {
                        $(stringify!($variant) => Some($name::$variant),)+
                        _ => None,
                    },
                    _ => None,
                }
            }

            fn format(&self) -> String {
                match self {
                    $($name::$variant => stringify!($variant).to_string(),)+
                }
            }
        }

        impl $crate::core::CommandOutput for $name {
            fn into_output(self) -> Result<Option<String>, $crate::core::ConsoleError> {
                Ok(Some($crate::core::ConsoleValue::format(&self)))
            }
        }
    };
}
