//! Parameter kinds and text-to-value conversion.

use std::fmt::{self, Display};

use bevy::math::{Rect, Vec2, Vec3};

use super::{ArgValue, ConsoleError, DeclaredType, ParameterDescriptor, TypeShape};

/// Closed set of argument kinds the console understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    Integer,
    Float,
    String,
    Boolean,
    Enum,
    Vector2,
    Vector3,
    Rect,
    /// Fallback for unrecognized types; never parseable from text.
    Object,
}

impl ParameterKind {
    /// Deduce the kind of a declared type.
    ///
    /// Never fails: anything unrecognized becomes [`ParameterKind::Object`].
    pub fn deduce(declared: &DeclaredType) -> Self {
        match declared.shape() {
            TypeShape::Integer => ParameterKind::Integer,
            TypeShape::Float => ParameterKind::Float,
            TypeShape::Text => ParameterKind::String,
            TypeShape::Boolean => ParameterKind::Boolean,
            TypeShape::Enumeration(_) => ParameterKind::Enum,
            TypeShape::Vector(2) => ParameterKind::Vector2,
            TypeShape::Vector(3) => ParameterKind::Vector3,
            TypeShape::Rectangle => ParameterKind::Rect,
            TypeShape::Vector(_) | TypeShape::Opaque => ParameterKind::Object,
        }
    }

    /// Get the display name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            ParameterKind::Integer => "Integer",
            ParameterKind::Float => "Float",
            ParameterKind::String => "String",
            ParameterKind::Boolean => "Boolean",
            ParameterKind::Enum => "Enum",
            ParameterKind::Vector2 => "Vector2",
            ParameterKind::Vector3 => "Vector3",
            ParameterKind::Rect => "Rect",
            ParameterKind::Object => "Object",
        }
    }

    /// Check if values of this kind can be parsed from console input.
    #[inline]
    pub fn is_parseable(self) -> bool {
        self != ParameterKind::Object
    }
}

impl Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Converts argument tokens into typed values.
///
/// # Examples
///
/// ```
/// use bevy_command_console::core::{ArgumentParser, ArgValue, ParameterDescriptor};
///
/// let parser = ArgumentParser::new(' ');
/// let flag = ParameterDescriptor::of::<bool>();
///
/// assert_eq!(parser.parse(&flag, "on").unwrap(), ArgValue::Boolean(true));
/// assert_eq!(parser.parse(&flag, "FALSE").unwrap(), ArgValue::Boolean(false));
/// assert!(parser.parse(&flag, "banana").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentParser {
    delimiter: char,
}

impl Default for ArgumentParser {
    fn default() -> Self {
        Self::new(' ')
    }
}

impl ArgumentParser {
    /// Separator between the components of a vector or rect token.
    pub const COMPONENT_SEPARATOR: char = ',';

    /// Create a parser for lines split by `delimiter`.
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    /// Get the token delimiter.
    #[inline]
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Parse a single token against a parameter.
    pub fn parse(&self, param: &ParameterDescriptor, token: &str) -> Result<ArgValue, ConsoleError> {
        let kind = param.kind();
        match kind {
            ParameterKind::Integer => token
                .parse()
                .map(ArgValue::Integer)
                .map_err(|e| ConsoleError::parse(token, kind, format!("{}", e))),
            ParameterKind::Float => token
                .parse()
                .map(ArgValue::Float)
                .map_err(|e| ConsoleError::parse(token, kind, format!("{}", e))),
            ParameterKind::String => Ok(ArgValue::String(token.to_string())),
            ParameterKind::Boolean => parse_bool(token)
                .map(ArgValue::Boolean)
                .ok_or_else(|| ConsoleError::parse(token, kind, "expected on/off or true/false")),
            ParameterKind::Enum => {
                let members = param.declared_type().members().unwrap_or(&[]);
                members
                    .iter()
                    .copied()
                    .find(|member| *member == token)
                    .map(ArgValue::Enum)
                    .ok_or_else(|| {
                        ConsoleError::parse(token, kind, format!("expected one of {}", members.join(", ")))
                    })
            }
            ParameterKind::Vector2 => {
                let [x, y] = parse_components(token, kind)?;
                Ok(ArgValue::Vector2(Vec2::new(x, y)))
            }
            ParameterKind::Vector3 => {
                let [x, y, z] = parse_components(token, kind)?;
                Ok(ArgValue::Vector3(Vec3::new(x, y, z)))
            }
            ParameterKind::Rect => {
                let [x0, y0, x1, y1] = parse_components(token, kind)?;
                Ok(ArgValue::Rect(Rect::new(x0, y0, x1, y1)))
            }
            ParameterKind::Object => Err(ConsoleError::UnsupportedParameter(param.declared_type().name())),
        }
    }

    /// Parse argument tokens against an ordered parameter list.
    ///
    /// A trailing `String` parameter consumes every remaining token, rejoined
    /// with the delimiter. Otherwise the token count must match exactly.
    pub fn parse_arguments(
        &self,
        params: &[ParameterDescriptor],
        tokens: &[&str],
    ) -> Result<Vec<ArgValue>, ConsoleError> {
        let expected = params.len();
        let actual = tokens.len();

        if actual < expected {
            return Err(ConsoleError::NotEnoughArguments { expected, actual });
        }

        let greedy_tail = params.last().is_some_and(|p| p.kind() == ParameterKind::String);
        if actual > expected && !greedy_tail {
            return Err(ConsoleError::TooManyArguments { expected, actual });
        }

        let mut values = Vec::with_capacity(expected);
        for (index, param) in params.iter().enumerate() {
            let value = if index + 1 == expected && actual > expected {
                let mut buf = [0u8; 4];
                let separator: &str = self.delimiter.encode_utf8(&mut buf);
                self.parse(param, &tokens[index..].join(separator))?
            } else {
                self.parse(param, tokens[index])?
            };
            values.push(value);
        }

        Ok(values)
    }
}

fn parse_bool(token: &str) -> Option<bool> {
    if token.eq_ignore_ascii_case("on") || token.eq_ignore_ascii_case("true") {
        Some(true)
    } else if token.eq_ignore_ascii_case("off") || token.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Split `x,y[,z[,w]]` (optionally wrapped in parentheses) into `N` floats.
fn parse_components<const N: usize>(token: &str, kind: ParameterKind) -> Result<[f32; N], ConsoleError> {
    let inner = token
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .unwrap_or(token);

    let parts: Vec<&str> = inner.split(ArgumentParser::COMPONENT_SEPARATOR).collect();
    if parts.len() != N {
        return Err(ConsoleError::parse(
            token,
            kind,
            format!("expected {} components, got {}", N, parts.len()),
        ));
    }

    let mut out = [0.0; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .trim()
            .parse()
            .map_err(|_| ConsoleError::parse(token, kind, format!("'{}' is not a number", part.trim())))?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::console_enum! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        enum Level {
            Quiet,
            Verbose,
        }
    }

    struct Opaque;

    impl crate::core::ConsoleValue for Opaque {
        fn declared_type() -> DeclaredType {
            DeclaredType::opaque::<Self>()
        }

        fn from_arg(_value: ArgValue) -> Option<Self> {
            None
        }

        fn format(&self) -> String {
            "opaque".into()
        }
    }

    fn param<T: crate::core::ConsoleValue>() -> ParameterDescriptor {
        ParameterDescriptor::of::<T>()
    }

    #[test]
    fn test_deduce() {
        assert_eq!(param::<i32>().kind(), ParameterKind::Integer);
        assert_eq!(param::<u64>().kind(), ParameterKind::Integer);
        assert_eq!(param::<f32>().kind(), ParameterKind::Float);
        assert_eq!(param::<String>().kind(), ParameterKind::String);
        assert_eq!(param::<bool>().kind(), ParameterKind::Boolean);
        assert_eq!(param::<Level>().kind(), ParameterKind::Enum);
        assert_eq!(param::<Vec2>().kind(), ParameterKind::Vector2);
        assert_eq!(param::<Vec3>().kind(), ParameterKind::Vector3);
        assert_eq!(param::<Rect>().kind(), ParameterKind::Rect);
        assert_eq!(param::<Opaque>().kind(), ParameterKind::Object);
        assert_eq!(
            ParameterKind::deduce(&DeclaredType::new("Vec4", TypeShape::Vector(4))),
            ParameterKind::Object
        );
    }

    #[test]
    fn test_parse_bool() {
        let parser = ArgumentParser::default();
        let p = param::<bool>();
        assert_eq!(parser.parse(&p, "on").unwrap(), ArgValue::Boolean(true));
        assert_eq!(parser.parse(&p, "OFF").unwrap(), ArgValue::Boolean(false));
        assert_eq!(parser.parse(&p, "true").unwrap(), ArgValue::Boolean(true));
        assert_eq!(parser.parse(&p, "False").unwrap(), ArgValue::Boolean(false));
        assert!(matches!(parser.parse(&p, "banana"), Err(ConsoleError::Parse { .. })));
        assert!(parser.parse(&p, "1").is_err());
    }

    #[test]
    fn test_parse_numbers() {
        let parser = ArgumentParser::default();
        assert_eq!(parser.parse(&param::<i32>(), "-42").unwrap(), ArgValue::Integer(-42));
        assert_eq!(parser.parse(&param::<f32>(), "0.25").unwrap(), ArgValue::Float(0.25));
        assert!(parser.parse(&param::<i32>(), "4.5").is_err());
        assert!(parser.parse(&param::<f64>(), "abc").is_err());
    }

    #[test]
    fn test_parse_u64_max() {
        let parser = ArgumentParser::default();
        let value = parser.parse(&param::<u64>(), "18446744073709551615").unwrap();
        assert_eq!(<u64 as crate::core::ConsoleValue>::from_arg(value), Some(u64::MAX));
    }

    #[test]
    fn test_parse_enum_case_sensitive() {
        let parser = ArgumentParser::default();
        let p = param::<Level>();
        assert_eq!(parser.parse(&p, "Verbose").unwrap(), ArgValue::Enum("Verbose"));
        let err = parser.parse(&p, "verbose").unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot parse 'verbose' as Enum: expected one of Quiet, Verbose"
        );
    }

    #[test]
    fn test_parse_vectors() {
        let parser = ArgumentParser::default();
        assert_eq!(
            parser.parse(&param::<Vec2>(), "1,2").unwrap(),
            ArgValue::Vector2(Vec2::new(1.0, 2.0))
        );
        assert_eq!(
            parser.parse(&param::<Vec3>(), "(1, 2.5, -3)").unwrap(),
            ArgValue::Vector3(Vec3::new(1.0, 2.5, -3.0))
        );
        assert_eq!(
            parser.parse(&param::<Rect>(), "0,0,10,5").unwrap(),
            ArgValue::Rect(Rect::new(0.0, 0.0, 10.0, 5.0))
        );
        assert!(parser.parse(&param::<Vec2>(), "1,2,3").is_err());
        assert!(parser.parse(&param::<Vec3>(), "1,x,3").is_err());
        assert!(parser.parse(&param::<Rect>(), "1,2,3").is_err());
    }

    #[test]
    fn test_parse_object_unsupported() {
        let parser = ArgumentParser::default();
        assert!(matches!(
            parser.parse(&param::<Opaque>(), "anything"),
            Err(ConsoleError::UnsupportedParameter(_))
        ));
    }

    #[test]
    fn test_parse_arguments_counts() {
        let parser = ArgumentParser::default();
        let params = [param::<i32>(), param::<i32>()];

        assert!(matches!(
            parser.parse_arguments(&params, &["1"]),
            Err(ConsoleError::NotEnoughArguments { expected: 2, actual: 1 })
        ));
        assert!(matches!(
            parser.parse_arguments(&params, &["1", "2", "3"]),
            Err(ConsoleError::TooManyArguments { expected: 2, actual: 3 })
        ));
        assert_eq!(
            parser.parse_arguments(&params, &["1", "2"]).unwrap(),
            vec![ArgValue::Integer(1), ArgValue::Integer(2)]
        );
        assert!(parser.parse_arguments(&[], &[]).unwrap().is_empty());
    }

    #[test]
    fn test_parse_arguments_greedy_string() {
        let parser = ArgumentParser::default();
        let params = [param::<i32>(), param::<String>()];

        assert_eq!(
            parser.parse_arguments(&params, &["5", "hello", "world"]).unwrap(),
            vec![ArgValue::Integer(5), ArgValue::String("hello world".into())]
        );

        let single = [param::<String>()];
        assert_eq!(
            parser.parse_arguments(&single, &["hello", "there", "friend"]).unwrap(),
            vec![ArgValue::String("hello there friend".into())]
        );
    }

    #[test]
    fn test_parse_arguments_custom_delimiter() {
        let parser = ArgumentParser::new('.');
        let params = [param::<String>()];
        assert_eq!(
            parser.parse_arguments(&params, &["a", "b"]).unwrap(),
            vec![ArgValue::String("a.b".into())]
        );
    }
}
